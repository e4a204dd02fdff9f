use {
    byteorder::{ByteOrder, LittleEndian},
    std::{
        fs::File,
        io::{self, prelude::*},
        path::Path,
    },
};

/// Reads a `.r8` file made of frames, each a little-endian `f64` time
/// followed by `frame_len` values. Returns the values with the times removed.
pub fn read_frames<P: AsRef<Path>>(path: P, frame_len: usize) -> io::Result<Vec<f64>> {
    let mut f = File::open(path)?;
    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes)?;

    let record = (frame_len + 1) * 8;
    if frame_len == 0 || bytes.len() % record != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "file of {} bytes does not hold whole frames of {} values",
                bytes.len(),
                frame_len
            ),
        ));
    }

    Ok(bytes
        .chunks(record)
        .flat_map(|frame| frame[8..].chunks(8).map(LittleEndian::read_f64))
        .collect())
}

/// Writes `data` as `.r8` frames of `frame_len` values, stamping each frame with its index.
pub fn write_frames<P: AsRef<Path>>(path: P, data: &[f64], frame_len: usize) -> io::Result<()> {
    if frame_len == 0 || data.len() % frame_len != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} values do not divide into frames of {}",
                data.len(),
                frame_len
            ),
        ));
    }

    let mut f = File::create(path)?;
    let mut buf = [0u8; 8];
    for (t, frame) in data.chunks(frame_len).enumerate() {
        LittleEndian::write_f64(&mut buf, t as f64);
        f.write_all(&buf)?;
        for x in frame {
            LittleEndian::write_f64(&mut buf, *x);
            f.write_all(&buf)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use {super::*, tempdir::TempDir};

    #[test]
    fn frames() {
        let tempdir = TempDir::new("mpas-isobaric").unwrap();
        let path = tempdir.path().join("t.r8");
        let data = [280.0, f64::NAN, 250.0, 300.0, 301.0, f64::NAN];

        write_frames(&path, &data, 3).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 2 * 4 * 8);

        let back = read_frames(&path, 3).unwrap();
        assert_eq!(back.len(), 6);
        assert_eq!(back[0], 280.0);
        assert!(back[1].is_nan());
        assert_eq!(back[4], 301.0);
    }

    #[test]
    fn partial_frame() {
        let tempdir = TempDir::new("mpas-isobaric").unwrap();
        let path = tempdir.path().join("t.r8");

        write_frames(&path, &[1.0, 2.0, 3.0, 4.0], 2).unwrap();

        assert_eq!(
            read_frames(&path, 3).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
        assert!(write_frames(&path, &[1.0, 2.0, 3.0], 2).is_err());
    }
}
