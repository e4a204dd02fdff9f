//! Simulation period from an MPAS `namelist.atmosphere`.
//!
//! MPAS output converted to a lat/lon grid carries no dates on its time
//! dimension, so the time axis is rebuilt from the run's start time and
//! duration.

use {
    crate::error::{ExtrapolationError, Result},
    chrono::{Duration, NaiveDateTime},
};

const GROUP: &str = "nhyd_model";
const START_KEY: &str = "config_start_time";
const DURATION_KEY: &str = "config_run_duration";
const START_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationPeriod {
    pub start: NaiveDateTime,
    pub duration: Duration,
}

impl SimulationPeriod {
    /// Reads `config_start_time` and `config_run_duration` from the
    /// `&nhyd_model` group of a namelist.
    pub fn from_namelist(text: &str) -> Result<Self> {
        let mut group = None;
        let mut start = None;
        let mut duration = None;

        for line in text.lines() {
            let line = line.split('!').next().unwrap_or("").trim();

            if let Some(name) = line.strip_prefix('&') {
                group = Some(name.trim().to_lowercase());
                continue;
            }
            if line == "/" {
                group = None;
                continue;
            }
            if group.as_deref() != Some(GROUP) {
                continue;
            }

            let mut kv = line.splitn(2, '=');
            let key = kv.next().unwrap_or("").trim().to_lowercase();
            let value = match kv.next() {
                Some(v) => unquote(v),
                None => continue,
            };

            match key.as_str() {
                START_KEY => start = Some(parse_start(value)?),
                DURATION_KEY => duration = Some(parse_duration(value)?),
                _ => {}
            }
        }

        match (start, duration) {
            (Some(start), Some(duration)) => Ok(SimulationPeriod { start, duration }),
            (None, _) => Err(ExtrapolationError::Namelist(format!(
                "{} not found in &{}",
                START_KEY, GROUP
            ))),
            (_, None) => Err(ExtrapolationError::Namelist(format!(
                "{} not found in &{}",
                DURATION_KEY, GROUP
            ))),
        }
    }

    pub fn finish(&self) -> NaiveDateTime {
        self.start + self.duration
    }

    /// `n_steps` evenly spaced output times.
    ///
    /// With `skip_initial` the period is split into `n_steps` intervals and
    /// the times are their ends, so the initial time is not included.
    /// Otherwise the first time is the start and the last the finish.
    pub fn time_axis(&self, n_steps: usize, skip_initial: bool) -> Vec<NaiveDateTime> {
        let total = self.duration.num_milliseconds();

        let (divisor, first) = match (n_steps, skip_initial) {
            (0, _) => return vec![],
            (1, false) => return vec![self.start],
            (n, true) => (n as i64, 1),
            (n, false) => (n as i64 - 1, 0),
        };

        (first..first + n_steps as i64)
            .map(|k| self.start + Duration::milliseconds(total * k / divisor))
            .collect()
    }
}

fn unquote(value: &str) -> &str {
    value
        .trim()
        .trim_end_matches(',')
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
}

fn parse_start(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, START_FORMAT).map_err(|e| {
        ExtrapolationError::Namelist(format!("invalid {} '{}': {}", START_KEY, value, e))
    })
}

/// Parses `[D_]hh:mm:ss`
fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = || {
        ExtrapolationError::Namelist(format!("invalid {} '{}'", DURATION_KEY, value))
    };

    let (days, clock) = match value.find('_') {
        Some(i) => (
            value[..i].parse::<i64>().map_err(|_| invalid())?,
            &value[i + 1..],
        ),
        None => (0, value),
    };

    let fields = clock
        .split(':')
        .map(|x| x.parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    match fields.as_slice() {
        [h, m, s] if days >= 0 && *h >= 0 && *m >= 0 && *s >= 0 => Ok(Duration::days(days)
            + Duration::hours(*h)
            + Duration::minutes(*m)
            + Duration::seconds(*s)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod test {
    use {super::*, chrono::NaiveDate};

    const NAMELIST: &str = "\
&nhyd_model
    config_time_integration_order = 2
    config_dt = 150.0
    config_start_time = '2022-12-01_00:00:00'
    config_run_duration = '2_12:00:00'   ! two and a half days
    config_split_dynamics_transport = true
/
&damping
    config_zd = 22000.0
/
";

    fn datetime(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd(2022, 12, d).and_hms(h, 0, 0)
    }

    #[test]
    fn parse() {
        let period = SimulationPeriod::from_namelist(NAMELIST).unwrap();

        assert_eq!(period.start, datetime(1, 0));
        assert_eq!(period.duration, Duration::hours(60));
        assert_eq!(period.finish(), datetime(3, 12));
    }

    #[test]
    fn axis_including_start() {
        let period = SimulationPeriod::from_namelist(NAMELIST).unwrap();

        assert_eq!(
            period.time_axis(6, false),
            vec![
                datetime(1, 0),
                datetime(1, 12),
                datetime(2, 0),
                datetime(2, 12),
                datetime(3, 0),
                datetime(3, 12),
            ]
        );
    }

    #[test]
    fn axis_skipping_start() {
        let period = SimulationPeriod::from_namelist(NAMELIST).unwrap();

        assert_eq!(
            period.time_axis(5, true),
            vec![
                datetime(1, 12),
                datetime(2, 0),
                datetime(2, 12),
                datetime(3, 0),
                datetime(3, 12),
            ]
        );
    }

    #[test]
    fn degenerate_axes() {
        let period = SimulationPeriod::from_namelist(NAMELIST).unwrap();

        assert!(period.time_axis(0, true).is_empty());
        assert_eq!(period.time_axis(1, false), vec![datetime(1, 0)]);
        assert_eq!(period.time_axis(1, true), vec![datetime(3, 12)]);
    }

    #[test]
    fn clock_only_duration() {
        assert_eq!(parse_duration("06:30:00").unwrap(), Duration::minutes(390));
        assert!(parse_duration("1_06:30").is_err());
        assert!(parse_duration("x_06:30:00").is_err());
    }

    #[test]
    fn missing_keys() {
        assert!(matches!(
            SimulationPeriod::from_namelist("&nhyd_model\n config_dt = 150.0\n/\n"),
            Err(ExtrapolationError::Namelist(_))
        ));
        // keys outside the group are ignored
        assert!(SimulationPeriod::from_namelist(
            "&damping\n config_start_time = '2022-12-01_00:00:00'\n config_run_duration = '1_00:00:00'\n/\n"
        )
        .is_err());
    }
}
