#[macro_use]
extern crate clap;

use {
    anyhow::{bail, Result},
    log::{error, info, warn},
    metfor::Quantity,
    mpas_isobaric::{
        atmosphere::standard_heights,
        extrapolate::Extrapolator,
        field::IsobaricField,
        namelist::SimulationPeriod,
        parameters::Parameters,
        thermo::temperature_field,
        units::{FieldUnits, ValueUnit},
        utils::{read_frames, write_frames},
        vinterp::interp_levels_4d,
    },
    ndarray::{Array4, ArrayD, IxDyn},
    simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode},
    std::{
        fs::{self, create_dir_all, File},
        path::Path,
    },
};

/// Latitude axis of a (time, level, latitude, longitude) field
const LATITUDE_AXIS: usize = 2;

#[quit::main]
fn main() {
    let matches = clap_app!(mpas_isobaric =>
        (version: crate_version!())
        (@arg PARAMETERS: -p --parameters +takes_value +required "Path to file containing run parameters.")
        (@subcommand interpolate =>
            (about: "Interpolates model output from native levels to the target isobaric levels and fills the gaps in temperature.")
        )
        (@subcommand extrapolate =>
            (about: "Fills gaps below the topography and above the top of the model data in temperature on isobaric levels.")
        )
        (@subcommand heights =>
            (about: "Prints the standard-atmosphere height of each target level.")
        )
        (@subcommand times =>
            (about: "Prints the output time axis derived from namelist.atmosphere.")
        )
    )
    .get_matches();

    TermLogger::init(
        LevelFilter::Debug,
        LogConfig::default(),
        TerminalMode::Mixed,
    )
    .expect("Failed to initialize logger");

    let params = {
        // Should never panic as clap should return an error if the argument was not supplied
        let path = matches
            .value_of("PARAMETERS")
            .expect("Path to parameters file not supplied");

        let file = File::open(path).unwrap_or_else(|e| {
            error!("Failed to open {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        let params = serde_yaml::from_reader::<_, Parameters>(file).unwrap_or_else(|e| {
            error!("Failed to parse parameters from {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        info!(
            "Successfully loaded run parameters from \"{}\": \n{:#?}",
            path, params
        );

        params
    };

    run_subcommand(matches.subcommand_name(), params).unwrap_or_else(|e| {
        error!("Error: \"{}\"", e);
        quit::with_code(1);
    });
}

fn run_subcommand(subcmd: Option<&str>, params: Parameters) -> Result<()> {
    let subcmd = match subcmd {
        Some(s) => s,
        None => bail!("No subcommand selected"),
    };

    info!("Starting {}", subcmd);

    match subcmd {
        "interpolate" => interpolate(&params)?,
        "extrapolate" => extrapolate(&params)?,
        "heights" => {
            let heights = standard_heights(&params.levels)?;
            for (p, z) in params.levels.iter().zip(heights) {
                info!("{:>8.2} hPa {:>8.3} km", p, z);
            }
        }
        "times" => {
            let path = match &params.environment.namelist {
                Some(path) => path,
                None => bail!("No namelist configured"),
            };
            let period = SimulationPeriod::from_namelist(&fs::read_to_string(path)?)?;
            info!("Run from {} to {}", period.start, period.finish());
            for t in period.time_axis(params.grid.times, true) {
                info!("{}", t);
            }
        }
        _ => {
            // Should be unreachable due to clap catching this error
            bail!("Unrecognized subcommand");
        }
    }

    info!("Finished {}", subcmd);

    Ok(())
}

fn interpolate(params: &Parameters) -> Result<()> {
    let model = &params.model;
    let dir = &params.environment.output_directory;
    create_dir_all(dir)?;

    let pressure = read_model_field(params, &model.pressure)?
        .mapv_into(|p| model.pressure_unit.to_hectopascals(p).unpack());
    let theta = read_model_field(params, &model.theta)?;

    let temperature = temperature_field(pressure.view(), theta.view())?;
    let field = interp_levels_4d(
        pressure.view(),
        temperature.view(),
        &params.levels,
        ValueUnit::Kelvin,
    )?;

    fill_temperature(params, field, "t_isobaric_filled.r8")?;

    let others = [
        (&model.u, "u", ValueUnit::MetersPerSecond),
        (&model.v, "v", ValueUnit::MetersPerSecond),
        (&model.height, "z", ValueUnit::Meters),
    ];
    for (path, name, unit) in others.iter() {
        let path = match path {
            Some(path) => path,
            None => continue,
        };

        info!("Interpolating {} to isobaric levels", name);
        let values = read_model_field(params, path)?;
        let mut field = interp_levels_4d(pressure.view(), values.view(), &params.levels, *unit)?;

        if *unit == ValueUnit::MetersPerSecond {
            let filled = field.interpolate_gaps_along(LATITUDE_AXIS)?;
            info!("Filled {} cells of {} along latitude", filled, name);
        }
        if !field.is_complete() {
            warn!("{} cells of {} remain missing", field.missing_count(), name);
        }

        write_field(params, &field, &dir.join(format!("{}_isobaric.r8", name)))?;
    }

    Ok(())
}

fn extrapolate(params: &Parameters) -> Result<()> {
    let nlev = params.levels.len();
    let frame_len = params.grid.frame_len(nlev);

    let data = read_frames(&params.environment.input, frame_len)?;
    if data.len() != frame_len * params.grid.times {
        bail!(
            "{} holds {} frames, expected {}",
            params.environment.input.display(),
            data.len() / frame_len,
            params.grid.times
        );
    }

    let shape = [
        params.grid.times,
        nlev,
        params.grid.latitudes,
        params.grid.longitudes,
    ];
    let field = IsobaricField::from_nan_array(
        ArrayD::from_shape_vec(IxDyn(&shape), data)?,
        params.levels.clone(),
        1,
        FieldUnits::default(),
    )?;

    create_dir_all(&params.environment.output_directory)?;
    fill_temperature(params, field, "t_isobaric_filled.r8")
}

/// Reads a (time, model level, latitude, longitude) field
fn read_model_field(params: &Parameters, path: &Path) -> Result<Array4<f64>> {
    let nlev = params.model.levels;
    let frame_len = params.grid.frame_len(nlev);

    let data = read_frames(path, frame_len)?;
    if data.len() != frame_len * params.grid.times {
        bail!(
            "{} holds {} frames, expected {}",
            path.display(),
            data.len() / frame_len,
            params.grid.times
        );
    }

    Ok(Array4::from_shape_vec(
        (
            params.grid.times,
            nlev,
            params.grid.latitudes,
            params.grid.longitudes,
        ),
        data,
    )?)
}

/// Extrapolates the gaps in `field`, writing it and the report to the output directory
fn fill_temperature(params: &Parameters, mut field: IsobaricField, name: &str) -> Result<()> {
    info!(
        "{} of {} cells missing before extrapolation",
        field.missing_count(),
        field.values().len()
    );

    let report = Extrapolator::new(params.lapse.clone()).extrapolate(&mut field)?;

    if report.is_complete() {
        info!("Filled {} cells", report.filled_cells());
    } else {
        warn!(
            "Filled {} cells, {} cells remain missing",
            report.filled_cells(),
            field.missing_count()
        );
    }

    let dir = &params.environment.output_directory;
    write_field(params, &field, &dir.join(name))?;
    serde_yaml::to_writer(File::create(dir.join("report.yaml"))?, &report)?;

    Ok(())
}

fn write_field(params: &Parameters, field: &IsobaricField, path: &Path) -> Result<()> {
    let frame_len = params.grid.frame_len(field.levels().len());
    let values = field.to_nan_array().iter().copied().collect::<Vec<f64>>();
    write_frames(path, &values, frame_len)?;
    Ok(())
}
