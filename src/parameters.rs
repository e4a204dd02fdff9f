use {
    crate::{constants::REFERENCE_LEVELS, lapse::LapseRates, units::PressureUnit},
    serde::Deserialize,
    std::path::PathBuf,
};

/// Run parameters
#[derive(Debug, PartialEq, Deserialize)]
pub struct Parameters {
    /// Target isobaric levels (hPa)
    pub levels: Vec<f64>,
    pub lapse: LapseRates,
    pub grid: Grid,
    pub model: ModelInput,
    pub environment: Environment,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            levels: REFERENCE_LEVELS.to_vec(),
            lapse: LapseRates::default(),
            grid: Grid::default(),
            model: ModelInput::default(),
            environment: Environment::default(),
        }
    }
}

/// Shape of the raw field, which is stored as (time, level, latitude, longitude)
#[derive(Debug, PartialEq, Deserialize)]
pub struct Grid {
    /// Number of output times
    pub times: usize,
    /// Number of latitudes
    pub latitudes: usize,
    /// Number of longitudes
    pub longitudes: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            times: 1,
            latitudes: 1,
            longitudes: 1,
        }
    }
}

impl Grid {
    /// Values in one time frame
    pub fn frame_len(&self, levels: usize) -> usize {
        levels * self.latitudes * self.longitudes
    }
}

/// Model output on native vertical levels, read by `interpolate`.
/// Every file is stored as (time, model level, latitude, longitude).
#[derive(Debug, PartialEq, Deserialize)]
pub struct ModelInput {
    /// Number of native vertical levels
    pub levels: usize,
    pub pressure: PathBuf,
    pub pressure_unit: PressureUnit,
    /// Potential temperature (K)
    pub theta: PathBuf,
    /// Wind components (m/s), interpolated and gap-filled along latitude
    pub u: Option<PathBuf>,
    pub v: Option<PathBuf>,
    /// Height of the model levels (m)
    pub height: Option<PathBuf>,
}

impl Default for ModelInput {
    fn default() -> Self {
        ModelInput {
            levels: 55,
            pressure: PathBuf::from("pressure.r8"),
            pressure_unit: PressureUnit::Pascal,
            theta: PathBuf::from("theta.r8"),
            u: None,
            v: None,
            height: None,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Environment {
    /// Temperature already interpolated to the target levels, NaN where missing
    pub input: PathBuf,
    pub output_directory: PathBuf,
    /// `namelist.atmosphere` of the run, used to rebuild the time axis
    pub namelist: Option<PathBuf>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            input: PathBuf::from("t_isobaric.r8"),
            output_directory: PathBuf::from("output"),
            namelist: None,
        }
    }
}
