/// Standard gravity (m s^-2)
pub const G0: f64 = 9.806_65;
/// Specific gas constant of dry air used by the ICAO standard atmosphere (J kg^-1 K^-1)
pub const R_ICAO: f64 = 287.052_87;

/// Base of the ICAO tropopause (hPa), roughly 11 km
pub const TROPOPAUSE_BASE: f64 = 226.32;
/// Base of the ICAO lower stratosphere (hPa), roughly 20 km
pub const STRATOSPHERE_BASE: f64 = 54.74;
/// Base of the ICAO upper stratosphere (hPa), roughly 32 km
pub const UPPER_STRATOSPHERE_BASE: f64 = 8.68;

/// Levels above this pressure are filled top-down, levels below it bottom-up (hPa)
pub const SPLIT_PRESSURE: f64 = 50.0;

/// Lapse rates in °C km^-1, positive when temperature decreases with height
pub const TROPOSPHERE_LAPSE: f64 = 6.5;
pub const TROPOPAUSE_LAPSE: f64 = 0.0;
pub const STRATOSPHERE_LAPSE: f64 = -1.0;
pub const UPPER_STRATOSPHERE_LAPSE: f64 = -2.8;
pub const ABOVE_UPPER_STRATOSPHERE_LAPSE: f64 = 0.0;

/// Target isobaric levels used for Lorenz Energy Cycle diagnostics (hPa)
pub const REFERENCE_LEVELS: [f64; 32] = [
    10.0, 20.0, 30.0, 50.0, 70.0, 100.0, 125.0, 150.0, 175.0, 200.0, 225.0, 250.0, 300.0, 350.0,
    400.0, 450.0, 500.0, 550.0, 600.0, 650.0, 700.0, 750.0, 775.0, 800.0, 825.0, 850.0, 875.0,
    900.0, 925.0, 950.0, 975.0, 1000.0,
];
