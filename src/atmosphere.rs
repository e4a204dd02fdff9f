//! ICAO standard atmosphere, used to assign a height to every isobaric level.
//!
//! Heights are geopotential and returned in kilometres so that they combine
//! directly with lapse rates expressed per kilometre.

use crate::{
    constants::{G0, R_ICAO},
    error::{ExtrapolationError, Result},
};

struct Layer {
    /// Geopotential height of the layer base (m)
    base_height: f64,
    /// Temperature at the layer base (K)
    base_temperature: f64,
    /// Pressure at the layer base (hPa)
    base_pressure: f64,
    /// dT/dz inside the layer (K m^-1)
    gradient: f64,
}

static LAYERS: [Layer; 5] = [
    // troposphere
    Layer {
        base_height: 0.0,
        base_temperature: 288.15,
        base_pressure: 1013.25,
        gradient: -6.5e-3,
    },
    // tropopause
    Layer {
        base_height: 11_000.0,
        base_temperature: 216.65,
        base_pressure: 226.320_6,
        gradient: 0.0,
    },
    // lower stratosphere
    Layer {
        base_height: 20_000.0,
        base_temperature: 216.65,
        base_pressure: 54.748_89,
        gradient: 1.0e-3,
    },
    // upper stratosphere
    Layer {
        base_height: 32_000.0,
        base_temperature: 228.65,
        base_pressure: 8.680_187,
        gradient: 2.8e-3,
    },
    // stratopause
    Layer {
        base_height: 47_000.0,
        base_temperature: 270.65,
        base_pressure: 1.109_063,
        gradient: 0.0,
    },
];

/// Top of the table: 51 km
const TOP_HEIGHT: f64 = 51_000.0;
const TOP_PRESSURE: f64 = 0.669_388_7;

impl Layer {
    fn height(&self, pressure: f64) -> f64 {
        let ratio = pressure / self.base_pressure;
        if self.gradient == 0.0 {
            self.base_height - R_ICAO * self.base_temperature / G0 * ratio.ln()
        } else {
            self.base_height
                + self.base_temperature / self.gradient
                    * (ratio.powf(-R_ICAO * self.gradient / G0) - 1.0)
        }
    }

    fn pressure(&self, height: f64) -> f64 {
        let dz = height - self.base_height;
        if self.gradient == 0.0 {
            self.base_pressure * (-G0 * dz / (R_ICAO * self.base_temperature)).exp()
        } else {
            self.base_pressure
                * (1.0 + self.gradient * dz / self.base_temperature)
                    .powf(-G0 / (R_ICAO * self.gradient))
        }
    }
}

/// Standard-atmosphere height (km) of a pressure surface given in hPa.
///
/// Pressures greater than the sea-level standard pressure continue the
/// tropospheric profile and give negative heights.
pub fn pressure_to_height_std(pressure: f64) -> Result<f64> {
    if !pressure.is_finite() || pressure < TOP_PRESSURE {
        return Err(ExtrapolationError::OutOfRange(format!(
            "{} hPa is outside the standard atmosphere",
            pressure
        )));
    }

    let layer = LAYERS
        .iter()
        .rev()
        .find(|layer| layer.base_pressure >= pressure)
        .unwrap_or(&LAYERS[0]);

    Ok(layer.height(pressure) / 1000.0)
}

/// Inverse of [`pressure_to_height_std`]: pressure (hPa) at a height in km.
pub fn height_to_pressure_std(height: f64) -> Result<f64> {
    let height = height * 1000.0;
    if !height.is_finite() || height > TOP_HEIGHT {
        return Err(ExtrapolationError::OutOfRange(format!(
            "{} km is outside the standard atmosphere",
            height / 1000.0
        )));
    }

    let layer = LAYERS
        .iter()
        .rev()
        .find(|layer| layer.base_height <= height)
        .unwrap_or(&LAYERS[0]);

    Ok(layer.pressure(height))
}

/// Standard heights (km) for a list of levels, in the same order.
pub fn standard_heights(levels: &[f64]) -> Result<Vec<f64>> {
    levels.iter().map(|&p| pressure_to_height_std(p)).collect()
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::constants::{
            REFERENCE_LEVELS, STRATOSPHERE_BASE, TROPOPAUSE_BASE, UPPER_STRATOSPHERE_BASE,
        },
        approx::assert_abs_diff_eq,
        insta::assert_debug_snapshot,
    };

    #[test]
    fn sea_level() {
        assert_abs_diff_eq!(pressure_to_height_std(1013.25).unwrap(), 0.0);
    }

    #[test]
    fn layer_bases_match_lapse_breakpoints() {
        assert_abs_diff_eq!(
            pressure_to_height_std(TROPOPAUSE_BASE).unwrap(),
            11.0,
            epsilon = 1.0E-3
        );
        assert_abs_diff_eq!(
            pressure_to_height_std(STRATOSPHERE_BASE).unwrap(),
            20.0,
            epsilon = 5.0E-3
        );
        assert_abs_diff_eq!(
            pressure_to_height_std(UPPER_STRATOSPHERE_BASE).unwrap(),
            32.0,
            epsilon = 5.0E-3
        );
    }

    #[test]
    fn mid_troposphere() {
        assert_abs_diff_eq!(pressure_to_height_std(500.0).unwrap(), 5.574, epsilon = 1.0E-2);
        assert_abs_diff_eq!(pressure_to_height_std(850.0).unwrap(), 1.457, epsilon = 1.0E-2);
    }

    #[test]
    fn below_sea_level() {
        assert!(pressure_to_height_std(1050.0).unwrap() < 0.0);
    }

    #[test]
    fn monotonic_over_reference_levels() {
        let heights = standard_heights(&REFERENCE_LEVELS).unwrap();
        for pair in heights.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn reference_heights() {
        let heights = REFERENCE_LEVELS
            .iter()
            .zip(standard_heights(&REFERENCE_LEVELS).unwrap())
            .map(|(p, z)| format!("{} hPa: {:.3} km", p, z))
            .collect::<Vec<_>>();

        assert_debug_snapshot!("reference_heights", heights);
    }

    #[test]
    fn inverse() {
        for &p in REFERENCE_LEVELS.iter() {
            let z = pressure_to_height_std(p).unwrap();
            assert_abs_diff_eq!(height_to_pressure_std(z).unwrap(), p, epsilon = 1.0E-9 * p);
        }
    }

    #[test]
    fn out_of_range() {
        assert!(pressure_to_height_std(0.1).is_err());
        assert!(pressure_to_height_std(f64::NAN).is_err());
        assert!(pressure_to_height_std(-5.0).is_err());
        assert!(height_to_pressure_std(60.0).is_err());
    }
}
