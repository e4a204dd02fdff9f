use {
    crate::{
        constants::*,
        error::{ExtrapolationError, Result},
    },
    serde::{Deserialize, Serialize},
};

/// A pressure band of constant lapse rate, extending from `min_pressure` towards the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapseBand {
    /// Upper edge of the band (hPa)
    pub min_pressure: f64,
    /// Lapse rate in °C km^-1
    pub lapse_rate: f64,
    /// Whether a level exactly at `min_pressure` belongs to the band
    pub inclusive: bool,
}

impl LapseBand {
    fn contains(&self, pressure: f64) -> bool {
        if self.inclusive {
            pressure >= self.min_pressure
        } else {
            pressure > self.min_pressure
        }
    }
}

/// Piecewise-constant lapse rate as a function of pressure.
///
/// Bands are checked in order and must have strictly decreasing
/// `min_pressure`; a level in no band gets `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapseRateTable {
    pub bands: Vec<LapseBand>,
    pub fallback: f64,
}

impl LapseRateTable {
    /// Standard-atmosphere lapse rates used when filling gaps below the topography
    pub fn topography() -> Self {
        LapseRateTable {
            bands: vec![
                LapseBand {
                    min_pressure: TROPOPAUSE_BASE,
                    lapse_rate: TROPOSPHERE_LAPSE,
                    inclusive: true,
                },
                LapseBand {
                    min_pressure: STRATOSPHERE_BASE,
                    lapse_rate: TROPOPAUSE_LAPSE,
                    inclusive: false,
                },
            ],
            fallback: STRATOSPHERE_LAPSE,
        }
    }

    /// Standard-atmosphere lapse rates used when filling gaps above the top of the model data
    pub fn top_of_data() -> Self {
        LapseRateTable {
            bands: vec![LapseBand {
                min_pressure: UPPER_STRATOSPHERE_BASE,
                lapse_rate: UPPER_STRATOSPHERE_LAPSE,
                inclusive: true,
            }],
            fallback: ABOVE_UPPER_STRATOSPHERE_LAPSE,
        }
    }

    pub fn lapse_rate(&self, pressure: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| band.contains(pressure))
            .map_or(self.fallback, |band| band.lapse_rate)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fallback.is_finite() {
            return Err(ExtrapolationError::InvalidLapseTable(format!(
                "fallback lapse rate {} is not finite",
                self.fallback
            )));
        }

        for band in &self.bands {
            if !band.min_pressure.is_finite() || !band.lapse_rate.is_finite() {
                return Err(ExtrapolationError::InvalidLapseTable(format!(
                    "band {:?} contains a non-finite value",
                    band
                )));
            }
        }

        for pair in self.bands.windows(2) {
            if pair[0].min_pressure <= pair[1].min_pressure {
                return Err(ExtrapolationError::InvalidLapseTable(format!(
                    "band thresholds must strictly decrease, found {} hPa before {} hPa",
                    pair[0].min_pressure, pair[1].min_pressure
                )));
            }
        }

        Ok(())
    }
}

/// Lapse-rate configuration handed to the extrapolator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapseRates {
    /// Used by the top-down pass, for levels with pressure above `split_pressure`
    pub topography: LapseRateTable,
    /// Used by the bottom-up pass, for levels with pressure below `split_pressure`
    pub top_of_data: LapseRateTable,
    /// Pressure separating the two passes (hPa)
    pub split_pressure: f64,
}

impl Default for LapseRates {
    fn default() -> Self {
        LapseRates {
            topography: LapseRateTable::topography(),
            top_of_data: LapseRateTable::top_of_data(),
            split_pressure: SPLIT_PRESSURE,
        }
    }
}

impl LapseRates {
    pub fn validate(&self) -> Result<()> {
        if !(self.split_pressure.is_finite() && self.split_pressure > 0.0) {
            return Err(ExtrapolationError::InvalidLapseTable(format!(
                "split pressure {} must be positive",
                self.split_pressure
            )));
        }
        self.topography.validate()?;
        self.top_of_data.validate()
    }
}
