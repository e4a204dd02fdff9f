//! Fills the gaps left in a temperature field after interpolation to
//! isobaric levels.
//!
//! Levels below the model topography are filled top-down from the level
//! above them, levels above the top of the model data bottom-up from the
//! level below them. In both sweeps a level may be seeded by a level that was
//! itself filled earlier in the same sweep.

use {
    crate::{
        atmosphere::standard_heights,
        error::{ExtrapolationError, Result},
        field::IsobaricField,
        lapse::{LapseRateTable, LapseRates},
        units::FieldUnits,
    },
    log::{debug, info, warn},
    serde::Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Ascending pressure, fills gaps below the topography
    TopDown,
    /// Descending pressure, fills gaps above the top of the model data
    BottomUp,
}

impl Pass {
    fn table(self, lapse: &LapseRates) -> &LapseRateTable {
        match self {
            Pass::TopDown => &lapse.topography,
            Pass::BottomUp => &lapse.top_of_data,
        }
    }

    fn acts_on(self, pressure: f64, split_pressure: f64) -> bool {
        match self {
            Pass::TopDown => pressure > split_pressure,
            Pass::BottomUp => pressure < split_pressure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The level is the first of its pass
    NoSeedLevel,
    /// The seed level is itself missing some of the cells needed
    MissingSeedValues,
    /// The level sits exactly at the split pressure, so neither pass acts on it
    OutsidePasses,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelFill {
    pub pressure: f64,
    pub pass: Pass,
    pub lapse_rate: f64,
    pub cells: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedLevel {
    pub pressure: f64,
    pub pass: Option<Pass>,
    pub reason: UnresolvedReason,
    pub cells: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtrapolationReport {
    pub filled: Vec<LevelFill>,
    pub unresolved: Vec<UnresolvedLevel>,
}

impl ExtrapolationReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub fn filled_cells(&self) -> usize {
        self.filled.iter().map(|f| f.cells).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Extrapolator {
    lapse: LapseRates,
}

impl Extrapolator {
    pub fn new(lapse: LapseRates) -> Self {
        Extrapolator { lapse }
    }

    pub fn lapse_rates(&self) -> &LapseRates {
        &self.lapse
    }

    /// Extrapolates using ICAO standard-atmosphere heights for the field's levels
    pub fn extrapolate(&self, field: &mut IsobaricField) -> Result<ExtrapolationReport> {
        self.validate(field)?;
        let heights = standard_heights(field.levels())?;
        self.extrapolate_with_heights(field, &heights)
    }

    /// Extrapolates using caller-supplied heights (km), one per level of `field`
    pub fn extrapolate_with_heights(
        &self,
        field: &mut IsobaricField,
        heights: &[f64],
    ) -> Result<ExtrapolationReport> {
        self.validate(field)?;

        if heights.len() != field.levels().len() {
            return Err(ExtrapolationError::ShapeMismatch(format!(
                "{} heights supplied for {} levels",
                heights.len(),
                field.levels().len()
            )));
        }
        if let Some(z) = heights.iter().find(|z| !z.is_finite()) {
            return Err(ExtrapolationError::OutOfRange(format!(
                "level height {} is not finite",
                z
            )));
        }

        let mut report = ExtrapolationReport::default();

        let mut order = field.sorted_level_order();
        self.sweep(Pass::TopDown, field, heights, &order, &mut report);
        order.reverse();
        self.sweep(Pass::BottomUp, field, heights, &order, &mut report);

        // Anything still missing that no pass has accounted for
        for index in order {
            let pressure = field.levels()[index];
            let cells = field.missing_at(index);
            if cells > 0 && !report.unresolved.iter().any(|u| u.pressure == pressure) {
                warn!(
                    "level {} hPa has {} missing cells and is not covered by either pass",
                    pressure, cells
                );
                report.unresolved.push(UnresolvedLevel {
                    pressure,
                    pass: None,
                    reason: UnresolvedReason::OutsidePasses,
                    cells,
                });
            }
        }

        Ok(report)
    }

    fn validate(&self, field: &IsobaricField) -> Result<()> {
        let levels = field.levels();

        if levels.is_empty() {
            return Err(ExtrapolationError::EmptyLevelSet);
        }

        if field.units() != FieldUnits::default() {
            return Err(ExtrapolationError::UnitMismatch {
                expected: FieldUnits::default(),
                found: field.units(),
            });
        }

        if let Some(p) = levels.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(ExtrapolationError::InvalidLevels(format!(
                "{} is not a valid pressure",
                p
            )));
        }

        let order = field.sorted_level_order();
        if let Some(pair) = order
            .windows(2)
            .find(|pair| levels[pair[0]] == levels[pair[1]])
        {
            return Err(ExtrapolationError::InvalidLevels(format!(
                "{} hPa appears more than once",
                levels[pair[0]]
            )));
        }

        self.lapse.validate()
    }

    /// One ordered sweep over the levels. Each step is seeded by the level
    /// visited immediately before it, after that level has been filled.
    fn sweep(
        &self,
        pass: Pass,
        field: &mut IsobaricField,
        heights: &[f64],
        order: &[usize],
        report: &mut ExtrapolationReport,
    ) {
        let table = pass.table(&self.lapse);

        order.iter().fold(None, |seed: Option<usize>, &index| {
            let pressure = field.levels()[index];
            let missing = field.missing_at(index);

            if missing == 0 || !pass.acts_on(pressure, self.lapse.split_pressure) {
                return Some(index);
            }

            let seed = match seed {
                Some(seed) => seed,
                None => {
                    warn!(
                        "no level to extrapolate {} hPa from, {} cells left missing",
                        pressure, missing
                    );
                    report.unresolved.push(UnresolvedLevel {
                        pressure,
                        pass: Some(pass),
                        reason: UnresolvedReason::NoSeedLevel,
                        cells: missing,
                    });
                    return Some(index);
                }
            };

            let lapse_rate = table.lapse_rate(pressure);
            let dz = heights[seed] - heights[index];

            info!("extrapolating data for level: {} hPa", pressure);
            debug!(
                "seed {} hPa, dz = {:.4} km, lapse rate = {} °C/km",
                field.levels()[seed],
                dz,
                lapse_rate
            );

            let cells = field.fill_level_from(index, seed, lapse_rate * dz);
            if cells > 0 {
                report.filled.push(LevelFill {
                    pressure,
                    pass,
                    lapse_rate,
                    cells,
                });
            }

            let remaining = missing - cells;
            if remaining > 0 {
                warn!(
                    "{} cells of level {} hPa have no value at {} hPa to extrapolate from",
                    remaining,
                    pressure,
                    field.levels()[seed]
                );
                report.unresolved.push(UnresolvedLevel {
                    pressure,
                    pass: Some(pass),
                    reason: UnresolvedReason::MissingSeedValues,
                    cells: remaining,
                });
            }

            Some(index)
        });
    }
}
