use {
    crate::{
        error::{ExtrapolationError, Result},
        units::{FieldUnits, PressureUnit, ValueUnit},
    },
    metfor::Quantity,
    ndarray::{ArrayD, ArrayViewD, Axis, Zip},
    serde::{Deserialize, Serialize},
    std::cmp::Ordering,
};

/// A field on a set of pressure levels, with missing cells as `None`.
///
/// The level coordinate runs along `level_axis`; every other axis is
/// horizontal position or time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsobaricField {
    values: ArrayD<Option<f64>>,
    levels: Vec<f64>,
    level_axis: usize,
    units: FieldUnits,
}

impl IsobaricField {
    pub fn new(
        values: ArrayD<Option<f64>>,
        levels: Vec<f64>,
        level_axis: usize,
        units: FieldUnits,
    ) -> Result<Self> {
        if level_axis >= values.ndim() {
            return Err(ExtrapolationError::ShapeMismatch(format!(
                "level axis {} does not exist in a {}-dimensional field",
                level_axis,
                values.ndim()
            )));
        }

        if values.len_of(Axis(level_axis)) != levels.len() {
            return Err(ExtrapolationError::ShapeMismatch(format!(
                "{} levels supplied for a level axis of length {}",
                levels.len(),
                values.len_of(Axis(level_axis))
            )));
        }

        Ok(IsobaricField {
            values,
            levels,
            level_axis,
            units,
        })
    }

    /// Builds a field from an array where missing values are NaN
    pub fn from_nan_array(
        values: ArrayD<f64>,
        levels: Vec<f64>,
        level_axis: usize,
        units: FieldUnits,
    ) -> Result<Self> {
        let values = values.mapv(|x| if x.is_nan() { None } else { Some(x) });
        Self::new(values, levels, level_axis, units)
    }

    /// Inverse of [`IsobaricField::from_nan_array`]
    pub fn to_nan_array(&self) -> ArrayD<f64> {
        self.values.mapv(|x| x.unwrap_or(f64::NAN))
    }

    pub fn values(&self) -> ArrayViewD<Option<f64>> {
        self.values.view()
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn level_axis(&self) -> usize {
        self.level_axis
    }

    pub fn units(&self) -> FieldUnits {
        self.units
    }

    /// Cells of the `index`th level
    pub fn level_values(&self, index: usize) -> ArrayViewD<Option<f64>> {
        self.values.index_axis(Axis(self.level_axis), index)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|x| x.is_none()).count()
    }

    pub fn missing_at(&self, index: usize) -> usize {
        self.level_values(index)
            .iter()
            .filter(|x| x.is_none())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Level indices ordered by ascending pressure
    pub fn sorted_level_order(&self) -> Vec<usize> {
        let mut order = (0..self.levels.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            self.levels[a]
                .partial_cmp(&self.levels[b])
                .unwrap_or(Ordering::Equal)
        });
        order
    }

    /// Converts a Celsius field to Kelvin, no-op if already in Kelvin.
    /// Fails for fields that do not hold temperatures.
    pub fn to_kelvin(&mut self) -> Result<()> {
        let unit = self.units.values;
        if !unit.is_temperature() {
            return Err(ExtrapolationError::UnitMismatch {
                expected: FieldUnits::hectopascals(ValueUnit::Kelvin),
                found: self.units,
            });
        }

        self.values.mapv_inplace(|x| {
            x.and_then(|t| unit.to_kelvin(t)).map(|t| t.unpack())
        });
        self.units.values = ValueUnit::Kelvin;

        Ok(())
    }

    /// Converts the level coordinate to hPa, no-op if already in hPa
    pub fn to_hectopascals(&mut self) {
        let unit = self.units.pressure;
        self.levels
            .iter_mut()
            .for_each(|p| *p = unit.to_hectopascals(*p).unpack());
        self.units.pressure = PressureUnit::HectoPascal;
    }

    /// Linearly interpolates interior gaps along `axis`, one lane at a time.
    /// Gaps at either end of a lane have nothing to interpolate towards and
    /// stay missing. Returns the number of cells filled.
    pub fn interpolate_gaps_along(&mut self, axis: usize) -> Result<usize> {
        if axis >= self.values.ndim() || axis == self.level_axis {
            return Err(ExtrapolationError::ShapeMismatch(format!(
                "cannot interpolate along axis {} of a {}-dimensional field with levels on axis {}",
                axis,
                self.values.ndim(),
                self.level_axis
            )));
        }

        let before = self.missing_count();

        Zip::from(self.values.lanes_mut(Axis(axis))).par_apply(|mut lane| {
            let present = lane
                .iter()
                .enumerate()
                .filter_map(|(i, x)| x.map(|x| (i, x)))
                .collect::<Vec<_>>();

            for pair in present.windows(2) {
                let ((i0, x0), (i1, x1)) = (pair[0], pair[1]);
                for i in i0 + 1..i1 {
                    let w = (i - i0) as f64 / (i1 - i0) as f64;
                    lane[i] = Some(x0 + w * (x1 - x0));
                }
            }
        });

        Ok(before - self.missing_count())
    }

    /// Fills missing cells of level `target` with `seed + offset` where the
    /// corresponding cell of level `seed` is present. Returns the number of
    /// cells filled.
    pub(crate) fn fill_level_from(&mut self, target: usize, seed: usize, offset: f64) -> usize {
        let axis = Axis(self.level_axis);
        let seed_values = self.values.index_axis(axis, seed).to_owned();
        let before = self.missing_at(target);

        Zip::from(self.values.index_axis_mut(axis, target))
            .and(&seed_values)
            .par_apply(|cell, seed| {
                if cell.is_none() {
                    *cell = seed.map(|s| s + offset);
                }
            });

        before - self.missing_at(target)
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        approx::assert_abs_diff_eq,
        ndarray::{arr2, IxDyn},
    };

    fn field() -> IsobaricField {
        IsobaricField::from_nan_array(
            arr2(&[[220.0, f64::NAN, 221.0], [f64::NAN, f64::NAN, 280.0]]).into_dyn(),
            vec![200.0, 900.0],
            0,
            FieldUnits::default(),
        )
        .unwrap()
    }

    #[test]
    fn nan_boundary() {
        let field = field();

        assert_eq!(field.missing_count(), 3);
        assert_eq!(field.missing_at(0), 1);
        assert_eq!(field.missing_at(1), 2);
        assert!(!field.is_complete());

        let back = field.to_nan_array();
        assert_eq!(back[[0, 0]], 220.0);
        assert!(back[[1, 1]].is_nan());
    }

    #[test]
    fn level_axis_length() {
        let err = IsobaricField::new(
            ArrayD::from_elem(IxDyn(&[2, 3]), Some(1.0)),
            vec![100.0, 200.0, 300.0],
            0,
            FieldUnits::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ExtrapolationError::ShapeMismatch(_)));
    }

    #[test]
    fn missing_axis() {
        let err = IsobaricField::new(
            ArrayD::from_elem(IxDyn(&[2]), Some(1.0)),
            vec![100.0, 200.0],
            1,
            FieldUnits::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ExtrapolationError::ShapeMismatch(_)));
    }

    #[test]
    fn sorted_order() {
        let field = IsobaricField::new(
            ArrayD::from_elem(IxDyn(&[3, 1]), Some(1.0)),
            vec![500.0, 1000.0, 10.0],
            0,
            FieldUnits::default(),
        )
        .unwrap();

        assert_eq!(field.sorted_level_order(), vec![2, 0, 1]);
    }

    #[test]
    fn unit_conversion() {
        let mut field = IsobaricField::from_nan_array(
            arr2(&[[0.0, f64::NAN]]).into_dyn(),
            vec![85_000.0],
            0,
            FieldUnits {
                pressure: PressureUnit::Pascal,
                values: ValueUnit::Celsius,
            },
        )
        .unwrap();

        field.to_kelvin().unwrap();
        field.to_hectopascals();

        assert_eq!(field.units(), FieldUnits::default());
        assert_eq!(field.levels(), &[850.0]);
        assert_eq!(field.values()[[0, 0]], Some(273.15));
        assert_eq!(field.values()[[0, 1]], None);
    }

    #[test]
    fn wind_is_not_a_temperature() {
        let mut field = IsobaricField::from_nan_array(
            arr2(&[[12.0, -3.0]]).into_dyn(),
            vec![500.0],
            0,
            FieldUnits::hectopascals(ValueUnit::MetersPerSecond),
        )
        .unwrap();
        let before = field.clone();

        assert!(matches!(
            field.to_kelvin(),
            Err(ExtrapolationError::UnitMismatch { .. })
        ));
        assert_eq!(field, before);
    }

    #[test]
    fn interior_gaps_along_latitude() {
        // (level, latitude, longitude)
        let values = ArrayD::from_shape_vec(
            IxDyn(&[1, 5, 2]),
            vec![
                f64::NAN, 1.0,
                2.0, f64::NAN,
                f64::NAN, f64::NAN,
                f64::NAN, 7.0,
                8.0, f64::NAN,
            ],
        )
        .unwrap();
        let mut field = IsobaricField::from_nan_array(
            values,
            vec![850.0],
            0,
            FieldUnits::hectopascals(ValueUnit::MetersPerSecond),
        )
        .unwrap();

        let filled = field.interpolate_gaps_along(1).unwrap();

        assert_eq!(filled, 4);
        assert_eq!(field.values()[[0, 0, 0]], None);
        assert_abs_diff_eq!(field.values()[[0, 2, 0]].unwrap(), 4.0, epsilon = 1.0E-12);
        assert_abs_diff_eq!(field.values()[[0, 3, 0]].unwrap(), 6.0, epsilon = 1.0E-12);
        assert_abs_diff_eq!(field.values()[[0, 1, 1]].unwrap(), 3.0, epsilon = 1.0E-12);
        assert_abs_diff_eq!(field.values()[[0, 2, 1]].unwrap(), 5.0, epsilon = 1.0E-12);
        assert_eq!(field.values()[[0, 4, 1]], None);
    }

    #[test]
    fn gaps_not_interpolated_across_levels() {
        let mut field = field();

        assert!(matches!(
            field.interpolate_gaps_along(0),
            Err(ExtrapolationError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn fill_only_missing() {
        let mut field = field();

        let filled = field.fill_level_from(1, 0, 10.0);

        assert_eq!(filled, 1);
        assert_eq!(field.values()[[1, 0]], Some(230.0));
        // seed cell missing, stays missing
        assert_eq!(field.values()[[1, 1]], None);
        // present cell untouched
        assert_eq!(field.values()[[1, 2]], Some(280.0));
    }
}
