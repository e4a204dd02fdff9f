//! Interpolation of model columns from native (hybrid) levels onto fixed
//! pressure levels. Targets outside a column's pressure range have no value.

use {
    crate::{
        error::{ExtrapolationError, Result},
        field::IsobaricField,
        units::{FieldUnits, ValueUnit},
    },
    ndarray::{Array3, Array4, ArrayView3, ArrayView4, ArrayViewMut3, Axis, Zip},
    rayon::prelude::*,
};

/// Linearly interpolates `values` at pressure `target` from a single column.
///
/// `pressure` may be ordered either way. Pairs of levels with a NaN are skipped.
pub fn interp_column(pressure: &[f64], values: &[f64], target: f64) -> Option<f64> {
    if !target.is_finite() {
        return None;
    }

    pressure
        .windows(2)
        .zip(values.windows(2))
        .filter(|(p, v)| p.iter().chain(v.iter()).all(|x| !x.is_nan()))
        .find_map(|(p, v)| {
            let (lo, hi) = if p[0] <= p[1] { (p[0], p[1]) } else { (p[1], p[0]) };
            if target < lo || target > hi {
                None
            } else if p[0] == p[1] {
                Some(v[0])
            } else {
                Some(v[0] + (v[1] - v[0]) * (target - p[0]) / (p[1] - p[0]))
            }
        })
}

/// Interpolates a (level, y, x) model field onto `targets` (hPa).
///
/// The result has the target levels on axis 0 and carries `units`; cells
/// whose column does not span a target pressure are missing.
pub fn interp_levels(
    pressure: ArrayView3<f64>,
    values: ArrayView3<f64>,
    targets: &[f64],
    units: ValueUnit,
) -> Result<IsobaricField> {
    check_inputs(pressure.shape(), values.shape(), targets)?;

    let (_, ny, nx) = values.dim();
    let mut out = Array3::<Option<f64>>::from_elem((targets.len(), ny, nx), None);
    interp_into(out.view_mut(), pressure, values, targets);

    IsobaricField::new(
        out.into_dyn(),
        targets.to_vec(),
        0,
        FieldUnits::hectopascals(units),
    )
}

/// As [`interp_levels`] for a (time, level, y, x) field, time steps in parallel.
///
/// The result has the target levels on axis 1.
pub fn interp_levels_4d(
    pressure: ArrayView4<f64>,
    values: ArrayView4<f64>,
    targets: &[f64],
    units: ValueUnit,
) -> Result<IsobaricField> {
    check_inputs(pressure.shape(), values.shape(), targets)?;

    let (nt, _, ny, nx) = values.dim();
    let mut out = Array4::<Option<f64>>::from_elem((nt, targets.len(), ny, nx), None);

    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(pressure.axis_iter(Axis(0)).into_par_iter())
        .zip(values.axis_iter(Axis(0)).into_par_iter())
        .for_each(|((out, p), v)| interp_into(out, p, v, targets));

    IsobaricField::new(
        out.into_dyn(),
        targets.to_vec(),
        1,
        FieldUnits::hectopascals(units),
    )
}

fn check_inputs(pressure: &[usize], values: &[usize], targets: &[f64]) -> Result<()> {
    if pressure != values {
        return Err(ExtrapolationError::ShapeMismatch(format!(
            "pressure {:?} and values {:?}",
            pressure, values
        )));
    }
    if targets.is_empty() {
        return Err(ExtrapolationError::EmptyLevelSet);
    }
    if let Some(p) = targets.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(ExtrapolationError::InvalidLevels(format!(
            "{} is not a valid target pressure",
            p
        )));
    }
    Ok(())
}

fn interp_into(
    mut out: ArrayViewMut3<Option<f64>>,
    pressure: ArrayView3<f64>,
    values: ArrayView3<f64>,
    targets: &[f64],
) {
    Zip::from(out.lanes_mut(Axis(0)))
        .and(pressure.lanes(Axis(0)))
        .and(values.lanes(Axis(0)))
        .par_apply(|mut out, p, v| {
            let p = p.to_vec();
            let v = v.to_vec();
            out.iter_mut()
                .zip(targets)
                .for_each(|(o, &target)| *o = interp_column(&p, &v, target));
        });
}
