use {
    crate::error::{ExtrapolationError, Result},
    metfor::{HectoPascal, Kelvin, Quantity},
    ndarray::{Array, ArrayView, Dimension, Zip},
};

/// Temperature (K) from pressure (hPa) and potential temperature (K)
pub fn temperature_from_potential_temperature(pressure: f64, theta: f64) -> f64 {
    metfor::temperature_from_pot_temp(Kelvin(theta), HectoPascal(pressure)).unpack()
}

/// Applies [`temperature_from_potential_temperature`] to every cell of a model field
pub fn temperature_field<D: Dimension>(
    pressure: ArrayView<f64, D>,
    theta: ArrayView<f64, D>,
) -> Result<Array<f64, D>> {
    if pressure.shape() != theta.shape() {
        return Err(ExtrapolationError::ShapeMismatch(format!(
            "pressure {:?} and potential temperature {:?}",
            pressure.shape(),
            theta.shape()
        )));
    }

    let mut t = Array::<f64, D>::zeros(theta.raw_dim());
    Zip::from(&mut t)
        .and(pressure)
        .and(theta)
        .par_apply(|t, &p, &theta| *t = temperature_from_potential_temperature(p, theta));

    Ok(t)
}
