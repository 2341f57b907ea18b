use num_traits::Float;

/// Bring a configuration constant into the working float type.
///
/// Every `Float` in practice can represent an `f64` (possibly rounded); a type that cannot
/// yields NaN, which the conversion reports as an invalid reading rather than panicking.
pub(crate) fn cast<E: Float>(value: f64) -> E {
    <E as num_traits::NumCast>::from(value).unwrap_or_else(E::nan)
}

/// Widen a working value to `f64` for error payloads and reports
pub(crate) fn widen<E: Float>(value: E) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Resistance of the sensing element in a voltage divider.
///
/// The sensor sits on the high side of the divider with the load resistor to ground, so for a
/// sample `a` taken against a converter full scale `n`
///
/// $$
///     R_s = R_L \frac{a}{n - a}
/// $$
///
/// The quotient is formed in `f64` and narrowed to `E` once, the way the board firmware stores
/// a double expression into a `float`. No guard is applied: `a == n` divides by zero and
/// `a > n` goes negative. Callers decide how to treat those.
///
/// # Examples
///
/// ```
/// use gas_concentration::math::divider_resistance;
///
/// let rs: f64 = divider_resistance(56.0, 1023, 0);
/// assert_eq!(rs, 0.0);
///
/// let rs: f64 = divider_resistance(56.0, 1023, 1023);
/// assert!(rs.is_infinite());
/// ```
pub fn divider_resistance<E: Float>(load_resistance: f64, full_scale: u16, sample: u16) -> E {
    let sample = f64::from(sample);
    cast(load_resistance * sample / (f64::from(full_scale) - sample))
}

/// The sample a divider would report for sensor resistance `rs`, rounded to the nearest code.
///
/// Inverse of [`divider_resistance`]. Returns `None` for negative or non-finite resistances.
#[must_use]
pub fn sample_for_resistance(load_resistance: f64, full_scale: u16, rs: f64) -> Option<u16> {
    if !rs.is_finite() || rs < 0.0 {
        return None;
    }
    // Bounded by `full_scale` because `rs / (load + rs) < 1`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sample = (f64::from(full_scale) * rs / (load_resistance + rs)).round() as u16;
    Some(sample)
}

/// Convert a volumetric concentration to mass per volume using the ideal gas molar volume.
///
/// `molar_volume` is in L/mol (24.45 at 25 °C and 1 atm). The product and quotient are taken in
/// `f64`, multiplication first, and narrowed to `E` once.
pub(crate) fn mass_density<E: Float>(value: E, molar_mass: f64, molar_volume: f64) -> E {
    cast(widen(value) * molar_mass / molar_volume)
}
