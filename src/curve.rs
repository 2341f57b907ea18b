use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::gas::Gas;
use crate::math::{cast, widen};

/// Empirical fit from resistance ratio $R_s / R_0$ to concentration in ppm
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Response {
    /// $c = k \left(R_s / R_0\right)^{n}$
    PowerLaw { coefficient: f64, exponent: f64 },
    /// $c = m \left(R_s / R_0\right) + b$
    Linear { slope: f64, intercept: f64 },
}

/// Closed interval of concentrations (ppm) the fit was validated over
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidRange {
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when `value` falls below `min` or above `max`. NaN is neither, so it is not excluded.
    pub fn excludes(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseCurve {
    pub response: Response,
    pub range: ValidRange,
}

impl ResponseCurve {
    /// Datasheet fit for the reducing (CO) element
    pub const CARBON_MONOXIDE: Self = Self {
        response: Response::PowerLaw {
            coefficient: 4.4922,
            exponent: -1.182,
        },
        range: ValidRange {
            min: 0.1,
            max: 1000.0,
        },
    };

    /// Datasheet fit for the oxidising (NO2) element
    pub const NITROGEN_DIOXIDE: Self = Self {
        response: Response::Linear {
            slope: 0.1499,
            intercept: 0.0042,
        },
        range: ValidRange {
            min: 0.01,
            max: 7.0,
        },
    };

    /// Datasheet fit for the NH3 element
    pub const AMMONIA: Self = Self {
        response: Response::PowerLaw {
            coefficient: 0.5908,
            exponent: -1.918,
        },
        range: ValidRange {
            min: 1.0,
            max: 160.0,
        },
    };

    /// Evaluate the fit at `ratio` without any range check.
    ///
    /// The expression is evaluated in `f64` and narrowed to `E` once, so an `f32` result carries
    /// the same bits the board firmware stores.
    pub fn evaluate<E: Float>(&self, ratio: E) -> E {
        let ratio = widen(ratio);
        let value = match self.response {
            Response::PowerLaw {
                coefficient,
                exponent,
            } => ratio.powf(exponent) * coefficient,
            Response::Linear { slope, intercept } => ratio * slope + intercept,
        };
        cast(value)
    }

    /// Evaluate the fit and check the result.
    ///
    /// The range check runs first and NaN is only detected afterwards, because NaN fails both
    /// bound comparisons. The narrowed value is compared against the `f64` bounds, so an `f32`
    /// reading of `0.01_f32` (just under 0.01) is out of range for a 0.01 lower bound.
    ///
    /// # Errors
    /// - [`ConversionError::OutOfRange`] when the value lies outside [`ResponseCurve::range`]
    /// - [`ConversionError::Invalid`] when the fit produced NaN, e.g. a negative ratio raised to
    ///   a fractional power
    pub fn concentration<E: Float>(&self, gas: Gas, ratio: E) -> Result<E, ConversionError> {
        let value = self.evaluate(ratio);
        if self.range.excludes(widen(value)) {
            log::debug!(
                "{gas} reading {} outside [{}, {}]",
                widen(value),
                self.range.min,
                self.range.max
            );
            return Err(ConversionError::OutOfRange {
                gas,
                value: widen(value),
            });
        }
        if value.is_nan() {
            return Err(ConversionError::Invalid { gas });
        }
        Ok(value)
    }

    /// Invert the fit: the resistance ratio at which the sensor reads `ppm`.
    ///
    /// Returns `None` when `ppm` is outside the valid range, the fit is degenerate, or the
    /// inverse is not a finite non-negative ratio.
    ///
    /// # Examples
    ///
    /// ```
    /// use gas_concentration::curve::ResponseCurve;
    ///
    /// let ratio = ResponseCurve::CARBON_MONOXIDE.ratio_for(4.4922).unwrap();
    /// approx::assert_relative_eq!(ratio, 1.0, max_relative = 1e-12);
    /// ```
    #[must_use]
    pub fn ratio_for(&self, ppm: f64) -> Option<f64> {
        if !self.range.contains(ppm) {
            return None;
        }
        let ratio = match self.response {
            Response::PowerLaw {
                coefficient,
                exponent,
            } => {
                if coefficient == 0.0 || exponent == 0.0 {
                    return None;
                }
                (ppm / coefficient).powf(exponent.recip())
            }
            Response::Linear { slope, intercept } => {
                if slope == 0.0 {
                    return None;
                }
                (ppm - intercept) / slope
            }
        };
        (ratio.is_finite() && ratio >= 0.0).then_some(ratio)
    }
}

/// One response curve per gas
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curves {
    pub ammonia: ResponseCurve,
    pub carbon_monoxide: ResponseCurve,
    pub nitrogen_dioxide: ResponseCurve,
}

impl Curves {
    pub const fn get(&self, gas: Gas) -> &ResponseCurve {
        match gas {
            Gas::Ammonia => &self.ammonia,
            Gas::CarbonMonoxide => &self.carbon_monoxide,
            Gas::NitrogenDioxide => &self.nitrogen_dioxide,
        }
    }
}

impl Default for Curves {
    fn default() -> Self {
        Self {
            ammonia: ResponseCurve::AMMONIA,
            carbon_monoxide: ResponseCurve::CARBON_MONOXIDE,
            nitrogen_dioxide: ResponseCurve::NITROGEN_DIOXIDE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Curves, Response, ResponseCurve, ValidRange};
    use crate::error::ConversionError;
    use crate::gas::Gas;

    #[test]
    fn unit_ratio_reproduces_the_fit_coefficients() {
        approx::assert_relative_eq!(
            ResponseCurve::CARBON_MONOXIDE.evaluate(1.0_f64),
            4.4922
        );
        approx::assert_relative_eq!(
            ResponseCurve::NITROGEN_DIOXIDE.evaluate(1.0_f64),
            0.1541,
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(ResponseCurve::AMMONIA.evaluate(1.0_f64), 0.5908);
    }

    #[test]
    fn ammonia_at_unit_ratio_is_below_the_valid_range() {
        let result = ResponseCurve::AMMONIA.concentration(Gas::Ammonia, 1.0_f32);
        assert!(matches!(
            result,
            Err(ConversionError::OutOfRange {
                gas: Gas::Ammonia,
                ..
            })
        ));
    }

    #[test]
    fn zero_ratio_on_a_power_law_is_out_of_range_not_invalid() {
        // 0^-n is +inf, which fails the upper bound
        let result = ResponseCurve::CARBON_MONOXIDE.concentration(Gas::CarbonMonoxide, 0.0_f64);
        assert_eq!(
            result,
            Err(ConversionError::OutOfRange {
                gas: Gas::CarbonMonoxide,
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn negative_ratio_on_a_power_law_is_invalid() {
        let result = ResponseCurve::CARBON_MONOXIDE.concentration(Gas::CarbonMonoxide, -0.5_f64);
        assert_eq!(
            result,
            Err(ConversionError::Invalid {
                gas: Gas::CarbonMonoxide
            })
        );
    }

    #[test]
    fn nan_ratio_on_a_linear_fit_is_invalid() {
        let result = ResponseCurve::NITROGEN_DIOXIDE.concentration(Gas::NitrogenDioxide, f64::NAN);
        assert_eq!(
            result,
            Err(ConversionError::Invalid {
                gas: Gas::NitrogenDioxide
            })
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let curve = ResponseCurve {
            response: Response::Linear {
                slope: 1.0,
                intercept: 0.0,
            },
            range: ValidRange { min: 1.0, max: 2.0 },
        };
        assert_eq!(curve.concentration(Gas::Ammonia, 1.0_f64), Ok(1.0));
        assert_eq!(curve.concentration(Gas::Ammonia, 2.0_f64), Ok(2.0));
    }

    #[test]
    fn narrowed_values_are_checked_against_the_exact_bounds() {
        let curve = ResponseCurve {
            response: Response::Linear {
                slope: 1.0,
                intercept: 0.0,
            },
            range: ValidRange {
                min: 0.01,
                max: 7.0,
            },
        };
        // 0.01_f32 is 0.009999999776..., below the bound
        assert!(matches!(
            curve.concentration(Gas::NitrogenDioxide, 0.01_f32),
            Err(ConversionError::OutOfRange { .. })
        ));
        assert_eq!(curve.concentration(Gas::NitrogenDioxide, 0.010_001_f32), Ok(0.010_001_f32));
    }

    #[test]
    fn nan_is_not_excluded_by_the_range() {
        let range = ResponseCurve::CARBON_MONOXIDE.range;
        assert!(!range.excludes(f64::NAN));
        assert!(!range.contains(f64::NAN));
        assert!(range.excludes(0.05));
    }

    #[test]
    fn inverse_is_undefined_outside_the_valid_range() {
        assert_eq!(ResponseCurve::AMMONIA.ratio_for(0.5), None);
        assert_eq!(ResponseCurve::NITROGEN_DIOXIDE.ratio_for(8.0), None);
    }

    #[test]
    fn inverse_recovers_the_ratio_for_each_default_curve() {
        let curves = Curves::default();
        for (gas, ppm) in [
            (Gas::Ammonia, 25.0),
            (Gas::CarbonMonoxide, 12.5),
            (Gas::NitrogenDioxide, 0.8),
        ] {
            let curve = curves.get(gas);
            let ratio = curve.ratio_for(ppm).expect("ppm inside the valid range");
            approx::assert_relative_eq!(curve.evaluate(ratio), ppm, max_relative = 1e-12);
        }
    }
}
