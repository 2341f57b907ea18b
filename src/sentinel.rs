//! Flat numeric interface of the sensor board firmware.
//!
//! Identifiers are raw integers and every failure is folded into the returned number:
//!
//! | outcome | value |
//! |---|---|
//! | unknown channel or gas | `0` |
//! | concentration outside the valid range | `0` |
//! | NaN | `-1` |
//!
//! With `E = f32` the results are bit for bit those of the firmware. Each expression is
//! evaluated in `f64` and narrowed to `E` where the firmware stores a `float`: the resistance,
//! the ratio, the fitted value and the mass density. The ppb scaling stays in `E`. The range
//! check compares the narrowed value against the exact bounds and runs before the NaN check.
//! A saturated sample gives an infinite resistance, which the range check then turns into a
//! `0` concentration. [`SaturationPolicy::Clamp`] is honoured; `Reject` has no
//! numeric encoding here and behaves like the firmware.

use num_traits::Float;

use crate::adc::AdcSource;
use crate::config::SaturationPolicy;
use crate::converter::{engineering_value, Concentration, GasConcentrationConverter};
use crate::error::ConversionError;
use crate::gas::{Channel, Gas, Units};
use crate::math::{cast, divider_resistance, widen};

impl<A: AdcSource, E: Float> GasConcentrationConverter<A, E> {
    fn raw_resistance(&mut self, channel: Channel) -> E {
        let config = *self.config();
        let mut sample = self.read(channel);
        if sample == config.adc_full_scale && config.saturation == SaturationPolicy::Clamp {
            sample = config.adc_full_scale.saturating_sub(1);
        }
        divider_resistance(config.load_resistance, config.adc_full_scale, sample)
    }

    /// Sensor resistance in kΩ for raw channel id `channel` (NH3 = 0, CO = 1, NO2 = 2).
    ///
    /// Unknown ids return `0` without touching the converter.
    pub fn get_sensor_rs(&mut self, channel: u8) -> E {
        Channel::try_from(channel)
            .map_or_else(|_| E::zero(), |channel| self.raw_resistance(channel))
    }

    /// Concentration in ppm for raw gas id `gas`, `0` when out of range, `-1` on NaN
    pub fn calc_gas_p(&mut self, gas: u8) -> E {
        self.flat_concentration(gas, Units::Ppm)
    }

    /// Concentration in mg/m³ (CO) or µg/m³ (NO2, NH3) for raw gas id `gas`, `0` when out of
    /// range, `-1` on NaN
    pub fn calc_gas(&mut self, gas: u8) -> E {
        self.flat_concentration(gas, Units::Engineering)
    }

    fn flat_concentration(&mut self, gas: u8, units: Units) -> E {
        // All three lanes are read before the id is looked at
        let ammonia = self.raw_resistance(Channel::Ammonia);
        let carbon_monoxide = self.raw_resistance(Channel::CarbonMonoxide);
        let nitrogen_dioxide = self.raw_resistance(Channel::NitrogenDioxide);

        let Ok(gas) = Gas::try_from(gas) else {
            return E::zero();
        };
        let rs = match gas {
            Gas::Ammonia => ammonia,
            Gas::CarbonMonoxide => carbon_monoxide,
            Gas::NitrogenDioxide => nitrogen_dioxide,
        };

        let config = self.config();
        let ratio: E = cast(widen(rs) / config.baseline_resistance.get(gas));
        let curve = config.curves.get(gas);

        let mut c = curve.evaluate(ratio);
        if curve.range.excludes(widen(c)) {
            c = E::zero();
        } else if units == Units::Engineering {
            c = engineering_value(gas, c, config.molar_volume);
        }

        if c.is_nan() {
            -E::one()
        } else {
            c
        }
    }
}

/// Fold a typed outcome into the firmware's numeric encoding.
///
/// `OutOfRange`, `UnknownIdentifier` and `DivideByZero` become `0`, and `Invalid` becomes `-1`,
/// matching what the firmware returns for the same inputs.
///
/// `SampleOutOfRange` also becomes `-1`, which the firmware does not always agree with. Above
/// full scale it computes a negative resistance, and what that yields depends on the fit: NaN
/// (`-1`) from a power law, but a negative and so out of range (`0`) value from the linear NO2
/// fit.
pub fn flatten<E: Float>(outcome: Result<Concentration<E>, ConversionError>) -> E {
    match outcome {
        Ok(concentration) => concentration.value,
        Err(
            ConversionError::OutOfRange { .. }
            | ConversionError::UnknownIdentifier { .. }
            | ConversionError::DivideByZero { .. },
        ) => E::zero(),
        Err(ConversionError::Invalid { .. } | ConversionError::SampleOutOfRange { .. }) => {
            -E::one()
        }
    }
}
