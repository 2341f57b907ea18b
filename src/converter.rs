use std::marker::PhantomData;

use num_traits::Float;

use crate::adc::AdcSource;
use crate::config::{SaturationPolicy, SensorConfig};
use crate::error::ConversionError;
use crate::gas::{Channel, Gas, Unit, Units};
use crate::math::{cast, divider_resistance, mass_density, widen};

/// A gas concentration together with the unit it is expressed in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Concentration<E> {
    pub gas: Gas,
    pub value: E,
    pub unit: Unit,
}

/// Sensor resistances from a single read of every lane.
///
/// Each lane keeps its own outcome, so a saturated NH3 element does not prevent a CO reading
/// taken at the same instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot<E> {
    ammonia: Result<E, ConversionError>,
    carbon_monoxide: Result<E, ConversionError>,
    nitrogen_dioxide: Result<E, ConversionError>,
}

impl<E: Float> Snapshot<E> {
    /// Resistance of the element on `channel`, in kΩ
    ///
    /// # Errors
    /// Forwards the error recorded when the lane was read.
    pub fn resistance(&self, channel: Channel) -> Result<E, ConversionError> {
        match channel {
            Channel::Ammonia => self.ammonia,
            Channel::CarbonMonoxide => self.carbon_monoxide,
            Channel::NitrogenDioxide => self.nitrogen_dioxide,
        }
    }

    /// Resistance ratio $R_s / R_0$ for `gas`
    ///
    /// # Errors
    /// Forwards the error recorded when the lane was read.
    pub fn ratio(&self, gas: Gas, config: &SensorConfig) -> Result<E, ConversionError> {
        let rs = self.resistance(gas.channel())?;
        Ok(cast(widen(rs) / config.baseline_resistance.get(gas)))
    }

    /// Concentration of `gas` in the requested unit system
    ///
    /// # Errors
    /// - the lane error if the sample could not be converted to a resistance
    /// - [`ConversionError::OutOfRange`] if the fit leaves the validated range; no unit
    ///   conversion is attempted in that case
    /// - [`ConversionError::Invalid`] if the result is NaN
    pub fn concentration(
        &self,
        gas: Gas,
        units: Units,
        config: &SensorConfig,
    ) -> Result<Concentration<E>, ConversionError> {
        let ratio = self.ratio(gas, config)?;
        let ppm = config.curves.get(gas).concentration(gas, ratio)?;

        let (value, unit) = match units {
            Units::Ppm => (ppm, Unit::PartsPerMillion),
            Units::Engineering => (
                engineering_value(gas, ppm, config.molar_volume),
                gas.mass_unit(),
            ),
        };
        if value.is_nan() {
            return Err(ConversionError::Invalid { gas });
        }
        log::debug!("{gas}: ratio {} -> {} {unit}", widen(ratio), widen(value));

        Ok(Concentration { gas, value, unit })
    }
}

/// Concentrations of every gas computed from one [`Snapshot`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report<E> {
    readings: [Result<Concentration<E>, ConversionError>; 3],
}

impl<E: Float> Report<E> {
    pub fn from_snapshot(snapshot: &Snapshot<E>, units: Units, config: &SensorConfig) -> Self {
        Self {
            readings: Gas::ALL.map(|gas| snapshot.concentration(gas, units, config)),
        }
    }

    pub fn get(&self, gas: Gas) -> &Result<Concentration<E>, ConversionError> {
        &self.readings[usize::from(gas.id())]
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (Gas, &Result<Concentration<E>, ConversionError>)> + '_ {
        Gas::ALL.into_iter().zip(self.readings.iter())
    }
}

/// Scale a ppm reading to the mass density unit reported for `gas`.
///
/// Trace gases are taken to ppb first, in `E`, so the result lands in µg/m³.
pub(crate) fn engineering_value<E: Float>(gas: Gas, ppm: E, molar_volume: f64) -> E {
    let scaled = match gas {
        Gas::CarbonMonoxide => ppm,
        Gas::Ammonia | Gas::NitrogenDioxide => ppm * cast(1000.0),
    };
    mass_density(scaled, gas.molar_mass(), molar_volume)
}

/// Converts raw samples from a three-lane gas sensor into concentrations.
///
/// The converter owns its [`AdcSource`] and reads every lane afresh on each call; nothing is
/// cached between conversions. `E` is the working float type, `f32` by default to match the
/// precision of the sensor board firmware.
pub struct GasConcentrationConverter<A, E = f32> {
    adc: A,
    config: SensorConfig,
    phantom_data: PhantomData<E>,
}

impl<A: AdcSource, E: Float> GasConcentrationConverter<A, E> {
    pub const fn new(adc: A, config: SensorConfig) -> Self {
        Self {
            adc,
            config,
            phantom_data: PhantomData,
        }
    }

    /// A converter for the reference board: 56 kΩ load, 10-bit converter, datasheet
    /// baselines and curves
    pub fn with_reference_board(adc: A) -> Self {
        Self::new(adc, SensorConfig::default())
    }

    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    pub fn into_inner(self) -> A {
        self.adc
    }

    pub(crate) fn read(&mut self, channel: Channel) -> u16 {
        let sample = self.adc.read(channel);
        log::trace!("{channel}: sample {sample}");
        sample
    }

    /// Convert a raw sample from `channel` to sensor resistance in kΩ.
    ///
    /// # Errors
    /// - [`ConversionError::SampleOutOfRange`] if `sample` exceeds the converter full scale
    /// - [`ConversionError::DivideByZero`] if `sample` is at full scale and the
    ///   [`SaturationPolicy`] is `Reject`
    pub fn resistance_from_sample(
        &self,
        channel: Channel,
        sample: u16,
    ) -> Result<E, ConversionError> {
        let full_scale = self.config.adc_full_scale;
        if sample > full_scale {
            log::warn!("{channel}: sample {sample} above full scale {full_scale}");
            return Err(ConversionError::SampleOutOfRange {
                channel,
                sample,
                full_scale,
            });
        }
        let sample = if sample == full_scale {
            match self.config.saturation {
                SaturationPolicy::Reject => {
                    log::warn!("{channel}: saturated at {sample}");
                    return Err(ConversionError::DivideByZero { channel });
                }
                SaturationPolicy::Clamp => full_scale.saturating_sub(1),
            }
        } else {
            sample
        };
        Ok(divider_resistance(
            self.config.load_resistance,
            full_scale,
            sample,
        ))
    }

    /// Read `channel` and convert it to sensor resistance in kΩ
    ///
    /// # Errors
    /// See [`GasConcentrationConverter::resistance_from_sample`].
    pub fn sensor_resistance(&mut self, channel: Channel) -> Result<E, ConversionError> {
        let sample = self.read(channel);
        self.resistance_from_sample(channel, sample)
    }

    /// Read all three lanes once, in NH3, CO, NO2 order
    pub fn snapshot(&mut self) -> Snapshot<E> {
        let ammonia = self.sensor_resistance(Channel::Ammonia);
        let carbon_monoxide = self.sensor_resistance(Channel::CarbonMonoxide);
        let nitrogen_dioxide = self.sensor_resistance(Channel::NitrogenDioxide);
        Snapshot {
            ammonia,
            carbon_monoxide,
            nitrogen_dioxide,
        }
    }

    /// Read every lane and compute the concentration of `gas`
    ///
    /// # Errors
    /// See [`Snapshot::concentration`].
    pub fn concentration(
        &mut self,
        gas: Gas,
        units: Units,
    ) -> Result<Concentration<E>, ConversionError> {
        let snapshot = self.snapshot();
        snapshot.concentration(gas, units, &self.config)
    }

    /// Concentration of `gas` in ppm
    ///
    /// # Errors
    /// See [`Snapshot::concentration`].
    pub fn concentration_ppm(&mut self, gas: Gas) -> Result<Concentration<E>, ConversionError> {
        self.concentration(gas, Units::Ppm)
    }

    /// Concentration of `gas` in mg/m³ (CO) or µg/m³ (NO2, NH3)
    ///
    /// # Errors
    /// See [`Snapshot::concentration`].
    pub fn concentration_engineering_units(
        &mut self,
        gas: Gas,
    ) -> Result<Concentration<E>, ConversionError> {
        self.concentration(gas, Units::Engineering)
    }

    /// Every gas from a single read of the three lanes
    pub fn read_all(&mut self, units: Units) -> Report<E> {
        let snapshot = self.snapshot();
        Report::from_snapshot(&snapshot, units, &self.config)
    }
}
