use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::Curves;
use crate::gas::Gas;
use crate::Result;

/// What to do with a sample at the converter's full scale, where the divider equation divides
/// by zero
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationPolicy {
    /// Report [`crate::ConversionError::DivideByZero`]
    #[default]
    Reject,
    /// Treat the sample as one code below full scale
    Clamp,
}

/// Baseline resistance $R_0$ of each element in kΩ
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baselines {
    pub ammonia: f64,
    pub carbon_monoxide: f64,
    pub nitrogen_dioxide: f64,
}

impl Baselines {
    pub const fn get(&self, gas: Gas) -> f64 {
        match gas {
            Gas::Ammonia => self.ammonia,
            Gas::CarbonMonoxide => self.carbon_monoxide,
            Gas::NitrogenDioxide => self.nitrogen_dioxide,
        }
    }
}

impl Default for Baselines {
    fn default() -> Self {
        Self {
            ammonia: 69.9,
            carbon_monoxide: 88.66,
            nitrogen_dioxide: 6.2,
        }
    }
}

/// Everything the conversion needs to know about the board and the sensor
///
/// All fields have defaults matching the reference board, so a configuration file only has to
/// name the values it changes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Load resistor in the divider, kΩ
    pub load_resistance: f64,
    /// Largest code the converter reports
    pub adc_full_scale: u16,
    /// Molar volume of an ideal gas in L/mol at the reporting conditions
    pub molar_volume: f64,
    pub saturation: SaturationPolicy,
    pub baseline_resistance: Baselines,
    pub curves: Curves,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            load_resistance: 56.0,
            adc_full_scale: 1023,
            molar_volume: 24.45,
            saturation: SaturationPolicy::default(),
            baseline_resistance: Baselines::default(),
            curves: Curves::default(),
        }
    }
}

impl SensorConfig {
    /// Read a configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML for this structure, or
    /// fails [`SensorConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err("requested configuration file not found".into());
        }
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded sensor configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration held in memory
    ///
    /// # Errors
    /// Returns an error if `contents` is not valid TOML for this structure, or fails
    /// [`SensorConfig::validate`].
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration describes a physically meaningful sensor.
    ///
    /// Configurations built directly in code skip this check.
    ///
    /// # Errors
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.load_resistance.is_finite() && self.load_resistance > 0.0) {
            return Err(format!(
                "load_resistance must be finite and positive, got {}",
                self.load_resistance
            )
            .into());
        }
        if self.adc_full_scale == 0 {
            return Err("adc_full_scale must be non-zero".into());
        }
        if !(self.molar_volume.is_finite() && self.molar_volume > 0.0) {
            return Err(format!(
                "molar_volume must be finite and positive, got {}",
                self.molar_volume
            )
            .into());
        }
        for gas in Gas::ALL {
            let baseline = self.baseline_resistance.get(gas);
            if !(baseline.is_finite() && baseline > 0.0) {
                return Err(format!(
                    "{gas} baseline resistance must be finite and positive, got {baseline}"
                )
                .into());
            }
            let range = self.curves.get(gas).range;
            if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
                return Err(format!(
                    "{gas} valid range is empty: [{}, {}]",
                    range.min, range.max
                )
                .into());
            }
        }
        Ok(())
    }

    /// Parse the configuration back out to TOML
    ///
    /// # Errors
    /// Returns an error if serialisation fails.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
