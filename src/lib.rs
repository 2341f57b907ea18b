#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

//! Conversion of raw samples from a three-lane metal-oxide gas sensor (NH3, CO, NO2) into gas
//! concentrations.
//!
//! Each lane is a resistive element on the high side of a voltage divider. A sample is turned
//! into the element's resistance $R_s$, divided by the element's baseline $R_0$, and the ratio
//! is pushed through an empirical response curve to give ppm. Concentrations can also be
//! reported as mass density.
//!
//! ```
//! use gas_concentration::{FixedAdc, Gas, GasConcentrationConverter};
//!
//! let mut converter: GasConcentrationConverter<_, f32> =
//!     GasConcentrationConverter::with_reference_board(FixedAdc::new(300, 520, 240));
//!
//! let co = converter.concentration_ppm(Gas::CarbonMonoxide).unwrap();
//! assert!(co.value > 0.1);
//! ```

pub mod adc;
pub mod config;
pub mod converter;
pub mod curve;
pub mod error;
pub mod gas;
pub mod math;
pub mod replay;
pub mod sentinel;

pub use adc::{AdcSource, FixedAdc};
pub use config::{Baselines, SaturationPolicy, SensorConfig};
pub use converter::{Concentration, GasConcentrationConverter, Report, Snapshot};
pub use curve::{Curves, Response, ResponseCurve, ValidRange};
pub use error::{ConversionError, IdentifierKind};
pub use gas::{Channel, Gas, Unit, Units};

pub type Result<T> = ::std::result::Result<T, Box<dyn ::std::error::Error>>;
