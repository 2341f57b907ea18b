use std::fmt;

use thiserror::Error;

use crate::gas::{Channel, Gas};

/// Which identifier space a raw id was looked up in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierKind {
    Channel,
    Gas,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel => f.write_str("channel"),
            Self::Gas => f.write_str("gas"),
        }
    }
}

/// Why a reading could not be turned into a concentration.
///
/// The sentinel functions fold these back into `0` and `-1`; the typed API hands them to the
/// caller so a reading that is legitimately outside the sensor's range can be told apart from
/// one that is numerically meaningless.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConversionError {
    #[error("{gas} concentration {value} is outside the sensor's valid range")]
    OutOfRange { gas: Gas, value: f64 },

    #[error("{gas} concentration is not a number")]
    Invalid { gas: Gas },

    #[error("{channel} is saturated, the divider resistance is unbounded")]
    DivideByZero { channel: Channel },

    #[error("unknown {kind} identifier {id}")]
    UnknownIdentifier { kind: IdentifierKind, id: u8 },

    #[error("{channel} returned sample {sample} above the converter full scale {full_scale}")]
    SampleOutOfRange {
        channel: Channel,
        sample: u16,
        full_scale: u16,
    },
}
