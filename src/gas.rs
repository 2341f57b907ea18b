use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, IdentifierKind};

/// A physical sensing lane on the sensor package.
///
/// Each lane is wired to its own analog input. The raw identifiers `0`, `1` and `2` follow the
/// order the sensor board exposes them in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Ammonia,
    CarbonMonoxide,
    NitrogenDioxide,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Ammonia, Self::CarbonMonoxide, Self::NitrogenDioxide];

    /// The raw identifier of the lane
    pub const fn id(self) -> u8 {
        match self {
            Self::Ammonia => 0,
            Self::CarbonMonoxide => 1,
            Self::NitrogenDioxide => 2,
        }
    }

    /// The gas this lane responds to
    pub const fn gas(self) -> Gas {
        match self {
            Self::Ammonia => Gas::Ammonia,
            Self::CarbonMonoxide => Gas::CarbonMonoxide,
            Self::NitrogenDioxide => Gas::NitrogenDioxide,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = ConversionError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Ammonia),
            1 => Ok(Self::CarbonMonoxide),
            2 => Ok(Self::NitrogenDioxide),
            id => Err(ConversionError::UnknownIdentifier {
                kind: IdentifierKind::Channel,
                id,
            }),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ammonia => "NH3 channel",
            Self::CarbonMonoxide => "CO channel",
            Self::NitrogenDioxide => "NO2 channel",
        };
        f.write_str(name)
    }
}

/// A target gas, used to select the response curve and output unit.
///
/// Shares raw identifiers with [`Channel`] but is kept separate so a lane and the quantity
/// derived from it cannot be mixed up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gas {
    Ammonia,
    CarbonMonoxide,
    NitrogenDioxide,
}

impl Gas {
    pub const ALL: [Self; 3] = [Self::Ammonia, Self::CarbonMonoxide, Self::NitrogenDioxide];

    pub const fn id(self) -> u8 {
        match self {
            Self::Ammonia => 0,
            Self::CarbonMonoxide => 1,
            Self::NitrogenDioxide => 2,
        }
    }

    /// The sensing lane whose resistance drives this gas's reading
    pub const fn channel(self) -> Channel {
        match self {
            Self::Ammonia => Channel::Ammonia,
            Self::CarbonMonoxide => Channel::CarbonMonoxide,
            Self::NitrogenDioxide => Channel::NitrogenDioxide,
        }
    }

    pub const fn formula(self) -> &'static str {
        match self {
            Self::Ammonia => "NH3",
            Self::CarbonMonoxide => "CO",
            Self::NitrogenDioxide => "NO2",
        }
    }

    /// Molecular weight in g/mol
    pub const fn molar_mass(self) -> f64 {
        match self {
            Self::Ammonia => 17.031,
            Self::CarbonMonoxide => 28.01,
            Self::NitrogenDioxide => 46.0055,
        }
    }

    /// The mass-density unit readings of this gas are reported in.
    ///
    /// Carbon monoxide is reported in mg/m³. The trace gases are scaled to ppb before the
    /// molar conversion, which lands them in µg/m³.
    pub const fn mass_unit(self) -> Unit {
        match self {
            Self::CarbonMonoxide => Unit::MilligramsPerCubicMetre,
            Self::Ammonia | Self::NitrogenDioxide => Unit::MicrogramsPerCubicMetre,
        }
    }
}

impl TryFrom<u8> for Gas {
    type Error = ConversionError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Ammonia),
            1 => Ok(Self::CarbonMonoxide),
            2 => Ok(Self::NitrogenDioxide),
            id => Err(ConversionError::UnknownIdentifier {
                kind: IdentifierKind::Gas,
                id,
            }),
        }
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formula())
    }
}

/// Unit system requested from a conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    /// Parts per million, straight from the response curve
    Ppm,
    /// Mass density at 25 °C and 1 atm, see [`Gas::mass_unit`]
    Engineering,
}

/// Unit attached to a computed concentration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "ppm")]
    PartsPerMillion,
    #[serde(rename = "mg/m3")]
    MilligramsPerCubicMetre,
    #[serde(rename = "ug/m3")]
    MicrogramsPerCubicMetre,
}

impl Unit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PartsPerMillion => "ppm",
            Self::MilligramsPerCubicMetre => "mg/m3",
            Self::MicrogramsPerCubicMetre => "ug/m3",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::{Channel, Gas, Unit};
    use crate::error::{ConversionError, IdentifierKind};

    #[test]
    fn raw_identifiers_round_trip_for_every_lane() {
        for channel in Channel::ALL {
            assert_eq!(Channel::try_from(channel.id()), Ok(channel));
        }
        for gas in Gas::ALL {
            assert_eq!(Gas::try_from(gas.id()), Ok(gas));
            assert_eq!(gas.channel().gas(), gas);
        }
    }

    #[test]
    fn unknown_identifiers_are_rejected() {
        assert_eq!(
            Gas::try_from(3_u8),
            Err(ConversionError::UnknownIdentifier {
                kind: IdentifierKind::Gas,
                id: 3
            })
        );
        assert_eq!(
            Channel::try_from(255_u8),
            Err(ConversionError::UnknownIdentifier {
                kind: IdentifierKind::Channel,
                id: 255
            })
        );
    }

    #[test]
    fn carbon_monoxide_is_the_only_gas_reported_in_milligrams() {
        assert_eq!(
            Gas::CarbonMonoxide.mass_unit(),
            Unit::MilligramsPerCubicMetre
        );
        assert_eq!(Gas::Ammonia.mass_unit(), Unit::MicrogramsPerCubicMetre);
        assert_eq!(
            Gas::NitrogenDioxide.mass_unit(),
            Unit::MicrogramsPerCubicMetre
        );
    }
}
