//! Transport modes and the unit conventions attached to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::KM_PER_NM;

/// Supported transport modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Ocean shipping; distances in nautical miles, fuel in tons.
    Maritime,
    Air,
    Road,
    Rail,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Maritime,
        TransportMode::Air,
        TransportMode::Road,
        TransportMode::Rail,
    ];

    /// Distance unit used for travel in this mode.
    pub fn distance_unit(self) -> DistanceUnit {
        match self {
            TransportMode::Maritime => DistanceUnit::NauticalMiles,
            TransportMode::Air | TransportMode::Road | TransportMode::Rail => {
                DistanceUnit::Kilometers
            }
        }
    }

    /// Fuel unit carriers of this mode are provisioned in.
    pub fn natural_fuel_unit(self) -> FuelUnit {
        match self {
            TransportMode::Maritime => FuelUnit::Tons,
            TransportMode::Air | TransportMode::Road | TransportMode::Rail => FuelUnit::Liters,
        }
    }

    /// Cruise speed used when a carrier profile does not supply one, in
    /// distance units per hour (knots for maritime, km/h otherwise).
    pub fn default_speed(self) -> f64 {
        match self {
            TransportMode::Maritime => 14.0,
            TransportMode::Air => 800.0,
            TransportMode::Road => 70.0,
            TransportMode::Rail => 40.0,
        }
    }

    /// Fuel quantum used when a request does not set one, in the mode's
    /// natural fuel unit: 1 t for maritime, 100 L for air, 50 L on land.
    pub fn default_step_size(self) -> f64 {
        match self {
            TransportMode::Maritime => 1.0,
            TransportMode::Air => 100.0,
            TransportMode::Road | TransportMode::Rail => 50.0,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TransportMode::Maritime => "maritime",
            TransportMode::Air => "air",
            TransportMode::Road => "road",
            TransportMode::Rail => "rail",
        };
        f.write_str(value)
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maritime" | "ocean" | "sea" => Ok(TransportMode::Maritime),
            "air" => Ok(TransportMode::Air),
            "road" => Ok(TransportMode::Road),
            "rail" => Ok(TransportMode::Rail),
            _ => Err(Error::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Unit in which fuel is measured and priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelUnit {
    /// Mass units (metric tons).
    Tons,
    /// Volume units (litres).
    Liters,
}

impl FuelUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            FuelUnit::Tons => "t",
            FuelUnit::Liters => "L",
        }
    }
}

impl fmt::Display for FuelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FuelUnit::Tons => "tons",
            FuelUnit::Liters => "liters",
        })
    }
}

/// Unit in which transition distances are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    NauticalMiles,
    Kilometers,
}

impl DistanceUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            DistanceUnit::NauticalMiles => "nm",
            DistanceUnit::Kilometers => "km",
        }
    }

    /// Convert `distance` in this unit to kilometres.
    pub fn to_kilometers(self, distance: f64) -> f64 {
        match self {
            DistanceUnit::NauticalMiles => distance * KM_PER_NM,
            DistanceUnit::Kilometers => distance,
        }
    }
}
