use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::mode::TransportMode;

/// Id of the virtual node synthesized at the trip origin.
pub const ORIGIN_ID: &str = "origin";
/// Id of the virtual node synthesized at the trip destination.
pub const DESTINATION_ID: &str = "destination";

/// Classification of a planning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Origin,
    Destination,
    Port,
    Airport,
    Station,
}

impl NodeKind {
    /// Catalog node kind that serves `mode`. Road and rail share stations.
    pub fn for_mode(mode: TransportMode) -> Self {
        match mode {
            TransportMode::Maritime => NodeKind::Port,
            TransportMode::Air => NodeKind::Airport,
            TransportMode::Road | TransportMode::Rail => NodeKind::Station,
        }
    }

    /// Whether the node is synthesized by the planner rather than catalogued.
    pub fn is_virtual(self) -> bool {
        matches!(self, NodeKind::Origin | NodeKind::Destination)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Origin => "origin",
            NodeKind::Destination => "destination",
            NodeKind::Port => "port",
            NodeKind::Airport => "airport",
            NodeKind::Station => "station",
        })
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "port" => Ok(NodeKind::Port),
            "airport" => Ok(NodeKind::Airport),
            "station" => Ok(NodeKind::Station),
            other => Err(Error::NodeDataValidation {
                message: format!("unknown node kind '{other}'; expected port, airport or station"),
            }),
        }
    }
}

/// A location the carrier can pass through and, when priced, refuel at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Locode, IATA code or similar external identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub coordinate: Coordinate,
    /// Price per fuel unit. `None` means fuel cannot be bought here.
    pub price_per_unit: Option<f64>,
    /// Fixed fee charged when refuelling here.
    pub stop_fee: f64,
}

impl Node {
    /// Virtual, unpriced node at the trip origin.
    pub fn origin(coordinate: Coordinate) -> Self {
        Self {
            id: ORIGIN_ID.to_string(),
            name: "Origin".to_string(),
            kind: NodeKind::Origin,
            code: None,
            coordinate,
            price_per_unit: None,
            stop_fee: 0.0,
        }
    }

    /// Virtual, unpriced node at the trip destination.
    pub fn destination(coordinate: Coordinate) -> Self {
        Self {
            id: DESTINATION_ID.to_string(),
            name: "Destination".to_string(),
            kind: NodeKind::Destination,
            code: None,
            coordinate,
            price_per_unit: None,
            stop_fee: 0.0,
        }
    }

    pub fn is_priced(&self) -> bool {
        self.price_per_unit.is_some()
    }

    /// Validate coordinate range, price and fee.
    pub fn validate(&self) -> Result<()> {
        self.coordinate
            .validate()
            .map_err(|err| {
                let detail = match err {
                    Error::DegenerateInput { message } => message,
                    other => other.to_string(),
                };
                Error::NodeDataValidation {
                    message: format!("node '{}': {detail}", self.name),
                }
            })?;

        if let Some(price) = self.price_per_unit {
            if !price.is_finite() || price < 0.0 {
                return Err(Error::NodeDataValidation {
                    message: format!(
                        "node '{}': price_per_unit must be finite and non-negative, got {price}",
                        self.name
                    ),
                });
            }
        }
        if !self.stop_fee.is_finite() || self.stop_fee < 0.0 {
            return Err(Error::NodeDataValidation {
                message: format!(
                    "node '{}': stop_fee must be finite and non-negative, got {}",
                    self.name, self.stop_fee
                ),
            });
        }
        Ok(())
    }
}
