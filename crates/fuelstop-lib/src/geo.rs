//! Geographic coordinates and great-circle distance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per nautical mile.
pub const KM_PER_NM: f64 = 1.852;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::DegenerateInput {
                message: format!("latitude must be within [-90, 90], got {}", self.lat),
            });
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::DegenerateInput {
                message: format!("longitude must be within [-180, 180], got {}", self.lon),
            });
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        great_circle_distance_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Great-circle distance to another coordinate in nautical miles.
    pub fn distance_nm(&self, other: &Self) -> f64 {
        great_circle_distance_nm(self.lat, self.lon, other.lat, other.lon)
    }

    /// Position on the unit sphere, used for chord-length neighbour queries.
    pub fn unit_vector(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::DegenerateInput {
            message: format!("expected coordinate as 'lat,lon', got '{s}'"),
        };

        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;

        let coord = Coordinate::new(lat, lon);
        coord.validate()?;
        Ok(coord)
    }
}

/// Haversine distance in kilometres between two points given in degrees.
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance in nautical miles between two points given in degrees.
pub fn great_circle_distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    great_circle_distance_km(lat1, lon1, lat2, lon2) / KM_PER_NM
}

/// Degrees of longitude spanned by `distance_nm` along the equator.
///
/// Handy for laying out test fixtures at exact distances.
pub fn equatorial_degrees_for_nm(distance_nm: f64) -> f64 {
    (distance_nm * KM_PER_NM / EARTH_RADIUS_KM).to_degrees()
}
