//! Carrier profiles and per-mode parameter resolution.
//!
//! A profile carries the raw fields of a vessel/vehicle model as they appear
//! in carrier catalogs. Which fields matter depends on the transport mode, so
//! planning first resolves a profile into [`CarrierParameters`] for the mode
//! being planned, failing fast when a required field is absent.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mode::{FuelUnit, TransportMode};

/// Approximate density of jet fuel, used to turn a mass burn rate into litres.
pub const JET_FUEL_DENSITY_KG_PER_L: f64 = 0.8;

/// Raw carrier attributes loaded from a carrier catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierProfile {
    pub name: String,
    /// Mode the carrier is listed under in its catalog.
    pub mode: TransportMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_capacity_tons: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_capacity_l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_tons_per_nm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_l_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_l_per_100km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_kg_per_hr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_speed_knots: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cruise_speed_kmh: Option<f64>,
}

/// Mode-specific numbers the graph builder and search engine work with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierParameters {
    /// Tank capacity in the request's fuel unit.
    pub capacity: f64,
    /// Fuel burned per distance unit of the mode (nm or km).
    pub consumption_per_distance: f64,
    /// Cruise speed in distance units per hour.
    pub speed: f64,
}

impl CarrierParameters {
    /// Distance a full tank covers, in the mode's distance unit.
    pub fn range(&self) -> f64 {
        if self.consumption_per_distance > 0.0 {
            self.capacity / self.consumption_per_distance
        } else {
            f64::INFINITY
        }
    }
}

impl CarrierProfile {
    /// Profile with only a name and mode set; fill the remaining fields with
    /// the `with_*` builders.
    pub fn new(name: impl Into<String>, mode: TransportMode) -> Self {
        Self {
            name: name.into(),
            mode,
            fuel_capacity_tons: None,
            fuel_capacity_l: None,
            consumption_tons_per_nm: None,
            consumption_l_per_km: None,
            consumption_l_per_100km: None,
            consumption_kg_per_hr: None,
            service_speed_knots: None,
            cruise_speed_kmh: None,
        }
    }

    /// Convenience constructor for ocean-going vessels.
    pub fn maritime(name: impl Into<String>, capacity_tons: f64, tons_per_nm: f64) -> Self {
        let mut profile = Self::new(name, TransportMode::Maritime);
        profile.fuel_capacity_tons = Some(capacity_tons);
        profile.consumption_tons_per_nm = Some(tons_per_nm);
        profile
    }

    /// Convenience constructor for litre-fuelled carriers (air, road, rail).
    pub fn liquid(
        name: impl Into<String>,
        mode: TransportMode,
        capacity_l: f64,
        l_per_km: f64,
    ) -> Self {
        let mut profile = Self::new(name, mode);
        profile.fuel_capacity_l = Some(capacity_l);
        profile.consumption_l_per_km = Some(l_per_km);
        profile
    }

    pub fn with_service_speed_knots(mut self, knots: f64) -> Self {
        self.service_speed_knots = Some(knots);
        self
    }

    pub fn with_cruise_speed_kmh(mut self, kmh: f64) -> Self {
        self.cruise_speed_kmh = Some(kmh);
        self
    }

    /// Validate every populated numeric field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::CarrierDataValidation {
                message: "carrier name must not be empty".to_string(),
            });
        }

        let fields = [
            (self.fuel_capacity_tons, "fuel_capacity_tons"),
            (self.fuel_capacity_l, "fuel_capacity_l"),
            (self.consumption_tons_per_nm, "consumption_tons_per_nm"),
            (self.consumption_l_per_km, "consumption_l_per_km"),
            (self.consumption_l_per_100km, "consumption_l_per_100km"),
            (self.consumption_kg_per_hr, "consumption_kg_per_hr"),
            (self.service_speed_knots, "service_speed_knots"),
            (self.cruise_speed_kmh, "cruise_speed_kmh"),
        ];

        for (value, field) in fields {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(Error::CarrierDataValidation {
                        message: format!(
                            "{field} for carrier '{}' must be a finite positive number",
                            self.name
                        ),
                    });
                }
            }
        }

        Ok(())
    }

    /// Tank capacity expressed in `unit`, if the profile records it.
    pub fn capacity_in(&self, unit: FuelUnit) -> Option<f64> {
        match unit {
            FuelUnit::Tons => self.fuel_capacity_tons,
            FuelUnit::Liters => self.fuel_capacity_l,
        }
    }

    /// Resolve the fields relevant to `mode` into planning parameters.
    ///
    /// # Errors
    /// - [`Error::Configuration`] when `fuel_unit` does not match the mode or a
    ///   required capacity/consumption field is missing.
    /// - [`Error::DegenerateInput`] when the resolved capacity, consumption or
    ///   speed is not a usable number.
    pub fn resolve(&self, mode: TransportMode, fuel_unit: FuelUnit) -> Result<CarrierParameters> {
        let expected_unit = mode.natural_fuel_unit();
        if fuel_unit != expected_unit {
            return Err(Error::Configuration {
                message: format!(
                    "{mode} planning uses fuel in {expected_unit}, but {fuel_unit} was requested"
                ),
            });
        }

        let (capacity_field, consumption, speed) = match mode {
            TransportMode::Maritime => {
                let consumption = self.consumption_tons_per_nm.ok_or_else(|| {
                    self.missing("consumption_tons_per_nm", mode)
                })?;
                let speed = self
                    .service_speed_knots
                    .unwrap_or_else(|| mode.default_speed());
                ("fuel_capacity_tons", consumption, speed)
            }
            TransportMode::Air => {
                let speed = self.cruise_speed_kmh.unwrap_or_else(|| mode.default_speed());
                let consumption = match (self.consumption_l_per_km, self.consumption_kg_per_hr) {
                    (Some(per_km), _) => per_km,
                    (None, Some(kg_per_hr)) => (kg_per_hr / speed) / JET_FUEL_DENSITY_KG_PER_L,
                    (None, None) => {
                        return Err(self.missing(
                            "consumption_l_per_km or consumption_kg_per_hr",
                            mode,
                        ))
                    }
                };
                ("fuel_capacity_l", consumption, speed)
            }
            TransportMode::Road | TransportMode::Rail => {
                let consumption = match (self.consumption_l_per_km, self.consumption_l_per_100km)
                {
                    (Some(per_km), _) => per_km,
                    (None, Some(per_100km)) => per_100km / 100.0,
                    (None, None) => {
                        return Err(self.missing(
                            "consumption_l_per_km or consumption_l_per_100km",
                            mode,
                        ))
                    }
                };
                let speed = self.cruise_speed_kmh.unwrap_or_else(|| mode.default_speed());
                ("fuel_capacity_l", consumption, speed)
            }
        };

        let capacity = self
            .capacity_in(fuel_unit)
            .ok_or_else(|| self.missing(capacity_field, mode))?;

        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(Error::DegenerateInput {
                message: format!("fuel capacity must be positive, got {capacity}"),
            });
        }
        if !consumption.is_finite() || consumption < 0.0 {
            return Err(Error::DegenerateInput {
                message: format!("consumption rate must be non-negative, got {consumption}"),
            });
        }
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::DegenerateInput {
                message: format!("speed must be positive, got {speed}"),
            });
        }

        Ok(CarrierParameters {
            capacity,
            consumption_per_distance: consumption,
            speed,
        })
    }

    fn missing(&self, field: &str, mode: TransportMode) -> Error {
        Error::Configuration {
            message: format!(
                "carrier '{}' has no {field}, which {mode} planning requires",
                self.name
            ),
        }
    }
}
