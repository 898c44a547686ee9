//! Carrier catalog loading and lookup.
//!
//! Catalogs come either as CSV (one row per carrier, with a `mode` column) or
//! as a JSON document grouping carriers by mode:
//!
//! ```json
//! { "ocean": { "bulkcarrier-75000DWT": { "fuel_capacity_tons": 2500, ... } } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::mode::TransportMode;

use super::profile::CarrierProfile;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Optional numeric columns, with the header synonyms accepted for each.
const NUMERIC_COLUMNS: &[(&str, &[&str])] = &[
    (
        "fuel_capacity_tons",
        &["fuel_capacity_tons", "capacity_tons", "bunker_capacity_tons"],
    ),
    (
        "fuel_capacity_l",
        &["fuel_capacity_l", "fuel_capacity_liters", "capacity_l", "tank_l"],
    ),
    ("consumption_tons_per_nm", &["consumption_tons_per_nm", "tons_per_nm"]),
    ("consumption_l_per_km", &["consumption_l_per_km", "l_per_km"]),
    (
        "consumption_l_per_100km",
        &["consumption_l_per_100km", "l_per_100km"],
    ),
    ("consumption_kg_per_hr", &["consumption_kg_per_hr", "kg_per_hr"]),
    ("service_speed_knots", &["service_speed_knots", "speed_knots"]),
    ("cruise_speed_kmh", &["cruise_speed_kmh", "speed_kmh"]),
];

/// Collection of carrier profiles keyed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct CarrierCatalog {
    carriers: HashMap<String, CarrierProfile>,
    source: Option<PathBuf>,
}

impl CarrierCatalog {
    /// Build a catalog from profiles already in memory.
    pub fn from_profiles(profiles: impl IntoIterator<Item = CarrierProfile>) -> Result<Self> {
        let mut catalog = Self::default();
        for profile in profiles {
            catalog.insert(profile)?;
        }
        Ok(catalog)
    }

    /// Load a catalog from a file path, choosing the format by extension
    /// (`.json` for the grouped document, anything else as CSV).
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut catalog = if is_json {
            Self::from_json_reader(file)?
        } else {
            Self::from_csv_reader(file)?
        };
        catalog.source = Some(path.to_path_buf());
        info!(
            "loaded {} carrier profiles from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load a catalog from CSV. `name` and `mode` columns are required; every
    /// other column is optional and an empty cell means "not provided".
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::CarrierDataValidation {
                message: format!("failed to read carrier catalog headers: {err}"),
            })?
            .clone();

        let name_idx = find_column(&headers, &["name", "carrier", "carrier_model", "model"]);
        let mode_idx = find_column(&headers, &["mode", "transport_mode", "type"]);
        let (Some(name_idx), Some(mode_idx)) = (name_idx, mode_idx) else {
            return Err(Error::CarrierDataValidation {
                message: format!(
                    "carrier catalog requires 'name' and 'mode' columns. Available: {}",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        };

        let numeric_idx: BTreeMap<&str, usize> = NUMERIC_COLUMNS
            .iter()
            .filter_map(|(canon, alts)| find_column(&headers, alts).map(|i| (*canon, i)))
            .collect();

        let mut catalog = Self::default();
        for (offset, result) in csv_reader.records().enumerate() {
            // Header is line 1.
            let row = offset + 2;
            let record = result.map_err(|e| Error::CarrierDataValidation {
                message: e.to_string(),
            })?;

            let name = record.get(name_idx).unwrap_or_default().to_string();
            let mode: TransportMode = record
                .get(mode_idx)
                .unwrap_or_default()
                .parse::<TransportMode>()
                .map_err(|err| Error::CarrierDataValidation {
                    message: format!("carrier '{name}' at row {row}: {err}"),
                })?;

            let number = |field: &str| -> Result<Option<f64>> {
                let Some(raw) = numeric_idx.get(field).and_then(|&i| record.get(i)) else {
                    return Ok(None);
                };
                if raw.is_empty() {
                    return Ok(None);
                }
                raw.parse::<f64>()
                    .map(Some)
                    .map_err(|e| Error::CarrierDataValidation {
                        message: format!("invalid {field} for carrier '{name}' at row {row}: {e}"),
                    })
            };

            let profile = CarrierProfile {
                fuel_capacity_tons: number("fuel_capacity_tons")?,
                fuel_capacity_l: number("fuel_capacity_l")?,
                consumption_tons_per_nm: number("consumption_tons_per_nm")?,
                consumption_l_per_km: number("consumption_l_per_km")?,
                consumption_l_per_100km: number("consumption_l_per_100km")?,
                consumption_kg_per_hr: number("consumption_kg_per_hr")?,
                service_speed_knots: number("service_speed_knots")?,
                cruise_speed_kmh: number("cruise_speed_kmh")?,
                ..CarrierProfile::new(name.clone(), mode)
            };

            catalog.insert(profile)?;
        }

        Ok(catalog)
    }

    /// Load the grouped-by-mode JSON document. Unknown per-carrier fields
    /// (deadweight, notes, ...) are ignored.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let document: BTreeMap<String, BTreeMap<String, JsonCarrier>> =
            serde_json::from_reader(reader)?;

        let mut catalog = Self::default();
        for (mode_key, models) in document {
            let mode = mode_key
                .parse::<TransportMode>()
                .map_err(|err| Error::CarrierDataValidation {
                    message: format!("carrier group '{mode_key}': {err}"),
                })?;
            for (name, fields) in models {
                catalog.insert(fields.into_profile(name, mode))?;
            }
        }
        Ok(catalog)
    }

    fn insert(&mut self, mut profile: CarrierProfile) -> Result<()> {
        profile.name = profile.name.trim().to_string();
        profile.validate()?;

        let key = normalize_name(&profile.name);
        if self.carriers.contains_key(&key) {
            return Err(Error::DuplicateCarrierName { name: key });
        }
        self.carriers.insert(key, profile);
        Ok(())
    }

    /// Get a carrier by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&CarrierProfile> {
        self.carriers.get(&normalize_name(name))
    }

    /// Get a carrier by name, or an [`Error::UnknownCarrier`] with suggestions.
    pub fn require(&self, name: &str) -> Result<&CarrierProfile> {
        self.get(name).ok_or_else(|| Error::UnknownCarrier {
            name: name.to_string(),
            suggestions: self.fuzzy_matches(name, 3),
        })
    }

    /// First carrier of `mode` by name, used when a trip needs a carrier for a
    /// mode nobody picked one for.
    pub fn default_for_mode(&self, mode: TransportMode) -> Result<&CarrierProfile> {
        self.carriers
            .values()
            .filter(|c| c.mode == mode)
            .min_by(|a, b| a.name.cmp(&b.name))
            .ok_or_else(|| Error::Configuration {
                message: format!("carrier catalog has no {mode} carrier"),
            })
    }

    /// Carrier names most similar to `name`, best first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = normalize_name(name);
        let mut scored: Vec<(f64, &str)> = self
            .carriers
            .iter()
            .map(|(key, profile)| (strsim::jaro_winkler(&needle, key), profile.name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Get a sorted list of all carrier names.
    pub fn carrier_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.carriers.values().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }

    /// Get all carriers sorted by mode, then name.
    pub fn carriers_sorted(&self) -> Vec<&CarrierProfile> {
        let mut carriers: Vec<&CarrierProfile> = self.carriers.values().collect();
        carriers.sort_by(|a, b| {
            a.mode
                .to_string()
                .cmp(&b.mode.to_string())
                .then_with(|| a.name.cmp(&b.name))
        });
        carriers
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct JsonCarrier {
    fuel_capacity_tons: Option<f64>,
    fuel_capacity_l: Option<f64>,
    consumption_tons_per_nm: Option<f64>,
    consumption_l_per_km: Option<f64>,
    consumption_l_per_100km: Option<f64>,
    consumption_kg_per_hr: Option<f64>,
    service_speed_knots: Option<f64>,
    cruise_speed_kmh: Option<f64>,
}

impl JsonCarrier {
    fn into_profile(self, name: String, mode: TransportMode) -> CarrierProfile {
        CarrierProfile {
            fuel_capacity_tons: self.fuel_capacity_tons,
            fuel_capacity_l: self.fuel_capacity_l,
            consumption_tons_per_nm: self.consumption_tons_per_nm,
            consumption_l_per_km: self.consumption_l_per_km,
            consumption_l_per_100km: self.consumption_l_per_100km,
            consumption_kg_per_hr: self.consumption_kg_per_hr,
            service_speed_knots: self.service_speed_knots,
            cruise_speed_kmh: self.cruise_speed_kmh,
            ..CarrierProfile::new(name, mode)
        }
    }
}

/// Normalize a header for robust matching (`Fuel Capacity (L)` → `fuelcapacityl`).
pub(crate) fn normalize_header(s: &str) -> String {
    s.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Index of the first header matching any of `synonyms`.
pub(crate) fn find_column(headers: &StringRecord, synonyms: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    synonyms.iter().find_map(|alt| {
        let alt = normalize_header(alt);
        normalized.iter().position(|h| *h == alt)
    })
}

/// Normalize a carrier name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
