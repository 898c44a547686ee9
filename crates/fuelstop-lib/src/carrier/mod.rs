//! Carrier profiles and catalog management.
//!
//! - [`profile`] - Raw carrier attributes and per-mode parameter resolution
//! - [`catalog`] - Carrier catalog loading (CSV or grouped JSON) and lookup
//!
//! # Example
//!
//! ```no_run
//! use fuelstop_lib::carrier::CarrierCatalog;
//! use fuelstop_lib::{FuelUnit, TransportMode};
//!
//! let catalog = CarrierCatalog::from_path(std::path::Path::new("carriers.csv")).unwrap();
//! let carrier = catalog.require("bulkcarrier-75000DWT").unwrap();
//! let params = carrier.resolve(TransportMode::Maritime, FuelUnit::Tons).unwrap();
//! println!("range: {:.0} nm", params.range());
//! ```

pub mod catalog;
pub mod profile;

pub use catalog::CarrierCatalog;
pub use profile::{CarrierParameters, CarrierProfile, JET_FUEL_DENSITY_KG_PER_L};
