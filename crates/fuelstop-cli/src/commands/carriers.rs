//! Carriers command handler and carrier catalog discovery.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use fuelstop_cli::output::{write_carrier_table, write_json, OutputFormat};
use fuelstop_lib::CarrierCatalog;

use super::{data_dir, debug_fixture, GlobalOptions};

/// Environment variable naming a carrier catalog file.
pub const CARRIERS_ENV: &str = "FUELSTOP_CARRIERS";

/// Handle the carriers subcommand.
pub fn handle_list_carriers(options: &GlobalOptions) -> Result<()> {
    let catalog = load_carrier_catalog(options.carriers.as_deref())?;
    let carriers = catalog.carriers_sorted();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.format {
        OutputFormat::Text => write_carrier_table(&mut out, &carriers)?,
        OutputFormat::Json => write_json(&mut out, &carriers)?,
    }
    Ok(())
}

/// Load the carrier catalog.
///
/// An explicit `--carriers` path is used as given. Otherwise the first
/// existing file wins, in this order:
/// 1. `FUELSTOP_CARRIERS` environment variable
/// 2. `carriers.csv`, then `carriers.json`, in the user data directory
/// 3. Debug fixture path (only in debug builds)
pub fn load_carrier_catalog(explicit: Option<&Path>) -> Result<CarrierCatalog> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => carrier_candidates()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| {
                anyhow!(
                    "carrier catalog not found; pass --carriers, set {CARRIERS_ENV} or place \
                     carriers.csv in the fuelstop data directory"
                )
            })?,
    };

    debug!(path = %path.display(), "loading carrier catalog");
    CarrierCatalog::from_path(&path)
        .with_context(|| format!("failed to load carriers from {}", path.display()))
}

fn carrier_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(env_path) = std::env::var(CARRIERS_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Some(dir) = data_dir() {
        candidates.push(dir.join("carriers.csv"));
        candidates.push(dir.join("carriers.json"));
    }

    candidates.extend(debug_fixture("carriers.csv"));
    candidates
}
