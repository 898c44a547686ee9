//! Nodes command handler and node catalog discovery.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info};

use fuelstop_cli::output::{write_json, write_node_table, OutputFormat};
use fuelstop_lib::{NodeCatalog, StaticNodeCatalog, TransportMode};

use super::{data_dir, debug_fixture, GlobalOptions};

/// Environment variable naming a node catalog file.
pub const NODES_ENV: &str = "FUELSTOP_NODES";

#[derive(Args, Debug)]
pub struct NodesArgs {
    /// Transport mode whose nodes to list.
    #[arg(long)]
    pub mode: TransportMode,
}

/// Handle the nodes subcommand.
pub fn handle_list_nodes(options: &GlobalOptions, args: &NodesArgs) -> Result<()> {
    let catalog = load_node_catalog(options.nodes.as_deref())?;
    let nodes = catalog.nodes_for_mode(args.mode)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.format {
        OutputFormat::Text => write_node_table(&mut out, args.mode, &nodes)?,
        OutputFormat::Json => write_json(&mut out, &nodes)?,
    }
    Ok(())
}

/// Load the node catalog.
///
/// Discovery mirrors the carrier catalog (`--nodes`, `FUELSTOP_NODES`, the
/// user data directory, then the debug fixture). When nothing is found the
/// built-in sample ports are used.
pub fn load_node_catalog(explicit: Option<&Path>) -> Result<StaticNodeCatalog> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => node_candidates().into_iter().find(|p| p.exists()),
    };

    let Some(path) = path else {
        info!("no node catalog found; using the built-in sample ports");
        return Ok(StaticNodeCatalog::sample_ports());
    };

    debug!(path = %path.display(), "loading node catalog");
    StaticNodeCatalog::from_path(&path)
        .with_context(|| format!("failed to load nodes from {}", path.display()))
}

fn node_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(env_path) = std::env::var(NODES_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Some(dir) = data_dir() {
        candidates.push(dir.join("nodes.csv"));
    }

    candidates.extend(debug_fixture("nodes.csv"));
    candidates
}
