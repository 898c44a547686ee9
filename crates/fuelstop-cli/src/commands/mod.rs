// Handlers for the CLI subcommands. main.rs parses arguments and dispatches
// here; each module owns one subcommand plus the catalog loading it needs.

pub mod carriers;
pub mod nodes;
pub mod plan;

use std::path::PathBuf;

use clap::Args;
use directories::ProjectDirs;

use fuelstop_cli::output::OutputFormat;

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Carrier catalog (CSV or grouped JSON).
    #[arg(long, global = true, value_name = "PATH")]
    pub carriers: Option<PathBuf>,

    /// Node catalog CSV.
    #[arg(long, global = true, value_name = "PATH")]
    pub nodes: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Per-user data directory searched for catalog files.
pub(crate) fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "fuelstop", "fuelstop").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Fixture shipped in the repository, used by debug builds only.
pub(crate) fn debug_fixture(file_name: &str) -> Option<PathBuf> {
    if cfg!(debug_assertions) {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures");
        Some(fixtures.join(file_name))
    } else {
        None
    }
}
