use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fuelstop_lib::Error as LibError;

mod commands;

use commands::{nodes::NodesArgs, plan::PlanArgs, GlobalOptions};

/// Exit status for a trip with no feasible itinerary.
const EXIT_INFEASIBLE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fuel-constrained refuel route planning")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan the cheapest refuelling itinerary through one or more legs.
    Plan(PlanArgs),
    /// List the carriers in the carrier catalog.
    Carriers,
    /// List the refuelling nodes that serve a transport mode.
    Nodes(NodesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let result = match &cli.command {
        Command::Plan(args) => commands::plan::handle_plan(&cli.global, args),
        Command::Carriers => commands::carriers::handle_list_carriers(&cli.global),
        Command::Nodes(args) => commands::nodes::handle_list_nodes(&cli.global, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code_for(&err)
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    let infeasible = err.chain().any(|cause| {
        cause
            .downcast_ref::<LibError>()
            .is_some_and(LibError::is_infeasible)
    });
    if infeasible {
        ExitCode::from(EXIT_INFEASIBLE)
    } else {
        ExitCode::FAILURE
    }
}

/// Logs go to stderr so `--format json` output stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
