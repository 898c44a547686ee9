//! Plan command handler.

use std::fmt;
use std::io;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{info, warn};

use fuelstop_cli::output::{write_json, OutputFormat, PlanRenderer, TripReport};
use fuelstop_cli::terminal::ColorPalette;
use fuelstop_lib::{
    plan_legs, CarrierCatalog, CarrierProfile, Coordinate, Error as LibError, NodeCatalog,
    PlannerConfig, RefuelRequest, TransportMode, Waypoint,
};

use super::carriers::load_carrier_catalog;
use super::nodes::load_node_catalog;
use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Transport mode for legs whose waypoint names none: maritime, air,
    /// road or rail.
    #[arg(long)]
    pub mode: TransportMode,

    /// Carrier name from the carrier catalog (case-insensitive). A bare
    /// name serves `--mode` legs; `MODE=NAME` serves legs of that mode.
    /// Modes without one use the first catalog carrier of the mode.
    #[arg(long = "carrier", id = "carrier", value_name = "[MODE=]NAME")]
    pub carriers: Vec<CarrierChoice>,

    /// Starting position as `lat,lon`.
    #[arg(long = "from", value_name = "LAT,LON", allow_hyphen_values = true)]
    pub from: Coordinate,

    /// Destination as `lat,lon`, or `lat,lon@mode` to switch mode for the
    /// leg ending there; repeat to chain legs through waypoints.
    #[arg(
        long = "to",
        value_name = "LAT,LON[@MODE]",
        required = true,
        allow_hyphen_values = true
    )]
    pub to: Vec<Waypoint>,

    /// Fuel discretisation step in each leg's fuel unit. Defaults to 1 t at
    /// sea, 100 L in the air and 50 L on road or rail.
    #[arg(long)]
    pub step: Option<f64>,

    /// Fraction of tank capacity that must remain on arrival.
    #[arg(long)]
    pub reserve: Option<f64>,

    /// Cap on origin + catalog nodes + destination.
    #[arg(long = "max-nodes")]
    pub max_nodes: Option<usize>,

    /// Keep only the k nearest nodes (plus the destination) as successors.
    #[arg(long = "max-neighbors")]
    pub max_neighbors: Option<usize>,
}

/// `--carrier` value: a carrier name, optionally bound to a mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CarrierChoice {
    pub mode: Option<TransportMode>,
    pub name: String,
}

impl FromStr for CarrierChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (mode, name) = match s.split_once('=') {
            Some((mode, name)) => {
                let mode = mode.parse::<TransportMode>().map_err(|e| e.to_string())?;
                (Some(mode), name)
            }
            None => (None, s),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("expected [MODE=]NAME, got '{s}'"));
        }
        Ok(Self {
            mode,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for CarrierChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "{mode}={}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl PlanArgs {
    fn planner_config(&self) -> PlannerConfig {
        let defaults = PlannerConfig::default();
        PlannerConfig {
            step_size: self.step.or(defaults.step_size),
            reserve_fraction: self.reserve.unwrap_or(defaults.reserve_fraction),
            max_nodes_considered: self.max_nodes.unwrap_or(defaults.max_nodes_considered),
            max_neighbors: self.max_neighbors.or(defaults.max_neighbors),
        }
    }

    /// Mode each `--carrier` serves, paired with the carrier name.
    fn carrier_names(&self) -> Result<Vec<(TransportMode, &str)>> {
        let mut names: Vec<(TransportMode, &str)> = Vec::with_capacity(self.carriers.len());
        for choice in &self.carriers {
            let mode = choice.mode.unwrap_or(self.mode);
            if names.iter().any(|(taken, _)| *taken == mode) {
                bail!("more than one --carrier given for {mode} legs");
            }
            names.push((mode, choice.name.as_str()));
        }
        Ok(names)
    }

    fn leg_modes(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.to.iter().map(|stop| stop.mode.unwrap_or(self.mode))
    }
}

/// Carrier for `mode` legs: the one named on the command line, else the
/// catalog's first carrier of that mode.
fn select_carrier(
    carriers: &CarrierCatalog,
    names: &[(TransportMode, &str)],
    mode: TransportMode,
) -> fuelstop_lib::Result<CarrierProfile> {
    match names.iter().find(|(served, _)| *served == mode) {
        Some((_, name)) => carriers.require(name).cloned(),
        None => {
            let carrier = carriers.default_for_mode(mode)?;
            info!("no --carrier for {mode} legs, using {}", carrier.name);
            Ok(carrier.clone())
        }
    }
}

/// Handle the plan subcommand.
///
/// Every leg must be feasible; the first failing leg is reported with its
/// waypoints and the library error kept in the chain for the exit status.
pub fn handle_plan(options: &GlobalOptions, args: &PlanArgs) -> Result<()> {
    let carriers = load_carrier_catalog(options.carriers.as_deref())?;
    let nodes = load_node_catalog(options.nodes.as_deref())?;

    let config = args.planner_config();
    config.validate()?;

    let names = args.carrier_names()?;
    for (mode, name) in &names {
        if !args.leg_modes().any(|leg| leg == *mode) {
            warn!("--carrier {name} serves {mode} legs, but the trip has none");
        }
    }

    let requests = RefuelRequest::multimodal(args.from, &args.to, args.mode, &config, |mode| {
        select_carrier(&carriers, &names, mode)
    })?;
    info!(legs = requests.len(), mode = %args.mode, "planning trip");

    let plans = plan_legs(&nodes, &requests)
        .into_iter()
        .zip(&requests)
        .enumerate()
        .map(|(index, (result, request))| {
            result.map_err(|err| handle_leg_failure(&nodes, index + 1, request, err))
        })
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match options.format {
        OutputFormat::Text => PlanRenderer::new(ColorPalette::detect())
            .write_trip(&mut out, &plans)
            .context("failed to write itinerary")?,
        OutputFormat::Json => write_json(&mut out, &TripReport::new(&plans))
            .context("failed to write itinerary")?,
    }
    Ok(())
}

fn handle_leg_failure(
    nodes: &dyn NodeCatalog,
    number: usize,
    request: &RefuelRequest,
    err: LibError,
) -> anyhow::Error {
    let message = if err.is_infeasible() {
        // Origin and destination count against the cap too.
        let available = nodes
            .nodes_for_mode(request.mode)
            .map(|catalog_nodes| catalog_nodes.len() + 2)
            .unwrap_or(0);
        format_infeasible_message(number, request, available)
    } else {
        format!(
            "leg {number} ({} -> {}) could not be planned",
            request.origin, request.destination
        )
    };
    anyhow::Error::new(err).context(message)
}

/// Explain an infeasible leg. When the node cap cut the destination off,
/// raising the cap is the only useful hint.
fn format_infeasible_message(number: usize, request: &RefuelRequest, available: usize) -> String {
    let message = format!(
        "leg {number} ({} -> {}) has no feasible itinerary",
        request.origin, request.destination
    );

    if available > request.max_nodes_considered {
        return format!("{message}; try raising --max-nodes to at least {available}");
    }

    let mut hints = vec!["reducing --step"];
    if request.reserve_fraction > 0.0 {
        hints.push("lowering --reserve");
    }
    if request.graph.max_neighbors.is_some() {
        hints.push("dropping --max-neighbors");
    }
    format!("{message}; try {}", hints.join(" or "))
}
