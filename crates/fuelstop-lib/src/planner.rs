//! Refuel planning entry points.
//!
//! This module provides:
//! - [`PlannerConfig`] - Tunable defaults shared by requests
//! - [`RefuelRequest`] - One origin-to-destination leg to plan
//! - [`Waypoint`] - A trip stop, optionally switching the transport mode
//! - [`find_optimal_refuel_route`] - Main entry point for a single leg
//! - [`plan_legs`] - Plan several independent legs against one catalog
//!
//! # Example
//!
//! ```ignore
//! use fuelstop_lib::{find_optimal_refuel_route, CarrierProfile, Coordinate, RefuelRequest,
//!     StaticNodeCatalog, TransportMode};
//!
//! let catalog = StaticNodeCatalog::sample_ports();
//! let vessel = CarrierProfile::maritime("bulkcarrier-75000DWT", 2500.0, 0.12);
//! let request = RefuelRequest::new(
//!     Coordinate::new(51.9, 4.1),
//!     Coordinate::new(31.2, 121.5),
//!     vessel,
//!     TransportMode::Maritime,
//! );
//! let plan = find_optimal_refuel_route(&catalog, &request)?;
//! println!("{} stops, ${:.2}", plan.refuel_count(), plan.total_cost);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::carrier::CarrierProfile;
use crate::catalog::{Node, NodeCatalog};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{build_transition_graph, GraphBuildOptions};
use crate::mode::{FuelUnit, TransportMode};
use crate::plan::{assemble, Plan, PlanContext};
use crate::search::{search, FuelGrid, MAX_STATES};

/// Planner defaults applied by [`RefuelRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Fuel quantum in the request's fuel unit. `None` picks
    /// [`TransportMode::default_step_size`] for each leg's mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    /// Fraction of capacity that must remain on arrival.
    pub reserve_fraction: f64,
    /// Cap on origin + catalog nodes + destination.
    pub max_nodes_considered: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_neighbors: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            step_size: None,
            reserve_fraction: 0.1,
            max_nodes_considered: 200,
            max_neighbors: None,
        }
    }
}

impl PlannerConfig {
    /// Reject values that make the state space meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(step_size) = self.step_size {
            if !step_size.is_finite() || step_size <= 0.0 {
                return Err(Error::DegenerateInput {
                    message: format!("step size must be positive, got {step_size}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.reserve_fraction) {
            return Err(Error::DegenerateInput {
                message: format!(
                    "reserve fraction must be within [0, 1], got {}",
                    self.reserve_fraction
                ),
            });
        }
        if self.max_nodes_considered == 0 {
            return Err(Error::DegenerateInput {
                message: "max nodes considered must be at least 1".to_string(),
            });
        }
        if self.max_neighbors == Some(0) {
            return Err(Error::DegenerateInput {
                message: "max neighbors must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Trip stop. A `mode` makes the leg that ends here use that mode instead of
/// the trip default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TransportMode>,
}

impl Waypoint {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

impl From<Coordinate> for Waypoint {
    fn from(coordinate: Coordinate) -> Self {
        Self::new(coordinate)
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "{}@{mode}", self.coordinate),
            None => write!(f, "{}", self.coordinate),
        }
    }
}

/// Parses `lat,lon` or `lat,lon@mode`.
impl FromStr for Waypoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.rsplit_once('@') {
            Some((coordinate, mode)) => Ok(Self::new(coordinate.parse()?).with_mode(mode.parse()?)),
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

/// One leg to plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuelRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub carrier: CarrierProfile,
    pub mode: TransportMode,
    pub fuel_unit: FuelUnit,
    pub step_size: f64,
    pub reserve_fraction: f64,
    pub max_nodes_considered: usize,
    #[serde(default)]
    pub graph: GraphBuildOptions,
}

impl RefuelRequest {
    /// Request using [`PlannerConfig::default`], the mode's default step size
    /// and the mode's natural fuel unit.
    pub fn new(
        origin: Coordinate,
        destination: Coordinate,
        carrier: CarrierProfile,
        mode: TransportMode,
    ) -> Self {
        Self::with_config(origin, destination, carrier, mode, &PlannerConfig::default())
    }

    pub fn with_config(
        origin: Coordinate,
        destination: Coordinate,
        carrier: CarrierProfile,
        mode: TransportMode,
        config: &PlannerConfig,
    ) -> Self {
        Self {
            origin,
            destination,
            carrier,
            mode,
            fuel_unit: mode.natural_fuel_unit(),
            step_size: config
                .step_size
                .unwrap_or_else(|| mode.default_step_size()),
            reserve_fraction: config.reserve_fraction,
            max_nodes_considered: config.max_nodes_considered,
            graph: GraphBuildOptions {
                max_neighbors: config.max_neighbors,
            },
        }
    }

    /// One request per consecutive pair of `waypoints`.
    pub fn chain(waypoints: &[Coordinate], carrier: CarrierProfile, mode: TransportMode) -> Vec<Self> {
        Self::chain_with_config(waypoints, carrier, mode, &PlannerConfig::default())
    }

    pub fn chain_with_config(
        waypoints: &[Coordinate],
        carrier: CarrierProfile,
        mode: TransportMode,
        config: &PlannerConfig,
    ) -> Vec<Self> {
        waypoints
            .windows(2)
            .map(|pair| Self::with_config(pair[0], pair[1], carrier.clone(), mode, config))
            .collect()
    }

    /// One request per leg of `origin -> stops[0] -> stops[1] -> ...`. Each
    /// leg runs in its stop's mode, or `default_mode` when the stop has none,
    /// with the carrier `carrier_for` returns for that mode.
    pub fn multimodal<F>(
        origin: Coordinate,
        stops: &[Waypoint],
        default_mode: TransportMode,
        config: &PlannerConfig,
        mut carrier_for: F,
    ) -> Result<Vec<Self>>
    where
        F: FnMut(TransportMode) -> Result<CarrierProfile>,
    {
        let mut from = origin;
        let mut legs = Vec::with_capacity(stops.len());
        for stop in stops {
            let mode = stop.mode.unwrap_or(default_mode);
            let carrier = carrier_for(mode)?;
            legs.push(Self::with_config(from, stop.coordinate, carrier, mode, config));
            from = stop.coordinate;
        }
        Ok(legs)
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_reserve_fraction(mut self, reserve_fraction: f64) -> Self {
        self.reserve_fraction = reserve_fraction;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes_considered: usize) -> Self {
        self.max_nodes_considered = max_nodes_considered;
        self
    }

    pub fn with_graph_options(mut self, graph: GraphBuildOptions) -> Self {
        self.graph = graph;
        self
    }

    fn config(&self) -> PlannerConfig {
        PlannerConfig {
            step_size: Some(self.step_size),
            reserve_fraction: self.reserve_fraction,
            max_nodes_considered: self.max_nodes_considered,
            max_neighbors: self.graph.max_neighbors,
        }
    }
}

/// Compute the minimum-cost refuelling itinerary for one leg.
///
/// # Errors
/// - [`Error::DegenerateInput`] for unusable step size, reserve, node cap,
///   coordinates or carrier numbers.
/// - [`Error::Configuration`] when the carrier lacks data for the mode or the
///   fuel unit does not match it.
/// - [`Error::InfeasibleRoute`] when no itinerary reaches the destination with
///   the reserve, including when the node cap cuts the destination off.
/// - Catalog errors are returned unchanged.
pub fn find_optimal_refuel_route(catalog: &dyn NodeCatalog, request: &RefuelRequest) -> Result<Plan> {
    validate_request(request)?;
    let params = request.carrier.resolve(request.mode, request.fuel_unit)?;

    let catalog_nodes = catalog.nodes_for_mode(request.mode)?;
    let nodes = planning_nodes(request, catalog_nodes)?;

    let grid = FuelGrid::new(params.capacity, request.step_size, request.reserve_fraction)?;
    let states = nodes.len().saturating_mul(grid.width());
    if states > MAX_STATES {
        return Err(Error::DegenerateInput {
            message: format!(
                "{} nodes x {} fuel levels exceeds {MAX_STATES} states; use a larger step size",
                nodes.len(),
                grid.width()
            ),
        });
    }

    debug!(
        mode = %request.mode,
        carrier = %request.carrier.name,
        nodes = nodes.len(),
        levels = grid.width(),
        range = params.range(),
        "planning leg"
    );

    let graph = build_transition_graph(&nodes, &params, request.mode, &request.graph);
    let destination = nodes.len() - 1;
    let outcome = search(&nodes, &graph, &grid, 0, destination)?;

    let plan = assemble(
        &nodes,
        &grid,
        &outcome,
        PlanContext {
            mode: request.mode,
            carrier: &request.carrier.name,
            fuel_unit: request.fuel_unit,
        },
    );
    info!(
        "planned {} leg: {} refuel stop(s), {} travel leg(s), cost {:.2}",
        plan.mode,
        plan.refuel_count(),
        plan.travel_legs.len(),
        plan.total_cost
    );
    Ok(plan)
}

/// Plan independent legs against one shared catalog. Results keep the order
/// of `requests`; one failing leg does not affect the others.
pub fn plan_legs(catalog: &dyn NodeCatalog, requests: &[RefuelRequest]) -> Vec<Result<Plan>> {
    plan_each(catalog, requests)
}

#[cfg(feature = "parallel")]
fn plan_each(catalog: &dyn NodeCatalog, requests: &[RefuelRequest]) -> Vec<Result<Plan>> {
    use rayon::prelude::*;

    requests
        .par_iter()
        .map(|request| find_optimal_refuel_route(catalog, request))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn plan_each(catalog: &dyn NodeCatalog, requests: &[RefuelRequest]) -> Vec<Result<Plan>> {
    requests
        .iter()
        .map(|request| find_optimal_refuel_route(catalog, request))
        .collect()
}

// =============================================================================
// Helper Functions
// =============================================================================

fn validate_request(request: &RefuelRequest) -> Result<()> {
    request.config().validate()?;
    request.origin.validate()?;
    request.destination.validate()?;

    if request.carrier.mode != request.mode {
        return Err(Error::Configuration {
            message: format!(
                "carrier '{}' is a {} carrier and cannot plan a {} leg",
                request.carrier.name, request.carrier.mode, request.mode
            ),
        });
    }
    Ok(())
}

/// Origin, catalog nodes and destination, cut to the request's node cap.
fn planning_nodes(request: &RefuelRequest, catalog_nodes: Vec<Node>) -> Result<Vec<Node>> {
    let mut nodes = Vec::with_capacity(catalog_nodes.len() + 2);
    nodes.push(Node::origin(request.origin));
    nodes.extend(catalog_nodes);
    nodes.push(Node::destination(request.destination));

    if nodes.len() > request.max_nodes_considered {
        let available = nodes.len();
        warn!(
            "node cap of {} drops the destination ({} nodes available)",
            request.max_nodes_considered, available
        );
        return Err(Error::InfeasibleRoute {
            reason: format!(
                "max nodes considered ({}) is smaller than the {available} nodes available, \
                 so the destination was cut from the candidate list",
                request.max_nodes_considered
            ),
        });
    }
    Ok(nodes)
}
