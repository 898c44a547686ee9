//! Fuelstop library entry points.
//!
//! This crate plans minimum-cost refuelling itineraries for a carrier with a
//! finite tank. It loads carrier profiles and refuelling node catalogs, builds
//! a transition graph between candidate nodes and searches the coupled
//! `(location, fuel level)` state space. Higher-level consumers (the CLI)
//! should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod carrier;
pub mod catalog;
pub mod error;
pub mod geo;
pub mod graph;
pub mod mode;
pub mod plan;
pub mod planner;
pub mod search;

pub use carrier::{CarrierCatalog, CarrierParameters, CarrierProfile};
pub use catalog::{Node, NodeCatalog, NodeKind, StaticNodeCatalog};
pub use error::{Error, Result};
pub use geo::Coordinate;
pub use graph::{build_transition_graph, GraphBuildOptions, Transition, TransitionGraph};
pub use mode::{DistanceUnit, FuelUnit, TransportMode};
pub use plan::{Plan, PlanStep, RefuelAction, StepAction, TravelLeg};
pub use planner::{find_optimal_refuel_route, plan_legs, PlannerConfig, RefuelRequest, Waypoint};
