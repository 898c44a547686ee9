//! Itinerary assembled from an optimal search path.

use serde::{Deserialize, Serialize};

use crate::catalog::Node;
use crate::mode::{DistanceUnit, FuelUnit, TransportMode};
use crate::search::{Action, FuelGrid, SearchOutcome};

/// Fuel bought at a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuelAction {
    pub node_id: String,
    pub node: String,
    pub added_amount: f64,
    pub price_per_unit: f64,
    /// Fuel cost plus the stop fee.
    pub cost: f64,
    pub stop_fee: f64,
}

/// Movement between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub from_id: String,
    pub from: String,
    pub to_id: String,
    pub to: String,
    pub distance: f64,
    /// Hours.
    pub time: f64,
    pub fuel_used: f64,
}

/// One itinerary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    Refuel(RefuelAction),
    Travel(TravelLeg),
}

/// An action together with the tank level around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub fuel_before: f64,
    pub fuel_after: f64,
    #[serde(flatten)]
    pub action: StepAction,
}

/// Minimum-cost refuelling itinerary for one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub mode: TransportMode,
    pub carrier: String,
    pub fuel_unit: FuelUnit,
    pub distance_unit: DistanceUnit,
    pub step_size: f64,
    pub total_cost: f64,
    pub refuel_actions: Vec<RefuelAction>,
    pub travel_legs: Vec<TravelLeg>,
    /// Refuels and travel legs in the order they happen.
    pub steps: Vec<PlanStep>,
    pub visited_node_names: Vec<String>,
    pub final_fuel_amount: f64,
    pub total_distance: f64,
    /// Hours spent travelling.
    pub total_time: f64,
    pub states_expanded: usize,
}

impl Plan {
    pub fn refuel_count(&self) -> usize {
        self.refuel_actions.len()
    }

    /// Fuel bought across all refuels.
    pub fn total_fuel_purchased(&self) -> f64 {
        self.refuel_actions.iter().map(|r| r.added_amount).sum()
    }

    /// Fuel burned across all legs.
    pub fn total_fuel_used(&self) -> f64 {
        self.travel_legs.iter().map(|l| l.fuel_used).sum()
    }
}

/// Request-level facts the search does not know about.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanContext<'a> {
    pub mode: TransportMode,
    pub carrier: &'a str,
    pub fuel_unit: FuelUnit,
}

/// Walk the predecessor chain of `outcome` and replay it into a [`Plan`].
pub(crate) fn assemble(
    nodes: &[Node],
    grid: &FuelGrid,
    outcome: &SearchOutcome,
    context: PlanContext<'_>,
) -> Plan {
    let (origin, _) = grid.decode(outcome.start);

    let mut refuel_actions = Vec::new();
    let mut travel_legs = Vec::new();
    let mut steps = Vec::new();
    let mut visited_node_names = vec![nodes[origin].name.clone()];

    for (from_state, to_state, action) in outcome.path() {
        let (from_node, from_level) = grid.decode(from_state);
        let (to_node, to_level) = grid.decode(to_state);

        let step_action = match action {
            Action::Refuel {
                amount,
                price_per_unit,
                stop_fee,
                cost,
            } => {
                let node = &nodes[from_node];
                let refuel = RefuelAction {
                    node_id: node.id.clone(),
                    node: node.name.clone(),
                    added_amount: amount,
                    price_per_unit,
                    cost,
                    stop_fee,
                };
                refuel_actions.push(refuel.clone());
                StepAction::Refuel(refuel)
            }
            Action::Travel {
                distance,
                travel_time,
                fuel_used,
            } => {
                let from = &nodes[from_node];
                let to = &nodes[to_node];
                let leg = TravelLeg {
                    from_id: from.id.clone(),
                    from: from.name.clone(),
                    to_id: to.id.clone(),
                    to: to.name.clone(),
                    distance,
                    time: travel_time,
                    fuel_used,
                };
                visited_node_names.push(to.name.clone());
                travel_legs.push(leg.clone());
                StepAction::Travel(leg)
            }
        };

        steps.push(PlanStep {
            fuel_before: grid.amount(from_level),
            fuel_after: grid.amount(to_level),
            action: step_action,
        });
    }

    let (_, final_level) = grid.decode(outcome.terminal);

    Plan {
        mode: context.mode,
        carrier: context.carrier.to_string(),
        fuel_unit: context.fuel_unit,
        distance_unit: context.mode.distance_unit(),
        step_size: grid.step_size(),
        total_cost: refuel_actions.iter().map(|r| r.cost).sum(),
        total_distance: travel_legs.iter().map(|l| l.distance).sum(),
        total_time: travel_legs.iter().map(|l| l.time).sum(),
        refuel_actions,
        travel_legs,
        steps,
        visited_node_names,
        final_fuel_amount: grid.amount(final_level),
        states_expanded: outcome.states_expanded,
    }
}
