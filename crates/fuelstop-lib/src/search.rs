//! Uniform-cost search over `(node, fuel level)` states.
//!
//! Fuel is quantized to multiples of a step size. From every state the search
//! may either buy fuel at a priced node (raising the level) or follow a
//! transition that the remaining fuel covers. The first destination state
//! popped with at least the reserve level is optimal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::catalog::Node;
use crate::error::{Error, Result};
use crate::graph::TransitionGraph;

/// Relative tolerance applied before rounding a fuel amount up to whole steps.
const LEVEL_EPSILON: f64 = 1e-9;

/// Upper bound on `(node, level)` states a single leg may allocate.
pub(crate) const MAX_STATES: usize = 50_000_000;

/// Discretization of the tank into levels `0..=max_level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelGrid {
    step_size: f64,
    max_level: usize,
    reserve_level: usize,
}

impl FuelGrid {
    /// Grid for a tank of `capacity` with `step_size` increments and a reserve
    /// of `reserve_fraction × capacity`.
    ///
    /// Fails with [`Error::DegenerateInput`] when the tank does not fit in
    /// [`MAX_STATES`] levels at this step size.
    pub fn new(capacity: f64, step_size: f64, reserve_fraction: f64) -> Result<Self> {
        let ratio = capacity / step_size;
        if !ratio.is_finite() || ratio > MAX_STATES as f64 {
            return Err(Error::DegenerateInput {
                message: format!(
                    "capacity {capacity} at step size {step_size} needs more than {MAX_STATES} fuel levels; use a larger step size"
                ),
            });
        }
        let max_level = levels_for(capacity, step_size);
        let reserve_level = levels_for(reserve_fraction * capacity, step_size).min(max_level);
        Ok(Self {
            step_size,
            max_level,
            reserve_level,
        })
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn reserve_level(&self) -> usize {
        self.reserve_level
    }

    /// Number of levels per node.
    pub fn width(&self) -> usize {
        self.max_level.saturating_add(1)
    }

    /// Whole steps needed to cover `amount`, rounded up.
    pub fn levels_for(&self, amount: f64) -> usize {
        levels_for(amount, self.step_size)
    }

    /// Fuel amount represented by `level`.
    pub fn amount(&self, level: usize) -> f64 {
        level as f64 * self.step_size
    }

    /// Flat arena index of `(node, level)`.
    pub fn state_index(&self, node: usize, level: usize) -> usize {
        node * self.width() + level
    }

    /// Inverse of [`FuelGrid::state_index`].
    pub fn decode(&self, index: usize) -> (usize, usize) {
        (index / self.width(), index % self.width())
    }
}

fn levels_for(amount: f64, step_size: f64) -> usize {
    if amount <= 0.0 {
        return 0;
    }
    let ratio = amount / step_size;
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= LEVEL_EPSILON * nearest.max(1.0) {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

/// Action that produced a state, recorded on its predecessor link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Refuel {
        amount: f64,
        price_per_unit: f64,
        stop_fee: f64,
        cost: f64,
    },
    Travel {
        distance: f64,
        travel_time: f64,
        fuel_used: f64,
    },
}

/// Predecessor link: the state we came from and how.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Predecessor {
    pub state: usize,
    pub action: Action,
}

/// Best known cost to reach a state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRecord {
    pub cost: f64,
    pub predecessor: Option<Predecessor>,
}

impl Default for SearchRecord {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            predecessor: None,
        }
    }
}

/// Terminal state plus the record arena needed to walk back from it.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub start: usize,
    pub terminal: usize,
    pub records: Vec<SearchRecord>,
    pub states_expanded: usize,
}

impl SearchOutcome {
    /// Cumulative cost of the terminal state.
    pub fn cost(&self) -> f64 {
        self.records[self.terminal].cost
    }

    /// `(from_state, to_state, action)` triples from start to terminal.
    pub fn path(&self) -> Vec<(usize, usize, Action)> {
        let mut path = Vec::new();
        let mut current = self.terminal;
        while let Some(link) = self.records[current].predecessor {
            path.push((link.state, current, link.action));
            current = link.state;
        }
        path.reverse();
        path
    }
}

/// Run the search from `(origin, full tank)` until a destination state with
/// at least the reserve level is popped.
pub fn search(
    nodes: &[Node],
    graph: &TransitionGraph,
    grid: &FuelGrid,
    origin: usize,
    destination: usize,
) -> Result<SearchOutcome> {
    let width = grid.width();
    let mut records = vec![SearchRecord::default(); nodes.len() * width];
    let mut queue = BinaryHeap::new();

    let start = grid.state_index(origin, grid.max_level());
    records[start].cost = 0.0;
    queue.push(QueueEntry::new(0.0, origin, grid.max_level()));

    let mut states_expanded = 0usize;

    while let Some(entry) = queue.pop() {
        let current = grid.state_index(entry.node, entry.level);
        let current_cost = records[current].cost;
        if entry.cost.0 > current_cost {
            continue;
        }
        states_expanded += 1;

        if entry.node == destination && entry.level >= grid.reserve_level() {
            debug!(
                states = records.len(),
                expanded = states_expanded,
                cost = current_cost,
                "search reached destination"
            );
            return Ok(SearchOutcome {
                start,
                terminal: current,
                records,
                states_expanded,
            });
        }

        let node = &nodes[entry.node];
        if let Some(price) = node.price_per_unit {
            for target_level in entry.level + 1..=grid.max_level() {
                let amount = grid.amount(target_level - entry.level);
                let cost = amount * price + node.stop_fee;
                let next = grid.state_index(entry.node, target_level);
                let next_cost = current_cost + cost;
                if next_cost < records[next].cost {
                    records[next] = SearchRecord {
                        cost: next_cost,
                        predecessor: Some(Predecessor {
                            state: current,
                            action: Action::Refuel {
                                amount,
                                price_per_unit: price,
                                stop_fee: node.stop_fee,
                                cost,
                            },
                        }),
                    };
                    queue.push(QueueEntry::new(next_cost, entry.node, target_level));
                }
            }
        }

        for transition in graph.transitions_from(entry.node) {
            let need = grid.levels_for(transition.fuel_required);
            if need > entry.level {
                continue;
            }
            let remaining = entry.level - need;
            let next = grid.state_index(transition.to, remaining);
            if current_cost < records[next].cost {
                records[next] = SearchRecord {
                    cost: current_cost,
                    predecessor: Some(Predecessor {
                        state: current,
                        action: Action::Travel {
                            distance: transition.distance,
                            travel_time: transition.travel_time,
                            fuel_used: transition.fuel_required,
                        },
                    }),
                };
                queue.push(QueueEntry::new(current_cost, transition.to, remaining));
            }
        }
    }

    debug!(
        states = records.len(),
        expanded = states_expanded,
        "search exhausted without reaching destination"
    );
    Err(Error::InfeasibleRoute {
        reason: format!(
            "no sequence of refuel stops reaches {} with the required reserve of {} fuel units \
             ({} states explored)",
            nodes[destination].name,
            grid.amount(grid.reserve_level()),
            states_expanded
        ),
    })
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    cost: FloatOrd,
    node: usize,
    level: usize,
}

impl QueueEntry {
    fn new(cost: f64, node: usize, level: usize) -> Self {
        Self {
            cost: FloatOrd(cost),
            node,
            level,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: pop lowest cost, then the fullest tank,
        // then the lowest node index.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| self.level.cmp(&other.level))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
