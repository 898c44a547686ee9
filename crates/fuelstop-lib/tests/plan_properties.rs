//! Property tests over random equatorial corridors.

mod common;

use common::{equator_catalog, equator_request, vessel, PortSpec};
use fuelstop_lib::{find_optimal_refuel_route, Plan, StepAction};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Corridor {
    ports: Vec<(f64, Option<f64>, f64)>,
    destination_nm: f64,
    capacity: f64,
    reserve: f64,
}

impl Corridor {
    fn specs(&self) -> Vec<PortSpec> {
        const NAMES: [&str; 6] = ["P1", "P2", "P3", "P4", "P5", "P6"];
        self.ports
            .iter()
            .zip(NAMES)
            .map(|(&(nm, price, fee), name)| PortSpec {
                name,
                nm,
                price,
                fee,
            })
            .collect()
    }

    fn plan(&self, step: f64) -> Result<Plan, fuelstop_lib::Error> {
        let catalog = equator_catalog(&self.specs());
        let request = equator_request(0.0, self.destination_nm, vessel(self.capacity, 1.0))
            .with_step_size(step)
            .with_reserve_fraction(self.reserve);
        find_optimal_refuel_route(&catalog, &request)
    }
}

fn corridor_strategy() -> impl Strategy<Value = Corridor> {
    let port = (
        0.0f64..400.0,
        prop::option::weighted(0.85, 1.0f64..20.0),
        0.0f64..50.0,
    );
    (
        prop::collection::vec(port, 0..6),
        50.0f64..400.0,
        // Multiples of 4 so the coarser step sizes divide the capacity.
        (15u32..50).prop_map(|quarter| f64::from(quarter * 4)),
        prop_oneof![Just(0.0), Just(0.1), Just(0.25)],
    )
        .prop_map(|(ports, destination_nm, capacity, reserve)| Corridor {
            ports,
            destination_nm,
            capacity,
            reserve,
        })
}

fn check_ledger(plan: &Plan, capacity: f64, reserve: f64) -> Result<(), TestCaseError> {
    let step = plan.step_size;

    for step_entry in &plan.steps {
        prop_assert!(step_entry.fuel_before >= 0.0);
        prop_assert!(step_entry.fuel_after >= 0.0);
        prop_assert!(step_entry.fuel_after <= capacity + step + 1e-9);
        match &step_entry.action {
            StepAction::Refuel(refuel) => {
                prop_assert!(refuel.added_amount > 0.0);
                prop_assert!(step_entry.fuel_after > step_entry.fuel_before);
            }
            StepAction::Travel(leg) => {
                prop_assert!(leg.fuel_used >= 0.0);
                prop_assert!(step_entry.fuel_after <= step_entry.fuel_before);
            }
        }
    }

    for pair in plan.steps.windows(2) {
        prop_assert!((pair[0].fuel_after - pair[1].fuel_before).abs() < 1e-9);
    }

    prop_assert!(plan.final_fuel_amount + 1e-9 >= reserve * capacity);

    let summed: f64 = plan.refuel_actions.iter().map(|r| r.cost).sum();
    prop_assert_eq!(plan.total_cost, summed);

    prop_assert_eq!(plan.visited_node_names.len(), plan.travel_legs.len() + 1);
    prop_assert_eq!(
        plan.visited_node_names.last().map(String::as_str),
        Some("Destination")
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn feasible_plans_keep_a_consistent_fuel_ledger(corridor in corridor_strategy()) {
        if let Ok(plan) = corridor.plan(1.0) {
            check_ledger(&plan, corridor.capacity, corridor.reserve)?;
        }
    }

    #[test]
    fn identical_inputs_produce_identical_plans(corridor in corridor_strategy()) {
        let first = corridor.plan(2.0);
        let second = corridor.plan(2.0);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn finer_steps_never_cost_more(corridor in corridor_strategy()) {
        let coarse = corridor.plan(4.0);
        let medium = corridor.plan(2.0);
        let fine = corridor.plan(1.0);

        if let (Ok(coarse), Ok(medium)) = (&coarse, &medium) {
            prop_assert!(medium.total_cost <= coarse.total_cost + 1e-6);
        }
        if let (Ok(medium), Ok(fine)) = (&medium, &fine) {
            prop_assert!(fine.total_cost <= medium.total_cost + 1e-6);
        }
        // Anything feasible on a coarse grid stays feasible on a finer one.
        if coarse.is_ok() {
            prop_assert!(medium.is_ok());
        }
        if medium.is_ok() {
            prop_assert!(fine.is_ok());
        }
    }
}
