//! Output formatting for plans and catalog listings.
//!
//! Every renderer writes to a caller-supplied [`Write`] so the same code
//! serves stdout and the unit tests below.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use fuelstop_lib::{CarrierProfile, Node, Plan, PlanStep, StepAction, TransportMode};

use crate::terminal::{format_amount, format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable itinerary and tables.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// JSON document emitted by `fuelstop plan --format json`.
///
/// Legs of different modes measure distance in different units, so the
/// trip total is given in kilometres.
#[derive(Debug, Serialize)]
pub struct TripReport<'a> {
    pub legs: &'a [Plan],
    pub total_cost: f64,
    pub total_distance_km: f64,
    pub total_time: f64,
    pub refuel_count: usize,
}

impl<'a> TripReport<'a> {
    pub fn new(legs: &'a [Plan]) -> Self {
        Self {
            legs,
            total_cost: legs.iter().map(|plan| plan.total_cost).sum(),
            total_distance_km: legs
                .iter()
                .map(|plan| plan.distance_unit.to_kilometers(plan.total_distance))
                .sum(),
            total_time: legs.iter().map(|plan| plan.total_time).sum(),
            refuel_count: legs.iter().map(Plan::refuel_count).sum(),
        }
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Text renderer for planned trips.
pub struct PlanRenderer {
    palette: ColorPalette,
}

impl PlanRenderer {
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    /// Render every leg, then a trip summary when there is more than one.
    pub fn write_trip<W: Write>(&self, out: &mut W, plans: &[Plan]) -> io::Result<()> {
        for (index, plan) in plans.iter().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            self.write_leg(out, index + 1, plan)?;
        }

        if plans.len() > 1 {
            let report = TripReport::new(plans);
            let p = &self.palette;
            writeln!(out)?;
            writeln!(
                out,
                "Trip: {} legs, {} refuel stops, total cost {}{}{}, {} km in {} h",
                plans.len(),
                report.refuel_count,
                p.green,
                format_amount(report.total_cost, 2),
                p.reset,
                format_amount(report.total_distance_km, 1),
                format_amount(report.total_time, 1),
            )?;
        }
        Ok(())
    }

    fn write_leg<W: Write>(&self, out: &mut W, number: usize, plan: &Plan) -> io::Result<()> {
        let p = &self.palette;
        writeln!(
            out,
            "Leg {number}: {}{}{} by {} ({} step {})",
            p.white_bold,
            plan.carrier,
            p.reset,
            plan.mode,
            plan.fuel_unit,
            format_amount(plan.step_size, 2),
        )?;

        for step in &plan.steps {
            self.write_step(out, plan, step)?;
        }

        let fuel = plan.fuel_unit.symbol();
        writeln!(
            out,
            "  Refuel stops: {} ({} {fuel} purchased)",
            plan.refuel_count(),
            format_amount(plan.total_fuel_purchased(), 2),
        )?;
        writeln!(
            out,
            "  Total cost: {}{}{}",
            p.green,
            format_amount(plan.total_cost, 2),
            p.reset
        )?;
        writeln!(
            out,
            "  Distance: {} {} in {} h",
            format_amount(plan.total_distance, 1),
            plan.distance_unit.symbol(),
            format_amount(plan.total_time, 1),
        )?;
        writeln!(
            out,
            "  Fuel on arrival: {} {fuel}",
            format_amount(plan.final_fuel_amount, 2)
        )?;
        writeln!(
            out,
            "  {}States explored: {}{}",
            p.gray,
            format_with_separators(plan.states_expanded as u64),
            p.reset
        )
    }

    fn write_step<W: Write>(&self, out: &mut W, plan: &Plan, step: &PlanStep) -> io::Result<()> {
        let p = &self.palette;
        let fuel = plan.fuel_unit.symbol();
        match &step.action {
            StepAction::Travel(leg) => writeln!(
                out,
                "  {}TRAVEL{} {}{}{} -> {}{}{}  {} {}, {} h, fuel {} -> {} {fuel}",
                p.tag_travel,
                p.reset,
                p.white_bold,
                leg.from,
                p.reset,
                p.white_bold,
                leg.to,
                p.reset,
                format_amount(leg.distance, 1),
                plan.distance_unit.symbol(),
                format_amount(leg.time, 1),
                format_amount(step.fuel_before, 2),
                format_amount(step.fuel_after, 2),
            ),
            StepAction::Refuel(refuel) => writeln!(
                out,
                "  {}REFUEL{} {}{}{}  +{} {fuel} @ {}/{fuel} + fee {} = {}{}{}",
                p.tag_refuel,
                p.reset,
                p.white_bold,
                refuel.node,
                p.reset,
                format_amount(refuel.added_amount, 2),
                format_amount(refuel.price_per_unit, 2),
                format_amount(refuel.stop_fee, 2),
                p.green,
                format_amount(refuel.cost, 2),
                p.reset,
            ),
        }
    }
}

/// Write the carrier catalog as a table.
pub fn write_carrier_table<W: Write>(out: &mut W, carriers: &[&CarrierProfile]) -> io::Result<()> {
    if carriers.is_empty() {
        return writeln!(out, "No carriers available in catalog.");
    }

    writeln!(out, "Available carriers ({}):", carriers.len())?;
    writeln!(
        out,
        "{:<22} {:<9} {:>12} {:>14} {:>10}",
        "Name", "Mode", "Capacity", "Burn", "Speed"
    )?;
    for carrier in carriers {
        let mode = carrier.mode;
        let fuel = mode.natural_fuel_unit();
        let distance = mode.distance_unit().symbol();
        let capacity = carrier
            .capacity_in(fuel)
            .map(|value| format!("{} {}", format_amount(value, 0), fuel.symbol()))
            .unwrap_or_else(|| "-".to_string());
        let (burn, speed) = match carrier.resolve(mode, fuel) {
            Ok(params) => (
                format!(
                    "{:.3} {}/{distance}",
                    params.consumption_per_distance,
                    fuel.symbol()
                ),
                format!("{:.0} {}", params.speed, speed_unit(mode)),
            ),
            Err(_) => ("-".to_string(), "-".to_string()),
        };
        writeln!(
            out,
            "{:<22} {:<9} {:>12} {:>14} {:>10}",
            carrier.name,
            mode.to_string(),
            capacity,
            burn,
            speed
        )?;
    }
    Ok(())
}

/// Write the nodes serving `mode` as a table.
pub fn write_node_table<W: Write>(
    out: &mut W,
    mode: TransportMode,
    nodes: &[Node],
) -> io::Result<()> {
    if nodes.is_empty() {
        return writeln!(out, "No nodes serve {mode}.");
    }

    let fuel = mode.natural_fuel_unit().symbol();
    writeln!(out, "Nodes for {mode} ({}):", nodes.len())?;
    writeln!(
        out,
        "{:<12} {:<22} {:<6} {:>20} {:>12} {:>10}",
        "Id", "Name", "Code", "Position", "Price", "Fee"
    )?;
    for node in nodes {
        let price = node
            .price_per_unit
            .map(|price| format!("{}/{fuel}", format_amount(price, 2)))
            .unwrap_or_else(|| "unpriced".to_string());
        writeln!(
            out,
            "{:<12} {:<22} {:<6} {:>20} {:>12} {:>10}",
            node.id,
            node.name,
            node.code.as_deref().unwrap_or("-"),
            node.coordinate.to_string(),
            price,
            format_amount(node.stop_fee, 2)
        )?;
    }
    Ok(())
}

fn speed_unit(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Maritime => "kn",
        TransportMode::Air | TransportMode::Road | TransportMode::Rail => "km/h",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelstop_lib::geo::equatorial_degrees_for_nm;
    use fuelstop_lib::{
        find_optimal_refuel_route, CarrierProfile, Coordinate, NodeKind, RefuelRequest,
        StaticNodeCatalog,
    };

    fn midway_plan() -> Plan {
        let mut catalog = StaticNodeCatalog::new();
        catalog
            .push(
                NodeKind::Port,
                "Midway",
                None,
                Coordinate::new(0.0, equatorial_degrees_for_nm(150.0)),
                Some(2.0),
                100.0,
            )
            .expect("valid port");
        let request = RefuelRequest::new(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, equatorial_degrees_for_nm(300.0)),
            CarrierProfile::maritime("test-vessel", 200.0, 1.0),
            TransportMode::Maritime,
        );
        find_optimal_refuel_route(&catalog, &request).expect("route exists")
    }

    fn render_text(plans: &[Plan]) -> String {
        let mut buffer = Vec::new();
        PlanRenderer::new(ColorPalette::plain())
            .write_trip(&mut buffer, plans)
            .expect("write to buffer");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn text_itinerary_lists_steps_in_order() {
        let text = render_text(&[midway_plan()]);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Leg 1: test-vessel by maritime"));
        assert!(lines[1].contains("TRAVEL Origin -> Midway"));
        assert!(lines[2].contains("REFUEL Midway  +120.00 t @ 2.00/t + fee 100.00 = 340.00"));
        assert!(lines[3].contains("TRAVEL Midway -> Destination"));
        assert!(text.contains("Total cost: 340.00"));
        assert!(text.contains("Fuel on arrival: 20.00 t"));
        assert!(!text.contains("Trip:"));
    }

    #[test]
    fn multi_leg_trip_gets_a_summary() {
        let plan = midway_plan();
        let text = render_text(&[plan.clone(), plan]);

        assert!(text.contains("Leg 2:"));
        assert!(text.contains("Trip: 2 legs, 2 refuel stops, total cost 680.00"));
        // Two 300 nm legs.
        assert!(text.contains("1,111.2 km"), "{text}");
    }

    #[test]
    fn trip_report_sums_legs() {
        let plan = midway_plan();
        let legs = [plan.clone(), plan];
        let report = TripReport::new(&legs);

        assert_eq!(report.refuel_count, 2);
        assert!((report.total_cost - 680.0).abs() < 1e-9);
        assert!((report.total_distance_km - 600.0 * 1.852).abs() < 1e-6);

        let mut buffer = Vec::new();
        write_json(&mut buffer, &report).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
        assert_eq!(value["legs"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["legs"][0]["steps"][1]["action"], "refuel");
    }

    #[test]
    fn carrier_table_marks_missing_fields() {
        let complete = CarrierProfile::maritime("feeder", 300.0, 0.06);
        let incomplete = CarrierProfile::new("empty-truck", TransportMode::Road);
        let mut buffer = Vec::new();
        write_carrier_table(&mut buffer, &[&complete, &incomplete]).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");

        assert!(text.starts_with("Available carriers (2):"));
        assert!(text.contains("300 t"));
        assert!(text.contains("0.060 t/nm"));
        let truck_line = text
            .lines()
            .find(|line| line.starts_with("empty-truck"))
            .expect("truck row");
        assert!(truck_line.contains('-'));
    }

    #[test]
    fn node_table_shows_unpriced_nodes() {
        let mut catalog = StaticNodeCatalog::new();
        catalog
            .push(
                NodeKind::Port,
                "Dry Dock",
                Some("DRY".to_string()),
                Coordinate::new(10.0, 20.0),
                None,
                250.0,
            )
            .expect("valid port");
        let mut buffer = Vec::new();
        write_node_table(&mut buffer, TransportMode::Maritime, catalog.nodes()).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");

        assert!(text.starts_with("Nodes for maritime (1):"));
        assert!(text.contains("unpriced"));
        assert!(text.contains("DRY"));
    }
}
