use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("fuelstop");
    cmd.env("FUELSTOP_CARRIERS", fixture("carriers.csv"))
        .env("FUELSTOP_NODES", fixture("nodes.csv"))
        .env("RUST_LOG", "error")
        .env("NO_COLOR", "1");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

#[test]
fn lists_carriers_with_capacities() {
    cli()
        .arg("carriers")
        .assert()
        .success()
        .stdout(contains("Available carriers (6):"))
        .stdout(contains("bulkcarrier-75000DWT"))
        .stdout(contains("2,500 t"))
        .stdout(contains("24,000 L"))
        .stdout(contains("0.320 L/km"));
}

#[test]
fn lists_carriers_as_json() {
    let value = stdout_json(cli().args(["--format", "json", "carriers"]));
    let carriers = value.as_array().expect("array of carriers");
    assert_eq!(carriers.len(), 6);
    assert!(carriers
        .iter()
        .any(|c| c["name"] == "diesel-loco" && c["mode"] == "rail"));
}

#[test]
fn lists_nodes_for_mode() {
    cli()
        .args(["nodes", "--mode", "air"])
        .assert()
        .success()
        .stdout(contains("Nodes for air (4):"))
        .stdout(contains("AMS"))
        .stdout(contains("Singapore Changi"));

    cli()
        .args(["nodes", "--mode", "maritime"])
        .assert()
        .success()
        .stdout(contains("Port Said"))
        .stdout(contains("unpriced"));
}

#[test]
fn plans_road_leg_with_refuel_stop() {
    let dir = tempdir().expect("temp dir");
    let carriers = dir.path().join("carriers.csv");
    fs::write(
        &carriers,
        "name,mode,fuel_capacity_tons,fuel_capacity_l,consumption_tons_per_nm,\
         consumption_l_per_km,consumption_l_per_100km,consumption_kg_per_hr,\
         service_speed_knots,cruise_speed_kmh\n\
         small-van,road,,100,,,32,,,80\n",
    )
    .expect("write carriers");

    let value = stdout_json(cli().arg("--carriers").arg(&carriers).args([
        "--format",
        "json",
        "plan",
        "--mode",
        "road",
        "--carrier",
        "small-van",
        "--step",
        "1",
        "--from",
        "53.55,9.99",
        "--to",
        "48.14,11.58",
    ]));

    let leg = &value["legs"][0];
    assert_eq!(leg["fuel_unit"], "liters");
    assert_eq!(leg["distance_unit"], "kilometers");
    assert!(!leg["refuel_actions"]
        .as_array()
        .expect("refuel list")
        .is_empty());
    assert!(value["total_cost"].as_f64().expect("cost") > 0.0);
}

#[test]
fn chains_waypoints_into_legs() {
    cli()
        .args([
            "plan",
            "--mode",
            "rail",
            "--carrier",
            "diesel-loco",
            "--from",
            "53.55,9.99",
            "--to",
            "51.31,9.49",
            "--to",
            "48.14,11.58",
        ])
        .assert()
        .success()
        .stdout(contains("Leg 1: diesel-loco by rail"))
        .stdout(contains("Leg 2: diesel-loco by rail"))
        .stdout(contains("Trip: 2 legs"));
}

#[test]
fn sea_leg_then_road_leg_uses_a_carrier_per_mode() {
    let value = stdout_json(cli().args([
        "--format",
        "json",
        "plan",
        "--mode",
        "maritime",
        "--carrier",
        "bulkcarrier-75000DWT",
        "--carrier",
        "road=truck-40t",
        "--from",
        "51.95,4.14",
        "--to",
        "53.54,8.58",
        "--to",
        "48.14,11.58@road",
    ]));

    let legs = value["legs"].as_array().expect("legs");
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0]["mode"], "maritime");
    assert_eq!(legs[0]["carrier"], "bulkcarrier-75000DWT");
    assert_eq!(legs[0]["fuel_unit"], "tons");
    assert_eq!(legs[0]["step_size"], 1.0);
    assert_eq!(legs[1]["mode"], "road");
    assert_eq!(legs[1]["carrier"], "truck-40t");
    assert_eq!(legs[1]["fuel_unit"], "liters");
    assert_eq!(legs[1]["step_size"], 50.0);
    assert!(value["total_distance_km"].as_f64().expect("distance") > 800.0);
}

#[test]
fn mode_without_a_carrier_falls_back_to_the_catalog() {
    cli()
        .args([
            "plan",
            "--mode",
            "maritime",
            "--carrier",
            "bulkcarrier-75000DWT",
            "--from",
            "51.95,4.14",
            "--to",
            "53.54,8.58",
            "--to",
            "48.14,11.58@road",
        ])
        .assert()
        .success()
        .stdout(contains("Leg 1: bulkcarrier-75000DWT by maritime"))
        .stdout(contains("Leg 2: truck-40t by road"))
        .stdout(contains("Trip: 2 legs"));
}

#[test]
fn accepts_negative_coordinates() {
    cli()
        .args([
            "plan",
            "--mode",
            "maritime",
            "--carrier",
            "bulkcarrier-75000DWT",
            "--step",
            "10",
            "--from",
            "-33.9,18.4",
            "--to",
            "1.29,103.85",
        ])
        .assert()
        .success()
        .stdout(contains("TRAVEL Origin"));
}

#[test]
fn infeasible_trip_exits_with_status_two() {
    cli()
        .args([
            "plan",
            "--mode",
            "maritime",
            "--carrier",
            "harbour-tug",
            "--from",
            "51.95,4.14",
            "--to",
            "1.35,103.82",
        ])
        .assert()
        .code(2)
        .stderr(contains("has no feasible itinerary"))
        .stderr(contains("reducing --step"))
        .stderr(contains("no feasible route"));
}

#[test]
fn node_cap_hint_names_max_nodes() {
    cli()
        .args([
            "plan",
            "--mode",
            "maritime",
            "--carrier",
            "harbour-tug",
            "--max-nodes",
            "3",
            "--from",
            "51.95,4.14",
            "--to",
            "53.54,8.58",
        ])
        .assert()
        .code(2)
        .stderr(contains("raising --max-nodes to at least 8"));
}

#[test]
fn unknown_carrier_suggests_alternatives() {
    cli()
        .args([
            "plan",
            "--mode",
            "maritime",
            "--carrier",
            "feeder-1000",
            "--from",
            "51.95,4.14",
            "--to",
            "1.35,103.82",
        ])
        .assert()
        .code(1)
        .stderr(contains("unknown carrier: feeder-1000"))
        .stderr(contains("feeder-1000TEU"));
}

#[test]
fn carrier_mode_mismatch_is_a_configuration_error() {
    cli()
        .args([
            "plan",
            "--mode",
            "air",
            "--carrier",
            "truck-40t",
            "--from",
            "52.31,4.77",
            "--to",
            "50.04,8.56",
        ])
        .assert()
        .code(1)
        .stderr(contains("is a road carrier"));
}

#[test]
fn missing_explicit_catalog_is_reported() {
    let dir = tempdir().expect("temp dir");
    cli()
        .arg("--carriers")
        .arg(dir.path().join("absent.csv"))
        .arg("carriers")
        .assert()
        .code(1)
        .stderr(contains("failed to load carriers from"));
}
