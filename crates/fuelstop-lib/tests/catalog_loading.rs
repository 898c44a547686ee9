mod common;

use std::fs;

use common::fixtures_dir;
use fuelstop_lib::error::Error;
use fuelstop_lib::{
    find_optimal_refuel_route, plan_legs, CarrierCatalog, Coordinate, DistanceUnit, FuelUnit,
    NodeCatalog, PlannerConfig, RefuelRequest, StaticNodeCatalog, TransportMode, Waypoint,
};
use tempfile::tempdir;

#[test]
fn loads_fixture_carriers_from_csv() {
    let catalog =
        CarrierCatalog::from_path(&fixtures_dir().join("carriers.csv")).expect("fixture should load");

    assert_eq!(
        catalog.carrier_names(),
        vec![
            "A320neo",
            "bulkcarrier-75000DWT",
            "diesel-loco",
            "feeder-1000TEU",
            "harbour-tug",
            "truck-40t"
        ]
    );

    let truck = catalog.get("TRUCK-40T").expect("case-insensitive lookup");
    let params = truck
        .resolve(TransportMode::Road, FuelUnit::Liters)
        .expect("road parameters");
    assert!((params.consumption_per_distance - 0.32).abs() < 1e-12);
    assert_eq!(params.capacity, 600.0);
    assert_eq!(params.speed, 80.0);
}

#[test]
fn grouped_json_fixture_matches_csv_fixture() {
    let csv = CarrierCatalog::from_path(&fixtures_dir().join("carriers.csv")).expect("csv loads");
    let json =
        CarrierCatalog::from_path(&fixtures_dir().join("carriers.json")).expect("json loads");

    for name in json.carrier_names() {
        assert_eq!(json.get(&name), csv.get(&name), "{name} differs");
    }
    assert_eq!(
        json.get("bulkcarrier-75000DWT").map(|c| c.mode),
        Some(TransportMode::Maritime)
    );
}

#[test]
fn unknown_carrier_suggests_close_names() {
    let catalog =
        CarrierCatalog::from_path(&fixtures_dir().join("carriers.csv")).expect("fixture loads");

    let err = catalog.require("feeder-1000").expect_err("unknown carrier");
    match err {
        Error::UnknownCarrier { name, suggestions } => {
            assert_eq!(name, "feeder-1000");
            assert_eq!(suggestions.first().map(String::as_str), Some("feeder-1000TEU"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_duplicate_names_case_insensitive() {
    let csv = "name,mode,fuel_capacity_tons,consumption_tons_per_nm\n".to_string()
        + "Feeder,maritime,300,0.06\n"
        + "feeder,maritime,310,0.06\n";

    let err = CarrierCatalog::from_csv_reader(csv.as_bytes()).expect_err("should reject duplicates");
    match err {
        Error::DuplicateCarrierName { name } => assert_eq!(name, "feeder"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_non_positive_carrier_values() {
    let csv = "name,mode,fuel_capacity_tons,consumption_tons_per_nm\nFeeder,maritime,-1,0.06\n";

    let err = CarrierCatalog::from_csv_reader(csv.as_bytes()).expect_err("negative capacity");
    match err {
        Error::CarrierDataValidation { message } => {
            assert!(message.contains("fuel_capacity_tons"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn node_fixture_splits_by_mode() {
    let catalog =
        StaticNodeCatalog::from_path(&fixtures_dir().join("nodes.csv")).expect("fixture loads");

    let ports = catalog
        .nodes_for_mode(TransportMode::Maritime)
        .expect("ports");
    let airports = catalog.nodes_for_mode(TransportMode::Air).expect("airports");
    let stations = catalog.nodes_for_mode(TransportMode::Rail).expect("stations");

    assert_eq!(ports.len(), 6);
    assert_eq!(airports.len(), 4);
    assert_eq!(stations.len(), 5);

    let port_said = ports
        .iter()
        .find(|p| p.name == "Port Said")
        .expect("Port Said listed");
    assert!(!port_said.is_priced());
    assert_eq!(port_said.stop_fee, 3500.0);
    assert_eq!(airports[0].code.as_deref(), Some("AMS"));
    assert_eq!(stations[0].code, None);
}

#[test]
fn road_leg_over_fixtures_refuels_at_a_station() {
    let carriers =
        CarrierCatalog::from_path(&fixtures_dir().join("carriers.csv")).expect("carriers load");
    let nodes =
        StaticNodeCatalog::from_path(&fixtures_dir().join("nodes.csv")).expect("nodes load");

    // Hamburg to Munich is roughly 610 km; a 100 l tank at 0.32 l/km covers
    // about 310 km, so the truck has to stop along the station chain.
    let mut truck = carriers.require("truck-40t").expect("truck").clone();
    truck.fuel_capacity_l = Some(100.0);

    let request = RefuelRequest::new(
        Coordinate::new(53.55, 9.99),
        Coordinate::new(48.14, 11.58),
        truck,
        TransportMode::Road,
    )
    .with_step_size(1.0);
    let plan = find_optimal_refuel_route(&nodes, &request).expect("route exists");

    assert!(plan.refuel_count() >= 1);
    assert_eq!(plan.fuel_unit, FuelUnit::Liters);
    assert!(plan.total_distance > 600.0);
}

#[test]
fn sea_then_road_trip_switches_carrier_and_units() {
    let carriers =
        CarrierCatalog::from_path(&fixtures_dir().join("carriers.csv")).expect("carriers load");
    let nodes =
        StaticNodeCatalog::from_path(&fixtures_dir().join("nodes.csv")).expect("nodes load");

    // Rotterdam by sea to Bremerhaven, then by truck to Munich.
    let stops: Vec<Waypoint> = ["53.54,8.58", "48.14,11.58@road"]
        .iter()
        .map(|s| s.parse().expect("valid waypoint"))
        .collect();
    let requests = RefuelRequest::multimodal(
        Coordinate::new(51.95, 4.14),
        &stops,
        TransportMode::Maritime,
        &PlannerConfig::default(),
        |mode| match mode {
            TransportMode::Maritime => carriers.require("bulkcarrier-75000DWT").cloned(),
            other => carriers.default_for_mode(other).cloned(),
        },
    )
    .expect("carrier for every leg");

    assert_eq!(requests[0].carrier.name, "bulkcarrier-75000DWT");
    assert_eq!(requests[1].carrier.name, "truck-40t");
    assert_eq!(requests[1].step_size, TransportMode::Road.default_step_size());

    let plans: Vec<_> = plan_legs(&nodes, &requests)
        .into_iter()
        .map(|result| result.expect("leg is feasible"))
        .collect();

    assert_eq!(plans[0].mode, TransportMode::Maritime);
    assert_eq!(plans[0].fuel_unit, FuelUnit::Tons);
    assert_eq!(plans[0].distance_unit, DistanceUnit::NauticalMiles);
    assert_eq!(plans[1].mode, TransportMode::Road);
    assert_eq!(plans[1].fuel_unit, FuelUnit::Liters);
    assert_eq!(plans[1].distance_unit, DistanceUnit::Kilometers);
    // Both legs fit in a full tank.
    assert!(plans.iter().all(|plan| plan.refuel_count() == 0));
    assert!(plans[1].total_distance > 500.0);
}

#[test]
fn malformed_node_file_reports_row() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nodes.csv");
    fs::write(&path, "kind,name,lat,lon,price\nport,Good,1,1,600\nport,Bad,1,abc,600\n")
        .expect("write csv");

    let err = StaticNodeCatalog::from_path(&path).expect_err("bad longitude");
    let message = err.to_string();
    assert!(message.contains("row 3"), "{message}");
}

#[test]
fn missing_file_propagates_io_error() {
    let dir = tempdir().expect("temp dir");
    let err = StaticNodeCatalog::from_path(&dir.path().join("absent.csv")).expect_err("missing");
    assert!(matches!(err, Error::Io(_)));
}
