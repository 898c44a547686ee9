//! Common test utilities and fixture helpers.
//!
//! Most scenarios lay nodes out along the equator so that distances in
//! nautical miles are easy to reason about.

use std::path::PathBuf;

use fuelstop_lib::geo::equatorial_degrees_for_nm;
use fuelstop_lib::{
    CarrierProfile, Coordinate, NodeKind, RefuelRequest, StaticNodeCatalog, TransportMode,
};

/// Path to fixtures directory used by tests (carrier and node catalogs).
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Point on the equator `nm` nautical miles east of (0, 0).
pub fn equator(nm: f64) -> Coordinate {
    Coordinate::new(0.0, equatorial_degrees_for_nm(nm))
}

/// A priced (or unpriced) port at `nm` along the equator.
#[allow(dead_code)]
pub struct PortSpec {
    pub name: &'static str,
    pub nm: f64,
    pub price: Option<f64>,
    pub fee: f64,
}

/// Build a maritime catalog from port specs, in order.
#[allow(dead_code)]
pub fn equator_catalog(ports: &[PortSpec]) -> StaticNodeCatalog {
    let mut catalog = StaticNodeCatalog::new();
    for port in ports {
        catalog
            .push(
                NodeKind::Port,
                port.name,
                None,
                equator(port.nm),
                port.price,
                port.fee,
            )
            .expect("valid port");
    }
    catalog
}

/// Vessel burning `tons_per_nm` with a `capacity` tonne tank.
#[allow(dead_code)]
pub fn vessel(capacity: f64, tons_per_nm: f64) -> CarrierProfile {
    CarrierProfile::maritime("test-vessel", capacity, tons_per_nm)
}

/// Maritime request from `from_nm` to `to_nm` along the equator.
#[allow(dead_code)]
pub fn equator_request(from_nm: f64, to_nm: f64, carrier: CarrierProfile) -> RefuelRequest {
    RefuelRequest::new(equator(from_nm), equator(to_nm), carrier, TransportMode::Maritime)
}
