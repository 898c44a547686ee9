//! In-memory node catalog, loadable from CSV.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::{info, warn};

use crate::carrier::catalog::find_column;
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::mode::TransportMode;

use super::node::{Node, NodeKind};
use super::NodeCatalog;

/// Sample hubs seeded when no port data is available:
/// (name, locode, lat, lon, bunker price USD/t, port fee USD).
const SAMPLE_PORTS: &[(&str, &str, f64, f64, f64, f64)] = &[
    ("Rotterdam", "NLRTM", 51.947, 4.136, 600.0, 5000.0),
    ("Bremerhaven", "DEBRV", 53.543, 8.586, 605.0, 4800.0),
    ("Singapore", "SGSIN", 1.3521, 103.8198, 620.0, 7000.0),
    ("Hong Kong", "HKHKG", 22.3964, 114.1095, 610.0, 6500.0),
    ("Shanghai", "CNSHG", 31.2304, 121.4737, 615.0, 7200.0),
];

/// Catalog of ports, airports and stations held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticNodeCatalog {
    nodes: Vec<Node>,
    per_kind: HashMap<NodeKind, usize>,
    source: Option<PathBuf>,
}

impl StaticNodeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with five major bunkering hubs.
    pub fn sample_ports() -> Self {
        let mut catalog = Self::new();
        for &(name, code, lat, lon, price, fee) in SAMPLE_PORTS {
            // Constant table, in range by construction.
            let node = catalog.numbered(
                NodeKind::Port,
                name.to_string(),
                Some(code.to_string()),
                Coordinate::new(lat, lon),
                Some(price),
                fee,
            );
            catalog.insert(node);
        }
        catalog
    }

    /// Append a node, assigning it the next `{kind}:{n}` id.
    ///
    /// Virtual kinds (origin/destination) are rejected; the planner adds
    /// those itself.
    pub fn push(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        code: Option<String>,
        coordinate: Coordinate,
        price_per_unit: Option<f64>,
        stop_fee: f64,
    ) -> Result<&Node> {
        if kind.is_virtual() {
            return Err(Error::NodeDataValidation {
                message: format!("{kind} nodes cannot be catalogued"),
            });
        }

        let node = self.numbered(kind, name.into(), code, coordinate, price_per_unit, stop_fee);
        node.validate()?;

        let index = self.nodes.len();
        self.insert(node);
        Ok(&self.nodes[index])
    }

    /// Node carrying the next id for its kind. Nothing is recorded until
    /// [`Self::insert`].
    fn numbered(
        &self,
        kind: NodeKind,
        name: String,
        code: Option<String>,
        coordinate: Coordinate,
        price_per_unit: Option<f64>,
        stop_fee: f64,
    ) -> Node {
        let ordinal = self.per_kind.get(&kind).copied().unwrap_or(0) + 1;
        Node {
            id: format!("{kind}:{ordinal}"),
            name,
            kind,
            code,
            coordinate,
            price_per_unit,
            stop_fee,
        }
    }

    fn insert(&mut self, node: Node) {
        *self.per_kind.entry(node.kind).or_insert(0) += 1;
        self.nodes.push(node);
    }

    /// Load a catalog from a CSV file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        info!("loaded {} nodes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load a catalog from CSV with columns
    /// `kind,name,code,lat,lon,price_per_unit,stop_fee`.
    ///
    /// `code`, `price_per_unit` and `stop_fee` are optional; an empty price
    /// leaves the node unpriced and an empty fee means no fee.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::NodeDataValidation {
                message: format!("failed to read node catalog headers: {err}"),
            })?
            .clone();

        let kind_idx = find_column(&headers, &["kind", "type", "node_type"]);
        let name_idx = find_column(&headers, &["name"]);
        let lat_idx = find_column(&headers, &["lat", "latitude"]);
        let lon_idx = find_column(&headers, &["lon", "lng", "longitude"]);
        let (Some(kind_idx), Some(name_idx), Some(lat_idx), Some(lon_idx)) =
            (kind_idx, name_idx, lat_idx, lon_idx)
        else {
            return Err(Error::NodeDataValidation {
                message: format!(
                    "node catalog requires kind, name, lat and lon columns. Available: {}",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        };
        let code_idx = find_column(&headers, &["code", "unlocode", "iata", "locode"]);
        let price_idx = find_column(
            &headers,
            &[
                "price_per_unit",
                "price",
                "bunker_price",
                "jet_price_per_l",
                "diesel_price_per_l",
            ],
        );
        let fee_idx = find_column(
            &headers,
            &["stop_fee", "fee", "port_fee", "landing_fee", "service_fee"],
        );

        let mut catalog = Self::new();
        for (offset, result) in csv_reader.records().enumerate() {
            let row = offset + 2;
            let record = result.map_err(|e| Error::NodeDataValidation {
                message: e.to_string(),
            })?;

            let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty());
            let name = cell(Some(name_idx)).unwrap_or_default().to_string();
            let number = |idx: Option<usize>, field: &str| -> Result<Option<f64>> {
                cell(idx)
                    .map(|raw| {
                        raw.parse::<f64>().map_err(|e| Error::NodeDataValidation {
                            message: format!("invalid {field} for node '{name}' at row {row}: {e}"),
                        })
                    })
                    .transpose()
            };

            let kind: NodeKind = cell(Some(kind_idx))
                .unwrap_or_default()
                .parse::<NodeKind>()
                .map_err(|err| at_row(row, err))?;
            let lat = number(Some(lat_idx), "lat")?;
            let lon = number(Some(lon_idx), "lon")?;
            let (Some(lat), Some(lon)) = (lat, lon) else {
                return Err(Error::NodeDataValidation {
                    message: format!("missing coordinates for node '{name}' at row {row}"),
                });
            };
            let price = number(price_idx, "price_per_unit")?;
            let fee = number(fee_idx, "stop_fee")?.unwrap_or(0.0);
            let code = cell(code_idx).map(str::to_string);

            catalog
                .push(kind, name.clone(), code, Coordinate::new(lat, lon), price, fee)
                .map_err(|err| at_row(row, err))?;
        }

        let unpriced = catalog.nodes.iter().filter(|n| !n.is_priced()).count();
        if unpriced > 0 {
            warn!("{unpriced} catalog nodes have no fuel price and will never be used to refuel");
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every catalogued node, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl NodeCatalog for StaticNodeCatalog {
    fn nodes_for_mode(&self, mode: TransportMode) -> Result<Vec<Node>> {
        let kind = NodeKind::for_mode(mode);
        Ok(self
            .nodes
            .iter()
            .filter(|node| node.kind == kind)
            .cloned()
            .collect())
    }
}

/// Attach a CSV row number to a node error, keeping a single
/// "invalid node data" prefix.
fn at_row(row: usize, err: Error) -> Error {
    let detail = match err {
        Error::NodeDataValidation { message } | Error::DegenerateInput { message } => message,
        other => other.to_string(),
    };
    Error::NodeDataValidation {
        message: format!("row {row}: {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sample_ports_are_priced_ports() {
        let catalog = StaticNodeCatalog::sample_ports();
        let ports = catalog
            .nodes_for_mode(TransportMode::Maritime)
            .expect("static catalog never fails");
        assert_eq!(ports.len(), 5);
        assert!(ports.iter().all(|p| p.is_priced() && p.kind == NodeKind::Port));
        assert_eq!(ports[0].id, "port:1");
        assert_eq!(ports[0].name, "Rotterdam");
        assert_eq!(ports[0].code.as_deref(), Some("NLRTM"));
        assert!(catalog
            .nodes_for_mode(TransportMode::Air)
            .expect("static catalog never fails")
            .is_empty());
    }

    #[test]
    fn ids_are_numbered_per_kind() {
        let csv = "kind,name,lat,lon,price_per_unit,stop_fee\n\
                   port,A,0,0,600,100\n\
                   station,B,0,1,1.5,\n\
                   port,C,0,2,,\n";
        let catalog = StaticNodeCatalog::from_reader(Cursor::new(csv)).expect("valid csv");
        let ids: Vec<&str> = catalog.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["port:1", "station:1", "port:2"]);

        let c = &catalog.nodes()[2];
        assert_eq!(c.price_per_unit, None);
        assert_eq!(c.stop_fee, 0.0);
    }

    #[test]
    fn road_and_rail_share_stations() {
        let csv = "kind,name,lat,lon,diesel_price_per_l,service_fee\nstation,Depot,10,10,1.6,20\n";
        let catalog = StaticNodeCatalog::from_reader(Cursor::new(csv)).expect("valid csv");
        let road = catalog.nodes_for_mode(TransportMode::Road).unwrap();
        let rail = catalog.nodes_for_mode(TransportMode::Rail).unwrap();
        assert_eq!(road, rail);
        assert_eq!(road[0].price_per_unit, Some(1.6));
        assert_eq!(road[0].stop_fee, 20.0);
    }

    #[test]
    fn rejects_out_of_range_latitude_with_row() {
        let csv = "kind,name,lat,lon\nport,Nowhere,95,0\n";
        let err = StaticNodeCatalog::from_reader(Cursor::new(csv)).expect_err("bad latitude");
        let message = err.to_string();
        assert!(message.contains("row 2"), "{message}");
        assert!(message.contains("latitude"), "{message}");
        assert_eq!(message.matches("invalid node data").count(), 1, "{message}");
        assert!(!message.contains("degenerate input"), "{message}");
    }

    #[test]
    fn row_errors_carry_one_prefix() {
        let csv = "kind,name,lat,lon,price\nport,Cheap,0,0,-5\n";
        let err = StaticNodeCatalog::from_reader(Cursor::new(csv)).expect_err("negative price");
        assert_eq!(
            err.to_string(),
            "invalid node data: row 2: node 'Cheap': price_per_unit must be finite and non-negative, got -5"
        );

        let csv = "kind,name,lat,lon\nspaceport,X,0,0\n";
        let err = StaticNodeCatalog::from_reader(Cursor::new(csv)).expect_err("unknown kind");
        assert_eq!(
            err.to_string(),
            "invalid node data: row 2: unknown node kind 'spaceport'; expected port, airport or station"
        );
    }

    #[test]
    fn sample_ports_pass_validation() {
        let catalog = StaticNodeCatalog::sample_ports();
        for node in catalog.nodes() {
            node.validate().expect("sample port is valid");
        }
        let mut extended = catalog.clone();
        let added = extended
            .push(
                NodeKind::Port,
                "Antwerp",
                Some("BEANR".to_string()),
                Coordinate::new(51.26, 4.4),
                Some(598.0),
                4500.0,
            )
            .expect("valid port");
        assert_eq!(added.id, "port:6");
    }

    #[test]
    fn rejects_unknown_kind() {
        let csv = "kind,name,lat,lon\nspaceport,X,0,0\n";
        assert!(StaticNodeCatalog::from_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn push_refuses_virtual_nodes() {
        let mut catalog = StaticNodeCatalog::new();
        assert!(catalog
            .push(
                NodeKind::Origin,
                "o",
                None,
                Coordinate::new(0.0, 0.0),
                None,
                0.0
            )
            .is_err());
    }
}
