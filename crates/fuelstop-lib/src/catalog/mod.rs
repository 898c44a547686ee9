//! Node catalog adapter.
//!
//! The planner asks a [`NodeCatalog`] for every candidate refuelling location
//! that serves a transport mode. Catalogs are read-only for the duration of a
//! planning call and may be shared between concurrent calls.

mod node;
mod static_catalog;

pub use node::{Node, NodeKind, DESTINATION_ID, ORIGIN_ID};
pub use static_catalog::StaticNodeCatalog;

use crate::error::Result;
use crate::mode::TransportMode;

/// Source of candidate refuelling nodes.
pub trait NodeCatalog: Send + Sync {
    /// All candidate nodes for `mode`, in catalog order.
    ///
    /// An empty list is a valid answer. Failures of the underlying source are
    /// returned unchanged.
    fn nodes_for_mode(&self, mode: TransportMode) -> Result<Vec<Node>>;
}
