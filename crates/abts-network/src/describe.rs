//! Human-readable descriptions of nodes and edges.
//!
//! Report layers use these to say *where* a probed edge is, since raw node
//! ids mean nothing to a reader.

use std::collections::BTreeSet;

use abts_core::{EdgeKey, NodeId};

use crate::RoadGraph;

impl RoadGraph {
    /// Describe a node by the streets meeting there.
    ///
    /// A node whose incident edges all carry one name is the end point of
    /// that street; anything else is a junction.
    pub fn describe_node(&self, node: NodeId) -> String {
        let names: BTreeSet<&str> = self
            .incident_edges(node)
            .map(|(_, e)| e.name.as_str())
            .collect();

        let prefix = if names.len() == 1 { "end point of " } else { "junction of " };
        let joined: Vec<&str> = names.into_iter().collect();
        format!("{prefix}{}", joined.join(", "))
    }

    /// One-line summary of an edge's attributes, or `None` if absent.
    pub fn describe_edge(&self, key: EdgeKey) -> Option<String> {
        self.edge_by_key(key).map(|e| {
            format!(
                "{} road {}, length {:.3} mile, travel time {:.4} hour",
                e.road_class, e.name, e.length, e.travel_time
            )
        })
    }
}
