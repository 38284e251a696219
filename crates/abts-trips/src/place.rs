//! Places of interest.
//!
//! A place is a location on the network (a retained graph node) plus a name
//! and a selection weight.  Places are grouped by category name in a
//! [`PlaceMap`].

use std::collections::BTreeMap;

use abts_core::{NodeId, RoadClass};
use abts_network::RoadGraph;

/// Category name → places in that category.
pub type PlaceMap = BTreeMap<String, Vec<Place>>;

/// Nodes whose incident residential road length (miles) is at or below this
/// are too sparsely built up to house anyone.
pub const HOME_MIN_WEIGHT: f64 = 0.01;

/// A place of interest.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Graph node the place is attached to (non-owning reference).
    pub node: NodeId,
    pub name: String,
    /// Relative selection weight, `≥ 0`.
    pub weight: f64,
}

impl Place {
    pub fn new(node: NodeId, name: impl Into<String>, weight: f64) -> Self {
        Self { node, name: name.into(), weight }
    }
}

/// Derive candidate homes from residential roads.
///
/// Each node's weight is the total length of residential edges touching
/// it, so homes are spread in proportion to residential street frontage.
/// Returned in ascending node order.
pub fn homes_from_residential(graph: &RoadGraph) -> Vec<Place> {
    graph
        .sorted_node_ids()
        .into_iter()
        .filter_map(|node| {
            let weight: f64 = graph
                .incident_edges(node)
                .filter(|(_, e)| e.road_class == RoadClass::Residential)
                .map(|(_, e)| e.length)
                .sum();
            (weight > HOME_MIN_WEIGHT).then(|| Place::new(node, "home", weight))
        })
        .collect()
}
