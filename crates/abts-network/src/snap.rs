//! Nearest-node spatial index.
//!
//! An R-tree (via `rstar`) maps `(lon, lat)` to the nearest retained graph
//! node.  Used when places of interest, which sit on raw map nodes that
//! pruning and trimming removed, are attached to the network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use abts_core::{GeoPoint, NodeId};

use crate::RoadGraph;

/// Entry stored in the R-tree: a 2-D `[lon, lat]` point with its `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lon/lat space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

/// Read-only snapshot of a graph's node positions for nearest-node lookups.
///
/// Built once; it does not follow later changes to the graph.
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load every node of `graph` (O(N log N)).
    pub fn build(graph: &RoadGraph) -> Self {
        let entries: Vec<NodeEntry> = graph
            .nodes()
            .map(|(id, pos)| NodeEntry { point: pos.as_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The nearest node to `pos`, or `None` for an empty graph.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.tree.nearest_neighbor(&pos.as_array()).map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&pos.as_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}
