//! Undirected road connectivity graph.
//!
//! # Data layout
//!
//! Unlike a CSR layout, the graph is mutated in place twice over its life:
//! once by trimming during construction and then repeatedly by the
//! sensitivity sweep's remove/restore probes.  It is therefore stored as an
//! owned adjacency structure with O(1) add/remove:
//!
//! ```text
//! nodes:     NodeId  → GeoPoint
//! adjacency: NodeId  → { neighbour NodeId, … }
//! edges:     EdgeKey → Edge            (one entry per unordered pair)
//! ```
//!
//! Edge attributes live exactly once, in `edges`, so removing and restoring
//! an edge cannot leave the two directions out of sync.
//!
//! # Invariants
//!
//! - Simple and undirected: at most one edge per unordered pair, no loops.
//! - Every edge endpoint is a node of the graph.
//! - `adjacency[n]` contains `m` iff `edges` contains `EdgeKey(n, m)`.

use rustc_hash::{FxHashMap, FxHashSet};

use abts_core::{EdgeKey, GeoPoint, NodeId, RoadClass};

use crate::NetworkError;

// ── Edge ──────────────────────────────────────────────────────────────────────

/// Attributes of one undirected road segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Time to traverse the segment, in hours.
    pub travel_time: f64,
    /// Length of the segment, in miles.
    pub length: f64,
    pub road_class: RoadClass,
    /// Street name; empty for unnamed roads.
    pub name: String,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Simple undirected weighted graph keyed by raw map node ids.
///
/// `PartialEq` compares node coordinates and the full edge set including
/// attributes, which is what the sweep's restore invariant is stated in.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    nodes:     FxHashMap<NodeId, GeoPoint>,
    adjacency: FxHashMap<NodeId, FxHashSet<NodeId>>,
    edges:     FxHashMap<EdgeKey, Edge>,
}

impl PartialEq for RoadGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Insert a node, or move an existing one to `pos`.
    pub fn add_node(&mut self, id: NodeId, pos: GeoPoint) {
        self.nodes.insert(id, pos);
        self.adjacency.entry(id).or_default();
    }

    /// Remove a node together with all its incident edges.
    pub fn remove_node(&mut self, id: NodeId) -> Option<GeoPoint> {
        let pos = self.nodes.remove(&id)?;
        if let Some(neighbours) = self.adjacency.remove(&id) {
            for n in neighbours {
                if let Some(set) = self.adjacency.get_mut(&n) {
                    set.remove(&id);
                }
                if let Some(key) = EdgeKey::new(id, n) {
                    self.edges.remove(&key);
                }
            }
        }
        Some(pos)
    }

    /// Remove every node with no incident edge.  Returns how many were removed.
    pub fn remove_isolated_nodes(&mut self) -> usize {
        let isolated: Vec<NodeId> = self
            .adjacency
            .iter()
            .filter(|(_, set)| set.is_empty())
            .map(|(&id, _)| id)
            .collect();
        for id in &isolated {
            self.nodes.remove(id);
            self.adjacency.remove(id);
        }
        isolated.len()
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[inline]
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(&id).copied()
    }

    /// Iterator over `(id, position)` of all nodes, in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, GeoPoint)> + '_ {
        self.nodes.iter().map(|(&id, &pos)| (id, pos))
    }

    /// All node ids in ascending order.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of incident edges; `0` for unknown nodes.
    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(&id).map_or(0, |set| set.len())
    }

    /// Neighbours of `id`, in unspecified order.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&id).into_iter().flatten().copied()
    }

    /// `(neighbour, edge)` pairs for every edge incident to `id`.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.neighbors(id).filter_map(move |n| {
            let key = EdgeKey::new(id, n)?;
            self.edges.get(&key).map(|e| (n, e))
        })
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// Iterator over all edges, in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> + '_ {
        self.edges.iter().map(|(&k, e)| (k, e))
    }

    /// All edge keys in ascending order, a stable snapshot to iterate while
    /// the graph itself is being mutated.
    pub fn sorted_edge_keys(&self) -> Vec<EdgeKey> {
        let mut keys: Vec<EdgeKey> = self.edges.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    #[inline]
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        EdgeKey::new(a, b).and_then(|k| self.edges.get(&k))
    }

    #[inline]
    pub fn edge_by_key(&self, key: EdgeKey) -> Option<&Edge> {
        self.edges.get(&key)
    }

    #[inline]
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge(a, b).is_some()
    }

    /// Insert an undirected edge, replacing any edge already joining the
    /// pair.  Returns the replaced edge.
    ///
    /// Both endpoints must already be nodes of the graph.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, edge: Edge) -> Result<Option<Edge>, NetworkError> {
        let key = EdgeKey::new(a, b).ok_or(NetworkError::SelfLoop(a))?;
        for n in [a, b] {
            if !self.nodes.contains_key(&n) {
                return Err(NetworkError::MissingEndpoint(n));
            }
        }
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        Ok(self.edges.insert(key, edge))
    }

    /// Remove the edge joining `a` and `b`, returning its attributes.
    /// Both endpoints stay in the graph.
    pub fn remove_edge(&mut self, a: NodeId, b: NodeId) -> Option<Edge> {
        let key = EdgeKey::new(a, b)?;
        let edge = self.edges.remove(&key)?;
        if let Some(set) = self.adjacency.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.adjacency.get_mut(&b) {
            set.remove(&a);
        }
        Some(edge)
    }

    /// Temporarily remove the edge `key`, run `probe` against the mutated
    /// graph, then put the exact original edge back.
    ///
    /// Returns `None` (without calling `probe`) if there is no such edge.
    pub fn with_edge_removed<R>(&mut self, key: EdgeKey, probe: impl FnOnce(&RoadGraph) -> R) -> Option<R> {
        let edge = self.remove_edge(key.a(), key.b())?;
        let out = probe(self);
        // Endpoints were untouched by the removal, so this cannot fail.
        self.adjacency.entry(key.a()).or_default().insert(key.b());
        self.adjacency.entry(key.b()).or_default().insert(key.a());
        self.edges.insert(key, edge);
        Some(out)
    }
}
