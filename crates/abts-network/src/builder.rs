//! Raw map → trimmed weighted connectivity graph.
//!
//! # Phases
//!
//! ```text
//! ① Nodes  : every raw node becomes a graph node.
//! ② Edges  : each road way's consecutive node pairs become edges
//!            (travel_time = distance / speed for the way's class).
//! ③ Prune  : nodes with no incident edge are dropped.
//! ④ Trim   : (optional) degree-2 pass-through nodes are contracted.
//! ```
//!
//! # Shared pairs
//!
//! When two ways join the same node pair, the way processed later
//! overwrites the earlier edge.  Ways are processed in input order, so the
//! result is deterministic.
//!
//! # Trimming
//!
//! A node of degree exactly 2 carries no routing decision: every path
//! through it enters from one neighbour and leaves by the other.  It is
//! replaced by a single edge whose length and travel time are the sums of
//! the two it replaces.  If the neighbours are already joined directly,
//! that edge is kept as-is (it is an independent road) and the pass-through
//! node is dropped without a merge.

use log::{debug, info, warn};

use abts_core::{NodeId, RoadClass};

use crate::graph::{Edge, RoadGraph};
use crate::raw::{RawMap, RawNode, RawWay};
use crate::speed::{NetworkConfig, SpeedTable};
use crate::{NetworkError, NetworkResult};

// ── Public entry points ───────────────────────────────────────────────────────

/// Build a graph from raw nodes and ways with the default exclusions.
///
/// Convenience wrapper around [`NetworkBuilder`] for callers that only want
/// to vary the speed table and the trim flag.
pub fn build_network(
    nodes:  &[RawNode],
    ways:   &[RawWay],
    speeds: &SpeedTable,
    trim:   bool,
) -> NetworkResult<RoadGraph> {
    let config = NetworkConfig { speeds: speeds.clone(), trim, ..NetworkConfig::default() };
    NetworkBuilder::new(config).build_from(nodes, ways)
}

/// Turns a [`RawMap`] into a [`RoadGraph`] according to a [`NetworkConfig`].
///
/// # Example
///
/// ```
/// use abts_network::{NetworkBuilder, NetworkConfig, RawMap};
///
/// let mut map = RawMap::new();
/// map.add_node(1, -88.040, 30.690);
/// map.add_node(2, -88.030, 30.690);
/// map.add_node(3, -88.020, 30.690);
/// map.add_road(10, &[1, 2, 3], "residential", "Elm Street");
///
/// let graph = NetworkBuilder::new(NetworkConfig::default()).build(&map).unwrap();
/// assert_eq!(graph.node_count(), 2); // node 2 trimmed
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct NetworkBuilder {
    config: NetworkConfig,
}

impl NetworkBuilder {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn build(&self, map: &RawMap) -> NetworkResult<RoadGraph> {
        self.build_from(&map.nodes, &map.ways)
    }

    /// Run all construction phases.  Any error aborts the build; no partial
    /// graph is returned.
    pub fn build_from(&self, nodes: &[RawNode], ways: &[RawWay]) -> NetworkResult<RoadGraph> {
        let mut graph = RoadGraph::new();

        // ── Phase 1: nodes ────────────────────────────────────────────────
        for node in nodes {
            graph.add_node(node.id, node.pos);
        }

        // ── Phase 2: edges ────────────────────────────────────────────────
        //
        // Classify every way up front so an unknown class fails before any
        // edge is written.
        let mut roads: Vec<(&RawWay, RoadClass, f64)> = Vec::with_capacity(ways.len());
        for way in ways {
            if let Some((class, mph)) = self.classify(way)? {
                roads.push((way, class, mph));
            }
        }

        let mut overwritten = 0usize;
        let mut dangling = 0usize;
        let mut coincident = 0usize;
        for &(way, class, mph) in &roads {
            for pair in way.nodes.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a == b {
                    continue;
                }
                let (Some(pa), Some(pb)) = (graph.node_pos(a), graph.node_pos(b)) else {
                    dangling += 1;
                    continue;
                };

                let length = pa.distance_miles(pb);
                // Distinct ids at one coordinate would give a zero-cost edge.
                if !(length > 0.0) {
                    coincident += 1;
                    continue;
                }
                let edge = Edge {
                    travel_time: length / mph,
                    length,
                    road_class: class,
                    name: way.name().to_owned(),
                };
                if graph.add_edge(a, b, edge)?.is_some() {
                    overwritten += 1;
                }
            }
        }
        if dangling > 0 {
            warn!("{dangling} way segments reference nodes missing from the map and were skipped");
        }
        if coincident > 0 {
            warn!("{coincident} way segments join distinct nodes at the same coordinate and were skipped");
        }
        if overwritten > 0 {
            debug!("{overwritten} edges shared by several ways were overwritten by a later way");
        }

        // ── Phase 3: prune isolated nodes ─────────────────────────────────
        let pruned = graph.remove_isolated_nodes();
        debug!("Pruned {pruned} nodes with no road edges");

        // ── Phase 4: trim pass-through nodes ──────────────────────────────
        if self.config.trim {
            let before = graph.node_count();
            for &(way, _, _) in &roads {
                for &node in &way.nodes {
                    trim_node(&mut graph, node)?;
                }
            }
            debug!("Trimmed {} pass-through nodes", before - graph.node_count());
        }

        info!(
            "Road network formed: {} nodes, {} edges from {} road ways",
            graph.node_count(),
            graph.edge_count(),
            roads.len()
        );
        Ok(graph)
    }

    /// Resolve a way's road class and speed.
    ///
    /// `Ok(None)` means "not a road to consider": no `highway` tag, or an
    /// excluded class.
    fn classify(&self, way: &RawWay) -> NetworkResult<Option<(RoadClass, f64)>> {
        let Some(tag) = way.highway() else {
            return Ok(None);
        };

        let class = match tag.parse::<RoadClass>() {
            Ok(class) => class,
            Err(_) if self.config.skip_unknown_classes => {
                debug!("Skipping way {} with unknown class {tag:?}", way.id);
                return Ok(None);
            }
            Err(_) => {
                return Err(NetworkError::UnknownRoadClass { way: way.id, class: tag.to_owned() });
            }
        };

        if self.config.excluded.contains(&class) {
            return Ok(None);
        }

        match self.config.speeds.mph(class) {
            Some(mph) => Ok(Some((class, mph))),
            None => Err(NetworkError::UnknownRoadClass { way: way.id, class: tag.to_owned() }),
        }
    }
}

// ── Trimming ──────────────────────────────────────────────────────────────────

/// Contract `node` if it is currently a degree-2 pass-through node.
///
/// Nodes already removed by an earlier contraction are skipped.  The merged
/// edge takes its class and name from the edge to the lower-id neighbour.
fn trim_node(graph: &mut RoadGraph, node: NodeId) -> NetworkResult<()> {
    if graph.degree(node) != 2 {
        return Ok(());
    }

    let mut ends: Vec<NodeId> = graph.neighbors(node).collect();
    ends.sort_unstable();
    let (n1, n2) = (ends[0], ends[1]);

    if !graph.has_edge(n1, n2) {
        let (Some(e1), Some(e2)) = (graph.edge(node, n1), graph.edge(node, n2)) else {
            return Ok(());
        };
        let merged = Edge {
            travel_time: e1.travel_time + e2.travel_time,
            length:      e1.length + e2.length,
            road_class:  e1.road_class,
            name:        e1.name.clone(),
        };
        graph.add_edge(n1, n2, merged)?;
    }

    graph.remove_node(node);
    Ok(())
}
