//! Routing trait, default Dijkstra implementation, and multi-stop costing.
//!
//! # Pluggability
//!
//! [`PathCoster`] calls routing via the [`Router`] trait, so callers can swap
//! in A* or a contraction hierarchy without touching the simulator.  The
//! default [`DijkstraRouter`] searches the live [`RoadGraph`], so it always
//! reflects edges removed by a sensitivity probe.
//!
//! # Cost units
//!
//! All costs are edge `travel_time`s in **hours**.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use abts_core::NodeId;

use crate::graph::RoadGraph;
use crate::{RouteError, RouteResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A single-leg shortest path.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, including both endpoints.
    pub nodes: Vec<NodeId>,
    /// Travel time of each traversed edge; `nodes.len() - 1` entries.
    pub edge_times: Vec<f64>,
}

impl Route {
    pub fn travel_time(&self) -> f64 {
        self.edge_times.iter().sum()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edge_times.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so one router can serve every
/// worker of a parallel sweep.
pub trait Router: Send + Sync {
    /// Shortest path by travel time from `from` to `to`.
    ///
    /// `from == to` is an empty route, not an error.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the adjacency graph, keyed on
/// `travel_time`.  Edge costs are non-negative by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route> {
        dijkstra(graph, from, to)
    }
}

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId) -> RouteResult<Route> {
    for n in [from, to] {
        if !graph.contains_node(n) {
            return Err(RouteError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Route { nodes: vec![from], edge_times: vec![] });
    }

    // dist[v] = best known travel time to reach v.
    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    // prev[v] = (predecessor, travel time of the edge used to reach v).
    let mut prev: FxHashMap<NodeId, (NodeId, f64)> = FxHashMap::default();

    dist.insert(from, 0.0);

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev, from, to));
        }

        // Skip stale heap entries.
        if dist.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for (neighbor, edge) in graph.incident_edges(node) {
            let new_cost = cost + edge.travel_time;
            let improves = dist.get(&neighbor).is_none_or(|&best| new_cost < best);
            if improves {
                dist.insert(neighbor, new_cost);
                prev.insert(neighbor, (node, edge.travel_time));
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Err(RouteError::Unreachable { from, to })
}

fn reconstruct(prev: &FxHashMap<NodeId, (NodeId, f64)>, from: NodeId, to: NodeId) -> Route {
    let mut nodes = vec![to];
    let mut edge_times = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(&(p, t)) = prev.get(&cur) else {
            break;
        };
        nodes.push(p);
        edge_times.push(t);
        cur = p;
    }
    nodes.reverse();
    edge_times.reverse();
    Route { nodes, edge_times }
}

// ── PathCoster ────────────────────────────────────────────────────────────────

/// Shortest-path cost of a multi-stop trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostedPath {
    /// Every node visited, legs concatenated without repeating the stop
    /// shared by adjacent legs.
    pub nodes: Vec<NodeId>,
    /// Travel time of each traversed edge, in hours.
    pub edge_times: Vec<f64>,
}

impl CostedPath {
    /// Total travel time in hours.
    pub fn total(&self) -> f64 {
        self.edge_times.iter().sum()
    }
}

/// Costs ordered stop sequences with a [`Router`].
#[derive(Debug, Clone, Default)]
pub struct PathCoster<R: Router = DijkstraRouter> {
    router: R,
}

impl PathCoster<DijkstraRouter> {
    pub fn new() -> Self {
        Self { router: DijkstraRouter }
    }
}

impl<R: Router> PathCoster<R> {
    pub fn with_router(router: R) -> Self {
        Self { router }
    }

    /// Route through `stops` in order.
    ///
    /// Fewer than two stops is an empty path with zero cost.  Fails with
    /// [`RouteError::Unreachable`] naming the first leg with no path.
    pub fn cost(&self, graph: &RoadGraph, stops: &[NodeId]) -> RouteResult<CostedPath> {
        let mut path = CostedPath::default();
        if stops.len() < 2 {
            return Ok(path);
        }

        for leg in stops.windows(2) {
            let route = self.router.route(graph, leg[0], leg[1])?;
            let skip = usize::from(!path.nodes.is_empty());
            path.nodes.extend(route.nodes.into_iter().skip(skip));
            path.edge_times.extend(route.edge_times);
        }
        Ok(path)
    }
}
