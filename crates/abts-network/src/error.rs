//! Network-subsystem error types.

use thiserror::Error;

use abts_core::{NodeId, WayId};

/// Errors produced while building a [`RoadGraph`](crate::RoadGraph).
///
/// Every variant is fatal to construction: no partial graph is returned.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("way {way} has unknown road classification {class:?}")]
    UnknownRoadClass { way: WayId, class: String },

    #[error("speed for {class} must be positive and finite, got {mph}")]
    InvalidSpeed { class: String, mph: f64 },

    #[error("edge endpoint {0} is not in the graph")]
    MissingEndpoint(NodeId),

    #[error("self-loop at {0} is not allowed in a simple graph")]
    SelfLoop(NodeId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors produced by shortest-path queries.
///
/// `Unreachable` is an expected outcome once the sensitivity sweep starts
/// removing edges; callers decide what to do with it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    #[error("no route from {from} to {to}")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),
}

pub type RouteResult<T> = Result<T, RouteError>;
