use abts_core::NodeId;
use abts_network::{NetworkError, RouteError};
use abts_trips::TripError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A trip leg has no path and the policy is
    /// [`UnreachablePolicy::Fail`](crate::UnreachablePolicy::Fail).
    #[error("trip leg from {from} to {to} is unreachable")]
    Unreachable { from: NodeId, to: NodeId },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("routing error: {0}")]
    Route(#[from] RouteError),

    #[error("trip generation error: {0}")]
    Trip(#[from] TripError),
}

pub type SimResult<T> = Result<T, SimError>;
