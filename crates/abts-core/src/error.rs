//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers parsing
//! of the shared vocabulary types.

use thiserror::Error;

/// Errors produced by `abts-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("unknown road classification {0:?}")]
    UnknownRoadClass(String),
}

/// Shorthand result type for `abts-core`.
pub type CoreResult<T> = Result<T, CoreError>;
