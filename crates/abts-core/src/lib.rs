//! `abts-core`: foundational types for activity-based travel simulation.
//!
//! This crate is a dependency of every other `abts-*` crate.  It has no
//! `abts-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `WayId`, `EdgeKey`                          |
//! | [`geo`]     | `GeoPoint`, haversine distance in miles / metres      |
//! | [`road`]    | `RoadClass` closed enum                               |
//! | [`rng`]     | `SimRng` (explicitly seeded)                          |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod road;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeKey, NodeId, WayId};
pub use rng::SimRng;
pub use road::RoadClass;
