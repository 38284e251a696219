//! `abts-network`: road connectivity graph, trimming, snapping, and path costing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`raw`]     | `RawMap`, `RawNode`, `RawWay`, input from a map reader      |
//! | [`speed`]   | `SpeedTable`, `NetworkConfig`, CSV speed loading            |
//! | [`graph`]   | `RoadGraph` (owned adjacency), `Edge`                       |
//! | [`builder`] | `NetworkBuilder`: raw map → trimmed weighted graph          |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `PathCoster`              |
//! | [`describe`]| Human-readable node and edge descriptions                   |
//! | [`snap`]    | `NodeIndex` R-tree for nearest-node snapping                |
//! | [`osm`]     | `load_raw_map` (feature = `"osm"` only)                     |
//! | [`error`]   | `NetworkError`, `RouteError`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables OSM PBF reading via the `osmpbf` crate.              |
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |

pub mod builder;
pub mod describe;
pub mod error;
pub mod graph;
pub mod raw;
pub mod router;
pub mod snap;
pub mod speed;

#[cfg(feature = "osm")]
pub mod osm;


pub use builder::{build_network, NetworkBuilder};
pub use error::{NetworkError, NetworkResult, RouteError, RouteResult};
pub use graph::{Edge, RoadGraph};
pub use raw::{RawMap, RawNode, RawWay, Tags};
pub use router::{CostedPath, DijkstraRouter, PathCoster, Route, Router};
pub use snap::NodeIndex;
pub use speed::{NetworkConfig, SpeedTable};
