//! `abts-sim`: mean weekly travel time and per-edge sensitivity sweeps.
//!
//! # Pipeline
//!
//! ```text
//! RawMap ──NetworkBuilder──► RoadGraph ──CategoryRegistry──► PlaceMap
//!                                │                              │
//!                                │         generate_travelers ◄─┘
//!                                ▼                 │
//!   TravelSimulator::run(graph, travelers, templates, places, rng)
//!                                │
//!                                ▼  mean hours / traveler / week
//!   SensitivityAnalyzer::analyze, for each edge in sorted order:
//!       remove ─► re-run simulator with a fresh SimRng(seed) ─► restore
//!       emit EdgeReport ─► SweepObserver::on_edge
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                             |
//! |-----------------|------------------------------------------------------|
//! | [`config`]      | `SimConfig`, `UnreachablePolicy`                     |
//! | [`simulator`]   | `TravelSimulator`, `SimOutcome`                      |
//! | [`sensitivity`] | `SensitivityAnalyzer`, `EdgeReport`, `partition`     |
//! | [`observer`]    | `SweepObserver`, `NoopObserver`, `LogObserver`       |
//! | [`builder`]     | `ModelBuilder`, `Model`                              |
//! | [`error`]       | `SimError`, `SimResult`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Enables `SensitivityAnalyzer::analyze_parallel` (Rayon). |
//! | `serde`    | Derives `Serialize`/`Deserialize` on reports and config. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use abts_network::RawMap;
//! use abts_sim::{ModelBuilder, NoopObserver, SimConfig};
//!
//! let map: RawMap = load_somehow();
//! let mut model = ModelBuilder::new(&map).config(SimConfig::default()).build()?;
//! let outcome = model.mean_travel_time()?;
//! let sweep = model.sensitivity(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sensitivity;
pub mod simulator;

#[cfg(test)]
mod tests;

pub use builder::{Model, ModelBuilder};
pub use config::{SimConfig, UnreachablePolicy};
pub use error::{SimError, SimResult};
pub use observer::{LogObserver, NoopObserver, SweepObserver};
pub use sensitivity::{partition, percent_change, EdgeReport, ProbeResult, SensitivityAnalyzer, SweepSummary};
pub use simulator::{SimOutcome, TravelSimulator};
