//! `abts-trips`: places, travelers, and stochastic trip generation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`place`]     | `Place`, `PlaceMap`, residential home derivation          |
//! | [`category`]  | `PlaceClassifier` trait, `TagClassifier`, `CategoryRegistry` |
//! | [`selector`]  | `WeightedSelector`, weight-proportional draws             |
//! | [`traveler`]  | `Traveler`, `generate_travelers`                          |
//! | [`template`]  | `TripTemplate`, `LocationSpec`, default templates         |
//! | [`generator`] | `TripGenerator`, `ConcreteTrip`                           |
//! | [`error`]     | `TripError`, `TripResult<T>`                              |
//!
//! # Randomness
//!
//! Every draw goes through an explicit `&mut SimRng`; nothing here owns or
//! hides a random source.

pub mod category;
pub mod error;
pub mod generator;
pub mod place;
pub mod selector;
pub mod template;
pub mod traveler;


pub use category::{CategoryRegistry, PlaceClassifier, TagClassifier};
pub use error::{TripError, TripResult};
pub use generator::{generate_trips, ConcreteTrip, TripGenerator};
pub use place::{homes_from_residential, Place, PlaceMap};
pub use selector::{choose, WeightedSelector};
pub use template::{default_templates, LocationSpec, TripTemplate};
pub use traveler::{default_attributes, generate_travelers, Traveler};
