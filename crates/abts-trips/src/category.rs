//! Pluggable place-of-interest classification.
//!
//! Deciding that a map node is "a restaurant" or "a workplace" is a
//! heuristic over free-form tags.  The heuristics live behind the
//! [`PlaceClassifier`] trait and are registered by category name in a
//! [`CategoryRegistry`]; the registry does the mechanical part of running
//! every classifier over the map and snapping matches onto the network.

use std::collections::BTreeMap;

use log::info;

use abts_network::{NodeIndex, RawMap, RoadGraph, Tags};

use crate::{Place, PlaceMap};

// ── PlaceClassifier ───────────────────────────────────────────────────────────

/// Predicate/weight pair deciding membership in one place category.
pub trait PlaceClassifier: Send + Sync {
    /// `true` if a node with these tags belongs to the category.
    fn matches(&self, tags: &Tags) -> bool;

    /// Selection weight for a matching node.  Default: `1.0`.
    fn weight(&self, _tags: &Tags) -> f64 {
        1.0
    }
}

// ── TagClassifier ─────────────────────────────────────────────────────────────

/// Matches nodes carrying any of a set of `key=value` rules.
///
/// ```
/// use abts_trips::{PlaceClassifier, TagClassifier};
///
/// let food = TagClassifier::new()
///     .rule("amenity", &["restaurant", "fast_food"])
///     .any_value("cuisine");
///
/// let mut tags = abts_network::Tags::new();
/// tags.insert("amenity".into(), "fast_food".into());
/// assert!(food.matches(&tags));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TagClassifier {
    /// `(key, accepted values)`; an empty value list accepts any value.
    rules:  Vec<(String, Vec<String>)>,
    weight: f64,
}

impl TagClassifier {
    pub fn new() -> Self {
        Self { rules: Vec::new(), weight: 1.0 }
    }

    /// Match `key` with any of `values`.
    pub fn rule(mut self, key: &str, values: &[&str]) -> Self {
        self.rules.push((key.to_owned(), values.iter().map(|v| (*v).to_owned()).collect()));
        self
    }

    /// Match `key` regardless of its value.
    pub fn any_value(mut self, key: &str) -> Self {
        self.rules.push((key.to_owned(), Vec::new()));
        self
    }

    /// Fixed weight given to every match.
    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl PlaceClassifier for TagClassifier {
    fn matches(&self, tags: &Tags) -> bool {
        self.rules.iter().any(|(key, values)| match tags.get(key) {
            Some(v) => values.is_empty() || values.iter().any(|accepted| accepted == v),
            None => false,
        })
    }

    fn weight(&self, _tags: &Tags) -> f64 {
        self.weight
    }
}

// ── CategoryRegistry ──────────────────────────────────────────────────────────

/// Lookup table of category name → classifier.
#[derive(Default)]
pub struct CategoryRegistry {
    entries: BTreeMap<String, Box<dyn PlaceClassifier>>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag-based defaults for the categories the default trip templates and
    /// traveler attributes refer to (`work`, `leisure`, `restaurant`,
    /// `church`).  Homes are not tag-based; see
    /// [`homes_from_residential`](crate::homes_from_residential).
    pub fn osm_defaults() -> Self {
        let mut reg = Self::new();
        reg.register(
            "work",
            TagClassifier::new()
                .any_value("office")
                .any_value("shop")
                .rule("amenity", &["school", "university", "hospital", "bank", "townhall"]),
        );
        reg.register(
            "leisure",
            TagClassifier::new()
                .any_value("leisure")
                .rule("amenity", &["cinema", "theatre", "library", "arts_centre"]),
        );
        reg.register(
            "restaurant",
            TagClassifier::new().rule("amenity", &["restaurant", "fast_food", "cafe", "pub", "bar"]),
        );
        reg.register("church", TagClassifier::new().rule("amenity", &["place_of_worship"]));
        reg
    }

    /// Register (or replace) the classifier for `name`.
    pub fn register(&mut self, name: &str, classifier: impl PlaceClassifier + 'static) -> &mut Self {
        self.entries.insert(name.to_owned(), Box::new(classifier));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn PlaceClassifier> {
        self.entries.get(name).map(|c| c.as_ref())
    }

    /// Registered category names, in ascending order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every classifier over the tagged nodes of `map`.
    ///
    /// Each match is attached to the nearest node of `graph`; its name is
    /// the node's `name` tag, or the category name if untagged.  Every
    /// registered category gets an entry, possibly empty.  A node may
    /// belong to several categories.
    pub fn classify(&self, map: &RawMap, graph: &RoadGraph) -> PlaceMap {
        let index = NodeIndex::build(graph);
        let mut places: PlaceMap = self
            .entries
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        for raw in map.nodes.iter().filter(|n| !n.tags.is_empty()) {
            for (category, classifier) in &self.entries {
                if !classifier.matches(&raw.tags) {
                    continue;
                }
                let Some(node) = index.nearest(raw.pos) else {
                    continue;
                };
                let name = raw.tags.get("name").cloned().unwrap_or_else(|| category.clone());
                if let Some(list) = places.get_mut(category) {
                    list.push(Place::new(node, name, classifier.weight(&raw.tags)));
                }
            }
        }

        for (category, list) in &places {
            info!("Places of interest recognised in {category}: {}", list.len());
        }
        places
    }
}
