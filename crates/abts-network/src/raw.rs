//! Raw map input, as handed over by an external map reader.
//!
//! Nodes and ways arrive in any order.  Ways reference nodes by id; a way
//! may reference a node the reader never produced (clipped extracts do
//! this), which the builder tolerates.

use std::collections::BTreeMap;

use abts_core::{GeoPoint, NodeId, WayId};

/// Free-form `key → value` tags.
pub type Tags = BTreeMap<String, String>;

/// A raw map node: id, coordinate, and tags (POIs carry `amenity=*` etc.).
#[derive(Clone, Debug, PartialEq)]
pub struct RawNode {
    pub id:   NodeId,
    pub pos:  GeoPoint,
    pub tags: Tags,
}

/// A raw map way: an ordered node-id sequence plus tags.
#[derive(Clone, Debug, PartialEq)]
pub struct RawWay {
    pub id:    WayId,
    pub nodes: Vec<NodeId>,
    pub tags:  Tags,
}

impl RawWay {
    /// The `highway=*` classification, if tagged.
    pub fn highway(&self) -> Option<&str> {
        self.tags.get("highway").map(String::as_str)
    }

    /// The `name=*` tag, or `""` when absent.
    pub fn name(&self) -> &str {
        self.tags.get("name").map(String::as_str).unwrap_or("")
    }
}

/// Everything the network builder and place classifier need from the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMap {
    pub nodes: Vec<RawNode>,
    pub ways:  Vec<RawWay>,
}

impl RawMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an untagged node.
    pub fn add_node(&mut self, id: i64, lon: f64, lat: f64) -> &mut RawNode {
        self.nodes.push(RawNode {
            id:   NodeId(id),
            pos:  GeoPoint::new(lon, lat),
            tags: Tags::new(),
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    /// Append a road way with the given `highway` class and `name`.
    ///
    /// An empty `name` leaves the tag out, matching how readers report
    /// unnamed roads.
    pub fn add_road(&mut self, id: i64, nodes: &[i64], highway: &str, name: &str) -> &mut RawWay {
        let mut tags = Tags::new();
        tags.insert("highway".to_owned(), highway.to_owned());
        if !name.is_empty() {
            tags.insert("name".to_owned(), name.to_owned());
        }
        self.ways.push(RawWay {
            id:    WayId(id),
            nodes: nodes.iter().copied().map(NodeId).collect(),
            tags,
        });
        let last = self.ways.len() - 1;
        &mut self.ways[last]
    }
}

impl RawNode {
    /// Builder-style tag setter.
    pub fn tag(&mut self, key: &str, value: &str) -> &mut Self {
        self.tags.insert(key.to_owned(), value.to_owned());
        self
    }
}
