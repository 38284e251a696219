//! OSM PBF reader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use abts_network::osm::load_raw_map;
//!
//! let map = load_raw_map(Path::new("mobile_al.osm.pbf"))?;
//! let graph = NetworkBuilder::new(NetworkConfig::default()).build(&map)?;
//! ```
//!
//! # What is loaded
//!
//! All nodes (with their tags, since places of interest are tagged nodes)
//! and every way carrying a `highway` tag.  Classification and exclusion
//! are left to [`NetworkBuilder`](crate::NetworkBuilder).

use std::path::Path;

use log::info;
use osmpbf::{Element, ElementReader};

use abts_core::{GeoPoint, NodeId, WayId};

use crate::raw::{RawMap, RawNode, RawWay, Tags};
use crate::NetworkError;

/// Read nodes and highway ways from an OSM PBF file.
///
/// # Errors
///
/// Returns [`NetworkError::Osm`] on parse errors.
pub fn load_raw_map(path: &Path) -> Result<RawMap, NetworkError> {
    let reader = ElementReader::from_path(path).map_err(|e| NetworkError::Osm(e.to_string()))?;

    let mut map = RawMap::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                map.nodes.push(RawNode {
                    id:   NodeId(n.id()),
                    pos:  GeoPoint::new(n.lon(), n.lat()),
                    tags: collect_tags(n.tags()),
                });
            }
            Element::DenseNode(n) => {
                map.nodes.push(RawNode {
                    id:   NodeId(n.id()),
                    pos:  GeoPoint::new(n.lon(), n.lat()),
                    tags: collect_tags(n.tags()),
                });
            }
            Element::Way(w) => {
                let tags = collect_tags(w.tags());
                if tags.contains_key("highway") {
                    map.ways.push(RawWay {
                        id:    WayId(w.id()),
                        nodes: w.refs().map(NodeId).collect(),
                        tags,
                    });
                }
            }
            _ => {}
        })
        .map_err(|e| NetworkError::Osm(e.to_string()))?;

    info!("Read {} nodes and {} highway ways from {}", map.nodes.len(), map.ways.len(), path.display());
    Ok(map)
}

fn collect_tags<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> Tags {
    tags.map(|(k, v)| (k.to_owned(), v.to_owned())).collect()
}
