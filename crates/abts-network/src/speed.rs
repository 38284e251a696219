//! Speed table and network construction settings.
//!
//! # CSV format
//!
//! One row per road class, speed in miles per hour:
//!
//! ```csv
//! highway,mph
//! motorway,70
//! primary,40
//! residential,20
//! ```
//!
//! Classes absent from the table are not drivable at any known speed; a way
//! tagged with such a class aborts network construction with
//! [`NetworkError::UnknownRoadClass`] unless it is also in the excluded set.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use abts_core::RoadClass;

use crate::NetworkError;

// ── SpeedTable ────────────────────────────────────────────────────────────────

/// Assumed travel speed per road class, in miles per hour.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedTable {
    mph: BTreeMap<RoadClass, f64>,
}

impl SpeedTable {
    /// A table with no entries.  Every road class is unknown until set.
    pub fn empty() -> Self {
        Self { mph: BTreeMap::new() }
    }

    /// Set the speed for `class`.  Speeds must be positive and finite so
    /// every derived travel time stays finite.
    pub fn set(&mut self, class: RoadClass, mph: f64) -> Result<(), NetworkError> {
        if !(mph.is_finite() && mph > 0.0) {
            return Err(NetworkError::InvalidSpeed { class: class.to_string(), mph });
        }
        self.mph.insert(class, mph);
        Ok(())
    }

    /// Builder-style [`set`](Self::set) for constant tables.
    pub fn with(mut self, class: RoadClass, mph: f64) -> Result<Self, NetworkError> {
        self.set(class, mph)?;
        Ok(self)
    }

    #[inline]
    pub fn mph(&self, class: RoadClass) -> Option<f64> {
        self.mph.get(&class).copied()
    }

    pub fn len(&self) -> usize {
        self.mph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mph.is_empty()
    }

    /// Load a table from a CSV file (see module docs for the format).
    pub fn from_csv(path: &Path) -> Result<Self, NetworkError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Like [`from_csv`](Self::from_csv) but accepts any `Read` source.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, NetworkError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut table = Self::empty();

        for result in csv_reader.deserialize::<SpeedRecord>() {
            let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
            let class: RoadClass = row
                .highway
                .parse()
                .map_err(|e: abts_core::CoreError| NetworkError::Parse(e.to_string()))?;
            table.set(class, row.mph)?;
        }

        Ok(table)
    }
}

impl Default for SpeedTable {
    /// Urban defaults.  Values for the classes a typical extract is mostly
    /// made of (motorway, primary, secondary, tertiary, residential and their
    /// links) are the conventional posted limits in mph.
    fn default() -> Self {
        let mph = [
            (RoadClass::Motorway,      70.0),
            (RoadClass::MotorwayLink,  70.0),
            (RoadClass::Trunk,         55.0),
            (RoadClass::TrunkLink,     55.0),
            (RoadClass::Primary,       40.0),
            (RoadClass::PrimaryLink,   40.0),
            (RoadClass::Secondary,     35.0),
            (RoadClass::SecondaryLink, 35.0),
            (RoadClass::Tertiary,      30.0),
            (RoadClass::TertiaryLink,  30.0),
            (RoadClass::Unclassified,  25.0),
            (RoadClass::Residential,   20.0),
            (RoadClass::LivingStreet,  10.0),
        ];
        Self { mph: mph.into_iter().collect() }
    }
}

#[derive(Deserialize)]
struct SpeedRecord {
    highway: String,
    mph:     f64,
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Settings for [`NetworkBuilder`](crate::NetworkBuilder).
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    /// Speed per road class.
    pub speeds: SpeedTable,

    /// Road classes that are never turned into edges.
    pub excluded: BTreeSet<RoadClass>,

    /// Remove degree-2 pass-through nodes after construction.
    pub trim: bool,

    /// Skip ways whose `highway` value does not parse into a [`RoadClass`]
    /// instead of failing.  Off by default: an unrecognised class means the
    /// speed table cannot be trusted for this map.
    pub skip_unknown_classes: bool,
}

impl NetworkConfig {
    /// The default exclusions: service ways plus everything a motor vehicle
    /// cannot use.
    pub fn default_excluded() -> BTreeSet<RoadClass> {
        RoadClass::ALL
            .into_iter()
            .filter(|c| *c == RoadClass::Service || c.is_non_motorized())
            .collect()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            speeds:               SpeedTable::default(),
            excluded:             Self::default_excluded(),
            trim:                 true,
            skip_unknown_classes: false,
        }
    }
}
