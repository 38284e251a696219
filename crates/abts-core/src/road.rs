//! Road classification enum.
//!
//! The raw map tags each way with a free-form `highway` string.  Parsing it
//! into this closed enum happens once, at network construction; everything
//! downstream (speed lookup, residential filtering, home weighting) matches
//! on the enum.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Categorical road type determining the assumed travel speed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoadClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Track,
    Footway,
    Path,
    Cycleway,
    Bridleway,
    Pedestrian,
    Steps,
}

impl RoadClass {
    /// Every variant, in declaration order.
    pub const ALL: [RoadClass; 21] = [
        RoadClass::Motorway,
        RoadClass::MotorwayLink,
        RoadClass::Trunk,
        RoadClass::TrunkLink,
        RoadClass::Primary,
        RoadClass::PrimaryLink,
        RoadClass::Secondary,
        RoadClass::SecondaryLink,
        RoadClass::Tertiary,
        RoadClass::TertiaryLink,
        RoadClass::Unclassified,
        RoadClass::Residential,
        RoadClass::LivingStreet,
        RoadClass::Service,
        RoadClass::Track,
        RoadClass::Footway,
        RoadClass::Path,
        RoadClass::Cycleway,
        RoadClass::Bridleway,
        RoadClass::Pedestrian,
        RoadClass::Steps,
    ];

    /// The OSM `highway=*` value for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway      => "motorway",
            RoadClass::MotorwayLink  => "motorway_link",
            RoadClass::Trunk         => "trunk",
            RoadClass::TrunkLink     => "trunk_link",
            RoadClass::Primary       => "primary",
            RoadClass::PrimaryLink   => "primary_link",
            RoadClass::Secondary     => "secondary",
            RoadClass::SecondaryLink => "secondary_link",
            RoadClass::Tertiary      => "tertiary",
            RoadClass::TertiaryLink  => "tertiary_link",
            RoadClass::Unclassified  => "unclassified",
            RoadClass::Residential   => "residential",
            RoadClass::LivingStreet  => "living_street",
            RoadClass::Service       => "service",
            RoadClass::Track         => "track",
            RoadClass::Footway       => "footway",
            RoadClass::Path          => "path",
            RoadClass::Cycleway      => "cycleway",
            RoadClass::Bridleway     => "bridleway",
            RoadClass::Pedestrian    => "pedestrian",
            RoadClass::Steps         => "steps",
        }
    }

    /// `true` for classes that are not usable by motor vehicles at all.
    #[inline]
    pub fn is_non_motorized(self) -> bool {
        matches!(
            self,
            RoadClass::Track
                | RoadClass::Footway
                | RoadClass::Path
                | RoadClass::Cycleway
                | RoadClass::Bridleway
                | RoadClass::Pedestrian
                | RoadClass::Steps
        )
    }
}

impl FromStr for RoadClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RoadClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRoadClass(s.to_owned()))
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
