//! Travelers: named attribute → place bindings.

use std::collections::BTreeMap;

use log::info;

use abts_core::SimRng;

use crate::{Place, PlaceMap, TripError, TripResult, WeightedSelector};

/// A member of the synthetic population.
///
/// Attributes bind names such as `"home"` or `"work"` to a specific place.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Traveler {
    attrs: BTreeMap<String, Place>,
}

impl Traveler {
    pub fn new(attrs: BTreeMap<String, Place>) -> Self {
        Self { attrs }
    }

    #[inline]
    pub fn get(&self, attr: &str) -> Option<&Place> {
        self.attrs.get(attr)
    }

    /// `(name, place)` pairs in ascending name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Place)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Place)> for Traveler {
    fn from_iter<I: IntoIterator<Item = (String, Place)>>(iter: I) -> Self {
        Self { attrs: iter.into_iter().collect() }
    }
}

/// The attribute → category mapping used when none is configured:
/// every traveler has a home, a workplace, and a church.
pub fn default_attributes() -> BTreeMap<String, String> {
    ["home", "work", "church"]
        .into_iter()
        .map(|a| (a.to_owned(), a.to_owned()))
        .collect()
}

/// Generate `count` travelers.
///
/// `attributes` maps each attribute name to the category it is drawn from;
/// each draw is weight-proportional and independent.
///
/// # Errors
///
/// [`TripError::UnknownCategory`] / [`TripError::EmptyCategory`] if a
/// category cannot be drawn from.
pub fn generate_travelers(
    count:      usize,
    attributes: &BTreeMap<String, String>,
    places:     &PlaceMap,
    rng:        &mut SimRng,
) -> TripResult<Vec<Traveler>> {
    let selectors: Vec<(&str, WeightedSelector<'_>)> = attributes
        .iter()
        .map(|(attr, category)| {
            let list = places
                .get(category)
                .ok_or_else(|| TripError::UnknownCategory(category.clone()))?;
            Ok((attr.as_str(), WeightedSelector::new(category, list)?))
        })
        .collect::<TripResult<_>>()?;

    let travelers: Vec<Traveler> = (0..count)
        .map(|_| {
            selectors
                .iter()
                .map(|(attr, sel)| ((*attr).to_owned(), sel.choose(rng).clone()))
                .collect()
        })
        .collect();

    info!("{} travelers generated", travelers.len());
    Ok(travelers)
}
