//! Stochastic trip generation.

use std::collections::BTreeMap;

use abts_core::{NodeId, SimRng};

use crate::{LocationSpec, Place, PlaceMap, Traveler, TripError, TripResult, TripTemplate, WeightedSelector};

/// One realised trip: the ordered stops of a template for one traveler.
///
/// Borrows its places from the traveler and the place map; it lives only as
/// long as one simulation pass needs it.
#[derive(Clone, Debug, PartialEq)]
pub struct ConcreteTrip<'a> {
    pub stops: Vec<&'a Place>,
}

impl ConcreteTrip<'_> {
    /// Graph nodes of the stops, in order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.stops.iter().map(|p| p.node).collect()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Generates concrete trips from a fixed template set and place map.
///
/// Construction validates that every category referenced by a template
/// exists and can be drawn from, so generation itself only fails on a
/// traveler lacking a referenced attribute.
pub struct TripGenerator<'a> {
    templates: &'a [TripTemplate],
    selectors: BTreeMap<&'a str, WeightedSelector<'a>>,
}

impl<'a> TripGenerator<'a> {
    pub fn new(templates: &'a [TripTemplate], places: &'a PlaceMap) -> TripResult<Self> {
        let mut selectors = BTreeMap::new();
        for category in templates.iter().flat_map(TripTemplate::categories) {
            if selectors.contains_key(category) {
                continue;
            }
            let list = places
                .get(category)
                .ok_or_else(|| TripError::UnknownCategory(category.to_owned()))?;
            selectors.insert(category, WeightedSelector::new(category, list)?);
        }
        Ok(Self { templates, selectors })
    }

    pub fn templates(&self) -> &'a [TripTemplate] {
        self.templates
    }

    /// All trips `traveler` makes over `time_span_weeks`.
    ///
    /// Per template: sample a count, then resolve the locations afresh for
    /// each repetition (attribute lookups repeat; category draws do not)
    /// and lay them out along the template's route.
    pub fn generate(
        &self,
        time_span_weeks: f64,
        traveler:        &'a Traveler,
        rng:             &mut SimRng,
    ) -> TripResult<Vec<ConcreteTrip<'a>>> {
        let mut trips = Vec::new();

        for template in self.templates {
            let count = template.sample_count(time_span_weeks, rng);
            for _ in 0..count {
                let resolved: Vec<&'a Place> = template
                    .locations()
                    .iter()
                    .map(|loc| self.resolve(loc, traveler, rng))
                    .collect::<TripResult<_>>()?;

                trips.push(ConcreteTrip {
                    stops: template.route().iter().map(|&i| resolved[i]).collect(),
                });
            }
        }

        Ok(trips)
    }

    fn resolve(&self, loc: &LocationSpec, traveler: &'a Traveler, rng: &mut SimRng) -> TripResult<&'a Place> {
        match loc {
            LocationSpec::TravelerAttr(attr) => traveler
                .get(attr)
                .ok_or_else(|| TripError::MissingAttribute(attr.clone())),
            LocationSpec::FromCategory(category) => self
                .selectors
                .get(category.as_str())
                .map(|sel| sel.choose(rng))
                .ok_or_else(|| TripError::UnknownCategory(category.clone())),
        }
    }
}

/// One-shot form of [`TripGenerator::generate`].
pub fn generate_trips<'a>(
    time_span_weeks: f64,
    templates:       &'a [TripTemplate],
    traveler:        &'a Traveler,
    places:          &'a PlaceMap,
    rng:             &mut SimRng,
) -> TripResult<Vec<ConcreteTrip<'a>>> {
    TripGenerator::new(templates, places)?.generate(time_span_weeks, traveler, rng)
}
