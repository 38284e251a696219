//! Weight-proportional random selection of places.

use abts_core::SimRng;

use crate::{Place, TripError, TripResult};

/// Draws places from one category with probability proportional to weight.
///
/// Construction builds the cumulative-weight array once; each draw is a
/// uniform sample in `[0, total)` plus a binary search, O(log n).
/// Zero-weight places occupy an empty interval and are never drawn.
#[derive(Clone, Debug)]
pub struct WeightedSelector<'a> {
    places:     &'a [Place],
    cumulative: Vec<f64>,
}

impl<'a> WeightedSelector<'a> {
    /// Build a selector over `places`.  `category` is only used to label
    /// errors.
    ///
    /// # Errors
    ///
    /// - [`TripError::InvalidWeight`] for a negative or non-finite weight.
    /// - [`TripError::WeightOverflow`] if the weights sum past `f64::MAX`.
    /// - [`TripError::EmptyCategory`] if `places` is empty or every weight
    ///   is zero.
    pub fn new(category: &str, places: &'a [Place]) -> TripResult<Self> {
        let mut cumulative = Vec::with_capacity(places.len());
        let mut total = 0.0;
        for place in places {
            if !(place.weight.is_finite() && place.weight >= 0.0) {
                return Err(TripError::InvalidWeight {
                    category: category.to_owned(),
                    name:     place.name.clone(),
                    weight:   place.weight,
                });
            }
            total += place.weight;
            cumulative.push(total);
        }
        if total.is_infinite() {
            return Err(TripError::WeightOverflow(category.to_owned()));
        }
        if !(total > 0.0) {
            return Err(TripError::EmptyCategory(category.to_owned()));
        }
        Ok(Self { places, cumulative })
    }

    /// Sum of all weights.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Draw one place.
    pub fn choose(&self, rng: &mut SimRng) -> &'a Place {
        let x: f64 = rng.gen_range(0.0..self.total_weight());
        let i = self.cumulative.partition_point(|&c| c <= x);
        &self.places[i.min(self.places.len() - 1)]
    }
}

/// One-off weighted draw from `places`.
///
/// Builds the cumulative array on every call; prefer a [`WeightedSelector`]
/// when drawing repeatedly from the same list.
pub fn choose<'a>(places: &'a [Place], rng: &mut SimRng) -> TripResult<&'a Place> {
    Ok(WeightedSelector::new("", places)?.choose(rng))
}
