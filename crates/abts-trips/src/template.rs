//! Trip templates: reusable descriptions of a kind of journey.
//!
//! A template lists the locations involved and a route through them by
//! index, e.g. locations `[home, work]` with route `[0, 1, 0]` is a commute
//! there and back.  How often the journey happens is a normal distribution
//! in trips per week.

use rand_distr::{Distribution, Normal};

use abts_core::SimRng;

use crate::{TripError, TripResult};

/// Where one stop of a trip comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocationSpec {
    /// The traveler's own place bound to this attribute name.
    TravelerAttr(String),
    /// A fresh weighted draw from this category on every trip.
    FromCategory(String),
}

impl LocationSpec {
    pub fn attr(name: &str) -> Self {
        LocationSpec::TravelerAttr(name.to_owned())
    }

    pub fn category(name: &str) -> Self {
        LocationSpec::FromCategory(name.to_owned())
    }
}

/// A validated trip template.
#[derive(Clone, Debug, PartialEq)]
pub struct TripTemplate {
    label:         String,
    mean_per_week: f64,
    std_dev:       f64,
    locations:     Vec<LocationSpec>,
    route:         Vec<usize>,
}

impl TripTemplate {
    /// # Errors
    ///
    /// [`TripError::InvalidTemplate`] if the mean is not finite, the
    /// standard deviation is negative or not finite, or a route index is
    /// out of bounds.
    pub fn new(
        label:         &str,
        mean_per_week: f64,
        std_dev:       f64,
        locations:     Vec<LocationSpec>,
        route:         Vec<usize>,
    ) -> TripResult<Self> {
        let invalid = |reason: String| TripError::InvalidTemplate { label: label.to_owned(), reason };

        if !mean_per_week.is_finite() {
            return Err(invalid(format!("mean frequency {mean_per_week} is not finite")));
        }
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(invalid(format!("standard deviation {std_dev} must be finite and ≥ 0")));
        }
        if let Some(&bad) = route.iter().find(|&&i| i >= locations.len()) {
            return Err(invalid(format!(
                "route index {bad} out of bounds for {} locations",
                locations.len()
            )));
        }

        Ok(Self { label: label.to_owned(), mean_per_week, std_dev, locations, route })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mean_per_week(&self) -> f64 {
        self.mean_per_week
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn locations(&self) -> &[LocationSpec] {
        &self.locations
    }

    pub fn route(&self) -> &[usize] {
        &self.route
    }

    /// Categories this template draws from.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().filter_map(|loc| match loc {
            LocationSpec::FromCategory(c) => Some(c.as_str()),
            LocationSpec::TravelerAttr(_) => None,
        })
    }

    /// Sample how many times this trip happens over `time_span_weeks`.
    ///
    /// The weekly frequency is drawn from `Normal(mean, std_dev)`; the count
    /// is `floor(frequency × span)`, and anything below one (including
    /// negative draws) is zero.
    pub fn sample_count(&self, time_span_weeks: f64, rng: &mut SimRng) -> usize {
        let frequency = match Normal::new(self.mean_per_week, self.std_dev) {
            Ok(normal) => normal.sample(rng.inner()),
            // Parameters are validated in `new`.
            Err(_) => self.mean_per_week,
        };
        let count = (frequency * time_span_weeks).floor();
        if count >= 1.0 { count as usize } else { 0 }
    }
}

/// The everyday trip mix: commuting, leisure outings, eating out, and
/// church, each a round trip from home.
pub fn default_templates() -> Vec<TripTemplate> {
    let round_trip = |label: &str, mean: f64, std_dev: f64, away: LocationSpec| TripTemplate {
        label:         label.to_owned(),
        mean_per_week: mean,
        std_dev,
        locations:     vec![LocationSpec::attr("home"), away],
        route:         vec![0, 1, 0],
    };

    vec![
        round_trip("commute", 5.0, 1.0, LocationSpec::attr("work")),
        round_trip("leisure", 2.0, 0.5, LocationSpec::category("leisure")),
        round_trip("restaurant", 4.0, 1.0, LocationSpec::category("restaurant")),
        round_trip("church", 1.0, 0.5, LocationSpec::attr("church")),
    ]
}
