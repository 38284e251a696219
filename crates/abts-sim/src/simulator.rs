//! Mean weekly travel time over a traveler population.

use log::{debug, info};

use abts_core::SimRng;
use abts_network::{DijkstraRouter, PathCoster, RoadGraph, RouteError, Router};
use abts_trips::{ConcreteTrip, PlaceMap, Traveler, TripGenerator, TripTemplate};

use crate::{SimError, SimResult, UnreachablePolicy};

/// Result of one simulator run.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimOutcome {
    /// Average over travelers of (hours travelled / weeks simulated).
    pub mean_hours_per_week: f64,
    pub trips_costed:        usize,
    pub trips_unreachable:   usize,
}

/// Generates every traveler's trips and costs them on a graph.
///
/// The graph is only read; the sensitivity sweep mutates it between runs.
#[derive(Clone, Debug)]
pub struct TravelSimulator<R: Router = DijkstraRouter> {
    time_span_weeks: f64,
    policy:          UnreachablePolicy,
    coster:          PathCoster<R>,
}

impl TravelSimulator<DijkstraRouter> {
    pub fn new(time_span_weeks: f64, policy: UnreachablePolicy) -> Self {
        Self::with_router(time_span_weeks, policy, DijkstraRouter)
    }
}

impl<R: Router> TravelSimulator<R> {
    pub fn with_router(time_span_weeks: f64, policy: UnreachablePolicy, router: R) -> Self {
        Self { time_span_weeks, policy, coster: PathCoster::with_router(router) }
    }

    pub fn time_span_weeks(&self) -> f64 {
        self.time_span_weeks
    }

    pub fn policy(&self) -> UnreachablePolicy {
        self.policy
    }

    /// Mean hours per traveler per week.
    ///
    /// Travelers are processed in slice order and draw from `rng` in that
    /// order, so the same seed reproduces the same trips.  An empty traveler
    /// list yields a mean of 0.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] for a non-positive span.
    /// - [`SimError::Trip`] if trip generation fails for any traveler.
    /// - [`SimError::Unreachable`] under [`UnreachablePolicy::Fail`].
    /// - [`SimError::Route`] if a place sits on a node missing from `graph`.
    pub fn run(
        &self,
        graph:     &RoadGraph,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
        rng:       &mut SimRng,
    ) -> SimResult<SimOutcome> {
        let span = self.time_span_weeks;
        if !(span.is_finite() && span > 0.0) {
            return Err(SimError::Config(format!("time span must be positive, got {span}")));
        }

        let mut outcome = SimOutcome::default();
        if travelers.is_empty() {
            return Ok(outcome);
        }

        let generator = TripGenerator::new(templates, places)?;
        let mut weekly_total = 0.0;

        for traveler in travelers {
            let trips = generator.generate(span, traveler, rng)?;
            let mut hours = 0.0;
            for trip in &trips {
                match self.cost_trip(graph, trip)? {
                    Some(h) => {
                        hours += h;
                        outcome.trips_costed += 1;
                    }
                    None => outcome.trips_unreachable += 1,
                }
            }
            weekly_total += hours / span;
        }

        outcome.mean_hours_per_week = weekly_total / travelers.len() as f64;
        debug!(
            "Simulated {} travelers: {:.4} h/week, {} trips costed, {} unreachable",
            travelers.len(),
            outcome.mean_hours_per_week,
            outcome.trips_costed,
            outcome.trips_unreachable,
        );
        Ok(outcome)
    }

    /// Same as [`run`](Self::run), logged at info level.  Used for the
    /// headline estimate rather than per-edge probes.
    pub fn run_logged(
        &self,
        graph:     &RoadGraph,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
        rng:       &mut SimRng,
    ) -> SimResult<SimOutcome> {
        let outcome = self.run(graph, travelers, templates, places, rng)?;
        info!(
            "Mean travel time {:.4} hours per traveler per week over {} weeks",
            outcome.mean_hours_per_week, self.time_span_weeks,
        );
        Ok(outcome)
    }

    /// Hours for one trip, or `None` if it was dropped as unreachable.
    fn cost_trip(&self, graph: &RoadGraph, trip: &ConcreteTrip<'_>) -> SimResult<Option<f64>> {
        match self.coster.cost(graph, &trip.nodes()) {
            Ok(path) => Ok(Some(path.total())),
            Err(RouteError::Unreachable { from, to }) => match self.policy {
                UnreachablePolicy::ExcludeTrip => {
                    debug!("Dropping trip: {from} cannot reach {to}");
                    Ok(None)
                }
                UnreachablePolicy::Fail => Err(SimError::Unreachable { from, to }),
            },
            Err(e) => Err(e.into()),
        }
    }
}
