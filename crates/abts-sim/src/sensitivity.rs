//! Per-edge sensitivity sweep.
//!
//! Each eligible edge is removed in turn, the simulator is re-run on the
//! reduced graph, and the edge is put back exactly as it was.  Every probe
//! starts from a fresh `SimRng::new(seed)`, so all probes and the baseline
//! see the same trip draws and differences come from routing alone.  The
//! outcome of a probe does not depend on which edges were probed before
//! it, which is what lets [`partition`] split the sweep across workers.

use std::ops::ControlFlow;

use log::{debug, info};

use abts_core::{EdgeKey, NodeId, RoadClass, SimRng};
use abts_network::{DijkstraRouter, RoadGraph, Router};
use abts_trips::{PlaceMap, Traveler, TripTemplate};

use crate::{SimConfig, SimError, SimResult, SweepObserver, TravelSimulator, UnreachablePolicy};

// ── Reports ───────────────────────────────────────────────────────────────────

/// Effect of removing a single edge.
///
/// A removal that strands trips is reported either way the policy is set:
/// as `Unreachable` under [`UnreachablePolicy::Fail`], or as `Measured`
/// with `unreachable_trips > 0` under [`UnreachablePolicy::ExcludeTrip`].
/// Check [`disconnects`](Self::disconnects) before reading
/// `percent_change`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeResult {
    Measured {
        mean_hours_per_week: f64,
        /// `(perturbed - baseline) / baseline`, as a fraction.  Dropped
        /// trips add no time, so when `unreachable_trips > 0` this is not
        /// comparable with the baseline and usually reads as a saving.
        percent_change:      f64,
        /// Trips dropped under [`UnreachablePolicy::ExcludeTrip`].
        unreachable_trips:   usize,
    },
    /// Under [`UnreachablePolicy::Fail`], the first trip leg the removal
    /// disconnected.
    Unreachable { from: NodeId, to: NodeId },
}

impl ProbeResult {
    /// `true` if the removal left at least one trip without a route.
    pub fn disconnects(&self) -> bool {
        match *self {
            ProbeResult::Measured { unreachable_trips, .. } => unreachable_trips > 0,
            ProbeResult::Unreachable { .. } => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeReport {
    pub edge:      EdgeKey,
    /// Road name of the removed edge (may be empty).
    pub name:      String,
    /// Human-readable descriptions of `edge.a()` and `edge.b()`.
    pub endpoints: (String, String),
    pub result:    ProbeResult,
}

impl EdgeReport {
    pub fn percent_change(&self) -> Option<f64> {
        match self.result {
            ProbeResult::Measured { percent_change, .. } => Some(percent_change),
            ProbeResult::Unreachable { .. } => None,
        }
    }
}

/// Everything a sweep produced, in snapshot order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepSummary {
    pub baseline:    f64,
    /// Size of the eligible-edge snapshot.
    pub edges_total: usize,
    pub reports:     Vec<EdgeReport>,
    /// The observer stopped the sweep early.
    pub cancelled:   bool,
}

impl SweepSummary {
    /// Reports whose removal stranded at least one trip, under either
    /// policy.
    pub fn disconnecting(&self) -> usize {
        self.reports.iter().filter(|r| r.result.disconnects()).count()
    }
}

/// Relative change from `baseline` to `perturbed`, as a fraction.
///
/// A zero baseline gives 0 when nothing changed and `+inf` otherwise.
pub fn percent_change(baseline: f64, perturbed: f64) -> f64 {
    if baseline == 0.0 {
        if perturbed == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        (perturbed - baseline) / baseline
    }
}

/// The share of `edges` handled by worker `worker_index` of `worker_count`:
/// every item whose snapshot index is congruent to `worker_index`.
///
/// Workers `0..worker_count` together cover each edge exactly once.
pub fn partition(edges: &[EdgeKey], worker_index: usize, worker_count: usize) -> Vec<EdgeKey> {
    if worker_count == 0 {
        return Vec::new();
    }
    edges
        .iter()
        .enumerate()
        .filter(|(i, _)| i % worker_count == worker_index)
        .map(|(_, &key)| key)
        .collect()
}

// ── SensitivityAnalyzer ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SensitivityAnalyzer<R: Router = DijkstraRouter> {
    simulator:           TravelSimulator<R>,
    seed:                u64,
    exclude_residential: bool,
}

impl SensitivityAnalyzer<DijkstraRouter> {
    pub fn new(time_span_weeks: f64, policy: UnreachablePolicy, seed: u64) -> Self {
        Self::with_simulator(TravelSimulator::new(time_span_weeks, policy), seed)
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.time_span_weeks, config.policy, config.seed)
            .exclude_residential(config.exclude_residential)
    }
}

impl<R: Router> SensitivityAnalyzer<R> {
    pub fn with_simulator(simulator: TravelSimulator<R>, seed: u64) -> Self {
        Self { simulator, seed, exclude_residential: false }
    }

    /// Leave residential edges out of the sweep.
    pub fn exclude_residential(mut self, exclude: bool) -> Self {
        self.exclude_residential = exclude;
        self
    }

    pub fn simulator(&self) -> &TravelSimulator<R> {
        &self.simulator
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Edges the sweep visits, in ascending [`EdgeKey`] order.
    pub fn eligible_edges(&self, graph: &RoadGraph) -> Vec<EdgeKey> {
        graph
            .sorted_edge_keys()
            .into_iter()
            .filter(|&key| {
                !self.exclude_residential
                    || graph
                        .edge_by_key(key)
                        .is_some_and(|e| e.road_class != RoadClass::Residential)
            })
            .collect()
    }

    /// Mean travel time on the unmodified graph, drawn with the same seed
    /// every probe uses.
    pub fn baseline(
        &self,
        graph:     &RoadGraph,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
    ) -> SimResult<f64> {
        let mut rng = SimRng::new(self.seed);
        let outcome = self.simulator.run_logged(graph, travelers, templates, places, &mut rng)?;
        Ok(outcome.mean_hours_per_week)
    }

    /// Remove `key`, re-simulate, restore.  `None` if `key` is not an edge
    /// of `graph`.
    ///
    /// The edge is restored even when the simulator fails.
    pub fn probe(
        &self,
        graph:     &mut RoadGraph,
        key:       EdgeKey,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
        baseline:  f64,
    ) -> SimResult<Option<EdgeReport>> {
        let Some(edge) = graph.edge_by_key(key) else {
            return Ok(None);
        };
        let name = edge.name.clone();
        let endpoints = (graph.describe_node(key.a()), graph.describe_node(key.b()));

        let seed = self.seed;
        let outcome = graph.with_edge_removed(key, |reduced| {
            self.simulator.run(reduced, travelers, templates, places, &mut SimRng::new(seed))
        });

        let result = match outcome {
            None => return Ok(None),
            Some(Ok(o)) => ProbeResult::Measured {
                mean_hours_per_week: o.mean_hours_per_week,
                percent_change:      percent_change(baseline, o.mean_hours_per_week),
                unreachable_trips:   o.trips_unreachable,
            },
            Some(Err(SimError::Unreachable { from, to })) => ProbeResult::Unreachable { from, to },
            Some(Err(e)) => return Err(e),
        };
        debug!("Probed {key}: {result:?}");
        Ok(Some(EdgeReport { edge: key, name, endpoints, result }))
    }

    /// Probe every eligible edge in order, reporting each to `observer`.
    ///
    /// Disconnecting removals are reported as [`ProbeResult::Unreachable`]
    /// and never stop the sweep; only an observer `Break` or a non-routing
    /// error does.  `graph` compares equal to its pre-sweep state when this
    /// returns, whatever the outcome.
    pub fn analyze<O: SweepObserver + ?Sized>(
        &self,
        graph:     &mut RoadGraph,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
        baseline:  f64,
        observer:  &mut O,
    ) -> SimResult<SweepSummary> {
        let edges = self.eligible_edges(graph);
        let mut summary = SweepSummary {
            baseline,
            edges_total: edges.len(),
            reports: Vec::with_capacity(edges.len()),
            cancelled: false,
        };
        observer.on_sweep_start(edges.len(), baseline);

        for (index, &key) in edges.iter().enumerate() {
            let Some(report) = self.probe(graph, key, travelers, templates, places, baseline)? else {
                continue;
            };
            let flow = observer.on_edge(index, &report);
            summary.reports.push(report);
            if let ControlFlow::Break(()) = flow {
                summary.cancelled = true;
                break;
            }
        }

        info!(
            "Sensitivity sweep probed {} of {} edges",
            summary.reports.len(),
            summary.edges_total
        );
        observer.on_sweep_end(&summary);
        Ok(summary)
    }

    /// [`analyze`](Self::analyze) across `workers` Rayon tasks.
    ///
    /// Each worker takes its [`partition`] of the snapshot and probes it on
    /// a private clone of `graph`; reports are merged back into snapshot
    /// order, so the result equals the sequential sweep's.
    #[cfg(feature = "parallel")]
    pub fn analyze_parallel(
        &self,
        graph:     &RoadGraph,
        travelers: &[Traveler],
        templates: &[TripTemplate],
        places:    &PlaceMap,
        baseline:  f64,
        workers:   usize,
    ) -> SimResult<SweepSummary> {
        use rayon::prelude::*;

        if workers == 0 {
            return Err(SimError::Config("worker count must be at least 1".into()));
        }
        let edges = self.eligible_edges(graph);

        let per_worker: Vec<SimResult<Vec<EdgeReport>>> = (0..workers)
            .into_par_iter()
            .map(|worker| -> SimResult<Vec<EdgeReport>> {
                let mut local = graph.clone();
                let mut out = Vec::new();
                for key in partition(&edges, worker, workers) {
                    if let Some(r) = self.probe(&mut local, key, travelers, templates, places, baseline)? {
                        out.push(r);
                    }
                }
                Ok(out)
            })
            .collect();

        let mut reports = Vec::with_capacity(edges.len());
        for chunk in per_worker {
            reports.extend(chunk?);
        }
        // Snapshot order is ascending EdgeKey.
        reports.sort_by_key(|r| r.edge);

        info!("Parallel sensitivity sweep probed {} edges on {workers} workers", reports.len());
        Ok(SweepSummary { baseline, edges_total: edges.len(), reports, cancelled: false })
    }
}
