//! Fluent builder assembling a runnable [`Model`] from a raw map.

use std::collections::BTreeMap;

use log::info;

use abts_core::SimRng;
use abts_network::{NetworkBuilder, NetworkConfig, RawMap, RoadGraph};
use abts_trips::{
    default_attributes, default_templates, generate_travelers, homes_from_residential,
    CategoryRegistry, PlaceMap, Traveler, TripTemplate,
};

use crate::{
    SensitivityAnalyzer, SimConfig, SimOutcome, SimResult, SweepObserver, SweepSummary,
    TravelSimulator,
};

/// Category name under which residential homes are registered.
const HOME: &str = "home";

/// Child-seed offset for traveler generation, keeping it off the trip stream.
const TRAVELER_STREAM: u64 = 1;

/// Fluent builder for [`Model`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                         |
/// |-------------------|-------------------------------------------------|
/// | `.network(c)`     | `NetworkConfig::default()`                      |
/// | `.registry(r)`    | `CategoryRegistry::osm_defaults()`              |
/// | `.attributes(m)`  | `default_attributes()` (home, work, church)     |
/// | `.templates(v)`   | `default_templates()`                           |
/// | `.config(c)`      | `SimConfig::default()`                          |
///
/// Homes come from residential road length unless the registry defines a
/// `home` category of its own.
pub struct ModelBuilder<'m> {
    map:        &'m RawMap,
    network:    NetworkConfig,
    registry:   Option<CategoryRegistry>,
    attributes: BTreeMap<String, String>,
    templates:  Vec<TripTemplate>,
    config:     SimConfig,
}

impl<'m> ModelBuilder<'m> {
    pub fn new(map: &'m RawMap) -> Self {
        Self {
            map,
            network:    NetworkConfig::default(),
            registry:   None,
            attributes: default_attributes(),
            templates:  default_templates(),
            config:     SimConfig::default(),
        }
    }

    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn registry(mut self, registry: CategoryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Traveler attribute → place category.
    pub fn attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn templates(mut self, templates: Vec<TripTemplate>) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the network, classify places, and draw the traveler population.
    pub fn build(self) -> SimResult<Model> {
        self.config.validate()?;

        let graph = NetworkBuilder::new(self.network).build(self.map)?;
        let registry = self.registry.unwrap_or_else(CategoryRegistry::osm_defaults);
        let mut places = registry.classify(self.map, &graph);
        places
            .entry(HOME.to_owned())
            .or_insert_with(|| homes_from_residential(&graph));

        let mut rng = SimRng::new(self.config.seed).child(TRAVELER_STREAM);
        let travelers =
            generate_travelers(self.config.traveler_count, &self.attributes, &places, &mut rng)?;

        info!(
            "Model ready: {} nodes, {} edges, {} travelers",
            graph.node_count(),
            graph.edge_count(),
            travelers.len()
        );
        Model::from_parts(graph, places, travelers, self.templates, self.config)
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// A built network together with the population that travels on it.
#[derive(Clone, Debug)]
pub struct Model {
    graph:     RoadGraph,
    places:    PlaceMap,
    travelers: Vec<Traveler>,
    templates: Vec<TripTemplate>,
    config:    SimConfig,
}

impl Model {
    /// Assemble a model from pre-built parts.
    pub fn from_parts(
        graph:     RoadGraph,
        places:    PlaceMap,
        travelers: Vec<Traveler>,
        templates: Vec<TripTemplate>,
        config:    SimConfig,
    ) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { graph, places, travelers, templates, config })
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn places(&self) -> &PlaceMap {
        &self.places
    }

    pub fn travelers(&self) -> &[Traveler] {
        &self.travelers
    }

    pub fn templates(&self) -> &[TripTemplate] {
        &self.templates
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn simulator(&self) -> TravelSimulator {
        TravelSimulator::new(self.config.time_span_weeks, self.config.policy)
    }

    pub fn analyzer(&self) -> SensitivityAnalyzer {
        SensitivityAnalyzer::from_config(&self.config)
    }

    /// Mean hours per traveler per week on the full network.
    pub fn mean_travel_time(&self) -> SimResult<SimOutcome> {
        let mut rng = SimRng::new(self.config.seed);
        self.simulator()
            .run_logged(&self.graph, &self.travelers, &self.templates, &self.places, &mut rng)
    }

    /// Baseline plus a sweep over every eligible edge.
    ///
    /// With the `parallel` feature and `config.workers > 1` the probes run
    /// on Rayon and the observer sees the merged reports afterwards.
    pub fn sensitivity<O: SweepObserver + ?Sized>(&mut self, observer: &mut O) -> SimResult<SweepSummary> {
        let analyzer = self.analyzer();
        let baseline = analyzer.baseline(&self.graph, &self.travelers, &self.templates, &self.places)?;

        #[cfg(feature = "parallel")]
        if self.config.workers > 1 {
            let summary = analyzer.analyze_parallel(
                &self.graph,
                &self.travelers,
                &self.templates,
                &self.places,
                baseline,
                self.config.workers,
            )?;
            return Ok(replay(summary, observer));
        }

        #[cfg(not(feature = "parallel"))]
        if self.config.workers > 1 {
            log::warn!("{} workers requested without the `parallel` feature, sweeping sequentially", self.config.workers);
        }
        analyzer.analyze(
            &mut self.graph,
            &self.travelers,
            &self.templates,
            &self.places,
            baseline,
            observer,
        )
    }
}

/// Feed a finished parallel sweep through `observer`, honouring `Break`.
#[cfg(feature = "parallel")]
fn replay<O: SweepObserver + ?Sized>(mut summary: SweepSummary, observer: &mut O) -> SweepSummary {
    observer.on_sweep_start(summary.edges_total, summary.baseline);
    let mut keep = summary.reports.len();
    for (index, report) in summary.reports.iter().enumerate() {
        if observer.on_edge(index, report).is_break() {
            keep = index + 1;
            summary.cancelled = true;
            break;
        }
    }
    summary.reports.truncate(keep);
    observer.on_sweep_end(&summary);
    summary
}
