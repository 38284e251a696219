//! Unit and integration tests for abts-sim.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use abts_core::{GeoPoint, NodeId, RoadClass};
    use abts_network::{Edge, RoadGraph};
    use abts_trips::{LocationSpec, Place, Traveler, TripTemplate};

    pub fn edge(hours: f64, class: RoadClass, name: &str) -> Edge {
        Edge { travel_time: hours, length: hours * 30.0, road_class: class, name: name.to_owned() }
    }

    /// Square 1─2─3─4─1 with travel times 1, 2, 3, 4 hours.
    pub fn square() -> RoadGraph {
        let mut g = RoadGraph::new();
        let corners = [(1, 0.0, 0.0), (2, 0.1, 0.0), (3, 0.1, 0.1), (4, 0.0, 0.1)];
        for (id, lon, lat) in corners {
            g.add_node(NodeId(id), GeoPoint::new(lon, lat));
        }
        g.add_edge(NodeId(1), NodeId(2), edge(1.0, RoadClass::Primary, "First")).unwrap();
        g.add_edge(NodeId(2), NodeId(3), edge(2.0, RoadClass::Residential, "Second")).unwrap();
        g.add_edge(NodeId(3), NodeId(4), edge(3.0, RoadClass::Primary, "Third")).unwrap();
        g.add_edge(NodeId(4), NodeId(1), edge(4.0, RoadClass::Residential, "Fourth")).unwrap();
        g
    }

    /// 1 ─ 2 ─ 3, one hour per edge.
    pub fn line() -> RoadGraph {
        let mut g = RoadGraph::new();
        for id in 1..=3 {
            g.add_node(NodeId(id), GeoPoint::new(id as f64 * 0.1, 0.0));
        }
        g.add_edge(NodeId(1), NodeId(2), edge(1.0, RoadClass::Primary, "West")).unwrap();
        g.add_edge(NodeId(2), NodeId(3), edge(1.0, RoadClass::Primary, "East")).unwrap();
        g
    }

    pub fn commuter(home: i64, work: i64) -> Traveler {
        let mut attrs = BTreeMap::new();
        attrs.insert("home".to_owned(), Place::new(NodeId(home), "home", 1.0));
        attrs.insert("work".to_owned(), Place::new(NodeId(work), "work", 1.0));
        Traveler::new(attrs)
    }

    /// One deterministic home → work → home trip per week.
    pub fn weekly_commute() -> Vec<TripTemplate> {
        vec![
            TripTemplate::new(
                "commute",
                1.0,
                0.0,
                vec![LocationSpec::attr("home"), LocationSpec::attr("work")],
                vec![0, 1, 0],
            )
            .unwrap(),
        ]
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use crate::{SimConfig, SimError, UnreachablePolicy};

    #[test]
    fn defaults_are_valid() {
        let cfg = SimConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.policy, UnreachablePolicy::ExcludeTrip);
        assert_eq!(cfg.workers, 1);
    }

    #[test]
    fn non_positive_span_rejected() {
        for span in [0.0, -1.0, f64::NAN] {
            let cfg = SimConfig { time_span_weeks: span, ..SimConfig::default() };
            assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
        }
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = SimConfig { workers: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

// ── TravelSimulator ───────────────────────────────────────────────────────────

#[cfg(test)]
mod simulator {
    use abts_core::{NodeId, SimRng};
    use abts_trips::PlaceMap;

    use super::helpers::*;
    use crate::{SimError, TravelSimulator, UnreachablePolicy};

    #[test]
    fn square_commute_takes_shortest_way_round() {
        let g = square();
        let travelers = vec![commuter(1, 3)];
        let sim = TravelSimulator::new(2.0, UnreachablePolicy::ExcludeTrip);

        let out = sim
            .run(&g, &travelers, &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap();
        // 1→2→3 is 3 h each way; two trips over two weeks.
        assert!(close(out.mean_hours_per_week, 6.0));
        assert_eq!(out.trips_costed, 2);
        assert_eq!(out.trips_unreachable, 0);
    }

    #[test]
    fn mean_is_over_travelers() {
        let g = square();
        let travelers = vec![commuter(1, 2), commuter(1, 3), commuter(1, 1)];
        let sim = TravelSimulator::new(1.0, UnreachablePolicy::ExcludeTrip);

        let out = sim
            .run(&g, &travelers, &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap();
        // (2 + 6 + 0) / 3
        assert!(close(out.mean_hours_per_week, 8.0 / 3.0));
    }

    #[test]
    fn no_travelers_means_zero() {
        let sim = TravelSimulator::new(5.0, UnreachablePolicy::Fail);
        let out = sim
            .run(&square(), &[], &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap();
        assert_eq!(out.mean_hours_per_week, 0.0);
        assert_eq!(out.trips_costed, 0);
    }

    #[test]
    fn excluded_trip_keeps_traveler_in_denominator() {
        let mut g = line();
        g.remove_edge(NodeId(2), NodeId(3));
        let travelers = vec![commuter(1, 3), commuter(1, 2)];
        let sim = TravelSimulator::new(1.0, UnreachablePolicy::ExcludeTrip);

        let out = sim
            .run(&g, &travelers, &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap();
        assert_eq!(out.trips_unreachable, 1);
        assert_eq!(out.trips_costed, 1);
        assert!(close(out.mean_hours_per_week, 1.0));
    }

    #[test]
    fn fail_policy_names_the_leg() {
        let mut g = line();
        g.remove_edge(NodeId(1), NodeId(2));
        let sim = TravelSimulator::new(1.0, UnreachablePolicy::Fail);

        let err = sim
            .run(&g, &[commuter(1, 3)], &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::Unreachable { from: NodeId(1), to: NodeId(3) }
        ));
    }

    #[test]
    fn place_off_the_graph_is_a_route_error() {
        let sim = TravelSimulator::new(1.0, UnreachablePolicy::ExcludeTrip);
        let err = sim
            .run(&line(), &[commuter(1, 99)], &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, SimError::Route(_)));
    }

    #[test]
    fn zero_span_rejected() {
        let sim = TravelSimulator::new(0.0, UnreachablePolicy::ExcludeTrip);
        let err = sim
            .run(&line(), &[commuter(1, 3)], &weekly_commute(), &PlaceMap::new(), &mut SimRng::new(1))
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}

// ── Sensitivity sweep ─────────────────────────────────────────────────────────

#[cfg(test)]
mod sensitivity {
    use std::ops::ControlFlow;

    use abts_core::{EdgeKey, NodeId};
    use abts_trips::PlaceMap;

    use super::helpers::*;
    use crate::{
        partition, percent_change, EdgeReport, NoopObserver, ProbeResult, SensitivityAnalyzer,
        SimConfig, SweepObserver, UnreachablePolicy,
    };

    fn key(a: i64, b: i64) -> EdgeKey {
        EdgeKey::new(NodeId(a), NodeId(b)).unwrap()
    }

    #[test]
    fn removing_cheap_edge_costs_the_detour() {
        let mut g = square();
        let before = g.clone();
        let travelers = vec![commuter(1, 2)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 3);

        let baseline = analyzer.baseline(&g, &travelers, &templates, &places).unwrap();
        assert!(close(baseline, 2.0));

        let summary = analyzer
            .analyze(&mut g, &travelers, &templates, &places, baseline, &mut NoopObserver)
            .unwrap();
        assert_eq!(g, before, "sweep must leave the graph as it found it");
        assert_eq!(summary.edges_total, 4);
        assert!(!summary.cancelled);

        let keys: Vec<EdgeKey> = summary.reports.iter().map(|r| r.edge).collect();
        assert_eq!(keys, vec![key(1, 2), key(1, 4), key(2, 3), key(3, 4)]);

        // Without 1–2 the detour 1→4→3→2 is 9 h each way.
        match summary.reports[0].result {
            ProbeResult::Measured { mean_hours_per_week, percent_change, unreachable_trips } => {
                assert!(close(mean_hours_per_week - baseline, 2.0 * (9.0 - 1.0)));
                assert!(close(percent_change, 8.0));
                assert_eq!(unreachable_trips, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        // Edges off the shortest path change nothing.
        for r in &summary.reports[1..] {
            assert_eq!(r.percent_change(), Some(0.0));
        }
    }

    #[test]
    fn report_describes_removed_edge() {
        let mut g = square();
        let travelers = vec![commuter(1, 2)];
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 3);
        let report = analyzer
            .probe(&mut g, key(1, 2), &travelers, &weekly_commute(), &PlaceMap::new(), 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(report.name, "First");
        assert_eq!(report.endpoints.0, "junction of First, Fourth");
        assert_eq!(report.endpoints.1, "junction of First, Second");
    }

    #[test]
    fn probing_missing_edge_is_none() {
        let mut g = square();
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 3);
        let report = analyzer
            .probe(&mut g, key(1, 3), &[], &weekly_commute(), &PlaceMap::new(), 0.0)
            .unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn disconnecting_edges_reported_not_fatal() {
        let mut g = line();
        let before = g.clone();
        let travelers = vec![commuter(1, 3)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::Fail, 0);

        let baseline = analyzer.baseline(&g, &travelers, &templates, &places).unwrap();
        let summary = analyzer
            .analyze(&mut g, &travelers, &templates, &places, baseline, &mut NoopObserver)
            .unwrap();

        assert_eq!(g, before);
        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.disconnecting(), 2);
        for r in &summary.reports {
            assert_eq!(r.result, ProbeResult::Unreachable { from: NodeId(1), to: NodeId(3) });
        }
    }

    #[test]
    fn excluded_trips_still_count_as_disconnecting() {
        let mut g = line();
        let travelers = vec![commuter(1, 3)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::new(2.0, UnreachablePolicy::ExcludeTrip, 0);

        let baseline = analyzer.baseline(&g, &travelers, &templates, &places).unwrap();
        let summary = analyzer
            .analyze(&mut g, &travelers, &templates, &places, baseline, &mut NoopObserver)
            .unwrap();
        for r in &summary.reports {
            assert_eq!(
                r.result,
                ProbeResult::Measured { mean_hours_per_week: 0.0, percent_change: -1.0, unreachable_trips: 2 }
            );
            assert!(r.result.disconnects());
        }
        assert_eq!(summary.disconnecting(), 2);
    }

    #[test]
    fn default_policy_sweep_flags_stranding_edge() {
        let mut g = line();
        let travelers = vec![commuter(1, 3), commuter(2, 3)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::from_config(&SimConfig { time_span_weeks: 1.0, ..SimConfig::default() });

        let baseline = analyzer.baseline(&g, &travelers, &templates, &places).unwrap();
        let summary = analyzer
            .analyze(&mut g, &travelers, &templates, &places, baseline, &mut NoopObserver)
            .unwrap();

        // 1–2 strands only the first commuter; 2–3 strands both.
        let stranded: Vec<usize> = summary
            .reports
            .iter()
            .map(|r| match r.result {
                ProbeResult::Measured { unreachable_trips, .. } => unreachable_trips,
                ProbeResult::Unreachable { .. } => panic!("default policy excludes trips"),
            })
            .collect();
        assert_eq!(stranded, vec![1, 2]);
        assert_eq!(summary.disconnecting(), 2);
        assert!(summary.reports.iter().all(|r| r.result.disconnects()));
    }

    #[test]
    fn connected_detour_is_not_disconnecting() {
        let mut g = square();
        let travelers = vec![commuter(1, 3)];
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 0);
        let summary = analyzer
            .analyze(&mut g, &travelers, &weekly_commute(), &PlaceMap::new(), 6.0, &mut NoopObserver)
            .unwrap();
        assert_eq!(summary.disconnecting(), 0);
    }

    #[test]
    fn exclude_residential_skips_residential_edges() {
        let g = square();
        let analyzer =
            SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 0).exclude_residential(true);
        assert_eq!(analyzer.eligible_edges(&g), vec![key(1, 2), key(3, 4)]);
    }

    struct StopAfter {
        limit: usize,
        seen:  Vec<usize>,
        ended: bool,
    }

    impl SweepObserver for StopAfter {
        fn on_edge(&mut self, index: usize, _report: &EdgeReport) -> ControlFlow<()> {
            self.seen.push(index);
            if self.seen.len() >= self.limit { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        }

        fn on_sweep_end(&mut self, _summary: &crate::SweepSummary) {
            self.ended = true;
        }
    }

    #[test]
    fn observer_can_cancel() {
        let mut g = square();
        let before = g.clone();
        let analyzer = SensitivityAnalyzer::new(1.0, UnreachablePolicy::ExcludeTrip, 0);
        let mut obs = StopAfter { limit: 2, seen: vec![], ended: false };

        let summary = analyzer
            .analyze(&mut g, &[commuter(1, 3)], &weekly_commute(), &PlaceMap::new(), 6.0, &mut obs)
            .unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.reports.len(), 2);
        assert_eq!(obs.seen, vec![0, 1]);
        assert!(obs.ended);
        assert_eq!(g, before);
    }

    #[test]
    fn partitions_cover_every_edge_once() {
        let edges: Vec<EdgeKey> = (1..=10).map(|i| key(0, i)).collect();
        let mut merged: Vec<EdgeKey> = (0..3).flat_map(|w| partition(&edges, w, 3)).collect();
        assert_eq!(partition(&edges, 1, 3), vec![key(0, 2), key(0, 5), key(0, 8)]);
        merged.sort();
        assert_eq!(merged, edges);
        assert!(partition(&edges, 0, 0).is_empty());
        assert!(partition(&edges, 5, 3).is_empty());
    }

    #[test]
    fn probes_do_not_depend_on_order() {
        let travelers = vec![commuter(1, 3), commuter(2, 4)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::new(3.0, UnreachablePolicy::ExcludeTrip, 11);

        let mut forward = square();
        let mut backward = square();
        let a = analyzer
            .probe(&mut forward, key(2, 3), &travelers, &templates, &places, 1.0)
            .unwrap();
        for k in [key(3, 4), key(1, 4)] {
            analyzer.probe(&mut backward, k, &travelers, &templates, &places, 1.0).unwrap();
        }
        let b = analyzer
            .probe(&mut backward, key(2, 3), &travelers, &templates, &places, 1.0)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_baseline_change() {
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 1.5), f64::INFINITY);
        assert!(close(percent_change(4.0, 5.0), 0.25));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_sweep_matches_sequential() {
        let travelers = vec![commuter(1, 3), commuter(2, 4), commuter(1, 2)];
        let templates = weekly_commute();
        let places = PlaceMap::new();
        let analyzer = SensitivityAnalyzer::new(2.0, UnreachablePolicy::ExcludeTrip, 5);

        let mut g = square();
        let baseline = analyzer.baseline(&g, &travelers, &templates, &places).unwrap();
        let seq = analyzer
            .analyze(&mut g, &travelers, &templates, &places, baseline, &mut NoopObserver)
            .unwrap();
        let par = analyzer
            .analyze_parallel(&g, &travelers, &templates, &places, baseline, 3)
            .unwrap();
        assert_eq!(seq, par);
    }
}

// ── ModelBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use abts_core::{EdgeKey, NodeId};
    use abts_network::RawMap;

    use super::helpers::weekly_commute;
    use crate::{ModelBuilder, NoopObserver, ProbeResult, SimConfig, SimError};

    /// 1 ─res─ 2 ─res─ 3 ─pri─ 4 ─pri─ 5, with a residential spur 3 ─ 6.
    /// An office sits next to 5 and a church next to 1.
    fn town() -> RawMap {
        let mut map = RawMap::new();
        for (id, lon, lat) in [
            (1, 0.00, 0.0),
            (2, 0.01, 0.0),
            (3, 0.02, 0.0),
            (4, 0.03, 0.0),
            (5, 0.04, 0.0),
            (6, 0.02, 0.01),
        ] {
            map.add_node(id, lon, lat);
        }
        map.add_node(7, 0.041, 0.001).tag("office", "company").tag("name", "Mill");
        map.add_node(8, -0.001, 0.0).tag("amenity", "place_of_worship");
        map.add_road(100, &[1, 2, 3], "residential", "Elm Street");
        map.add_road(101, &[3, 4, 5], "primary", "Main Street");
        map.add_road(102, &[3, 6], "residential", "Oak Lane");
        map
    }

    fn config() -> SimConfig {
        SimConfig { traveler_count: 20, seed: 7, ..SimConfig::default() }
    }

    #[test]
    fn builds_graph_places_and_travelers() {
        let map = town();
        let model = ModelBuilder::new(&map)
            .templates(weekly_commute())
            .config(config())
            .build()
            .unwrap();

        assert_eq!(model.graph().node_count(), 4);
        assert_eq!(model.graph().edge_count(), 3);
        assert_eq!(model.travelers().len(), 20);
        assert_eq!(model.places()["work"][0].node, NodeId(5));
        assert_eq!(model.places()["church"][0].node, NodeId(1));
        let homes: Vec<i64> = model.places()["home"].iter().map(|p| p.node.0).collect();
        assert_eq!(homes, vec![1, 3, 6]);
    }

    #[test]
    fn mean_is_reproducible() {
        let map = town();
        let build = || {
            ModelBuilder::new(&map)
                .templates(weekly_commute())
                .config(config())
                .build()
                .unwrap()
        };
        let a = build().mean_travel_time().unwrap();
        let b = build().mean_travel_time().unwrap();
        assert_eq!(a, b);
        assert!(a.mean_hours_per_week > 0.0);
        assert_eq!(a.trips_costed, 20 * 5);
    }

    #[test]
    fn bridge_removal_strands_everyone() {
        let map = town();
        let mut model = ModelBuilder::new(&map)
            .templates(weekly_commute())
            .config(config())
            .build()
            .unwrap();
        let before = model.graph().clone();

        let summary = model.sensitivity(&mut NoopObserver).unwrap();
        assert_eq!(model.graph(), &before);
        assert_eq!(summary.reports.len(), 3);

        let bridge = EdgeKey::new(NodeId(3), NodeId(5)).unwrap();
        let report = summary.reports.iter().find(|r| r.edge == bridge).unwrap();
        assert_eq!(report.name, "Main Street");
        // Every commute crosses the bridge: 20 travelers, 5 trips each.
        assert!(report.result.disconnects());
        assert!(matches!(report.result, ProbeResult::Measured { unreachable_trips: 100, .. }));
        assert!(summary.disconnecting() >= 1);
    }

    #[test]
    fn default_templates_need_every_category() {
        // The town has no leisure or restaurant places.
        let map = town();
        let mut model = ModelBuilder::new(&map).config(config()).build().unwrap();
        assert!(matches!(model.mean_travel_time(), Err(SimError::Trip(_))));
        assert!(model.sensitivity(&mut NoopObserver).is_err());
    }

    #[test]
    fn invalid_config_rejected_before_building() {
        let map = town();
        let cfg = SimConfig { time_span_weeks: 0.0, ..SimConfig::default() };
        assert!(matches!(ModelBuilder::new(&map).config(cfg).build(), Err(SimError::Config(_))));
    }
}
