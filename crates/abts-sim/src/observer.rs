//! Sweep observer trait for progress reporting and report collection.

use std::ops::ControlFlow;

use log::info;

use crate::{EdgeReport, ProbeResult, SweepSummary};

/// Callbacks invoked by
/// [`SensitivityAnalyzer::analyze`](crate::SensitivityAnalyzer::analyze).
///
/// All methods have default implementations so implementors only need to
/// override what they care about.
///
/// # Example: stop after the first big hit
///
/// ```rust,ignore
/// struct StopOnHit(f64);
///
/// impl SweepObserver for StopOnHit {
///     fn on_edge(&mut self, _index: usize, report: &EdgeReport) -> ControlFlow<()> {
///         match report.percent_change() {
///             Some(p) if p > self.0 => ControlFlow::Break(()),
///             _ => ControlFlow::Continue(()),
///         }
///     }
/// }
/// ```
pub trait SweepObserver {
    /// Called once, after the edge list is snapshotted.
    fn on_sweep_start(&mut self, _edges: usize, _baseline: f64) {}

    /// Called after each edge has been probed and restored.
    ///
    /// `index` is the edge's position in the snapshot.  Returning
    /// [`ControlFlow::Break`] ends the sweep before the next edge.
    fn on_edge(&mut self, _index: usize, _report: &EdgeReport) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called once when the sweep finishes or is cancelled.
    fn on_sweep_end(&mut self, _summary: &SweepSummary) {}
}

/// A [`SweepObserver`] that does nothing.
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

/// Logs every report at info level, in the one-line-per-edge form of a
/// console sensitivity report.
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn on_sweep_start(&mut self, edges: usize, baseline: f64) {
        info!("Sensitivity sweep over {edges} edges, baseline {baseline:.4} h/week");
    }

    fn on_edge(&mut self, index: usize, report: &EdgeReport) -> ControlFlow<()> {
        let (from, to) = &report.endpoints;
        match report.result {
            ProbeResult::Measured { unreachable_trips, .. } if unreachable_trips > 0 => info!(
                "[{index}] removing {} from {from} to {to} disconnects {unreachable_trips} trips",
                report.name,
            ),
            ProbeResult::Measured { percent_change, .. } => info!(
                "[{index}] {:+.2}% removing {} from {from} to {to}",
                percent_change * 100.0,
                report.name,
            ),
            ProbeResult::Unreachable { from: a, to: b } => info!(
                "[{index}] removing {} from {from} to {to} disconnects {a} from {b}",
                report.name,
            ),
        }
        ControlFlow::Continue(())
    }

    fn on_sweep_end(&mut self, summary: &SweepSummary) {
        info!(
            "Sweep done: {} of {} edges probed, {} disconnecting{}",
            summary.reports.len(),
            summary.edges_total,
            summary.disconnecting(),
            if summary.cancelled { " (cancelled)" } else { "" },
        );
    }
}
