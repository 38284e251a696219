//! Simulation configuration.

use crate::{SimError, SimResult};

/// What a simulation run does with a trip whose stops cannot be connected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnreachablePolicy {
    /// The trip contributes no time and is counted in
    /// [`SimOutcome::trips_unreachable`](crate::SimOutcome::trips_unreachable).
    /// Its traveler still counts towards the mean.
    #[default]
    ExcludeTrip,
    /// Abort the run with [`SimError::Unreachable`].
    Fail,
}

/// Parameters shared by the simulator, the sensitivity sweep and
/// [`ModelBuilder`](crate::ModelBuilder).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated horizon in weeks.  Must be positive.
    pub time_span_weeks: f64,

    /// Root seed.  Traveler generation and every simulator run derive from it.
    pub seed: u64,

    /// Number of travelers generated by the model builder.
    pub traveler_count: usize,

    pub policy: UnreachablePolicy,

    /// Skip residential edges in the sensitivity sweep.
    pub exclude_residential: bool,

    /// Sweep workers.  Values above 1 only take effect with the `parallel`
    /// feature.
    pub workers: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_span_weeks:     5.0,
            seed:                42,
            traveler_count:      100,
            policy:              UnreachablePolicy::ExcludeTrip,
            exclude_residential: false,
            workers:             1,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.time_span_weeks.is_finite() && self.time_span_weeks > 0.0) {
            return Err(SimError::Config(format!(
                "time span must be a positive number of weeks, got {}",
                self.time_span_weeks
            )));
        }
        if self.workers == 0 {
            return Err(SimError::Config("worker count must be at least 1".into()));
        }
        Ok(())
    }
}
