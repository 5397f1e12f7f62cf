use actuate_core::Snapshot;
use actuate_lti::DVector;

use super::{Evaluation, Sample};

/// Indicates how the simulation terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all requested steps.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a simulation.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the simulation terminated.
    pub status: Status,

    /// Samples from each step, including the initial state.
    pub history: Vec<Snapshot<Sample, Evaluation>>,

    /// Number of integration steps completed.
    pub steps: usize,
}

impl Solution {
    /// Returns the sample times.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.input.time).collect()
    }

    /// Returns the last simulated state.
    #[must_use]
    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.history.last().map(|s| &s.input.state)
    }

    /// Returns one state as a series over the history.
    ///
    /// # Panics
    ///
    /// Panics if `state` is not a valid state index.
    #[must_use]
    pub fn state_series(&self, state: usize) -> Vec<f64> {
        self.history.iter().map(|s| s.input.state[state]).collect()
    }

    /// Returns one output as a series over the history.
    ///
    /// # Panics
    ///
    /// Panics if `output` is not a valid output index.
    #[must_use]
    pub fn output_series(&self, output: usize) -> Vec<f64> {
        self.history.iter().map(|s| s.output.output[output]).collect()
    }
}
