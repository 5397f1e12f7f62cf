use actuate_lti::DVector;

/// Event emitted by the simulator for each sample.
///
/// Step 0 is the initial state before any integration.
/// Steps 1..N are emitted after each integration step.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The step number (0 for initial, 1..N for integration steps).
    pub step: usize,

    /// Simulation time in seconds.
    pub time: f64,

    pub state: DVector<f64>,

    /// The input applied at this sample, after saturation.
    pub input: DVector<f64>,

    pub output: DVector<f64>,
}
