use actuate_core::{Model, StepIntegrable};
use actuate_lti::DVector;
use actuate_symbolic::{Substitution, SymbolicDynamics, SymbolicError};

/// The point at which the dynamics are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub state: DVector<f64>,
    pub input: DVector<f64>,
}

/// The dynamics evaluated at a [`Sample`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub derivative: DVector<f64>,
    pub output: DVector<f64>,
}

/// Dynamics with every parameter bound, callable as a [`Model`].
pub(super) struct Plant {
    dynamics: SymbolicDynamics,
    empty: Substitution,
}

impl Plant {
    pub(super) fn new(dynamics: SymbolicDynamics) -> Self {
        Self {
            dynamics,
            empty: Substitution::new(),
        }
    }

    pub(super) fn n_states(&self) -> usize {
        self.dynamics.n_states()
    }

    pub(super) fn n_inputs(&self) -> usize {
        self.dynamics.n_inputs()
    }
}

impl Model for Plant {
    type Input = Sample;
    type Output = Evaluation;
    type Error = SymbolicError;

    fn call(&self, sample: &Sample) -> Result<Evaluation, SymbolicError> {
        let (derivative, output) =
            self.dynamics
                .evaluate_rhs(&sample.state, &sample.input, &self.empty)?;
        Ok(Evaluation { derivative, output })
    }
}

/// A state vector advanced by explicit steps.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct State(pub(super) DVector<f64>);

impl StepIntegrable<f64> for State {
    type Derivative = DVector<f64>;

    fn step(&self, derivative: DVector<f64>, dt: f64) -> Self {
        State(&self.0 + derivative * dt)
    }
}

impl State {
    pub(super) fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }
}
