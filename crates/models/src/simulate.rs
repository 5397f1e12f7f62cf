//! Fixed-step simulation of nonlinear actuator dynamics.
//!
//! The dynamics `ẋ = f(x, u)` are stepped with forward Euler or classical
//! fourth-order Runge-Kutta:
//!
//! ```text
//! k1 = f(x, u(t))
//! k2 = f(x + k1 dt/2, u(t + dt/2))
//! k3 = f(x + k2 dt/2, u(t + dt/2))
//! k4 = f(x + k3 dt, u(t + dt))
//! x_{n+1} = x_n + (k1 + 2 k2 + 2 k3 + k4) dt/6
//! ```
//!
//! # Example
//!
//! ```ignore
//! use actuate_models::simulate::{self, Config, Method};
//!
//! let config = Config::new(1e-3, 2000, Method::RungeKutta4)?.with_saturation(true);
//! let solution = simulate::solve_unobserved(&model, x0, |_t| DVector::from_element(1, 5.0), &config)?;
//!
//! for snapshot in &solution.history {
//!     println!("t={}: {}", snapshot.input.time, snapshot.output.output);
//! }
//! ```

mod action;
mod config;
mod error;
mod event;
mod plant;
mod solution;

pub use action::Action;
pub use config::{Config, ConfigError, Method};
pub use error::Error;
pub use event::Event;
pub use plant::{Evaluation, Sample};
pub use solution::{Solution, Status};

use actuate_core::{ActuatorParameters, Model, Observer, Snapshot, StepIntegrable};
use actuate_lti::DVector;
use actuate_symbolic::SymbolicError;
use tracing::{debug, warn};

use crate::{InputKind, NonlinearActuatorModel};

use plant::{Plant, State};

/// Simulates a nonlinear actuator model from `initial_state`.
///
/// The model's parameters are bound once up front. At every sample the
/// `input` closure is called with the current time; when
/// [`Config::saturate_inputs`] is set, each input is clamped to the limit of
/// its [`InputKind`].
///
/// # Observer
///
/// The observer receives an [`Event`] for the initial state (step 0) and
/// after each integration step, and may return [`Action::StopEarly`] to end
/// the simulation.
///
/// # Errors
///
/// Returns [`Error::StateLength`] or [`Error::InputLength`] on a dimension
/// mismatch, [`Error::NonFiniteInput`] if the input closure returns NaN or an
/// infinity, [`Error::Diverged`] if the state stops being finite, and
/// [`Error::Model`] if the dynamics cannot be bound or evaluated.
pub fn solve<M, U, Obs>(
    model: &M,
    initial_state: DVector<f64>,
    input: U,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: NonlinearActuatorModel + ?Sized,
    U: Fn(f64) -> DVector<f64>,
    Obs: Observer<Event, Action>,
{
    let plant = Plant::new(model.bound_dynamics().map_err(Error::model)?);
    let kinds = model.input_kinds().map_err(Error::model)?;

    if initial_state.len() != plant.n_states() {
        return Err(Error::StateLength {
            expected: plant.n_states(),
            actual: initial_state.len(),
        });
    }

    let mut signal = InputSignal {
        source: input,
        kinds,
        params: model.parameters(),
        n_inputs: plant.n_inputs(),
        saturate: config.saturate_inputs(),
        warned: vec![false; plant.n_inputs()],
    };

    debug!(
        actuator = model.parameters().name(),
        dt = config.dt(),
        steps = config.steps(),
        method = ?config.method(),
        "starting simulation"
    );

    let initial = evaluate(&plant, &mut signal, 0.0, State(initial_state), 0)?;

    let mut history = Vec::with_capacity(config.steps() + 1);
    history.push(initial.clone());

    if let Some(Action::StopEarly) = observer.observe(&event(0, &initial)) {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            history,
            steps: 0,
        });
    }

    let dt = config.dt();
    let mut current = initial;

    for step in 1..=config.steps() {
        let time = current.input.time;
        let state = State(current.input.state.clone());
        let k1 = current.output.derivative.clone();

        let increment = match config.method() {
            Method::ForwardEuler => k1,
            Method::RungeKutta4 => {
                let half = time + dt / 2.0;
                let mut at =
                    |time: f64, state: State| derivative(&plant, &mut signal, time, state, step);

                let k2 = at(half, state.step(k1.clone(), dt / 2.0))?;
                let k3 = at(half, state.step(k2.clone(), dt / 2.0))?;
                let k4 = at(time + dt, state.step(k3.clone(), dt))?;
                (k1 + (k2 + k3) * 2.0 + k4) / 6.0
            }
        };

        let next_state = state.step(increment, dt);
        let next = evaluate(&plant, &mut signal, step as f64 * dt, next_state, step)?;

        history.push(next.clone());

        if let Some(Action::StopEarly) = observer.observe(&event(step, &next)) {
            debug!(step, "simulation stopped by observer");
            return Ok(Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            });
        }

        current = next;
    }

    Ok(Solution {
        status: Status::Complete,
        history,
        steps: config.steps(),
    })
}

/// Simulates a nonlinear actuator model without observation.
///
/// This is a convenience wrapper around [`solve`] that discards events.
///
/// # Errors
///
/// As for [`solve`].
pub fn solve_unobserved<M, U>(
    model: &M,
    initial_state: DVector<f64>,
    input: U,
    config: &Config,
) -> Result<Solution, Error>
where
    M: NonlinearActuatorModel + ?Sized,
    U: Fn(f64) -> DVector<f64>,
{
    solve(model, initial_state, input, config, ())
}

/// The user's input closure, checked and optionally saturated.
struct InputSignal<'a, U> {
    source: U,
    kinds: Vec<InputKind>,
    params: &'a ActuatorParameters,
    n_inputs: usize,
    saturate: bool,
    warned: Vec<bool>,
}

impl<U: Fn(f64) -> DVector<f64>> InputSignal<'_, U> {
    fn at(&mut self, time: f64) -> Result<DVector<f64>, Error> {
        let mut u = (self.source)(time);
        if u.len() != self.n_inputs {
            return Err(Error::InputLength {
                expected: self.n_inputs,
                actual: u.len(),
                time,
            });
        }

        if let Some(input) = u.iter().position(|value| !value.is_finite()) {
            return Err(Error::NonFiniteInput { input, time });
        }

        if self.saturate {
            for (i, value) in u.iter_mut().enumerate() {
                let kind = self.kinds.get(i).copied().unwrap_or_default();
                let clamped = kind.saturate(*value, self.params);
                if clamped != *value && !self.warned[i] {
                    self.warned[i] = true;
                    warn!(input = i, ?kind, requested = *value, time, "input saturated");
                }
                *value = clamped;
            }
        }

        Ok(u)
    }
}

/// Evaluates the plant at a new sample, treating overflow as divergence.
fn evaluate<U: Fn(f64) -> DVector<f64>>(
    plant: &Plant,
    signal: &mut InputSignal<'_, U>,
    time: f64,
    state: State,
    step: usize,
) -> Result<Snapshot<Sample, Evaluation>, Error> {
    if !state.is_finite() {
        return Err(diverged(step));
    }

    let sample = Sample {
        time,
        state: state.0,
        input: signal.at(time)?,
    };
    let evaluation = plant.call(&sample).map_err(|err| model_error(err, step))?;
    Ok(Snapshot::new(sample, evaluation))
}

fn derivative<U: Fn(f64) -> DVector<f64>>(
    plant: &Plant,
    signal: &mut InputSignal<'_, U>,
    time: f64,
    state: State,
    step: usize,
) -> Result<DVector<f64>, Error> {
    Ok(evaluate(plant, signal, time, state, step)?.output.derivative)
}

fn model_error(err: SymbolicError, step: usize) -> Error {
    if *err.root_cause() == SymbolicError::NonFinite {
        diverged(step)
    } else {
        Error::model(err)
    }
}

fn diverged(step: usize) -> Error {
    warn!(step, "simulation diverged");
    Error::Diverged { step }
}

fn event(step: usize, snapshot: &Snapshot<Sample, Evaluation>) -> Event {
    Event {
        step,
        time: snapshot.input.time,
        state: snapshot.input.state.clone(),
        input: snapshot.input.input.clone(),
        output: snapshot.output.output.clone(),
    }
}
