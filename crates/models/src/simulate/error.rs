use std::error::Error as StdError;

/// Errors that can occur during a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("initial state has {actual} entries but the model has {expected} states")]
    StateLength { expected: usize, actual: usize },

    #[error("input signal returned {actual} values at t = {time} but the model has {expected} inputs")]
    InputLength {
        expected: usize,
        actual: usize,
        time: f64,
    },

    /// The input signal returned NaN or an infinite value.
    #[error("input {input} is not finite at t = {time}")]
    NonFiniteInput { input: usize, time: f64 },

    /// The state or its derivative stopped being finite.
    #[error("simulation diverged at step {step}")]
    Diverged { step: usize },
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }
}
