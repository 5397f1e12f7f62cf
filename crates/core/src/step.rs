/// A state that can be advanced by its derivative over a step.
///
/// Explicit integrators step a state via `state + derivative * delta`, where
/// the derivative is taken with respect to `Delta`. `Delta` is usually time,
/// either as a plain `f64` in seconds or as a `uom::si::f64::Time`.
pub trait StepIntegrable<Delta> {
    /// The derivative of the state with respect to `Delta`.
    type Derivative;

    /// Returns the state after stepping with a derivative and step size.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// Shorthand for the derivative type of a [`StepIntegrable`] state.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;
