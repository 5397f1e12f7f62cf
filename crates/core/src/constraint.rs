//! Numeric constraints checked once at construction.
//!
//! Physical parameters are only meaningful inside a domain: an inertia must be
//! strictly positive, a damping coefficient must not be negative. The
//! [`Constrained<T, C>`] wrapper records that a value passed such a check so
//! that downstream code can rely on it without re-validating.
//!
//! Two markers are provided:
//!
//! - [`NonNegative`]: zero or greater, and finite
//! - [`StrictlyPositive`]: greater than zero, and finite

use std::marker::PhantomData;

use thiserror::Error;

/// A check applied to a value before it is wrapped in [`Constrained`].
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value must be finite")]
    Infinite,
}

/// Marker for values that are zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonNegative;

/// Marker for values that are greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictlyPositive;

fn check_finite(value: f64) -> Result<(), ConstraintError> {
    if value.is_nan() {
        Err(ConstraintError::NotANumber)
    } else if value.is_infinite() {
        Err(ConstraintError::Infinite)
    } else {
        Ok(())
    }
}

impl Constraint<f64> for NonNegative {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        check_finite(*value)?;
        if *value < 0.0 {
            return Err(ConstraintError::Negative);
        }
        Ok(())
    }
}

impl Constraint<f64> for StrictlyPositive {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        NonNegative::check(value)?;
        if *value == 0.0 {
            return Err(ConstraintError::Zero);
        }
        Ok(())
    }
}

impl NonNegative {
    /// Wraps `value` if it is finite and not negative.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] describing the violation.
    pub fn new(value: f64) -> Result<Constrained<f64, NonNegative>, ConstraintError> {
        Constrained::new(value)
    }
}

impl StrictlyPositive {
    /// Wraps `value` if it is finite and greater than zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] describing the violation.
    pub fn new(value: f64) -> Result<Constrained<f64, StrictlyPositive>, ConstraintError> {
        Constrained::new(value)
    }
}

/// A value that has passed the constraint `C`.
///
/// # Example
///
/// ```
/// use actuate_core::constraint::{Constrained, StrictlyPositive};
///
/// let inertia = Constrained::<f64, StrictlyPositive>::new(2.5e-5).unwrap();
/// assert_eq!(inertia.into_inner(), 2.5e-5);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
