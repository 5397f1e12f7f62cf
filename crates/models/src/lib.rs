//! The base actuator model and everything derived from it.
//!
//! An actuator family implements [`ActuatorModel`] by supplying a parameter
//! set and its linear dynamics in terms of parameter symbols. The trait then
//! derives the numeric state-space, its discretizations and transfer
//! functions. Families with nonlinear dynamics also implement
//! [`NonlinearActuatorModel`], which adds linearization about an
//! [`OperatingPoint`] and time-domain simulation ([`simulate`]).

mod error;
mod model;
mod nonlinear;

pub mod simulate;

#[cfg(test)]
mod fixtures;

pub use actuate_symbolic::OperatingPoint;
pub use error::ModelError;
pub use model::{ActuatorModel, Port};
pub use nonlinear::{InputKind, NonlinearActuatorModel};
