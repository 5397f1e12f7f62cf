//! Parameter sets and core traits for compliant actuator models.
//!
//! This crate holds what every other part of the workspace builds on:
//!
//! - [`ActuatorParameters`]: a validated description of one physical actuator
//! - [`constraint`]: numeric domain checks used during validation
//! - [`units`]: `uom` aliases for torsional stiffness, damping and friends
//! - [`presets`]: representative parameter sets
//! - [`Model`], [`Observer`], [`StepIntegrable`]: the traits simulators use

mod model;
mod observer;
mod step;

pub mod constraint;
pub mod parameters;
pub mod presets;
pub mod units;

pub use observer::Observer;
pub use parameters::{
    ActuatorParameters, Electrical, Limits, Mechanical, ParameterError, SymbolTable, Thermal,
};
pub use step::{DerivativeOf, StepIntegrable};
pub use {model::Model, model::Snapshot};
