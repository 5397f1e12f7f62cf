use thiserror::Error;

/// Errors that may occur when building or transforming linear systems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LtiError {
    /// A system matrix has the wrong shape for the system's dimensions.
    #[error("matrix `{matrix}` has shape {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        matrix: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A system matrix contains NaN or an infinite entry.
    #[error("matrix `{matrix}` contains a non-finite entry")]
    NonFinite { matrix: &'static str },

    /// The sample time is zero, negative, or not finite.
    #[error("sample time must be finite and positive, got {0}")]
    InvalidSampleTime(f64),

    /// The generalized bilinear weight lies outside `[0, 1]`.
    #[error("generalized bilinear weight must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),

    /// An input or output index does not exist.
    #[error("{kind} index {index} is out of range, system has {len}")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// A matrix that must be inverted is singular.
    #[error("matrix `{0}` is singular")]
    Singular(&'static str),

    /// A signal vector does not match the system dimension.
    #[error("{signal} vector has length {actual}, expected {expected}")]
    SignalLength {
        signal: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A transfer function was given an all-zero denominator.
    #[error("transfer function denominator is identically zero")]
    ZeroDenominator,
}
