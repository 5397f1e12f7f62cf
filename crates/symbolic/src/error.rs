use actuate_lti::LtiError;
use thiserror::Error;

/// Errors that may occur when building or evaluating symbolic forms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    /// A symbol has no value in the bindings used for evaluation.
    #[error("symbol `{0}` is not bound to a value")]
    UnboundSymbol(String),

    /// A quotient's denominator evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Evaluation produced NaN or an infinite value.
    #[error("expression evaluated to a non-finite value")]
    NonFinite,

    /// Rows passed to a matrix constructor have different lengths.
    #[error("row {row} has {actual} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A matrix entry index lies outside the matrix.
    #[error("entry ({row}, {col}) is outside a {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A state-space matrix has the wrong shape.
    #[error("matrix `{matrix}` has shape {actual:?}, expected {expected:?}")]
    DimensionMismatch {
        matrix: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The number of names does not match a system dimension.
    #[error("expected {expected} {kind} names, got {actual}")]
    NameCount {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A state, input or output name appears twice.
    #[error("name `{0}` is used more than once")]
    DuplicateName(String),

    /// A numeric state or input vector has the wrong length.
    #[error("{kind} vector has length {actual}, expected {expected}")]
    PointLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Evaluating one entry of a named matrix failed.
    #[error("failed to evaluate entry ({row}, {col}) of `{matrix}`")]
    Entry {
        matrix: &'static str,
        row: usize,
        col: usize,
        #[source]
        source: Box<SymbolicError>,
    },

    /// The evaluated matrices do not form a valid linear system.
    #[error(transparent)]
    Lti(#[from] LtiError),
}

impl SymbolicError {
    /// Returns the innermost error, looking through [`SymbolicError::Entry`].
    #[must_use]
    pub fn root_cause(&self) -> &SymbolicError {
        match self {
            Self::Entry { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
