use thiserror::Error;

/// Result alias for `typology`.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category, used by callers that only care about who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed data: empty, mis-shaped, negative or non-finite.
    InvalidInput,
    /// Caller configuration outside its valid range.
    InvalidParameter,
    /// A sample whose row sums to zero could not be normalized.
    DegenerateRow,
    /// A requested cut of the merge tree is out of range.
    InvalidThreshold,
}

/// Errors returned by factorization, scaling and clustering primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Row length or column count mismatch.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    #[error("shape mismatch: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// A matrix that must be non-negative has a negative entry.
    #[error("negative entry {value} at ({row}, {col})")]
    NegativeEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },

    /// A matrix entry is NaN or infinite.
    #[error("non-finite entry {value} at ({row}, {col})")]
    NonFiniteEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },

    /// A quantity derived from finite input overflowed `f64`.
    #[error("numeric overflow computing {what}")]
    Overflow {
        /// What was being computed.
        what: String,
    },

    /// A row or column label occurs more than once.
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Row normalization hit a row that sums to zero.
    #[error("row {row} sums to zero and has no proportions")]
    DegenerateRow {
        /// Row index.
        row: usize,
    },

    /// Invalid number of clusters requested from a merge tree.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Distance threshold is NaN or negative.
    #[error("invalid distance threshold {0}")]
    InvalidThreshold(f64),
}

impl Error {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput
            | Error::DimensionMismatch { .. }
            | Error::ShapeMismatch { .. }
            | Error::NegativeEntry { .. }
            | Error::NonFiniteEntry { .. }
            | Error::Overflow { .. }
            | Error::DuplicateLabel(_) => ErrorKind::InvalidInput,
            Error::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Error::DegenerateRow { .. } => ErrorKind::DegenerateRow,
            Error::InvalidClusterCount { .. } | Error::InvalidThreshold(_) => {
                ErrorKind::InvalidThreshold
            }
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
