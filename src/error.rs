//! Error types for sabor operations.
//!
//! Provides rich error context for library consumers. Data-integrity
//! failures carry the offending customer, business, or word identifier so
//! a batch run can be traced back to the corrupt input record.

use std::fmt;

/// Main error type for sabor operations.
///
/// Distinguishes recoverable per-instance prediction failures
/// ([`SaborError::ZeroWeightMass`]) from fatal data-integrity errors
/// ([`SaborError::UndefinedDivergence`], [`SaborError::MissingReviewRecord`])
/// that must abort an evaluation run.
///
/// # Examples
///
/// ```
/// use sabor::error::SaborError;
///
/// let err = SaborError::ZeroWeightMass {
///     customer: "u1".to_string(),
///     business: "b1".to_string(),
/// };
/// assert!(err.to_string().contains("u1"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SaborError {
    /// KL divergence is undefined: the second distribution has a zero
    /// component where the first is positive. When this surfaces from a
    /// Jensen-Shannon computation it means the mixture invariant was
    /// violated by malformed upstream distributions.
    UndefinedDivergence {
        /// Component index where the divergence broke down
        index: usize,
        /// Value of the first distribution at that index
        left: f64,
        /// Value of the second distribution at that index
        right: f64,
    },

    /// All similarity weights collapsed to zero during normalization.
    /// Recoverable at the granularity of a single (customer, business)
    /// prediction; the evaluation harness records the instance as
    /// unscoreable instead of aborting.
    ZeroWeightMass {
        /// Target customer identifier
        customer: String,
        /// Business identifier
        business: String,
    },

    /// A listed reviewer of a business has no rating row for it in the
    /// training data. Indicates corrupted collaborator input.
    MissingReviewRecord {
        /// Reviewer identifier
        customer: String,
        /// Business identifier
        business: String,
    },

    /// The log-odds association formula hit a zero numerator or
    /// denominator for this word.
    DegenerateAssociation {
        /// Offending vocabulary word
        word: String,
    },

    /// No customer profile exists for this identifier.
    UnknownCustomer {
        /// Customer identifier
        id: String,
    },

    /// No business profile exists for this identifier.
    UnknownBusiness {
        /// Business identifier
        id: String,
    },

    /// Sequence lengths disagree (topic distributions, vocabulary rows,
    /// parallel rating arrays).
    DimensionMismatch {
        /// Expected length description
        expected: String,
        /// Actual length found
        actual: String,
    },

    /// An evaluation run scored zero instances across all subjects.
    EmptyEvaluation,

    /// A topic distribution failed validation at construction.
    InvalidDistribution {
        /// Why the distribution was rejected
        reason: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SaborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaborError::UndefinedDivergence { index, left, right } => {
                write!(
                    f,
                    "KL divergence undefined at component {index}: P = {left}, Q = {right}"
                )
            }
            SaborError::ZeroWeightMass { customer, business } => {
                write!(
                    f,
                    "similarity weights sum to zero for customer {customer} at business {business}"
                )
            }
            SaborError::MissingReviewRecord { customer, business } => {
                write!(
                    f,
                    "no training rating by customer {customer} for business {business}, \
                     but the customer is a listed reviewer"
                )
            }
            SaborError::DegenerateAssociation { word } => {
                write!(f, "degenerate log-odds input for word {word:?}")
            }
            SaborError::UnknownCustomer { id } => {
                write!(f, "no customer profile for id {id}")
            }
            SaborError::UnknownBusiness { id } => {
                write!(f, "no business profile for id {id}")
            }
            SaborError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            SaborError::EmptyEvaluation => {
                write!(f, "evaluation scored zero instances across all subjects")
            }
            SaborError::InvalidDistribution { reason } => {
                write!(f, "invalid topic distribution: {reason}")
            }
            SaborError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SaborError {}

impl From<&str> for SaborError {
    fn from(msg: &str) -> Self {
        SaborError::Other(msg.to_string())
    }
}

impl From<String> for SaborError {
    fn from(msg: String) -> Self {
        SaborError::Other(msg)
    }
}

impl SaborError {
    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// True for errors that abort an evaluation run; false for
    /// per-instance failures the harness may skip.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SaborError::ZeroWeightMass { .. })
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SaborError>;
