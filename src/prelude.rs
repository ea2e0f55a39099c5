//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use sabor::prelude::*;
//! ```

pub use crate::association::{AssociationScorer, CorpusFrequencies};
pub use crate::divergence::{jensen_shannon, kl_divergence, KlDivergence};
pub use crate::error::{Result, SaborError};
pub use crate::evaluate::{EvaluationHarness, EvaluationSummary, SubjectPerformance};
pub use crate::predict::RatingPredictor;
pub use crate::profile::{
    BusinessProfile, CustomerProfile, EvaluationSubject, ReviewRecord, TopicDistribution,
    TrainingData,
};
