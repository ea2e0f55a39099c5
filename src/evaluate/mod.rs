//! Held-out evaluation of the similarity-weighted predictor.
//!
//! Scores each evaluation subject on every test-window business that also
//! occurs in the training window, accumulating absolute error for the
//! model prediction and for the naive baseline (the business's
//! training-window average rating). Aggregates to mean absolute error so
//! callers can compare the two and sweep the power exponent.
//!
//! Subjects are independent, so with the `parallel` feature the per-subject
//! loop fans out across a rayon pool; results combine by commutative sum.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, SaborError};
use crate::predict::RatingPredictor;
use crate::profile::{EvaluationSubject, TrainingData};

/// Error accumulators for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubjectPerformance {
    /// Total absolute error of the model prediction
    pub abs_error_model: f64,
    /// Total absolute error of the average-rating baseline
    pub abs_error_baseline: f64,
    /// Number of scored (subject, business) instances
    pub instances: usize,
    /// Instances skipped because the weight mass collapsed to zero
    pub unscoreable: usize,
}

impl SubjectPerformance {
    fn merge(mut self, other: SubjectPerformance) -> SubjectPerformance {
        self.abs_error_model += other.abs_error_model;
        self.abs_error_baseline += other.abs_error_baseline;
        self.instances += other.instances;
        self.unscoreable += other.unscoreable;
        self
    }
}

/// Aggregate evaluation result across all subjects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationSummary {
    /// Mean absolute error of the similarity-weighted prediction
    pub mae_model: f64,
    /// Mean absolute error of the average-rating baseline
    pub mae_baseline: f64,
    /// Total scored instances across subjects
    pub instances: usize,
    /// Total unscoreable instances (zero weight mass)
    pub unscoreable: usize,
}

impl EvaluationSummary {
    /// True when the model beats the baseline on this run.
    #[must_use]
    pub fn model_wins(&self) -> bool {
        self.mae_model < self.mae_baseline
    }
}

/// Batch evaluation of the predictor against held-out subjects.
///
/// # Examples
///
/// ```
/// use sabor::evaluate::EvaluationHarness;
/// use sabor::profile::{
///     BusinessProfile, CustomerProfile, EvaluationSubject, ReviewRecord,
///     TopicDistribution, TrainingData,
/// };
///
/// let customers = vec![
///     CustomerProfile {
///         id: "u1".into(),
///         review_count: 1,
///         review_ids: vec!["r1".into()],
///         businesses: vec!["b1".into()],
///         dist: TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap(),
///     },
///     CustomerProfile {
///         id: "pig".into(),
///         review_count: 16,
///         review_ids: vec![],
///         businesses: vec![],
///         dist: TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap(),
///     },
/// ];
/// let businesses = vec![BusinessProfile {
///     id: "b1".into(),
///     customer_ids: vec!["u1".into()],
///     review_count: 1,
///     review_ids: vec!["r1".into()],
///     rating: 4.0,
/// }];
/// let reviews = vec![ReviewRecord {
///     review_id: "r1".into(),
///     user_id: "u1".into(),
///     business_id: "b1".into(),
///     stars: 4.0,
/// }];
/// let data = TrainingData::new(customers, businesses, &reviews).unwrap();
///
/// let subjects = vec![EvaluationSubject {
///     id: "pig".into(),
///     training_reviews: 16,
///     test_reviews: 1,
///     test_businesses: vec!["b1".into()],
///     test_ratings: vec![5.0],
/// }];
///
/// let harness = EvaluationHarness::new(&data, &subjects);
/// let summary = harness.evaluate(1.0).unwrap();
/// assert_eq!(summary.instances, 1);
/// assert!((summary.mae_model - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EvaluationHarness<'a> {
    data: &'a TrainingData,
    subjects: &'a [EvaluationSubject],
}

impl<'a> EvaluationHarness<'a> {
    /// Create a harness over indexed training data and held-out subjects.
    #[must_use]
    pub fn new(data: &'a TrainingData, subjects: &'a [EvaluationSubject]) -> Self {
        Self { data, subjects }
    }

    /// Score one subject with the given power exponent.
    ///
    /// Test businesses absent from the training window are skipped: no
    /// prediction, no error term, no instance. A [`SaborError::ZeroWeightMass`]
    /// prediction failure marks the instance unscoreable and the scan
    /// continues; every other error aborts.
    ///
    /// # Errors
    ///
    /// Parallel-array length mismatch in the subject record, or any fatal
    /// error from the predictor.
    pub fn subject_performance(
        &self,
        subject: &EvaluationSubject,
        power: f64,
    ) -> Result<SubjectPerformance> {
        if subject.test_businesses.len() != subject.test_ratings.len() {
            return Err(SaborError::dimension_mismatch(
                "test_businesses",
                subject.test_businesses.len(),
                subject.test_ratings.len(),
            ));
        }

        let predictor = RatingPredictor::new(self.data);
        let mut perf = SubjectPerformance::default();

        for (business_id, &truth) in subject.test_businesses.iter().zip(&subject.test_ratings) {
            let Some(business) = self.data.business(business_id) else {
                continue; // unseen in training
            };

            match predictor.predict(&subject.id, business_id, power) {
                Ok(prediction) => {
                    perf.abs_error_model += (truth - prediction).abs();
                    perf.abs_error_baseline += (truth - business.rating).abs();
                    perf.instances += 1;
                }
                Err(SaborError::ZeroWeightMass { .. }) => {
                    perf.unscoreable += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(perf)
    }

    /// Evaluate every subject and aggregate to mean absolute error.
    ///
    /// # Errors
    ///
    /// Any fatal per-subject error, or [`SaborError::EmptyEvaluation`]
    /// when the total scored instance count is zero.
    pub fn evaluate(&self, power: f64) -> Result<EvaluationSummary> {
        #[cfg(feature = "parallel")]
        let merged = self
            .subjects
            .par_iter()
            .map(|s| self.subject_performance(s, power))
            .try_reduce(SubjectPerformance::default, |a, b| Ok(a.merge(b)))?;

        #[cfg(not(feature = "parallel"))]
        let merged = {
            let mut acc = SubjectPerformance::default();
            for s in self.subjects {
                acc = acc.merge(self.subject_performance(s, power)?);
            }
            acc
        };

        if merged.instances == 0 {
            return Err(SaborError::EmptyEvaluation);
        }

        let n = merged.instances as f64;
        Ok(EvaluationSummary {
            mae_model: merged.abs_error_model / n,
            mae_baseline: merged.abs_error_baseline / n,
            instances: merged.instances,
            unscoreable: merged.unscoreable,
        })
    }

    /// Evaluate across a range of power exponents, pairing each with its
    /// summary so callers can pick the best-performing value.
    ///
    /// # Errors
    ///
    /// Propagates the first failing evaluation.
    pub fn sweep_power(&self, powers: &[f64]) -> Result<Vec<(f64, EvaluationSummary)>> {
        powers
            .iter()
            .map(|&p| self.evaluate(p).map(|summary| (p, summary)))
            .collect()
    }
}
