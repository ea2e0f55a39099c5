//! Similarity-weighted rating prediction.
//!
//! Predicts the rating a customer would give a business by reweighting
//! the observed ratings of everyone who reviewed that business. Reviewers
//! whose topic preferences sit closer to the target customer (in
//! Jensen-Shannon distance) contribute more; the sharpness of the
//! reweighting is controlled by a power exponent.
//!
//! # Quick Start
//!
//! ```
//! use sabor::predict::RatingPredictor;
//! use sabor::profile::{
//!     BusinessProfile, CustomerProfile, ReviewRecord, TopicDistribution, TrainingData,
//! };
//!
//! let customers = vec![
//!     CustomerProfile {
//!         id: "u1".into(),
//!         review_count: 1,
//!         review_ids: vec!["r1".into()],
//!         businesses: vec!["b1".into()],
//!         dist: TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap(),
//!     },
//!     CustomerProfile {
//!         id: "u2".into(),
//!         review_count: 0,
//!         review_ids: vec![],
//!         businesses: vec![],
//!         dist: TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap(),
//!     },
//! ];
//! let businesses = vec![BusinessProfile {
//!     id: "b1".into(),
//!     customer_ids: vec!["u1".into()],
//!     review_count: 1,
//!     review_ids: vec!["r1".into()],
//!     rating: 4.0,
//! }];
//! let reviews = vec![ReviewRecord {
//!     review_id: "r1".into(),
//!     user_id: "u1".into(),
//!     business_id: "b1".into(),
//!     stars: 4.0,
//! }];
//! let data = TrainingData::new(customers, businesses, &reviews).unwrap();
//!
//! let predictor = RatingPredictor::new(&data);
//! let rating = predictor.predict("u2", "b1", 1.0).unwrap();
//! assert!((rating - 4.0).abs() < 1e-12);
//! ```

use crate::divergence::jensen_shannon;
use crate::error::{Result, SaborError};
use crate::profile::{BusinessProfile, TrainingData};

/// Default power exponent for similarity reweighting.
pub const DEFAULT_POWER: f64 = 1.0;

/// Predicts ratings from similarity-weighted reviewer history.
///
/// Borrows the training data read-only; every prediction is a pure
/// function of the inputs, so a predictor can be shared freely across
/// threads.
#[derive(Debug, Clone, Copy)]
pub struct RatingPredictor<'a> {
    data: &'a TrainingData,
}

impl<'a> RatingPredictor<'a> {
    /// Create a predictor over indexed training data.
    #[must_use]
    pub fn new(data: &'a TrainingData) -> Self {
        Self { data }
    }

    /// Normalized similarity weights for the reviewers of `business`,
    /// from the perspective of `customer_id`, in the order of the
    /// business profile's `customer_ids`.
    ///
    /// Each raw weight is `(1 - JS(u, x))^power`. The target customer is
    /// *not* excluded when they appear among the reviewers; with
    /// JS(u, u) = 0 they receive the maximal raw weight. This mirrors the
    /// behavior the evaluation numbers were produced with.
    ///
    /// # Errors
    ///
    /// [`SaborError::UnknownCustomer`] for missing profiles,
    /// [`SaborError::ZeroWeightMass`] when every reviewer is at maximal
    /// divergence and the weights cannot be normalized.
    pub fn similarity_weights(
        &self,
        customer_id: &str,
        business: &BusinessProfile,
        power: f64,
    ) -> Result<Vec<f64>> {
        let target = self
            .data
            .customer(customer_id)
            .ok_or_else(|| SaborError::UnknownCustomer {
                id: customer_id.to_string(),
            })?;

        let mut weights = Vec::with_capacity(business.customer_ids.len());
        for reviewer_id in &business.customer_ids {
            let reviewer =
                self.data
                    .customer(reviewer_id)
                    .ok_or_else(|| SaborError::UnknownCustomer {
                        id: reviewer_id.clone(),
                    })?;
            let js = jensen_shannon(target.dist.as_slice(), reviewer.dist.as_slice())?;
            weights.push((1.0 - js).powf(power));
        }

        let mass: f64 = weights.iter().sum();
        if mass == 0.0 {
            return Err(SaborError::ZeroWeightMass {
                customer: customer_id.to_string(),
                business: business.id.clone(),
            });
        }
        for w in &mut weights {
            *w /= mass;
        }
        Ok(weights)
    }

    /// Mean training-window rating `customer_id` gave `business_id`.
    ///
    /// # Errors
    ///
    /// [`SaborError::MissingReviewRecord`] when no rating row exists.
    /// Callers reaching this through a business profile's reviewer list
    /// should never see that error; it marks corrupt collaborator input.
    pub fn mean_rating(&self, customer_id: &str, business_id: &str) -> Result<f64> {
        let stars = self.data.ratings(customer_id, business_id).ok_or_else(|| {
            SaborError::MissingReviewRecord {
                customer: customer_id.to_string(),
                business: business_id.to_string(),
            }
        })?;
        Ok(stars.iter().sum::<f64>() / stars.len() as f64)
    }

    /// Predicted rating of `business_id` by `customer_id`.
    ///
    /// The weighted sum of each reviewer's mean rating for the business,
    /// weighted by normalized topic-preference similarity. The output is
    /// a continuous estimate; it is not rounded to the discrete 1-5
    /// platform scale.
    ///
    /// # Errors
    ///
    /// [`SaborError::UnknownBusiness`] / [`SaborError::UnknownCustomer`]
    /// for missing profiles, [`SaborError::ZeroWeightMass`] for a
    /// degenerate weight normalization, and the fatal data-integrity
    /// errors propagated from the divergence and rating lookups.
    pub fn predict(&self, customer_id: &str, business_id: &str, power: f64) -> Result<f64> {
        let business =
            self.data
                .business(business_id)
                .ok_or_else(|| SaborError::UnknownBusiness {
                    id: business_id.to_string(),
                })?;

        let weights = self.similarity_weights(customer_id, business, power)?;

        let mut prediction = 0.0;
        for (reviewer_id, weight) in business.customer_ids.iter().zip(&weights) {
            prediction += weight * self.mean_rating(reviewer_id, business_id)?;
        }
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CustomerProfile, ReviewRecord, TopicDistribution};

    fn customer(id: &str, loadings: &[f64]) -> CustomerProfile {
        CustomerProfile {
            id: id.to_string(),
            review_count: 0,
            review_ids: vec![],
            businesses: vec![],
            dist: TopicDistribution::from_vec(loadings.to_vec()).expect("valid distribution"),
        }
    }

    fn business(id: &str, customer_ids: &[&str], rating: f64) -> BusinessProfile {
        BusinessProfile {
            id: id.to_string(),
            customer_ids: customer_ids.iter().map(|c| (*c).to_string()).collect(),
            review_count: customer_ids.len(),
            review_ids: vec![],
            rating,
        }
    }

    fn review(user: &str, biz: &str, stars: f64) -> ReviewRecord {
        ReviewRecord {
            review_id: format!("{user}-{biz}-{stars}"),
            user_id: user.to_string(),
            business_id: biz.to_string(),
            stars,
        }
    }

    fn three_reviewer_data() -> TrainingData {
        TrainingData::new(
            vec![
                customer("u1", &[1.0, 0.0, 0.0]),
                customer("u2", &[0.0, 1.0, 0.0]),
                customer("u3", &[0.0, 0.0, 1.0]),
                customer("target", &[0.4, 0.35, 0.25]),
            ],
            vec![business("b1", &["u1", "u2", "u3"], 4.0)],
            &[
                review("u1", "b1", 3.0),
                review("u2", "b1", 4.0),
                review("u3", "b1", 5.0),
            ],
        )
        .expect("consistent fixture")
    }

    #[test]
    fn test_weights_sum_to_one() {
        let data = three_reviewer_data();
        let predictor = RatingPredictor::new(&data);
        let biz = data.business("b1").unwrap();
        for power in [0.5, 1.0, 2.0, 5.0] {
            let weights = predictor.similarity_weights("target", biz, power).unwrap();
            let sum: f64 = weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "power {power}: sum {sum}");
        }
    }

    #[test]
    fn test_identical_distributions_weigh_equally_regardless_of_power() {
        let data = TrainingData::new(
            vec![
                customer("a", &[0.5, 0.5]),
                customer("b", &[0.5, 0.5]),
                customer("target", &[0.5, 0.5]),
            ],
            vec![business("b1", &["a", "b"], 3.5)],
            &[review("a", "b1", 3.0), review("b", "b1", 4.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        let biz = data.business("b1").unwrap();
        for power in [1.0, 3.0, 10.0] {
            let weights = predictor.similarity_weights("target", biz, power).unwrap();
            assert!((weights[0] - 0.5).abs() < 1e-12);
            assert!((weights[1] - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_prediction_within_reviewer_rating_range() {
        let data = three_reviewer_data();
        let predictor = RatingPredictor::new(&data);
        for power in [0.5, 1.0, 2.0, 8.0] {
            let pred = predictor.predict("target", "b1", power).unwrap();
            assert!(pred >= 3.0 && pred <= 5.0, "power {power}: {pred}");
        }
    }

    #[test]
    fn test_prediction_is_idempotent() {
        let data = three_reviewer_data();
        let predictor = RatingPredictor::new(&data);
        let first = predictor.predict("target", "b1", 1.0).unwrap();
        let second = predictor.predict("target", "b1", 1.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_closer_reviewer_pulls_prediction() {
        // The target's preferences match u1 (rating 3.0) far more than
        // u3 (rating 5.0), so the prediction must sit below the plain
        // mean of 4.0.
        let data = TrainingData::new(
            vec![
                customer("u1", &[0.9, 0.1]),
                customer("u3", &[0.1, 0.9]),
                customer("target", &[0.9, 0.1]),
            ],
            vec![business("b1", &["u1", "u3"], 4.0)],
            &[review("u1", "b1", 3.0), review("u3", "b1", 5.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        let pred = predictor.predict("target", "b1", 1.0).unwrap();
        assert!(pred < 4.0);
    }

    #[test]
    fn test_higher_power_sharpens_weighting() {
        let data = TrainingData::new(
            vec![
                customer("u1", &[0.9, 0.1]),
                customer("u3", &[0.1, 0.9]),
                customer("target", &[0.9, 0.1]),
            ],
            vec![business("b1", &["u1", "u3"], 4.0)],
            &[review("u1", "b1", 3.0), review("u3", "b1", 5.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        let soft = predictor.predict("target", "b1", 1.0).unwrap();
        let sharp = predictor.predict("target", "b1", 8.0).unwrap();
        assert!(sharp < soft, "sharp {sharp} should lean harder on u1");
    }

    #[test]
    fn test_mean_rating_averages_repeat_reviews() {
        let data = TrainingData::new(
            vec![customer("u1", &[1.0])],
            vec![business("b1", &["u1"], 4.0)],
            &[review("u1", "b1", 3.0), review("u1", "b1", 5.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        assert!((predictor.mean_rating("u1", "b1").unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_rating_missing_row_is_fatal() {
        let data = three_reviewer_data();
        let predictor = RatingPredictor::new(&data);
        let err = predictor.mean_rating("target", "b1").unwrap_err();
        assert!(matches!(err, SaborError::MissingReviewRecord { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_predict_includes_target_customer_among_reviewers() {
        // Pinned behavior: the target reviews b1 themselves and is not
        // excluded from the weighting. With JS(u, u) = 0 their own 5.0
        // dominates the dissimilar other reviewer as power grows.
        let data = TrainingData::new(
            vec![
                customer("target", &[1.0, 0.0]),
                customer("other", &[0.0, 1.0]),
            ],
            vec![business("b1", &["target", "other"], 3.5)],
            &[review("target", "b1", 5.0), review("other", "b1", 2.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        let pred = predictor.predict("target", "b1", 4.0).unwrap();
        assert!(pred > 4.5, "self-match should dominate: {pred}");
    }

    #[test]
    fn test_zero_weight_mass_is_reported() {
        // JS maxes at ln 2 < 1, so raw weights stay positive at any
        // finite power. Zero mass needs power = infinity with every
        // reviewer at maximal divergence: (1 - ln 2)^inf = 0.
        let data = TrainingData::new(
            vec![
                customer("target", &[1.0, 0.0]),
                customer("far", &[0.0, 1.0]),
            ],
            vec![business("b1", &["far"], 2.0)],
            &[review("far", "b1", 2.0)],
        )
        .unwrap();
        let predictor = RatingPredictor::new(&data);
        let biz = data.business("b1").unwrap();
        let err = predictor
            .similarity_weights("target", biz, f64::INFINITY)
            .unwrap_err();
        assert_eq!(
            err,
            SaborError::ZeroWeightMass {
                customer: "target".to_string(),
                business: "b1".to_string(),
            }
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let data = three_reviewer_data();
        let predictor = RatingPredictor::new(&data);
        assert!(matches!(
            predictor.predict("ghost", "b1", 1.0).unwrap_err(),
            SaborError::UnknownCustomer { .. }
        ));
        assert!(matches!(
            predictor.predict("target", "nowhere", 1.0).unwrap_err(),
            SaborError::UnknownBusiness { .. }
        ));
    }
}
