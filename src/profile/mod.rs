//! Profile records for customers, businesses, and held-out subjects.
//!
//! These are the in-memory shapes the prediction core consumes. They are
//! produced by upstream collaborators (corpus partitioning, LDA fit,
//! profile aggregation) and persisted as JSON by the surrounding system;
//! every record type derives serde traits for that reason.
//!
//! [`TrainingData`] indexes the records by identifier so the predictor and
//! evaluation harness get O(1) lookups. The core only ever borrows it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaborError};

/// Minimum number of training-window reviews for a customer to qualify as
/// a held-out evaluation subject. Strict inequality: a subject needs
/// *more* than this many reviews.
pub const MIN_TRAINING_REVIEWS: usize = 15;

/// A probability distribution over K latent topics.
///
/// Produced by the external topic-model fit for each review document, and
/// by averaging per-review distributions for each customer. Entries are
/// non-negative and sum to 1 within floating tolerance (the producer's
/// responsibility); exact zeros are valid and common for sparse loadings.
///
/// # Examples
///
/// ```
/// use sabor::profile::TopicDistribution;
///
/// let dist = TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap();
/// assert_eq!(dist.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicDistribution(Vec<f64>);

impl TopicDistribution {
    /// Create a distribution from raw topic loadings.
    ///
    /// # Errors
    ///
    /// Returns [`SaborError::InvalidDistribution`] if the vector is empty
    /// or contains a negative or non-finite entry.
    pub fn from_vec(loadings: Vec<f64>) -> Result<Self> {
        if loadings.is_empty() {
            return Err(SaborError::InvalidDistribution {
                reason: "no topic components".to_string(),
            });
        }
        for (i, &x) in loadings.iter().enumerate() {
            if !x.is_finite() || x < 0.0 {
                return Err(SaborError::InvalidDistribution {
                    reason: format!("component {i} is {x}"),
                });
            }
        }
        Ok(Self(loadings))
    }

    /// Number of topics K.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the distribution has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Topic loadings as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Element-wise mean of several distributions of equal length.
    ///
    /// This is how a customer's aggregate topic preference is built from
    /// the per-review distributions of their review history.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or lengths disagree.
    ///
    /// # Examples
    ///
    /// ```
    /// use sabor::profile::TopicDistribution;
    ///
    /// let a = TopicDistribution::from_vec(vec![1.0, 0.0]).unwrap();
    /// let b = TopicDistribution::from_vec(vec![0.0, 1.0]).unwrap();
    /// let mean = TopicDistribution::mean_of(&[a, b]).unwrap();
    /// assert_eq!(mean.as_slice(), &[0.5, 0.5]);
    /// ```
    pub fn mean_of(dists: &[TopicDistribution]) -> Result<Self> {
        let first = dists.first().ok_or(SaborError::InvalidDistribution {
            reason: "cannot average zero distributions".to_string(),
        })?;
        let k = first.len();
        let mut acc = vec![0.0; k];
        for d in dists {
            if d.len() != k {
                return Err(SaborError::dimension_mismatch("topics", k, d.len()));
            }
            for (a, &x) in acc.iter_mut().zip(d.as_slice()) {
                *a += x;
            }
        }
        let n = dists.len() as f64;
        for a in &mut acc {
            *a /= n;
        }
        Ok(Self(acc))
    }
}

/// A customer's training-window profile: review history plus aggregate
/// topic preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    /// Opaque customer identifier
    pub id: String,
    /// Number of reviews in the training window
    pub review_count: usize,
    /// Review identifiers, in corpus order
    pub review_ids: Vec<String>,
    /// Identifiers of businesses this customer reviewed (deduplicated)
    pub businesses: Vec<String>,
    /// Aggregate topic preference (mean of per-review distributions)
    pub dist: TopicDistribution,
}

/// A business's training-window profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Opaque business identifier
    pub id: String,
    /// Identifiers of customers who reviewed it (deduplicated)
    pub customer_ids: Vec<String>,
    /// Number of reviews in the training window
    pub review_count: usize,
    /// Review identifiers, in corpus order
    pub review_ids: Vec<String>,
    /// Average star rating over the training window
    pub rating: f64,
}

/// A held-out customer with known ground-truth test-window ratings.
///
/// `test_businesses` and `test_ratings` are parallel arrays: entry `i` is
/// the rating the subject gave business `test_businesses[i]` in the test
/// window. A business may appear more than once if the subject reviewed
/// it repeatedly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSubject {
    /// Customer identifier (must have a training-window profile)
    pub id: String,
    /// Review count in the training window
    pub training_reviews: usize,
    /// Review count in the disjoint test window
    pub test_reviews: usize,
    /// Businesses reviewed in the test window
    pub test_businesses: Vec<String>,
    /// Ground-truth ratings, parallel to `test_businesses`
    pub test_ratings: Vec<f64>,
}

impl EvaluationSubject {
    /// Eligibility rule: strictly more than [`MIN_TRAINING_REVIEWS`]
    /// training-window reviews.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.training_reviews > MIN_TRAINING_REVIEWS
    }
}

/// One raw training review row, as partitioned by the upstream collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review identifier
    pub review_id: String,
    /// Reviewing customer
    pub user_id: String,
    /// Reviewed business
    pub business_id: String,
    /// Star rating, 1-5 on the platform scale
    pub stars: f64,
}

/// Indexed, read-only training-window data.
///
/// Owns the profile maps and a (customer, business) rating table built
/// once from the raw review rows. The prediction core borrows this and
/// never mutates it, which also makes concurrent evaluation safe.
///
/// # Examples
///
/// ```
/// use sabor::profile::{
///     BusinessProfile, CustomerProfile, ReviewRecord, TopicDistribution, TrainingData,
/// };
///
/// let customers = vec![CustomerProfile {
///     id: "u1".into(),
///     review_count: 1,
///     review_ids: vec!["r1".into()],
///     businesses: vec!["b1".into()],
///     dist: TopicDistribution::from_vec(vec![0.5, 0.5]).unwrap(),
/// }];
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
///
/// let data = TrainingData::new(customers, businesses, &reviews).unwrap();
/// assert!(data.customer("u1").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingData {
    customers: HashMap<String, CustomerProfile>,
    businesses: HashMap<String, BusinessProfile>,
    ratings: HashMap<(String, String), Vec<f64>>,
}

impl TrainingData {
    /// Index profiles and review rows for O(1) lookup.
    ///
    /// Validates referential integrity: every reviewer listed on a
    /// business profile must have a customer profile and at least one
    /// rating row for that business.
    ///
    /// # Errors
    ///
    /// Returns [`SaborError::UnknownCustomer`] or
    /// [`SaborError::MissingReviewRecord`] when the collaborator input is
    /// inconsistent.
    pub fn new(
        customers: Vec<CustomerProfile>,
        businesses: Vec<BusinessProfile>,
        reviews: &[ReviewRecord],
    ) -> Result<Self> {
        let customers: HashMap<String, CustomerProfile> =
            customers.into_iter().map(|c| (c.id.clone(), c)).collect();
        let businesses: HashMap<String, BusinessProfile> =
            businesses.into_iter().map(|b| (b.id.clone(), b)).collect();

        let mut ratings: HashMap<(String, String), Vec<f64>> = HashMap::new();
        for r in reviews {
            ratings
                .entry((r.user_id.clone(), r.business_id.clone()))
                .or_default()
                .push(r.stars);
        }

        for business in businesses.values() {
            for customer_id in &business.customer_ids {
                if !customers.contains_key(customer_id) {
                    return Err(SaborError::UnknownCustomer {
                        id: customer_id.clone(),
                    });
                }
                let key = (customer_id.clone(), business.id.clone());
                if !ratings.contains_key(&key) {
                    return Err(SaborError::MissingReviewRecord {
                        customer: customer_id.clone(),
                        business: business.id.clone(),
                    });
                }
            }
        }

        Ok(Self {
            customers,
            businesses,
            ratings,
        })
    }

    /// Look up a customer profile by id.
    #[must_use]
    pub fn customer(&self, id: &str) -> Option<&CustomerProfile> {
        self.customers.get(id)
    }

    /// Look up a business profile by id.
    #[must_use]
    pub fn business(&self, id: &str) -> Option<&BusinessProfile> {
        self.businesses.get(id)
    }

    /// True when the business occurs in the training window.
    #[must_use]
    pub fn has_business(&self, id: &str) -> bool {
        self.businesses.contains_key(id)
    }

    /// All star ratings a customer gave a business in the training window.
    #[must_use]
    pub fn ratings(&self, customer_id: &str, business_id: &str) -> Option<&[f64]> {
        self.ratings
            .get(&(customer_id.to_string(), business_id.to_string()))
            .map(Vec::as_slice)
    }

    /// Number of indexed customers.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Number of indexed businesses.
    #[must_use]
    pub fn business_count(&self) -> usize {
        self.businesses.len()
    }
}
