//! Distributional divergence between topic distributions.
//!
//! This module provides the distance underlying customer similarity:
//! - Kullback-Leibler divergence with an explicit defined/undefined result
//! - Jensen-Shannon distance, symmetric and bounded by ln 2
//!
//! # Quick Start
//!
//! ```
//! use sabor::divergence::jensen_shannon;
//!
//! let p = [0.5, 0.5];
//! let q = [0.9, 0.1];
//!
//! let js = jensen_shannon(&p, &q).expect("equal-length distributions");
//! assert!(js > 0.0 && js < std::f64::consts::LN_2);
//! ```

use crate::error::{Result, SaborError};

/// Outcome of a Kullback-Leibler divergence computation.
///
/// KL(P, Q) is undefined when Q has a zero component where P is positive.
/// That is a property of the inputs, not a numeric accident, so it is a
/// distinct variant rather than a NaN, an infinity, or a silent zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KlDivergence {
    /// The divergence exists; value is non-negative, in nats.
    Defined(f64),
    /// Q[index] == 0 while P[index] > 0.
    Undefined {
        /// First component index where the divergence broke down
        index: usize,
    },
}

impl KlDivergence {
    /// True when the divergence exists.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        matches!(self, KlDivergence::Defined(_))
    }

    /// The divergence value, if defined.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            KlDivergence::Defined(v) => Some(*v),
            KlDivergence::Undefined { .. } => None,
        }
    }
}

/// Kullback-Leibler divergence KL(P ‖ Q) in nats.
///
/// Components where `p[i] == 0` contribute nothing, whatever `q[i]` is
/// (the 0·log(0/x) = 0 convention). A component with `q[i] == 0` and
/// `p[i] > 0` makes the whole divergence undefined, reported as
/// [`KlDivergence::Undefined`].
///
/// # Errors
///
/// Returns [`SaborError::DimensionMismatch`] if the slices differ in
/// length and [`SaborError::InvalidDistribution`] if either is empty.
///
/// # Examples
///
/// ```
/// use sabor::divergence::{kl_divergence, KlDivergence};
///
/// let p = [0.5, 0.5];
/// let same = kl_divergence(&p, &p).unwrap();
/// assert_eq!(same, KlDivergence::Defined(0.0));
///
/// let q = [1.0, 0.0];
/// assert_eq!(
///     kl_divergence(&p, &q).unwrap(),
///     KlDivergence::Undefined { index: 1 }
/// );
/// ```
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<KlDivergence> {
    if p.len() != q.len() {
        return Err(SaborError::dimension_mismatch("components", p.len(), q.len()));
    }
    if p.is_empty() {
        return Err(SaborError::InvalidDistribution {
            reason: "no topic components".to_string(),
        });
    }

    let mut sum = 0.0;
    for (i, (&pi, &qi)) in p.iter().zip(q).enumerate() {
        if pi == 0.0 {
            continue;
        }
        if qi == 0.0 {
            return Ok(KlDivergence::Undefined { index: i });
        }
        sum += pi * (pi / qi).ln();
    }
    Ok(KlDivergence::Defined(sum))
}

/// Jensen-Shannon distance between two distributions, in nats.
///
/// Computed against the mixture `m[i] = (a[i] + b[i]) / 2`:
/// `JS = (KL(a ‖ m) + KL(b ‖ m)) / 2`. Since `m[i] == 0` forces both
/// `a[i]` and `b[i]` to zero, KL against the mixture is always defined
/// for valid inputs; if it is not, the inputs are corrupt and the fatal
/// [`SaborError::UndefinedDivergence`] is returned.
///
/// Symmetric, and bounded in `[0, ln 2]`; the bound is attained by
/// distributions with disjoint support.
///
/// # Errors
///
/// Length mismatch, empty input, or (for corrupt inputs, e.g. negative
/// components smuggled past validation) an undefined KL term.
///
/// # Examples
///
/// ```
/// use sabor::divergence::jensen_shannon;
///
/// let disjoint = jensen_shannon(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert!((disjoint - std::f64::consts::LN_2).abs() < 1e-12);
/// ```
pub fn jensen_shannon(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SaborError::dimension_mismatch("components", a.len(), b.len()));
    }

    let m: Vec<f64> = a.iter().zip(b).map(|(&x, &y)| (x + y) / 2.0).collect();

    let left = expect_defined(kl_divergence(a, &m)?, a, &m)?;
    let right = expect_defined(kl_divergence(b, &m)?, b, &m)?;
    Ok((left + right) / 2.0)
}

fn expect_defined(kl: KlDivergence, p: &[f64], q: &[f64]) -> Result<f64> {
    match kl {
        KlDivergence::Defined(v) => Ok(v),
        KlDivergence::Undefined { index } => Err(SaborError::UndefinedDivergence {
            index,
            left: p[index],
            right: q[index],
        }),
    }
}
