//! Word association scoring against a target sub-corpus.
//!
//! Scores each vocabulary word by how strongly it is associated with a
//! target condition (e.g. negative-sentiment reviews) relative to the
//! reference corpus, using the weighted log-odds-ratio statistic of
//! Monroe et al. (2008) in the additive form popularized by Jurafsky
//! et al. (2014) for menu and review language.
//!
//! The scorer is a diagnostic component: its output feeds reports, not
//! the rating predictor.
//!
//! # Quick Start
//!
//! ```
//! use sabor::association::{AssociationScorer, CorpusFrequencies};
//!
//! let reference = CorpusFrequencies::with_total(
//!     [("good".to_string(), 100), ("bad".to_string(), 10)].into(),
//!     1000,
//! );
//! let target = CorpusFrequencies::with_total([("bad".to_string(), 8)].into(), 50);
//!
//! let scorer = AssociationScorer::new(reference, target);
//! let score = scorer.score("bad").expect("well-defined input");
//! assert!(score > 0.0); // "bad" is over-represented in the target corpus
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, SaborError};

/// Per-word frequency table for one corpus, restricted to a fixed
/// vocabulary, together with the corpus's total token count under that
/// restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFrequencies {
    counts: HashMap<String, u64>,
    total_tokens: u64,
}

impl CorpusFrequencies {
    /// Build a table whose total is the sum of the given counts.
    #[must_use]
    pub fn from_counts(counts: HashMap<String, u64>) -> Self {
        let total_tokens = counts.values().sum();
        Self {
            counts,
            total_tokens,
        }
    }

    /// Build a table with an externally supplied total. Used when the
    /// collaborator computed the restricted-corpus size separately from
    /// the per-word table.
    #[must_use]
    pub fn with_total(counts: HashMap<String, u64>, total_tokens: u64) -> Self {
        Self {
            counts,
            total_tokens,
        }
    }

    /// Frequency of a word, zero if absent.
    #[must_use]
    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Total token count of the restricted corpus.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Words occurring in this corpus.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

/// Weighted log-odds association scorer over a reference corpus and a
/// target sub-corpus.
///
/// For word `i` with reference frequency `y_i`, target frequency `yb_i`,
/// reference total `a_0` and target total `n_b`:
///
/// ```text
/// A10 = yb_i + y_i        A11 = n_b + a_0 - A10
/// A20 = 2 * y_i           A21 = 2 * a_0 - A20
/// score(i) = ln(A10 / A11) - ln(A20 / A21)
/// ```
///
/// A positive score marks a word as more associated with the target
/// condition than with the corpus at large.
///
/// Zero terms make the formula degenerate (log of zero or division by
/// zero). The policy here is to *skip*: [`AssociationScorer::score`]
/// surfaces [`SaborError::DegenerateAssociation`] for the single word,
/// and the batch APIs omit such words instead of emitting signed
/// infinities that would poison any downstream ranking.
#[derive(Debug, Clone)]
pub struct AssociationScorer {
    reference: CorpusFrequencies,
    target: CorpusFrequencies,
}

impl AssociationScorer {
    /// Create a scorer over the two frequency tables.
    #[must_use]
    pub fn new(reference: CorpusFrequencies, target: CorpusFrequencies) -> Self {
        Self { reference, target }
    }

    /// Association score for a single word.
    ///
    /// # Errors
    ///
    /// Returns [`SaborError::DegenerateAssociation`] when any numerator
    /// or denominator of the log-odds formula is zero.
    pub fn score(&self, word: &str) -> Result<f64> {
        let a0 = self.reference.total_tokens() as f64;
        let nb = self.target.total_tokens() as f64;
        let yi = self.reference.count(word) as f64;
        let ybi = self.target.count(word) as f64;

        let a10 = ybi + yi;
        let a11 = nb + a0 - a10;
        let a20 = 2.0 * yi;
        let a21 = 2.0 * a0 - a20;

        if a10 == 0.0 || a11 <= 0.0 || a20 == 0.0 || a21 <= 0.0 {
            return Err(SaborError::DegenerateAssociation {
                word: word.to_string(),
            });
        }

        Ok((a10 / a11).ln() - (a20 / a21).ln())
    }

    /// Scores for every word occurring in the target corpus, sorted by
    /// word. Degenerate words are skipped per the module policy.
    #[must_use]
    pub fn scores(&self) -> BTreeMap<String, f64> {
        self.target
            .words()
            .filter_map(|w| self.score(w).ok().map(|s| (w.to_string(), s)))
            .collect()
    }

    /// The subset of [`AssociationScorer::scores`] with positive score:
    /// words over-represented in the target condition.
    #[must_use]
    pub fn positive_scores(&self) -> BTreeMap<String, f64> {
        self.scores().into_iter().filter(|(_, s)| *s > 0.0).collect()
    }
}
