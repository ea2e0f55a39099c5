//! Offline inspection utilities for vocabulary and topic-model outputs.
//!
//! These produce plain data for notebooks and reports; nothing here is on
//! the prediction path.

use crate::error::{Result, SaborError};

/// Cumulative occurrence totals by frequency-rank index.
///
/// Input is a word-frequency list sorted most-common-first; entry `i` of
/// the output is `(i, total occurrences of words 0..=i)`. Plotting the
/// totals against the index shows where the curve flattens, which is how
/// a bounded dictionary size gets chosen.
///
/// # Examples
///
/// ```
/// use sabor::inspect::cumulative_counts;
///
/// let curve = cumulative_counts(&[50, 30, 10]);
/// assert_eq!(curve, vec![(0, 50), (1, 80), (2, 90)]);
/// ```
#[must_use]
pub fn cumulative_counts(ranked_counts: &[u64]) -> Vec<(usize, u64)> {
    let mut running = 0;
    ranked_counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            running += c;
            (i, running)
        })
        .collect()
}

/// Top `m` words of one topic, by probability.
///
/// `topic_row` is a row of the topic-word matrix produced by the external
/// topic-model fit; `vocab` is the dictionary in matrix column order.
/// Ties are broken by vocabulary order.
///
/// # Errors
///
/// Returns [`SaborError::DimensionMismatch`] when the row and vocabulary
/// lengths disagree.
///
/// # Examples
///
/// ```
/// use sabor::inspect::top_topic_words;
///
/// let vocab = vec!["pizza".to_string(), "sushi".to_string(), "taco".to_string()];
/// let row = [0.2, 0.7, 0.1];
/// let top = top_topic_words(&row, &vocab, 2).unwrap();
/// assert_eq!(top[0].0, "sushi");
/// assert_eq!(top[1].0, "pizza");
/// ```
pub fn top_topic_words(
    topic_row: &[f64],
    vocab: &[String],
    m: usize,
) -> Result<Vec<(String, f64)>> {
    if topic_row.len() != vocab.len() {
        return Err(SaborError::dimension_mismatch(
            "vocabulary",
            vocab.len(),
            topic_row.len(),
        ));
    }

    let mut indexed: Vec<usize> = (0..vocab.len()).collect();
    indexed.sort_by(|&a, &b| {
        topic_row[b]
            .partial_cmp(&topic_row[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    Ok(indexed
        .into_iter()
        .take(m)
        .map(|i| (vocab[i].clone(), topic_row[i]))
        .collect())
}
