use bincode::{Decode, Encode};
use hashbrown::HashMap;

use crate::utils::SerializableHashMap;
use crate::vocabulary::Vocabulary;

/// Class-conditional unigram model.
///
/// Holds the number of occurrences of each token in the training corpus of a single class and
/// answers log-probability queries against it. The model is immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Decode, Encode)]
pub struct FrequencyModel {
    counts: SerializableHashMap<String, u64>,
    total: u64,
}

impl FrequencyModel {
    /// Counts tokens of a corpus.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Tokens of one class. An empty sequence is allowed.
    ///
    /// # Returns
    ///
    /// A new frequency model.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self::default();
        model.extend(tokens);
        model
    }

    /// Returns `None` if the total count overflows.
    pub(crate) fn from_counts(counts: HashMap<String, u64>) -> Option<Self> {
        let total = checked_sum(counts.values())?;
        Some(Self {
            counts: SerializableHashMap(counts),
            total,
        })
    }

    pub(crate) fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if let Some(count) = self.counts.get_mut(token) {
                *count += 1;
            } else {
                self.counts.insert(token.to_string(), 1);
            }
            self.total += 1;
        }
    }

    /// Gets the number of occurrences of `token`, or 0 if it was never observed.
    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Gets the total number of token occurrences (not the number of distinct tokens).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Gets the number of distinct tokens.
    pub fn n_types(&self) -> usize {
        self.counts.len()
    }

    /// Returns an iterator over `(token, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, &count)| (token.as_str(), count))
    }

    pub(crate) fn is_consistent(&self) -> bool {
        checked_sum(self.counts.values()) == Some(self.total)
            && self.counts.values().all(|&c| c != 0)
    }

    /// Computes the unsmoothed log-probability `log2(count / total)`.
    ///
    /// # Returns
    ///
    /// `None` if `token` was never observed in this class.
    pub fn log_prob(&self, token: &str) -> Option<f64> {
        let count = self.count(token);
        if count == 0 {
            return None;
        }
        // count > 0 implies total > 0.
        Some((count as f64).log2() - (self.total as f64).log2())
    }

    /// Computes the add-one smoothed log-probability
    /// `log2((count + 1) / (total + |vocabulary|))`.
    ///
    /// # Arguments
    ///
    /// * `token` - A token.
    /// * `vocabulary` - Union of the tokens of all classes.
    ///
    /// # Returns
    ///
    /// `None` if `token` is not in `vocabulary`.
    pub fn smoothed_log_prob(&self, token: &str, vocabulary: &Vocabulary) -> Option<f64> {
        if !vocabulary.contains(token) {
            return None;
        }
        let numerator = self.count(token) as f64 + 1.0;
        let denominator = self.total as f64 + vocabulary.len() as f64;
        Some(numerator.log2() - denominator.log2())
    }
}

fn checked_sum<'a, I>(counts: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a u64>,
{
    counts
        .into_iter()
        .try_fold(0u64, |total, &count| total.checked_add(count))
}
