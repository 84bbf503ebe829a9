//! Probability estimation policies shared by the classifier.

use crate::frequency::FrequencyModel;
use crate::vocabulary::Vocabulary;

/// Policy that turns the counts of a class into token log-probabilities.
///
/// A return value of `None` means the token is not present in the model. The classifier ignores
/// such tokens instead of penalizing them.
pub trait FrequencyEstimator {
    fn log_prob(&self, model: &FrequencyModel, vocabulary: &Vocabulary, token: &str)
        -> Option<f64>;
}

/// Relative frequencies taken as observed. Tokens unseen in a class are not present.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unsmoothed;

impl FrequencyEstimator for Unsmoothed {
    #[inline(always)]
    fn log_prob(&self, model: &FrequencyModel, _: &Vocabulary, token: &str) -> Option<f64> {
        model.log_prob(token)
    }
}

/// Laplace (add-one) smoothing over the vocabulary of all classes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Laplace;

impl FrequencyEstimator for Laplace {
    #[inline(always)]
    fn log_prob(&self, model: &FrequencyModel, vocabulary: &Vocabulary, token: &str) -> Option<f64> {
        model.smoothed_log_prob(token, vocabulary)
    }
}
