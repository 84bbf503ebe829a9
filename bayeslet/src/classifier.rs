#[cfg(feature = "multithreading")]
use std::sync::Arc;
#[cfg(feature = "multithreading")]
use std::thread;

#[cfg(feature = "multithreading")]
use crossbeam_channel::Sender;

use hashbrown::HashSet;

use crate::errors::{BayesletError, Result};
use crate::estimator::{FrequencyEstimator, Unsmoothed};
use crate::frequency::FrequencyModel;
use crate::model::Model;
use crate::trainer::Trainer;
use crate::vocabulary::Vocabulary;

/// Result of a classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// ID of the predicted class.
    pub class: usize,

    /// Log-likelihood of each class.
    pub scores: Vec<f64>,

    /// `true` if two or more classes share the maximum score.
    pub tied: bool,
}

/// Naive Bayes classifier.
///
/// The score of a class is the sum of the log-probabilities of the tokens of an example. Tokens
/// not present in a class model contribute nothing. Class priors are not used, so the training
/// data are assumed to be balanced. If two or more classes share the maximum score, the first of
/// them in the class order wins.
///
/// # Examples
///
/// ```
/// use bayeslet::{Classifier, Laplace, Unsmoothed};
///
/// let corpora = [
///     ("pos", vec!["good", "great", "good"]),
///     ("neg", vec!["bad", "awful", "bad"]),
/// ];
///
/// let classifier = Classifier::from_corpora(corpora.clone(), Unsmoothed).unwrap();
/// assert_eq!("neg", classifier.label(&["good", "great"]));
///
/// let classifier = Classifier::from_corpora(corpora, Laplace).unwrap();
/// assert_eq!("pos", classifier.label(&["good", "great"]));
/// ```
pub struct Classifier<E = Unsmoothed> {
    labels: Vec<String>,
    frequencies: Vec<FrequencyModel>,
    vocabulary: Vocabulary,
    estimator: E,
}

impl<E> Classifier<E>
where
    E: FrequencyEstimator,
{
    /// Creates a new classifier.
    ///
    /// # Arguments
    ///
    /// * `model` - A model data.
    /// * `estimator` - A probability estimation policy.
    ///
    /// # Returns
    ///
    /// A new classifier.
    pub fn new(model: Model, estimator: E) -> Self {
        let vocabulary = Vocabulary::from_models(&model.frequencies);
        Self {
            labels: model.labels,
            frequencies: model.frequencies,
            vocabulary,
            estimator,
        }
    }

    /// Trains a classifier from per-class corpora.
    ///
    /// # Arguments
    ///
    /// * `corpora` - Pairs of a class label and its tokens. The order of the pairs is the
    ///               tie-break order.
    /// * `estimator` - A probability estimation policy.
    ///
    /// # Errors
    ///
    /// [`BayesletError::InvalidArgument`] will be returned if no corpus is given, or if a label
    /// is empty or duplicated.
    pub fn from_corpora<I, L, T, S>(corpora: I, estimator: E) -> Result<Self>
    where
        I: IntoIterator<Item = (L, T)>,
        L: AsRef<str>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trainer = Trainer::new();
        for (label, tokens) in corpora {
            let label = label.as_ref();
            let n_classes = trainer.n_classes();
            if trainer.add_class(label)? != n_classes {
                return Err(BayesletError::invalid_argument(
                    "corpora",
                    format!("duplicate class label: {label}"),
                ));
            }
            trainer.push_tokens(label, tokens)?;
        }
        Ok(Self::new(trainer.train()?, estimator))
    }

    /// Gets class labels in the tie-break order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Gets the vocabulary shared by all classes.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Gets the frequency model of the class `label`.
    pub fn frequency(&self, label: &str) -> Option<&FrequencyModel> {
        self.class_id(label).map(|i| &self.frequencies[i])
    }

    /// Gets the ID of the class `label`.
    pub fn class_id(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Computes the log-probability of `token` in the class `class` using the estimator.
    ///
    /// # Panics
    ///
    /// Panics if `class` is out of range.
    pub fn log_prob(&self, class: usize, token: &str) -> Option<f64> {
        self.estimator
            .log_prob(&self.frequencies[class], &self.vocabulary, token)
    }

    fn score<S>(&self, class: usize, example: &[S]) -> f64
    where
        S: AsRef<str>,
    {
        example
            .iter()
            .filter_map(|w| self.log_prob(class, w.as_ref()))
            .sum()
    }

    /// Computes the log-likelihood of each class.
    ///
    /// # Arguments
    ///
    /// * `example` - Tokens of an example.
    ///
    /// # Returns
    ///
    /// Scores in the class order.
    pub fn scores<S>(&self, example: &[S]) -> Vec<f64>
    where
        S: AsRef<str>,
    {
        (0..self.labels.len())
            .map(|class| self.score(class, example))
            .collect()
    }

    /// Predicts the class ID of an example.
    ///
    /// An empty example, or an example whose tokens are all unknown, has the score 0 in every
    /// class, so the first class is returned.
    pub fn label_id<S>(&self, example: &[S]) -> usize
    where
        S: AsRef<str>,
    {
        argmax(&self.scores(example))
    }

    /// Predicts the label of an example.
    pub fn label<S>(&self, example: &[S]) -> &str
    where
        S: AsRef<str>,
    {
        &self.labels[self.label_id(example)]
    }

    /// Predicts the class of an example along with the scores of all classes.
    pub fn predict<S>(&self, example: &[S]) -> Prediction
    where
        S: AsRef<str>,
    {
        let scores = self.scores(example);
        let class = argmax(&scores);
        let tied = scores
            .iter()
            .enumerate()
            .any(|(i, &score)| i != class && score == scores[class]);
        Prediction {
            class,
            scores,
            tied,
        }
    }

    /// Gets tokens with the highest log-probabilities in a class.
    ///
    /// # Arguments
    ///
    /// * `label` - A class label.
    /// * `n` - The maximum number of tokens.
    ///
    /// # Returns
    ///
    /// Pairs of a token and its log-probability, in descending order of the probability. Ties
    /// are ordered by token. `None` if the class does not exist.
    pub fn top_tokens(&self, label: &str, n: usize) -> Option<Vec<(&str, f64)>> {
        let class = self.class_id(label)?;
        let mut tokens: Vec<_> = self.frequencies[class]
            .iter()
            .filter_map(|(token, _)| self.log_prob(class, token).map(|lp| (token, lp)))
            .collect();
        tokens.sort_unstable_by(|(token_a, lp_a), (token_b, lp_b)| {
            lp_b.total_cmp(lp_a).then_with(|| token_a.cmp(token_b))
        });
        tokens.truncate(n);
        Some(tokens)
    }

    /// Returns the tokens that appear in the example but are unknown to every class.
    pub fn unknown_tokens<'a, S>(&self, example: &'a [S]) -> Vec<&'a str>
    where
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        example
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| !self.vocabulary.contains(w) && seen.insert(*w))
            .collect()
    }

    /// Converts the classifier back into a model.
    pub fn into_model(self) -> Model {
        Model {
            labels: self.labels,
            frequencies: self.frequencies,
        }
    }

    /// Creates a multithreading classifier. This function is the alias of
    /// [`MultithreadClassifier::new()`].
    ///
    /// # Arguments
    ///
    /// * `n_threads` - The number of threads.
    ///
    /// # Returns
    ///
    /// A multithread classifier.
    #[cfg(feature = "multithreading")]
    #[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
    pub fn multithreading(self, n_threads: usize) -> MultithreadClassifier
    where
        E: Send + Sync + 'static,
    {
        MultithreadClassifier::new(self, n_threads)
    }
}

/// Returns the index of the maximum score. Only a strictly greater score replaces the current
/// best, so the first class wins ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

/// Classifier for multithreading.
///
/// Worker threads share one immutable classifier and stop when this object is dropped. Each
/// call of [`MultithreadClassifier::label_ids()`] collects its results through its own channel,
/// so the classifier can be shared between threads.
#[cfg(feature = "multithreading")]
#[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
pub struct MultithreadClassifier {
    task_tx: Sender<Task>,
    labels: Vec<String>,
}

#[cfg(feature = "multithreading")]
type Task = (usize, Vec<String>, Sender<(usize, usize)>);

#[cfg(feature = "multithreading")]
impl MultithreadClassifier {
    /// Creates a multithreading classifier.
    ///
    /// # Arguments
    ///
    /// * `classifier` - A normal classifier.
    /// * `n_threads` - The number of threads. At least one thread is spawned.
    ///
    /// # Returns
    ///
    /// A multithread classifier.
    pub fn new<E>(classifier: Classifier<E>, n_threads: usize) -> Self
    where
        E: FrequencyEstimator + Send + Sync + 'static,
    {
        let labels = classifier.labels.clone();
        let classifier = Arc::new(classifier);

        let (task_tx, task_rx) = crossbeam_channel::unbounded::<Task>();
        for _ in 0..n_threads.max(1) {
            let classifier = Arc::clone(&classifier);
            let task_rx = task_rx.clone();
            thread::spawn(move || {
                for (idx, example, result_tx) in task_rx {
                    let class = classifier.label_id(example.as_slice());
                    // The caller has gone away only if it panicked; the other callers are not
                    // affected.
                    let _ = result_tx.send((idx, class));
                }
            });
        }

        Self { task_tx, labels }
    }

    /// Gets class labels in the tie-break order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Predicts class IDs of examples.
    ///
    /// # Arguments
    ///
    /// * `examples` - Tokenized examples.
    ///
    /// # Returns
    ///
    /// Class IDs in the same order as `examples`.
    pub fn label_ids(&self, examples: Vec<Vec<String>>) -> Vec<usize> {
        let mut results = vec![0; examples.len()];
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        for (idx, example) in examples.into_iter().enumerate() {
            // Workers live as long as `self`, so the channel is never disconnected here.
            self.task_tx
                .send((idx, example, result_tx.clone()))
                .unwrap();
        }
        drop(result_tx);
        // Ends when every task has been answered and its sender dropped.
        for (idx, class) in result_rx {
            results[idx] = class;
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::estimator::Laplace;

    const EPSILON: f64 = 1e-9;

    fn corpora() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![
            ("pos", vec!["good", "great", "good"]),
            ("neg", vec!["bad", "awful", "bad"]),
        ]
    }

    #[test]
    fn test_unsmoothed_scores() {
        let classifier = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();

        let scores = classifier.scores(&["good", "great"]);

        assert!((scores[0] - (2.0f64 / 9.0).log2()).abs() < EPSILON);
        assert_eq!(0.0, scores[1]);
    }

    #[test]
    fn test_unsmoothed_zero_contribution_trap() {
        let classifier = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();

        assert_eq!("neg", classifier.label(&["good", "great"]));
        assert_eq!(Some(0), classifier.class_id("pos"));
        assert_eq!(None, classifier.log_prob(1, "good"));
    }

    #[test]
    fn test_laplace_scores() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();

        let scores = classifier.scores(&["good", "great"]);

        assert_eq!(4, classifier.vocabulary().len());
        assert!((scores[0] - (6.0f64 / 49.0).log2()).abs() < EPSILON);
        assert!((scores[1] - (1.0f64 / 49.0).log2()).abs() < EPSILON);
        assert_eq!("pos", classifier.label(&["good", "great"]));
    }

    #[test]
    fn test_label_negative_example() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();

        assert_eq!("neg", classifier.label(&["bad", "good", "awful"]));
    }

    #[test]
    fn test_empty_example_ties_to_first_class() {
        let empty: [&str; 0] = [];

        let classifier = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();
        assert_eq!("pos", classifier.label(&empty));

        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();
        assert_eq!("pos", classifier.label(&empty));
        assert!(classifier.predict(&empty).tied);
    }

    #[test]
    fn test_unknown_token_ties_to_first_class() {
        let classifier = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();
        assert_eq!("pos", classifier.label(&["zzz"]));

        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();
        assert_eq!("pos", classifier.label(&["zzz"]));
        assert_eq!(vec![0.0, 0.0], classifier.scores(&["zzz"]));
    }

    #[test]
    fn test_tie_follows_class_order() {
        let reversed: Vec<_> = corpora().into_iter().rev().collect();
        let classifier = Classifier::from_corpora(reversed, Laplace).unwrap();

        assert_eq!("neg", classifier.label(&["zzz"]));
    }

    #[test]
    fn test_deterministic() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();
        let example = ["good", "bad", "zzz", "great"];

        let first = classifier.label(&example).to_string();
        for _ in 0..10 {
            assert_eq!(first, classifier.label(&example));
        }
    }

    #[test]
    fn test_predict() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();

        let prediction = classifier.predict(&["good", "great"]);

        assert_eq!(0, prediction.class);
        assert!(!prediction.tied);
        assert_eq!(classifier.scores(&["good", "great"]), prediction.scores);
    }

    #[test]
    fn test_predict_unsmoothed_tie() {
        let classifier = Classifier::from_corpora(
            [("pos", vec!["good", "good"]), ("neg", vec!["bad", "bad"])],
            Unsmoothed,
        )
        .unwrap();

        // log2(1) = 0 in both classes.
        let prediction = classifier.predict(&["good", "bad"]);

        assert_eq!(0, prediction.class);
        assert!(prediction.tied);
    }

    #[test]
    fn test_argmax_first_maximum() {
        assert_eq!(0, argmax(&[0.0]));
        assert_eq!(1, argmax(&[-2.0, -1.0, -1.0]));
        assert_eq!(0, argmax(&[0.0, 0.0, -1.0]));
    }

    #[test]
    fn test_label_id_agrees_with_predict() {
        let unsmoothed = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();
        let laplace = Classifier::from_corpora(corpora(), Laplace).unwrap();

        for example in [
            vec!["good", "great"],
            vec!["good", "bad"],
            vec![],
            vec!["zzz"],
            vec!["awful", "good", "bad"],
        ] {
            let example = example.as_slice();
            assert_eq!(
                unsmoothed.predict(example).class,
                unsmoothed.label_id(example)
            );
            assert_eq!(laplace.predict(example).class, laplace.label_id(example));
        }
    }

    #[test]
    fn test_single_class() {
        let classifier =
            Classifier::from_corpora([("pos", vec!["good"])], Unsmoothed).unwrap();

        assert_eq!("pos", classifier.label(&["bad"]));
        assert_eq!("pos", classifier.label(&["good"]));
    }

    #[test]
    fn test_three_classes() {
        let classifier = Classifier::from_corpora(
            [
                ("pos", vec!["good", "great", "good"]),
                ("neu", vec!["okay", "fine", "okay"]),
                ("neg", vec!["bad", "awful", "bad"]),
            ],
            Laplace,
        )
        .unwrap();

        assert_eq!("neu", classifier.label(&["okay", "fine"]));
        assert_eq!("neg", classifier.label(&["awful"]));
    }

    #[test]
    fn test_monotonicity() {
        let example = ["good"];
        let mut pos = vec!["good", "bad", "great"];
        let neg = vec!["bad", "awful", "good"];

        let mut prev_unsmoothed = f64::NEG_INFINITY;
        let mut prev_laplace = f64::NEG_INFINITY;
        for _ in 0..5 {
            let corpora = [("pos", pos.clone()), ("neg", neg.clone())];
            let unsmoothed = Classifier::from_corpora(corpora.clone(), Unsmoothed).unwrap();
            let laplace = Classifier::from_corpora(corpora, Laplace).unwrap();

            let score = unsmoothed.scores(&example)[0];
            assert!(score >= prev_unsmoothed);
            prev_unsmoothed = score;

            let score = laplace.scores(&example)[0];
            assert!(score >= prev_laplace);
            prev_laplace = score;

            pos.push("good");
        }
    }

    #[test]
    fn test_from_corpora_errors() {
        let result = Classifier::from_corpora(Vec::<(&str, Vec<&str>)>::new(), Unsmoothed);
        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));

        let result = Classifier::from_corpora(
            [("pos", vec!["good"]), ("pos", vec!["great"])],
            Unsmoothed,
        );
        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));

        let result = Classifier::from_corpora([("", vec!["good"])], Laplace);
        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_class_corpus() {
        let classifier = Classifier::from_corpora(
            [("pos", vec!["good", "great"]), ("neg", vec![])],
            Laplace,
        )
        .unwrap();

        let scores = classifier.scores(&["good"]);

        assert!(scores.iter().all(|s| s.is_finite()));
        // (1 + 1) / (2 + 2) vs. (0 + 1) / (0 + 2)
        assert!((scores[0] - (-1.0)).abs() < EPSILON);
        assert!((scores[1] - (-1.0)).abs() < EPSILON);
        assert_eq!("pos", classifier.label(&["good"]));
    }

    #[test]
    fn test_top_tokens() {
        let classifier = Classifier::from_corpora(
            [
                ("pos", vec!["good", "great", "good", "fine", "great", "good"]),
                ("neg", vec!["bad"]),
            ],
            Unsmoothed,
        )
        .unwrap();

        let top = classifier.top_tokens("pos", 2).unwrap();

        assert_eq!(2, top.len());
        assert_eq!("good", top[0].0);
        assert_eq!("great", top[1].0);
        assert!((top[0].1 - (0.5f64).log2()).abs() < EPSILON);
        assert!(classifier.top_tokens("neutral", 2).is_none());
    }

    #[test]
    fn test_unknown_tokens() {
        let classifier = Classifier::from_corpora(corpora(), Unsmoothed).unwrap();

        assert_eq!(
            vec!["zzz", "yyy"],
            classifier.unknown_tokens(&["good", "zzz", "yyy", "zzz"])
        );
    }

    #[test]
    fn test_into_model() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();

        let model = classifier.into_model();
        let classifier = Classifier::new(model, Unsmoothed);

        assert_eq!("neg", classifier.label(&["good", "great"]));
    }

    #[cfg(feature = "multithreading")]
    #[test]
    fn test_multithread_classifier() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();
        let examples: Vec<Vec<String>> = [
            "good great",
            "bad awful",
            "",
            "zzz",
            "awful good bad",
            "great",
        ]
        .iter()
        .map(|s| s.split_whitespace().map(String::from).collect())
        .collect();
        let expected: Vec<_> = examples
            .iter()
            .map(|e| classifier.label_id(e.as_slice()))
            .collect();

        let classifier = classifier.multithreading(3);
        let results = classifier.label_ids(examples);

        assert_eq!(expected, results);
        assert_eq!(vec![0, 1, 0, 0, 1, 0], results);
    }

    #[cfg(feature = "multithreading")]
    #[test]
    fn test_multithread_classifier_shared_between_threads() {
        let classifier = Classifier::from_corpora(corpora(), Laplace).unwrap();
        let classifier = Arc::new(classifier.multithreading(2));

        let handles: Vec<_> = [50, 87, 124, 37]
            .into_iter()
            .enumerate()
            .map(|(t, n)| {
                let classifier = Arc::clone(&classifier);
                thread::spawn(move || {
                    let examples: Vec<Vec<String>> = (0..n)
                        .map(|i| {
                            let token = if (i + t) % 2 == 0 { "good" } else { "bad" };
                            vec![token.to_string()]
                        })
                        .collect();
                    let expected: Vec<usize> = (0..n).map(|i| (i + t) % 2).collect();
                    for _ in 0..5 {
                        assert_eq!(expected, classifier.label_ids(examples.clone()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
