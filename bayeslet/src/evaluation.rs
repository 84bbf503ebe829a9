use crate::classifier::Prediction;

/// Accumulates classification results and computes accuracy metrics.
///
/// # Examples
///
/// ```
/// use bayeslet::{Classifier, Evaluator, Laplace};
///
/// let classifier = Classifier::from_corpora(
///     [("pos", vec!["good", "great"]), ("neg", vec!["bad", "awful"])],
///     Laplace,
/// )
/// .unwrap();
///
/// let mut evaluator = Evaluator::new(classifier.labels().len());
/// evaluator.add(0, &classifier.predict(&["good"]));
/// evaluator.add(1, &classifier.predict(&["great"]));
///
/// assert_eq!(Some(0.5), evaluator.accuracy());
/// ```
pub struct Evaluator {
    // confusion[reference][hypothesis]
    confusion: Vec<Vec<usize>>,
    n_ties: usize,
}

impl Evaluator {
    /// Creates a new evaluator for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self {
            confusion: vec![vec![0; n_classes]; n_classes],
            n_ties: 0,
        }
    }

    /// Adds a result.
    ///
    /// # Arguments
    ///
    /// * `reference` - The correct class ID.
    /// * `prediction` - The prediction of a classifier.
    ///
    /// # Panics
    ///
    /// Panics if a class ID is out of range.
    pub fn add(&mut self, reference: usize, prediction: &Prediction) {
        self.confusion[reference][prediction.class] += 1;
        if prediction.tied {
            self.n_ties += 1;
        }
    }

    pub fn n_examples(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    /// Gets the number of examples decided by the tie-break rule.
    pub fn n_ties(&self) -> usize {
        self.n_ties
    }

    /// Gets the number of examples of the class `reference` predicted as `hypothesis`.
    pub fn confusion(&self, reference: usize, hypothesis: usize) -> usize {
        self.confusion[reference][hypothesis]
    }

    fn n_correct(&self) -> usize {
        (0..self.confusion.len()).map(|c| self.confusion[c][c]).sum()
    }

    /// Computes the accuracy. `None` if no example has been added.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.n_correct(), self.n_examples())
    }

    /// Computes the precision of a class. `None` if the class has never been predicted.
    pub fn precision(&self, class: usize) -> Option<f64> {
        let n_sys = self.confusion.iter().map(|row| row[class]).sum();
        ratio(self.confusion[class][class], n_sys)
    }

    /// Computes the recall of a class. `None` if the class has no reference example.
    pub fn recall(&self, class: usize) -> Option<f64> {
        let n_ref = self.confusion[class].iter().sum();
        ratio(self.confusion[class][class], n_ref)
    }

    /// Computes the F1 score of a class.
    pub fn f1(&self, class: usize) -> Option<f64> {
        let precision = self.precision(class)?;
        let recall = self.recall(class)?;
        if precision + recall == 0.0 {
            return Some(0.0);
        }
        Some(2. * precision * recall / (precision + recall))
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}
