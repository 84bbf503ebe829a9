use crate::errors::{BayesletError, Result};
use crate::frequency::FrequencyModel;
use crate::model::Model;
use crate::utils::Indexer;

/// Trainer.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use std::io::{prelude::*, BufReader, BufWriter};
///
/// use bayeslet::Trainer;
///
/// let mut trainer = Trainer::new();
/// for label in ["pos", "neg"] {
///     let f = BufReader::new(File::open(format!("train/{label}.txt")).unwrap());
///     for line in f.lines() {
///         trainer.push_tokens(label, line.unwrap().split_whitespace()).unwrap();
///     }
/// }
///
/// let model = trainer.train().unwrap();
/// let mut f = BufWriter::new(File::create("model.bin").unwrap());
/// model.write(&mut f).unwrap();
/// ```
pub struct Trainer {
    labels: Indexer<String>,
    frequencies: Vec<FrequencyModel>,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Trainer {
    /// Creates a new trainer without any classes.
    pub fn new() -> Self {
        Self {
            labels: Indexer::new(),
            frequencies: vec![],
        }
    }

    /// Declares a class. Classes are ordered by their first declaration, and the order is used to
    /// break ties in classification.
    ///
    /// # Arguments
    ///
    /// * `label` - A class label.
    ///
    /// # Returns
    ///
    /// The ID of the class.
    ///
    /// # Errors
    ///
    /// [`BayesletError::InvalidArgument`] will be returned if `label` is empty.
    pub fn add_class(&mut self, label: &str) -> Result<usize> {
        if label.is_empty() {
            return Err(BayesletError::invalid_argument(
                "label",
                "must not be empty",
            ));
        }
        let id = self.labels.get_id(label);
        if id == self.frequencies.len() {
            self.frequencies.push(FrequencyModel::default());
        }
        Ok(id)
    }

    /// Adds tokens to the corpus of a class. The class is declared if it is new.
    ///
    /// # Arguments
    ///
    /// * `label` - A class label.
    /// * `tokens` - Tokens to count.
    ///
    /// # Returns
    ///
    /// The number of added tokens.
    ///
    /// # Errors
    ///
    /// [`BayesletError::InvalidArgument`] will be returned if `label` is empty.
    pub fn push_tokens<I, S>(&mut self, label: &str, tokens: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = self.add_class(label)?;
        let freq = &mut self.frequencies[id];
        let before = freq.total();
        freq.extend(tokens);
        Ok((freq.total() - before) as usize)
    }

    /// Gets the number of classes.
    pub fn n_classes(&self) -> usize {
        self.frequencies.len()
    }

    /// Gets the total number of tokens over all classes.
    pub fn n_tokens(&self) -> u64 {
        self.frequencies.iter().map(FrequencyModel::total).sum()
    }

    /// Finishes counting.
    ///
    /// # Returns
    ///
    /// A trained model.
    ///
    /// # Errors
    ///
    /// [`BayesletError::InvalidArgument`] will be returned if no class is declared.
    pub fn train(self) -> Result<Model> {
        if self.frequencies.is_empty() {
            return Err(BayesletError::invalid_argument(
                "trainer",
                "at least one class is required",
            ));
        }
        Model::new(self.labels.into_keys(), self.frequencies)
    }
}
