use std::io::{Read, Write};

use bincode::{Decode, Encode};
use hashbrown::{HashMap, HashSet};

use crate::errors::{BayesletError, Result};
use crate::frequency::FrequencyModel;

/// Record of the number of occurrences of a token in a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountRecord {
    pub(crate) label: String,
    pub(crate) token: String,
    pub(crate) count: u64,
}

impl CountRecord {
    /// Creates a new record.
    ///
    /// # Arguments
    ///
    /// * `label` - A class label.
    /// * `token` - A token.
    /// * `count` - The number of occurrences of `token` in the class.
    ///
    /// # Returns
    ///
    /// A new record.
    pub fn new(label: String, token: String, count: u64) -> Self {
        Self {
            label,
            token,
            count,
        }
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    pub fn get_token(&self) -> &str {
        &self.token
    }

    pub fn get_count(&self) -> u64 {
        self.count
    }
}

/// Model data.
///
/// Class labels are kept in order. The order is used to break ties between classes.
#[derive(Debug, PartialEq, Decode, Encode)]
pub struct Model {
    pub(crate) labels: Vec<String>,
    pub(crate) frequencies: Vec<FrequencyModel>,
}

impl Model {
    pub(crate) fn new(labels: Vec<String>, frequencies: Vec<FrequencyModel>) -> Result<Self> {
        let model = Self {
            labels,
            frequencies,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.labels.len() != self.frequencies.len() {
            return Err(BayesletError::invalid_model(
                "the number of labels and frequency models must be the same",
            ));
        }
        if self.labels.is_empty() {
            return Err(BayesletError::invalid_model("no class is defined"));
        }
        let mut seen = HashSet::new();
        for label in &self.labels {
            if label.is_empty() {
                return Err(BayesletError::invalid_model("empty class label"));
            }
            if !seen.insert(label.as_str()) {
                return Err(BayesletError::invalid_model(format!(
                    "duplicate class label: {label}"
                )));
            }
        }
        for (label, freq) in self.labels.iter().zip(&self.frequencies) {
            if !freq.is_consistent() {
                return Err(BayesletError::invalid_model(format!(
                    "inconsistent counts of class {label}"
                )));
            }
        }
        Ok(())
    }

    /// Gets class labels in the tie-break order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Gets the frequency model of the class `label`.
    pub fn frequency(&self, label: &str) -> Option<&FrequencyModel> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| &self.frequencies[i])
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let config = bincode::config::standard();
        bincode::encode_into_std_write(self, wtr, config)?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    /// [`BayesletError::InvalidModel`] will be returned if the decoded data is broken.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let config = bincode::config::standard();
        let model: Self = bincode::decode_from_std_read(rdr, config)?;
        model.validate()?;
        Ok(model)
    }

    /// Dumps counts of all classes.
    ///
    /// Records are grouped by class in the tie-break order, and sorted by descending count and
    /// then by token within each class.
    pub fn dump_counts(&self) -> Vec<CountRecord> {
        let mut records = vec![];
        for (label, freq) in self.labels.iter().zip(&self.frequencies) {
            let mut counts: Vec<_> = freq.iter().collect();
            counts.sort_unstable_by(|(token_a, count_a), (token_b, count_b)| {
                count_b.cmp(count_a).then_with(|| token_a.cmp(token_b))
            });
            for (token, count) in counts {
                records.push(CountRecord::new(label.clone(), token.to_string(), count));
            }
        }
        records
    }

    /// Creates a model from count records.
    ///
    /// # Arguments
    ///
    /// * `labels` - Class labels in the tie-break order. A class without records has an empty
    ///              corpus.
    /// * `records` - Token counts.
    ///
    /// # Errors
    ///
    /// [`BayesletError::InvalidArgument`] will be returned if `labels` is empty or has an empty
    /// or duplicate label, if a record refers to an undeclared class or has a zero count, if the
    /// same token appears twice in a class, or if the total count of a class overflows.
    pub fn from_counts<L, S, I>(labels: L, records: I) -> Result<Self>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = CountRecord>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(BayesletError::invalid_argument(
                "labels",
                "at least one class is required",
            ));
        }
        let mut ids = HashMap::new();
        for (id, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(BayesletError::invalid_argument(
                    "labels",
                    "label must not be empty",
                ));
            }
            if ids.insert(label.as_str(), id).is_some() {
                return Err(BayesletError::invalid_argument(
                    "labels",
                    format!("duplicate class label: {label}"),
                ));
            }
        }

        let mut counts: Vec<HashMap<String, u64>> = vec![HashMap::new(); labels.len()];
        for CountRecord {
            label,
            token,
            count,
        } in records
        {
            let id = *ids.get(label.as_str()).ok_or_else(|| {
                BayesletError::invalid_argument("records", format!("undeclared class: {label}"))
            })?;
            if count == 0 {
                return Err(BayesletError::invalid_argument(
                    "records",
                    format!("zero count of token {token} in class {label}"),
                ));
            }
            if counts[id].insert(token, count).is_some() {
                return Err(BayesletError::invalid_argument(
                    "records",
                    format!("duplicate token in class {label}"),
                ));
            }
        }

        let mut frequencies = Vec::with_capacity(counts.len());
        for (label, counts) in labels.iter().zip(counts) {
            frequencies.push(FrequencyModel::from_counts(counts).ok_or_else(|| {
                BayesletError::invalid_argument(
                    "records",
                    format!("total count of class {label} overflows"),
                )
            })?);
        }
        drop(ids);
        Self::new(labels, frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::trainer::Trainer;

    fn sample_model() -> Model {
        Model::new(
            vec!["pos".to_string(), "neg".to_string()],
            vec![
                FrequencyModel::from_tokens(["good", "great", "good"]),
                FrequencyModel::from_tokens(["bad", "awful", "bad"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_read() {
        let model = sample_model();
        let mut data = vec![];
        model.write(&mut data).unwrap();

        let decoded = Model::read(&mut data.as_slice()).unwrap();

        assert_eq!(model, decoded);
        assert_eq!(&["pos", "neg"], decoded.labels());
    }

    #[test]
    fn test_read_truncated() {
        let model = sample_model();
        let mut data = vec![];
        model.write(&mut data).unwrap();
        data.truncate(data.len() / 2);

        assert!(Model::read(&mut data.as_slice()).is_err());
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let result = Model::new(vec!["pos".to_string()], vec![]);

        assert!(matches!(result, Err(BayesletError::InvalidModel(_))));
    }

    #[test]
    fn test_new_duplicate_labels() {
        let result = Model::new(
            vec!["pos".to_string(), "pos".to_string()],
            vec![FrequencyModel::default(), FrequencyModel::default()],
        );

        assert!(matches!(result, Err(BayesletError::InvalidModel(_))));
    }

    #[test]
    fn test_dump_counts() {
        let model = sample_model();

        let records = model.dump_counts();

        assert_eq!(
            vec![
                CountRecord::new("pos".into(), "good".into(), 2),
                CountRecord::new("pos".into(), "great".into(), 1),
                CountRecord::new("neg".into(), "bad".into(), 2),
                CountRecord::new("neg".into(), "awful".into(), 1),
            ],
            records
        );
    }

    #[test]
    fn test_from_counts() {
        let model = sample_model();

        let rebuilt = Model::from_counts(model.labels(), model.dump_counts()).unwrap();

        assert_eq!(model, rebuilt);
    }

    #[test]
    fn test_from_counts_keeps_empty_class() {
        let mut trainer = Trainer::new();
        trainer.add_class("neg").unwrap();
        trainer.push_tokens("pos", ["good"]).unwrap();
        let model = trainer.train().unwrap();

        let rebuilt = Model::from_counts(model.labels(), model.dump_counts()).unwrap();

        assert_eq!(&["neg", "pos"], rebuilt.labels());
        assert_eq!(0, rebuilt.frequency("neg").unwrap().total());
        assert_eq!(model, rebuilt);
    }

    #[test]
    fn test_from_counts_undeclared_class() {
        let result = Model::from_counts(
            ["pos"],
            vec![CountRecord::new("neg".into(), "bad".into(), 1)],
        );

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_counts_duplicate_label() {
        let result = Model::from_counts(["pos", "pos"], vec![]);

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_counts_total_overflow() {
        let result = Model::from_counts(
            ["pos"],
            vec![
                CountRecord::new("pos".into(), "good".into(), u64::MAX),
                CountRecord::new("pos".into(), "great".into(), 1),
            ],
        );

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_counts_large_count() {
        let count = u64::from(u32::MAX) + 1;
        let model = Model::from_counts(
            ["pos"],
            vec![CountRecord::new("pos".into(), "good".into(), count)],
        )
        .unwrap();

        assert_eq!(count, model.frequency("pos").unwrap().count("good"));
        assert_eq!(Some(0.0), model.frequency("pos").unwrap().log_prob("good"));
    }

    #[test]
    fn test_from_counts_duplicate_token() {
        let result = Model::from_counts(
            ["pos"],
            vec![
                CountRecord::new("pos".into(), "good".into(), 2),
                CountRecord::new("pos".into(), "good".into(), 1),
            ],
        );

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_counts_zero_count() {
        let result = Model::from_counts(
            ["pos"],
            vec![CountRecord::new("pos".into(), "good".into(), 0)],
        );

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_counts_empty() {
        let result = Model::from_counts(Vec::<String>::new(), vec![]);

        assert!(matches!(result, Err(BayesletError::InvalidArgument(_))));
    }

    #[test]
    fn test_frequency() {
        let model = sample_model();

        assert_eq!(2, model.frequency("neg").unwrap().count("bad"));
        assert!(model.frequency("neutral").is_none());
    }
}
