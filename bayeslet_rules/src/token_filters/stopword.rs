use std::io::{self, BufRead};

use hashbrown::HashSet;

use crate::TokenFilter;

/// Removes stop words.
#[derive(Clone, Default)]
pub struct StopwordFilter {
    words: HashSet<String>,
}

impl StopwordFilter {
    /// Creates a new StopwordFilter.
    ///
    /// # Arguments
    ///
    /// * `words` - Stop words. Matching is exact, so the words must be normalized in the same way
    ///             as the tokens.
    ///
    /// # Returns
    ///
    /// A new StopwordFilter.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads stop words, one per line. Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    pub fn from_reader<R>(rdr: R) -> io::Result<Self>
    where
        R: BufRead,
    {
        let mut words = HashSet::new();
        for line in rdr.lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.insert(word.to_string());
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl TokenFilter for StopwordFilter {
    fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        tokens.retain(|token| !self.words.contains(token));
        tokens
    }
}
