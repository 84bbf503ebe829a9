use unicode_segmentation::UnicodeSegmentation;

use crate::TokenFilter;

/// Removes tokens shorter than the given number of grapheme clusters.
#[derive(Clone)]
pub struct MinLengthFilter {
    min_length: usize,
}

impl MinLengthFilter {
    /// Creates a new MinLengthFilter.
    ///
    /// # Arguments
    ///
    /// * `min_length` - The minimum number of grapheme clusters to keep a token.
    ///
    /// # Returns
    ///
    /// A new MinLengthFilter.
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl TokenFilter for MinLengthFilter {
    fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        if self.min_length == 0 {
            return tokens;
        }
        tokens.retain(|token| token.graphemes(true).nth(self.min_length - 1).is_some());
        tokens
    }
}
