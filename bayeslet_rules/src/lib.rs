//! # bayeslet_rules
//!
//! Rule-base filters that normalize text and tokens before they are passed to Bayeslet.
//!
//! The same filters must be applied to training and test data.
//!
//! ## Examples
//!
//! ```
//! use bayeslet_rules::{
//!     string_filters::{LowercaseFilter, NonWordFilter},
//!     token_filters::{MinLengthFilter, StopwordFilter},
//!     StringFilter, TokenFilter,
//! };
//!
//! let text = NonWordFilter.filter(LowercaseFilter.filter("The movie was GREAT, a joy!"));
//! let tokens: Vec<String> = text.split_whitespace().map(String::from).collect();
//! let tokens = StopwordFilter::new(["the", "was"]).filter(tokens);
//! let tokens = MinLengthFilter::new(2).filter(tokens);
//!
//! assert_eq!(vec!["movie", "great", "joy"], tokens);
//! ```

pub mod string_filters;
pub mod token_filters;

/// Filter that rewrites a raw string before tokenization.
pub trait StringFilter<S>
where
    S: AsRef<str>,
{
    /// Filter a specified string.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input text.
    ///
    /// # Returns
    ///
    /// A processed text.
    fn filter(&self, string: S) -> String;
}

/// Filter that processes tokens after tokenization.
pub trait TokenFilter {
    /// Filter specified tokens.
    ///
    /// # Arguments:
    ///
    /// * `tokens` - Input tokens.
    ///
    /// # Returns
    ///
    /// Processed tokens.
    fn filter(&self, tokens: Vec<String>) -> Vec<String>;
}
