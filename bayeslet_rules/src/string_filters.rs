//! Filters for raw strings.

mod lowercase;
mod non_word;

pub use lowercase::LowercaseFilter;
pub use non_word::NonWordFilter;
