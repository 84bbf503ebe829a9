//! Filters for token sequences.

mod min_length;
mod stopword;

pub use min_length::MinLengthFilter;
pub use stopword::StopwordFilter;
