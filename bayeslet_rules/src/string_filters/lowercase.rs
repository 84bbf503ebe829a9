use crate::StringFilter;

/// Converts text into lowercase.
#[derive(Clone, Default)]
pub struct LowercaseFilter;

impl<S> StringFilter<S> for LowercaseFilter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        string.as_ref().to_lowercase()
    }
}
