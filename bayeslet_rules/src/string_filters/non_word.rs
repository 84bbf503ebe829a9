use crate::StringFilter;

/// Replaces each run of non-word characters with a single space.
///
/// Word characters are alphanumerics and `_`.
#[derive(Clone, Default)]
pub struct NonWordFilter;

impl NonWordFilter {
    #[inline(always)]
    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }
}

impl<S> StringFilter<S> for NonWordFilter
where
    S: AsRef<str>,
{
    fn filter(&self, string: S) -> String {
        let string = string.as_ref();
        let mut result = String::with_capacity(string.len());
        let mut in_word = true;
        for c in string.chars() {
            if Self::is_word_char(c) {
                result.push(c);
                in_word = true;
            } else if in_word {
                result.push(' ');
                in_word = false;
            }
        }
        result
    }
}
