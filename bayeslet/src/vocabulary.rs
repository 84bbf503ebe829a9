use hashbrown::HashSet;

use crate::frequency::FrequencyModel;

/// Union of distinct tokens observed across all classes.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    tokens: HashSet<String>,
}

impl Vocabulary {
    /// Collects the tokens of the given frequency models.
    pub fn from_models<'a, I>(models: I) -> Self
    where
        I: IntoIterator<Item = &'a FrequencyModel>,
    {
        let mut tokens = HashSet::new();
        for model in models {
            for (token, _) in model.iter() {
                if !tokens.contains(token) {
                    tokens.insert(token.to_string());
                }
            }
        }
        Self { tokens }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
