//! Request parameter helpers

/// Parameters that accept a list of field names
pub const LIST_PARAMS: &[&str] = &["fields", "always_list", "allow_null"];

/// Join terms with commas, wrapping each one in double quotes
pub fn join_quoted<S: AsRef<str>>(terms: &[S]) -> String {
    terms
        .iter()
        .map(|t| format!("\"{}\"", t.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Join items with commas as-is
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered parameter list with a few conveniences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an earlier value of the same name
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
        self
    }

    /// Set a list parameter, skipped when the list is empty
    pub fn set_list<S: AsRef<str>>(&mut self, key: &str, items: &[S]) -> &mut Self {
        if !items.is_empty() {
            self.set(key, join_list(items));
        }
        self
    }

    /// Merge passthrough parameters; list-valued names are normalized
    pub fn extend<'a, I>(&mut self, extra: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (k, v) in extra {
            if LIST_PARAMS.contains(&k.as_str()) {
                let items: Vec<&str> = v.split(',').map(str::trim).collect();
                self.set(k, join_list(&items));
            } else {
                self.set(k, v.clone());
            }
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(pos).1)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
