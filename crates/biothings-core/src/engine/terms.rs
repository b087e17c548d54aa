//! Normalization of identifier and query-term inputs
//!
//! Callers may pass a comma-separated string, a slice, a vector, an array or any
//! iterator; all of them become a lazy [`Terms`] sequence of strings.

/// Ordered, lazily produced sequence of identifiers or query terms
pub struct Terms<'a> {
    inner: Box<dyn Iterator<Item = String> + Send + 'a>,
}

impl<'a> Terms<'a> {
    /// Wrap any iterator of displayable items without consuming it
    pub fn lazy<I>(iter: I) -> Self
    where
        I: IntoIterator + 'a,
        I::IntoIter: Send + 'a,
        I::Item: ToString,
    {
        Self {
            inner: Box::new(iter.into_iter().map(|item| item.to_string())),
        }
    }

    /// Split a comma-separated string; an empty string yields no terms
    pub fn from_delimited(s: &str) -> Self {
        let terms: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self::lazy(terms)
    }

    /// Rewrite each term as it is pulled
    pub fn map_terms<F>(self, f: F) -> Self
    where
        F: FnMut(String) -> String + Send + 'a,
    {
        Self {
            inner: Box::new(self.inner.map(f)),
        }
    }
}

impl Iterator for Terms<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }
}

impl std::fmt::Debug for Terms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Terms { .. }")
    }
}

/// Conversion into a [`Terms`] sequence
pub trait IntoTerms<'a> {
    fn into_terms(self) -> Terms<'a>;
}

impl<'a> IntoTerms<'a> for Terms<'a> {
    fn into_terms(self) -> Terms<'a> {
        self
    }
}

impl<'a> IntoTerms<'a> for &'a str {
    fn into_terms(self) -> Terms<'a> {
        Terms::from_delimited(self)
    }
}

impl<'a> IntoTerms<'a> for String {
    fn into_terms(self) -> Terms<'a> {
        Terms::from_delimited(&self)
    }
}

impl<'a> IntoTerms<'a> for &'a String {
    fn into_terms(self) -> Terms<'a> {
        Terms::from_delimited(self)
    }
}

impl<'a, T> IntoTerms<'a> for Vec<T>
where
    T: ToString + Send + 'a,
{
    fn into_terms(self) -> Terms<'a> {
        Terms::lazy(self)
    }
}

impl<'a, T> IntoTerms<'a> for &'a Vec<T>
where
    T: ToString + Sync,
{
    fn into_terms(self) -> Terms<'a> {
        Terms::lazy(self.iter().map(|t| t.to_string()))
    }
}

impl<'a, T> IntoTerms<'a> for &'a [T]
where
    T: ToString + Sync,
{
    fn into_terms(self) -> Terms<'a> {
        Terms::lazy(self.iter().map(|t| t.to_string()))
    }
}

impl<'a, T, const N: usize> IntoTerms<'a> for [T; N]
where
    T: ToString + Send + 'a,
{
    fn into_terms(self) -> Terms<'a> {
        Terms::lazy(self)
    }
}

impl<'a, T, const N: usize> IntoTerms<'a> for &'a [T; N]
where
    T: ToString + Sync,
{
    fn into_terms(self) -> Terms<'a> {
        Terms::lazy(self.iter().map(|t| t.to_string()))
    }
}
