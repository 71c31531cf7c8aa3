//! # Query String Builder
//!
//! [`UrlBuilder`] keeps query parameters in insertion order. Re-adding a
//! name replaces its value in place. Rendering percent-encodes values with
//! `urlencoding`; names are written as given.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlBuilder {
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`.
    pub fn add(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Set every pair from `params`, in iteration order.
    pub fn add_all<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (name, value) in params {
            self.add(name, value);
        }
        self
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.params.retain(|(n, _)| n != name);
        self
    }

    /// The value of `name`. Empty values read as `None`.
    pub fn read(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn clear(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// True when every one of `keys` is set.
    pub fn has_value(&self, keys: &[&str]) -> bool {
        keys.iter()
            .all(|key| self.params.iter().any(|(n, _)| n == key))
    }

    /// The raw values of `keys` joined by `delimiter`. Unset keys
    /// contribute an empty string.
    pub fn to_one(&self, keys: &[&str], delimiter: &str) -> String {
        keys.iter()
            .map(|key| self.read(key).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

impl fmt::Display for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{name}={}", urlencoding::encode(value))?;
        }
        Ok(())
    }
}
