//! Ordered query-string options. Each endpoint pushes its optional fields in
//! a fixed declaration order; zero values are skipped so only fields the
//! caller actually set reach the node.

use std::fmt::Display;

/// A single `key=value` query-string entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOption {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: Vec<QueryOption>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` unless `value` is empty.
    pub fn push_str(&mut self, key: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.entries.push(QueryOption {
                key,
                value: value.to_owned(),
            });
        }
        self
    }

    /// Appends `key` with the base-10 rendering of `value` unless it is zero.
    pub fn push_int<T>(&mut self, key: &'static str, value: T) -> &mut Self
    where
        T: Default + PartialEq + Display,
    {
        if value != T::default() {
            self.entries.push(QueryOption {
                key,
                value: value.to_string(),
            });
        }
        self
    }

    /// Appends `key=true` when the flag is set.
    pub fn push_flag(&mut self, key: &'static str, value: bool) -> &mut Self {
        if value {
            self.entries.push(QueryOption {
                key,
                value: "true".to_owned(),
            });
        }
        self
    }

    /// Appends every value of a repeated key, skipping empty ones.
    pub fn push_each<'a, I>(&mut self, key: &'static str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for value in values {
            self.push_str(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The encoded sequence as `(key, value)` pairs, in insertion order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.key, entry.value.as_str()))
            .collect()
    }

    /// Percent-encodes the options into a query string without the leading
    /// `?`. Empty when no option is set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for entry in &self.entries {
            serializer.append_pair(entry.key, &entry.value);
        }
        serializer.finish()
    }
}
