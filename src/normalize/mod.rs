//! Source normalization.
//!
//! # Data Flow
//! ```text
//! route params  → params.rs      ─┐
//! query string  → urlencoded.rs  ─┤
//! form body     → urlencoded.rs  ─┼─→ FieldMap (key → ordered values)
//! JSON body     → json.rs        ─┤
//! XML body      → xml.rs         ─┘
//! ```
//!
//! # Design Decisions
//! - Every source reduces to one [`FieldMap`] so a single structural decoder
//!   serves all of them
//! - Nested data flattens to dotted keys (`profile.email`)
//! - Repeated keys append in appearance order; nothing is overwritten

pub mod json;
pub mod params;
pub mod urlencoded;
pub mod xml;

use std::collections::hash_map::{self, HashMap};

/// Canonical representation of request input: field key to one or more values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, Vec<String>>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values of `key`, keeping earlier ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Record `key` as present, with no values unless some were appended.
    pub fn touch(&mut self, key: impl Into<String>) {
        self.fields.entry(key.into()).or_default();
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    /// First value recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Vec<String>> {
        self.fields.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FieldMap::new();
        for (key, value) in iter {
            fields.append(key, value);
        }
        fields
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, Vec<String>);
    type IntoIter = hash_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = hash_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let fields: FieldMap = [("tag", "a"), ("id", "1"), ("tag", "b"), ("tag", "c")]
            .into_iter()
            .collect();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("tag").unwrap(), ["a", "b", "c"]);
        assert_eq!(fields.first("id"), Some("1"));
        assert_eq!(fields.first("missing"), None);
    }
}
