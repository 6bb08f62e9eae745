// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! String-keyed user attributes attached to model objects.
//!
//! Keys are matched case-insensitively after trimming, and most lookups go
//! through a list of aliases because the same label is spelled differently
//! across drawing templates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered attribute map. Insertion order is preserved for stable output.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any entry whose key matches case-insensitively.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| keys_match(k, &key)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Case-insensitive lookup. Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| keys_match(k, key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First value found among `aliases`, tried in order.
    pub fn get_any(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    /// First alias whose value starts with a finite number.
    ///
    /// Trailing units are ignored, so `"45.5m"` reads as 45.5.
    pub fn get_f64_any(&self, aliases: &[&str]) -> Option<f64> {
        aliases
            .iter()
            .filter_map(|alias| self.get(alias))
            .find_map(parse_leading_f64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k, v);
        }
        attributes
    }
}

#[inline]
fn keys_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Parses the numeric prefix of an attribute value.
pub fn parse_leading_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    match fast_float::parse_partial::<f64, _>(trimmed) {
        Ok((number, consumed)) if consumed > 0 && number.is_finite() => Some(number),
        _ => None,
    }
}
