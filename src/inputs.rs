//! Input Values
//!
//! The editable numeric assumptions of one calculation. Formulas never read
//! the map directly: they go through [`InputValues::get`], which treats an
//! absent key or a non-finite value as zero.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named numeric inputs for a project type calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputValues {
    values: HashMap<String, f64>,
}

impl InputValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numeric field accessor: missing or non-numeric entries read as 0.
    pub fn get(&self, key: &str) -> f64 {
        match self.values.get(key) {
            Some(v) if v.is_finite() => *v,
            _ => 0.0,
        }
    }

    /// The stored value without zero coercion.
    pub fn raw(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Store a value typed as text, coerced the way the form field does.
    pub fn set_text(&mut self, key: impl Into<String>, text: &str) {
        self.set(key, parse_value(text));
    }

    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Coerce user text to a number like `parseFloat(text) || 0`.
///
/// Leading whitespace is skipped and the longest numeric prefix is used, so
/// `"12abc"` reads as 12. Empty, unparseable, zero and non-finite input all
/// become `0.0`.
pub fn parse_value(text: &str) -> f64 {
    let prefix = numeric_prefix(text.trim_start());
    match prefix.parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => 0.0,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when at least one digit follows it
    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    &s[..end]
}
