//! Frontend per-system options
//!
//! The frontend hands over a flat `name -> value` table. Values arrive as
//! YAML scalars of any type and are kept as their string form, which is what
//! the emulator config files want.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed access to the option table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, String>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the frontend provided the option at all
    pub fn is_set(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Boolean option given as an integer (`0`/`1`) or `true`/`false`.
    ///
    /// Unset or unparsable values yield `default`.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::trim) {
            Some("true") => true,
            Some("false") => false,
            Some(v) => v.parse::<i64>().map(|n| n != 0).unwrap_or(default),
            None => default,
        }
    }

    /// Integer option; unset or unparsable values yield `default`.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Overlay `other` on top of these options; `other` wins.
    pub fn merge(&mut self, other: &Options) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for Options {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, serde_yaml::Value>>::deserialize(deserializer)?;
        let mut options = Options::new();
        for (key, value) in raw.unwrap_or_default() {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Null => continue,
                other => {
                    return Err(de::Error::custom(format!(
                        "option '{}' must be a scalar, got {:?}",
                        key, other
                    )))
                }
            };
            options.insert(key, value);
        }
        Ok(options)
    }
}
