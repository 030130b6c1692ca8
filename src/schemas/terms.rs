//! Negotiation terms - numeric values keyed by term name

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known term keys
pub const UNIT_PRICE: &str = "unit_price";
pub const VOLUME: &str = "volume";

/// A snapshot of proposed terms, e.g. `{"unit_price": 0.90, "volume": 1000}`.
///
/// Supplied by the caller for concession checks; never stored by the kernel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Terms(BTreeMap<String, f64>);

impl Terms {
    pub fn new() -> Self {
        Terms(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Terms {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Terms(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
