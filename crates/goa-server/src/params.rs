//! Request parameter bag
//!
//! An open, named carrier for request-derived values (track ids, spans,
//! filters, pagination) passed between the route layer and the helpers.
//! Validation happens upstream in the per-parameter extractors; this type
//! only stores, echoes, and serializes.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys that never appear in the request echo: internal plumbing values and
/// the raw, unparsed filter string (the parsed token list under
/// `filter_tokens` is echoed instead, avoiding double-encoding ambiguity).
const INTERNAL_KEYS: &[&str] = &["span", "_tracks", "filter"];

/// Open mapping of request parameter name to value
///
/// Backed by a `BTreeMap` so every serialization of the bag (request echo,
/// cache-key fragments) is deterministically ordered.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: BTreeMap<String, Value>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.values
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }

    /// List-valued accessor; a scalar string is treated as a one-element list
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        match self.values.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    pub fn update(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn set_str(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.update(key, Value::String(value.into()));
    }

    /// The parameter echo included in every response: sorted, with internal
    /// keys stripped
    pub fn echo(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter(|(k, _)| !INTERNAL_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Alphabetically-sorted `key=value&...` fragment for cache-key
    /// derivation, skipping the given keys
    pub fn query_fragment(&self, exclude: &[&str]) -> String {
        self.values
            .iter()
            .filter(|(k, _)| !exclude.contains(&k.as_str()))
            .map(|(k, v)| format!("{}={}", k, render_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Parameters {
        let mut params = Parameters::new();
        params.set_str("track", "NGEN000123");
        params.set_str("assembly", "GRCh38");
        params.set_str("span", "chr19:1000-2000");
        params.update("page", json!(2));
        params.set_str("filter", "datasource eq FILER");
        params.update("filter_tokens", json!(["datasource", "eq", "FILER"]));
        params
    }

    #[test]
    fn test_echo_strips_internal_keys() {
        let echo = sample().echo();
        assert!(!echo.contains_key("span"));
        assert!(!echo.contains_key("filter"));
        assert!(echo.contains_key("filter_tokens"));
        assert!(echo.contains_key("track"));
    }

    #[test]
    fn test_query_fragment_is_sorted() {
        let fragment = sample().query_fragment(&[]);
        assert!(fragment.starts_with("assembly=GRCh38&filter="));
        let keys: Vec<&str> = fragment.split('&').map(|kv| kv.split('=').next().unwrap()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_query_fragment_exclusions() {
        let fragment = sample().query_fragment(&["page", "filter_tokens"]);
        assert!(!fragment.contains("page="));
        assert!(!fragment.contains("filter_tokens="));
        assert!(fragment.contains("track=NGEN000123"));
    }

    #[test]
    fn test_get_list_accepts_scalar() {
        let mut params = Parameters::new();
        params.set_str("_tracks", "NGEN000123");
        assert_eq!(params.get_list("_tracks").unwrap(), vec!["NGEN000123"]);

        params.update("_tracks", json!(["a", "b"]));
        assert_eq!(params.get_list("_tracks").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_update_overwrites() {
        let mut params = sample();
        params.update("page", json!(3));
        assert_eq!(params.get_usize("page"), Some(3));
    }
}
