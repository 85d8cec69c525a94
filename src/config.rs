//! Free-form game settings
//!
//! The config cell holds whatever switches the host wants to pass to the
//! screens (sound on/off, text size, debug flags). Keys are kept sorted so
//! snapshots and logs are stable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// String-keyed settings map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameConfig {
    entries: BTreeMap<String, Value>,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Insert or replace a setting, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`GameConfig::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for GameConfig {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let config = GameConfig::new()
            .with("sound", true)
            .with("volume", 0.5)
            .with("language", "ru");

        assert_eq!(config.get_bool("sound"), Some(true));
        assert_eq!(config.get_f64("volume"), Some(0.5));
        assert_eq!(config.get_str("language"), Some("ru"));
        // wrong type reads as missing
        assert_eq!(config.get_bool("volume"), None);
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_set_and_remove() {
        let mut config = GameConfig::new();
        assert!(config.set("sound", true).is_none());
        assert_eq!(config.set("sound", false), Some(json!(true)));
        assert_eq!(config.len(), 1);
        assert_eq!(config.remove("sound"), Some(json!(false)));
        assert!(config.is_empty());
    }

    #[test]
    fn test_json_is_plain_object() {
        let config = GameConfig::new().with("b", 2).with("a", 1);
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"a":1,"b":2}"#);
        let back: GameConfig = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(back, config);
        let keys: Vec<&str> = back.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
