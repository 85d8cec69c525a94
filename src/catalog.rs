//! Level catalog loading
//!
//! Level data ships as a static JSON file. Two shapes are accepted:
//! - `{ "levels": [ ... ] }`
//! - a bare `[ ... ]` array
//!
//! Entries that can't be decoded as a [`LevelDescriptor`] are skipped, not
//! reported as errors. Only an unreadable file, invalid JSON or a top-level
//! value of the wrong shape fails the load.
//!
//! Tiers must be whole numbers; `1` and `1.0` both mean tier 1.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::MAZE_TYPE;

/// Errors raised while loading a level catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read level data: {0}")]
    Io(#[from] std::io::Error),

    #[error("level data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a level array or an object with a `levels` array, found {0}")]
    UnexpectedShape(&'static str),
}

/// Level identifier as authored in the data file (string or integer)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelId {
    Number(i64),
    Name(String),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Number(n) => write!(f, "{}", n),
            LevelId::Name(s) => f.write_str(s),
        }
    }
}

impl From<&str> for LevelId {
    fn from(s: &str) -> Self {
        LevelId::Name(s.to_string())
    }
}

impl From<String> for LevelId {
    fn from(s: String) -> Self {
        LevelId::Name(s)
    }
}

impl From<i64> for LevelId {
    fn from(n: i64) -> Self {
        LevelId::Number(n)
    }
}

/// Difficulty bucket a level is played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    /// All playable tiers in play order
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    /// Map an authored tier number; anything outside 1..=3 is not playable
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Tier::One),
            2 => Some(Tier::Two),
            3 => Some(Tier::Three),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
            Tier::Three => 3,
        }
    }
}

/// Accept integer tiers and floats with no fractional part
fn deserialize_tier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct TierVisitor;

    impl Visitor<'_> for TierVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole-number tier")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(TierVisitor)
}

/// A single level as loaded from the data file
///
/// `id`, `tier` and `type` are the fields the queue cares about. Everything
/// else (scene, items, hints, ...) belongs to the gameplay screens and is
/// kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub id: LevelId,
    /// Tier number as authored; see [`LevelDescriptor::tier`]
    #[serde(rename = "tier", deserialize_with = "deserialize_tier")]
    pub raw_tier: i64,
    /// Level type (`"maze"`, `"quiz"`, ...). Empty when the file omits it.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LevelDescriptor {
    pub fn new(id: impl Into<LevelId>, raw_tier: i64, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_tier,
            kind: kind.into(),
            extra: Map::new(),
        }
    }

    /// Attach a gameplay field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Playable tier, `None` if the level sits outside tiers 1-3
    pub fn tier(&self) -> Option<Tier> {
        Tier::from_raw(self.raw_tier)
    }

    pub fn is_maze(&self) -> bool {
        self.kind == MAZE_TYPE
    }

    /// Look up a gameplay field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Every level available for a session, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelCatalog {
    levels: Vec<LevelDescriptor>,
    #[serde(skip)]
    skipped: usize,
}

impl LevelCatalog {
    /// Build a catalog from already-decoded levels
    pub fn from_levels(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels, skipped: 0 }
    }

    /// Decode a catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode a catalog from any reader (file, embedded bytes, ...)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Load a catalog from a JSON file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Decode a catalog from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut obj) => match obj.remove("levels") {
                Some(Value::Array(entries)) => entries,
                Some(_) => return Err(CatalogError::UnexpectedShape("a non-array `levels` field")),
                None => return Err(CatalogError::UnexpectedShape("an object without `levels`")),
            },
            Value::Null => return Err(CatalogError::UnexpectedShape("null")),
            Value::Bool(_) => return Err(CatalogError::UnexpectedShape("a boolean")),
            Value::Number(_) => return Err(CatalogError::UnexpectedShape("a number")),
            Value::String(_) => return Err(CatalogError::UnexpectedShape("a string")),
        };

        let mut levels = Vec::with_capacity(entries.len());
        let mut skipped = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<LevelDescriptor>(entry) {
                Ok(level) => levels.push(level),
                Err(e) => {
                    log::warn!("Skipping level entry #{}: {}", index, e);
                    skipped += 1;
                }
            }
        }

        Ok(Self { levels, skipped })
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LevelDescriptor> {
        self.levels.iter()
    }

    /// Number of entries dropped while decoding
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn find(&self, id: &LevelId) -> Option<&LevelDescriptor> {
        self.levels.iter().find(|l| &l.id == id)
    }

    pub fn count_in_tier(&self, tier: Tier) -> usize {
        self.levels.iter().filter(|l| l.tier() == Some(tier)).count()
    }
}

impl<'a> IntoIterator for &'a LevelCatalog {
    type Item = &'a LevelDescriptor;
    type IntoIter = std::slice::Iter<'a, LevelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_and_bare_shapes() {
        let wrapped = r#"{ "levels": [ { "id": "a", "tier": 1, "type": "quiz" } ] }"#;
        let bare = r#"[ { "id": "a", "tier": 1, "type": "quiz" } ]"#;

        let a = LevelCatalog::from_json_str(wrapped).unwrap();
        let b = LevelCatalog::from_json_str(bare).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a.levels(), b.levels());
        assert_eq!(a.levels()[0].tier(), Some(Tier::One));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let catalog = LevelCatalog::from_value(json!([
            { "id": 7, "tier": 2, "type": "maze", "background": "park.png", "items": [1, 2] }
        ]))
        .unwrap();

        let level = &catalog.levels()[0];
        assert_eq!(level.id, LevelId::Number(7));
        assert!(level.is_maze());
        assert_eq!(level.field("background"), Some(&json!("park.png")));
        assert_eq!(level.field("items"), Some(&json!([1, 2])));
        assert!(level.field("id").is_none());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let catalog = LevelCatalog::from_value(json!({
            "levels": [
                { "id": "ok", "tier": 1, "type": "quiz" },
                { "id": "no-tier", "type": "quiz" },
                { "tier": 2, "type": "quiz" },
                { "id": "text-tier", "tier": "two" },
                "not an object",
                { "id": "no-type", "tier": 3 }
            ]
        }))
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped(), 4);
        let no_type = catalog.find(&LevelId::from("no-type")).unwrap();
        assert_eq!(no_type.kind, "");
        assert_eq!(no_type.tier(), Some(Tier::Three));
    }

    #[test]
    fn test_out_of_range_tier_kept_in_catalog() {
        let catalog = LevelCatalog::from_value(json!([
            { "id": "e", "tier": 4, "type": "bonus" },
            { "id": "z", "tier": 0 }
        ]))
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.iter().all(|l| l.tier().is_none()));
        assert_eq!(catalog.count_in_tier(Tier::One), 0);
    }

    #[test]
    fn test_whole_number_float_tier() {
        let catalog = LevelCatalog::from_value(json!([
            { "id": "float", "tier": 1.0, "type": "quiz" },
            { "id": "half", "tier": 1.5, "type": "quiz" },
            { "id": "neg", "tier": -2 }
        ]))
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.skipped(), 1);
        let float = catalog.find(&LevelId::from("float")).unwrap();
        assert_eq!(float.tier(), Some(Tier::One));
        assert_eq!(catalog.find(&LevelId::from("neg")).unwrap().raw_tier, -2);
    }

    #[test]
    fn test_bad_shapes() {
        assert!(matches!(
            LevelCatalog::from_json_str(r#"{ "stages": [] }"#),
            Err(CatalogError::UnexpectedShape(_))
        ));
        assert!(matches!(
            LevelCatalog::from_json_str(r#"{ "levels": {} }"#),
            Err(CatalogError::UnexpectedShape(_))
        ));
        assert!(matches!(
            LevelCatalog::from_json_str("42"),
            Err(CatalogError::UnexpectedShape(_))
        ));
        assert!(matches!(
            LevelCatalog::from_json_str("{ levels"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = LevelCatalog::from_json_str(r#"{ "levels": [] }"#).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.skipped(), 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LevelCatalog::from_path("/definitely/not/here/levels.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    #[test]
    fn test_tier_raw_roundtrip() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_raw(tier.as_raw()), Some(tier));
        }
        assert_eq!(Tier::from_raw(-1), None);
    }
}
