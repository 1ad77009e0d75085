// Configuration module
// Internal representation of user configuration

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::command::Action;
use crate::core::dispatcher::DispatcherSettings;
use crate::core::error::{ConfigError, KeyParseError};
use crate::core::keymap::{KeyTable, Keymaps};

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const DEFAULT_JUMP_LINES: usize = 10;
pub const DEFAULT_SCROLL_LINES: usize = 1;
pub const DEFAULT_VIEW_HEIGHT: usize = 40;
pub const DEFAULT_GRAMMAR: &str = "python";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Count,
    Char,
    Text,
}

/// Settings the engine reads, with the type each must have
const KNOWN_SETTINGS: &[(&str, Kind)] = &[
    ("tab_width", Kind::Count),
    ("leader_key", Kind::Char),
    ("leader_timeout_ms", Kind::Count),
    ("chord_timeout_ms", Kind::Count),
    ("redeliver_unmatched", Kind::Bool),
    ("jump_lines", Kind::Count),
    ("scroll_lines", Kind::Count),
    ("view_height", Kind::Count),
    ("grammar", Kind::Text),
];

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keymaps: Keymaps,
    pub settings: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Config {
    /// Empty tables, built-in setting defaults, plus the default bindings
    pub fn with_defaults() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        crate::user_config::configure(&mut config)?;
        Ok(config)
    }

    /// Bind a chord in one of the key tables
    pub fn bind(&mut self, table: KeyTable, chord: &str, action: Action) -> Result<(), KeyParseError> {
        self.keymaps.table_mut(table).bind(chord, action)
    }

    /// Set a configuration value
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) {
        self.settings.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    fn get_count(&self, key: &str, default: usize) -> usize {
        self.get_int(key)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(default)
    }

    // ==================== Typed settings ====================

    pub fn tab_width(&self) -> usize {
        self.get_count("tab_width", DEFAULT_TAB_WIDTH)
    }

    pub fn leader_key(&self) -> char {
        self.get_string("leader_key")
            .and_then(|s| s.chars().next())
            .unwrap_or(',')
    }

    pub fn leader_timeout_ms(&self) -> u64 {
        self.get_count("leader_timeout_ms", 1000) as u64
    }

    pub fn chord_timeout_ms(&self) -> u64 {
        self.get_count("chord_timeout_ms", 0) as u64
    }

    pub fn redeliver_unmatched(&self) -> bool {
        self.get_bool("redeliver_unmatched").unwrap_or(true)
    }

    pub fn jump_lines(&self) -> usize {
        self.get_count("jump_lines", DEFAULT_JUMP_LINES)
    }

    pub fn scroll_lines(&self) -> usize {
        self.get_count("scroll_lines", DEFAULT_SCROLL_LINES)
    }

    pub fn view_height(&self) -> usize {
        self.get_count("view_height", DEFAULT_VIEW_HEIGHT)
    }

    pub fn grammar(&self) -> String {
        self.get_string("grammar").unwrap_or(DEFAULT_GRAMMAR).to_string()
    }

    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            leader_key: self.leader_key(),
            leader_timeout_ms: self.leader_timeout_ms(),
            chord_timeout_ms: self.chord_timeout_ms(),
            redeliver_unmatched: self.redeliver_unmatched(),
        }
    }

    // ==================== JSON overrides ====================

    /// Merge settings from a JSON object such as `{"tab_width": 2}`.
    /// Unknown keys are kept; known keys must have the right type.
    pub fn apply_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut parsed = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let value: ConfigValue =
                serde_json::from_value(value.clone()).map_err(|_| ConfigError::InvalidValue {
                    key: key.clone(),
                    reason: format!("unsupported value {}", value),
                })?;
            validate(&key, &value)?;
            parsed.push((key, value));
        }
        // Nothing is applied unless every value is valid
        self.settings.extend(parsed);
        Ok(())
    }

    pub fn load_json_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let json = std::fs::read_to_string(path)?;
        self.apply_json(&json)
    }
}

fn validate(key: &str, value: &ConfigValue) -> Result<(), ConfigError> {
    let Some((_, kind)) = KNOWN_SETTINGS.iter().find(|(name, _)| *name == key) else {
        return Ok(());
    };
    let reason = match (kind, value) {
        (Kind::Bool, ConfigValue::Bool(_)) => return Ok(()),
        (Kind::Count, ConfigValue::Int(i)) if *i >= 0 => return Ok(()),
        (Kind::Count, ConfigValue::Int(_)) => "must not be negative",
        (Kind::Char, ConfigValue::String(s)) if s.chars().count() == 1 => return Ok(()),
        (Kind::Char, _) => "expected a single character",
        (Kind::Text, ConfigValue::String(_)) => return Ok(()),
        (Kind::Bool, _) => "expected true or false",
        (Kind::Count, _) => "expected a whole number",
        (Kind::Text, _) => "expected a string",
    };
    Err(ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::motion::Motion;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.keymaps.normal.is_empty());
        assert!(config.settings.is_empty());
        assert_eq!(config.tab_width(), 4);
        assert_eq!(config.leader_key(), ',');
        assert_eq!(config.leader_timeout_ms(), 1000);
        assert_eq!(config.chord_timeout_ms(), 0);
        assert!(config.redeliver_unmatched());
        assert_eq!(config.grammar(), "python");
        assert_eq!(config.dispatcher_settings(), DispatcherSettings::default());
    }

    #[test]
    fn test_bind_key() {
        let mut config = Config::default();
        config.bind(KeyTable::Normal, "Q", Action::Move(Motion::DocumentEnd)).unwrap();
        assert_eq!(config.keymaps.normal.get("Q"), Some(Action::Move(Motion::DocumentEnd)));
        assert!(config.bind(KeyTable::Normal, "", Action::Undo).is_err());
    }

    #[test]
    fn test_set_get_settings() {
        let mut config = Config::default();

        config.set("bool_setting", true);
        assert_eq!(config.get_bool("bool_setting"), Some(true));

        config.set("int_setting", 42);
        assert_eq!(config.get_int("int_setting"), Some(42));

        config.set("string_setting", "hello");
        assert_eq!(config.get_string("string_setting"), Some("hello"));
    }

    #[test]
    fn test_type_mismatch() {
        let mut config = Config::default();
        config.set("val", 10);
        // Should return None if type doesn't match
        assert_eq!(config.get_bool("val"), None);
        assert_eq!(config.get_string("val"), None);
    }

    #[test]
    fn test_config_value_conversions() {
        let b: ConfigValue = true.into();
        assert_eq!(b, ConfigValue::Bool(true));

        let i: ConfigValue = 100i64.into();
        assert_eq!(i, ConfigValue::Int(100));

        let s: ConfigValue = "test".into();
        assert_eq!(s, ConfigValue::String("test".to_string()));
    }

    #[test]
    fn test_apply_json() {
        let mut config = Config::default();
        config
            .apply_json(r#"{"tab_width": 2, "leader_key": ";", "theme": "dark"}"#)
            .unwrap();
        assert_eq!(config.tab_width(), 2);
        assert_eq!(config.leader_key(), ';');
        assert_eq!(config.get_string("theme"), Some("dark"));
    }

    #[test]
    fn test_apply_json_rejects_wrong_types() {
        let mut config = Config::default();
        let err = config
            .apply_json(r#"{"jump_lines": 5, "tab_width": "wide"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "tab_width"));
        assert_eq!(config.jump_lines(), DEFAULT_JUMP_LINES);

        assert!(config.apply_json(r#"{"scroll_lines": -3}"#).is_err());
        assert!(config.apply_json(r#"{"leader_key": "ab"}"#).is_err());
        assert!(config.apply_json(r#"{"nested": [1, 2]}"#).is_err());
        assert!(matches!(config.apply_json("[1]"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripter.json");
        std::fs::write(&path, r#"{"grammar": "blink", "redeliver_unmatched": false}"#).unwrap();
        let mut config = Config::default();
        config.load_json_file(&path).unwrap();
        assert_eq!(config.grammar(), "blink");
        assert!(!config.redeliver_unmatched());
        assert!(matches!(
            config.load_json_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
