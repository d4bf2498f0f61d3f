//! Plugin settings
//!
//! The engine keeps settings for every plugin in one INI file (`DynRPG.ini`),
//! one `[section]` per plugin. This module reads the section named after the
//! plugin into a flat key/value map. No setting drives the overlay yet; the
//! map is loaded at startup so new tunables can be read from it.

use crate::error::GaugeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Key/value settings from the plugin's INI section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginConfig {
    values: HashMap<String, String>,
}

impl PluginConfig {
    /// Reads `plugin_name`'s section from the settings file at `path`
    ///
    /// A missing file or section gives an empty config. Only a file that
    /// exists but can't be read is an error.
    pub fn load(path: &Path, plugin_name: &str) -> Result<Self, GaugeError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("Settings file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GaugeError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::parse(&contents, plugin_name);
        log::info!("Loaded {} setting(s) for [{}]", config.len(), plugin_name);
        Ok(config)
    }

    /// Parses the section named `section` out of INI text
    ///
    /// Section names match case-insensitively, as the engine does. Lines
    /// starting with `;` or `#` are comments. Later duplicate keys win.
    pub fn parse(contents: &str, section: &str) -> Self {
        let mut values = HashMap::new();
        let mut in_section = false;

        for line in contents.lines() {
            let line = line.trim().trim_start_matches('\u{feff}');
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = name.trim().eq_ignore_ascii_case(section);
                continue;
            }

            if !in_section {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        PluginConfig { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Reads a flag; accepts `true/false`, `yes/no`, `on/off` and `1/0`
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key)?.parse().ok()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI: &str = "\
[QuickPatches]
Speed=2

[dyngauge]
; shown over every monster
ShowMonsters = true
Offset=-12
Name = Gauge = Bar
#comment

[Other]
ShowMonsters=false
";

    #[test]
    fn test_reads_only_own_section() {
        let config = PluginConfig::parse(INI, "DynGauge");
        assert_eq!(config.len(), 3);
        assert_eq!(config.get_bool("ShowMonsters"), Some(true));
        assert_eq!(config.get("Speed"), None);
    }

    #[test]
    fn test_typed_values() {
        let config = PluginConfig::parse(INI, "DynGauge");
        assert_eq!(config.get_i32("Offset"), Some(-12));
        assert_eq!(config.get_i32("ShowMonsters"), None);
        assert_eq!(config.get("Name"), Some("Gauge = Bar"));
    }

    #[test]
    fn test_missing_section_is_empty() {
        let config = PluginConfig::parse(INI, "NotThere");
        assert!(config.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let config = PluginConfig::load(Path::new("no/such/DynRPG.ini"), "DynGauge").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let config = PluginConfig::parse("[a]\nk=v\n", "a");
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"k":"v"}"#);
    }
}
