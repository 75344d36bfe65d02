//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object is a valid config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// A named palette entry, `rgb` packed as `0xRRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    pub rgb: u32,
}

impl NamedColor {
    pub fn new(name: &str, rgb: u32) -> Self {
        NamedColor {
            name: name.to_string(),
            rgb,
        }
    }
}

/// Ordered set of colors accepted by `/waypoint create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    pub colors: Vec<NamedColor>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = [
            ("black", 0x000000),
            ("dark_blue", 0x0000AA),
            ("dark_green", 0x00AA00),
            ("dark_aqua", 0x00AAAA),
            ("dark_red", 0xAA0000),
            ("dark_purple", 0xAA00AA),
            ("gold", 0xFFAA00),
            ("gray", 0xAAAAAA),
            ("dark_gray", 0x555555),
            ("blue", 0x5555FF),
            ("green", 0x55FF55),
            ("aqua", 0x55FFFF),
            ("red", 0xFF5555),
            ("light_purple", 0xFF55FF),
            ("yellow", 0xFFFF55),
            ("white", 0xFFFFFF),
        ];
        Palette {
            colors: colors
                .iter()
                .map(|&(name, rgb)| NamedColor::new(name, rgb))
                .collect(),
        }
    }
}

impl Palette {
    pub fn contains(&self, name: &str) -> bool {
        self.colors.iter().any(|c| c.name == name)
    }

    /// Color used when a value cannot be interpreted: "white" if present,
    /// otherwise the first entry
    pub fn fallback(&self) -> &str {
        if self.contains("white") {
            "white"
        } else {
            self.colors.first().map(|c| c.name.as_str()).unwrap_or("white")
        }
    }
}

/// How the data entry is picked out of a zip container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipEntryMatch {
    /// Exact entry name
    pub file_name: String,
    /// Fallback suffix
    pub extension: String,
}

impl Default for ZipEntryMatch {
    fn default() -> Self {
        ZipEntryMatch {
            file_name: "WaypointData.dat".to_string(),
            extension: ".dat".to_string(),
        }
    }
}

impl ZipEntryMatch {
    pub fn matches(&self, entry_name: &str) -> bool {
        entry_name == self.file_name || entry_name.ends_with(&self.extension)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player appended to each command; empty targets whoever runs it
    pub player: String,
    /// Group id for waypoints that name none
    pub default_group_id: String,
    pub y_offset: i32,
    pub z_offset: i32,
    /// Title-cased group name whose waypoints receive the offsets
    pub offset_group: String,
    /// Group ids excluded from command output (exact match)
    pub system_groups: Vec<String>,
    pub palette: Palette,
    pub zip_entry: ZipEntryMatch,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            player: String::new(),
            default_group_id: "Global".to_string(),
            y_offset: -3,
            z_offset: -1,
            offset_group: "Waystones".to_string(),
            system_groups: [
                "journeymap_temp",
                "journeymap_death",
                "journeymap_all",
                "journeymap_default",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            palette: Palette::default(),
            zip_entry: ZipEntryMatch::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.palette.colors.is_empty() {
            return Err(Error::Config("palette must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn is_system_group(&self, group_id: &str) -> bool {
        self.system_groups.iter().any(|g| g == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.player, "");
        assert_eq!(config.default_group_id, "Global");
        assert_eq!((config.y_offset, config.z_offset), (-3, -1));
        assert_eq!(config.palette.colors.len(), 16);
        assert_eq!(config.palette.colors[0].name, "black");
        assert_eq!(config.palette.colors[15].name, "white");
        assert!(config.is_system_group("journeymap_death"));
        assert!(!config.is_system_group("journeymap_deaths"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "player": "Steve", "y_offset": 2 }"#).unwrap();
        assert_eq!(config.player, "Steve");
        assert_eq!(config.y_offset, 2);
        assert_eq!(config.z_offset, -1);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_custom_palette() {
        let config = Config::from_json(
            r#"{ "palette": [ { "name": "ink", "rgb": 0 }, { "name": "paper", "rgb": 16777215 } ] }"#,
        )
        .unwrap();
        assert_eq!(config.palette.colors.len(), 2);
        assert_eq!(config.palette.fallback(), "ink");
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "palette": [] }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zip_entry_match() {
        let m = ZipEntryMatch::default();
        assert!(m.matches("WaypointData.dat"));
        assert!(m.matches("backup/other.dat"));
        assert!(!m.matches("readme.txt"));
    }
}
