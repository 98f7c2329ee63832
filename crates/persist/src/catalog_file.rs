//! Theme catalog description (JSON).
//!
//! ```text
//! {
//!   "themes": [
//!     {
//!       "name": "Fruit",
//!       "icon": "fruit_icon",
//!       "shape_sprites": ["apple", "banana", null, "cherry"],
//!       "slot_sprites": [],
//!       "level_count": 3
//!     }
//!   ]
//! }
//! ```
//!
//! Sprite arrays follow `ShapeType` order. Every field is optional; a missing,
//! zero or negative `level_count` means a single level.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Theme, ThemeCatalog};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub themes: Vec<ThemeEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub shape_sprites: Vec<Option<String>>,
    #[serde(default)]
    pub slot_sprites: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_count: Option<i64>,
}

impl From<ThemeEntry> for Theme {
    fn from(entry: ThemeEntry) -> Self {
        Self {
            name: entry.name,
            icon: entry.icon,
            shape_sprites: entry.shape_sprites,
            slot_sprites: entry.slot_sprites,
            level_count: entry
                .level_count
                .filter(|&n| n >= 1)
                .map(|n| n.min(u32::MAX as i64) as u32),
        }
    }
}

impl From<CatalogFile> for ThemeCatalog {
    fn from(file: CatalogFile) -> Self {
        ThemeCatalog::new(file.themes.into_iter().map(Theme::from).collect())
    }
}

pub fn parse_catalog(json: &str) -> Result<ThemeCatalog> {
    let file: CatalogFile = serde_json::from_str(json).context("parsing theme catalog")?;
    Ok(file.into())
}

pub fn load_catalog(path: &Path) -> Result<ThemeCatalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading theme catalog {}", path.display()))?;
    let catalog = parse_catalog(&text)
        .with_context(|| format!("in theme catalog {}", path.display()))?;
    info!(path = %path.display(), themes = catalog.len(), "theme catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeType;

    #[test]
    fn test_parse_full_entry() {
        let catalog = parse_catalog(
            r#"{"themes":[{"name":"Fruit","icon":"fruit_icon",
                "shape_sprites":["apple",null,"cherry"],
                "slot_sprites":["apple_slot"],"level_count":3}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        let theme = catalog.get(0).unwrap();
        assert_eq!(theme.name, "Fruit");
        assert_eq!(theme.icon.as_deref(), Some("fruit_icon"));
        assert_eq!(theme.shape_sprite(ShapeType::Shape1), Some("apple"));
        assert_eq!(theme.shape_sprite(ShapeType::Shape2), None);
        assert_eq!(theme.shape_sprite(ShapeType::Shape3), Some("cherry"));
        assert_eq!(theme.total_levels(), 3);
    }

    #[test]
    fn test_invalid_level_count_falls_back() {
        let catalog = parse_catalog(
            r#"{"themes":[{"name":"A","level_count":-2},{"name":"B","level_count":0},{"name":"C"}]}"#,
        )
        .unwrap();
        for theme in catalog.themes() {
            assert_eq!(theme.level_count, None);
            assert_eq!(theme.total_levels(), 1);
        }
    }

    #[test]
    fn test_empty_object_is_empty_catalog() {
        assert!(parse_catalog("{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_catalog("[1,2").is_err());
    }
}
