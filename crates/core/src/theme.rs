//! Theme catalog - swappable visual skins.
//!
//! A theme maps each [`ShapeType`] to a sprite name and carries the number of
//! levels played with it. Themes never influence matching.

use crate::slot::Slot;
use crate::types::ShapeType;

/// A theme-select menu button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChoice {
    pub index: usize,
    pub label: String,
    pub icon: Option<String>,
}

/// One visual skin. Sprite vectors are indexed by [`ShapeType::index`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Theme {
    pub name: String,
    pub icon: Option<String>,
    pub shape_sprites: Vec<Option<String>>,
    /// Optional dedicated slot art; falls back to `shape_sprites`.
    pub slot_sprites: Vec<Option<String>>,
    pub level_count: Option<u32>,
}

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn shape_sprite(&self, kind: ShapeType) -> Option<&str> {
        let index = kind.index()?;
        self.shape_sprites.get(index)?.as_deref()
    }

    /// Sprite for a slot: the slot's own override when it opts out of theme
    /// art, else the dedicated slot sprite, else the shape sprite.
    pub fn slot_sprite<'a>(&'a self, slot: &'a Slot) -> Option<&'a str> {
        if !slot.use_theme_sprite {
            if let Some(sprite) = slot.override_sprite.as_deref() {
                return Some(sprite);
            }
        }
        let dedicated = slot
            .accepted
            .index()
            .and_then(|i| self.slot_sprites.get(i))
            .and_then(|s| s.as_deref());
        dedicated.or_else(|| self.shape_sprite(slot.accepted))
    }

    /// Levels in this theme. Unset or zero counts as one.
    pub fn total_levels(&self) -> u32 {
        match self.level_count {
            Some(n) if n >= 1 => n,
            _ => 1,
        }
    }
}

/// The selection copied into a session when play starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTheme {
    /// `None` when the catalog is empty.
    pub index: Option<usize>,
    pub total_levels: u32,
}

impl Default for ActiveTheme {
    fn default() -> Self {
        Self {
            index: None,
            total_levels: 1,
        }
    }
}

/// Every theme available to the player. Loaded once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }

    /// Single theme whose sprites are named after the shape types.
    pub fn builtin() -> Self {
        let sprites = ShapeType::ALL
            .iter()
            .map(|k| Some(k.as_str().to_string()))
            .collect();
        Self::new(vec![Theme {
            name: "Shapes".to_string(),
            icon: None,
            shape_sprites: sprites,
            slot_sprites: Vec::new(),
            level_count: Some(2),
        }])
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn get(&self, index: usize) -> Option<&Theme> {
        self.themes.get(index)
    }

    /// Clamp an index into the catalog; `None` only when it is empty.
    pub fn clamp_index(&self, index: i64) -> Option<usize> {
        if self.themes.is_empty() {
            return None;
        }
        let last = self.themes.len() - 1;
        Some(index.clamp(0, last as i64) as usize)
    }

    /// Button label for a theme.
    pub fn display_name(&self, index: usize) -> String {
        match self.themes.get(index) {
            Some(theme) if !theme.name.is_empty() => theme.name.clone(),
            _ => format!("Theme {}", index + 1),
        }
    }

    /// One menu button per theme, in catalog order.
    pub fn choices(&self) -> Vec<ThemeChoice> {
        self.themes
            .iter()
            .enumerate()
            .map(|(index, theme)| ThemeChoice {
                index,
                label: self.display_name(index),
                icon: theme.icon.clone(),
            })
            .collect()
    }

    pub fn activate(&self, index: i64) -> ActiveTheme {
        match self.clamp_index(index) {
            Some(i) => ActiveTheme {
                index: Some(i),
                total_levels: self.themes[i].total_levels(),
            },
            None => ActiveTheme::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, SlotId};

    fn fruit() -> Theme {
        Theme {
            name: "Fruit".to_string(),
            icon: Some("fruit_icon".to_string()),
            shape_sprites: vec![Some("apple".to_string()), Some("banana".to_string())],
            slot_sprites: vec![None, Some("banana_outline".to_string())],
            level_count: Some(3),
        }
    }

    #[test]
    fn test_shape_sprite_lookup() {
        let theme = fruit();
        assert_eq!(theme.shape_sprite(ShapeType::Shape1), Some("apple"));
        assert_eq!(theme.shape_sprite(ShapeType::Shape3), None);
        assert_eq!(theme.shape_sprite(ShapeType::None), None);
    }

    #[test]
    fn test_slot_sprite_precedence() {
        let theme = fruit();
        let mut slot = Slot::new(SlotId(0), ShapeType::Shape2, Position::default());
        assert_eq!(theme.slot_sprite(&slot), Some("banana_outline"));

        slot.accepted = ShapeType::Shape1;
        assert_eq!(theme.slot_sprite(&slot), Some("apple"));

        slot.override_sprite = Some("custom".to_string());
        assert_eq!(theme.slot_sprite(&slot), Some("apple"));
        slot.use_theme_sprite = false;
        assert_eq!(theme.slot_sprite(&slot), Some("custom"));
    }

    #[test]
    fn test_total_levels_fallback() {
        let mut theme = fruit();
        assert_eq!(theme.total_levels(), 3);
        theme.level_count = Some(0);
        assert_eq!(theme.total_levels(), 1);
        theme.level_count = None;
        assert_eq!(theme.total_levels(), 1);
    }

    #[test]
    fn test_clamp_and_activate() {
        let catalog = ThemeCatalog::new(vec![fruit(), Theme::new("")]);
        assert_eq!(catalog.clamp_index(-3), Some(0));
        assert_eq!(catalog.clamp_index(7), Some(1));
        assert_eq!(catalog.activate(0).total_levels, 3);
        assert_eq!(catalog.activate(5).index, Some(1));
        assert_eq!(catalog.display_name(0), "Fruit");
        assert_eq!(catalog.display_name(1), "Theme 2");

        let choices = catalog.choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].icon.as_deref(), Some("fruit_icon"));
        assert_eq!(choices[1].label, "Theme 2");
        assert_eq!(choices[1].icon, None);

        let empty = ThemeCatalog::default();
        assert_eq!(empty.clamp_index(0), None);
        assert_eq!(empty.activate(0), ActiveTheme::default());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.len(), 1);
        let theme = catalog.get(0).unwrap();
        assert_eq!(theme.shape_sprite(ShapeType::Shape12), Some("shape12"));
        assert_eq!(theme.total_levels(), 2);
    }
}
