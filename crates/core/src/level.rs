//! Level scene naming (`Level_01`, `Level_02`, ...).

use crate::types::LEVEL_SCENE_PREFIX;

/// Parse the level number out of a scene name.
///
/// Returns `None` for names without the `Level_` prefix, a non-numeric
/// suffix, or level 0.
///
/// # Examples
///
/// ```
/// use shape_match_core::level::parse_level_number;
///
/// assert_eq!(parse_level_number("Level_07"), Some(7));
/// assert_eq!(parse_level_number("Level_12"), Some(12));
/// assert_eq!(parse_level_number("Menu"), None);
/// assert_eq!(parse_level_number("Level_xx"), None);
/// ```
pub fn parse_level_number(scene: &str) -> Option<u32> {
    let digits = scene.strip_prefix(LEVEL_SCENE_PREFIX)?;
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Scene name for a level, zero-padded to two digits.
pub fn level_scene_name(level: u32) -> String {
    format!("{}{:02}", LEVEL_SCENE_PREFIX, level)
}

/// Parse `scene`, keeping `fallback` when the name is malformed.
pub fn level_from_scene(scene: &str, fallback: u32) -> u32 {
    match parse_level_number(scene) {
        Some(n) => n,
        None => {
            tracing::warn!(scene, fallback, "scene name has no level number");
            fallback
        }
    }
}
