//! Host configuration read from `SHAPE_MATCH_*` environment variables.

use std::path::PathBuf;

use crate::core::SessionConfig;
use crate::types::TICK_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub prefs_path: PathBuf,
    pub themes_path: Option<PathBuf>,
    pub tick_ms: u32,
    /// Overrides the stored auto-advance seconds when set.
    pub auto_advance_secs: Option<f32>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            prefs_path: PathBuf::from("shape-match-prefs.json"),
            themes_path: None,
            tick_ms: TICK_MS,
            auto_advance_secs: None,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let prefs_path = non_empty("SHAPE_MATCH_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.prefs_path);
        let themes_path = non_empty("SHAPE_MATCH_THEMES_PATH").map(PathBuf::from);
        let tick_ms = non_empty("SHAPE_MATCH_TICK_MS")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&ms| ms > 0)
            .unwrap_or(defaults.tick_ms);
        let auto_advance_secs = non_empty("SHAPE_MATCH_AUTO_ADVANCE_SECS")
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .or(defaults.auto_advance_secs);

        Self {
            prefs_path,
            themes_path,
            tick_ms,
            auto_advance_secs,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            auto_advance_secs: self.auto_advance_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(HostConfig::from_lookup(|_| None), HostConfig::default());
    }

    #[test]
    fn test_values_are_read() {
        let config = HostConfig::from_lookup(lookup(&[
            ("SHAPE_MATCH_PREFS_PATH", "/tmp/p.json"),
            ("SHAPE_MATCH_THEMES_PATH", " themes.json "),
            ("SHAPE_MATCH_TICK_MS", "33"),
            ("SHAPE_MATCH_AUTO_ADVANCE_SECS", "0"),
        ]));
        assert_eq!(config.prefs_path, PathBuf::from("/tmp/p.json"));
        assert_eq!(config.themes_path, Some(PathBuf::from("themes.json")));
        assert_eq!(config.tick_ms, 33);
        assert_eq!(config.session_config().auto_advance_secs, Some(0.0));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = HostConfig::from_lookup(lookup(&[
            ("SHAPE_MATCH_TICK_MS", "0"),
            ("SHAPE_MATCH_AUTO_ADVANCE_SECS", "soon"),
            ("SHAPE_MATCH_THEMES_PATH", "  "),
        ]));
        assert_eq!(config.tick_ms, TICK_MS);
        assert_eq!(config.auto_advance_secs, None);
        assert_eq!(config.themes_path, None);
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = HostConfig::from_env();
    }
}
