//! Unlocked-level progress and the key-value prefs seam.
//!
//! Two values survive between runs: the highest unlocked level and the
//! auto-advance delay chosen on the theme screen. Missing keys mean defaults.

use std::collections::HashMap;

use crate::types::{AUTO_ADVANCE_KEY, DEFAULT_AUTO_ADVANCE_SECS, FIRST_LEVEL, UNLOCKED_LEVEL_KEY};

/// Minimal key-value store, shaped after engine player-prefs.
pub trait PrefStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_float(&self, key: &str) -> Option<f64>;
    fn set_int(&mut self, key: &str, value: i64);
    fn set_float(&mut self, key: &str, value: f64);
}

/// In-memory prefs (tests, headless runs without a save file).
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    ints: HashMap<String, i64>,
    floats: HashMap<String, f64>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.floats.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.ints.insert(key.to_string(), value);
    }

    fn set_float(&mut self, key: &str, value: f64) {
        self.floats.insert(key.to_string(), value);
    }
}

/// A pending write, emitted by the session and applied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrefWrite {
    Int { key: &'static str, value: i64 },
    Float { key: &'static str, value: f64 },
}

impl PrefWrite {
    pub fn key(&self) -> &'static str {
        match self {
            PrefWrite::Int { key, .. } | PrefWrite::Float { key, .. } => key,
        }
    }

    pub fn apply(&self, store: &mut dyn PrefStore) {
        match *self {
            PrefWrite::Int { key, value } => store.set_int(key, value),
            PrefWrite::Float { key, value } => store.set_float(key, value),
        }
    }
}

/// Persisted player progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    unlocked_level: u32,
    auto_advance_secs: f32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_level: FIRST_LEVEL,
            auto_advance_secs: DEFAULT_AUTO_ADVANCE_SECS,
        }
    }
}

impl Progress {
    pub fn new(unlocked_level: u32, auto_advance_secs: f32) -> Self {
        Self {
            unlocked_level: unlocked_level.max(FIRST_LEVEL),
            auto_advance_secs,
        }
    }

    /// Read both keys, falling back to defaults for missing or invalid values.
    pub fn load(store: &dyn PrefStore) -> Self {
        let unlocked_level = store
            .get_int(UNLOCKED_LEVEL_KEY)
            .filter(|&v| v >= FIRST_LEVEL as i64)
            .map(|v| v.min(u32::MAX as i64) as u32)
            .unwrap_or(FIRST_LEVEL);
        let auto_advance_secs = store
            .get_float(AUTO_ADVANCE_KEY)
            .filter(|v| v.is_finite())
            .map(|v| v as f32)
            .unwrap_or(DEFAULT_AUTO_ADVANCE_SECS);
        Self {
            unlocked_level,
            auto_advance_secs,
        }
    }

    pub fn unlocked_level(&self) -> u32 {
        self.unlocked_level
    }

    pub fn auto_advance_secs(&self) -> f32 {
        self.auto_advance_secs
    }

    /// Completing `level` unlocks `level + 1`. Never lowers the stored value;
    /// returns the write only when progress actually grew.
    pub fn record_completion(&mut self, level: u32) -> Option<PrefWrite> {
        let candidate = level.saturating_add(1);
        if candidate <= self.unlocked_level {
            return None;
        }
        self.unlocked_level = candidate;
        Some(PrefWrite::Int {
            key: UNLOCKED_LEVEL_KEY,
            value: candidate as i64,
        })
    }

    pub fn set_auto_advance_secs(&mut self, secs: f32) -> PrefWrite {
        self.auto_advance_secs = secs;
        PrefWrite::Float {
            key: AUTO_ADVANCE_KEY,
            value: secs as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_from_empty_store() {
        let progress = Progress::load(&MemoryPrefs::new());
        assert_eq!(progress.unlocked_level(), 1);
        assert_eq!(progress.auto_advance_secs(), DEFAULT_AUTO_ADVANCE_SECS);
    }

    #[test]
    fn test_load_ignores_invalid_values() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_int(UNLOCKED_LEVEL_KEY, -4);
        prefs.set_float(AUTO_ADVANCE_KEY, f64::NAN);
        let progress = Progress::load(&prefs);
        assert_eq!(progress.unlocked_level(), 1);
        assert_eq!(progress.auto_advance_secs(), DEFAULT_AUTO_ADVANCE_SECS);
    }

    #[test]
    fn test_load_reads_stored_values() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_int(UNLOCKED_LEVEL_KEY, 5);
        prefs.set_float(AUTO_ADVANCE_KEY, 1.5);
        let progress = Progress::load(&prefs);
        assert_eq!(progress.unlocked_level(), 5);
        assert_eq!(progress.auto_advance_secs(), 1.5);
    }

    #[test]
    fn test_record_completion_is_monotonic() {
        let mut progress = Progress::default();
        let write = progress.record_completion(1);
        assert_eq!(
            write,
            Some(PrefWrite::Int {
                key: UNLOCKED_LEVEL_KEY,
                value: 2
            })
        );
        assert_eq!(progress.record_completion(1), None);
        assert_eq!(progress.unlocked_level(), 2);

        progress.record_completion(4);
        assert_eq!(progress.unlocked_level(), 5);
        assert_eq!(progress.record_completion(2), None);
        assert_eq!(progress.unlocked_level(), 5);
    }

    #[test]
    fn test_pref_write_apply() {
        let mut prefs = MemoryPrefs::new();
        let mut progress = Progress::default();
        progress.set_auto_advance_secs(2.0).apply(&mut prefs);
        progress.record_completion(3).unwrap().apply(&mut prefs);
        assert_eq!(prefs.get_float(AUTO_ADVANCE_KEY), Some(2.0));
        assert_eq!(prefs.get_int(UNLOCKED_LEVEL_KEY), Some(4));
        assert_eq!(Progress::load(&prefs), progress);
    }
}
