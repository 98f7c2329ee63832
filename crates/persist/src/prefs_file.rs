//! JSON-file backed prefs.
//!
//! File format: a flat JSON object, integers for int keys and floats for
//! float keys:
//!
//! ```text
//! {"AutoAdvanceSeconds":3.0,"UnlockedLevel":2}
//! ```
//!
//! Writes land in memory; [`JsonPrefs::flush`] rewrites the file through a
//! temporary sibling and a rename so a crash never leaves half a file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::PrefStore;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone)]
pub struct JsonPrefs {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
    dirty: bool,
}

impl JsonPrefs {
    /// Open (or start) the prefs file at `path`.
    ///
    /// A missing file is an empty store. A file that is not valid JSON is
    /// logged and treated as empty; it is replaced on the next flush.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, PrefValue>>(&text) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "prefs file is corrupt, starting fresh");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("reading prefs from {}", path.display()))
            }
        };
        debug!(path = %path.display(), keys = values.len(), "prefs loaded");
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist pending writes. No-op when nothing changed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating prefs directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.values).context("encoding prefs")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        self.dirty = false;
        debug!(path = %self.path.display(), "prefs saved");
        Ok(())
    }
}

impl PrefStore for JsonPrefs {
    fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            PrefValue::Int(v) => Some(*v),
            PrefValue::Float(_) => None,
        }
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key)? {
            PrefValue::Float(v) => Some(*v),
            PrefValue::Int(v) => Some(*v as f64),
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        if self.values.insert(key.to_string(), PrefValue::Int(value)) != Some(PrefValue::Int(value)) {
            self.dirty = true;
        }
    }

    fn set_float(&mut self, key: &str, value: f64) {
        if self.values.insert(key.to_string(), PrefValue::Float(value))
            != Some(PrefValue::Float(value))
        {
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Progress;
    use crate::types::{AUTO_ADVANCE_KEY, UNLOCKED_LEVEL_KEY};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "shape-match-prefs-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("prefs.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let prefs = JsonPrefs::open(scratch("missing")).unwrap();
        assert_eq!(prefs.get_int(UNLOCKED_LEVEL_KEY), None);
        assert!(!prefs.is_dirty());
    }

    #[test]
    fn test_flush_and_reopen() {
        let path = scratch("roundtrip");
        let mut prefs = JsonPrefs::open(&path).unwrap();
        prefs.set_int(UNLOCKED_LEVEL_KEY, 4);
        prefs.set_float(AUTO_ADVANCE_KEY, 2.5);
        assert!(prefs.is_dirty());
        prefs.flush().unwrap();
        assert!(!prefs.is_dirty());

        let reopened = JsonPrefs::open(&path).unwrap();
        let progress = Progress::load(&reopened);
        assert_eq!(progress.unlocked_level(), 4);
        assert_eq!(progress.auto_advance_secs(), 2.5);
    }

    #[test]
    fn test_whole_float_stays_float() {
        let path = scratch("whole-float");
        let mut prefs = JsonPrefs::open(&path).unwrap();
        prefs.set_float(AUTO_ADVANCE_KEY, 3.0);
        prefs.flush().unwrap();

        let reopened = JsonPrefs::open(&path).unwrap();
        assert_eq!(reopened.get_float(AUTO_ADVANCE_KEY), Some(3.0));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let path = scratch("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        let prefs = JsonPrefs::open(&path).unwrap();
        assert_eq!(prefs.get_int(UNLOCKED_LEVEL_KEY), None);
    }

    #[test]
    fn test_unchanged_write_is_not_dirty() {
        let path = scratch("unchanged");
        let mut prefs = JsonPrefs::open(&path).unwrap();
        prefs.set_int(UNLOCKED_LEVEL_KEY, 2);
        prefs.flush().unwrap();
        prefs.set_int(UNLOCKED_LEVEL_KEY, 2);
        assert!(!prefs.is_dirty());
    }
}
