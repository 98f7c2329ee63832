//! Persistence module - the on-disk side of the puzzle.
//!
//! - [`prefs_file`]: JSON key-value prefs (`UnlockedLevel`, `AutoAdvanceSeconds`)
//! - [`catalog_file`]: theme catalog description loaded once at boot
//!
//! Errors are reported with `anyhow` context; the core never sees them.

pub mod catalog_file;
pub mod prefs_file;

pub use shape_match_core as core;
pub use shape_match_types as types;

pub use catalog_file::{load_catalog, parse_catalog, CatalogFile, ThemeEntry};
pub use prefs_file::{JsonPrefs, PrefValue};
