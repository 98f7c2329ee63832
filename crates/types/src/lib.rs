//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the puzzle.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, host protocol, persistence).
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DEFAULT_AUTO_ADVANCE_SECS` | 3.0 | Delay between completion and the next level |
//!
//! # Persisted Keys
//!
//! - `UNLOCKED_LEVEL_KEY`: highest unlocked level (integer, default 1)
//! - `AUTO_ADVANCE_KEY`: configured auto-advance seconds (float)
//!
//! # Examples
//!
//! ```
//! use shape_match_types::{ShapeType, SHAPE_TYPE_COUNT};
//!
//! let kind = ShapeType::from_str("shape3").unwrap();
//! assert_eq!(kind, ShapeType::Shape3);
//! assert_eq!(kind.index(), Some(2));
//! assert_eq!(ShapeType::None.index(), None);
//! assert_eq!(ShapeType::ALL.len(), SHAPE_TYPE_COUNT);
//! ```

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Auto-advance delay used when nothing was configured.
pub const DEFAULT_AUTO_ADVANCE_SECS: f32 = 3.0;

/// Number of real shape identities (excluding the `None` sentinel).
pub const SHAPE_TYPE_COUNT: usize = 12;

/// Maximum number of candidate slots a single drop can report.
pub const MAX_DROP_TARGETS: usize = 8;

/// Maximum number of shapes, and separately of slots, in one level layout.
pub const MAX_LAYOUT_ENTRIES: usize = 256;

/// First level number. Levels are 1-based.
pub const FIRST_LEVEL: u32 = 1;

/// Prefs key: highest unlocked level.
pub const UNLOCKED_LEVEL_KEY: &str = "UnlockedLevel";

/// Prefs key: auto-advance delay in seconds.
pub const AUTO_ADVANCE_KEY: &str = "AutoAdvanceSeconds";

/// Scene name prefix for gameplay levels (`Level_01`, `Level_02`, ...).
pub const LEVEL_SCENE_PREFIX: &str = "Level_";

/// Scene name of the theme selection menu.
pub const THEME_SELECT_SCENE: &str = "ThemeSelect";

/// Logical shape identity shared by pieces and slots.
///
/// Numbers are pairings, not geometry: `Shape1` on a piece goes into the slot
/// that accepts `Shape1`, whatever the active theme draws for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Shape1,
    Shape2,
    Shape3,
    Shape4,
    Shape5,
    Shape6,
    Shape7,
    Shape8,
    Shape9,
    Shape10,
    Shape11,
    Shape12,
    /// Unset / invalid. Never present on a live board.
    None,
}

impl ShapeType {
    /// Every real shape identity, in sprite-index order.
    pub const ALL: [ShapeType; SHAPE_TYPE_COUNT] = [
        ShapeType::Shape1,
        ShapeType::Shape2,
        ShapeType::Shape3,
        ShapeType::Shape4,
        ShapeType::Shape5,
        ShapeType::Shape6,
        ShapeType::Shape7,
        ShapeType::Shape8,
        ShapeType::Shape9,
        ShapeType::Shape10,
        ShapeType::Shape11,
        ShapeType::Shape12,
    ];

    /// 0-based sprite index, `None` for the sentinel.
    pub fn index(&self) -> Option<usize> {
        Self::ALL.iter().position(|k| k == self)
    }

    /// Inverse of [`ShapeType::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ShapeType::None)
    }

    /// Parse from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use shape_match_types::ShapeType;
    ///
    /// assert_eq!(ShapeType::from_str("Shape1"), Some(ShapeType::Shape1));
    /// assert_eq!(ShapeType::from_str("SHAPE12"), Some(ShapeType::Shape12));
    /// assert_eq!(ShapeType::from_str("none"), Some(ShapeType::None));
    /// assert_eq!(ShapeType::from_str("circle"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        if lower == "none" {
            return Some(ShapeType::None);
        }
        let n: usize = lower.strip_prefix("shape")?.parse().ok()?;
        n.checked_sub(1).and_then(Self::from_index)
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Shape1 => "shape1",
            ShapeType::Shape2 => "shape2",
            ShapeType::Shape3 => "shape3",
            ShapeType::Shape4 => "shape4",
            ShapeType::Shape5 => "shape5",
            ShapeType::Shape6 => "shape6",
            ShapeType::Shape7 => "shape7",
            ShapeType::Shape8 => "shape8",
            ShapeType::Shape9 => "shape9",
            ShapeType::Shape10 => "shape10",
            ShapeType::Shape11 => "shape11",
            ShapeType::Shape12 => "shape12",
            ShapeType::None => "none",
        }
    }
}

/// Index of a shape on the current board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u16);

/// Index of a slot on the current board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u16);

/// Canvas-space position reported by (and sent back to) the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Where a shape is attached in the scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// Resting in the tray (initial layout).
    Tray,
    /// Lifted to the canvas root while following the pointer.
    Dragging,
    /// Snapped into a slot.
    Slot(SlotId),
}

/// Outcome of dropping a shape onto a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementResult {
    Accepted,
    Rejected,
}

impl PlacementResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PlacementResult::Accepted)
    }
}

/// Session lifecycle phase.
///
/// `Loading → ThemeSelect → Playing → Completed`, with `Completed` leading
/// back to `Loading` (next level) or `ThemeSelect` (last level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Loading,
    ThemeSelect,
    Playing,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::ThemeSelect => "themeSelect",
            Phase::Playing => "playing",
            Phase::Completed => "completed",
        }
    }
}

/// Fire-and-forget audio triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Pickup,
    Drop,
    Correct,
    Wrong,
    LevelComplete,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Pickup => "pickup",
            AudioCue::Drop => "drop",
            AudioCue::Correct => "correct",
            AudioCue::Wrong => "wrong",
            AudioCue::LevelComplete => "levelComplete",
        }
    }
}

/// What the win panel's primary button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    NextLevel,
    BackToMenu,
}

impl NextAction {
    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            NextAction::NextLevel => "Next Level",
            NextAction::BackToMenu => "Back to Menu",
        }
    }
}
