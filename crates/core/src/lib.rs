//! Core puzzle logic module - pure, deterministic, and testable
//!
//! This module contains the matching rules, board state, and the level/session
//! controller. It has **zero dependencies** on rendering, input capture, audio,
//! or I/O, making it:
//!
//! - **Host-independent**: the session consumes events and returns effects
//! - **Testable**: every rule is exercised without an engine
//! - **Deterministic**: the same event sequence yields the same effects
//!
//! # Module Structure
//!
//! - [`shape`]: draggable pieces with a placement flag
//! - [`slot`]: targets accepting exactly one shape type
//! - [`board`]: all shapes and slots of a level, placement and completion
//! - [`countdown`]: polled auto-advance timer
//! - [`level`]: `Level_NN` scene naming
//! - [`theme`]: theme catalog (sprite per shape type, level count)
//! - [`progress`]: unlocked level and the prefs seam
//! - [`session`]: lifecycle state machine `Loading → ThemeSelect → Playing → Completed`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use shape_match_core::{
//!     Effect, LevelLayout, Progress, Session, SessionConfig, SessionEvent, ShapeSpec,
//!     SlotSpec, ThemeCatalog, DropTargets,
//! };
//! use shape_match_core::types::{Phase, Position, ShapeId, ShapeType, SlotId};
//!
//! let mut session = Session::new(
//!     Arc::new(ThemeCatalog::builtin()),
//!     Progress::default(),
//!     SessionConfig::default(),
//! );
//! session.handle(SessionEvent::Booted);
//! session.handle(SessionEvent::SelectTheme(0));
//!
//! let layout = LevelLayout {
//!     shapes: vec![ShapeSpec { shape_type: ShapeType::Shape1, home: Position::new(0.0, 300.0) }],
//!     slots: vec![SlotSpec::new(ShapeType::Shape1, Position::new(0.0, 0.0))],
//! };
//! session.handle(SessionEvent::SceneLoaded { name: "Level_01".into(), layout });
//! assert_eq!(session.phase(), Phase::Playing);
//!
//! session.handle(SessionEvent::DragBegin { shape: ShapeId(0) });
//! let mut targets = DropTargets::new();
//! targets.push(SlotId(0));
//! let effects = session.handle(SessionEvent::DragEnd { shape: ShapeId(0), targets });
//!
//! assert!(effects.contains(&Effect::Celebrate));
//! assert_eq!(session.phase(), Phase::Completed);
//! ```
//!
//! # Timing
//!
//! Feed [`SessionEvent::Tick`] every frame with the elapsed milliseconds; the
//! auto-advance countdown fires on the tick that reaches its full duration.

pub mod board;
pub mod countdown;
pub mod level;
pub mod progress;
pub mod session;
pub mod shape;
pub mod slot;
pub mod snapshot;
pub mod theme;

pub use shape_match_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, DropOutcome, LevelLayout, ShapeSpec, SlotSpec};
pub use countdown::{Countdown, CountdownStatus};
pub use level::{level_scene_name, parse_level_number};
pub use progress::{MemoryPrefs, PrefStore, PrefWrite, Progress};
pub use session::{DropTargets, Effect, Session, SessionConfig, SessionEvent};
pub use shape::Shape;
pub use slot::Slot;
pub use snapshot::SessionSnapshot;
pub use theme::{ActiveTheme, Theme, ThemeCatalog, ThemeChoice};
