//! Headless host for the shape-matching puzzle.
//!
//! Speaks line-delimited JSON: the engine side sends input and scene events,
//! the host answers with presentation effects. Persistence effects never
//! leave the host; they are written to the prefs file.
//!
//! - [`config`]: `SHAPE_MATCH_*` environment configuration
//! - [`protocol`]: wire message types
//! - [`driver`]: session + prefs, one frame at a time
//! - [`runtime`]: async line reader feeding the frame loop

pub mod config;
pub mod driver;
pub mod protocol;
pub mod runtime;

pub use shape_match_core as core;
pub use shape_match_persist as persist;
pub use shape_match_types as types;

pub use config::HostConfig;
pub use driver::{Driver, PrefSink};
pub use protocol::{parse_message, HostCommand, WireEffect};
pub use runtime::{LinePoll, LineReader};
