//! Shape Match (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, tests and
//! benches can write `shape_match::{core,host,persist,types}`.

pub use shape_match_core as core;
pub use shape_match_host as host;
pub use shape_match_persist as persist;
pub use shape_match_types as types;
