//! Session snapshot - a plain copy of the session state for the host.

use crate::types::{Phase, FIRST_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub current_level: u32,
    pub total_levels: u32,
    pub unlocked_level: u32,
    pub theme_index: Option<usize>,
    pub puzzle_complete: bool,
    pub shapes_total: u32,
    pub shapes_placed: u32,
    pub slots_total: u32,
    pub countdown_remaining_ms: Option<u32>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            current_level: FIRST_LEVEL,
            total_levels: 1,
            unlocked_level: FIRST_LEVEL,
            theme_index: None,
            puzzle_complete: false,
            shapes_total: 0,
            shapes_placed: 0,
            slots_total: 0,
            countdown_remaining_ms: None,
        }
    }
}
