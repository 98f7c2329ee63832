//! Session controller - level lifecycle, theme selection and auto-advance.
//!
//! The session is driven by [`SessionEvent`]s and answers with [`Effect`]s for
//! the host to carry out (move a sprite, play a cue, load a scene, persist a
//! value). It never calls out to collaborators itself.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::board::{Board, LevelLayout};
use crate::countdown::{Countdown, CountdownStatus};
use crate::level::{level_from_scene, level_scene_name};
use crate::progress::{PrefWrite, Progress};
use crate::snapshot::SessionSnapshot;
use crate::theme::{ActiveTheme, ThemeCatalog, ThemeChoice};
use crate::types::*;

/// Candidate slots under the pointer at drag end, front-most first.
pub type DropTargets = ArrayVec<SlotId, MAX_DROP_TARGETS>;

/// Input to [`Session::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Boot finished; show the theme menu.
    Booted,
    /// Theme button pressed (index is clamped into the catalog).
    SelectTheme(i64),
    /// Level button pressed on the menu (clamped to unlocked levels).
    SelectLevel(u32),
    /// The host finished loading a scene.
    SceneLoaded { name: String, layout: LevelLayout },
    DragBegin { shape: ShapeId },
    DragMove { shape: ShapeId, dx: f32, dy: f32 },
    DragEnd { shape: ShapeId, targets: DropTargets },
    /// Frame step.
    Tick { elapsed_ms: u32 },
    /// Pointer-down while the win panel is up.
    Skip,
    /// "Next Level" / "Back to Menu" button.
    NextLevel,
    Reset,
    ReturnToMenu,
}

/// One-way instruction for a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PlayCue(AudioCue),
    MoveShape { shape: ShapeId, position: Position },
    ReparentShape { shape: ShapeId, parent: Parent },
    /// Uniform scale for the shape sprite (slot multiplier once snapped, 1 in the tray).
    SetShapeScale { shape: ShapeId, scale: f32 },
    SetDragVisual { shape: ShapeId, dragging: bool },
    SetSlotVisible { slot: SlotId, visible: bool },
    SetShapeSprite { shape: ShapeId, sprite: String },
    SetSlotSprite { slot: SlotId, sprite: String },
    ShowLevelLabel { level: u32 },
    ShowWinPanel { next: NextAction },
    HideWinPanel,
    Celebrate,
    /// Theme-select menu buttons.
    ShowThemeChoices(Vec<ThemeChoice>),
    LoadScene(String),
    Persist(PrefWrite),
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionConfig {
    /// Auto-advance seconds stored when a theme is picked. `None` keeps the
    /// value already in [`Progress`]; `<= 0` disables auto-advance.
    pub auto_advance_secs: Option<f32>,
}

/// Level/session controller.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<ThemeCatalog>,
    config: SessionConfig,
    active_theme: ActiveTheme,
    progress: Progress,
    phase: Phase,
    board: Board,
    current_level: u32,
    /// Level requested from the host and not yet loaded.
    pending_level: Option<u32>,
    countdown: Option<Countdown>,
}

impl Session {
    pub fn new(catalog: Arc<ThemeCatalog>, progress: Progress, config: SessionConfig) -> Self {
        Self {
            catalog,
            config,
            active_theme: ActiveTheme::default(),
            progress,
            phase: Phase::Loading,
            board: Board::new(),
            current_level: FIRST_LEVEL,
            pending_level: None,
            countdown: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn total_levels(&self) -> u32 {
        self.active_theme.total_levels
    }

    pub fn active_theme(&self) -> ActiveTheme {
        self.active_theme
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn is_last_level(&self) -> bool {
        self.current_level >= self.total_levels()
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.phase = self.phase;
        out.current_level = self.current_level;
        out.total_levels = self.total_levels();
        out.unlocked_level = self.progress.unlocked_level();
        out.theme_index = self.active_theme.index;
        out.puzzle_complete = self.board.is_complete();
        out.shapes_total = self.board.shapes().len() as u32;
        out.shapes_placed = self.board.placed_count() as u32;
        out.slots_total = self.board.slots().len() as u32;
        out.countdown_remaining_ms = self
            .countdown
            .as_ref()
            .filter(|c| c.is_running())
            .map(|c| c.remaining_ms());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Apply one event and collect the resulting effects.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        let mut out = Vec::new();
        self.handle_into(event, &mut out);
        out
    }

    /// Like [`Session::handle`], appending into a caller-owned buffer.
    pub fn handle_into(&mut self, event: SessionEvent, out: &mut Vec<Effect>) {
        match event {
            SessionEvent::Booted => self.boot(out),
            SessionEvent::SelectTheme(index) => self.select_theme(index, out),
            SessionEvent::SelectLevel(level) => self.select_level(level, out),
            SessionEvent::SceneLoaded { name, layout } => self.scene_loaded(&name, &layout, out),
            SessionEvent::DragBegin { shape } => self.drag_begin(shape, out),
            SessionEvent::DragMove { shape, dx, dy } => self.drag_move(shape, dx, dy, out),
            SessionEvent::DragEnd { shape, targets } => self.drag_end(shape, &targets, out),
            SessionEvent::Tick { elapsed_ms } => self.tick(elapsed_ms, out),
            SessionEvent::Skip | SessionEvent::NextLevel => {
                if self.phase == Phase::Completed {
                    self.advance(out);
                }
            }
            SessionEvent::Reset => self.reset(out),
            SessionEvent::ReturnToMenu => {
                if matches!(self.phase, Phase::Playing | Phase::Completed) {
                    out.push(Effect::HideWinPanel);
                    self.enter_theme_select(out);
                }
            }
        }
    }

    fn boot(&mut self, out: &mut Vec<Effect>) {
        if self.phase != Phase::Loading || self.pending_level.is_some() {
            return;
        }
        if self.catalog.is_empty() {
            warn!("no themes configured; levels will play without sprites");
        }
        info!(
            themes = self.catalog.len(),
            unlocked_level = self.progress.unlocked_level(),
            "boot complete"
        );
        self.phase = Phase::ThemeSelect;
        out.push(Effect::LoadScene(THEME_SELECT_SCENE.to_string()));
    }

    fn select_theme(&mut self, index: i64, out: &mut Vec<Effect>) {
        if self.phase != Phase::ThemeSelect {
            return;
        }
        self.active_theme = self.catalog.activate(index);
        if self.active_theme.index.map(|i| i as i64) != Some(index) {
            warn!(requested = index, chosen = ?self.active_theme.index, "theme index clamped");
        }
        info!(
            theme = ?self.active_theme.index,
            total_levels = self.active_theme.total_levels,
            "theme selected"
        );
        let secs = self
            .config
            .auto_advance_secs
            .unwrap_or(self.progress.auto_advance_secs());
        let write = self.progress.set_auto_advance_secs(secs);
        out.push(Effect::Persist(write));
        self.request_level(FIRST_LEVEL, out);
    }

    fn select_level(&mut self, level: u32, out: &mut Vec<Effect>) {
        if self.phase != Phase::ThemeSelect {
            return;
        }
        if self.active_theme.index.is_none() {
            self.active_theme = self.catalog.activate(0);
        }
        let max = self
            .progress
            .unlocked_level()
            .min(self.total_levels())
            .max(FIRST_LEVEL);
        let chosen = level.clamp(FIRST_LEVEL, max);
        if chosen != level {
            warn!(requested = level, chosen, "level selection clamped");
        }
        self.request_level(chosen, out);
    }

    fn request_level(&mut self, level: u32, out: &mut Vec<Effect>) {
        self.phase = Phase::Loading;
        self.pending_level = Some(level);
        self.board = Board::new();
        out.push(Effect::LoadScene(level_scene_name(level)));
    }

    fn scene_loaded(&mut self, name: &str, layout: &LevelLayout, out: &mut Vec<Effect>) {
        self.cancel_countdown();
        if name == THEME_SELECT_SCENE {
            self.pending_level = None;
            self.board = Board::new();
            self.phase = Phase::ThemeSelect;
            out.push(Effect::ShowThemeChoices(self.catalog.choices()));
            return;
        }

        self.pending_level = None;
        self.current_level = level_from_scene(name, self.current_level);
        self.board = Board::from_layout(layout);
        self.phase = Phase::Playing;

        info!(
            level = self.current_level,
            total_levels = self.total_levels(),
            shapes = self.board.shapes().len(),
            slots = self.board.slots().len(),
            "level started"
        );

        self.apply_theme(out);
        for slot in self.board.slots() {
            out.push(Effect::SetSlotVisible {
                slot: slot.id,
                visible: true,
            });
        }
        out.push(Effect::HideWinPanel);
        out.push(Effect::ShowLevelLabel {
            level: self.current_level,
        });
    }

    fn apply_theme(&self, out: &mut Vec<Effect>) {
        let Some(theme) = self.active_theme.index.and_then(|i| self.catalog.get(i)) else {
            return;
        };
        for shape in self.board.shapes() {
            if let Some(sprite) = theme.shape_sprite(shape.shape_type) {
                out.push(Effect::SetShapeSprite {
                    shape: shape.id,
                    sprite: sprite.to_string(),
                });
            }
        }
        for slot in self.board.slots() {
            if let Some(sprite) = theme.slot_sprite(slot) {
                out.push(Effect::SetSlotSprite {
                    slot: slot.id,
                    sprite: sprite.to_string(),
                });
            }
        }
    }

    fn drag_begin(&mut self, shape: ShapeId, out: &mut Vec<Effect>) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(piece) = self.board.shape_mut(shape) else {
            return;
        };
        if !piece.begin_drag() {
            return;
        }
        debug!(shape = shape.0, "drag begin");
        out.push(Effect::ReparentShape {
            shape,
            parent: Parent::Dragging,
        });
        out.push(Effect::SetDragVisual {
            shape,
            dragging: true,
        });
        out.push(Effect::PlayCue(AudioCue::Pickup));
    }

    fn drag_move(&mut self, shape: ShapeId, dx: f32, dy: f32, out: &mut Vec<Effect>) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(piece) = self.board.shape_mut(shape) else {
            return;
        };
        if piece.drag_by(dx, dy) {
            out.push(Effect::MoveShape {
                shape,
                position: piece.position,
            });
        }
    }

    fn drag_end(&mut self, shape: ShapeId, targets: &[SlotId], out: &mut Vec<Effect>) {
        if self.phase != Phase::Playing {
            return;
        }
        match self.board.shape(shape) {
            Some(piece) if piece.dragging => {}
            _ => return,
        }

        out.push(Effect::SetDragVisual {
            shape,
            dragging: false,
        });

        let outcome = self.board.drop_on(shape, targets);
        let Some(piece) = self.board.shape(shape) else {
            return;
        };
        match outcome.slot {
            Some(slot) => {
                debug!(shape = shape.0, slot = slot.0, "drop accepted");
                out.push(Effect::ReparentShape {
                    shape,
                    parent: Parent::Slot(slot),
                });
                out.push(Effect::MoveShape {
                    shape,
                    position: piece.position,
                });
                if let Some(target) = self.board.slot(slot) {
                    out.push(Effect::SetShapeScale {
                        shape,
                        scale: target.scale_multiplier,
                    });
                }
                out.push(Effect::SetSlotVisible {
                    slot,
                    visible: false,
                });
                out.push(Effect::PlayCue(AudioCue::Correct));
            }
            None => {
                debug!(shape = shape.0, mismatched = outcome.mismatched, "drop rejected");
                out.push(Effect::ReparentShape {
                    shape,
                    parent: Parent::Tray,
                });
                out.push(Effect::MoveShape {
                    shape,
                    position: piece.position,
                });
                if outcome.mismatched {
                    out.push(Effect::PlayCue(AudioCue::Wrong));
                }
            }
        }
        out.push(Effect::PlayCue(AudioCue::Drop));

        if outcome.result.is_accepted() && self.board.check_complete() {
            self.complete(out);
        }
    }

    fn complete(&mut self, out: &mut Vec<Effect>) {
        self.phase = Phase::Completed;
        info!(
            level = self.current_level,
            total_levels = self.total_levels(),
            "puzzle complete"
        );

        out.push(Effect::PlayCue(AudioCue::LevelComplete));
        out.push(Effect::Celebrate);
        if let Some(write) = self.progress.record_completion(self.current_level) {
            out.push(Effect::Persist(write));
        }
        let next = if self.is_last_level() {
            NextAction::BackToMenu
        } else {
            NextAction::NextLevel
        };
        out.push(Effect::ShowWinPanel { next });

        self.countdown = Countdown::from_secs(self.progress.auto_advance_secs());
        if let Some(countdown) = &self.countdown {
            debug!(duration_ms = countdown.duration_ms(), "auto-advance armed");
        }
    }

    fn tick(&mut self, elapsed_ms: u32, out: &mut Vec<Effect>) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };
        match countdown.tick(elapsed_ms) {
            CountdownStatus::Running => {}
            CountdownStatus::Cancelled => self.countdown = None,
            CountdownStatus::Expired => {
                self.countdown = None;
                if self.phase == Phase::Completed {
                    self.advance(out);
                }
            }
        }
    }

    fn advance(&mut self, out: &mut Vec<Effect>) {
        self.cancel_countdown();
        out.push(Effect::HideWinPanel);
        if self.is_last_level() {
            info!(level = self.current_level, "last level done, back to menu");
            self.enter_theme_select(out);
        } else {
            self.request_level(self.current_level + 1, out);
        }
    }

    fn enter_theme_select(&mut self, out: &mut Vec<Effect>) {
        self.cancel_countdown();
        self.pending_level = None;
        self.board = Board::new();
        self.phase = Phase::ThemeSelect;
        out.push(Effect::LoadScene(THEME_SELECT_SCENE.to_string()));
    }

    fn reset(&mut self, out: &mut Vec<Effect>) {
        if !matches!(self.phase, Phase::Playing | Phase::Completed) {
            return;
        }
        self.cancel_countdown();
        self.board.reset();
        self.phase = Phase::Playing;
        debug!(level = self.current_level, "level reset");

        for shape in self.board.shapes() {
            out.push(Effect::ReparentShape {
                shape: shape.id,
                parent: Parent::Tray,
            });
            out.push(Effect::MoveShape {
                shape: shape.id,
                position: shape.home,
            });
            out.push(Effect::SetShapeScale {
                shape: shape.id,
                scale: 1.0,
            });
        }
        for slot in self.board.slots() {
            out.push(Effect::SetSlotVisible {
                slot: slot.id,
                visible: true,
            });
        }
        out.push(Effect::HideWinPanel);
    }

    fn cancel_countdown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
            debug!(remaining_ms = countdown.remaining_ms(), "auto-advance cancelled");
        }
    }
}
