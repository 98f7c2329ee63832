//! Puzzle board - the shapes and slots of one level.
//!
//! The board owns every [`Shape`] and [`Slot`] of the level and derives
//! completion from slot occupancy. Completion is monotonic: once
//! [`Board::check_complete`] has reported the rising edge, the board stays
//! complete until [`Board::reset`].

use tracing::{debug, warn};

use crate::shape::Shape;
use crate::slot::Slot;
use crate::types::{PlacementResult, Position, ShapeId, ShapeType, SlotId, MAX_LAYOUT_ENTRIES};

/// Layout entry for a piece.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub shape_type: ShapeType,
    pub home: Position,
}

/// Layout entry for a slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub accepted: ShapeType,
    pub position: Position,
    pub override_sprite: Option<String>,
    pub use_theme_sprite: bool,
    pub scale_multiplier: f32,
}

impl SlotSpec {
    pub fn new(accepted: ShapeType, position: Position) -> Self {
        Self {
            accepted,
            position,
            override_sprite: None,
            use_theme_sprite: true,
            scale_multiplier: 1.0,
        }
    }
}

/// Scene content for one level, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelLayout {
    pub shapes: Vec<ShapeSpec>,
    pub slots: Vec<SlotSpec>,
}

/// Result of a drop gesture over zero or more candidate slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub result: PlacementResult,
    /// Slot that took the shape (accepted drops only).
    pub slot: Option<SlotId>,
    /// True when at least one candidate slot was hovered but none matched.
    pub mismatched: bool,
}

/// All slots and shapes of the current level.
#[derive(Debug, Clone, Default)]
pub struct Board {
    shapes: Vec<Shape>,
    slots: Vec<Slot>,
    complete: bool,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from a layout. Entries typed `None` are dropped, as is
    /// anything past [`MAX_LAYOUT_ENTRIES`] shapes or slots.
    pub fn from_layout(layout: &LevelLayout) -> Self {
        let mut board = Self::new();
        for spec in &layout.shapes {
            if spec.shape_type.is_none() {
                warn!(home = ?spec.home, "dropping layout shape without a shape type");
                continue;
            }
            if board.add_shape(spec.shape_type, spec.home).is_none() {
                warn!(
                    total = layout.shapes.len(),
                    max = MAX_LAYOUT_ENTRIES,
                    "layout has too many shapes, dropping the rest"
                );
                break;
            }
        }
        for spec in &layout.slots {
            if spec.accepted.is_none() {
                warn!(position = ?spec.position, "dropping layout slot without a shape type");
                continue;
            }
            let Some(id) = board.add_slot(spec.accepted, spec.position) else {
                warn!(
                    total = layout.slots.len(),
                    max = MAX_LAYOUT_ENTRIES,
                    "layout has too many slots, dropping the rest"
                );
                break;
            };
            let slot = &mut board.slots[id.0 as usize];
            slot.override_sprite = spec.override_sprite.clone();
            slot.use_theme_sprite = spec.use_theme_sprite;
            slot.scale_multiplier = spec.scale_multiplier;
        }
        board
    }

    /// Append a shape. `None` once the board holds [`MAX_LAYOUT_ENTRIES`] shapes.
    pub fn add_shape(&mut self, shape_type: ShapeType, home: Position) -> Option<ShapeId> {
        if self.shapes.len() >= MAX_LAYOUT_ENTRIES {
            return None;
        }
        let id = ShapeId(self.shapes.len() as u16);
        self.shapes.push(Shape::new(id, shape_type, home));
        Some(id)
    }

    /// Append a slot. `None` once the board holds [`MAX_LAYOUT_ENTRIES`] slots.
    pub fn add_slot(&mut self, accepted: ShapeType, position: Position) -> Option<SlotId> {
        if self.slots.len() >= MAX_LAYOUT_ENTRIES {
            return None;
        }
        let id = SlotId(self.slots.len() as u16);
        self.slots.push(Slot::new(id, accepted, position));
        Some(id)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0 as usize)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0 as usize)
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0 as usize)
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn placed_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_placed).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// Try to put `shape` into `slot`.
    ///
    /// On rejection an unplaced shape bounces back to where its drag started.
    /// Unknown ids are rejected.
    pub fn attempt_place(&mut self, shape: ShapeId, slot: SlotId) -> PlacementResult {
        let Some(piece) = self.shapes.get_mut(shape.0 as usize) else {
            return PlacementResult::Rejected;
        };

        let accepted = match self.slots.get_mut(slot.0 as usize) {
            Some(target) => target.place(piece),
            None => false,
        };

        if accepted {
            debug!(shape = shape.0, slot = slot.0, "shape placed");
            PlacementResult::Accepted
        } else {
            if !piece.is_placed {
                piece.return_to_rest();
            }
            PlacementResult::Rejected
        }
    }

    /// Resolve a drop over `targets` (front-most first): the first slot that
    /// accepts the shape takes it.
    pub fn drop_on(&mut self, shape: ShapeId, targets: &[SlotId]) -> DropOutcome {
        let Some(piece) = self.shapes.get(shape.0 as usize) else {
            return DropOutcome {
                result: PlacementResult::Rejected,
                slot: None,
                mismatched: false,
            };
        };

        let mut hovered_any = false;
        let mut winner = None;
        for &target in targets {
            let Some(slot) = self.slots.get(target.0 as usize) else {
                continue;
            };
            hovered_any = true;
            if slot.can_accept(piece) {
                winner = Some(target);
                break;
            }
        }

        match winner {
            Some(target) => {
                let result = self.attempt_place(shape, target);
                DropOutcome {
                    result,
                    slot: result.is_accepted().then_some(target),
                    mismatched: false,
                }
            }
            None => {
                if let Some(piece) = self.shapes.get_mut(shape.0 as usize) {
                    if !piece.is_placed {
                        piece.return_to_rest();
                    }
                }
                DropOutcome {
                    result: PlacementResult::Rejected,
                    slot: None,
                    mismatched: hovered_any,
                }
            }
        }
    }

    /// Completion check, run after every accepted placement.
    ///
    /// Returns `true` exactly once per level instance: on the call that first
    /// finds every slot occupied. Later calls return `false` until [`Board::reset`].
    /// A board without slots never completes.
    pub fn check_complete(&mut self) -> bool {
        if self.complete {
            return false;
        }
        if self.slots.is_empty() {
            return false;
        }
        for slot in &self.slots {
            if !slot.is_occupied() {
                return false;
            }
        }
        self.complete = true;
        true
    }

    /// Unplace every shape, empty every slot and clear the completion flag.
    pub fn reset(&mut self) {
        self.complete = false;
        for shape in &mut self.shapes {
            shape.reset_home();
        }
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parent;

    fn board_with_pairs(n: usize) -> Board {
        let mut board = Board::new();
        for i in 0..n {
            let kind = ShapeType::from_index(i).unwrap();
            board.add_shape(kind, Position::new(i as f32 * 10.0, 100.0));
            board.add_slot(kind, Position::new(i as f32 * 10.0, 0.0));
        }
        board
    }

    #[test]
    fn test_from_layout_caps_entries() {
        let mut layout = LevelLayout::default();
        for i in 0..MAX_LAYOUT_ENTRIES + 3 {
            layout.shapes.push(ShapeSpec {
                shape_type: ShapeType::Shape1,
                home: Position::new(i as f32, 0.0),
            });
            let mut slot = SlotSpec::new(ShapeType::Shape1, Position::new(i as f32, 50.0));
            slot.scale_multiplier = 1.0 + i as f32;
            layout.slots.push(slot);
        }

        let board = Board::from_layout(&layout);
        assert_eq!(board.shapes().len(), MAX_LAYOUT_ENTRIES);
        assert_eq!(board.slots().len(), MAX_LAYOUT_ENTRIES);
        let last = MAX_LAYOUT_ENTRIES - 1;
        assert_eq!(board.shapes()[last].id, ShapeId(last as u16));
        assert_eq!(board.slots()[last].id, SlotId(last as u16));
        // Dropped entries never overwrite earlier slots.
        assert_eq!(board.slots()[0].scale_multiplier, 1.0);
    }

    #[test]
    fn test_add_past_cap_is_refused() {
        let mut board = Board::new();
        for _ in 0..MAX_LAYOUT_ENTRIES {
            assert!(board.add_slot(ShapeType::Shape2, Position::default()).is_some());
        }
        assert_eq!(board.add_slot(ShapeType::Shape2, Position::default()), None);
    }

    #[test]
    fn test_new_board_is_incomplete() {
        let board = board_with_pairs(3);
        assert!(!board.is_complete());
        assert_eq!(board.placed_count(), 0);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_attempt_place_accepts_matching_type() {
        let mut board = board_with_pairs(2);
        assert_eq!(
            board.attempt_place(ShapeId(1), SlotId(1)),
            PlacementResult::Accepted
        );
        assert!(board.slot(SlotId(1)).unwrap().is_occupied());
        assert!(board.shape(ShapeId(1)).unwrap().is_placed);
    }

    #[test]
    fn test_attempt_place_rejects_wrong_type_and_bounces() {
        let mut board = board_with_pairs(2);
        let shape = board.shape_mut(ShapeId(0)).unwrap();
        shape.begin_drag();
        shape.drag_by(33.0, -40.0);

        assert_eq!(
            board.attempt_place(ShapeId(0), SlotId(1)),
            PlacementResult::Rejected
        );
        let shape = board.shape(ShapeId(0)).unwrap();
        assert_eq!(shape.position, Position::new(0.0, 100.0));
        assert_eq!(shape.parent, Parent::Tray);
        assert!(!board.slot(SlotId(1)).unwrap().is_occupied());
    }

    #[test]
    fn test_attempt_place_unknown_ids() {
        let mut board = board_with_pairs(1);
        assert_eq!(
            board.attempt_place(ShapeId(9), SlotId(0)),
            PlacementResult::Rejected
        );
        assert_eq!(
            board.attempt_place(ShapeId(0), SlotId(9)),
            PlacementResult::Rejected
        );
    }

    #[test]
    fn test_placed_shape_is_terminal() {
        let mut board = board_with_pairs(1);
        board.add_slot(ShapeType::Shape1, Position::new(500.0, 500.0));
        assert!(board.attempt_place(ShapeId(0), SlotId(0)).is_accepted());
        assert_eq!(
            board.attempt_place(ShapeId(0), SlotId(1)),
            PlacementResult::Rejected
        );
        // Stays in the first slot.
        assert_eq!(
            board.shape(ShapeId(0)).unwrap().parent,
            Parent::Slot(SlotId(0))
        );
        assert!(!board.slot(SlotId(1)).unwrap().is_occupied());
    }

    #[test]
    fn test_drop_on_picks_first_accepting_target() {
        let mut board = board_with_pairs(3);
        let out = board.drop_on(ShapeId(2), &[SlotId(0), SlotId(2), SlotId(1)]);
        assert_eq!(out.result, PlacementResult::Accepted);
        assert_eq!(out.slot, Some(SlotId(2)));
        assert!(!out.mismatched);
    }

    #[test]
    fn test_drop_on_mismatch_and_empty() {
        let mut board = board_with_pairs(2);
        let out = board.drop_on(ShapeId(0), &[SlotId(1)]);
        assert_eq!(out.result, PlacementResult::Rejected);
        assert!(out.mismatched);

        let out = board.drop_on(ShapeId(0), &[]);
        assert_eq!(out.result, PlacementResult::Rejected);
        assert!(!out.mismatched);
    }

    #[test]
    fn test_check_complete_rising_edge_only() {
        let mut board = board_with_pairs(3);
        board.attempt_place(ShapeId(0), SlotId(0));
        board.attempt_place(ShapeId(1), SlotId(1));
        assert!(!board.check_complete());

        board.attempt_place(ShapeId(2), SlotId(2));
        assert!(board.check_complete());
        assert!(!board.check_complete());
        assert!(board.is_complete());
    }

    #[test]
    fn test_empty_board_never_completes() {
        let mut board = Board::new();
        assert!(!board.check_complete());
        assert!(!board.is_complete());
    }

    #[test]
    fn test_reset_reverts_everything() {
        let mut board = board_with_pairs(2);
        board.attempt_place(ShapeId(0), SlotId(0));
        board.attempt_place(ShapeId(1), SlotId(1));
        assert!(board.check_complete());

        board.reset();
        assert!(!board.is_complete());
        assert_eq!(board.placed_count(), 0);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(
            board.shape(ShapeId(1)).unwrap().position,
            Position::new(10.0, 100.0)
        );

        // Completes again after redo.
        board.attempt_place(ShapeId(0), SlotId(0));
        board.attempt_place(ShapeId(1), SlotId(1));
        assert!(board.check_complete());
    }

    #[test]
    fn test_from_layout_drops_none_entries() {
        let layout = LevelLayout {
            shapes: vec![
                ShapeSpec {
                    shape_type: ShapeType::Shape1,
                    home: Position::default(),
                },
                ShapeSpec {
                    shape_type: ShapeType::None,
                    home: Position::default(),
                },
            ],
            slots: vec![
                SlotSpec::new(ShapeType::None, Position::default()),
                SlotSpec {
                    override_sprite: Some("star_slot".to_string()),
                    use_theme_sprite: false,
                    ..SlotSpec::new(ShapeType::Shape1, Position::new(1.0, 2.0))
                },
            ],
        };
        let board = Board::from_layout(&layout);
        assert_eq!(board.shapes().len(), 1);
        assert_eq!(board.slots().len(), 1);
        let slot = board.slot(SlotId(0)).unwrap();
        assert_eq!(slot.accepted, ShapeType::Shape1);
        assert_eq!(slot.override_sprite.as_deref(), Some("star_slot"));
        assert!(!slot.use_theme_sprite);
    }
}
