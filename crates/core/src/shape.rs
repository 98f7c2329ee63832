//! Draggable puzzle pieces.

use crate::types::{Parent, Position, ShapeId, ShapeType, SlotId};

/// A movable puzzle piece.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub shape_type: ShapeType,
    pub is_placed: bool,
    /// Layout position; reset returns the piece here.
    pub home: Position,
    /// Current position.
    pub position: Position,
    /// Where the current drag gesture started. A rejected drop bounces back here.
    pub rest: Position,
    pub parent: Parent,
    pub dragging: bool,
}

impl Shape {
    pub fn new(id: ShapeId, shape_type: ShapeType, home: Position) -> Self {
        Self {
            id,
            shape_type,
            is_placed: false,
            home,
            position: home,
            rest: home,
            parent: Parent::Tray,
            dragging: false,
        }
    }

    /// Lift the piece for dragging. Placed pieces stay put, and a piece
    /// already in a drag keeps its original rest position.
    pub fn begin_drag(&mut self) -> bool {
        if self.is_placed || self.dragging {
            return false;
        }
        self.rest = self.position;
        self.parent = Parent::Dragging;
        self.dragging = true;
        true
    }

    /// Follow the pointer by `(dx, dy)`.
    pub fn drag_by(&mut self, dx: f32, dy: f32) -> bool {
        if self.is_placed || !self.dragging {
            return false;
        }
        self.position = self.position.offset(dx, dy);
        true
    }

    /// Bounce back to where the drag started.
    pub(crate) fn return_to_rest(&mut self) {
        self.position = self.rest;
        self.parent = Parent::Tray;
        self.dragging = false;
    }

    pub(crate) fn snap_into(&mut self, slot: SlotId, at: Position) {
        self.is_placed = true;
        self.dragging = false;
        self.position = at;
        self.parent = Parent::Slot(slot);
    }

    /// Unplace and return to the layout position.
    pub(crate) fn reset_home(&mut self) {
        self.is_placed = false;
        self.dragging = false;
        self.position = self.home;
        self.rest = self.home;
        self.parent = Parent::Tray;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> Shape {
        Shape::new(ShapeId(0), ShapeType::Shape1, Position::new(10.0, 20.0))
    }

    #[test]
    fn test_begin_drag_records_rest() {
        let mut s = shape();
        s.position = Position::new(5.0, 5.0);
        assert!(s.begin_drag());
        assert_eq!(s.rest, Position::new(5.0, 5.0));
        assert_eq!(s.parent, Parent::Dragging);
    }

    #[test]
    fn test_drag_requires_begin() {
        let mut s = shape();
        assert!(!s.drag_by(1.0, 1.0));
        s.begin_drag();
        assert!(s.drag_by(1.0, -2.0));
        assert_eq!(s.position, Position::new(11.0, 18.0));
    }

    #[test]
    fn test_placed_shape_ignores_drag() {
        let mut s = shape();
        s.snap_into(SlotId(3), Position::new(0.0, 0.0));
        assert!(!s.begin_drag());
        assert!(!s.drag_by(1.0, 1.0));
        assert_eq!(s.parent, Parent::Slot(SlotId(3)));
    }

    #[test]
    fn test_second_begin_keeps_rest() {
        let mut s = shape();
        assert!(s.begin_drag());
        s.drag_by(150.0, -120.0);
        assert!(!s.begin_drag());
        assert_eq!(s.rest, Position::new(10.0, 20.0));

        s.return_to_rest();
        assert_eq!(s.position, Position::new(10.0, 20.0));
        assert_eq!(s.parent, Parent::Tray);
    }

    #[test]
    fn test_reset_home_restores_layout_position() {
        let mut s = shape();
        s.snap_into(SlotId(0), Position::new(9.0, 9.0));
        s.reset_home();
        assert_eq!(s.position, Position::new(10.0, 20.0));
        assert!(!s.is_placed);
    }
}
