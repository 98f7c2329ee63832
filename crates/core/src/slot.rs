//! Placement targets.

use crate::shape::Shape;
use crate::types::{Position, ShapeId, ShapeType, SlotId};

/// A fixed target accepting exactly one [`ShapeType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: SlotId,
    pub accepted: ShapeType,
    pub position: Position,
    occupant: Option<ShapeId>,
    /// Per-slot sprite used instead of the theme's when `use_theme_sprite` is off.
    pub override_sprite: Option<String>,
    pub use_theme_sprite: bool,
    /// Scale applied to a shape snapped into this slot (art proportion fix-up).
    pub scale_multiplier: f32,
}

impl Slot {
    pub fn new(id: SlotId, accepted: ShapeType, position: Position) -> Self {
        Self {
            id,
            accepted,
            position,
            occupant: None,
            override_sprite: None,
            use_theme_sprite: true,
            scale_multiplier: 1.0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<ShapeId> {
        self.occupant
    }

    pub fn can_accept(&self, shape: &Shape) -> bool {
        !self.is_occupied() && shape.shape_type == self.accepted
    }

    /// Take the shape if it fits. The shape is snapped onto the slot position.
    pub(crate) fn place(&mut self, shape: &mut Shape) -> bool {
        if shape.is_placed || !self.can_accept(shape) {
            return false;
        }
        self.occupant = Some(shape.id);
        shape.snap_into(self.id, self.position);
        true
    }

    /// Release the occupant, if any.
    pub(crate) fn clear(&mut self) -> Option<ShapeId> {
        self.occupant.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parent;

    #[test]
    fn test_can_accept_matches_type_and_vacancy() {
        let slot = Slot::new(SlotId(0), ShapeType::Shape2, Position::default());
        let good = Shape::new(ShapeId(0), ShapeType::Shape2, Position::default());
        let bad = Shape::new(ShapeId(1), ShapeType::Shape3, Position::default());
        assert!(slot.can_accept(&good));
        assert!(!slot.can_accept(&bad));
    }

    #[test]
    fn test_place_occupies_and_snaps() {
        let mut slot = Slot::new(SlotId(4), ShapeType::Shape1, Position::new(50.0, 60.0));
        let mut shape = Shape::new(ShapeId(2), ShapeType::Shape1, Position::default());

        assert!(slot.place(&mut shape));
        assert!(slot.is_occupied());
        assert_eq!(slot.occupant(), Some(ShapeId(2)));
        assert!(shape.is_placed);
        assert_eq!(shape.position, Position::new(50.0, 60.0));
        assert_eq!(shape.parent, Parent::Slot(SlotId(4)));
    }

    #[test]
    fn test_occupied_slot_rejects_second_shape() {
        let mut slot = Slot::new(SlotId(0), ShapeType::Shape1, Position::default());
        let mut a = Shape::new(ShapeId(0), ShapeType::Shape1, Position::default());
        let mut b = Shape::new(ShapeId(1), ShapeType::Shape1, Position::default());
        assert!(slot.place(&mut a));
        assert!(!slot.place(&mut b));
        assert!(!b.is_placed);
        assert_eq!(slot.occupant(), Some(ShapeId(0)));
    }

    #[test]
    fn test_clear_releases_occupant() {
        let mut slot = Slot::new(SlotId(0), ShapeType::Shape1, Position::default());
        let mut a = Shape::new(ShapeId(7), ShapeType::Shape1, Position::default());
        slot.place(&mut a);
        assert_eq!(slot.clear(), Some(ShapeId(7)));
        assert!(!slot.is_occupied());
        assert_eq!(slot.clear(), None);
    }
}
