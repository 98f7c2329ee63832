//! Protocol module - JSON message types for the headless host
//!
//! Line-delimited JSON. Every message carries `type`; inbound messages may
//! carry a `seq` the host echoes in errors. Outbound messages carry a
//! host-side `seq` and `ts` (milliseconds since the Unix epoch).

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{
    Effect, LevelLayout, SessionEvent, SessionSnapshot, ShapeSpec, SlotSpec, ThemeChoice,
};
use crate::types::{
    AudioCue, NextAction, Parent, Position, ShapeId, ShapeType, SlotId, MAX_DROP_TARGETS,
};

// ============== Host -> Game Messages ==============

/// Shape type as it appears on the wire (`"shape1"`..`"shape12"`, case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeTypeName(pub ShapeType);

impl<'de> Deserialize<'de> for ShapeTypeName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShapeType::from_str(&s)
            .map(ShapeTypeName)
            .ok_or_else(|| serde::de::Error::custom("unknown shape type"))
    }
}

impl Serialize for ShapeTypeName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutShape {
    #[serde(rename = "type")]
    pub shape_type: ShapeTypeName,
    pub at: [f32; 2],
}

fn default_true() -> bool {
    true
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSlot {
    pub accepts: ShapeTypeName,
    pub at: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_sprite: Option<String>,
    #[serde(default = "default_true")]
    pub use_theme_sprite: bool,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub shapes: Vec<LayoutShape>,
    #[serde(default)]
    pub slots: Vec<LayoutSlot>,
}

impl From<Layout> for LevelLayout {
    fn from(value: Layout) -> Self {
        Self {
            shapes: value
                .shapes
                .into_iter()
                .map(|s| ShapeSpec {
                    shape_type: s.shape_type.0,
                    home: Position::new(s.at[0], s.at[1]),
                })
                .collect(),
            slots: value
                .slots
                .into_iter()
                .map(|s| SlotSpec {
                    accepted: s.accepts.0,
                    position: Position::new(s.at[0], s.at[1]),
                    override_sprite: s.override_sprite,
                    use_theme_sprite: s.use_theme_sprite,
                    scale_multiplier: s.scale,
                })
                .collect(),
        }
    }
}

/// Slot ids under the pointer at drag end, front-most first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList(pub ArrayVec<SlotId, MAX_DROP_TARGETS>);

impl<'de> Deserialize<'de> for TargetList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = TargetList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of slot ids")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ArrayVec::<SlotId, MAX_DROP_TARGETS>::new();
                while let Some(id) = seq.next_element::<u16>()? {
                    out.try_push(SlotId(id))
                        .map_err(|_| serde::de::Error::custom("too many drop targets"))?;
                }
                Ok(TargetList(out))
            }
        }

        deserializer.deserialize_seq(V)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundBody {
    Boot,
    SelectTheme {
        index: i64,
    },
    SelectLevel {
        level: u32,
    },
    SceneLoaded {
        name: String,
        #[serde(default)]
        layout: Layout,
    },
    DragBegin {
        shape: u16,
    },
    DragMove {
        shape: u16,
        dx: f32,
        dy: f32,
    },
    DragEnd {
        shape: u16,
        #[serde(default)]
        targets: TargetList,
    },
    Skip,
    NextLevel,
    Reset,
    Menu,
    Snapshot,
    Quit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub seq: u64,
    #[serde(flatten)]
    pub body: InboundBody,
}

/// What the driver does with an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Event(SessionEvent),
    Snapshot,
    Quit,
}

impl From<InboundBody> for HostCommand {
    fn from(body: InboundBody) -> Self {
        let event = match body {
            InboundBody::Snapshot => return HostCommand::Snapshot,
            InboundBody::Quit => return HostCommand::Quit,
            InboundBody::Boot => SessionEvent::Booted,
            InboundBody::SelectTheme { index } => SessionEvent::SelectTheme(index),
            InboundBody::SelectLevel { level } => SessionEvent::SelectLevel(level),
            InboundBody::SceneLoaded { name, layout } => SessionEvent::SceneLoaded {
                name,
                layout: layout.into(),
            },
            InboundBody::DragBegin { shape } => SessionEvent::DragBegin {
                shape: ShapeId(shape),
            },
            InboundBody::DragMove { shape, dx, dy } => SessionEvent::DragMove {
                shape: ShapeId(shape),
                dx,
                dy,
            },
            InboundBody::DragEnd { shape, targets } => SessionEvent::DragEnd {
                shape: ShapeId(shape),
                targets: targets.0,
            },
            InboundBody::Skip => SessionEvent::Skip,
            InboundBody::NextLevel => SessionEvent::NextLevel,
            InboundBody::Reset => SessionEvent::Reset,
            InboundBody::Menu => SessionEvent::ReturnToMenu,
        };
        HostCommand::Event(event)
    }
}

// ============== Game -> Host Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    #[serde(rename = "effect")]
    Effect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotType {
    #[serde(rename = "snapshot")]
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_message")]
    InvalidMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireParent {
    Tray,
    Dragging,
    Slot(u16),
}

impl From<Parent> for WireParent {
    fn from(value: Parent) -> Self {
        match value {
            Parent::Tray => WireParent::Tray,
            Parent::Dragging => WireParent::Dragging,
            Parent::Slot(id) => WireParent::Slot(id.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueName {
    #[serde(rename = "pickup")]
    Pickup,
    #[serde(rename = "drop")]
    Drop,
    #[serde(rename = "correct")]
    Correct,
    #[serde(rename = "wrong")]
    Wrong,
    #[serde(rename = "level_complete")]
    LevelComplete,
}

impl From<AudioCue> for CueName {
    fn from(value: AudioCue) -> Self {
        match value {
            AudioCue::Pickup => CueName::Pickup,
            AudioCue::Drop => CueName::Drop,
            AudioCue::Correct => CueName::Correct,
            AudioCue::Wrong => CueName::Wrong,
            AudioCue::LevelComplete => CueName::LevelComplete,
        }
    }
}

/// One theme button on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireThemeChoice {
    pub index: usize,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<&ThemeChoice> for WireThemeChoice {
    fn from(value: &ThemeChoice) -> Self {
        Self {
            index: value.index,
            label: value.label.clone(),
            icon: value.icon.clone(),
        }
    }
}

/// Effect payload as sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WireEffect {
    PlayCue { cue: CueName },
    MoveShape { shape: u16, at: [f32; 2] },
    ReparentShape { shape: u16, parent: WireParent },
    SetShapeScale { shape: u16, scale: f32 },
    SetDragVisual { shape: u16, dragging: bool },
    SetSlotVisible { slot: u16, visible: bool },
    SetShapeSprite { shape: u16, sprite: String },
    SetSlotSprite { slot: u16, sprite: String },
    ShowLevelLabel { level: u32, text: String },
    ShowWinPanel { button: String, last_level: bool },
    HideWinPanel,
    Celebrate,
    ShowThemeChoices { themes: Vec<WireThemeChoice> },
    LoadScene { name: String },
}

impl WireEffect {
    /// Wire form of a core effect. `Persist` stays inside the host.
    pub fn from_effect(effect: &Effect) -> Option<Self> {
        let wire = match effect {
            Effect::PlayCue(cue) => WireEffect::PlayCue { cue: (*cue).into() },
            Effect::MoveShape { shape, position } => WireEffect::MoveShape {
                shape: shape.0,
                at: [position.x, position.y],
            },
            Effect::ReparentShape { shape, parent } => WireEffect::ReparentShape {
                shape: shape.0,
                parent: (*parent).into(),
            },
            Effect::SetShapeScale { shape, scale } => WireEffect::SetShapeScale {
                shape: shape.0,
                scale: *scale,
            },
            Effect::SetDragVisual { shape, dragging } => WireEffect::SetDragVisual {
                shape: shape.0,
                dragging: *dragging,
            },
            Effect::SetSlotVisible { slot, visible } => WireEffect::SetSlotVisible {
                slot: slot.0,
                visible: *visible,
            },
            Effect::SetShapeSprite { shape, sprite } => WireEffect::SetShapeSprite {
                shape: shape.0,
                sprite: sprite.clone(),
            },
            Effect::SetSlotSprite { slot, sprite } => WireEffect::SetSlotSprite {
                slot: slot.0,
                sprite: sprite.clone(),
            },
            Effect::ShowLevelLabel { level } => WireEffect::ShowLevelLabel {
                level: *level,
                text: format!("Level {}", level),
            },
            Effect::ShowWinPanel { next } => WireEffect::ShowWinPanel {
                button: next.label().to_string(),
                last_level: *next == NextAction::BackToMenu,
            },
            Effect::HideWinPanel => WireEffect::HideWinPanel,
            Effect::Celebrate => WireEffect::Celebrate,
            Effect::ShowThemeChoices(choices) => WireEffect::ShowThemeChoices {
                themes: choices.iter().map(WireThemeChoice::from).collect(),
            },
            Effect::LoadScene(name) => WireEffect::LoadScene { name: name.clone() },
            Effect::Persist(_) => return None,
        };
        Some(wire)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectMessage {
    #[serde(rename = "type")]
    pub msg_type: EffectType,
    pub seq: u64,
    pub ts: u64,
    pub effect: WireEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    pub msg_type: SnapshotType,
    pub seq: u64,
    pub ts: u64,
    pub phase: String,
    pub level: u32,
    pub total_levels: u32,
    pub unlocked_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<usize>,
    pub puzzle_complete: bool,
    pub shapes_placed: u32,
    pub shapes_total: u32,
    pub slots_total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown_ms: Option<u32>,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Message Parsing ==============

/// Parse one inbound line.
pub fn parse_message(json: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn create_effect(seq: u64, ts: u64, effect: WireEffect) -> EffectMessage {
    EffectMessage {
        msg_type: EffectType::Effect,
        seq,
        ts,
        effect,
    }
}

pub fn create_snapshot(seq: u64, ts: u64, snap: &SessionSnapshot) -> SnapshotMessage {
    SnapshotMessage {
        msg_type: SnapshotType::Snapshot,
        seq,
        ts,
        phase: snap.phase.as_str().to_string(),
        level: snap.current_level,
        total_levels: snap.total_levels,
        unlocked_level: snap.unlocked_level,
        theme: snap.theme_index,
        puzzle_complete: snap.puzzle_complete,
        shapes_placed: snap.shapes_placed,
        shapes_total: snap.shapes_total,
        slots_total: snap.slots_total,
        countdown_ms: snap.countdown_remaining_ms,
    }
}

pub fn create_error(seq: u64, ts: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts,
        code,
        message: message.to_string(),
    }
}

/// Best-effort `seq` from a line that failed to parse.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(s).ok()?;
    value.get("seq")?.as_u64()
}
