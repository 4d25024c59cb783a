use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;
use crate::lexer::is_identifier;
use crate::value::Value;

/// Reserved slot holding the frame's [`FrameClass`] name.
pub const CLASS_SLOT: &str = "class";
/// Reserved slot holding the frame's tree-unique [`FrameId`].
pub const FRAME_ID_SLOT: &str = "frameid";

/// Tree-unique identity assigned by preorder traversal.
pub type FrameId = u64;

/// True when `name` can label a new child slot: it encodes as an identifier
/// and is neither [`CLASS_SLOT`] nor [`FRAME_ID_SLOT`].
pub fn is_child_slot_name(name: &str) -> bool {
    is_identifier(name) && name != CLASS_SLOT && name != FRAME_ID_SLOT
}

// ── FrameClass ────────────────────────────────────────────────────────────

/// Layout direction of a box.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// The kind of a frame, stored as a string in its `class` slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameClass {
    VBox,
    HBox,
    Button,
    Image,
}

impl FrameClass {
    pub fn name(self) -> &'static str {
        match self {
            FrameClass::VBox => "VBox",
            FrameClass::HBox => "HBox",
            FrameClass::Button => "Button",
            FrameClass::Image => "Image",
        }
    }

    /// Layout axis for boxes, `None` for leaf widgets.
    pub fn axis(self) -> Option<Axis> {
        match self {
            FrameClass::VBox => Some(Axis::Vertical),
            FrameClass::HBox => Some(Axis::Horizontal),
            FrameClass::Button | FrameClass::Image => None,
        }
    }

    pub fn is_box(self) -> bool {
        self.axis().is_some()
    }

    /// The box class laid out along `axis`.
    pub fn box_for(axis: Axis) -> FrameClass {
        match axis {
            Axis::Horizontal => FrameClass::HBox,
            Axis::Vertical => FrameClass::VBox,
        }
    }
}

impl fmt::Display for FrameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameClass {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VBox" => Ok(FrameClass::VBox),
            "HBox" => Ok(FrameClass::HBox),
            "Button" => Ok(FrameClass::Button),
            "Image" => Ok(FrameClass::Image),
            other => Err(FrameError::UnknownClass(other.to_string())),
        }
    }
}

// ── SlotValue ─────────────────────────────────────────────────────────────

/// What a slot holds.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// Scalar or array configuration value.
    Value(Value),
    /// Opaque event-handler source, never parsed here.
    Event(String),
    /// Nested child frame (boxes only).
    Frame(Frame),
    /// Dotted symbolic reference such as `a.b.c`.
    Path(Vec<String>),
}

impl SlotValue {
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            SlotValue::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_frame_mut(&mut self) -> Option<&mut Frame> {
        match self {
            SlotValue::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            SlotValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self, SlotValue::Frame(_))
    }
}

impl From<Value> for SlotValue {
    fn from(v: Value) -> Self {
        SlotValue::Value(v)
    }
}

impl From<Frame> for SlotValue {
    fn from(frame: Frame) -> Self {
        SlotValue::Frame(frame)
    }
}

// ── Slot ──────────────────────────────────────────────────────────────────

/// A named entry of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub value: SlotValue,
}

// ── Frame ─────────────────────────────────────────────────────────────────

/// A node of the UI description tree.
///
/// Slots are kept in insertion order; that order is the layout order of the
/// children and survives parse, edit, and encode unchanged.
///
/// ```text
/// {
///     class: "Button"
///     frameid: 3
///     title: "OK"
///     clicked: event %{ console.log("clicked"); }%
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    slots: Vec<Slot>,
}

impl Frame {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// A frame whose first slot is `class`.
    pub fn with_class(class: FrameClass) -> Self {
        let mut frame = Self::new();
        frame.set_frame_class(class);
        frame
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.slots.iter().find(|s| s.name == name).map(|s| &s.value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut SlotValue> {
        self.slots.iter_mut().find(|s| s.name == name).map(|s| &mut s.value)
    }

    /// Set a slot. An existing slot keeps its position and gets the new value;
    /// a new slot is appended.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SlotValue>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = value,
            None => self.slots.push(Slot { name, value }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SlotValue> {
        let idx = self.position(name)?;
        Some(self.slots.remove(idx).value)
    }

    /// Insert a new slot immediately before `anchor`.
    ///
    /// Returns `false` (and leaves the frame untouched) when `anchor` is
    /// missing or `name` is already taken.
    pub fn insert_before(&mut self, anchor: &str, name: impl Into<String>, value: impl Into<SlotValue>) -> bool {
        self.insert_at_anchor(anchor, 0, name.into(), value.into())
    }

    /// Insert a new slot immediately after `anchor`. Same failure rules as
    /// [`insert_before`](Self::insert_before).
    pub fn insert_after(&mut self, anchor: &str, name: impl Into<String>, value: impl Into<SlotValue>) -> bool {
        self.insert_at_anchor(anchor, 1, name.into(), value.into())
    }

    fn insert_at_anchor(&mut self, anchor: &str, offset: usize, name: String, value: SlotValue) -> bool {
        if self.contains(&name) {
            return false;
        }
        let Some(idx) = self.position(anchor) else {
            return false;
        };
        self.slots.insert(idx + offset, Slot { name, value });
        true
    }

    /// Child frames in slot order, with their slot names.
    pub fn child_frames(&self) -> impl Iterator<Item = (&str, &Frame)> {
        self.slots
            .iter()
            .filter_map(|s| s.value.as_frame().map(|f| (s.name.as_str(), f)))
    }

    /// Mutable child frames in slot order, with their slot names.
    pub fn child_frames_mut(&mut self) -> impl Iterator<Item = (&str, &mut Frame)> {
        self.slots.iter_mut().filter_map(|Slot { name, value }| match value {
            SlotValue::Frame(frame) => Some((name.as_str(), frame)),
            _ => None,
        })
    }

    /// The child frame stored at slot index `idx`, if that slot holds one.
    pub fn slot_frame(&self, idx: usize) -> Option<&Frame> {
        self.slots.get(idx)?.value.as_frame()
    }

    pub fn slot_frame_mut(&mut self, idx: usize) -> Option<&mut Frame> {
        self.slots.get_mut(idx)?.value.as_frame_mut()
    }

    /// Replace the value at slot index `idx`, returning the old one.
    pub fn replace_at(&mut self, idx: usize, value: impl Into<SlotValue>) -> Option<SlotValue> {
        let slot = self.slots.get_mut(idx)?;
        Some(std::mem::replace(&mut slot.value, value.into()))
    }

    pub fn frame_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_frame()).count()
    }

    /// `base` if unused, else the first of `base_1`, `base_2`, … that is free.
    pub fn unique_slot_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    // ── reserved slots ────────────────────────────────────────────────────

    /// The frame's class. A frame without a `class` slot is a plain
    /// vertical box, which is how document roots are usually written.
    pub fn frame_class(&self) -> Result<FrameClass, FrameError> {
        match self.get(CLASS_SLOT) {
            None => Ok(FrameClass::VBox),
            Some(SlotValue::Value(Value::Str(name))) => name.parse(),
            Some(other) => Err(FrameError::ClassNotString(describe_slot(other))),
        }
    }

    pub fn set_frame_class(&mut self, class: FrameClass) {
        self.set(CLASS_SLOT, Value::Str(class.name().to_string()));
    }

    /// The frame's id, or `None` when unassigned or not a non-negative integer.
    pub fn frame_id(&self) -> Option<FrameId> {
        match self.get(FRAME_ID_SLOT)? {
            SlotValue::Value(v) => v.as_u64(),
            _ => None,
        }
    }

    pub fn set_frame_id(&mut self, id: FrameId) {
        self.set(FRAME_ID_SLOT, Value::UInt(id));
    }

    /// Check the reserved slots and class constraints of this frame and its
    /// whole subtree.
    pub fn validate(&self) -> Result<(), FrameError> {
        let class = self.frame_class()?;
        if let Some(value) = self.get(FRAME_ID_SLOT) {
            if self.frame_id().is_none() {
                return Err(FrameError::InvalidFrameId(describe_slot(value)));
            }
        }
        for slot in &self.slots {
            match &slot.value {
                SlotValue::Frame(child) => {
                    if !class.is_box() {
                        return Err(FrameError::ChildInLeaf {
                            class: class.name().to_string(),
                            slot: slot.name.clone(),
                        });
                    }
                    child.validate()?;
                }
                SlotValue::Event(_) if class.is_box() => {
                    return Err(FrameError::EventInBox { slot: slot.name.clone() });
                }
                SlotValue::Event(_) | SlotValue::Value(_) | SlotValue::Path(_) => {}
            }
        }
        Ok(())
    }
}

fn describe_slot(value: &SlotValue) -> String {
    match value {
        SlotValue::Value(v) => format!("{} `{v}`", v.kind()),
        SlotValue::Event(_) => "event".to_string(),
        SlotValue::Frame(_) => "frame".to_string(),
        SlotValue::Path(p) => format!("path `{}`", p.join(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(frame: &Frame) -> Vec<&str> {
        frame.slots().iter().map(|s| s.name.as_str()).collect()
    }

    // ── set ───────────────────────────────────────────────────────────────

    #[test]
    fn set_appends_new_slots_in_order() {
        let mut f = Frame::new();
        f.set("b", Value::UInt(1));
        f.set("a", Value::UInt(2));
        assert_eq!(names(&f), ["b", "a"]);
    }

    #[test]
    fn set_overwrites_in_place() {
        let mut f = Frame::new();
        f.set("a", Value::UInt(1));
        f.set("b", Value::UInt(2));
        f.set("a", Value::UInt(3));
        assert_eq!(names(&f), ["a", "b"]);
        assert_eq!(f.get("a"), Some(&SlotValue::Value(Value::UInt(3))));
    }

    #[test]
    fn child_slot_names_exclude_reserved() {
        assert!(is_child_slot_name("ok_button"));
        assert!(!is_child_slot_name(CLASS_SLOT));
        assert!(!is_child_slot_name(FRAME_ID_SLOT));
        assert!(!is_child_slot_name("ok-button"));
    }

    // ── insert_before / insert_after ──────────────────────────────────────

    #[test]
    fn insert_around_anchor() {
        let mut f = Frame::new();
        f.set("a", Value::Nil);
        f.set("c", Value::Nil);
        assert!(f.insert_before("c", "b", Value::Nil));
        assert!(f.insert_after("c", "d", Value::Nil));
        assert_eq!(names(&f), ["a", "b", "c", "d"]);
    }

    #[test]
    fn insert_rejects_missing_anchor_and_taken_name() {
        let mut f = Frame::new();
        f.set("a", Value::Nil);
        assert!(!f.insert_before("zz", "b", Value::Nil));
        assert!(!f.insert_after("a", "a", Value::Nil));
        assert_eq!(names(&f), ["a"]);
    }

    #[test]
    fn unique_slot_name_skips_taken() {
        let mut f = Frame::new();
        f.set("button", Value::Nil);
        f.set("button_1", Value::Nil);
        assert_eq!(f.unique_slot_name("button"), "button_2");
        assert_eq!(f.unique_slot_name("image"), "image");
    }

    // ── class / frameid ───────────────────────────────────────────────────

    #[test]
    fn missing_class_is_vbox() {
        assert_eq!(Frame::new().frame_class(), Ok(FrameClass::VBox));
    }

    #[test]
    fn unknown_class_is_an_error() {
        let mut f = Frame::new();
        f.set(CLASS_SLOT, Value::from("Slider"));
        assert_eq!(f.frame_class(), Err(FrameError::UnknownClass("Slider".into())));
    }

    #[test]
    fn frame_id_round_trip() {
        let mut f = Frame::with_class(FrameClass::Button);
        assert_eq!(f.frame_id(), None);
        f.set_frame_id(7);
        assert_eq!(f.frame_id(), Some(7));
        assert_eq!(names(&f), [CLASS_SLOT, FRAME_ID_SLOT]);
    }

    #[test]
    fn class_axes() {
        assert_eq!(FrameClass::HBox.axis(), Some(Axis::Horizontal));
        assert_eq!(FrameClass::Image.axis(), None);
        assert_eq!(FrameClass::box_for(Axis::Horizontal.perpendicular()), FrameClass::VBox);
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn validate_rejects_child_under_leaf() {
        let mut button = Frame::with_class(FrameClass::Button);
        button.set("inner", Frame::new());
        assert!(matches!(button.validate(), Err(FrameError::ChildInLeaf { .. })));
    }

    #[test]
    fn validate_rejects_negative_frame_id() {
        let mut f = Frame::new();
        f.set(FRAME_ID_SLOT, Value::Int(-1));
        assert!(matches!(f.validate(), Err(FrameError::InvalidFrameId(_))));
    }

    #[test]
    fn validate_rejects_event_on_box() {
        let mut f = Frame::with_class(FrameClass::HBox);
        f.set("clicked", SlotValue::Event(String::new()));
        assert!(matches!(f.validate(), Err(FrameError::EventInBox { .. })));
    }

    #[test]
    fn validate_accepts_nested_tree() {
        let mut button = Frame::with_class(FrameClass::Button);
        button.set("clicked", SlotValue::Event("go()".into()));
        let mut root = Frame::with_class(FrameClass::HBox);
        root.set("ok", button);
        assert_eq!(root.validate(), Ok(()));
    }
}
