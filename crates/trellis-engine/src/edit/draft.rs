use thiserror::Error;
use trellis_script::ids::{search, search_mut};
use trellis_script::{Frame, FrameId, SlotValue, Value, CLASS_SLOT, FRAME_ID_SLOT};

/// A rejected draft operation. The draft and the tree are unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("no frame with id {0} in the tree")]
    FrameNotFound(FrameId),
    #[error("frame has no slot `{0}`")]
    UnknownField(String),
    #[error("slot `{0}` cannot be edited as text")]
    NotEditable(String),
    #[error("`{text}` is not a valid {kind} for slot `{name}`")]
    Invalid { name: String, kind: &'static str, text: String },
}

/// Scalar kinds a field can be edited as.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Event,
}

impl FieldKind {
    fn of(value: &SlotValue) -> Option<FieldKind> {
        match value {
            SlotValue::Value(Value::Bool(_)) => Some(FieldKind::Bool),
            SlotValue::Value(Value::Int(_)) => Some(FieldKind::Int),
            SlotValue::Value(Value::UInt(_)) => Some(FieldKind::UInt),
            SlotValue::Value(Value::Float(_)) => Some(FieldKind::Float),
            SlotValue::Value(Value::Str(_)) => Some(FieldKind::Str),
            SlotValue::Event(_) => Some(FieldKind::Event),
            SlotValue::Value(Value::Array(_) | Value::Nil) | SlotValue::Frame(_) | SlotValue::Path(_) => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::UInt => "uint",
            FieldKind::Float => "float",
            FieldKind::Str => "string",
            FieldKind::Event => "event",
        }
    }

    fn parse(self, text: &str) -> Option<SlotValue> {
        let value = match self {
            FieldKind::Bool => Value::Bool(text.trim().parse().ok()?),
            FieldKind::Int => Value::Int(text.trim().parse().ok()?),
            FieldKind::UInt => Value::UInt(text.trim().parse().ok()?),
            FieldKind::Float => Value::Float(text.trim().parse().ok()?),
            FieldKind::Str => Value::Str(text.to_string()),
            FieldKind::Event => return Some(SlotValue::Event(text.to_string())),
        };
        Some(SlotValue::Value(value))
    }
}

/// One editable slot as presented to a property panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub text: String,
}

/// A detached copy of one frame being edited as text fields.
///
/// Nothing reaches the tree until [`commit`](Self::commit); [`cancel`](Self::cancel)
/// throws the edits away. Reserved slots, child frames, paths, arrays and
/// `nil` values are not editable.
#[derive(Debug, Clone)]
pub struct FrameDraft {
    frame_id: FrameId,
    original: Frame,
    draft: Frame,
    modified: bool,
}

impl FrameDraft {
    /// Start editing the frame with `id`.
    pub fn begin(root: &Frame, id: FrameId) -> Result<Self, FieldError> {
        let original = search(root, id).ok_or(FieldError::FrameNotFound(id))?.clone();
        Ok(Self { frame_id: id, draft: original.clone(), original, modified: false })
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn frame(&self) -> &Frame {
        &self.draft
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Editable slots in slot order with their current text.
    pub fn fields(&self) -> Vec<Field> {
        self.draft
            .slots()
            .iter()
            .filter(|slot| !is_reserved(&slot.name))
            .filter_map(|slot| {
                let kind = FieldKind::of(&slot.value)?;
                Some(Field { name: slot.name.clone(), kind, text: field_text(&slot.value) })
            })
            .collect()
    }

    /// Replace the value of `name` by `text` parsed as the slot's current kind.
    pub fn set_field(&mut self, name: &str, text: &str) -> Result<(), FieldError> {
        if is_reserved(name) {
            return Err(FieldError::NotEditable(name.to_string()));
        }
        let current = self.draft.get(name).ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let kind = FieldKind::of(current).ok_or_else(|| FieldError::NotEditable(name.to_string()))?;
        let value = kind.parse(text).ok_or_else(|| FieldError::Invalid {
            name: name.to_string(),
            kind: kind.name(),
            text: text.to_string(),
        })?;
        self.draft.set(name, value);
        self.modified = true;
        Ok(())
    }

    /// Write the draft back over the frame with the same id. Child frames
    /// of the live frame are kept; only editable slots are copied.
    pub fn commit(&mut self, root: &mut Frame) -> Result<(), FieldError> {
        let target = search_mut(root, self.frame_id).ok_or(FieldError::FrameNotFound(self.frame_id))?;
        for slot in self.draft.slots().iter().filter(|s| !is_reserved(&s.name)) {
            if FieldKind::of(&slot.value).is_some() {
                target.set(slot.name.clone(), slot.value.clone());
            }
        }
        log::debug!("committed draft of frame {}", self.frame_id);
        self.original = target.clone();
        self.draft = self.original.clone();
        self.modified = false;
        Ok(())
    }

    /// Drop all uncommitted edits.
    pub fn cancel(&mut self) {
        self.draft = self.original.clone();
        self.modified = false;
    }
}

fn is_reserved(name: &str) -> bool {
    name == CLASS_SLOT || name == FRAME_ID_SLOT
}

fn field_text(value: &SlotValue) -> String {
    match value {
        SlotValue::Value(Value::Str(s)) => s.clone(),
        SlotValue::Value(v) => v.to_string(),
        SlotValue::Event(body) => body.clone(),
        SlotValue::Frame(_) | SlotValue::Path(_) => String::new(),
    }
}
