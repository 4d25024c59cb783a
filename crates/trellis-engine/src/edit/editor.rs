use trellis_script::ids::{assign_frame_ids, init_frame_ids, next_frame_id};
use trellis_script::{Frame, FrameId};

use crate::coords::{Rect, Vec2};
use crate::drop::{classify, DetectedPoint, DropPolicy};

use super::{insert, FieldError, FrameDraft, InsertError};

/// One applied edit, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// A frame was dropped into the tree; `frame_id` is the id its root got.
    Insert { frame_id: FrameId },
    /// A draft was committed over the frame with `frame_id`.
    Update { frame_id: FrameId },
}

/// Owns a frame tree being edited and the log of edits applied to it.
#[derive(Debug, Clone)]
pub struct FrameEditor {
    root: Frame,
    history: Vec<EditCommand>,
    policy: DropPolicy,
}

impl FrameEditor {
    /// Take ownership of `root` and number its frames from 0.
    pub fn new(mut root: Frame) -> Self {
        let next = init_frame_ids(&mut root);
        log::debug!("editor opened with {next} frames");
        Self { root, history: Vec::new(), policy: DropPolicy::default() }
    }

    pub fn with_policy(mut self, policy: DropPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Frame {
        &self.root
    }

    pub fn into_root(self) -> Frame {
        self.root
    }

    pub fn history(&self) -> &[EditCommand] {
        &self.history
    }

    pub fn policy(&self) -> &DropPolicy {
        &self.policy
    }

    /// Number `frame` after the ids already in the tree, then insert it at
    /// `detected`. Returns the id given to the new frame's root.
    pub fn drop_frame(&mut self, name: &str, mut frame: Frame, detected: DetectedPoint) -> Result<FrameId, InsertError> {
        let first = next_frame_id(&self.root);
        assign_frame_ids(&mut frame, first);
        insert(&mut self.root, name, frame, detected.frame_id, detected.position)?;
        self.history.push(EditCommand::Insert { frame_id: first });
        log::info!("dropped `{name}` as frame {first} ({detected})");
        Ok(first)
    }

    /// Classify `point` against the target's rectangle with the editor's
    /// policy, then [`drop_frame`](Self::drop_frame).
    pub fn drop_at(
        &mut self,
        name: &str,
        frame: Frame,
        target: FrameId,
        target_rect: Rect,
        point: Vec2,
    ) -> Result<FrameId, InsertError> {
        let position = classify(point, target_rect, &self.policy);
        self.drop_frame(name, frame, DetectedPoint::new(target, position))
    }

    pub fn begin_edit(&self, id: FrameId) -> Result<FrameDraft, FieldError> {
        FrameDraft::begin(&self.root, id)
    }

    pub fn commit(&mut self, draft: &mut FrameDraft) -> Result<(), FieldError> {
        draft.commit(&mut self.root)?;
        self.history.push(EditCommand::Update { frame_id: draft.frame_id() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop::DropPosition;
    use pretty_assertions::assert_eq;
    use trellis_script::ids::{collect_frame_ids, search};
    use trellis_script::{parse_str, FrameClass, SlotValue, Value};

    fn editor() -> FrameEditor {
        // root 0, a 1, b 2
        FrameEditor::new(
            parse_str(r#"{ class: "HBox"  a: { class: "Button" }  b: { class: "Button" } }"#).unwrap(),
        )
    }

    fn button() -> Frame {
        Frame::with_class(FrameClass::Button)
    }

    #[test]
    fn new_numbers_frames() {
        assert_eq!(collect_frame_ids(editor().root()), vec![0, 1, 2]);
    }

    #[test]
    fn drop_assigns_next_id_and_logs() {
        let mut ed = editor();
        let id = ed.drop_frame("c", button(), DetectedPoint::new(2, DropPosition::Left)).unwrap();
        assert_eq!(id, 3);
        assert_eq!(ed.history(), [EditCommand::Insert { frame_id: 3 }]);
        let names: Vec<&str> = ed.root().child_frames().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "c", "b"]);
    }

    #[test]
    fn dropped_subtree_is_numbered_in_preorder() {
        let mut ed = editor();
        let mut column = Frame::with_class(FrameClass::VBox);
        column.set("x", button());
        column.set("y", button());
        ed.drop_frame("col", column, DetectedPoint::new(1, DropPosition::Right)).unwrap();
        assert_eq!(collect_frame_ids(ed.root()), vec![0, 1, 3, 4, 5, 2]);
    }

    #[test]
    fn failed_drop_is_not_logged() {
        let mut ed = editor();
        let before = ed.root().clone();
        let err = ed.drop_frame("c", button(), DetectedPoint::new(40, DropPosition::Top)).unwrap_err();
        assert_eq!(err, InsertError::TargetNotFound(40));
        assert!(ed.history().is_empty());
        assert_eq!(ed.root(), &before);
    }

    #[test]
    fn drop_at_classifies_point() {
        let mut ed = editor();
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        // well above the target: perpendicular to the HBox, so it wraps
        ed.drop_at("d", button(), 1, rect, Vec2::new(50.0, -60.0)).unwrap();
        let wrapper = ed.root().get("a").and_then(SlotValue::as_frame).unwrap();
        assert_eq!(wrapper.frame_class(), Ok(FrameClass::VBox));
        let names: Vec<&str> = wrapper.child_frames().map(|(n, _)| n).collect();
        assert_eq!(names, ["d", "a"]);
    }

    #[test]
    fn commit_draft_is_logged() {
        let mut ed = FrameEditor::new(
            parse_str(r#"{ ok: { class: "Button"  title: "OK" } }"#).unwrap(),
        );
        let mut draft = ed.begin_edit(1).unwrap();
        draft.set_field("title", "Apply").unwrap();
        ed.commit(&mut draft).unwrap();

        assert_eq!(ed.history(), [EditCommand::Update { frame_id: 1 }]);
        let ok = search(ed.root(), 1).unwrap();
        assert_eq!(ok.get("title"), Some(&SlotValue::Value(Value::from("Apply"))));
    }

    #[test]
    fn edit_of_unknown_frame_is_not_logged() {
        let ed = editor();
        assert_eq!(ed.begin_edit(9).unwrap_err(), FieldError::FrameNotFound(9));
        assert!(ed.history().is_empty());
    }
}
