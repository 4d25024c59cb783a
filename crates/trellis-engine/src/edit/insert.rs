use std::collections::HashSet;

use thiserror::Error;
use trellis_script::ids::{collect_frame_ids, frame_at, frame_at_mut, locate, next_frame_id};
use trellis_script::{is_child_slot_name, Axis, Frame, FrameClass, FrameId, SlotValue, Value};

use crate::drop::DropPosition;

// ── InsertError ───────────────────────────────────────────────────────────

/// Why a drop could not be applied. The tree is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// No frame below the root carries the target id (stale hit-test data).
    #[error("no frame with id {0} below the root")]
    TargetNotFound(FrameId),
    /// The target's parent is a leaf widget.
    #[error("frame holding the target is a {0} leaf, not a box")]
    NotABox(FrameClass),
    /// The position cannot be applied to the target in this tree.
    #[error("cannot insert at {position}: {reason}")]
    UnsupportedPosition { position: DropPosition, reason: String },
    /// The receiving frame already has a slot with the new slot's name.
    #[error("slot name `{0}` is already used in the receiving frame")]
    SlotNameTaken(String),
    /// The new subtree reuses an id already present in the tree.
    #[error("frame id {0} of the new subtree already exists in the tree")]
    DuplicateFrameId(FrameId),
    /// The slot name is not an identifier, or is one of the reserved slots.
    #[error("`{0}` cannot be used as a slot name")]
    InvalidSlotName(String),
}

impl InsertError {
    /// `true` for outcomes that indicate a corrupted tree or a classifier
    /// bug rather than a stale or rejected drop.
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            InsertError::NotABox(_) | InsertError::UnsupportedPosition { .. } => true,
            InsertError::TargetNotFound(_)
            | InsertError::SlotNameTaken(_)
            | InsertError::DuplicateFrameId(_)
            | InsertError::InvalidSlotName(_) => false,
        }
    }

    fn unsupported(position: DropPosition, reason: impl Into<String>) -> Self {
        InsertError::UnsupportedPosition { position, reason: reason.into() }
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────

/// A fully verified edit. Computing it never touches the tree; applying it
/// cannot fail.
#[derive(Debug)]
enum Plan {
    /// Insert beside the target inside its parent box.
    Sibling { parent: Vec<usize>, anchor: String, before: bool },
    /// Replace the target slot with a new box of `axis` holding the target
    /// and the new frame.
    Wrap { parent: Vec<usize>, child_idx: usize, anchor: String, axis: Axis, before: bool, wrapper_id: FrameId },
    /// Append into an empty target box.
    Fill { target: Vec<usize> },
}

// ── insert ────────────────────────────────────────────────────────────────

/// Insert `frame` under slot `name` at `position` relative to the frame
/// with id `target`.
///
/// `name` must be an identifier other than `class` or `frameid`, and every
/// frame of `frame` must already carry an id absent from `root` (see
/// [`next_frame_id`] and [`assign_frame_ids`](trellis_script::ids::assign_frame_ids)).
/// These two checks come first, for every target and position.
///
/// - Once they pass, a root without child frames receives `frame` directly,
///   whatever the target and position.
/// - A position along the parent box's axis inserts a sibling before
///   (`Left`/`Top`) or after (`Right`/`Bottom`) the target.
/// - A perpendicular position wraps the target in a new box of the other
///   axis and puts `frame` before or after it there.
/// - `Center` fills an empty target box and is rejected anywhere else.
///
/// All checks run before the first mutation, so an error leaves `root`
/// exactly as it was.
pub fn insert(
    root: &mut Frame,
    name: &str,
    frame: Frame,
    target: FrameId,
    position: DropPosition,
) -> Result<(), InsertError> {
    check_slot_name(name)?;
    check_frame_ids(root, &frame)?;

    if root.frame_slot_count() == 0 {
        let slot = if root.contains(name) {
            let unique = root.unique_slot_name(name);
            log::warn!("root already has a `{name}` slot, attaching as `{unique}`");
            unique
        } else {
            name.to_string()
        };
        log::debug!("attaching `{slot}` to empty root");
        root.set(slot, frame);
        return Ok(());
    }

    let plan = plan(root, name, &frame, target, position).inspect_err(|e| {
        if e.is_invariant_violation() {
            log::error!("insert of `{name}` at frame {target} rejected: {e}");
        } else {
            log::warn!("insert of `{name}` at frame {target} rejected: {e}");
        }
    })?;
    log::debug!("insert of `{name}` at frame {target} ({position}): {plan:?}");
    apply(root, name, frame, plan);
    Ok(())
}

fn check_slot_name(name: &str) -> Result<(), InsertError> {
    if is_child_slot_name(name) {
        Ok(())
    } else {
        log::warn!("rejected slot name `{name}`");
        Err(InsertError::InvalidSlotName(name.to_string()))
    }
}

fn check_frame_ids(root: &Frame, frame: &Frame) -> Result<(), InsertError> {
    let existing: HashSet<FrameId> = collect_frame_ids(root).into_iter().collect();
    match collect_frame_ids(frame).into_iter().find(|id| existing.contains(id)) {
        Some(dup) => Err(InsertError::DuplicateFrameId(dup)),
        None => Ok(()),
    }
}

fn plan(
    root: &Frame,
    name: &str,
    frame: &Frame,
    target: FrameId,
    position: DropPosition,
) -> Result<Plan, InsertError> {
    let path = locate(root, target).ok_or(InsertError::TargetNotFound(target))?;

    let Some(axis) = position.axis() else {
        return plan_center(root, name, path, position);
    };

    // The root has no parent slot to insert beside.
    let Some((&child_idx, parent_path)) = path.split_last() else {
        return Err(InsertError::TargetNotFound(target));
    };
    let parent = frame_at(root, parent_path).ok_or(InsertError::TargetNotFound(target))?;
    let anchor = parent.slots()[child_idx].name.clone();

    let parent_class = parent
        .frame_class()
        .map_err(|e| InsertError::unsupported(position, format!("parent of target has {e}")))?;
    let parent_axis = parent_class.axis().ok_or(InsertError::NotABox(parent_class))?;
    let before = position.is_leading();

    if axis == parent_axis {
        if parent.contains(name) {
            return Err(InsertError::SlotNameTaken(name.to_string()));
        }
        Ok(Plan::Sibling { parent: parent_path.to_vec(), anchor, before })
    } else {
        if anchor == name {
            return Err(InsertError::SlotNameTaken(name.to_string()));
        }
        let wrapper_id = next_frame_id(root).max(next_frame_id(frame));
        Ok(Plan::Wrap { parent: parent_path.to_vec(), child_idx, anchor, axis, before, wrapper_id })
    }
}

fn plan_center(root: &Frame, name: &str, path: Vec<usize>, position: DropPosition) -> Result<Plan, InsertError> {
    let target = frame_at(root, &path)
        .ok_or_else(|| InsertError::unsupported(position, "target vanished"))?;
    match target.frame_class() {
        Ok(class) if class.is_box() && target.frame_slot_count() == 0 => {
            if target.contains(name) {
                return Err(InsertError::SlotNameTaken(name.to_string()));
            }
            Ok(Plan::Fill { target: path })
        }
        Ok(class) if class.is_box() => Err(InsertError::unsupported(position, "target box is not empty")),
        Ok(class) => Err(InsertError::unsupported(position, format!("target is a {class} leaf"))),
        Err(e) => Err(InsertError::unsupported(position, format!("target has {e}"))),
    }
}

fn apply(root: &mut Frame, name: &str, frame: Frame, plan: Plan) {
    // Paths were resolved against this same tree by `plan`; a miss here
    // means the plan is stale, which `insert` never allows.
    match plan {
        Plan::Sibling { parent, anchor, before } => {
            let Some(parent) = frame_at_mut(root, &parent) else { return };
            let inserted = if before {
                parent.insert_before(&anchor, name, frame)
            } else {
                parent.insert_after(&anchor, name, frame)
            };
            debug_assert!(inserted, "verified sibling insert failed");
        }
        Plan::Wrap { parent, child_idx, anchor, axis, before, wrapper_id } => {
            let Some(parent) = frame_at_mut(root, &parent) else { return };
            let Some(original) = parent.replace_at(child_idx, Value::Nil) else { return };

            let mut wrapper = Frame::with_class(FrameClass::box_for(axis));
            wrapper.set_frame_id(wrapper_id);
            wrapper.set(anchor.clone(), original);
            if before {
                wrapper.insert_before(&anchor, name, frame);
            } else {
                wrapper.insert_after(&anchor, name, frame);
            }
            parent.replace_at(child_idx, SlotValue::Frame(wrapper));
        }
        Plan::Fill { target } => {
            if let Some(target) = frame_at_mut(root, &target) {
                target.set(name, frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use trellis_script::ids::{init_frame_ids, search};
    use trellis_script::{encode, parse_str};

    fn leaf(class: FrameClass, id: FrameId) -> Frame {
        let mut f = Frame::with_class(class);
        f.set_frame_id(id);
        f
    }

    fn child_names(frame: &Frame) -> Vec<String> {
        frame.child_frames().map(|(n, _)| n.to_string()).collect()
    }

    /// HBox root holding `a` (id 0) then `b` (id 1). The root itself has no id.
    fn hbox_ab() -> Frame {
        let mut root = Frame::with_class(FrameClass::HBox);
        root.set("a", leaf(FrameClass::Button, 0));
        root.set("b", leaf(FrameClass::Button, 1));
        root
    }

    // ── same axis ─────────────────────────────────────────────────────────

    #[test]
    fn left_of_target_in_hbox_inserts_sibling_before() {
        let mut root = hbox_ab();
        insert(&mut root, "c", leaf(FrameClass::Button, 2), 1, DropPosition::Left).unwrap();
        assert_eq!(child_names(&root), ["a", "c", "b"]);
        assert_eq!(root.frame_class(), Ok(FrameClass::HBox));
    }

    #[test]
    fn right_of_target_in_hbox_inserts_sibling_after() {
        let mut root = hbox_ab();
        insert(&mut root, "c", leaf(FrameClass::Button, 2), 0, DropPosition::Right).unwrap();
        assert_eq!(child_names(&root), ["a", "c", "b"]);
    }

    #[test]
    fn vbox_top_and_bottom_are_siblings() {
        let mut root = Frame::with_class(FrameClass::VBox);
        root.set("a", leaf(FrameClass::Image, 0));
        insert(&mut root, "top", leaf(FrameClass::Button, 1), 0, DropPosition::Top).unwrap();
        insert(&mut root, "bottom", leaf(FrameClass::Button, 2), 0, DropPosition::Bottom).unwrap();
        assert_eq!(child_names(&root), ["top", "a", "bottom"]);
    }

    // ── perpendicular ─────────────────────────────────────────────────────

    #[test]
    fn top_of_target_in_hbox_wraps_in_vbox() {
        let mut root = Frame::with_class(FrameClass::HBox);
        root.set("a", leaf(FrameClass::Button, 0));
        insert(&mut root, "d", leaf(FrameClass::Button, 1), 0, DropPosition::Top).unwrap();

        assert_eq!(child_names(&root), ["a"]);
        let wrapper = root.get("a").and_then(SlotValue::as_frame).unwrap();
        assert_eq!(wrapper.frame_class(), Ok(FrameClass::VBox));
        assert_eq!(child_names(wrapper), ["d", "a"]);
        assert_eq!(wrapper.frame_id(), Some(2));
        assert_eq!(search(&root, 0).and_then(|f| f.frame_class().ok()), Some(FrameClass::Button));
    }

    #[test]
    fn right_of_target_in_vbox_wraps_in_hbox_after() {
        let mut root = Frame::with_class(FrameClass::VBox);
        root.set("a", leaf(FrameClass::Button, 0));
        root.set("b", leaf(FrameClass::Button, 1));
        insert(&mut root, "n", leaf(FrameClass::Image, 2), 0, DropPosition::Right).unwrap();

        assert_eq!(child_names(&root), ["a", "b"]);
        let wrapper = root.get("a").and_then(SlotValue::as_frame).unwrap();
        assert_eq!(wrapper.frame_class(), Ok(FrameClass::HBox));
        assert_eq!(child_names(wrapper), ["a", "n"]);
    }

    #[test]
    fn wrap_in_nested_box_leaves_siblings_alone() {
        let mut root = parse_str(
            r#"{ class: "VBox"
                 row: { class: "HBox"  x: { class: "Button" }  y: { class: "Button" } }
                 tail: { class: "Image" } }"#,
        )
        .unwrap();
        init_frame_ids(&mut root); // root 0, row 1, x 2, y 3, tail 4
        insert(&mut root, "z", leaf(FrameClass::Button, 5), 3, DropPosition::Bottom).unwrap();

        let row = search(&root, 1).unwrap();
        assert_eq!(child_names(row), ["x", "y"]);
        let wrapper = row.get("y").and_then(SlotValue::as_frame).unwrap();
        assert_eq!(wrapper.frame_class(), Ok(FrameClass::VBox));
        assert_eq!(child_names(wrapper), ["y", "z"]);
        assert_eq!(wrapper.frame_id(), Some(6));
        assert_eq!(child_names(&root), ["row", "tail"]);
    }

    // ── empty root ────────────────────────────────────────────────────────

    #[test]
    fn empty_root_attaches_directly() {
        for position in [DropPosition::Center, DropPosition::Left, DropPosition::Bottom] {
            let mut root = Frame::new();
            insert(&mut root, "first", leaf(FrameClass::Button, 0), 999, position).unwrap();
            assert_eq!(child_names(&root), ["first"]);
        }
    }

    #[test]
    fn empty_root_with_scalar_slot_of_same_name() {
        let mut root = Frame::new();
        root.set("title", Value::from("doc"));
        insert(&mut root, "title", leaf(FrameClass::Button, 0), 0, DropPosition::Left).unwrap();
        assert_eq!(child_names(&root), ["title_1"]);
    }

    // ── center ────────────────────────────────────────────────────────────

    #[test]
    fn center_on_empty_box_fills_it() {
        let mut root = Frame::with_class(FrameClass::HBox);
        root.set("box", leaf(FrameClass::VBox, 0));
        insert(&mut root, "inner", leaf(FrameClass::Button, 1), 0, DropPosition::Center).unwrap();
        let target = search(&root, 0).unwrap();
        assert_eq!(child_names(target), ["inner"]);
    }

    #[test]
    fn center_on_leaf_is_rejected() {
        let mut root = hbox_ab();
        let before = root.clone();
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 2), 1, DropPosition::Center).unwrap_err();
        assert!(matches!(err, InsertError::UnsupportedPosition { .. }));
        assert_eq!(root, before);
    }

    #[test]
    fn center_on_non_empty_box_is_rejected() {
        let mut root = Frame::with_class(FrameClass::VBox);
        let mut row = leaf(FrameClass::HBox, 0);
        row.set("x", leaf(FrameClass::Button, 1));
        root.set("row", row);
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 2), 0, DropPosition::Center).unwrap_err();
        assert!(matches!(err, InsertError::UnsupportedPosition { .. }));
    }

    // ── failures leave the tree untouched ─────────────────────────────────

    #[test]
    fn unknown_target_is_reported_without_mutation() {
        let mut root = hbox_ab();
        let before = encode(&root);
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 2), 42, DropPosition::Left).unwrap_err();
        assert_eq!(err, InsertError::TargetNotFound(42));
        assert!(!err.is_invariant_violation());
        assert_eq!(encode(&root), before);
    }

    #[test]
    fn root_as_target_is_not_found() {
        let mut root = hbox_ab();
        root.set_frame_id(9);
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 2), 9, DropPosition::Left).unwrap_err();
        assert_eq!(err, InsertError::TargetNotFound(9));
    }

    #[test]
    fn leaf_parent_is_not_a_box() {
        let mut button = leaf(FrameClass::Button, 0);
        button.set("icon", leaf(FrameClass::Image, 1));
        let mut root = Frame::with_class(FrameClass::VBox);
        root.set("button", button);
        let before = root.clone();
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 2), 1, DropPosition::Left).unwrap_err();
        assert_eq!(err, InsertError::NotABox(FrameClass::Button));
        assert!(err.is_invariant_violation());
        assert_eq!(root, before);
    }

    #[test]
    fn unknown_parent_class_is_unsupported() {
        let mut root = Frame::new();
        root.set(trellis_script::CLASS_SLOT, Value::from("Grid"));
        root.set("a", leaf(FrameClass::Button, 0));
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 1), 0, DropPosition::Top).unwrap_err();
        assert!(matches!(err, InsertError::UnsupportedPosition { .. }));
    }

    #[test]
    fn class_less_root_behaves_as_vbox() {
        let mut root = Frame::new();
        root.set("a", leaf(FrameClass::Button, 0));
        insert(&mut root, "b", leaf(FrameClass::Button, 1), 0, DropPosition::Bottom).unwrap();
        assert_eq!(child_names(&root), ["a", "b"]);
    }

    #[test]
    fn sibling_name_collision_is_rejected() {
        let mut root = hbox_ab();
        let before = root.clone();
        let err = insert(&mut root, "a", leaf(FrameClass::Button, 2), 1, DropPosition::Left).unwrap_err();
        assert_eq!(err, InsertError::SlotNameTaken("a".into()));
        assert_eq!(root, before);
    }

    #[test]
    fn wrap_name_collision_is_rejected() {
        let mut root = hbox_ab();
        let err = insert(&mut root, "b", leaf(FrameClass::Button, 2), 1, DropPosition::Top).unwrap_err();
        assert_eq!(err, InsertError::SlotNameTaken("b".into()));
    }

    #[test]
    fn duplicate_frame_id_is_rejected() {
        let mut root = hbox_ab();
        let before = root.clone();
        let err = insert(&mut root, "c", leaf(FrameClass::Button, 1), 0, DropPosition::Left).unwrap_err();
        assert_eq!(err, InsertError::DuplicateFrameId(1));
        assert_eq!(root, before);
    }

    #[test]
    fn slot_name_must_lex_as_identifier() {
        for name in ["ok-button", "my slot", "true", "false", "", "9lives", "class", "frameid"] {
            let mut root = hbox_ab();
            let before = root.clone();
            let err = insert(&mut root, name, leaf(FrameClass::Button, 2), 1, DropPosition::Left).unwrap_err();
            assert_eq!(err, InsertError::InvalidSlotName(name.into()));
            assert!(!err.is_invariant_violation());
            assert_eq!(root, before);
        }
    }

    #[test]
    fn empty_root_still_checks_slot_name() {
        let mut root = Frame::new();
        let err = insert(&mut root, "ok-button", leaf(FrameClass::Button, 0), 0, DropPosition::Center).unwrap_err();
        assert_eq!(err, InsertError::InvalidSlotName("ok-button".into()));
        assert!(root.is_empty());
    }

    #[test]
    fn empty_root_still_checks_frame_ids() {
        let mut root = Frame::new();
        root.set_frame_id(0);
        let before = root.clone();
        let err = insert(&mut root, "first", leaf(FrameClass::Button, 0), 0, DropPosition::Center).unwrap_err();
        assert_eq!(err, InsertError::DuplicateFrameId(0));
        assert_eq!(root, before);
    }

    #[test]
    fn inserted_names_survive_encode_and_parse() {
        let mut root = hbox_ab();
        insert(&mut root, "ok_button", leaf(FrameClass::Button, 2), 1, DropPosition::Top).unwrap();
        assert_eq!(parse_str(&encode(&root)).unwrap(), root);
    }

    #[test]
    fn multi_node_subtree_keeps_unique_ids() {
        let mut root = hbox_ab();
        let mut column = leaf(FrameClass::VBox, 2);
        column.set("p", leaf(FrameClass::Button, 3));
        column.set("q", leaf(FrameClass::Image, 4));
        insert(&mut root, "col", column, 0, DropPosition::Bottom).unwrap();

        let mut ids = collect_frame_ids(&root);
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        // wrapper takes the id after the subtree's largest
        assert_eq!(root.get("a").and_then(SlotValue::as_frame).and_then(Frame::frame_id), Some(5));
    }
}
