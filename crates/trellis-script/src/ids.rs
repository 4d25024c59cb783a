//! Frame-ID assignment and lookup.
//!
//! IDs are assigned in preorder: a frame gets its id before its children,
//! children are visited in slot order, and only `frame`-valued slots count.

use crate::frame::{Frame, FrameId, SlotValue};

/// Number every frame in the tree from 0. Returns the next unused id.
pub fn init_frame_ids(root: &mut Frame) -> FrameId {
    assign_frame_ids(root, 0)
}

/// Number every frame in the subtree starting at `first`. Returns the next
/// unused id.
pub fn assign_frame_ids(frame: &mut Frame, first: FrameId) -> FrameId {
    frame.set_frame_id(first);
    let mut next = first + 1;
    for (_, child) in frame.child_frames_mut() {
        next = assign_frame_ids(child, next);
    }
    next
}

/// Largest id in the tree, `None` when no frame carries one.
pub fn max_frame_id(root: &Frame) -> Option<FrameId> {
    let own = root.frame_id();
    root.child_frames()
        .map(|(_, child)| max_frame_id(child))
        .fold(own, |acc, id| acc.max(id))
}

/// First id guaranteed not to collide with any id in the tree.
pub fn next_frame_id(root: &Frame) -> FrameId {
    max_frame_id(root).map_or(0, |max| max + 1)
}

/// Every assigned id in preorder.
pub fn collect_frame_ids(root: &Frame) -> Vec<FrameId> {
    let mut out = Vec::new();
    collect_into(root, &mut out);
    out
}

fn collect_into(frame: &Frame, out: &mut Vec<FrameId>) {
    out.extend(frame.frame_id());
    for (_, child) in frame.child_frames() {
        collect_into(child, out);
    }
}

/// Depth-first preorder search, the root included.
pub fn search(root: &Frame, id: FrameId) -> Option<&Frame> {
    if root.frame_id() == Some(id) {
        return Some(root);
    }
    root.child_frames().find_map(|(_, child)| search(child, id))
}

/// Mutable variant of [`search`].
pub fn search_mut(root: &mut Frame, id: FrameId) -> Option<&mut Frame> {
    let path = locate(root, id)?;
    frame_at_mut(root, &path)
}

/// Follow a slot-index path produced by [`locate`].
pub fn frame_at<'a>(root: &'a Frame, path: &[usize]) -> Option<&'a Frame> {
    let mut frame = root;
    for &idx in path {
        frame = frame.slot_frame(idx)?;
    }
    Some(frame)
}

pub fn frame_at_mut<'a>(root: &'a mut Frame, path: &[usize]) -> Option<&'a mut Frame> {
    let mut frame = root;
    for &idx in path {
        frame = frame.slot_frame_mut(idx)?;
    }
    Some(frame)
}

/// Slot indices leading from `root` to the frame with `id`; empty when the
/// root itself matches.
pub fn locate(root: &Frame, id: FrameId) -> Option<Vec<usize>> {
    if root.frame_id() == Some(id) {
        return Some(Vec::new());
    }
    for (idx, slot) in root.slots().iter().enumerate() {
        if let SlotValue::Frame(child) = &slot.value {
            if let Some(mut rest) = locate(child, id) {
                rest.insert(0, idx);
                return Some(rest);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameClass;
    use crate::parser::parse_str;
    use crate::value::Value;

    fn tree() -> Frame {
        parse_str(
            r#"{
                class: "HBox"
                left: { class: "VBox"
                        top: { class: "Button" title: "A" }
                        bottom: { class: "Image" file: "b.png" } }
                gap: 4
                right: { class: "Button" title: "C" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn init_assigns_preorder_from_zero() {
        let mut root = tree();
        assert_eq!(init_frame_ids(&mut root), 5);
        assert_eq!(collect_frame_ids(&root), vec![0, 1, 2, 3, 4]);

        let right = search(&root, 4).unwrap();
        assert_eq!(right.get("title"), Some(&SlotValue::Value(Value::from("C"))));
        let bottom = search(&root, 3).unwrap();
        assert_eq!(bottom.frame_class(), Ok(FrameClass::Image));
    }

    #[test]
    fn init_ids_are_unique_after_reinit() {
        let mut root = tree();
        root.set_frame_id(42);
        init_frame_ids(&mut root);
        let mut ids = collect_frame_ids(&root);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn max_and_next_frame_id() {
        let mut root = tree();
        assert_eq!(max_frame_id(&root), None);
        assert_eq!(next_frame_id(&root), 0);
        init_frame_ids(&mut root);
        assert_eq!(max_frame_id(&root), Some(4));
        assert_eq!(next_frame_id(&root), 5);
    }

    #[test]
    fn assign_subtree_from_offset() {
        let mut sub = Frame::with_class(FrameClass::VBox);
        sub.set("a", Frame::with_class(FrameClass::Button));
        assert_eq!(assign_frame_ids(&mut sub, 10), 12);
        assert_eq!(collect_frame_ids(&sub), vec![10, 11]);
    }

    #[test]
    fn search_missing_is_none() {
        let mut root = tree();
        init_frame_ids(&mut root);
        assert!(search(&root, 99).is_none());
    }

    #[test]
    fn search_mut_edits_in_place() {
        let mut root = tree();
        init_frame_ids(&mut root);
        search_mut(&mut root, 2).unwrap().set("title", Value::from("Z"));
        let top = search(&root, 2).unwrap();
        assert_eq!(top.get("title"), Some(&SlotValue::Value(Value::from("Z"))));
    }

    #[test]
    fn locate_returns_slot_path() {
        let mut root = tree();
        init_frame_ids(&mut root);
        // `left` is slot 1 of root, `bottom` is slot 2 of `left`.
        assert_eq!(locate(&root, 3), Some(vec![1, 2]));
        assert_eq!(locate(&root, 0), Some(vec![]));
    }
}
