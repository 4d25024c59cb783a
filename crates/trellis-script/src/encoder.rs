use std::fmt::Write;

use crate::frame::{Frame, SlotValue};

const INDENT: &str = "    ";

/// Serialize a frame tree back to frame script.
///
/// Slots are written in stored order, never sorted, so parsing the output
/// reproduces the same tree.
pub fn encode(frame: &Frame) -> String {
    let mut out = String::new();
    encode_frame(&mut out, frame, 0);
    out.push('\n');
    out
}

fn encode_frame(out: &mut String, frame: &Frame, depth: usize) {
    out.push_str("{\n");
    for slot in frame.slots() {
        push_indent(out, depth + 1);
        out.push_str(&slot.name);
        out.push_str(": ");
        encode_value(out, &slot.value, depth + 1);
        out.push('\n');
    }
    push_indent(out, depth);
    out.push('}');
}

fn encode_value(out: &mut String, value: &SlotValue, depth: usize) {
    match value {
        SlotValue::Value(v) => {
            // Writing into a String cannot fail.
            let _ = write!(out, "{v}");
        }
        SlotValue::Event(body) => {
            out.push_str("event %{");
            out.push_str(body);
            out.push_str("}%");
        }
        SlotValue::Frame(child) => encode_frame(out, child, depth),
        SlotValue::Path(path) => out.push_str(&path.join(".")),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
