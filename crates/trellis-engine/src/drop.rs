//! Drop-position classification.
//!
//! The host's hit-test layer finds the widget under the pointer and hands
//! over its frame id and content rectangle. [`classify`] turns the pointer
//! position into one of five discrete positions that drive
//! [`insert`](crate::edit::insert).

use std::fmt;
use std::str::FromStr;

use trellis_script::{Axis, FrameId};

use crate::coords::{Rect, Vec2};

// ── DropPosition ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DropPosition {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl DropPosition {
    /// Axis the position lies on; `None` for `Center`.
    pub fn axis(self) -> Option<Axis> {
        match self {
            DropPosition::Left | DropPosition::Right => Some(Axis::Horizontal),
            DropPosition::Top | DropPosition::Bottom => Some(Axis::Vertical),
            DropPosition::Center => None,
        }
    }

    /// `true` for `Left`/`Top`: the new frame goes before the target.
    pub fn is_leading(self) -> bool {
        matches!(self, DropPosition::Left | DropPosition::Top)
    }

    pub fn name(self) -> &'static str {
        match self {
            DropPosition::Center => "center",
            DropPosition::Top => "top",
            DropPosition::Bottom => "bottom",
            DropPosition::Left => "left",
            DropPosition::Right => "right",
        }
    }
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DropPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(DropPosition::Center),
            "top" => Ok(DropPosition::Top),
            "bottom" => Ok(DropPosition::Bottom),
            "left" => Ok(DropPosition::Left),
            "right" => Ok(DropPosition::Right),
            other => Err(format!("unknown drop position {other:?}")),
        }
    }
}

/// Result of a hit test: which frame was hit, and where relative to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DetectedPoint {
    pub frame_id: FrameId,
    pub position: DropPosition,
}

impl DetectedPoint {
    pub fn new(frame_id: FrameId, position: DropPosition) -> Self {
        Self { frame_id, position }
    }
}

impl fmt::Display for DetectedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {} at {}", self.frame_id, self.position)
    }
}

// ── DropPolicy ────────────────────────────────────────────────────────────

/// Direction of +Y in the host's coordinate space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum YAxis {
    /// Origin top-left, +Y down: smaller y is nearer the top.
    #[default]
    Down,
    /// Origin bottom-left, +Y up: smaller y is nearer the bottom.
    Up,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DropPolicy {
    /// Band around the target rectangle that still counts as `Center`.
    pub margin: f32,
    pub y_axis: YAxis,
}

impl DropPolicy {
    pub const DEFAULT_MARGIN: f32 = 10.0;
}

impl Default for DropPolicy {
    fn default() -> Self {
        Self { margin: Self::DEFAULT_MARGIN, y_axis: YAxis::Down }
    }
}

// ── classify ──────────────────────────────────────────────────────────────

/// Classify `point` against `target` grown by `policy.margin`.
///
/// The axis on which the point lies further outside decides; ties go to the
/// horizontal axis. A point inside the grown rectangle is `Center`.
pub fn classify(point: Vec2, target: Rect, policy: &DropPolicy) -> DropPosition {
    if !point.is_finite() {
        log::warn!("non-finite drop point {point:?}, treating as center");
        return DropPosition::Center;
    }
    let bounds = target.inflate(policy.margin);
    if bounds.contains(point) {
        return DropPosition::Center;
    }
    let dist = bounds.distance_outside(point);
    let (min, max) = (bounds.min(), bounds.max());

    if dist.x >= dist.y {
        if point.x < min.x {
            DropPosition::Left
        } else if point.x > max.x {
            DropPosition::Right
        } else {
            DropPosition::Center
        }
    } else {
        let low_is_top = policy.y_axis == YAxis::Down;
        if point.y < min.y {
            if low_is_top { DropPosition::Top } else { DropPosition::Bottom }
        } else if point.y > max.y {
            if low_is_top { DropPosition::Bottom } else { DropPosition::Top }
        } else {
            DropPosition::Center
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Target occupies [100, 200] x [100, 150]; grown bounds are [90, 210] x [90, 160].
    const TARGET: Rect = Rect::new(100.0, 100.0, 100.0, 50.0);

    fn at(x: f32, y: f32) -> DropPosition {
        classify(Vec2::new(x, y), TARGET, &DropPolicy::default())
    }

    #[test]
    fn inside_is_center() {
        assert_eq!(at(150.0, 125.0), DropPosition::Center);
    }

    #[test]
    fn inside_margin_is_center() {
        assert_eq!(at(95.0, 125.0), DropPosition::Center);
        assert_eq!(at(150.0, 158.0), DropPosition::Center);
    }

    #[test]
    fn outside_each_side() {
        assert_eq!(at(80.0, 125.0), DropPosition::Left);
        assert_eq!(at(220.0, 125.0), DropPosition::Right);
        assert_eq!(at(150.0, 80.0), DropPosition::Top);
        assert_eq!(at(150.0, 170.0), DropPosition::Bottom);
    }

    #[test]
    fn larger_distance_decides() {
        // 5 left of bounds, 20 above: vertical wins.
        assert_eq!(at(85.0, 70.0), DropPosition::Top);
        // 30 right of bounds, 2 below: horizontal wins.
        assert_eq!(at(240.0, 162.0), DropPosition::Right);
    }

    #[test]
    fn tie_goes_horizontal() {
        assert_eq!(at(80.0, 80.0), DropPosition::Left);
    }

    #[test]
    fn y_up_flips_vertical_sense() {
        let policy = DropPolicy { y_axis: YAxis::Up, ..DropPolicy::default() };
        assert_eq!(classify(Vec2::new(150.0, 80.0), TARGET, &policy), DropPosition::Bottom);
        assert_eq!(classify(Vec2::new(150.0, 170.0), TARGET, &policy), DropPosition::Top);
    }

    #[test]
    fn zero_margin_uses_raw_bounds() {
        let policy = DropPolicy { margin: 0.0, ..DropPolicy::default() };
        assert_eq!(classify(Vec2::new(95.0, 125.0), TARGET, &policy), DropPosition::Left);
    }

    #[test]
    fn non_finite_point_is_center() {
        assert_eq!(at(f32::NAN, 0.0), DropPosition::Center);
    }

    #[test]
    fn position_helpers() {
        assert_eq!(DropPosition::Top.axis(), Some(Axis::Vertical));
        assert!(DropPosition::Left.is_leading());
        assert!(!DropPosition::Bottom.is_leading());
        assert_eq!("right".parse::<DropPosition>(), Ok(DropPosition::Right));
        assert!("middle".parse::<DropPosition>().is_err());
    }
}
