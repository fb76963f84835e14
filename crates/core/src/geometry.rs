//! Displacement angles and direction classification.
//!
//! Coordinates follow image conventions: x grows to the right, y grows
//! downward. Angles are in degrees in the range `atan2` produces.

use crate::track::Direction;

/// Threshold the pipeline classifies against.
pub const DIRECTION_THRESHOLD_DEG: f64 = 0.0;

/// Integer pixel position of a bounding-box center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Center of an `[x1, y1, x2, y2]` box.
    ///
    /// Corners are truncated to whole pixels first, then the midpoint is taken
    /// with floor division.
    pub fn center_of(xyxy: [f32; 4]) -> Self {
        let [x1, y1, x2, y2] = xyxy.map(|v| v as i64);
        Self {
            x: (x1 + x2).div_euclid(2),
            y: (y1 + y2).div_euclid(2),
        }
    }
}

/// Angle of the displacement vector `(dx, dy)` in degrees.
pub fn angle_of(dx: f64, dy: f64) -> f64 {
    dy.atan2(dx).to_degrees()
}

/// Angle of the movement from `from` to `to`.
pub fn displacement_angle(from: Point, to: Point) -> f64 {
    angle_of((to.x - from.x) as f64, (to.y - from.y) as f64)
}

/// `Forward` iff `angle <= threshold`, otherwise `Backward`.
pub fn classify(angle: f64, threshold: f64) -> Direction {
    if angle <= threshold {
        Direction::Forward
    } else {
        Direction::Backward
    }
}
