//! Hand-shape measurements and the small amount of 2D vector math they need.
//!
//! Everything here is stateless and works in normalized landmark space
//! (x, y in [0, 1], y pointing down), except `Rect`/`Segment` which are
//! reused by the collision engine in render space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::config::{FistConfig, GripConfig};
use crate::input::landmarks::{index, HandLandmarks};

/// The four non-thumb fingers as (base joint, middle joint, tip).
const FINGERS: [(usize, usize, usize); 4] = [
    (index::INDEX_MCP, index::INDEX_PIP, index::INDEX_TIP),
    (index::MIDDLE_MCP, index::MIDDLE_PIP, index::MIDDLE_TIP),
    (index::RING_MCP, index::RING_PIP, index::RING_TIP),
    (index::PINKY_MCP, index::PINKY_PIP, index::PINKY_TIP),
];

/// A 2D line segment. For swords, `base` is the blade root and `tip` the point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub base: Vec2,
    pub tip: Vec2,
}

impl Segment {
    pub fn new(base: Vec2, tip: Vec2) -> Self {
        Self { base, tip }
    }

    pub fn length(&self) -> f32 {
        distance(self.base, self.tip)
    }

    /// Apply `f` to both endpoints (e.g. a viewport projection).
    pub fn map(&self, f: impl Fn(Vec2) -> Vec2) -> Self {
        Self {
            base: f(self.base),
            tip: f(self.tip),
        }
    }
}

/// Axis-aligned rectangle, `min` inclusive top-left, `max` inclusive bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// The four edges as segments, following `corners()`.
    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn map(&self, f: impl Fn(Vec2) -> Vec2) -> Self {
        Self {
            min: f(self.min),
            max: f(self.max),
        }
    }
}

/// Sword anchor points derived from one hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grip {
    /// Pommel end of the hilt, pulled back behind the wrist.
    pub hilt_base: Vec2,
    /// Blade root, pushed forward past the knuckles.
    pub hilt_tip: Vec2,
    /// Unit grip axis (zero for a degenerate hand).
    pub direction: Vec2,
}

// -- Vector arithmetic --

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector along `v`; the zero vector maps to itself.
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

pub fn scale(v: Vec2, s: f32) -> Vec2 {
    v * s
}

pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

// -- Hand measurements --

/// Closed-fist heuristic.
///
/// A finger counts as curled when its tip is closer to the wrist than either
/// its middle joint or `curl_ratio` times its base joint. The thumb is ignored.
/// Only relative distances are compared, so the result does not change under
/// uniform translation or positive scaling of the hand.
pub fn is_fist(hand: &HandLandmarks, params: &FistConfig) -> bool {
    let wrist = hand.point(index::WRIST);
    let curled = FINGERS
        .iter()
        .filter(|&&(mcp, pip, tip)| {
            let tip_dist = distance(hand.point(tip), wrist);
            let pip_dist = distance(hand.point(pip), wrist);
            let mcp_dist = distance(hand.point(mcp), wrist);
            tip_dist < pip_dist || tip_dist < mcp_dist * params.curl_ratio
        })
        .count();
    curled >= params.min_curled_fingers
}

/// Rough palm centroid: mean of wrist, index base and pinky base.
pub fn hand_center(hand: &HandLandmarks) -> Vec2 {
    (hand.point(index::WRIST) + hand.point(index::INDEX_MCP) + hand.point(index::PINKY_MCP)) / 3.0
}

fn knuckle_mid(hand: &HandLandmarks) -> Vec2 {
    (hand.point(index::INDEX_MCP) + hand.point(index::MIDDLE_MCP)) * 0.5
}

/// Unit vector from the wrist toward the index/middle knuckles.
pub fn sword_direction(hand: &HandLandmarks) -> Vec2 {
    normalize(sub(knuckle_mid(hand), hand.point(index::WRIST)))
}

/// Hilt anchors for a gripping hand.
pub fn grip_points(hand: &HandLandmarks, params: &GripConfig) -> Grip {
    let direction = sword_direction(hand);
    Grip {
        hilt_base: sub(hand.point(index::WRIST), scale(direction, params.base_offset)),
        hilt_tip: add(knuckle_mid(hand), scale(direction, params.tip_offset)),
        direction,
    }
}

/// Blade extended from the hilt tip by `blade_length * progress`.
/// `None` while the blade is fully retracted.
pub fn blade_segment(grip: &Grip, progress: f32, blade_length: f32) -> Option<Segment> {
    if progress <= 0.0 {
        return None;
    }
    let tip = add(grip.hilt_tip, scale(grip.direction, blade_length * progress.min(1.0)));
    Some(Segment::new(grip.hilt_tip, tip))
}
