//! Synthetic hands for unit tests.
//!
//! A hand is laid out around its knuckle point `K` along a unit direction
//! `d` (wrist toward knuckles). The wrist sits 0.1 behind `K`; the index and
//! middle bases straddle `K`, so the knuckle midpoint is exactly `K`.

use glam::{Vec2, Vec3};

use crate::api::types::Handedness;
use crate::input::landmarks::{index, HandLandmarks, LANDMARK_COUNT};

/// Offsets of the four finger bases across the palm, index first.
const FINGER_SPREAD: [f32; 4] = [-0.01, 0.01, 0.03, 0.05];

fn build(handedness: Handedness, knuckles: Vec2, dir: Vec2, curled: bool) -> HandLandmarks {
    let d = dir.normalize();
    let p = d.perp();
    let mut points = [Vec2::ZERO; LANDMARK_COUNT];

    points[index::WRIST] = knuckles - d * 0.1;
    points[index::THUMB_CMC..=index::THUMB_TIP].fill(knuckles - p * 0.04 - d * 0.03);

    let (pip, dip, tip) = if curled { (0.03, 0.01, -0.02) } else { (0.04, 0.06, 0.08) };
    for (finger, spread) in FINGER_SPREAD.iter().enumerate() {
        let mcp = index::INDEX_MCP + finger * 4;
        let base = knuckles + p * *spread;
        points[mcp] = base;
        points[mcp + 1] = base + d * pip;
        points[mcp + 2] = base + d * dip;
        points[mcp + 3] = base + d * tip;
    }

    let points: Vec<Vec3> = points.iter().map(|v| v.extend(0.0)).collect();
    HandLandmarks::new(&points, handedness).unwrap()
}

/// A closed fist with knuckles at `knuckles`, pointing along `dir`.
pub fn closed_hand(handedness: Handedness, knuckles: Vec2, dir: Vec2) -> HandLandmarks {
    build(handedness, knuckles, dir, true)
}

/// A flat open hand with knuckles at `knuckles`, pointing along `dir`.
pub fn open_hand(handedness: Handedness, knuckles: Vec2, dir: Vec2) -> HandLandmarks {
    build(handedness, knuckles, dir, false)
}

/// `hand` scaled by `factor` about the origin, then shifted by `offset`.
pub fn transformed(hand: &HandLandmarks, offset: Vec2, factor: f32) -> HandLandmarks {
    let points: Vec<Vec3> = hand
        .points()
        .iter()
        .map(|p| (p.truncate() * factor + offset).extend(p.z))
        .collect();
    HandLandmarks::new(&points, hand.handedness()).unwrap()
}
