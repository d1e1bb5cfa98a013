use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{ActorId, Handedness};
use crate::core::geometry::{Grip, Segment};

/// Trail samples kept per actor, most recent first.
pub const TRAIL_LEN: usize = 12;

/// Weight kept from the previous velocity on each sample.
pub const VELOCITY_RETAIN: f32 = 0.85;

/// Sword lifecycle. `Casting` only occurs under the two-hand ignite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwordState {
    Idle,
    HiltForming,
    Casting,
    Active,
    Dissolving,
}

impl SwordState {
    pub fn code(self) -> f32 {
        match self {
            SwordState::Idle => 0.0,
            SwordState::HiltForming => 1.0,
            SwordState::Casting => 2.0,
            SwordState::Active => 3.0,
            SwordState::Dissolving => 4.0,
        }
    }
}

/// One participant: sword lifecycle, motion history and (in duels) health.
///
/// Only the lifecycle system moves `sword_state`; `segment` and `grip` are
/// recomputed every frame and are `None` whenever the bound hand is missing.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub sword_state: SwordState,
    /// Blade extension in [0, 1].
    pub sword_progress: f32,
    /// Hand holding the hilt; set iff `sword_state != Idle`.
    pub bound_hand: Option<Handedness>,
    /// Last frame the bound hand was seen as a fist.
    pub last_grip_time: f64,
    /// When the current grip began (HiltForming entry).
    pub grip_started_at: f64,
    /// Smoothed per-frame speed of the hilt base, normalized units.
    pub velocity: f32,
    pub prev_hilt_pos: Option<Vec2>,
    /// (tip, base) history while Active, most recent first.
    pub trail: VecDeque<Segment>,
    pub grip: Option<Grip>,
    pub segment: Option<Segment>,
    pub hp: u32,
    pub last_hit_time: Option<f64>,
}

impl Actor {
    pub fn new(id: ActorId, max_hp: u32) -> Self {
        Self {
            id,
            sword_state: SwordState::Idle,
            sword_progress: 0.0,
            bound_hand: None,
            last_grip_time: 0.0,
            grip_started_at: 0.0,
            velocity: 0.0,
            prev_hilt_pos: None,
            trail: VecDeque::with_capacity(TRAIL_LEN),
            grip: None,
            segment: None,
            hp: max_hp,
            last_hit_time: None,
        }
    }

    /// Back to a freshly constructed actor. Never partial.
    pub fn reset(&mut self, max_hp: u32) {
        *self = Self::new(self.id, max_hp);
    }

    pub fn is_armed(&self) -> bool {
        self.sword_state == SwordState::Active
    }

    /// Enter HiltForming bound to `hand`.
    pub(crate) fn bind(&mut self, hand: Handedness, now: f64) {
        self.sword_state = SwordState::HiltForming;
        self.bound_hand = Some(hand);
        self.sword_progress = 0.0;
        self.last_grip_time = now;
        self.grip_started_at = now;
    }

    /// Return to Idle and drop everything tied to the grip.
    pub(crate) fn release(&mut self) {
        self.sword_state = SwordState::Idle;
        self.bound_hand = None;
        self.sword_progress = 0.0;
        self.velocity = 0.0;
        self.prev_hilt_pos = None;
        self.trail.clear();
        self.grip = None;
        self.segment = None;
    }

    /// Blend a new hilt position into the smoothed speed.
    pub(crate) fn track_hilt(&mut self, hilt: Vec2) {
        if let Some(prev) = self.prev_hilt_pos {
            let sample = prev.distance(hilt);
            self.velocity = self.velocity * VELOCITY_RETAIN + sample * (1.0 - VELOCITY_RETAIN);
        }
        self.prev_hilt_pos = Some(hilt);
    }

    pub(crate) fn push_trail(&mut self, segment: Segment) {
        self.trail.push_front(segment);
        self.trail.truncate(TRAIL_LEN);
    }

    /// Apply a hit unless still inside the invulnerability window.
    /// Returns the new HP when the hit lands.
    pub fn apply_hit(&mut self, damage: u32, now: f64, window_ms: f64) -> Option<u32> {
        if let Some(last) = self.last_hit_time {
            if now - last < window_ms {
                return None;
            }
        }
        self.hp = self.hp.saturating_sub(damage);
        self.last_hit_time = Some(now);
        Some(self.hp)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}
