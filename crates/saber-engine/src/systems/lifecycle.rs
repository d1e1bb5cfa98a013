//! Sword lifecycle: one state machine shared by every mode, parameterized by
//! `LifecycleConfig` (grace period, dissolve rate, ignite rule).
//!
//! ```text
//! Idle --fist--> HiltForming --(distance rule) hands close--> Casting --pulled apart--> Active
//!                     |        --(timer rule) held long enough-------------------------> Active
//!                     +--grip lost--> Idle
//! HiltForming/Casting/Active --grace expired--> Dissolving --progress 0--> Idle
//! ```

use glam::Vec2;

use crate::api::config::{FistConfig, GripConfig, IgniteRule, LifecycleConfig, SaberConfig};
use crate::api::types::Handedness;
use crate::components::actor::{Actor, SwordState};
use crate::core::geometry::{blade_segment, distance, grip_points, hand_center, is_fist};
use crate::input::landmarks::HandLandmarks;

/// What happened to one actor during a step. Positions are normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEvent {
    GripFormed { hilt: Vec2 },
    GripLost,
    CastingStarted,
    Ignited { hilt: Vec2 },
    Dissolving,
    Extinguished,
}

/// Lifecycle rules for one mode. Built once per mode and shared by its actors.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    rules: LifecycleConfig,
    fist: FistConfig,
    grip: GripConfig,
}

impl Lifecycle {
    pub fn new(rules: LifecycleConfig, fist: FistConfig, grip: GripConfig) -> Self {
        Self { rules, fist, grip }
    }

    pub fn solo(config: &SaberConfig) -> Self {
        Self::new(config.solo, config.fist, config.grip)
    }

    pub fn duel(config: &SaberConfig) -> Self {
        Self::new(config.duel, config.fist, config.grip)
    }

    /// Run one frame of the state machine for `actor` over the hands it may use,
    /// then recompute its hilt, blade and motion history.
    pub fn step(
        &self,
        actor: &mut Actor,
        hands: &[&HandLandmarks],
        now: f64,
        events: &mut Vec<LifecycleEvent>,
    ) {
        let bound = find_hand(hands, actor.bound_hand);
        let gripping = bound.is_some_and(|h| is_fist(h, &self.fist));

        match actor.sword_state {
            SwordState::Idle => {
                if let Some(hand) = hands.iter().copied().find(|h| is_fist(h, &self.fist)) {
                    actor.bind(hand.handedness(), now);
                    let hilt = grip_points(hand, &self.grip).hilt_base;
                    log::debug!("actor {:?}: grip formed ({:?})", actor.id, hand.handedness());
                    events.push(LifecycleEvent::GripFormed { hilt });
                }
            }
            SwordState::HiltForming => match bound {
                Some(hand) if gripping => {
                    actor.last_grip_time = now;
                    self.charge(actor, hand, hands, now, events);
                }
                _ => {
                    log::debug!("actor {:?}: grip lost while forming", actor.id);
                    actor.release();
                    events.push(LifecycleEvent::GripLost);
                }
            },
            SwordState::Casting => {
                if let (Some(hand), true) = (bound, gripping) {
                    actor.last_grip_time = now;
                    self.extend(actor, hand, hands, events);
                } else if self.grace_expired(actor, now) {
                    self.begin_dissolve(actor, events);
                }
            }
            SwordState::Active => {
                if gripping {
                    actor.last_grip_time = now;
                } else if self.grace_expired(actor, now) {
                    self.begin_dissolve(actor, events);
                }
            }
            SwordState::Dissolving => {
                actor.sword_progress = (actor.sword_progress - self.rules.dissolve_step).max(0.0);
                if actor.sword_progress <= 0.0 {
                    log::debug!("actor {:?}: extinguished", actor.id);
                    actor.release();
                    events.push(LifecycleEvent::Extinguished);
                }
            }
        }

        self.update_geometry(actor, hands);
    }

    /// HiltForming with a confirmed grip: either wait for the force hand or run the ignite timer.
    fn charge(
        &self,
        actor: &mut Actor,
        hand: &HandLandmarks,
        hands: &[&HandLandmarks],
        now: f64,
        events: &mut Vec<LifecycleEvent>,
    ) {
        match self.rules.ignite {
            IgniteRule::Distance { start, .. } => {
                if let Some(force) = force_hand(hands, hand.handedness()) {
                    if distance(hand_center(hand), hand_center(force)) < start {
                        actor.sword_state = SwordState::Casting;
                        log::debug!("actor {:?}: casting", actor.id);
                        events.push(LifecycleEvent::CastingStarted);
                    }
                }
            }
            IgniteRule::Timer { ignite_ms, charge_step } => {
                actor.sword_progress = (actor.sword_progress + charge_step).min(1.0);
                if now - actor.grip_started_at > ignite_ms {
                    self.ignite(actor, hand, events);
                }
            }
        }
    }

    /// Casting: blade extension follows the distance between the two hands.
    fn extend(
        &self,
        actor: &mut Actor,
        hand: &HandLandmarks,
        hands: &[&HandLandmarks],
        events: &mut Vec<LifecycleEvent>,
    ) {
        let IgniteRule::Distance { start, complete } = self.rules.ignite else {
            // Casting is never entered under the timer rule.
            self.ignite(actor, hand, events);
            return;
        };
        let Some(force) = force_hand(hands, hand.handedness()) else {
            return;
        };
        let span = (complete - start).max(f32::EPSILON);
        let d = distance(hand_center(hand), hand_center(force));
        actor.sword_progress = ((d - start) / span).clamp(0.0, 1.0);
        if actor.sword_progress >= 1.0 {
            self.ignite(actor, hand, events);
        }
    }

    fn ignite(&self, actor: &mut Actor, hand: &HandLandmarks, events: &mut Vec<LifecycleEvent>) {
        actor.sword_state = SwordState::Active;
        actor.sword_progress = 1.0;
        let hilt = grip_points(hand, &self.grip).hilt_base;
        log::debug!("actor {:?}: ignited", actor.id);
        events.push(LifecycleEvent::Ignited { hilt });
    }

    fn grace_expired(&self, actor: &Actor, now: f64) -> bool {
        now - actor.last_grip_time > self.rules.grace_ms
    }

    fn begin_dissolve(&self, actor: &mut Actor, events: &mut Vec<LifecycleEvent>) {
        log::debug!("actor {:?}: dissolving from {:?}", actor.id, actor.sword_state);
        actor.sword_state = SwordState::Dissolving;
        actor.trail.clear();
        events.push(LifecycleEvent::Dissolving);
    }

    /// Recompute the per-frame hilt/blade and, while Active, motion history.
    fn update_geometry(&self, actor: &mut Actor, hands: &[&HandLandmarks]) {
        let Some(hand) = find_hand(hands, actor.bound_hand) else {
            actor.grip = None;
            actor.segment = None;
            return;
        };
        let grip = grip_points(hand, &self.grip);
        actor.grip = Some(grip);
        actor.segment = blade_segment(&grip, actor.sword_progress, self.grip.blade_length);

        if actor.sword_state == SwordState::Active {
            actor.track_hilt(grip.hilt_base);
            if let Some(segment) = actor.segment {
                actor.push_trail(segment);
            }
        }
    }
}

fn find_hand<'a>(
    hands: &[&'a HandLandmarks],
    which: Option<Handedness>,
) -> Option<&'a HandLandmarks> {
    let which = which?;
    hands.iter().copied().find(|h| h.handedness() == which)
}

/// The free hand in solo play: any visible hand that is not the sword hand.
fn force_hand<'a>(hands: &[&'a HandLandmarks], sword: Handedness) -> Option<&'a HandLandmarks> {
    hands.iter().copied().find(|h| h.handedness() != sword)
}
