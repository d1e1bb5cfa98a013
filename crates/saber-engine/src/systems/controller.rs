//! The mode controller: owns every piece of session state and advances it
//! once per frame.
//!
//! Per frame: UI actions, then hand assignment, one lifecycle step per actor,
//! the mode's collision queries, match progression, and finally emission.
//! Scores, HP and match state live here only; renderers read snapshots.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::SaberConfig;
use crate::api::types::{ActorId, EnemyId, GameMode, MatchState, SaberEvent};
use crate::components::actor::{Actor, SwordState};
use crate::components::enemy::EnemyField;
use crate::core::geometry::Segment;
use crate::core::time::{FrameClock, FrameTime};
use crate::input::landmarks::{HandLandmarks, LandmarkFrame};
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::assignment::{faces_by_side, split_hands};
use crate::systems::collision::{blade_clash, defender_hitbox, enemy_hitbox, segment_rect_intersect};
use crate::systems::emission::{EmissionScheduler, ParticleRequest};
use crate::systems::lifecycle::{Lifecycle, LifecycleEvent};

const ENEMY_SEED: u64 = 0x5ABE_5EED;

/// A transient "you were hit" flag. The renderer compares `expires_at_ms`
/// against its own clock; nothing in the core clears it on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitFlash {
    pub defender: ActorId,
    pub expires_at_ms: f64,
}

impl HitFlash {
    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.expires_at_ms - now_ms).max(0.0)
    }

    pub fn is_visible(&self, now_ms: f64) -> bool {
        now_ms < self.expires_at_ms
    }
}

pub struct ModeController {
    config: SaberConfig,
    mode: GameMode,
    /// Enemies and scoring run only while active.
    active: bool,
    match_state: MatchState,
    actors: Vec<Actor>,
    lifecycle: Lifecycle,
    enemies: EnemyField,
    score: u32,
    clock: FrameClock,
    emission: EmissionScheduler,
    events: Vec<SaberEvent>,
    /// Face centres per duel slot, normalized, as seen this frame.
    faces: [Option<Vec2>; 2],
    last_clash_ms: Option<f64>,
    hit_flash: Option<HitFlash>,
    lifecycle_events: Vec<LifecycleEvent>,
}

impl ModeController {
    pub fn new(config: SaberConfig, mode: GameMode) -> Self {
        let lifecycle = lifecycle_for(&config, mode);
        let actors = actors_for(mode, config.combat.max_hp);
        let emission = EmissionScheduler::new(config.viewport, &config.glow);
        log::info!("mode controller started in {:?}", mode);
        Self {
            mode,
            active: true,
            match_state: initial_match_state(mode),
            actors,
            lifecycle,
            enemies: EnemyField::new(ENEMY_SEED),
            score: 0,
            clock: FrameClock::new(),
            emission,
            events: Vec::with_capacity(16),
            faces: [None, None],
            last_clash_ms: None,
            hit_flash: None,
            lifecycle_events: Vec::with_capacity(4),
            config,
        }
    }

    /// Advance one frame. `timestamp_ms` is the host's monotonic clock.
    /// Pending UI actions are applied first; the caller drains `input` afterwards.
    pub fn update(&mut self, frame: &LandmarkFrame, input: &InputQueue, timestamp_ms: f64) {
        self.events.clear();
        self.emission.clear();
        let time = self.clock.sample(timestamp_ms);

        for event in input.iter() {
            self.apply_input(*event);
        }

        match self.mode {
            GameMode::Solo => self.update_solo(frame, time),
            GameMode::Duel => self.update_duel(frame, time),
        }

        self.schedule_emission(time.dt);
    }

    fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleActive => self.toggle_active(),
            InputEvent::SetMode(mode) => self.set_mode(mode),
            InputEvent::Restart => self.reset(),
        }
    }

    /// Pause or resume enemies and scoring.
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
        log::info!("session {}", if self.active { "resumed" } else { "paused" });
        self.events.push(SaberEvent::ActiveToggled { active: self.active });
    }

    /// Switch game. Always a full reset, even to the current mode.
    pub fn set_mode(&mut self, mode: GameMode) {
        log::info!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.lifecycle = lifecycle_for(&self.config, mode);
        self.actors = actors_for(mode, self.config.combat.max_hp);
        self.reset();
        self.events.push(SaberEvent::ModeChanged { mode });
    }

    /// Reinitialize every actor and the enemy field; scores and match state
    /// return to their starting values. The mode and pause state are kept.
    pub fn reset(&mut self) {
        let max_hp = self.config.combat.max_hp;
        for actor in &mut self.actors {
            actor.reset(max_hp);
        }
        self.enemies.clear();
        self.score = 0;
        self.match_state = initial_match_state(self.mode);
        self.faces = [None, None];
        self.last_clash_ms = None;
        self.hit_flash = None;
        self.emission.reset();
        log::info!("session reset ({:?})", self.mode);
        self.events.push(SaberEvent::SessionReset);
    }

    // -- Solo --

    fn update_solo(&mut self, frame: &LandmarkFrame, time: FrameTime) {
        let hands: Vec<&HandLandmarks> = frame.hands().iter().collect();
        self.step_actor(0, &hands, time.now_ms);

        if !self.active {
            return;
        }
        self.enemies.tick(time.now_ms, time.dt, &self.config.enemies);

        let Some(blade) = self.armed_blade(0) else {
            return;
        };
        let struck: Vec<(EnemyId, Vec2)> = self
            .enemies
            .iter()
            .filter_map(|enemy| {
                let hitbox = enemy_hitbox(enemy, &self.config.enemies, &self.config.viewport);
                segment_rect_intersect(&blade, &hitbox).then(|| (enemy.id, hitbox.center()))
            })
            .collect();
        if struck.is_empty() {
            return;
        }

        for &(enemy, at) in &struck {
            self.enemies.despawn(enemy);
            self.events.push(SaberEvent::EnemyDestroyed { enemy, at });
        }
        let delta = struck.len() as u32;
        self.score += delta;
        log::debug!("destroyed {} enemies, score {}", delta, self.score);
        self.events.push(SaberEvent::Score {
            delta,
            total: self.score,
        });
    }

    // -- Duel --

    fn update_duel(&mut self, frame: &LandmarkFrame, time: FrameTime) {
        self.faces = faces_by_side(frame.faces());
        let [left, right] = split_hands(frame.hands(), &self.faces);
        self.step_actor(0, &left, time.now_ms);
        self.step_actor(1, &right, time.now_ms);

        match self.match_state {
            MatchState::DuelFighting => self.resolve_combat(time.now_ms),
            MatchState::DuelWaiting if self.actors.iter().all(Actor::is_armed) => {
                self.start_match()
            }
            _ => {}
        }
    }

    fn start_match(&mut self) {
        let max_hp = self.config.combat.max_hp;
        for actor in &mut self.actors {
            actor.hp = max_hp;
            actor.last_hit_time = None;
        }
        self.match_state = MatchState::DuelFighting;
        log::info!("duel started");
        self.events.push(SaberEvent::MatchStarted);
    }

    /// Clash first. A frame that emits a clash parries every hit on that
    /// frame; blades still touching during the clash cooldown do not.
    fn resolve_combat(&mut self, now: f64) {
        let (Some(a), Some(b)) = (self.armed_blade(0), self.armed_blade(1)) else {
            return;
        };
        let combat = &self.config.combat;

        if let Some(at) = blade_clash(&a, &b, combat.clash_threshold) {
            let cooled = self
                .last_clash_ms
                .map_or(true, |last| now - last >= combat.clash_cooldown_ms);
            if cooled {
                self.last_clash_ms = Some(now);
                log::debug!("clash at ({:.0}, {:.0})", at.x, at.y);
                self.events.push(SaberEvent::Clash { at });
                return;
            }
        }

        // Player 0's swing is resolved first, so a double knockout goes to player 0.
        for (attacker, defender, blade) in [(0, 1, a), (1, 0, b)] {
            let combat = &self.config.combat;
            let face = self.faces[defender];
            let hitbox = defender_hitbox(face, defender, combat, &self.config.viewport);
            if !segment_rect_intersect(&blade, &hitbox) {
                continue;
            }
            let (damage, window) = (combat.hit_damage, combat.invulnerability_ms);
            let flash = combat.hit_flash_ms;
            let Some(hp) = self.actors[defender].apply_hit(damage, now, window) else {
                continue;
            };

            let attacker_id = self.actors[attacker].id;
            let defender_id = self.actors[defender].id;
            log::debug!("{:?} hit {:?}, hp {}", attacker_id, defender_id, hp);
            self.events.push(SaberEvent::Hit {
                attacker: attacker_id,
                defender: defender_id,
                hp,
                at: hitbox.center(),
            });
            self.hit_flash = Some(HitFlash {
                defender: defender_id,
                expires_at_ms: now + flash,
            });

            if hp == 0 {
                self.match_state = MatchState::DuelEnded { winner: attacker_id };
                log::info!("duel over, winner {:?}", attacker_id);
                self.events.push(SaberEvent::MatchEnded { winner: attacker_id });
                return;
            }
        }
    }

    // -- Shared --

    fn step_actor(&mut self, slot: usize, hands: &[&HandLandmarks], now: f64) {
        let viewport = self.config.viewport;
        let actor = &mut self.actors[slot];
        self.lifecycle.step(actor, hands, now, &mut self.lifecycle_events);

        let id = actor.id;
        for event in self.lifecycle_events.drain(..) {
            let event = match event {
                LifecycleEvent::GripFormed { hilt } => SaberEvent::GripFormed {
                    actor: id,
                    at: viewport.to_render(hilt),
                },
                LifecycleEvent::Ignited { hilt } => SaberEvent::Ignited {
                    actor: id,
                    at: viewport.to_render(hilt),
                },
                LifecycleEvent::Dissolving => SaberEvent::Dissolving { actor: id },
                LifecycleEvent::Extinguished => SaberEvent::Extinguished { actor: id },
                LifecycleEvent::GripLost | LifecycleEvent::CastingStarted => continue,
            };
            self.events.push(event);
        }
    }

    /// Render-space blade of an Active actor.
    fn armed_blade(&self, slot: usize) -> Option<Segment> {
        let actor = self.actors.get(slot)?;
        if !actor.is_armed() {
            return None;
        }
        let viewport = self.config.viewport;
        actor.segment.map(|s| s.map(|p| viewport.to_render(p)))
    }

    fn schedule_emission(&mut self, dt: f32) {
        let viewport = self.config.viewport;
        for actor in &self.actors {
            let forming =
                matches!(actor.sword_state, SwordState::HiltForming | SwordState::Casting);
            let hilt = actor.grip.map(|g| viewport.to_render(g.hilt_base));
            self.emission.glow(actor.id, hilt, forming, dt);
        }
        for event in &self.events {
            self.emission.on_event(event);
        }
    }

    // -- Read access --

    pub fn config(&self) -> &SaberConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn match_state(&self) -> MatchState {
        self.match_state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn enemies(&self) -> &EnemyField {
        &self.enemies
    }

    /// Direct access for hosts that script enemies (and for tests).
    pub fn enemies_mut(&mut self) -> &mut EnemyField {
        &mut self.enemies
    }

    /// Events raised during the last update.
    pub fn events(&self) -> &[SaberEvent] {
        &self.events
    }

    /// Particle requests raised during the last update.
    pub fn particle_requests(&self) -> &[ParticleRequest] {
        self.emission.requests()
    }

    pub fn hit_flash(&self) -> Option<HitFlash> {
        self.hit_flash
    }

    pub fn faces(&self) -> [Option<Vec2>; 2] {
        self.faces
    }

    /// Timestamp of the last update, if any.
    pub fn now_ms(&self) -> Option<f64> {
        self.clock.now_ms()
    }
}

fn lifecycle_for(config: &SaberConfig, mode: GameMode) -> Lifecycle {
    match mode {
        GameMode::Solo => Lifecycle::solo(config),
        GameMode::Duel => Lifecycle::duel(config),
    }
}

fn actors_for(mode: GameMode, max_hp: u32) -> Vec<Actor> {
    let count = match mode {
        GameMode::Solo => 1,
        GameMode::Duel => 2,
    };
    (0..count).map(|i| Actor::new(ActorId(i), max_hp)).collect()
}

fn initial_match_state(mode: GameMode) -> MatchState {
    match mode {
        GameMode::Solo => MatchState::Idle,
        GameMode::Duel => MatchState::DuelWaiting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Handedness;
    use crate::systems::emission::EmissionShape;
    use crate::test_support::{closed_hand, open_hand};

    fn frame(hands: Vec<HandLandmarks>) -> LandmarkFrame {
        LandmarkFrame::new(hands, Vec::new()).unwrap()
    }

    fn tick(c: &mut ModeController, hands: Vec<HandLandmarks>, t: f64) {
        c.update(&frame(hands), &InputQueue::new(), t);
    }

    fn tick_input(c: &mut ModeController, event: InputEvent, t: f64) {
        let mut q = InputQueue::new();
        q.push(event);
        c.update(&LandmarkFrame::empty(), &q, t);
    }

    // -- Solo --

    /// Sword hand pointing straight up from the bottom centre; the force hand
    /// starts beside it and is pulled away on the third frame.
    fn solo_ignite(c: &mut ModeController) {
        let sword = || closed_hand(Handedness::Right, Vec2::new(0.5, 0.75), Vec2::NEG_Y);
        let near = open_hand(Handedness::Left, Vec2::new(0.4, 0.75), Vec2::NEG_Y);
        let far = open_hand(Handedness::Left, Vec2::new(0.0, 0.75), Vec2::NEG_Y);
        tick(c, vec![sword(), near.clone()], 0.0);
        tick(c, vec![sword(), near], 16.0);
        assert_eq!(c.actors()[0].sword_state, SwordState::Casting);
        tick(c, vec![sword(), far], 32.0);
        assert_eq!(c.actors()[0].sword_state, SwordState::Active);
    }

    #[test]
    fn solo_blade_destroys_enemy_and_scores() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        let enemy = c.enemies_mut().spawn(Vec2::new(0.5, 0.5), 0, "BUG", 0.0);
        solo_ignite(&mut c);

        assert!(c.enemies().get(enemy).is_none());
        assert_eq!(c.score(), 1);
        assert!(c.events().contains(&SaberEvent::Score { delta: 1, total: 1 }));
        assert!(c
            .events()
            .iter()
            .any(|e| matches!(e, SaberEvent::EnemyDestroyed { enemy: id, .. } if *id == enemy)));
        assert!(c.events().iter().any(|e| matches!(e, SaberEvent::Ignited { .. })));
        let shapes: Vec<_> = c.particle_requests().iter().map(|r| r.shape).collect();
        assert!(shapes.contains(&EmissionShape::Burst));
    }

    #[test]
    fn partial_blade_does_not_score() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        c.enemies_mut().spawn(Vec2::new(0.5, 0.5), 0, "BUG", 0.0);
        let sword = || closed_hand(Handedness::Right, Vec2::new(0.5, 0.75), Vec2::NEG_Y);
        let near = || open_hand(Handedness::Left, Vec2::new(0.4, 0.75), Vec2::NEG_Y);
        // 0.35 apart: two thirds extended, reaching past the enemy but still Casting
        let mid = open_hand(Handedness::Left, Vec2::new(0.15, 0.75), Vec2::NEG_Y);
        tick(&mut c, vec![sword(), near()], 0.0);
        tick(&mut c, vec![sword(), near()], 16.0);
        tick(&mut c, vec![sword(), mid], 32.0);
        assert_eq!(c.actors()[0].sword_state, SwordState::Casting);
        assert!(c.actors()[0].segment.is_some());
        assert_eq!(c.score(), 0);
        assert_eq!(c.enemies().len(), 1);
    }

    #[test]
    fn paused_session_leaves_enemies_alone() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        tick_input(&mut c, InputEvent::ToggleActive, 0.0);
        assert!(!c.is_active());
        assert_eq!(c.events(), &[SaberEvent::ActiveToggled { active: false }]);
        let ring = c.particle_requests()[0];
        assert_eq!(ring.shape, EmissionShape::Shockwave);
        assert_eq!(ring.origin, Vec2::new(640.0, 360.0));

        c.enemies_mut().spawn(Vec2::new(0.5, 0.5), 0, "BUG", 0.0);
        let sword = || closed_hand(Handedness::Right, Vec2::new(0.5, 0.75), Vec2::NEG_Y);
        let near = || open_hand(Handedness::Left, Vec2::new(0.4, 0.75), Vec2::NEG_Y);
        let far = open_hand(Handedness::Left, Vec2::new(0.0, 0.75), Vec2::NEG_Y);
        tick(&mut c, vec![sword(), near()], 16.0);
        tick(&mut c, vec![sword(), near()], 32.0);
        tick(&mut c, vec![sword(), far], 48.0);
        assert_eq!(c.actors()[0].sword_state, SwordState::Active);
        assert_eq!(c.enemies().len(), 1);
        assert_eq!(c.score(), 0);
    }

    #[test]
    fn forming_grip_glows_at_hilt() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        let fist = || closed_hand(Handedness::Right, Vec2::new(0.5, 0.5), Vec2::NEG_Y);
        tick(&mut c, vec![fist()], 0.0);
        assert!(matches!(c.events()[..], [SaberEvent::GripFormed { actor: ActorId(0), .. }]));
        tick(&mut c, vec![fist()], 100.0);
        let glow = c.particle_requests().iter().find(|r| r.shape == EmissionShape::Glow).unwrap();
        assert_eq!(glow.count, 3);
        let hilt = c.actors()[0].grip.unwrap().hilt_base;
        assert!((glow.origin - c.config().viewport.to_render(hilt)).length() < 1e-3);
    }

    #[test]
    fn restart_clears_actors_enemies_and_score() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        c.enemies_mut().spawn(Vec2::new(0.5, 0.5), 0, "BUG", 0.0);
        c.enemies_mut().spawn(Vec2::new(0.1, 0.1), 0, "BUG", 0.0);
        solo_ignite(&mut c);
        assert_eq!(c.score(), 1);

        tick_input(&mut c, InputEvent::Restart, 48.0);
        assert_eq!(c.score(), 0);
        assert!(c.enemies().is_empty());
        let actor = &c.actors()[0];
        assert_eq!(actor.sword_state, SwordState::Idle);
        assert_eq!(actor.hp, 100);
        assert!(actor.trail.is_empty());
        assert!(c.events().contains(&SaberEvent::SessionReset));
    }

    #[test]
    fn set_mode_rebuilds_actors() {
        let mut c = ModeController::new(SaberConfig::default(), GameMode::Solo);
        tick_input(&mut c, InputEvent::SetMode(GameMode::Duel), 0.0);
        assert_eq!(c.mode(), GameMode::Duel);
        assert_eq!(c.actors().len(), 2);
        assert_eq!(c.match_state(), MatchState::DuelWaiting);
        assert!(c.events().contains(&SaberEvent::ModeChanged { mode: GameMode::Duel }));

        c.set_mode(GameMode::Solo);
        assert_eq!(c.actors().len(), 1);
        assert_eq!(c.match_state(), MatchState::Idle);
    }

    // -- Duel --

    /// Feed the same pose every 100ms from `from` to `to` inclusive.
    fn hold(c: &mut ModeController, p0: &HandLandmarks, p1: &HandLandmarks, from: f64, to: f64) {
        let mut t = from;
        while t <= to {
            tick(c, vec![p0.clone(), p1.clone()], t);
            t += 100.0;
        }
    }

    fn duel() -> ModeController {
        ModeController::new(SaberConfig::default(), GameMode::Duel)
    }

    #[test]
    fn duel_starts_when_both_blades_are_lit() {
        let mut c = duel();
        let p0 = closed_hand(Handedness::Right, Vec2::new(0.25, 0.6), Vec2::NEG_Y);
        let p1 = closed_hand(Handedness::Left, Vec2::new(0.75, 0.6), Vec2::NEG_Y);

        hold(&mut c, &p0, &p1, 0.0, 400.0);
        assert_eq!(c.match_state(), MatchState::DuelWaiting);
        assert_eq!(c.actors()[0].bound_hand, Some(Handedness::Right));
        assert_eq!(c.actors()[1].bound_hand, Some(Handedness::Left));

        tick(&mut c, vec![p0.clone(), p1.clone()], 500.0);
        assert_eq!(c.match_state(), MatchState::DuelFighting);
        assert!(c.events().contains(&SaberEvent::MatchStarted));
        assert!(c.actors().iter().all(|a| a.hp == 100));

        // Blades far apart on opposite halves: nothing lands.
        hold(&mut c, &p0, &p1, 600.0, 900.0);
        assert!(c.actors().iter().all(|a| a.hp == 100));
    }

    #[test]
    fn one_player_alone_never_starts_the_match() {
        let mut c = duel();
        let p0 = closed_hand(Handedness::Right, Vec2::new(0.25, 0.6), Vec2::NEG_Y);
        let mut t = 0.0;
        while t <= 1000.0 {
            tick(&mut c, vec![p0.clone()], t);
            t += 100.0;
        }
        assert!(c.actors()[0].is_armed());
        assert_eq!(c.match_state(), MatchState::DuelWaiting);
    }

    #[test]
    fn hits_respect_invulnerability_and_end_the_match() {
        let mut c = duel();
        // Player 0 thrusts sideways into the right half; player 1 holds low.
        let p0 = closed_hand(Handedness::Right, Vec2::new(0.25, 0.3), Vec2::X);
        let p1 = closed_hand(Handedness::Left, Vec2::new(0.75, 0.9), Vec2::NEG_Y);
        hold(&mut c, &p0, &p1, 0.0, 500.0);
        assert_eq!(c.match_state(), MatchState::DuelFighting);
        assert_eq!(c.actors()[1].hp, 100);

        tick(&mut c, vec![p0.clone(), p1.clone()], 600.0);
        assert_eq!(c.actors()[1].hp, 92);
        assert!(c.events().iter().any(|e| matches!(
            e,
            SaberEvent::Hit { attacker: ActorId(0), defender: ActorId(1), hp: 92, .. }
        )));
        let flash = c.hit_flash().unwrap();
        assert_eq!(flash.defender, ActorId(1));
        assert!(flash.is_visible(700.0));
        assert!(!flash.is_visible(750.0));

        tick(&mut c, vec![p0.clone(), p1.clone()], 700.0);
        assert_eq!(c.actors()[1].hp, 92);
        tick(&mut c, vec![p0.clone(), p1.clone()], 1100.0);
        assert_eq!(c.actors()[1].hp, 84);
        assert_eq!(c.actors()[0].hp, 100);

        let mut t = 1100.0;
        while c.match_state() == MatchState::DuelFighting {
            t += 500.0;
            tick(&mut c, vec![p0.clone(), p1.clone()], t);
            assert!(t < 10_000.0, "match never ended");
        }
        assert_eq!(c.match_state(), MatchState::DuelEnded { winner: ActorId(0) });
        assert_eq!(c.actors()[1].hp, 0);
        assert!(c.events().contains(&SaberEvent::MatchEnded { winner: ActorId(0) }));

        // Terminal until reset.
        tick(&mut c, vec![p0.clone(), p1.clone()], t + 1000.0);
        assert_eq!(c.match_state(), MatchState::DuelEnded { winner: ActorId(0) });
        c.reset();
        assert_eq!(c.match_state(), MatchState::DuelWaiting);
        assert!(c.actors().iter().all(|a| a.hp == 100));
    }

    fn count(c: &ModeController, pred: fn(&SaberEvent) -> bool) -> usize {
        c.events().iter().filter(|e| pred(e)).count()
    }

    fn is_clash(e: &SaberEvent) -> bool {
        matches!(e, SaberEvent::Clash { .. })
    }

    fn is_hit(e: &SaberEvent) -> bool {
        matches!(e, SaberEvent::Hit { .. })
    }

    #[test]
    fn near_miss_clash_parries_and_is_rate_limited() {
        let mut c = duel();
        // Anti-parallel horizontal blades 21.6 render units apart, each one
        // reaching into the other player's side box.
        let p0 = closed_hand(Handedness::Right, Vec2::new(0.3, 0.5), Vec2::X);
        let p1 = closed_hand(Handedness::Left, Vec2::new(0.91, 0.53), Vec2::NEG_X);
        hold(&mut c, &p0, &p1, 0.0, 500.0);
        assert_eq!(c.match_state(), MatchState::DuelFighting);

        tick(&mut c, vec![p0.clone(), p1.clone()], 600.0);
        assert_eq!(count(&c, is_clash), 1);
        assert_eq!(count(&c, is_hit), 0);
        let shapes: Vec<_> = c.particle_requests().iter().map(|r| r.shape).collect();
        assert!(shapes.contains(&EmissionShape::Sparks));
        assert!(shapes.contains(&EmissionShape::Shockwave));
        assert!(c.actors().iter().all(|a| a.hp == 100));

        // Still touching inside the cooldown: no clash, so the swings land.
        tick(&mut c, vec![p0.clone(), p1.clone()], 700.0);
        assert_eq!(count(&c, is_clash), 0);
        assert_eq!(count(&c, is_hit), 2);
        assert!(c.actors().iter().all(|a| a.hp == 92));

        tick(&mut c, vec![p0.clone(), p1.clone()], 800.0);
        assert_eq!(count(&c, is_clash), 1);
        assert_eq!(count(&c, is_hit), 0);
    }

    #[test]
    fn non_finite_timestamp_does_not_stall_ignition() {
        let mut c = duel();
        c.update(&LandmarkFrame::empty(), &InputQueue::new(), 0.0);
        c.update(&LandmarkFrame::empty(), &InputQueue::new(), f64::INFINITY);
        assert_eq!(c.now_ms(), Some(0.0));

        let p0 = closed_hand(Handedness::Right, Vec2::new(0.25, 0.6), Vec2::NEG_Y);
        let mut t = 100.0;
        while t <= 1500.0 {
            tick(&mut c, vec![p0.clone()], t);
            t += 100.0;
        }
        assert_eq!(c.now_ms(), Some(1500.0));
        assert_eq!(c.actors()[0].sword_state, SwordState::Active);
    }

    #[test]
    fn face_boxes_follow_tracked_faces() {
        let mut c = duel();
        let faces = vec![
            crate::input::landmarks::FaceLandmarks::new(Vec2::new(0.8, 0.2)).unwrap(),
            crate::input::landmarks::FaceLandmarks::new(Vec2::new(0.2, 0.2)).unwrap(),
        ];
        let f = LandmarkFrame::new(Vec::new(), faces).unwrap();
        c.update(&f, &InputQueue::new(), 0.0);
        assert_eq!(c.faces(), [Some(Vec2::new(0.2, 0.2)), Some(Vec2::new(0.8, 0.2))]);
    }
}
