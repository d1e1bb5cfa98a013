//! Read-only, render-space projection of the controller, taken once per frame.

use glam::Vec2;
use serde::Serialize;

use crate::api::types::{ActorId, EnemyId, GameMode, Handedness, MatchState, SaberEvent};
use crate::components::actor::{Actor, SwordState};
use crate::core::geometry::Segment;
use crate::systems::controller::{HitFlash, ModeController};
use crate::systems::emission::ParticleRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub state: SwordState,
    pub progress: f32,
    pub bound_hand: Option<Handedness>,
    pub hp: u32,
    pub velocity: f32,
    /// Hilt from pommel to blade root, when the bound hand is visible.
    pub hilt: Option<Segment>,
    pub segment: Option<Segment>,
    /// Most recent first.
    pub trail: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemySnapshot {
    pub id: EnemyId,
    pub word: usize,
    pub text: String,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub timestamp_ms: f64,
    pub mode: GameMode,
    pub match_state: MatchState,
    pub active: bool,
    pub score: u32,
    pub actors: Vec<ActorSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub particles: Vec<ParticleRequest>,
    pub events: Vec<SaberEvent>,
    pub hit_flash: Option<HitFlash>,
}

impl FrameSnapshot {
    pub fn capture(controller: &ModeController) -> Self {
        let viewport = controller.config().viewport;
        let project = |p: Vec2| viewport.to_render(p);
        let actor = |a: &Actor| ActorSnapshot {
            id: a.id,
            state: a.sword_state,
            progress: a.sword_progress,
            bound_hand: a.bound_hand,
            hp: a.hp,
            velocity: a.velocity,
            hilt: a.grip.map(|g| Segment::new(project(g.hilt_base), project(g.hilt_tip))),
            segment: a.segment.map(|s| s.map(project)),
            trail: a.trail.iter().map(|s| s.map(project)).collect(),
        };

        Self {
            timestamp_ms: controller.now_ms().unwrap_or(0.0),
            mode: controller.mode(),
            match_state: controller.match_state(),
            active: controller.is_active(),
            score: controller.score(),
            actors: controller.actors().iter().map(actor).collect(),
            enemies: controller
                .enemies()
                .iter()
                .map(|e| EnemySnapshot {
                    id: e.id,
                    word: e.word,
                    text: e.text.clone(),
                    pos: project(e.pos),
                })
                .collect(),
            particles: controller.particle_requests().to_vec(),
            events: controller.events().to_vec(),
            hit_flash: controller.hit_flash(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
