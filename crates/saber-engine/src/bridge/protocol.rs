/// Shared frame buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes, positions in render units):
/// ```text
/// [Header: 16 floats]
/// [Actors: MAX_ACTORS × 60 floats]
/// [Enemies: max_enemies × 4 floats]
/// [Particle requests: max_requests × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::types::{GameEvent, MatchState};
use crate::bridge::snapshot::{ActorSnapshot, FrameSnapshot};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MODE: usize = 2;
pub const HEADER_MATCH_STATE: usize = 3;
/// Winner actor id once the duel has ended, otherwise -1.
pub const HEADER_WINNER: usize = 4;
pub const HEADER_ACTIVE: usize = 5;
pub const HEADER_SCORE: usize = 6;
pub const HEADER_ACTOR_COUNT: usize = 7;
pub const HEADER_ENEMY_COUNT: usize = 8;
pub const HEADER_REQUEST_COUNT: usize = 9;
pub const HEADER_EVENT_COUNT: usize = 10;
pub const HEADER_MAX_ENEMIES: usize = 11;
pub const HEADER_MAX_REQUESTS: usize = 12;
pub const HEADER_MAX_EVENTS: usize = 13;
/// Defender id of the current hit flash, otherwise -1.
pub const HEADER_FLASH_DEFENDER: usize = 14;
pub const HEADER_FLASH_REMAINING_MS: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Actor slots (one solo actor or two duel players).
pub const MAX_ACTORS: usize = 2;

/// Trail samples serialized per actor.
pub const TRAIL_SAMPLES: usize = crate::components::actor::TRAIL_LEN;

/// Floats per actor:
/// id, state, progress, hand (-1 none), hp, velocity, has_segment,
/// base x/y, tip x/y, trail_len, then `TRAIL_SAMPLES` × (base x/y, tip x/y).
pub const ACTOR_FLOATS: usize = 12 + TRAIL_SAMPLES * 4;

/// Floats per enemy: id, x, y, word index.
pub const ENEMY_FLOATS: usize = 4;

/// Floats per particle request: shape, x, y, count, color, spread, size, lifetime (0 = default).
pub const REQUEST_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c (fixed wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_enemies: usize,
    pub max_requests: usize,
    pub max_events: usize,

    /// Size of actor data section in floats.
    pub actor_data_floats: usize,
    /// Size of enemy data section in floats.
    pub enemy_data_floats: usize,
    /// Size of particle request section in floats.
    pub request_data_floats: usize,
    /// Size of event data section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where actor data begins.
    pub actor_data_offset: usize,
    /// Offset (in floats) where enemy data begins.
    pub enemy_data_offset: usize,
    /// Offset (in floats) where particle requests begin.
    pub request_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(32, 128, 32)
    }
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_enemies: usize, max_requests: usize, max_events: usize) -> Self {
        let actor_data_floats = MAX_ACTORS * ACTOR_FLOATS;
        let enemy_data_floats = max_enemies * ENEMY_FLOATS;
        let request_data_floats = max_requests * REQUEST_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let actor_data_offset = HEADER_FLOATS;
        let enemy_data_offset = actor_data_offset + actor_data_floats;
        let request_data_offset = enemy_data_offset + enemy_data_floats;
        let event_data_offset = request_data_offset + request_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_enemies,
            max_requests,
            max_events,
            actor_data_floats,
            enemy_data_floats,
            request_data_floats,
            event_data_floats,
            actor_data_offset,
            enemy_data_offset,
            request_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// A zeroed buffer of the right size.
    pub fn allocate(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Write one frame into `buf`. Sections past their capacity are truncated
    /// and the header counts reflect what was actually written.
    pub fn pack(&self, snapshot: &FrameSnapshot, frame_counter: u32, buf: &mut [f32]) {
        debug_assert!(buf.len() >= self.buffer_total_floats);
        buf[..self.buffer_total_floats].fill(0.0);

        let actors = snapshot.actors.len().min(MAX_ACTORS);
        let enemies = snapshot.enemies.len().min(self.max_enemies);
        let requests = snapshot.particles.len().min(self.max_requests);
        let events = snapshot.events.len().min(self.max_events);
        if snapshot.events.len() > self.max_events {
            log::warn!("dropping {} events past capacity", snapshot.events.len() - self.max_events);
        }

        let header = &mut buf[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MODE] = snapshot.mode.code();
        header[HEADER_MATCH_STATE] = snapshot.match_state.code();
        header[HEADER_WINNER] = match snapshot.match_state {
            MatchState::DuelEnded { winner } => winner.0 as f32,
            _ => -1.0,
        };
        header[HEADER_ACTIVE] = if snapshot.active { 1.0 } else { 0.0 };
        header[HEADER_SCORE] = snapshot.score as f32;
        header[HEADER_ACTOR_COUNT] = actors as f32;
        header[HEADER_ENEMY_COUNT] = enemies as f32;
        header[HEADER_REQUEST_COUNT] = requests as f32;
        header[HEADER_EVENT_COUNT] = events as f32;
        header[HEADER_MAX_ENEMIES] = self.max_enemies as f32;
        header[HEADER_MAX_REQUESTS] = self.max_requests as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        match snapshot.hit_flash {
            Some(flash) => {
                header[HEADER_FLASH_DEFENDER] = flash.defender.0 as f32;
                header[HEADER_FLASH_REMAINING_MS] =
                    flash.remaining_ms(snapshot.timestamp_ms) as f32;
            }
            None => header[HEADER_FLASH_DEFENDER] = -1.0,
        }

        for (i, actor) in snapshot.actors.iter().take(actors).enumerate() {
            let start = self.actor_data_offset + i * ACTOR_FLOATS;
            pack_actor(actor, &mut buf[start..start + ACTOR_FLOATS]);
        }

        for (i, enemy) in snapshot.enemies.iter().take(enemies).enumerate() {
            let start = self.enemy_data_offset + i * ENEMY_FLOATS;
            buf[start..start + ENEMY_FLOATS].copy_from_slice(&[
                enemy.id.0 as f32,
                enemy.pos.x,
                enemy.pos.y,
                enemy.word as f32,
            ]);
        }

        for (i, req) in snapshot.particles.iter().take(requests).enumerate() {
            let start = self.request_data_offset + i * REQUEST_FLOATS;
            buf[start..start + REQUEST_FLOATS].copy_from_slice(&[
                req.shape.code(),
                req.origin.x,
                req.origin.y,
                req.count as f32,
                req.color.code(),
                req.spread,
                req.size,
                req.lifetime.unwrap_or(0.0),
            ]);
        }

        let wire: Vec<GameEvent> =
            snapshot.events.iter().take(events).map(|e| e.to_wire()).collect();
        let floats: &[f32] = bytemuck::cast_slice(wire.as_slice());
        let start = self.event_data_offset;
        buf[start..start + floats.len()].copy_from_slice(floats);
    }
}

fn pack_actor(actor: &ActorSnapshot, out: &mut [f32]) {
    out[0] = actor.id.0 as f32;
    out[1] = actor.state.code();
    out[2] = actor.progress;
    out[3] = actor.bound_hand.map_or(-1.0, |h| h.code());
    out[4] = actor.hp as f32;
    out[5] = actor.velocity;
    if let Some(seg) = actor.segment {
        out[6] = 1.0;
        out[7..11].copy_from_slice(&[seg.base.x, seg.base.y, seg.tip.x, seg.tip.y]);
    }
    let trail = actor.trail.len().min(TRAIL_SAMPLES);
    out[11] = trail as f32;
    for (i, seg) in actor.trail.iter().take(trail).enumerate() {
        let at = 12 + i * 4;
        out[at..at + 4].copy_from_slice(&[seg.base.x, seg.base.y, seg.tip.x, seg.tip.y]);
    }
}
