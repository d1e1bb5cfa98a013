use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifies a participant. Solo uses `ActorId(0)`; duel players are 0 (left) and 1 (right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Identifies a falling enemy in solo mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Tracker handedness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Wire code: 0 = Left, 1 = Right.
    pub fn code(self) -> f32 {
        match self {
            Handedness::Left => 0.0,
            Handedness::Right => 1.0,
        }
    }

    pub fn from_code(code: f32) -> Option<Self> {
        if code == 0.0 {
            Some(Handedness::Left)
        } else if code == 1.0 {
            Some(Handedness::Right)
        } else {
            None
        }
    }
}

/// Which game the controller is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Solo,
    Duel,
}

impl GameMode {
    pub fn code(self) -> f32 {
        match self {
            GameMode::Solo => 0.0,
            GameMode::Duel => 1.0,
        }
    }
}

/// Mode-level match progression. `DuelEnded` is terminal until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Idle,
    DuelWaiting,
    DuelFighting,
    DuelEnded { winner: ActorId },
}

impl MatchState {
    pub fn code(self) -> f32 {
        match self {
            MatchState::Idle => 0.0,
            MatchState::DuelWaiting => 1.0,
            MatchState::DuelFighting => 2.0,
            MatchState::DuelEnded { .. } => 3.0,
        }
    }
}

/// Discrete outcome of one frame, in render-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaberEvent {
    GripFormed { actor: ActorId, at: Vec2 },
    Ignited { actor: ActorId, at: Vec2 },
    Dissolving { actor: ActorId },
    Extinguished { actor: ActorId },
    Score { delta: u32, total: u32 },
    EnemyDestroyed { enemy: EnemyId, at: Vec2 },
    Clash { at: Vec2 },
    Hit { attacker: ActorId, defender: ActorId, hp: u32, at: Vec2 },
    MatchStarted,
    MatchEnded { winner: ActorId },
    ActiveToggled { active: bool },
    ModeChanged { mode: GameMode },
    SessionReset,
}

/// Event kinds on the wire (Rust → TypeScript).
pub mod event_kind {
    pub const GRIP_FORMED: f32 = 1.0;
    pub const IGNITED: f32 = 2.0;
    pub const DISSOLVING: f32 = 3.0;
    pub const EXTINGUISHED: f32 = 4.0;
    pub const SCORE: f32 = 5.0;
    pub const ENEMY_DESTROYED: f32 = 6.0;
    pub const CLASH: f32 = 7.0;
    pub const HIT: f32 = 8.0;
    pub const MATCH_STARTED: f32 = 9.0;
    pub const MATCH_ENDED: f32 = 10.0;
    pub const ACTIVE_TOGGLED: f32 = 11.0;
    pub const MODE_CHANGED: f32 = 12.0;
    pub const SESSION_RESET: f32 = 13.0;
}

impl SaberEvent {
    /// Flatten into the fixed 4-float wire record.
    pub fn to_wire(&self) -> GameEvent {
        use event_kind::*;
        let ev = |kind, a, b, c| GameEvent { kind, a, b, c };
        match *self {
            SaberEvent::GripFormed { actor, at } => ev(GRIP_FORMED, actor.0 as f32, at.x, at.y),
            SaberEvent::Ignited { actor, at } => ev(IGNITED, actor.0 as f32, at.x, at.y),
            SaberEvent::Dissolving { actor } => ev(DISSOLVING, actor.0 as f32, 0.0, 0.0),
            SaberEvent::Extinguished { actor } => ev(EXTINGUISHED, actor.0 as f32, 0.0, 0.0),
            SaberEvent::Score { delta, total } => ev(SCORE, delta as f32, total as f32, 0.0),
            SaberEvent::EnemyDestroyed { enemy, at } => {
                ev(ENEMY_DESTROYED, enemy.0 as f32, at.x, at.y)
            }
            SaberEvent::Clash { at } => ev(CLASH, 0.0, at.x, at.y),
            // The hit position travels with the particle request, not the event.
            SaberEvent::Hit { attacker, defender, hp, .. } => {
                ev(HIT, defender.0 as f32, hp as f32, attacker.0 as f32)
            }
            SaberEvent::MatchStarted => ev(MATCH_STARTED, 0.0, 0.0, 0.0),
            SaberEvent::MatchEnded { winner } => ev(MATCH_ENDED, winner.0 as f32, 0.0, 0.0),
            SaberEvent::ActiveToggled { active } => {
                ev(ACTIVE_TOGGLED, if active { 1.0 } else { 0.0 }, 0.0, 0.0)
            }
            SaberEvent::ModeChanged { mode } => ev(MODE_CHANGED, mode.code(), 0.0, 0.0),
            SaberEvent::SessionReset => ev(SESSION_RESET, 0.0, 0.0, 0.0),
        }
    }
}

/// A game event communicated from Rust to TypeScript via the shared frame buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}
