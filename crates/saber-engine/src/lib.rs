pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience
pub use api::config::{
    CombatConfig, EnemyConfig, FistConfig, GlowConfig, GripConfig, IgniteRule, LifecycleConfig,
    SaberConfig, Viewport,
};
pub use api::error::FrameError;
pub use api::types::{ActorId, EnemyId, GameEvent, GameMode, Handedness, MatchState, SaberEvent};
pub use components::actor::{Actor, SwordState};
pub use components::emitter::GlowEmitter;
pub use components::enemy::{Enemy, EnemyField};
pub use core::geometry::{Grip, Rect, Segment};
pub use core::time::{validate_timestamp, FrameClock, FrameTime};
pub use input::landmarks::{FaceLandmarks, HandLandmarks, LandmarkFrame};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::snapshot::{ActorSnapshot, EnemySnapshot, FrameSnapshot};
pub use systems::controller::{HitFlash, ModeController};
pub use systems::emission::{EmissionScheduler, EmissionShape, ParticleColor, ParticleRequest};
pub use systems::lifecycle::{Lifecycle, LifecycleEvent};
