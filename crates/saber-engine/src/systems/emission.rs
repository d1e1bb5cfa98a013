//! Particle-spawn requests derived from lifecycle and collision outcomes.
//!
//! Only decides what to spawn, where and how many. Integration, fading and
//! removal belong to the renderer.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::{GlowConfig, Viewport};
use crate::api::types::{ActorId, SaberEvent};
use crate::components::emitter::GlowEmitter;

/// Palette shared with the TypeScript renderer (index = wire code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum ParticleColor {
    Blue = 0,
    Red,
    Green,
    White,
    Orange,
    Yellow,
}

impl ParticleColor {
    pub fn code(self) -> f32 {
        self as u8 as f32
    }

    /// Blade colour per actor slot: player 0 blue, player 1 red.
    pub fn for_actor(id: ActorId) -> Self {
        if id.0 == 0 {
            ParticleColor::Blue
        } else {
            ParticleColor::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum EmissionShape {
    /// Soft motes drifting off the hilt.
    Glow = 0,
    /// Radial one-shot burst.
    Burst,
    /// Fast thin sparks.
    Sparks,
    /// A single expanding ring; `size` is its final radius.
    Shockwave,
}

impl EmissionShape {
    pub fn code(self) -> f32 {
        self as u8 as f32
    }
}

/// One spawn request, in render space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleRequest {
    pub shape: EmissionShape,
    pub origin: Vec2,
    pub count: u32,
    pub color: ParticleColor,
    /// Velocity spread magnitude.
    pub spread: f32,
    pub size: f32,
    /// Overrides the renderer's default lifetime for the shape, seconds.
    pub lifetime: Option<f32>,
}

impl ParticleRequest {
    fn new(shape: EmissionShape, origin: Vec2, count: u32, color: ParticleColor) -> Self {
        Self {
            shape,
            origin,
            count,
            color,
            spread: 1.0,
            size: 3.0,
            lifetime: None,
        }
    }

    fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

/// Per-frame request list plus one continuous glow emitter per actor slot.
pub struct EmissionScheduler {
    glow: [GlowEmitter; 2],
    requests: Vec<ParticleRequest>,
    viewport: Viewport,
}

impl EmissionScheduler {
    pub fn new(viewport: Viewport, glow: &GlowConfig) -> Self {
        let emitter = || {
            GlowEmitter::new()
                .with_rate(glow.rate)
                .with_size(glow.size)
                .with_lifetime(glow.lifetime)
                .with_spread(glow.spread)
        };
        Self {
            glow: [emitter(), emitter()],
            requests: Vec::with_capacity(32),
            viewport,
        }
    }

    /// Drive the hilt glow for one actor. `hilt` is render space; the glow
    /// runs only while `forming` and the hilt is visible.
    pub fn glow(&mut self, actor: ActorId, hilt: Option<Vec2>, forming: bool, dt: f32) {
        let Some(emitter) = self.glow.get_mut(actor.0 as usize) else {
            return;
        };
        emitter.set_active(forming && hilt.is_some());
        let count = emitter.tick(dt);
        if let (Some(origin), true) = (hilt, count > 0) {
            let color = ParticleColor::for_actor(actor);
            let request = ParticleRequest::new(EmissionShape::Glow, origin, count, color)
                .with_spread(emitter.spread)
                .with_size(emitter.size)
                .with_lifetime(emitter.lifetime);
            self.requests.push(request);
        }
    }

    /// Translate one game event into zero or more requests.
    pub fn on_event(&mut self, event: &SaberEvent) {
        use EmissionShape::*;
        match *event {
            SaberEvent::Ignited { actor, at } => {
                let color = ParticleColor::for_actor(actor);
                self.requests.push(
                    ParticleRequest::new(Burst, at, 40, color)
                        .with_spread(8.0)
                        .with_size(4.0)
                        .with_lifetime(0.8),
                );
            }
            SaberEvent::Clash { at } => {
                self.requests.push(
                    ParticleRequest::new(Sparks, at, 24, ParticleColor::Yellow)
                        .with_spread(10.0)
                        .with_lifetime(0.5),
                );
                self.requests.push(
                    ParticleRequest::new(Shockwave, at, 1, ParticleColor::White)
                        .with_size(120.0)
                        .with_lifetime(0.4),
                );
            }
            SaberEvent::Hit { at, .. } => {
                let sparks = ParticleRequest::new(Sparks, at, 20, ParticleColor::Red);
                self.requests.push(sparks.with_spread(7.0));
            }
            SaberEvent::EnemyDestroyed { at, .. } => {
                let burst = ParticleRequest::new(Burst, at, 12, ParticleColor::Red);
                self.requests.push(burst.with_spread(4.0));
            }
            SaberEvent::ActiveToggled { active } => {
                let color = if active { ParticleColor::Green } else { ParticleColor::Red };
                let center = self.viewport.center();
                self.requests.push(
                    ParticleRequest::new(Shockwave, center, 1, color)
                        .with_size(300.0)
                        .with_lifetime(0.6),
                );
            }
            _ => {}
        }
    }

    pub fn requests(&self) -> &[ParticleRequest] {
        &self.requests
    }

    /// Drop last frame's requests. Glow remainders carry over.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Drop requests and stop every glow.
    pub fn reset(&mut self) {
        self.requests.clear();
        for emitter in &mut self.glow {
            emitter.set_active(false);
        }
    }
}
