/// Continuous-rate particle emitter, one per actor, used for the hilt glow
/// while a grip is forming. Emission is time-based so glow density does not
/// depend on frame rate.
#[derive(Debug, Clone)]
pub struct GlowEmitter {
    /// Whether the emitter is actively spawning.
    pub active: bool,
    /// Particles per second.
    pub rate: f32,
    /// Particle visual size.
    pub size: f32,
    /// Particle lifetime in seconds.
    pub lifetime: f32,
    /// Velocity spread magnitude.
    pub spread: f32,
    /// Internal accumulator for fractional particles.
    accumulator: f32,
}

impl Default for GlowEmitter {
    fn default() -> Self {
        Self {
            active: false,
            rate: 30.0,
            size: 3.0,
            lifetime: 0.4,
            spread: 1.5,
            accumulator: 0.0,
        }
    }
}

impl GlowEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    /// Switch on or off. Switching off drops any fractional particle.
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.accumulator = 0.0;
        }
        self.active = active;
    }

    /// Advance the emitter by `dt` seconds. Returns the number of particles to spawn.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.accumulator += self.rate * dt;
        let count = self.accumulator as u32;
        self.accumulator -= count as f32;
        count
    }
}
