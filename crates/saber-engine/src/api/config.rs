use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Rect;

/// Engine tuning, provided by the host. Every field has a default, so a JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaberConfig {
    pub viewport: Viewport,
    pub fist: FistConfig,
    pub grip: GripConfig,
    /// Lifecycle tuning for the single solo actor.
    pub solo: LifecycleConfig,
    /// Lifecycle tuning for both duel players.
    pub duel: LifecycleConfig,
    pub combat: CombatConfig,
    pub enemies: EnemyConfig,
    /// Hilt glow while a grip is forming.
    pub glow: GlowConfig,
}

impl Default for SaberConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fist: FistConfig::default(),
            grip: GripConfig::default(),
            solo: LifecycleConfig::solo(),
            duel: LifecycleConfig::duel(),
            combat: CombatConfig::default(),
            enemies: EnemyConfig::default(),
            glow: GlowConfig::default(),
        }
    }
}

impl SaberConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Render-space size. Landmarks are normalized; collision thresholds and
/// hit boxes are in render units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Normalized [0, 1] coordinates to render units.
    #[inline]
    pub fn to_render(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x * self.width, p.y * self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Fist heuristic parameters. Both values are empirically tuned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FistConfig {
    /// Tip counts as curled when closer to the wrist than this multiple of the base joint.
    pub curl_ratio: f32,
    /// Curled fingers (of four) needed to call the hand a fist.
    pub min_curled_fingers: usize,
}

impl Default for FistConfig {
    fn default() -> Self {
        Self {
            curl_ratio: 1.2,
            min_curled_fingers: 3,
        }
    }
}

/// Hilt and blade proportions, in normalized units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripConfig {
    /// Blade root offset past the knuckle midpoint.
    pub tip_offset: f32,
    /// Pommel offset behind the wrist.
    pub base_offset: f32,
    /// Blade length at full extension.
    pub blade_length: f32,
}

impl Default for GripConfig {
    fn default() -> Self {
        Self {
            tip_offset: 0.05,
            base_offset: 0.02,
            blade_length: 0.45,
        }
    }
}

/// How a held hilt turns into a lit blade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum IgniteRule {
    /// Two-hand pull: casting starts when the hand centres are closer than
    /// `start` and completes when they are `complete` apart.
    Distance { start: f32, complete: f32 },
    /// Hold the grip for `ignite_ms`; progress charges by `charge_step` per frame meanwhile.
    Timer { ignite_ms: f64, charge_step: f32 },
}

/// Per-mode lifecycle tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Lost-grip tolerance before the blade starts dissolving.
    pub grace_ms: f64,
    /// Progress removed per frame while dissolving.
    pub dissolve_step: f32,
    pub ignite: IgniteRule,
}

impl LifecycleConfig {
    pub fn solo() -> Self {
        Self {
            grace_ms: 500.0,
            dissolve_step: 0.05,
            ignite: IgniteRule::Distance {
                start: 0.15,
                complete: 0.45,
            },
        }
    }

    pub fn duel() -> Self {
        Self {
            grace_ms: 2500.0,
            dissolve_step: 0.1,
            ignite: IgniteRule::Timer {
                ignite_ms: 400.0,
                charge_step: 0.05,
            },
        }
    }
}

/// Duel combat tuning. Distances are render units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Tip-to-blade distance that still counts as a clash.
    pub clash_threshold: f32,
    /// Minimum spacing between two clash events.
    pub clash_cooldown_ms: f64,
    pub hit_damage: u32,
    pub max_hp: u32,
    pub invulnerability_ms: f64,
    /// Hit box size around a tracked face.
    pub face_box: Vec2,
    /// Fallback hit boxes per side (normalized), used when a player's face is not tracked.
    pub side_boxes: [Rect; 2],
    /// How long the renderer should show a hit flash.
    pub hit_flash_ms: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            clash_threshold: 50.0,
            clash_cooldown_ms: 200.0,
            hit_damage: 8,
            max_hp: 100,
            invulnerability_ms: 500.0,
            face_box: Vec2::new(180.0, 220.0),
            side_boxes: [
                Rect::new(Vec2::new(0.05, 0.05), Vec2::new(0.45, 0.55)),
                Rect::new(Vec2::new(0.55, 0.05), Vec2::new(0.95, 0.55)),
            ],
            hit_flash_ms: 150.0,
        }
    }
}

/// Solo-mode enemy spawner tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub spawn_interval_ms: f64,
    /// Fall speed range in normalized units per second.
    pub fall_speed: (f32, f32),
    /// Spawn x is kept this far from either screen edge.
    pub spawn_margin: f32,
    pub spawn_y: f32,
    /// Enemies below this y have left the screen.
    pub despawn_y: f32,
    /// Render width of one character of enemy text.
    pub glyph_width: f32,
    /// Render height of enemy text.
    pub glyph_height: f32,
    pub words: Vec<String>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 1500.0,
            fall_speed: (0.12, 0.25),
            spawn_margin: 0.1,
            spawn_y: -0.05,
            despawn_y: 1.1,
            glyph_width: 18.0,
            glyph_height: 32.0,
            words: ["BUG", "PANIC", "NULL", "LEAK", "DEADLOCK", "SEGFAULT", "TIMEOUT", "RACE"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Continuous glow emitted at the hilt while a grip forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowConfig {
    /// Particles per second.
    pub rate: f32,
    pub size: f32,
    /// Particle lifetime in seconds.
    pub lifetime: f32,
    pub spread: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            rate: 30.0,
            size: 3.0,
            lifetime: 0.4,
            spread: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mode_tuning() {
        let cfg = SaberConfig::default();
        assert_eq!(cfg.solo.grace_ms, 500.0);
        assert_eq!(cfg.duel.grace_ms, 2500.0);
        assert_eq!(cfg.solo.dissolve_step, 0.05);
        assert_eq!(cfg.duel.dissolve_step, 0.1);
        assert!(matches!(
            cfg.duel.ignite,
            IgniteRule::Timer { ignite_ms, .. } if ignite_ms == 400.0
        ));
        assert_eq!(cfg.combat.hit_damage, 8);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{
            "viewport": { "width": 640.0, "height": 480.0 },
            "fist": { "curl_ratio": 1.3 },
            "duel": {
                "grace_ms": 3000.0,
                "dissolve_step": 0.2,
                "ignite": { "rule": "timer", "ignite_ms": 250.0, "charge_step": 0.1 }
            }
        }"#;
        let cfg = SaberConfig::from_json(json).unwrap();
        assert_eq!(cfg.viewport.width, 640.0);
        assert_eq!(cfg.fist.curl_ratio, 1.3);
        assert_eq!(cfg.fist.min_curled_fingers, 3);
        assert_eq!(cfg.duel.grace_ms, 3000.0);
        assert_eq!(cfg.solo, LifecycleConfig::solo());
        assert_eq!(cfg.combat, CombatConfig::default());
    }

    #[test]
    fn distance_rule_parses() {
        let json = r#"{ "solo": { "grace_ms": 400.0, "dissolve_step": 0.05,
            "ignite": { "rule": "distance", "start": 0.1, "complete": 0.5 } } }"#;
        let cfg = SaberConfig::from_json(json).unwrap();
        assert_eq!(cfg.solo.ignite, IgniteRule::Distance { start: 0.1, complete: 0.5 });
    }

    #[test]
    fn glow_tuning_parses() {
        let cfg = SaberConfig::from_json(r#"{ "glow": { "rate": 90.0 } }"#).unwrap();
        assert_eq!(cfg.glow.rate, 90.0);
        assert_eq!(cfg.glow.lifetime, GlowConfig::default().lifetime);
    }

    #[test]
    fn viewport_projection() {
        let vp = Viewport::default();
        assert_eq!(vp.to_render(Vec2::new(0.5, 0.5)), Vec2::new(640.0, 360.0));
        assert_eq!(vp.center(), Vec2::new(640.0, 360.0));
    }
}
