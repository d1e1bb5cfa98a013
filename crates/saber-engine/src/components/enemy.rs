use glam::Vec2;

use crate::api::config::EnemyConfig;
use crate::api::types::EnemyId;
use crate::core::rng::Rng;

/// A falling word in solo mode. Position is normalized; y starts above the screen.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    /// Index into `EnemyConfig::words`.
    pub word: usize,
    pub text: String,
    /// Normalized units per second.
    pub speed: f32,
    pub alive: bool,
}

/// Enemy storage plus the fixed-interval spawner.
/// Flat Vec; there are never more than a handful alive.
pub struct EnemyField {
    enemies: Vec<Enemy>,
    next_id: u32,
    last_spawn_ms: Option<f64>,
    rng: Rng,
}

impl EnemyField {
    pub fn new(seed: u64) -> Self {
        Self {
            enemies: Vec::with_capacity(16),
            next_id: 1,
            last_spawn_ms: None,
            rng: Rng::new(seed),
        }
    }

    /// Add an enemy at `pos`. Returns its id.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        word: usize,
        text: impl Into<String>,
        speed: f32,
    ) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        self.enemies.push(Enemy {
            id,
            pos,
            word,
            text: text.into(),
            speed,
            alive: true,
        });
        id
    }

    /// Advance one frame: spawn on the interval, fall, drop what left the screen.
    /// The first interval starts counting at the first tick.
    pub fn tick(&mut self, now_ms: f64, dt: f32, config: &EnemyConfig) {
        match self.last_spawn_ms {
            None => self.last_spawn_ms = Some(now_ms),
            Some(last) if now_ms - last >= config.spawn_interval_ms => {
                self.spawn_random(config);
                self.last_spawn_ms = Some(now_ms);
            }
            Some(_) => {}
        }

        for enemy in &mut self.enemies {
            enemy.pos.y += enemy.speed * dt;
            if enemy.pos.y > config.despawn_y {
                enemy.alive = false;
            }
        }
        self.enemies.retain(|e| e.alive);
    }

    fn spawn_random(&mut self, config: &EnemyConfig) {
        if config.words.is_empty() {
            return;
        }
        let x = self.rng.range(config.spawn_margin, 1.0 - config.spawn_margin);
        let speed = self.rng.range(config.fall_speed.0, config.fall_speed.1);
        let word = self.rng.next_int(config.words.len() as u32) as usize;
        let text = config.words[word].clone();
        let id = self.spawn(Vec2::new(x, config.spawn_y), word, text, speed);
        log::debug!("enemy {:?} spawned at x={:.2}", id, x);
    }

    /// Remove an enemy by id. Returns it if found.
    pub fn despawn(&mut self, id: EnemyId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.swap_remove(idx))
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Remove all enemies and restart the spawn interval.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.last_spawn_ms = None;
    }
}
