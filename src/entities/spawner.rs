//! Wave-based enemy spawning.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::profile::DisplayableProfile;
use crate::stage::{ActCtx, Actor, ActorBody};

use super::avatar::AvatarSprite;
use super::enemy::Enemy;

/// Count of live enemies, shared between the spawner and the enemies it
/// produces so a dying enemy frees its wave slot.
#[derive(Clone, Default)]
pub struct LiveCounter(Rc<Cell<usize>>);

impl LiveCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.0.get()
    }

    pub fn increment(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn decrement(&self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpawnConfig {
    /// Maximum simultaneous enemies.
    pub wave_cap: usize,
    /// Bounds of the random delay between spawns, in seconds.
    pub min_cooldown: f64,
    pub max_cooldown: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            wave_cap: 1,
            min_cooldown: 1.0,
            max_cooldown: 5.0,
        }
    }
}

/// Invisible stage actor that drips enemies out of the candidate pool. With
/// an empty pool it stays dormant forever.
pub struct EnemySpawner {
    body: ActorBody,
    candidates: Vec<DisplayableProfile>,
    config: SpawnConfig,
    live: LiveCounter,
    cooldown: f64,
    rng: SmallRng,
}

impl EnemySpawner {
    pub fn new(candidates: Vec<DisplayableProfile>, config: SpawnConfig) -> Self {
        Self::with_rng(candidates, config, SmallRng::from_entropy())
    }

    pub fn with_rng(
        candidates: Vec<DisplayableProfile>,
        config: SpawnConfig,
        rng: SmallRng,
    ) -> Self {
        if candidates.is_empty() {
            log::warn!("no displayable chat profiles, nothing will spawn");
        }
        Self {
            body: ActorBody::default(),
            candidates,
            config,
            live: LiveCounter::new(),
            cooldown: 0.0,
            rng,
        }
    }

    pub fn live_enemies(&self) -> usize {
        self.live.count()
    }

    fn spawn_enemy(&mut self, ctx: &mut ActCtx<'_>) {
        let profile = &self.candidates[self.rng.gen_range(0..self.candidates.len())];
        let mut enemy = Enemy::new(AvatarSprite::for_profile(profile), self.live.clone());
        let max_x = ctx.world_width() - enemy.body().width;
        let max_y = ctx.world_height() - enemy.body().height;
        enemy.body_mut().x = self.rng.gen_range(0.0..=max_x);
        enemy.body_mut().y = self.rng.gen_range(0.0..=max_y);
        ctx.spawn(Box::new(enemy));
        self.live.increment();
        self.cooldown = self
            .rng
            .gen_range(self.config.min_cooldown..=self.config.max_cooldown);
    }
}

impl Actor for EnemySpawner {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn act(&mut self, ctx: &mut ActCtx<'_>) {
        if self.candidates.is_empty() {
            return;
        }
        if self.live.count() >= self.config.wave_cap {
            return;
        }

        self.cooldown -= ctx.delta;
        if self.cooldown <= 0.0 {
            self.spawn_enemy(ctx);
        }
    }
}
