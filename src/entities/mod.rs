//! Gameplay actors and their tuning constants.
//!
//! All distances are world units, all velocities world units per second.

pub mod avatar;
pub mod bullet;
pub mod enemy;
pub mod hero;
pub mod spawner;

pub use avatar::AvatarSprite;
pub use bullet::TextBullet;
pub use enemy::Enemy;
pub use hero::Hero;
pub use spawner::{EnemySpawner, LiveCounter, SpawnConfig};

/// Side length of every character sprite.
pub const CHARACTER_SIZE: f64 = 64.0;

pub const GRAVITY: f64 = 1250.0;

pub const HERO_SPEED: f64 = 500.0;
pub const JUMP_VELOCITY: f64 = -500.0;
/// World y of the platform the hero stands on.
pub const GROUND_Y: f64 = 400.0;

pub const BULLET_COOLDOWN_TIME: f64 = 0.1;
pub const BULLET_SPEED: f64 = 600.0;

pub const ENEMY_SPEED_X: f64 = 200.0;
pub const ENEMY_SPEED_Y: f64 = 400.0;
