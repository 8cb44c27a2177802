//! Simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic and host-free:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only
//! - No rendering, audio or network dependencies

pub mod boss;
pub mod collision;
pub mod events;
pub mod level;
pub mod rng;
pub mod run;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect, damage_player, rect_overlap, resolve_contacts};
pub use events::{GameEvent, SoundCue, Tone, Waveform};
pub use level::{EnemyCounts, enemy_counts, is_boss_level, setup_level};
pub use rng::GameRng;
pub use state::{
    ActiveEffects, Boss, BossBullet, BossShot, BossWeakOrb, Bullet, Enemy, EnemyKind,
    FloatingText, GameState, HeartLossAnim, Orb, Particle, Player, Powerup, PowerupKind,
    RunPhase, Tint, Turret,
};
pub use tick::{TickInput, tick};
