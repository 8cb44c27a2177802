//! Level director
//!
//! Decides whether a level is a boss encounter, sizes its orb target and enemy roster,
//! sets the time budget and builds the entities.

use glam::Vec2;

use super::events::GameEvent;
use super::state::{
    Boss, Enemy, EnemyKind, GameState, Orb, Powerup, PowerupKind, Tint, Turret,
};
use crate::tuning::Tuning;

/// Boss levels are every `boss_every`-th level
#[inline]
pub fn is_boss_level(level: u32, boss_every: u32) -> bool {
    boss_every != 0 && level % boss_every == 0
}

/// Orbs to collect on a normal level
pub fn orbs_needed(tuning: &Tuning, level: u32) -> u32 {
    tuning.base_orbs + (level as f64 * tuning.orb_per_level as f64).floor() as u32
}

/// Regular enemy roster for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCounts {
    pub patrol: u32,
    pub chaser: u32,
    pub turret: u32,
}

/// Count unlocked at `unlock`, one more every `step` levels, capped at `max`
fn unlocked_count(level: u32, unlock: u32, step: u32, max: u32) -> u32 {
    if level < unlock {
        return 0;
    }
    let since = level + 1 - unlock.max(1);
    (1 + since / step.max(1)).min(max)
}

pub fn enemy_counts(tuning: &Tuning, level: u32) -> EnemyCounts {
    if is_boss_level(level, tuning.boss_every) {
        return EnemyCounts {
            patrol: 0,
            chaser: 0,
            turret: 0,
        };
    }
    EnemyCounts {
        patrol: (tuning.patrol_base + level / tuning.patrol_level_step.max(1))
            .min(tuning.patrol_max),
        chaser: unlocked_count(
            level,
            tuning.chaser_unlock_level,
            tuning.chaser_level_step,
            tuning.chaser_max,
        ),
        turret: unlocked_count(
            level,
            tuning.turret_unlock_level,
            tuning.turret_level_step,
            tuning.turret_max,
        ),
    }
}

/// Boss hit points, scaled by the boss encounter index (`level / boss_every`)
pub fn boss_hp(tuning: &Tuning, level: u32) -> f32 {
    let encounter = level as f64 / tuning.boss_every.max(1) as f64;
    let factor = (tuning.boss_hp_mult as f64).powf(encounter);
    (tuning.boss_base_hp as f64 * factor).round() as f32
}

/// Seconds available to clear a level
pub fn level_time(tuning: &Tuning, level: u32) -> f32 {
    let l = level as f32;
    tuning.level_time_base + ((l - 1.0) * tuning.time_growth).max(0.0) - l * tuning.time_shrink
}

/// Build the entities for `state.level`, replacing the previous level's
pub fn setup_level(state: &mut GameState) {
    let level = state.level;
    state.orbs_collected = 0;
    state.orbs.clear();
    state.enemies.clear();
    state.turrets.clear();
    state.bullets.clear();
    state.boss = None;
    state.boss_bullets.clear();
    state.boss_weak_orbs.clear();

    let boss = state.is_boss_level();
    if boss {
        state.orbs_needed = 0;
        setup_boss(state);
    } else {
        state.orbs_needed = orbs_needed(&state.tuning, level);
        spawn_orbs(state, state.orbs_needed);
        spawn_enemies(state);
        maybe_spawn_powerup(state, false);
    }

    state.time_remaining = level_time(&state.tuning, level);
    let arena = state.tuning.arena();
    state.add_text(
        format!("Level {level}"),
        arena / 2.0 - Vec2::new(40.0, 0.0),
        Tint::Announce,
        2.0,
    );
    state.emit(GameEvent::LevelStarted { level, boss });
    log::info!(
        "Level {}: boss={}, orbs={}, enemies={}, turrets={}, time={:.1}s",
        level,
        boss,
        state.orbs_needed,
        state.enemies.len(),
        state.turrets.len(),
        state.time_remaining
    );
}

fn spawn_orbs(state: &mut GameState, count: u32) {
    let arena = state.tuning.arena();
    let margin = state.tuning.orb_margin;
    let radius = state.tuning.orb_radius;
    for _ in 0..count {
        let pos = state.rng.point_in(arena, margin);
        let phase = state.rng.angle();
        state.orbs.push(Orb {
            pos,
            radius,
            phase,
            collected: false,
        });
    }
}

fn spawn_enemies(state: &mut GameState) {
    let counts = enemy_counts(&state.tuning, state.level);
    let t = state.tuning.clone();
    let arena = t.arena();
    let l = state.level as f32;
    log::debug!("Spawning {counts:?} for level {}", state.level);

    let patrol_scale = 1.0 + l * t.patrol_speed_per_level;
    for _ in 0..counts.patrol {
        let pos = state.rng.point_in(arena, t.enemy_margin);
        let vel = Vec2::new(
            state.rng.range(-t.patrol_speed, t.patrol_speed),
            state.rng.range(-t.patrol_speed, t.patrol_speed),
        ) * patrol_scale;
        state.enemies.push(Enemy {
            pos,
            size: t.patrol_size,
            kind: EnemyKind::Patrol { vel },
        });
    }

    let chaser_speed = t.chaser_base_speed + l * t.chaser_speed_per_level;
    for _ in 0..counts.chaser {
        let pos = state.rng.point_in(arena, t.enemy_margin);
        let heading = state.rng.angle();
        state.enemies.push(Enemy {
            pos,
            size: t.chaser_size,
            kind: EnemyKind::Chaser {
                heading,
                speed: chaser_speed,
            },
        });
    }

    for _ in 0..counts.turret {
        let pos = state.rng.point_in(arena, t.turret_margin);
        let fire_offset = state.rng.range(0.0, t.turret_max_offset);
        state.turrets.push(Turret {
            pos,
            size: t.turret_size,
            last_fire: state.now,
            fire_offset,
        });
    }
}

/// Roll for a powerup (or force one); returns whether one spawned
pub fn maybe_spawn_powerup(state: &mut GameState, forced: bool) -> bool {
    if !forced && !state.rng.chance(state.tuning.powerup_chance) {
        return false;
    }
    let kind = PowerupKind::ALL[state.rng.index(PowerupKind::ALL.len())];
    let pos = state.rng.point_in(state.tuning.arena(), state.tuning.orb_margin);
    state.powerups.push(Powerup {
        kind,
        pos,
        radius: state.tuning.powerup_radius,
        spawned_at: state.now,
        lifetime: state.tuning.powerup_lifetime,
        consumed: false,
    });
    log::debug!("Powerup {:?} spawned at {:?}", kind, pos);
    true
}

fn setup_boss(state: &mut GameState) {
    let hp = boss_hp(&state.tuning, state.level);
    let arena = state.tuning.arena();
    let pos = arena / 2.0 - Vec2::new(0.0, 40.0);
    state.boss = Some(Boss {
        pos,
        vel: Vec2::ZERO,
        size: state.tuning.boss_size,
        hp,
        max_hp: hp,
        last_radial: state.now,
        last_aimed: state.now,
        weak_orb_timer: 0.0,
    });
    state.add_text(
        "BOSS LEVEL!",
        arena / 2.0 - Vec2::new(60.0, 0.0),
        Tint::Boss,
        2.5,
    );
    state.spawn_burst(pos, Tint::Boss, 50);
    log::info!("Boss spawned on level {} with {} hp", state.level, hp);
}
