//! Per-frame simulation step
//!
//! Commands are applied first, then (while running) movement, AI, pickups, contacts, the
//! boss defeat check and the level timer. Visual effects decay in every phase.

use std::cmp::Ordering;

use glam::Vec2;

use super::boss;
use super::collision::{self, within_reach};
use super::events::SoundCue;
use super::run;
use super::scoring;
use super::state::{Bullet, EnemyKind, GameState, PowerupKind, RunPhase, Tint};
use crate::consts::{MAX_FRAME_DT, REFERENCE_FPS};
use crate::error::SimResult;
use crate::{bearing, heading_vector, normalize_angle};

/// Floating text rise speed (units per second)
const TEXT_RISE: f32 = 18.0;

/// Commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash (held)
    pub dash: bool,
    /// Pause toggle
    pub pause: bool,
    pub toggle_mute: bool,
    pub toggle_low_graphics: bool,
    /// Restart from GAME_OVER
    pub quick_restart: bool,
    /// Continue from LEVEL_CLEAR
    pub advance_level: bool,
    /// Begin a run from MENU or GAME_OVER
    pub start: bool,
    /// Demo mode - steer toward the nearest collectible
    pub autopilot: bool,
}

impl TickInput {
    /// Movement direction from the four axes (not normalized, like keyboard input)
    pub fn axis(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir
    }
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> SimResult<()> {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input);
    }
    apply_commands(state, &input);

    state.now += dt;
    if state.phase == RunPhase::Run {
        run_step(state, &input, dt);
    }
    decay_visuals(state, dt);

    state.check_invariants()
}

fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.toggle_mute {
        state.settings.toggle_mute();
    }
    if input.toggle_low_graphics {
        state.settings.toggle_low_graphics();
        if state.settings.low_graphics {
            state.particles.clear();
        }
    }
    if input.start {
        run::start(state);
    } else if input.quick_restart {
        run::quick_restart(state);
    }
    if input.pause {
        run::toggle_pause(state);
    }
    if input.advance_level {
        run::next_level(state);
    }
}

/// Gameplay for one frame. Stops early once the phase leaves RUN.
fn run_step(state: &mut GameState, input: &TickInput, dt: f32) {
    update_player(state, input, dt);

    if state.is_boss_level() {
        boss::update_boss(state, dt);
        boss::advance_boss_bullets(state, dt);
    } else {
        update_enemies(state, dt);
        update_turrets(state);
        advance_bullets(state, dt);
    }

    collect_orbs(state);
    boss::collect_weak_orbs(state);
    // A boss finished off by a weak orb must not hit back this frame
    boss::resolve_boss_defeat(state);
    if state.phase != RunPhase::Run {
        return;
    }

    update_powerups(state);
    collision::resolve_contacts(state);
    boss::resolve_boss_defeat(state);
    if state.phase != RunPhase::Run {
        return;
    }

    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        log::info!("Time ran out on level {}", state.level);
        run::game_over(state);
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let now = state.now;
    let accel = input.axis() * state.player.accel;
    let friction = state.player.friction.powf(dt * REFERENCE_FPS);
    state.player.vel = (state.player.vel + accel * dt) * friction;

    if input.dash && state.dash_ready() {
        state.effects.dash_active_until = now + state.tuning.dash_duration;
        state.effects.dash_ready_at = now + state.tuning.dash_cooldown;
        let center = state.player.center();
        state.spawn_burst(center, Tint::Dash, 14);
        state.play(SoundCue::Dash);
    }

    let max_speed = if state.dash_active() {
        state.tuning.dash_speed
    } else {
        state.player.speed
    };
    state.player.vel = state.player.vel.clamp_length_max(max_speed);
    state.player.pos += state.player.vel * dt;

    let arena = state.tuning.arena();
    state.player.clamp_to(arena, state.tuning.player_margin);
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let slow = if state.slow_active() { state.tuning.slow_factor } else { 1.0 };
    let arena = state.tuning.arena();
    let wall = state.tuning.enemy_wall;
    let turn_limit = state.tuning.chaser_turn_rate * dt;
    let target = state.player.center();

    for enemy in &mut state.enemies {
        let size = enemy.size;
        match &mut enemy.kind {
            EnemyKind::Patrol { vel } => {
                enemy.pos += *vel * slow * dt;
                if enemy.pos.x < wall || enemy.pos.x + size > arena.x - wall {
                    vel.x = -vel.x;
                }
                if enemy.pos.y < wall || enemy.pos.y + size > arena.y - wall {
                    vel.y = -vel.y;
                }
            }
            EnemyKind::Chaser { heading, speed } => {
                let center = enemy.pos + Vec2::splat(size / 2.0);
                let diff = normalize_angle(bearing(center, target) - *heading);
                *heading += diff.clamp(-turn_limit, turn_limit);
                enemy.pos += heading_vector(*heading) * *speed * slow * dt;
                enemy.pos = enemy
                    .pos
                    .clamp(Vec2::splat(wall), arena - Vec2::splat(size + wall));
            }
        }
    }
}

fn update_turrets(state: &mut GameState) {
    let now = state.now;
    let t = &state.tuning;
    let cut = (state.level as f32 * t.turret_interval_per_level).min(t.turret_interval_min_cut);
    let base_interval = t.turret_fire_interval - cut;

    let mut muzzles = Vec::new();
    for turret in &mut state.turrets {
        if now - turret.last_fire > base_interval + turret.fire_offset {
            turret.last_fire = now;
            muzzles.push(turret.pos);
        }
    }

    let target = state.player.center();
    for muzzle in muzzles {
        state.bullets.push(Bullet {
            pos: muzzle,
            vel: heading_vector(bearing(muzzle, target)) * state.tuning.turret_bullet_speed,
            life: state.tuning.bullet_life,
            radius: state.tuning.bullet_radius,
        });
        state.spawn_burst(muzzle, Tint::Turret, 6);
        state.play(SoundCue::TurretFire);
    }
}

fn advance_bullets(state: &mut GameState, dt: f32) {
    let arena = state.tuning.arena();
    let margin = state.tuning.bullet_margin;
    for bullet in &mut state.bullets {
        bullet.advance(dt);
    }
    state.bullets.retain(|b| b.is_live(arena, margin));
}

fn collect_orbs(state: &mut GameState) {
    if state.is_boss_level() {
        return;
    }
    let center = state.player.center();
    let reach = state.player.size * state.tuning.pickup_reach;

    for i in 0..state.orbs.len() {
        if state.phase != RunPhase::Run {
            break;
        }
        let orb = &state.orbs[i];
        if orb.collected || !within_reach(center, orb.pos, orb.radius, reach) {
            continue;
        }
        let pos = orb.pos;
        state.orbs[i].collected = true;
        let value = scoring::award_orb(state);
        state.orbs_collected += 1;

        let combo = state.combo;
        let label = if combo > 1 {
            format!("+{value} x{combo}")
        } else {
            format!("+{value}")
        };
        state.add_text(label, pos - Vec2::new(0.0, 12.0), Tint::Orb, 1.2);
        state.spawn_burst(pos, Tint::Orb, 12 + (combo as usize * 2).min(16));
        state.play(SoundCue::OrbPickup { combo });

        if state.orbs_collected >= state.orbs_needed {
            run::level_complete(state);
        }
    }
    state.orbs.retain(|o| !o.collected);
}

fn update_powerups(state: &mut GameState) {
    let now = state.now;
    state.powerups.retain(|p| !p.is_expired(now));

    let center = state.player.center();
    let reach = state.player.size * state.tuning.pickup_reach;
    let mut taken = Vec::new();
    for powerup in &mut state.powerups {
        let r = powerup.radius + reach;
        if center.distance_squared(powerup.pos) < r * r {
            powerup.consumed = true;
            taken.push((powerup.kind, powerup.pos));
        }
    }
    state.powerups.retain(|p| !p.consumed);

    for (kind, pos) in taken {
        apply_powerup(state, kind);
        state.spawn_burst(pos, Tint::Powerup, 16);
        state.play(SoundCue::PowerupPickup);
        state.add_text(kind.label(), pos - Vec2::new(12.0, 18.0), Tint::Powerup, 1.2);
    }
}

/// Apply a collected powerup's effect
pub fn apply_powerup(state: &mut GameState, kind: PowerupKind) {
    let now = state.now;
    match kind {
        PowerupKind::Shield => state.effects.shield = 1,
        PowerupKind::Slow => state.effects.slow_until = now + state.tuning.slow_duration,
        PowerupKind::Heal => {
            if state.hearts < state.tuning.max_hearts {
                state.hearts += 1;
            } else {
                let bonus = scoring::award_heal_overflow(state);
                state.add_text(
                    format!("+{bonus} BONUS"),
                    state.player.pos - Vec2::new(0.0, 10.0),
                    Tint::Orb,
                    1.2,
                );
            }
        }
        PowerupKind::Multiplier => {
            state.effects.multiplier_until = now + state.tuning.multiplier_duration
        }
    }
    log::debug!("Powerup {} applied at t={now:.2}", kind.label());
}

/// Particles, floating text and heart-loss animations age in every phase
fn decay_visuals(state: &mut GameState, dt: f32) {
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);

    for text in &mut state.floating_texts {
        text.pos.y -= TEXT_RISE * dt;
        text.life -= dt;
    }
    state.floating_texts.retain(|t| t.life > 0.0);

    for anim in &mut state.heart_losses {
        anim.age += dt;
        anim.rotation += anim.spin * dt;
    }
    state.heart_losses.retain(|a| a.age < a.life);
}

/// Demo driver: chase the nearest collectible, ram the boss when the dash is up,
/// and continue past level-clear screens.
fn steer_autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        RunPhase::LevelClear => {
            input.advance_level = true;
            return;
        }
        RunPhase::Run => {}
        _ => return,
    }

    let me = state.player.center();
    let nearest = state
        .orbs
        .iter()
        .map(|o| o.pos)
        .chain(state.boss_weak_orbs.iter().map(|o| o.pos))
        .chain(state.powerups.iter().map(|p| p.pos))
        .min_by(|a, b| {
            a.distance_squared(me)
                .partial_cmp(&b.distance_squared(me))
                .unwrap_or(Ordering::Equal)
        });

    let boss_target = state
        .boss
        .as_ref()
        .filter(|_| state.dash_ready())
        .map(|b| b.pos);
    let Some(target) = boss_target.or(nearest) else {
        return;
    };

    const DEADZONE: f32 = 4.0;
    let delta = target - me;
    input.left = delta.x < -DEADZONE;
    input.right = delta.x > DEADZONE;
    input.up = delta.y < -DEADZONE;
    input.down = delta.y > DEADZONE;

    if let Some(boss) = &state.boss {
        input.dash = state.dash_ready() && boss.pos.distance(me) < boss.size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameEvent;
    use crate::sim::state::{BossBullet, BossShot, BossWeakOrb, Enemy, Powerup, Turret};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, DT).expect("start tick");
        state
    }

    /// The first boss level, freshly started
    fn boss_level(seed: u64) -> GameState {
        let mut state = running_state(seed);
        state.phase = RunPhase::LevelClear;
        state.level = 4;
        run::next_level(&mut state);
        assert!(state.is_boss_level());
        state.player.invulnerable_until = 0.0;
        state.drain_events();
        state
    }

    /// Boss hp lost to one dash started on top of the boss, ticking at `dt`
    fn dash_damage_at(dt: f32) -> f32 {
        let mut state = boss_level(9);
        let boss_pos = state.boss.as_ref().map(|b| b.pos).unwrap_or_default();
        state.player.pos = boss_pos - Vec2::splat(state.player.size / 2.0);
        if let Some(boss) = state.boss.as_mut() {
            boss.hp = 1000.0;
            boss.max_hp = 1000.0;
        }

        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        tick(&mut state, &dash, dt).expect("tick");
        assert!(state.dash_active());
        let steps = (0.3 / dt).round() as usize;
        for _ in 0..steps {
            tick(&mut state, &TickInput::default(), dt).expect("tick");
        }
        1000.0 - state.boss.as_ref().map(|b| b.hp).unwrap_or_default()
    }

    /// A running level with nothing in it
    fn empty_level(seed: u64) -> GameState {
        let mut state = running_state(seed);
        state.enemies.clear();
        state.turrets.clear();
        state.bullets.clear();
        state.powerups.clear();
        state.orbs.clear();
        state
    }

    #[test]
    fn test_start_command_from_menu() {
        let state = running_state(1);
        assert_eq!(state.phase, RunPhase::Run);
        assert_eq!(state.level, 1);
        assert!(!state.orbs.is_empty());
    }

    #[test]
    fn test_player_moves_and_stays_in_arena() {
        let mut state = empty_level(2);
        let start_x = state.player.pos.x;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, DT).expect("tick");
        assert!(state.player.pos.x > start_x);

        for _ in 0..600 {
            tick(&mut state, &right, DT).expect("tick");
        }
        let limit = state.tuning.arena_width - state.player.size - state.tuning.player_margin;
        assert!((state.player.pos.x - limit).abs() < 1e-3);
        assert!(state.player.vel.length() <= state.player.speed + 1e-3);
    }

    #[test]
    fn test_dash_respects_cooldown() {
        let mut state = empty_level(3);
        let dash = TickInput {
            dash: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &dash, DT).expect("tick");
        assert!(state.dash_active());
        let ready_at = state.effects.dash_ready_at;
        assert!((ready_at - (state.now + state.tuning.dash_cooldown)).abs() < 1e-4);

        tick(&mut state, &dash, DT).expect("tick");
        assert_eq!(state.effects.dash_ready_at, ready_at);
    }

    #[test]
    fn test_pause_freezes_gameplay() {
        let mut state = running_state(4);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT).expect("tick");
        assert_eq!(state.phase, RunPhase::Paused);

        let enemies: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let time_left = state.time_remaining;
        let now = state.now;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT).expect("tick");
        }
        assert_eq!(state.time_remaining, time_left);
        assert_eq!(enemies, state.enemies.iter().map(|e| e.pos).collect::<Vec<_>>());
        assert!(state.now > now);

        tick(&mut state, &pause, DT).expect("tick");
        assert_eq!(state.phase, RunPhase::Run);
    }

    #[test]
    fn test_collecting_last_orb_clears_level() {
        let mut state = running_state(5);
        state.enemies.clear();
        state.turrets.clear();
        let center = state.player.center();
        for orb in &mut state.orbs {
            orb.pos = center;
        }
        let needed = state.orbs_needed;
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.orbs_collected, needed);
        assert_eq!(state.phase, RunPhase::LevelClear);
        assert!(state.score > 0);

        // Timer no longer runs
        let left = state.time_remaining;
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.time_remaining, left);

        let advance = TickInput {
            advance_level: true,
            ..Default::default()
        };
        tick(&mut state, &advance, DT).expect("tick");
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, RunPhase::Run);
    }

    #[test]
    fn test_orb_combo_label() {
        let mut state = empty_level(6);
        let center = state.player.center();
        state.orbs.push(crate::sim::state::Orb {
            pos: center,
            radius: 7.0,
            phase: 0.0,
            collected: false,
        });
        state.combo = 2;
        state.last_orb_time = Some(state.now);
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.combo, 3);
        assert!(state.floating_texts.iter().any(|t| t.text == "+36 x3"));
    }

    #[test]
    fn test_timer_expiry_ends_run() {
        let mut state = empty_level(7);
        state.time_remaining = 0.01;
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.phase, RunPhase::GameOver);
        assert_eq!(state.time_remaining, 0.0);
    }

    #[test]
    fn test_patrol_bounces_off_wall() {
        let mut state = empty_level(8);
        state.enemies.push(Enemy {
            pos: Vec2::new(5.0, 300.0),
            size: 22.0,
            kind: EnemyKind::Patrol {
                vel: Vec2::new(-72.0, 0.0),
            },
        });
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert!(matches!(
            state.enemies[0].kind,
            EnemyKind::Patrol { vel } if vel.x > 0.0
        ));
    }

    #[test]
    fn test_slow_scales_patrol_speed() {
        let mut state = empty_level(9);
        let enemy = Enemy {
            pos: Vec2::new(100.0, 100.0),
            size: 22.0,
            kind: EnemyKind::Patrol {
                vel: Vec2::new(60.0, 0.0),
            },
        };
        state.enemies.push(enemy.clone());
        state.effects.slow_until = state.now + 5.0;
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        let moved = state.enemies[0].pos.x - enemy.pos.x;
        assert!((moved - 60.0 * 0.6 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_chaser_turn_rate_is_capped() {
        let mut state = empty_level(10);
        // Player directly to the left, chaser facing right
        let pos = state.player.pos + Vec2::new(300.0, 0.0);
        state.enemies.push(Enemy {
            pos,
            size: state.player.size,
            kind: EnemyKind::Chaser {
                heading: 0.0,
                speed: 75.0,
            },
        });
        let dt = 0.05;
        tick(&mut state, &TickInput::default(), dt).expect("tick");
        let EnemyKind::Chaser { heading, .. } = state.enemies[0].kind else {
            panic!("expected chaser");
        };
        assert!((heading.abs() - state.tuning.chaser_turn_rate * dt).abs() < 1e-4);
    }

    #[test]
    fn test_turret_fires_at_player() {
        let mut state = empty_level(11);
        let muzzle = state.player.center() + Vec2::new(-300.0, 0.0);
        state.turrets.push(Turret {
            pos: muzzle,
            size: 26.0,
            last_fire: state.now - 10.0,
            fire_offset: 0.0,
        });
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].vel.x > 0.0);
        assert_eq!(state.turrets[0].last_fire, state.now);

        // Not again until the interval passes
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_heal_at_full_hearts_scores() {
        let mut state = empty_level(12);
        state.hearts = state.tuning.max_hearts;
        state.score = 0;
        state.powerups.push(Powerup {
            kind: PowerupKind::Heal,
            pos: state.player.center(),
            radius: 10.0,
            spawned_at: state.now,
            lifetime: 14.0,
            consumed: false,
        });
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert!(state.powerups.is_empty());
        assert_eq!(state.hearts, state.tuning.max_hearts);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_powerup_effects() {
        let mut state = empty_level(13);
        state.hearts = 2;
        apply_powerup(&mut state, PowerupKind::Heal);
        assert_eq!(state.hearts, 3);
        apply_powerup(&mut state, PowerupKind::Shield);
        assert_eq!(state.effects.shield, 1);
        apply_powerup(&mut state, PowerupKind::Slow);
        assert!(state.slow_active());
        apply_powerup(&mut state, PowerupKind::Multiplier);
        assert!(state.multiplier_active());
    }

    #[test]
    fn test_powerup_expires() {
        let mut state = empty_level(14);
        let far = state.player.center() + Vec2::new(200.0, 0.0);
        state.powerups.push(Powerup {
            kind: PowerupKind::Shield,
            pos: far,
            radius: 10.0,
            spawned_at: state.now - 14.0,
            lifetime: 14.0,
            consumed: false,
        });
        tick(&mut state, &TickInput::default(), DT).expect("tick");
        assert!(state.powerups.is_empty());
        assert_eq!(state.effects.shield, 0);
    }

    #[test]
    fn test_visuals_decay_after_game_over() {
        let mut state = empty_level(15);
        run::game_over(&mut state);
        assert!(!state.floating_texts.is_empty());
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), DT).expect("tick");
        }
        assert!(state.particles.is_empty());
        assert!(state.floating_texts.is_empty());
    }

    #[test]
    fn test_low_graphics_toggle_drops_particles() {
        let mut state = running_state(16);
        assert!(!state.particles.is_empty());
        let toggle = TickInput {
            toggle_low_graphics: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, DT).expect("tick");
        assert!(state.settings.low_graphics);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let mut state = empty_level(17);
        let now = state.now;
        tick(&mut state, &TickInput::default(), 3.0).expect("tick");
        assert!((state.now - now - MAX_FRAME_DT).abs() < 1e-6);
        tick(&mut state, &TickInput::default(), f32::NAN).expect("tick");
        assert!(state.now.is_finite());
    }

    #[test]
    fn test_determinism() {
        // Same seed, same inputs, same run
        let mut a = running_state(99_999);
        let mut b = running_state(99_999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..900 {
            tick(&mut a, &input, DT).expect("tick");
            tick(&mut b, &input, DT).expect("tick");
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
    }

    #[test]
    fn test_weak_orb_kill_beats_boss_counterattack() {
        let mut state = boss_level(5);
        let level = state.level;
        let center = state.player.center();
        state.hearts = 1;
        if let Some(boss) = state.boss.as_mut() {
            boss.hp = 5.0;
        }
        state.boss_weak_orbs.push(BossWeakOrb {
            pos: center,
            radius: state.tuning.boss_orb_radius,
            pulse: 0.0,
            damage: 8.0,
            collected: false,
        });
        state.boss_bullets.push(BossBullet {
            body: Bullet {
                pos: center,
                vel: Vec2::ZERO,
                life: 3.0,
                radius: state.tuning.boss_aimed_radius,
            },
            shot: BossShot::Aimed,
        });
        let score = state.score;

        tick(&mut state, &TickInput::default(), DT).expect("tick");

        assert_eq!(state.phase, RunPhase::LevelClear);
        assert_eq!(state.hearts, 1);
        assert!(state.boss.is_none());
        assert!(state.boss_bullets.is_empty());
        assert!(state.score >= score + scoring::boss_bonus(&state.tuning, level));
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossDefeated { .. })));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_one_dash_strikes_boss_once() {
        let damage = Tuning::default().boss_dash_damage;
        assert_eq!(dash_damage_at(1.0 / 60.0), damage);
        assert_eq!(dash_damage_at(1.0 / 30.0), damage);
    }

    proptest! {
        #[test]
        fn prop_hearts_stay_in_bounds(
            seed in any::<u64>(),
            frames in proptest::collection::vec(any::<(bool, bool, bool, bool, bool)>(), 1..300),
        ) {
            let mut state = running_state(seed);
            for (up, down, left, right, dash) in frames {
                let input = TickInput { up, down, left, right, dash, ..Default::default() };
                prop_assert!(tick(&mut state, &input, DT).is_ok());
                prop_assert!(state.hearts <= state.tuning.max_hearts);
                if state.hearts == 0 {
                    prop_assert_eq!(state.phase, RunPhase::GameOver);
                }
            }
        }
    }
}
