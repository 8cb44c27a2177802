//! Boss behaviour: homing drift, radial and aimed attacks, weak orbs, defeat
//!
//! Two independent cooldowns gate the attacks; both shorten once the boss is enraged
//! (hp ratio under the enrage threshold).

use glam::Vec2;

use super::collision::within_reach;
use super::events::{GameEvent, SoundCue};
use super::level;
use super::run;
use super::scoring;
use super::state::{BossBullet, BossShot, BossWeakOrb, Bullet, GameState, RunPhase, Tint};
use crate::{bearing, heading_vector};

/// Advance the boss for one frame: movement, attacks, weak-orb spawning
pub fn update_boss(state: &mut GameState, dt: f32) {
    let now = state.now;
    let target = state.player.center();
    let t = &state.tuning;
    let (accel, max_speed, margin, arena) =
        (t.boss_homing_accel, t.boss_max_speed, t.boss_margin, t.arena());
    let threshold = t.boss_enrage_threshold;
    let (radial_base, aimed_base) = (t.boss_radial_interval, t.boss_aimed_interval);
    let (radial_mult, aimed_mult) = (t.boss_enrage_radial_mult, t.boss_enrage_aimed_mult);
    let weak_every = t.weak_orb_every;

    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    // Gentle homing, per-axis speed cap
    let to_player = (target - boss.pos).normalize_or_zero();
    boss.vel += to_player * accel * dt;
    boss.vel = boss.vel.clamp(Vec2::splat(-max_speed), Vec2::splat(max_speed));
    boss.pos += boss.vel * dt;
    boss.pos = boss.pos.clamp(Vec2::splat(margin), arena - Vec2::splat(margin));

    let enraged = boss.is_enraged(threshold);
    let radial_interval = radial_base * if enraged { radial_mult } else { 1.0 };
    let aimed_interval = aimed_base * if enraged { aimed_mult } else { 1.0 };

    let fire_radial = now - boss.last_radial > radial_interval;
    if fire_radial {
        boss.last_radial = now;
    }
    let fire_aimed = now - boss.last_aimed > aimed_interval;
    if fire_aimed {
        boss.last_aimed = now;
    }

    boss.weak_orb_timer += dt;
    let spawn_weak = boss.weak_orb_timer > weak_every;
    if spawn_weak {
        boss.weak_orb_timer = 0.0;
    }
    let origin = boss.pos;

    if fire_radial {
        fire_radial_burst(state, origin, enraged);
    }
    if fire_aimed {
        fire_aimed_shot(state, origin, target);
    }
    if spawn_weak {
        spawn_weak_orb(state);
    }
    for orb in &mut state.boss_weak_orbs {
        orb.pulse += 2.4 * dt;
    }
}

/// Evenly spaced ring of bullets; denser and faster when enraged
pub fn fire_radial_burst(state: &mut GameState, origin: Vec2, enraged: bool) {
    let t = &state.tuning;
    let count = t.boss_radial_bullets + if enraged { t.boss_enrage_extra_bullets } else { 0 };
    let speed = t.boss_bullet_speed * if enraged { t.boss_enrage_speed_mult } else { 1.0 };
    let (life, radius) = (t.boss_bullet_life, t.boss_radial_radius);
    for i in 0..count {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        state.boss_bullets.push(BossBullet {
            body: Bullet {
                pos: origin,
                vel: heading_vector(angle) * speed,
                life,
                radius,
            },
            shot: BossShot::Radial { enraged },
        });
    }
    let tint = if enraged { Tint::BossEnraged } else { Tint::Boss };
    state.spawn_burst(origin, tint, 25);
    state.play(SoundCue::BossRadial);
}

/// Single faster bullet straight at `target`
pub fn fire_aimed_shot(state: &mut GameState, origin: Vec2, target: Vec2) {
    let t = &state.tuning;
    let speed = t.boss_bullet_speed + t.boss_aimed_speed_bonus;
    let (life, radius) = (t.boss_bullet_life, t.boss_aimed_radius);
    state.boss_bullets.push(BossBullet {
        body: Bullet {
            pos: origin,
            vel: heading_vector(bearing(origin, target)) * speed,
            life,
            radius,
        },
        shot: BossShot::Aimed,
    });
    state.play(SoundCue::BossAimed);
}

fn spawn_weak_orb(state: &mut GameState) {
    let pos = state
        .rng
        .point_in(state.tuning.arena(), state.tuning.enemy_margin);
    state.boss_weak_orbs.push(BossWeakOrb {
        pos,
        radius: state.tuning.boss_orb_radius,
        pulse: 0.0,
        damage: state.tuning.boss_orb_damage,
        collected: false,
    });
}

/// Move boss bullets and drop the dead or escaped ones
pub fn advance_boss_bullets(state: &mut GameState, dt: f32) {
    let arena = state.tuning.arena();
    let margin = state.tuning.boss_bullet_margin;
    for bullet in &mut state.boss_bullets {
        bullet.body.advance(dt);
    }
    state.boss_bullets.retain(|b| b.body.is_live(arena, margin));
}

/// Player touching a weak orb damages the boss and removes the orb
pub fn collect_weak_orbs(state: &mut GameState) {
    if state.boss.is_none() {
        return;
    }
    let center = state.player.center();
    let reach = state.player.size * state.tuning.pickup_reach;
    let mut damage_total = 0.0;
    let mut hits = Vec::new();
    for orb in &mut state.boss_weak_orbs {
        if orb.collected || !within_reach(center, orb.pos, orb.radius, reach) {
            continue;
        }
        orb.collected = true;
        damage_total += orb.damage;
        hits.push((orb.pos, orb.damage));
    }
    state.boss_weak_orbs.retain(|o| !o.collected);
    if hits.is_empty() {
        return;
    }

    let boss_pos = match state.boss.as_mut() {
        Some(boss) => {
            boss.hp -= damage_total;
            boss.pos
        }
        None => return,
    };
    for (pos, damage) in hits {
        state.add_text(
            format!("-{damage}"),
            boss_pos - Vec2::new(0.0, 30.0),
            Tint::Damage,
            1.2,
        );
        state.spawn_burst(pos, Tint::Orb, 14);
        state.play(SoundCue::WeakOrbHit);
    }
}

/// If the boss is out of hp: pay the bonus, drop a powerup, clear the arena and
/// complete the level. Returns whether the boss fell this call.
pub fn resolve_boss_defeat(state: &mut GameState) -> bool {
    if state.phase != RunPhase::Run || !state.boss.as_ref().is_some_and(|b| b.is_defeated()) {
        return false;
    }
    let Some(boss) = state.boss.take() else {
        return false;
    };
    let bonus = scoring::award_boss_defeat(state);
    state.add_text(
        format!("+{bonus} Boss Bonus!"),
        boss.pos - Vec2::new(40.0, 50.0),
        Tint::Boss,
        2.2,
    );
    state.spawn_burst(boss.pos, Tint::Boss, 100);
    state.play(SoundCue::BossDefeated);
    level::maybe_spawn_powerup(state, true);
    state.boss_bullets.clear();
    state.boss_weak_orbs.clear();
    state.emit(GameEvent::BossDefeated {
        level: state.level,
        bonus,
    });
    log::info!("Boss defeated on level {}, bonus {}", state.level, bonus);
    run::level_complete(state);
    true
}
