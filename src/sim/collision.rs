//! Collision detection and the damage policy
//!
//! Two primitives (rect/rect and circle/rect) plus the contact rules: dash attacks,
//! projectile dodges, shields, i-frames and knockback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::SoundCue;
use super::run;
use super::scoring;
use super::state::{GameState, HeartLossAnim, RunPhase, Tint};

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }
}

/// Strict AABB overlap (touching edges do not count)
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max().x && a.max().x > b.min.x && a.min.y < b.max().y && a.max().y > b.min.y
}

/// Circle against rectangle: clamp the center into the rect, then compare distance
#[inline]
pub fn circle_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max());
    center.distance_squared(closest) <= radius * radius
}

/// Pickup proximity between the player center and a round collectible
#[inline]
pub fn within_reach(player_center: Vec2, item: Vec2, item_radius: f32, reach: f32) -> bool {
    let r = item_radius + reach;
    player_center.distance_squared(item) <= r * r
}

/// Hurt the player, honoring i-frames and shields.
///
/// `source` is the point the hit came from; knockback pushes away from it.
pub fn damage_player(state: &mut GameState, source: Option<Vec2>) {
    let now = state.now;
    if state.phase != RunPhase::Run || state.player.is_invulnerable(now) {
        return;
    }
    let center = state.player.center();

    if state.effects.shield > 0 {
        state.effects.shield = 0;
        state.player.invulnerable_until =
            now + state.tuning.invuln_duration * state.tuning.shield_invuln_factor;
        state.spawn_burst(center, Tint::Shield, 26);
        state.add_text("Shield!", state.player.pos - Vec2::new(0.0, 15.0), Tint::Shield, 1.2);
        state.play(SoundCue::ShieldAbsorb);
        log::debug!("Shield absorbed a hit at t={now:.2}");
        return;
    }

    let slot = state.hearts.saturating_sub(1);
    state.hearts = state.hearts.saturating_sub(1);
    state.spawn_burst(center, Tint::Damage, 34);
    state.add_text("-1 HEART", state.player.pos - Vec2::new(0.0, 12.0), Tint::Damage, 1.2);
    state.play(SoundCue::HeartLost);
    record_heart_loss(state, slot);

    let dir = source
        .map(|s| (center - s).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);
    let arena = state.tuning.arena();
    let margin = state.tuning.player_margin;
    state.player.pos += dir * state.tuning.knockback_distance;
    state.player.clamp_to(arena, margin);
    state.player.vel = dir * state.tuning.knockback_speed;
    state.player.invulnerable_until = now + state.tuning.invuln_duration;

    log::debug!("Player hit at t={now:.2}, hearts left {}", state.hearts);
    if state.hearts == 0 {
        run::game_over(state);
    }
}

fn record_heart_loss(state: &mut GameState, slot: u8) {
    let rotation = state.rng.angle();
    let spin = state.rng.sign() * state.rng.range(1.5, 3.0);
    state.heart_losses.push(HeartLossAnim {
        slot,
        age: 0.0,
        life: 0.65,
        rotation,
        spin,
    });
}

/// Resolve body and projectile contacts against the player for this frame
pub fn resolve_contacts(state: &mut GameState) {
    if state.phase != RunPhase::Run {
        return;
    }
    if state.is_boss_level() {
        resolve_boss_body(state);
        resolve_boss_bullets(state);
    } else {
        resolve_enemies(state);
        resolve_bullets(state);
    }
}

fn resolve_enemies(state: &mut GameState) {
    let arena = state.tuning.arena();
    let margin = state.tuning.enemy_margin;
    for i in 0..state.enemies.len() {
        if state.phase != RunPhase::Run {
            break;
        }
        if !rect_overlap(&state.player.rect(), &state.enemies[i].rect()) {
            continue;
        }
        let enemy_center = state.enemies[i].center();
        if state.dash_active() {
            state.spawn_burst(enemy_center, Tint::Enemy, 20);
            let respawn = state.rng.point_in(arena, margin);
            state.enemies[i].pos = respawn;
            state.play(SoundCue::EnemySmash);
            let reward = scoring::award_dash_kill(state);
            state.add_text(
                format!("+{reward}"),
                respawn - Vec2::new(0.0, 10.0),
                Tint::Enemy,
                1.2,
            );
        } else {
            damage_player(state, Some(enemy_center));
        }
    }
}

fn resolve_bullets(state: &mut GameState) {
    for i in 0..state.bullets.len() {
        if state.phase != RunPhase::Run {
            break;
        }
        let bullet = &state.bullets[i];
        if bullet.life <= 0.0 || !circle_rect(bullet.pos, bullet.radius, &state.player.rect()) {
            continue;
        }
        let hit = bullet.pos;
        state.bullets[i].life = 0.0;
        projectile_hit(state, hit);
    }
    state.bullets.retain(|b| b.life > 0.0);
}

fn resolve_boss_body(state: &mut GameState) {
    let Some(boss_rect) = state.boss.as_ref().map(|b| b.rect()) else {
        return;
    };
    if !rect_overlap(&state.player.rect(), &boss_rect) {
        return;
    }
    let boss_center = boss_rect.center();
    if state.dash_active() {
        if state.effects.boss_struck_dash == state.effects.dash_active_until {
            return;
        }
        state.effects.boss_struck_dash = state.effects.dash_active_until;
        let damage = state.tuning.boss_dash_damage;
        if let Some(boss) = state.boss.as_mut() {
            boss.hp -= damage;
        }
        state.add_text(
            format!("-{damage}"),
            boss_center - Vec2::new(0.0, 35.0),
            Tint::Damage,
            1.2,
        );
        state.spawn_burst(boss_center, Tint::Damage, 30);
        state.play(SoundCue::BossHit);
    } else {
        damage_player(state, Some(boss_center));
    }
}

fn resolve_boss_bullets(state: &mut GameState) {
    for i in 0..state.boss_bullets.len() {
        if state.phase != RunPhase::Run {
            break;
        }
        let body = &state.boss_bullets[i].body;
        if body.life <= 0.0 || !circle_rect(body.pos, body.radius, &state.player.rect()) {
            continue;
        }
        let hit = body.pos;
        state.boss_bullets[i].body.life = 0.0;
        projectile_hit(state, hit);
    }
    state.boss_bullets.retain(|b| b.body.life > 0.0);
}

/// A projectile touched the player: dodge while dashing, otherwise damage
fn projectile_hit(state: &mut GameState, at: Vec2) {
    if state.dash_active() {
        state.spawn_burst(at, Tint::Dodge, 8);
        state.add_text("DODGE", at - Vec2::new(0.0, 10.0), Tint::Dodge, 1.2);
    } else {
        damage_player(state, Some(at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Enemy, EnemyKind};
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        run::start(&mut state);
        // Level 1 layout is random; give the tests an empty arena
        state.enemies.clear();
        state.orbs.clear();
        state.powerups.clear();
        state.turrets.clear();
        state.player.invulnerable_until = 0.0;
        state.now = 10.0;
        state
    }

    fn enemy_on_player(state: &GameState) -> Enemy {
        Enemy {
            pos: state.player.pos,
            size: 22.0,
            kind: EnemyKind::Patrol { vel: Vec2::ZERO },
        }
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::new(Vec2::splat(5.0), Vec2::splat(10.0));
        let c = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(rect_overlap(&a, &b));
        // Edge contact is not overlap
        assert!(!rect_overlap(&a, &c));
    }

    #[test]
    fn test_circle_rect() {
        let rect = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(circle_rect(Vec2::new(15.0, 5.0), 5.0, &rect));
        assert!(!circle_rect(Vec2::new(15.1, 5.0), 5.0, &rect));
        // Corner uses true distance
        assert!(!circle_rect(Vec2::new(14.0, 14.0), 5.0, &rect));
        // Center inside
        assert!(circle_rect(Vec2::new(5.0, 5.0), 1.0, &rect));
    }

    #[test]
    fn test_within_reach() {
        assert!(within_reach(Vec2::ZERO, Vec2::new(14.0, 0.0), 7.0, 7.2));
        assert!(!within_reach(Vec2::ZERO, Vec2::new(15.0, 0.0), 7.0, 7.2));
    }

    #[test]
    fn test_dash_contact_never_hurts_and_pays() {
        let mut state = running_state();
        state.enemies.push(enemy_on_player(&state));
        state.effects.dash_active_until = state.now + 0.1;
        let (hearts, score) = (state.hearts, state.score);

        resolve_contacts(&mut state);

        assert_eq!(state.hearts, hearts);
        assert_eq!(state.score, score + state.tuning.dash_kill_score);
    }

    #[test]
    fn test_plain_contact_costs_one_heart_and_no_bonus() {
        let mut state = running_state();
        state.enemies.push(enemy_on_player(&state));
        let (hearts, score) = (state.hearts, state.score);

        resolve_contacts(&mut state);

        assert_eq!(state.hearts, hearts - 1);
        assert_eq!(state.score, score);
        assert!(state.player.invulnerable_until > state.now);
        assert_eq!(state.heart_losses.len(), 1);
    }

    #[test]
    fn test_iframes_block_second_hit() {
        let mut state = running_state();
        let hearts = state.hearts;
        damage_player(&mut state, None);
        damage_player(&mut state, None);
        assert_eq!(state.hearts, hearts - 1);
    }

    #[test]
    fn test_shield_absorbs_first_hit_then_heart_lost() {
        let mut state = running_state();
        state.effects.shield = 1;
        let hearts = state.hearts;

        damage_player(&mut state, Some(Vec2::ZERO));
        assert_eq!(state.hearts, hearts);
        assert_eq!(state.effects.shield, 0);
        let grace = state.player.invulnerable_until - state.now;
        assert!((grace - 0.9 * 0.6).abs() < 1e-4);

        // Still inside the shield grace window
        damage_player(&mut state, Some(Vec2::ZERO));
        assert_eq!(state.hearts, hearts);

        state.now = state.player.invulnerable_until + 0.01;
        damage_player(&mut state, Some(Vec2::ZERO));
        assert_eq!(state.hearts, hearts - 1);
    }

    #[test]
    fn test_knockback_away_from_source() {
        let mut state = running_state();
        let before = state.player.center();
        damage_player(&mut state, Some(before - Vec2::new(10.0, 0.0)));
        assert!(state.player.center().x > before.x);
        assert!(state.player.vel.x > 0.0);
    }

    #[test]
    fn test_no_source_means_no_knockback() {
        let mut state = running_state();
        let before = state.player.pos;
        damage_player(&mut state, None);
        assert_eq!(state.player.pos, before);
    }

    #[test]
    fn test_bullet_neutralized_on_dodge() {
        let mut state = running_state();
        state.bullets.push(Bullet {
            pos: state.player.center(),
            vel: Vec2::ZERO,
            life: 3.0,
            radius: 5.0,
        });
        state.effects.dash_active_until = state.now + 0.1;
        let hearts = state.hearts;

        resolve_contacts(&mut state);

        assert!(state.bullets.is_empty());
        assert_eq!(state.hearts, hearts);
        assert!(state.floating_texts.iter().any(|t| t.text == "DODGE"));
    }

    #[test]
    fn test_last_heart_ends_run_once() {
        let mut state = running_state();
        state.hearts = 1;
        state.drain_events();
        damage_player(&mut state, None);
        assert_eq!(state.hearts, 0);
        assert_eq!(state.phase, RunPhase::GameOver);

        state.player.invulnerable_until = 0.0;
        damage_player(&mut state, None);
        assert_eq!(state.hearts, 0);
        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, crate::sim::GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }
}
