//! State → frame
//!
//! [`build_frame`] is a pure function of the game state: it never mutates the simulation,
//! so it can run any number of times per tick (or not at all, headless).

use glam::Vec2;
use serde::Serialize;

use super::shapes;
use super::vertex::{Vertex, colors, tint_color, with_alpha};
use crate::error::RenderError;
use crate::settings::Settings;
use crate::sim::collision::Rect;
use crate::sim::{BossShot, EnemyKind, GameState, PowerupKind, RunPhase};

const GRID_SPACING: f32 = 40.0;
const HUD_HEART_SIZE: f32 = 16.0;
const HUD_HEART_SPACING: f32 = 24.0;
const HUD_HEART_Y: f32 = 70.0;

/// Horizontal alignment of a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Anchor {
    Left,
    Center,
}

/// A line of text for the host to draw over the geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub color: [f32; 4],
    pub size: f32,
    pub anchor: Anchor,
}

impl Label {
    pub fn hud(text: impl Into<String>, pos: Vec2, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            pos,
            color,
            size: 16.0,
            anchor: Anchor::Left,
        }
    }

    pub fn banner(text: impl Into<String>, pos: Vec2, color: [f32; 4], size: f32) -> Self {
        Self {
            text: text.into(),
            pos,
            color,
            size,
            anchor: Anchor::Center,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Triangle list
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
    /// Arena size the coordinates are expressed in
    pub extent: Vec2,
}

impl Frame {
    /// Raw bytes for a vertex buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels.iter().any(|l| l.text == text)
    }
}

/// Anything that can present frames (a GPU surface, a test recorder, ...)
pub trait RenderTarget {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

/// Target that only keeps statistics; used headless and in tests
#[derive(Debug, Default)]
pub struct HeadlessTarget {
    pub frames: u64,
    pub last_vertices: usize,
    pub last_labels: Vec<String>,
}

impl RenderTarget for HeadlessTarget {
    fn present(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.frames += 1;
        self.last_vertices = frame.vertices.len();
        self.last_labels = frame.labels.iter().map(|l| l.text.clone()).collect();
        Ok(())
    }
}

/// Build the frame for the current state
pub fn build_frame(state: &GameState, settings: &Settings) -> Frame {
    let arena = state.tuning.arena();
    let mut frame = Frame {
        vertices: Vec::with_capacity(4096),
        labels: Vec::new(),
        extent: arena,
    };
    let out = &mut frame.vertices;
    let fancy = !settings.low_graphics;

    shapes::rect(out, &Rect::new(Vec2::ZERO, arena), colors::BACKGROUND);
    if fancy {
        draw_grid(out, arena);
    }

    if state.phase != RunPhase::Menu {
        draw_world(state, fancy, out);
    }

    if fancy {
        for p in &state.particles {
            let alpha = p.life / p.max_life.max(f32::EPSILON);
            let r = Rect::new(p.pos - Vec2::splat(p.size / 2.0), Vec2::splat(p.size));
            shapes::rect(out, &r, with_alpha(tint_color(p.tint), alpha));
        }
    }

    for text in &state.floating_texts {
        let alpha = text.life / text.max_life.max(f32::EPSILON);
        frame.labels.push(Label {
            text: text.text.clone(),
            pos: text.pos,
            color: with_alpha(tint_color(text.tint), alpha),
            size: 14.0,
            anchor: Anchor::Left,
        });
    }

    draw_hud(state, &mut frame);
    draw_overlay(state, &mut frame);
    frame
}

fn draw_grid(out: &mut Vec<Vertex>, arena: Vec2) {
    let mut x = GRID_SPACING;
    while x < arena.x {
        shapes::rect(out, &Rect::new(Vec2::new(x, 0.0), Vec2::new(1.0, arena.y)), colors::GRID);
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < arena.y {
        shapes::rect(out, &Rect::new(Vec2::new(0.0, y), Vec2::new(arena.x, 1.0)), colors::GRID);
        y += GRID_SPACING;
    }
}

fn draw_world(state: &GameState, fancy: bool, out: &mut Vec<Vertex>) {
    let now = state.now;

    for orb in &state.orbs {
        let pulse = (now * 4.0 + orb.phase).sin();
        if fancy {
            let glow = orb.radius + 4.0 + pulse * 1.5;
            shapes::circle(out, orb.pos, glow, with_alpha(colors::ORB, 0.25), 16);
        }
        shapes::circle(out, orb.pos, orb.radius, colors::ORB, 16);
    }

    for powerup in &state.powerups {
        let color = match powerup.kind {
            PowerupKind::Shield => colors::SHIELD,
            PowerupKind::Slow => colors::DASH,
            PowerupKind::Heal => colors::HEART,
            PowerupKind::Multiplier => colors::LEVEL_CLEAR,
        };
        // Fade out over the last two seconds
        let left = powerup.lifetime - (now - powerup.spawned_at);
        let alpha = (left / 2.0).clamp(0.2, 1.0);
        shapes::ring(
            out,
            powerup.pos,
            powerup.radius - 3.0,
            powerup.radius,
            with_alpha(color, alpha),
            20,
        );
        shapes::circle(out, powerup.pos, powerup.radius - 4.0, with_alpha(color, alpha * 0.5), 20);
    }

    for enemy in &state.enemies {
        let color = match enemy.kind {
            EnemyKind::Patrol { .. } => colors::PATROL,
            EnemyKind::Chaser { .. } => colors::CHASER,
        };
        shapes::rect(out, &enemy.rect(), color);
    }

    for turret in &state.turrets {
        let r = Rect::new(turret.pos - Vec2::splat(turret.size / 2.0), Vec2::splat(turret.size));
        shapes::outline(out, &r, 3.0, colors::TURRET);
        shapes::circle(out, turret.pos, turret.size / 5.0, colors::TURRET, 10);
    }

    for bullet in &state.bullets {
        shapes::circle(out, bullet.pos, bullet.radius, colors::TURRET, 10);
    }

    for orb in &state.boss_weak_orbs {
        let r = orb.radius + orb.pulse.sin() * 2.0;
        shapes::ring(out, orb.pos, r, r + 3.0, colors::BOSS, 16);
        shapes::circle(out, orb.pos, r * 0.6, colors::ORB, 12);
    }

    if let Some(boss) = &state.boss {
        let enraged = boss.is_enraged(state.tuning.boss_enrage_threshold);
        let color = if enraged { colors::BOSS_ENRAGED } else { colors::BOSS };
        shapes::rect(out, &boss.rect(), color);

        // HP bar above the boss
        let bar = Rect::new(boss.rect().min - Vec2::new(0.0, 12.0), Vec2::new(boss.size, 6.0));
        shapes::rect(out, &bar, colors::HP_BACK);
        let fill = bar.size.x * boss.hp_ratio().clamp(0.0, 1.0);
        let filled = Rect::new(bar.min, Vec2::new(fill, bar.size.y));
        shapes::rect(out, &filled, color);
    }

    for shot in &state.boss_bullets {
        let color = match shot.shot {
            BossShot::Radial { enraged: true } => colors::BOSS_ENRAGED,
            BossShot::Radial { enraged: false } => colors::BOSS,
            BossShot::Aimed => colors::DAMAGE,
        };
        shapes::circle(out, shot.body.pos, shot.body.radius, color, 10);
    }

    draw_player(state, fancy, out);
}

fn draw_player(state: &GameState, fancy: bool, out: &mut Vec<Vertex>) {
    let now = state.now;
    let player = &state.player;
    // Blink while invulnerable
    if player.is_invulnerable(now) && ((now * 20.0) as i64) % 2 == 0 {
        return;
    }
    let color = if state.dash_active() { colors::DASH } else { colors::PLAYER };
    if fancy && state.dash_active() {
        let trail = Rect::new(player.pos - player.vel * 0.03, Vec2::splat(player.size));
        shapes::rect(out, &trail, with_alpha(colors::DASH, 0.35));
    }
    shapes::rect(out, &player.rect(), color);
    if state.effects.shield > 0 {
        let r = player.size * 0.9;
        shapes::ring(out, player.center(), r - 2.0, r, colors::SHIELD, 24);
    }
}

fn draw_hud(state: &GameState, frame: &mut Frame) {
    if state.phase == RunPhase::Menu {
        return;
    }
    let now = state.now;
    let out = &mut frame.vertices;

    for slot in 0..state.tuning.max_hearts {
        let center = heart_slot(slot);
        let color = if slot < state.hearts { colors::HEART } else { colors::HP_BACK };
        let size = HUD_HEART_SIZE * 0.7;
        shapes::rotated_square(out, center, size, std::f32::consts::FRAC_PI_4, color);
    }
    for anim in &state.heart_losses {
        let t = (anim.age / anim.life).clamp(0.0, 1.0);
        let center = heart_slot(anim.slot) + Vec2::new(0.0, t * 20.0);
        let size = HUD_HEART_SIZE * 0.7 * (1.0 + t * 0.5);
        let color = with_alpha(colors::HEART, 1.0 - t);
        shapes::rotated_square(out, center, size, anim.rotation, color);
    }

    let labels = &mut frame.labels;
    labels.push(Label::hud(format!("Score {}", state.score), Vec2::new(10.0, 10.0), colors::TEXT));
    let level = if state.is_boss_level() {
        format!("Level {} (BOSS)", state.level)
    } else {
        format!("Level {}  Orbs {}/{}", state.level, state.orbs_collected, state.orbs_needed)
    };
    labels.push(Label::hud(level, Vec2::new(10.0, 30.0), colors::TEXT));
    labels.push(Label::hud(
        format!("Time {:.1}", state.time_remaining.max(0.0)),
        Vec2::new(10.0, 50.0),
        colors::TEXT,
    ));

    let dash = if state.dash_ready() {
        "Dash READY".to_string()
    } else {
        format!("Dash {:.1}s", (state.effects.dash_ready_at - now).max(0.0))
    };
    let dash_color = if state.dash_ready() { colors::DASH } else { colors::HP_BACK };
    labels.push(Label::hud(dash, Vec2::new(10.0, 90.0), dash_color));

    if state.combo > 1 {
        labels.push(Label::hud(
            format!("Combo x{}", state.combo),
            Vec2::new(10.0, 110.0),
            colors::ORB,
        ));
    }
    let mut effects = Vec::new();
    if state.effects.shield > 0 {
        effects.push("SHIELD".to_string());
    }
    if state.slow_active() {
        effects.push(format!("SLOW {:.0}s", state.effects.slow_until - now));
    }
    if state.multiplier_active() {
        effects.push(format!("x2 {:.0}s", state.effects.multiplier_until - now));
    }
    if !effects.is_empty() {
        labels.push(Label::hud(effects.join("  "), Vec2::new(10.0, 130.0), colors::POWERUP));
    }
}

fn heart_slot(slot: u8) -> Vec2 {
    Vec2::new(
        10.0 + slot as f32 * HUD_HEART_SPACING + HUD_HEART_SIZE / 2.0,
        HUD_HEART_Y + HUD_HEART_SIZE / 2.0,
    )
}

fn draw_overlay(state: &GameState, frame: &mut Frame) {
    let mid = state.tuning.arena() / 2.0;
    let labels = &mut frame.labels;
    match state.phase {
        RunPhase::Menu => {
            labels.push(Label::banner("ORB DASH", mid - Vec2::new(0.0, 40.0), colors::ORB, 48.0));
            labels.push(Label::banner(
                "Press Start",
                mid + Vec2::new(0.0, 20.0),
                colors::TEXT,
                20.0,
            ));
        }
        RunPhase::Paused => {
            labels.push(Label::banner("PAUSED", mid, colors::TEXT, 36.0));
        }
        RunPhase::LevelClear => {
            labels.push(Label::banner(
                "LEVEL CLEAR",
                mid - Vec2::new(0.0, 20.0),
                colors::LEVEL_CLEAR,
                36.0,
            ));
            labels.push(Label::banner(
                "Continue to next level",
                mid + Vec2::new(0.0, 24.0),
                colors::TEXT,
                18.0,
            ));
        }
        RunPhase::GameOver => {
            labels.push(Label::banner(
                format!("Final score {}", state.score),
                mid + Vec2::new(0.0, 40.0),
                colors::TEXT,
                22.0,
            ));
            labels.push(Label::banner(
                "Restart to play again",
                mid + Vec2::new(0.0, 70.0),
                colors::TEXT,
                16.0,
            ));
        }
        RunPhase::Run => {}
    }
    if let Some(fault) = &state.fault {
        labels.push(Label::banner(
            format!("Error: {fault}"),
            Vec2::new(mid.x, state.tuning.arena_height - 24.0),
            colors::FAULT,
            14.0,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 1.0 / 60.0).expect("start");
        state
    }

    #[test]
    fn test_menu_frame() {
        let state = GameState::new(1, Tuning::default());
        let frame = build_frame(&state, &state.settings);
        assert!(frame.has_label("ORB DASH"));
        assert!(!frame.labels.iter().any(|l| l.text.starts_with("Score")));
    }

    #[test]
    fn test_frame_is_triangle_list() {
        let state = running(2);
        let frame = build_frame(&state, &state.settings);
        assert_eq!(frame.vertices.len() % 3, 0);
        assert!(frame.triangle_count() > 0);
        assert_eq!(frame.vertex_bytes().len(), frame.vertices.len() * Vertex::STRIDE);
        assert!(frame.labels.iter().any(|l| l.text.starts_with("Score ")));
    }

    #[test]
    fn test_low_graphics_draws_less() {
        let state = running(3);
        let full = build_frame(&state, &state.settings);
        let mut settings = state.settings.clone();
        settings.low_graphics = true;
        let lean = build_frame(&state, &settings);
        assert!(lean.vertices.len() < full.vertices.len());
    }

    #[test]
    fn test_fault_overlay() {
        let mut state = running(4);
        state.fault = Some("invariant violated: test".into());
        let frame = build_frame(&state, &state.settings);
        assert!(frame.has_label("Error: invariant violated: test"));
    }

    #[test]
    fn test_phase_banners() {
        let mut state = running(5);
        state.phase = RunPhase::Paused;
        assert!(build_frame(&state, &state.settings).has_label("PAUSED"));
        state.phase = RunPhase::LevelClear;
        assert!(build_frame(&state, &state.settings).has_label("LEVEL CLEAR"));
        state.phase = RunPhase::GameOver;
        state.score = 77;
        assert!(build_frame(&state, &state.settings).has_label("Final score 77"));
    }

    #[test]
    fn test_boss_level_hud() {
        let mut state = running(6);
        state.phase = RunPhase::LevelClear;
        state.level = 4;
        crate::sim::run::next_level(&mut state);
        let frame = build_frame(&state, &state.settings);
        assert!(frame.has_label("Level 5 (BOSS)"));
    }

    #[test]
    fn test_rendering_does_not_touch_state() {
        let state = running(7);
        let before = (state.score, state.now, state.particles.len(), state.player.pos);
        let _ = build_frame(&state, &state.settings);
        assert_eq!(before, (state.score, state.now, state.particles.len(), state.player.pos));
    }

    #[test]
    fn test_headless_target_records() {
        let state = running(8);
        let mut target = HeadlessTarget::default();
        let frame = build_frame(&state, &state.settings);
        target.present(&frame).expect("present");
        assert_eq!(target.frames, 1);
        assert_eq!(target.last_vertices, frame.vertices.len());
    }
}
