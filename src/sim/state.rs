//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; subsystems receive it by
//! `&mut` and keep no copies of their own.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::{GameEvent, SoundCue};
use super::rng::GameRng;
use crate::error::{SimError, SimResult};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the first start command
    Menu,
    /// Active gameplay
    Run,
    /// Game is paused
    Paused,
    /// Level finished, waiting for the advance command
    LevelClear,
    /// Run ended
    GameOver,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Menu => "MENU",
            RunPhase::Run => "RUN",
            RunPhase::Paused => "PAUSED",
            RunPhase::LevelClear => "LEVEL_CLEAR",
            RunPhase::GameOver => "GAME_OVER",
        }
    }
}

/// Visual palette entry; the renderer maps these to colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Orb,
    Dash,
    Enemy,
    Turret,
    Damage,
    Shield,
    Powerup,
    Dodge,
    Boss,
    BossEnraged,
    LevelClear,
    Announce,
    HeartLoss,
    Text,
}

/// The player's avatar. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub speed: f32,
    pub accel: f32,
    pub friction: f32,
    pub invulnerable_until: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: tuning.player_size,
            speed: tuning.player_speed,
            accel: tuning.player_accel,
            friction: tuning.player_friction,
            invulnerable_until: 0.0,
        };
        player.recenter(tuning.arena());
        player
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }

    /// Place in the middle of the arena at rest
    pub fn recenter(&mut self, arena: Vec2) {
        self.pos = arena / 2.0 - Vec2::splat(self.size / 2.0);
        self.vel = Vec2::ZERO;
    }

    /// Keep the whole body `margin` inside the arena
    pub fn clamp_to(&mut self, arena: Vec2, margin: f32) {
        self.pos = self.pos.clamp(
            Vec2::splat(margin),
            arena - Vec2::splat(self.size + margin),
        );
    }

    pub fn is_invulnerable(&self, now: f32) -> bool {
        now < self.invulnerable_until
    }
}

/// A scoring orb on a normal level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec2,
    pub radius: f32,
    /// Decorative pulse phase
    pub phase: f32,
    pub collected: bool,
}

/// Enemy behaviours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Straight-line mover bouncing off the arena walls
    Patrol { vel: Vec2 },
    /// Homes on the player with a capped turn rate
    Chaser { heading: f32, speed: f32 },
}

/// A roaming enemy. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// Stationary shooter. `pos` is the muzzle (center).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub pos: Vec2,
    pub size: f32,
    pub last_fire: f32,
    /// Per-turret phase added to the fire interval
    pub fire_offset: f32,
}

/// A projectile (turret shot, or the body of a boss shot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub radius: f32,
}

impl Bullet {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    /// Alive and not yet past the arena edge plus `margin`
    pub fn is_live(&self, arena: Vec2, margin: f32) -> bool {
        self.life > 0.0
            && self.pos.x > -margin
            && self.pos.y > -margin
            && self.pos.x < arena.x + margin
            && self.pos.y < arena.y + margin
    }
}

/// Which boss attack produced a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossShot {
    Radial { enraged: bool },
    Aimed,
}

/// Boss projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBullet {
    pub body: Bullet,
    pub shot: BossShot,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Absorbs the next hit
    Shield,
    /// Slows enemies for a while
    Slow,
    /// One heart back (score at max hearts)
    Heal,
    /// Doubles scoring for a while
    Multiplier,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Shield,
        PowerupKind::Slow,
        PowerupKind::Heal,
        PowerupKind::Multiplier,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PowerupKind::Shield => "SHIELD",
            PowerupKind::Slow => "SLOW",
            PowerupKind::Heal => "HEAL",
            PowerupKind::Multiplier => "MULT",
        }
    }
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub spawned_at: f32,
    pub lifetime: f32,
    pub consumed: bool,
}

impl Powerup {
    pub fn is_expired(&self, now: f32) -> bool {
        now - self.spawned_at >= self.lifetime
    }
}

/// The boss. `pos` is the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub last_radial: f32,
    pub last_aimed: f32,
    /// Seconds since the last weak orb spawn
    pub weak_orb_timer: f32,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos - Vec2::splat(self.size / 2.0), Vec2::splat(self.size))
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            self.hp / self.max_hp
        }
    }

    pub fn is_enraged(&self, threshold: f32) -> bool {
        self.hp_ratio() < threshold
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Boss-level collectible that hurts the boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossWeakOrb {
    pub pos: Vec2,
    pub radius: f32,
    pub pulse: f32,
    pub damage: f32,
    pub collected: bool,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: Tint,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

/// Rising text label ("+39 x3", "DODGE", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub text: String,
    pub pos: Vec2,
    pub tint: Tint,
    pub life: f32,
    pub max_life: f32,
}

/// Lost-heart flourish in the HUD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartLossAnim {
    /// HUD slot of the heart that was lost
    pub slot: u8,
    pub age: f32,
    pub life: f32,
    pub rotation: f32,
    pub spin: f32,
}

/// Timed buffs and dash windows, all as absolute sim timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub shield: u8,
    pub slow_until: f32,
    pub multiplier_until: f32,
    pub dash_active_until: f32,
    pub dash_ready_at: f32,
    /// `dash_active_until` of the dash that last struck the boss; one hit per dash
    pub boss_struck_dash: f32,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub settings: Settings,
    pub rng: GameRng,
    /// Signed-in name; empty for anonymous play
    pub username: String,
    pub phase: RunPhase,
    pub level: u32,
    pub score: u64,
    pub hearts: u8,
    pub combo: u32,
    pub last_orb_time: Option<f32>,
    pub effects: ActiveEffects,
    pub orbs_collected: u32,
    pub orbs_needed: u32,
    pub time_remaining: f32,
    /// Simulation clock (seconds)
    pub now: f32,
    pub player: Player,
    pub orbs: Vec<Orb>,
    pub enemies: Vec<Enemy>,
    pub turrets: Vec<Turret>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<Powerup>,
    pub boss: Option<Boss>,
    pub boss_bullets: Vec<BossBullet>,
    pub boss_weak_orbs: Vec<BossWeakOrb>,
    pub particles: Vec<Particle>,
    pub floating_texts: Vec<FloatingText>,
    pub heart_losses: Vec<HeartLossAnim>,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    /// Last caught tick fault, shown as an overlay
    pub fault: Option<String>,
}

impl GameState {
    /// Create a game sitting in the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let hearts = tuning.start_hearts;
        Self {
            tuning,
            settings: Settings::default(),
            rng: GameRng::new(seed),
            username: String::new(),
            phase: RunPhase::Menu,
            level: 1,
            score: 0,
            hearts,
            combo: 0,
            last_orb_time: None,
            effects: ActiveEffects::default(),
            orbs_collected: 0,
            orbs_needed: 0,
            time_remaining: 0.0,
            now: 0.0,
            player,
            orbs: Vec::new(),
            enemies: Vec::new(),
            turrets: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            boss: None,
            boss_bullets: Vec::new(),
            boss_weak_orbs: Vec::new(),
            particles: Vec::new(),
            floating_texts: Vec::new(),
            heart_losses: Vec::new(),
            events: Vec::new(),
            fault: None,
        }
    }

    pub fn is_boss_level(&self) -> bool {
        super::level::is_boss_level(self.level, self.tuning.boss_every)
    }

    pub fn dash_active(&self) -> bool {
        self.effects.dash_active_until > self.now
    }

    pub fn dash_ready(&self) -> bool {
        self.now > self.effects.dash_ready_at
    }

    pub fn slow_active(&self) -> bool {
        self.now < self.effects.slow_until
    }

    pub fn multiplier_active(&self) -> bool {
        self.effects.multiplier_until > self.now
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Queue a sound cue unless muted
    pub fn play(&mut self, cue: SoundCue) {
        if !self.settings.muted {
            self.events.push(GameEvent::Sound(cue));
        }
    }

    /// Scatter `count` particles around `pos` (skipped in low graphics)
    pub fn spawn_burst(&mut self, pos: Vec2, tint: Tint, count: usize) {
        let cap = self.settings.max_particles();
        for _ in 0..count {
            if self.particles.len() >= cap {
                break;
            }
            let life = self.rng.range(0.4, 0.9);
            let vel = Vec2::new(self.rng.range(-60.0, 60.0), self.rng.range(-60.0, 60.0));
            let size = self.rng.range(2.0, 5.0);
            self.particles.push(Particle {
                pos,
                vel,
                tint,
                life,
                max_life: life,
                size,
            });
        }
    }

    pub fn add_text(&mut self, text: impl Into<String>, pos: Vec2, tint: Tint, life: f32) {
        self.floating_texts.push(FloatingText {
            text: text.into(),
            pos,
            tint,
            life,
            max_life: life,
        });
    }

    /// Drop every entity and effect collection
    pub fn clear_entities(&mut self) {
        self.orbs.clear();
        self.enemies.clear();
        self.turrets.clear();
        self.bullets.clear();
        self.powerups.clear();
        self.boss = None;
        self.boss_bullets.clear();
        self.boss_weak_orbs.clear();
        self.particles.clear();
        self.floating_texts.clear();
        self.heart_losses.clear();
    }

    /// Verify the structural invariants of the run
    pub fn check_invariants(&self) -> SimResult<()> {
        if self.hearts > self.tuning.max_hearts {
            return Err(SimError::InvariantViolated {
                what: format!("hearts {} above max {}", self.hearts, self.tuning.max_hearts),
            });
        }
        if self.hearts == 0 && !matches!(self.phase, RunPhase::GameOver | RunPhase::Menu) {
            return Err(SimError::InvariantViolated {
                what: format!("no hearts left while in {}", self.phase.as_str()),
            });
        }
        if matches!(self.phase, RunPhase::Run | RunPhase::Paused) {
            let boss_level = self.is_boss_level();
            if !boss_level && self.boss.is_some() {
                return Err(SimError::InvariantViolated {
                    what: format!("boss present on normal level {}", self.level),
                });
            }
            if boss_level
                && (!self.orbs.is_empty() || !self.enemies.is_empty() || !self.turrets.is_empty())
            {
                return Err(SimError::InvariantViolated {
                    what: format!("regular entities on boss level {}", self.level),
                });
            }
        }
        if !self.player.pos.is_finite() || !self.player.vel.is_finite() {
            return Err(SimError::NonFiniteState { entity: "player" });
        }
        if let Some(boss) = &self.boss {
            if !boss.pos.is_finite() || !boss.hp.is_finite() {
                return Err(SimError::NonFiniteState { entity: "boss" });
            }
        }
        if self.enemies.iter().any(|e| !e.pos.is_finite()) {
            return Err(SimError::NonFiniteState { entity: "enemy" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, RunPhase::Menu);
        assert_eq!(state.hearts, 3);
        assert!(state.boss.is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_player_starts_centered() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let c = player.center();
        assert!((c.x - tuning.arena_width / 2.0).abs() < 0.001);
        assert!((c.y - tuning.arena_height / 2.0).abs() < 0.001);
    }

    #[test]
    fn test_bullet_leaves_arena() {
        let arena = Vec2::new(100.0, 100.0);
        let mut bullet = Bullet {
            pos: Vec2::new(95.0, 50.0),
            vel: Vec2::new(600.0, 0.0),
            life: 5.0,
            radius: 5.0,
        };
        assert!(bullet.is_live(arena, 10.0));
        bullet.advance(0.05);
        assert!(!bullet.is_live(arena, 10.0));
    }

    #[test]
    fn test_low_graphics_skips_particles() {
        let mut state = GameState::new(1, Tuning::default());
        state.settings.low_graphics = true;
        state.spawn_burst(Vec2::ZERO, Tint::Orb, 20);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_muted_drops_sound_only() {
        let mut state = GameState::new(1, Tuning::default());
        state.settings.muted = true;
        state.play(SoundCue::Dash);
        state.emit(GameEvent::LevelStarted { level: 1, boss: false });
        assert_eq!(state.drain_events().len(), 1);
    }

    #[test]
    fn test_boss_on_normal_level_is_fault() {
        let mut state = GameState::new(1, Tuning::default());
        state.phase = RunPhase::Run;
        state.level = 2;
        state.boss = Some(Boss {
            pos: Vec2::splat(100.0),
            vel: Vec2::ZERO,
            size: 50.0,
            hp: 10.0,
            max_hp: 10.0,
            last_radial: 0.0,
            last_aimed: 0.0,
            weak_orb_timer: 0.0,
        });
        assert!(matches!(
            state.check_invariants(),
            Err(SimError::InvariantViolated { .. })
        ));
    }
}
