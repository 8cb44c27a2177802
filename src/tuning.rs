//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults are the boss-enabled balance;
//! a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Balance constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Orbs, powerups spawn this far from the walls
    pub orb_margin: f32,
    /// Enemies and weak orbs spawn this far from the walls
    pub enemy_margin: f32,
    pub turret_margin: f32,
    /// Inner margin patrols and chasers bounce/clamp against
    pub enemy_wall: f32,
    pub player_margin: f32,
    pub boss_margin: f32,
    /// Bullets survive this far past the arena edge
    pub bullet_margin: f32,
    pub boss_bullet_margin: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_accel: f32,
    /// Velocity retained per reference frame
    pub player_friction: f32,
    pub max_hearts: u8,
    pub start_hearts: u8,
    pub invuln_duration: f32,
    /// Fraction of `invuln_duration` granted when a shield absorbs a hit
    pub shield_invuln_factor: f32,
    pub start_immortal_duration: f32,
    pub knockback_distance: f32,
    pub knockback_speed: f32,
    /// Pickup reach as a fraction of the player width
    pub pickup_reach: f32,

    // === Dash ===
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,

    // === Orbs & scoring ===
    pub base_orbs: u32,
    pub orb_per_level: f32,
    pub orb_radius: f32,
    pub base_orb_value: u64,
    pub orb_value_growth: f32,
    pub combo_window: f32,
    pub time_bonus_factor: f32,
    pub level_bonus_base: u64,
    pub level_bonus_per_level: u64,
    pub dash_kill_score: u64,
    pub heal_overflow_score: u64,

    // === Level timing ===
    pub level_time_base: f32,
    pub time_growth: f32,
    pub time_shrink: f32,

    // === Enemies ===
    /// Patrols on level 0; one more every `patrol_level_step` levels
    pub patrol_base: u32,
    pub patrol_level_step: u32,
    pub patrol_max: u32,
    pub chaser_level_step: u32,
    pub chaser_max: u32,
    pub turret_level_step: u32,
    pub turret_max: u32,
    pub patrol_size: f32,
    pub patrol_speed: f32,
    pub patrol_speed_per_level: f32,
    pub chaser_size: f32,
    pub chaser_base_speed: f32,
    pub chaser_speed_per_level: f32,
    pub chaser_turn_rate: f32,
    pub chaser_unlock_level: u32,
    pub turret_size: f32,
    pub turret_unlock_level: u32,
    pub turret_fire_interval: f32,
    pub turret_interval_per_level: f32,
    pub turret_interval_min_cut: f32,
    pub turret_max_offset: f32,
    pub turret_bullet_speed: f32,
    pub bullet_life: f32,
    pub bullet_radius: f32,

    // === Powerups ===
    pub powerup_chance: f64,
    pub powerup_lifetime: f32,
    pub powerup_radius: f32,
    pub slow_factor: f32,
    pub slow_duration: f32,
    pub multiplier_duration: f32,

    // === Boss ===
    pub boss_every: u32,
    pub boss_size: f32,
    pub boss_base_hp: f32,
    pub boss_hp_mult: f32,
    pub boss_homing_accel: f32,
    pub boss_max_speed: f32,
    pub boss_radial_interval: f32,
    pub boss_aimed_interval: f32,
    pub boss_enrage_threshold: f32,
    pub boss_enrage_radial_mult: f32,
    pub boss_enrage_aimed_mult: f32,
    pub boss_bullet_speed: f32,
    pub boss_enrage_speed_mult: f32,
    pub boss_aimed_speed_bonus: f32,
    pub boss_radial_bullets: u32,
    pub boss_enrage_extra_bullets: u32,
    pub boss_bullet_life: f32,
    pub boss_radial_radius: f32,
    pub boss_aimed_radius: f32,
    pub boss_dash_damage: f32,
    pub boss_orb_damage: f32,
    pub boss_orb_radius: f32,
    pub weak_orb_every: f32,
    pub boss_bonus_base: u64,
    pub boss_bonus_per_level: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        // Per-frame speeds of the reference build are expressed here per second (x60).
        Self {
            arena_width: 900.0,
            arena_height: 600.0,
            orb_margin: 30.0,
            enemy_margin: 40.0,
            turret_margin: 60.0,
            enemy_wall: 10.0,
            player_margin: 5.0,
            boss_margin: 60.0,
            bullet_margin: 10.0,
            boss_bullet_margin: 20.0,

            player_size: 18.0,
            player_speed: 129.0,
            player_accel: 1980.0,
            player_friction: 0.85,
            max_hearts: 5,
            start_hearts: 3,
            invuln_duration: 0.9,
            shield_invuln_factor: 0.6,
            start_immortal_duration: 3.0,
            knockback_distance: 60.0,
            knockback_speed: 132.0,
            pickup_reach: 0.4,

            dash_speed: 216.0,
            dash_duration: 0.12,
            dash_cooldown: 1.6,

            base_orbs: 5,
            orb_per_level: 1.1,
            orb_radius: 7.0,
            base_orb_value: 10,
            orb_value_growth: 1.1,
            combo_window: 2.2,
            time_bonus_factor: 2.5,
            level_bonus_base: 140,
            level_bonus_per_level: 40,
            dash_kill_score: 25,
            heal_overflow_score: 100,

            level_time_base: 48.0,
            time_growth: 3.0,
            time_shrink: 0.8,

            patrol_base: 4,
            patrol_level_step: 3,
            patrol_max: 9,
            chaser_level_step: 3,
            chaser_max: 3,
            turret_level_step: 5,
            turret_max: 3,
            patrol_size: 22.0,
            patrol_speed: 72.0,
            patrol_speed_per_level: 0.04,
            chaser_size: 24.0,
            chaser_base_speed: 75.0,
            chaser_speed_per_level: 3.6,
            chaser_turn_rate: 2.1,
            chaser_unlock_level: 4,
            turret_size: 26.0,
            turret_unlock_level: 8,
            turret_fire_interval: 4.2,
            turret_interval_per_level: 0.08,
            turret_interval_min_cut: 1.2,
            turret_max_offset: 1.5,
            turret_bullet_speed: 120.0,
            bullet_life: 6.0,
            bullet_radius: 5.0,

            powerup_chance: 0.55,
            powerup_lifetime: 14.0,
            powerup_radius: 10.0,
            slow_factor: 0.6,
            slow_duration: 6.0,
            multiplier_duration: 10.0,

            boss_every: 5,
            boss_size: 50.0,
            boss_base_hp: 70.0,
            boss_hp_mult: 1.15,
            boss_homing_accel: 72.0,
            boss_max_speed: 48.0,
            boss_radial_interval: 4.5,
            boss_aimed_interval: 3.8,
            boss_enrage_threshold: 0.4,
            boss_enrage_radial_mult: 0.6,
            boss_enrage_aimed_mult: 0.65,
            boss_bullet_speed: 132.0,
            boss_enrage_speed_mult: 1.2,
            boss_aimed_speed_bonus: 24.0,
            boss_radial_bullets: 14,
            boss_enrage_extra_bullets: 4,
            boss_bullet_life: 6.0,
            boss_radial_radius: 6.0,
            boss_aimed_radius: 7.0,
            boss_dash_damage: 18.0,
            boss_orb_damage: 8.0,
            boss_orb_radius: 8.0,
            weak_orb_every: 3.5,
            boss_bonus_base: 600,
            boss_bonus_per_level: 120,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| SimError::Tuning(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the level director or movement code cannot work with
    pub fn validate(&self) -> SimResult<()> {
        if self.arena_width <= 2.0 * self.turret_margin.max(self.boss_margin)
            || self.arena_height <= 2.0 * self.turret_margin.max(self.boss_margin)
        {
            return Err(SimError::Tuning(format!(
                "arena {}x{} is smaller than its spawn margins",
                self.arena_width, self.arena_height
            )));
        }
        if self.patrol_level_step == 0
            || self.chaser_level_step == 0
            || self.turret_level_step == 0
        {
            return Err(SimError::Tuning("enemy level steps must be at least 1".into()));
        }
        if self.boss_every == 0 {
            return Err(SimError::Tuning("boss_every must be at least 1".into()));
        }
        if self.start_hearts == 0 || self.start_hearts > self.max_hearts {
            return Err(SimError::Tuning(format!(
                "start_hearts {} must be in 1..={}",
                self.start_hearts, self.max_hearts
            )));
        }
        if !(0.0..=1.0).contains(&self.powerup_chance) {
            return Err(SimError::Tuning("powerup_chance must be a probability".into()));
        }
        if self.dash_cooldown < self.dash_duration {
            return Err(SimError::Tuning(
                "dash_cooldown must cover dash_duration".into(),
            ));
        }
        if self.player_friction <= 0.0 || self.player_friction > 1.0 {
            return Err(SimError::Tuning("player_friction must be in (0, 1]".into()));
        }
        Ok(())
    }

    /// Arena size as a vector
    pub fn arena(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width, self.arena_height)
    }
}
