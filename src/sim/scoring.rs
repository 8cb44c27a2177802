//! Score computation: combos, multipliers, level and boss bonuses
//!
//! The pure `*_value`/`*_bonus` functions hold the formulas; the `award_*` functions
//! apply them to a [`GameState`]. Score only ever grows within a run.

use super::state::GameState;
use crate::tuning::Tuning;

/// Combo after a pickup at `now`, given the previous pickup time
pub fn next_combo(combo: u32, last_pickup: Option<f32>, now: f32, window: f32) -> u32 {
    match last_pickup {
        Some(last) if now - last <= window => combo + 1,
        _ => 1,
    }
}

#[inline]
fn multiplier(active: bool) -> u64 {
    if active { 2 } else { 1 }
}

/// `(base + ceil(level * growth)) * combo * multiplier`
pub fn orb_value(tuning: &Tuning, level: u32, combo: u32, multiplier_active: bool) -> u64 {
    let growth = (level as f64 * tuning.orb_value_growth as f64).ceil() as u64;
    (tuning.base_orb_value + growth) * combo as u64 * multiplier(multiplier_active)
}

/// Time bonus plus per-level bonus, doubled under the multiplier buff
pub fn level_clear_bonus(
    tuning: &Tuning,
    time_remaining: f32,
    level: u32,
    multiplier_active: bool,
) -> u64 {
    let time_bonus = (time_remaining.max(0.0) as f64 * tuning.time_bonus_factor as f64).floor();
    let level_bonus = tuning.level_bonus_base + level as u64 * tuning.level_bonus_per_level;
    (time_bonus as u64 + level_bonus) * multiplier(multiplier_active)
}

pub fn boss_bonus(tuning: &Tuning, level: u32) -> u64 {
    tuning.boss_bonus_base + level as u64 * tuning.boss_bonus_per_level
}

/// Register an orb pickup: advance the combo and add the orb's value
pub fn award_orb(state: &mut GameState) -> u64 {
    let now = state.now;
    state.combo = next_combo(state.combo, state.last_orb_time, now, state.tuning.combo_window);
    state.last_orb_time = Some(now);
    let value = orb_value(&state.tuning, state.level, state.combo, state.multiplier_active());
    state.score += value;
    value
}

pub fn award_dash_kill(state: &mut GameState) -> u64 {
    let reward = state.tuning.dash_kill_score;
    state.score += reward;
    reward
}

pub fn award_heal_overflow(state: &mut GameState) -> u64 {
    let reward = state.tuning.heal_overflow_score;
    state.score += reward;
    reward
}

pub fn award_level_clear(state: &mut GameState) -> u64 {
    let bonus = level_clear_bonus(
        &state.tuning,
        state.time_remaining,
        state.level,
        state.multiplier_active(),
    );
    state.score += bonus;
    bonus
}

pub fn award_boss_defeat(state: &mut GameState) -> u64 {
    let bonus = boss_bonus(&state.tuning, state.level);
    state.score += bonus;
    bonus
}
