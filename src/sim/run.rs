//! Run state machine
//!
//! MENU → RUN ⇄ PAUSED, RUN → LEVEL_CLEAR → RUN, RUN → GAME_OVER. Every transition is a
//! no-op when issued from a phase it does not apply to.

use glam::Vec2;

use super::events::{GameEvent, SoundCue};
use super::level;
use super::scoring;
use super::state::{ActiveEffects, GameState, RunPhase, Tint};

/// Begin a fresh run (from MENU or GAME_OVER)
pub fn start(state: &mut GameState) -> bool {
    if !matches!(state.phase, RunPhase::Menu | RunPhase::GameOver) {
        return false;
    }
    reset_run(state);
    level::setup_level(state);
    grant_start_immunity(state);
    state.phase = RunPhase::Run;
    log::info!(
        "Run started (player: {})",
        if state.username.is_empty() { "anonymous" } else { &state.username }
    );
    true
}

/// Restart after a game over
pub fn quick_restart(state: &mut GameState) -> bool {
    if state.phase != RunPhase::GameOver {
        return false;
    }
    start(state)
}

/// Toggle RUN ⇄ PAUSED; ignored in every other phase
pub fn toggle_pause(state: &mut GameState) -> bool {
    state.phase = match state.phase {
        RunPhase::Run => RunPhase::Paused,
        RunPhase::Paused => RunPhase::Run,
        _ => return false,
    };
    log::info!("{}", if state.phase == RunPhase::Paused { "Paused" } else { "Resumed" });
    true
}

/// Advance from LEVEL_CLEAR into the next level
pub fn next_level(state: &mut GameState) -> bool {
    if state.phase != RunPhase::LevelClear {
        return false;
    }
    state.level += 1;
    let arena = state.tuning.arena();
    state.player.recenter(arena);
    level::setup_level(state);
    state.phase = RunPhase::Run;
    true
}

/// Finish the current level: pay the clear bonus and wait for the advance command
pub fn level_complete(state: &mut GameState) {
    if state.phase != RunPhase::Run {
        return;
    }
    let bonus = scoring::award_level_clear(state);
    let center = state.player.center();
    state.add_text(
        format!("+{bonus} (Level Bonus)"),
        state.player.pos - Vec2::new(0.0, 10.0),
        Tint::LevelClear,
        1.2,
    );
    state.spawn_burst(center, Tint::LevelClear, 40);
    state.play(SoundCue::LevelClear);
    state.phase = RunPhase::LevelClear;
    state.emit(GameEvent::LevelClear {
        level: state.level,
        bonus,
    });
    log::info!("Level {} clear, bonus {}, score {}", state.level, bonus, state.score);
}

/// End the run. Idempotent: only the first call emits the game-over event.
pub fn game_over(state: &mut GameState) {
    if state.phase == RunPhase::GameOver {
        return;
    }
    state.phase = RunPhase::GameOver;
    let arena = state.tuning.arena();
    state.add_text("GAME OVER", arena / 2.0 - Vec2::new(50.0, 0.0), Tint::Damage, 3.0);
    let center = state.player.center();
    state.spawn_burst(center, Tint::Damage, 60);
    state.emit(GameEvent::GameOver {
        level: state.level,
        score: state.score,
    });
    log::info!("Game over on level {} with score {}", state.level, state.score);
}

fn reset_run(state: &mut GameState) {
    state.level = 1;
    state.score = 0;
    state.hearts = state.tuning.start_hearts;
    state.combo = 0;
    state.last_orb_time = None;
    state.effects = ActiveEffects::default();
    state.orbs_collected = 0;
    state.fault = None;
    state.clear_entities();
    let arena = state.tuning.arena();
    state.player.recenter(arena);
    state.player.invulnerable_until = 0.0;
}

fn grant_start_immunity(state: &mut GameState) {
    let duration = state.tuning.start_immortal_duration;
    state.player.invulnerable_until = state.now + duration;
    state.add_text(
        format!("IMMUNE {duration:.0}s"),
        state.player.pos - Vec2::new(0.0, 24.0),
        Tint::Boss,
        2.2,
    );
    let center = state.player.center();
    state.spawn_burst(center, Tint::Boss, 28);
}
