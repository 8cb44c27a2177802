//! Orb Dash headless runner
//!
//! Plays one autopilot run at a fixed 60 Hz and logs how it went.
//!
//! Usage: `orb-dash [tuning.json] [seed]`. `ORB_DASH_USER` names the player for score
//! submission; `ORB_DASH_SETTINGS` points at a settings JSON file.

use std::env;
use std::fs;

use orb_dash::consts::DEFAULT_SEED;
use orb_dash::renderer::HeadlessTarget;
use orb_dash::scheduler::ManualClock;
use orb_dash::sim::{GameEvent, GameState, RunPhase, SoundCue};
use orb_dash::submit::{LogTransport, SubmissionQueue};
use orb_dash::{Scheduler, Settings, Tuning};

const FRAME_DT: f64 = 1.0 / 60.0;
/// Stop after ten simulated minutes even if the autopilot is still alive
const MAX_FRAMES: u64 = 60 * 60 * 10;

fn load_tuning(path: &str) -> Tuning {
    let loaded = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::error!("Could not load tuning from {path} ({e}), using defaults");
            Tuning::default()
        }
    }
}

fn load_settings() -> Settings {
    match env::var("ORB_DASH_SETTINGS") {
        Ok(path) => match fs::read_to_string(&path) {
            Ok(json) => Settings::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read settings from {path} ({e})");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// No audio device here; cues only show up in trace logs
fn log_sound(cue: SoundCue, settings: &Settings) {
    let tone = cue.tone();
    log::trace!(
        "Sound {cue:?}: {:.0} Hz {:?} for {:.2}s at volume {:.2}",
        tone.freq,
        tone.wave,
        tone.duration,
        tone.volume * settings.effective_volume()
    );
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let tuning = args.get(1).map(|p| load_tuning(p)).unwrap_or_default();
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let username = env::var("ORB_DASH_USER").unwrap_or_default();
    log::info!("Orb Dash (headless) starting, seed {seed:#x}");

    let mut state = GameState::new(seed, tuning);
    state.settings = load_settings();
    state.username = username.clone();

    let mut scheduler = Scheduler::new(ManualClock::default());
    scheduler.input.autopilot = true;
    scheduler.input.start = true;

    let submissions = SubmissionQueue::spawn(LogTransport);
    let mut target = HeadlessTarget::default();
    let mut best_level = 1;

    loop {
        scheduler.clock_mut().advance(FRAME_DT);
        let events = scheduler.frame(&mut state, &mut target);
        for event in &events {
            match event {
                GameEvent::LevelClear { level, bonus } => {
                    best_level = best_level.max(*level);
                    log::info!("Cleared level {level} (+{bonus}), score {}", state.score);
                }
                GameEvent::BossDefeated { level, bonus } => {
                    log::info!("Boss down on level {level} (+{bonus})");
                }
                GameEvent::Sound(cue) => log_sound(*cue, &state.settings),
                _ => {}
            }
        }
        submissions.handle_events(&username, &events);

        if state.phase == RunPhase::GameOver {
            break;
        }
        if scheduler.frames() >= MAX_FRAMES {
            log::info!("Frame limit reached, stopping");
            break;
        }
    }

    log::info!(
        "Run finished (seed {:#x}): score {}, level {}, best cleared {}, {} frames rendered \
         ({} vertices last, {} dropped)",
        state.rng.seed(),
        state.score,
        state.level,
        best_level,
        target.frames,
        target.last_vertices,
        scheduler.dropped_frames()
    );
    submissions.shutdown();
}
