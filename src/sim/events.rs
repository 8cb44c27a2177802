//! Events the simulation hands to the host after each tick
//!
//! The core never plays audio or talks to the network itself; it queues these and the
//! host drains them.

use serde::{Deserialize, Serialize};

/// Oscillator shape for a synthesized cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Short synthesized sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Orb collected; pitch climbs with the combo
    OrbPickup { combo: u32 },
    Dash,
    TurretFire,
    EnemySmash,
    ShieldAbsorb,
    HeartLost,
    PowerupPickup,
    BossRadial,
    BossAimed,
    BossHit,
    WeakOrbHit,
    BossDefeated,
    LevelClear,
}

/// Tone parameters for a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub freq: f32,
    pub duration: f32,
    pub volume: f32,
    pub wave: Waveform,
}

impl SoundCue {
    pub fn tone(&self) -> Tone {
        let (freq, duration, volume, wave) = match *self {
            SoundCue::OrbPickup { combo } => {
                (440.0 + combo.min(8) as f32 * 55.0, 0.07, 0.18, Waveform::Triangle)
            }
            SoundCue::Dash => (600.0, 0.09, 0.22, Waveform::Sawtooth),
            SoundCue::TurretFire => (300.0, 0.05, 0.14, Waveform::Square),
            SoundCue::EnemySmash => (180.0, 0.06, 0.2, Waveform::Square),
            SoundCue::ShieldAbsorb => (200.0, 0.08, 0.25, Waveform::Sine),
            SoundCue::HeartLost => (120.0, 0.18, 0.3, Waveform::Square),
            SoundCue::PowerupPickup => (700.0, 0.14, 0.24, Waveform::Sawtooth),
            SoundCue::BossRadial => (520.0, 0.12, 0.3, Waveform::Square),
            SoundCue::BossAimed => (420.0, 0.09, 0.28, Waveform::Sawtooth),
            SoundCue::BossHit => (700.0, 0.12, 0.3, Waveform::Triangle),
            SoundCue::WeakOrbHit => (660.0, 0.07, 0.25, Waveform::Triangle),
            SoundCue::BossDefeated => (900.0, 0.25, 0.35, Waveform::Square),
            SoundCue::LevelClear => (820.0, 0.18, 0.3, Waveform::Square),
        };
        Tone {
            freq,
            duration,
            volume,
            wave,
        }
    }
}

/// Something the host may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    LevelStarted { level: u32, boss: bool },
    BossDefeated { level: u32, bonus: u64 },
    LevelClear { level: u32, bonus: u64 },
    /// Emitted exactly once per run; the host submits the score on it
    GameOver { level: u32, score: u64 },
}
