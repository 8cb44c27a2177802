//! Player preferences
//!
//! Toggled from the command surface (mute, low graphics) and carried across runs.

use serde::{Deserialize, Serialize};

/// Particle budget when low graphics is off
pub const MAX_PARTICLES: usize = 1500;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Suppress sound cues
    pub muted: bool,
    /// Skip particles, grid and glow passes
    pub low_graphics: bool,
    /// Show FPS counter in the HUD
    pub show_fps: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            low_graphics: false,
            show_fps: false,
            sfx_volume: 0.8,
        }
    }
}

impl Settings {
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        log::info!("Sound {}", if self.muted { "muted" } else { "on" });
    }

    pub fn toggle_low_graphics(&mut self) {
        self.low_graphics = !self.low_graphics;
        log::info!("Low graphics: {}", self.low_graphics);
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if self.low_graphics { 0 } else { MAX_PARTICLES }
    }

    /// Effective cue volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume.clamp(0.0, 1.0) }
    }

    /// Load settings from a JSON string, falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
