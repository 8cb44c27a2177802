//! Orb Dash - A timed-level arcade game
//!
//! Core modules:
//! - `sim`: Simulation (movement, AI, collisions, scoring, run state)
//! - `scheduler`: Frame loop with clamped delta time and fault isolation
//! - `renderer`: State to vertex/label frames
//! - `submit`: Fire-and-forget score submission
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod submit;
pub mod tuning;

pub use error::{RenderError, SimError, SimResult, SubmitError};
pub use scheduler::{Clock, Scheduler};
pub use settings::Settings;
pub use tuning::Tuning;

/// Loop-level constants
pub mod consts {
    /// Largest simulation slice a single frame may advance (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Reference frame rate the per-frame friction was tuned at
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Default seed when the host does not supply one
    pub const DEFAULT_SEED: u64 = 0x0DA5_4ED0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle
#[inline]
pub fn heading_vector(theta: f32) -> glam::Vec2 {
    glam::Vec2::new(theta.cos(), theta.sin())
}

/// Bearing from `from` to `to` in radians
#[inline]
pub fn bearing(from: glam::Vec2, to: glam::Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
