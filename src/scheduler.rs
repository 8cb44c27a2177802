//! Frame scheduler
//!
//! One `frame` = read the clock, clamp the delta, run one tick, render once. A tick that
//! fails or panics is contained: the message becomes the fault overlay and the loop keeps
//! going.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use glam::Vec2;

use crate::consts::MAX_FRAME_DT;
use crate::error::{RenderError, SimError, SimResult};
use crate::renderer::{Label, RenderTarget, build_frame, colors};
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Monotonic time source in seconds
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and fixed-rate headless runs
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pub time: f64,
}

impl ManualClock {
    pub fn advance(&mut self, secs: f64) {
        self.time += secs;
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> f64 {
        self.time
    }
}

/// Largest slice a frame may simulate; garbage deltas become zero
pub fn clamp_frame_delta(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Drives the simulation and the renderer from a [`Clock`]
pub struct Scheduler<C: Clock> {
    clock: C,
    last_time: Option<f64>,
    /// Commands for the next frame; one-shot commands are cleared after each tick
    pub input: TickInput,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames: u64,
    dropped_frames: u64,
    fps: u32,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_time: None,
            input: TickInput::default(),
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames: 0,
            dropped_frames: 0,
            fps: 0,
        }
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames the render target failed to present
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Run one frame at the clock's current time; returns the events it produced
    pub fn frame(
        &mut self,
        state: &mut GameState,
        target: &mut dyn RenderTarget,
    ) -> Vec<GameEvent> {
        let now = self.clock.now();
        self.frame_at(now, state, target)
    }

    /// Run one frame at an explicit time (seconds)
    pub fn frame_at(
        &mut self,
        now: f64,
        state: &mut GameState,
        target: &mut dyn RenderTarget,
    ) -> Vec<GameEvent> {
        let dt = match self.last_time {
            Some(last) => clamp_frame_delta((now - last) as f32),
            None => 0.0,
        };
        self.last_time = Some(now);

        let input = self.input.clone();
        if let Err(err) = guarded_tick(state, &input, dt) {
            log::error!("Tick fault at t={:.2}: {err}", state.now);
            state.fault = Some(err.to_string());
        }
        self.clear_one_shots();
        self.track_fps(now);

        let mut frame = build_frame(state, &state.settings);
        if state.settings.show_fps {
            let pos = Vec2::new(state.tuning.arena_width - 80.0, 10.0);
            frame.labels.push(Label::hud(format!("FPS {}", self.fps), pos, colors::TEXT));
        }
        match target.present(&frame) {
            Ok(()) => {}
            Err(RenderError::Lost(reason)) => {
                // Target rebuilds itself; drop this frame
                log::warn!("Render target lost ({reason}), skipping frame");
                self.dropped_frames += 1;
            }
            Err(e @ RenderError::Backend(_)) => {
                log::error!("{e}");
                self.dropped_frames += 1;
            }
        }

        state.drain_events()
    }

    fn clear_one_shots(&mut self) {
        let input = &mut self.input;
        input.pause = false;
        input.toggle_mute = false;
        input.toggle_low_graphics = false;
        input.quick_restart = false;
        input.advance_level = false;
        input.start = false;
    }

    fn track_fps(&mut self, now: f64) {
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        self.frames += 1;
        if self.frames >= FPS_WINDOW as u64 {
            let oldest = self.frame_times[self.frame_index];
            let elapsed = now - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 / elapsed).round() as u32;
            }
        }
    }
}

/// Tick with panics turned into [`SimError::Panicked`]
fn guarded_tick(state: &mut GameState, input: &TickInput, dt: f32) -> SimResult<()> {
    match panic::catch_unwind(AssertUnwindSafe(|| tick(state, input, dt))) {
        Ok(result) => result,
        Err(payload) => Err(SimError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
