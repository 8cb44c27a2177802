//! Seeded randomness for spawns and effects
//!
//! Every random draw in the simulation goes through [`GameRng`], so a run is reproducible
//! from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seedable generator used for spawn positions, kinds and particle spread
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[lo, hi)`; returns `lo` for an empty range
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform index in `[0, n)`
    pub fn index(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.inner.random_range(0..n)
    }

    /// Bernoulli draw
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.random_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform angle in `[0, 2π)`
    pub fn angle(&mut self) -> f32 {
        self.range(0.0, std::f32::consts::TAU)
    }

    /// Uniform sign
    pub fn sign(&mut self) -> f32 {
        if self.inner.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    /// Point inside the arena keeping `margin` from every wall
    pub fn point_in(&mut self, arena: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            self.range(margin, arena.x - margin),
            self.range(margin, arena.y - margin),
        )
    }
}
