//! Vertex type and palette for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Tint;

/// 2D vertex with position (arena units) and RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride a GPU vertex buffer layout would use
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.04, 0.05, 0.09, 1.0];
    pub const GRID: [f32; 4] = [0.12, 0.14, 0.2, 1.0];
    pub const PLAYER: [f32; 4] = [0.93, 0.95, 1.0, 1.0];
    pub const ORB: [f32; 4] = [0.06, 0.73, 0.51, 1.0];
    pub const DASH: [f32; 4] = [0.22, 0.74, 0.97, 1.0];
    pub const PATROL: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const CHASER: [f32; 4] = [0.98, 0.45, 0.09, 1.0];
    pub const TURRET: [f32; 4] = [0.98, 0.75, 0.14, 1.0];
    pub const DAMAGE: [f32; 4] = [0.94, 0.27, 0.27, 1.0];
    pub const SHIELD: [f32; 4] = [0.51, 0.55, 0.97, 1.0];
    pub const POWERUP: [f32; 4] = [0.22, 0.74, 0.97, 1.0];
    pub const DODGE: [f32; 4] = [0.65, 0.95, 0.99, 1.0];
    pub const BOSS: [f32; 4] = [0.75, 0.52, 0.99, 1.0];
    pub const BOSS_ENRAGED: [f32; 4] = [0.96, 0.25, 0.37, 1.0];
    pub const LEVEL_CLEAR: [f32; 4] = [0.98, 0.8, 0.08, 1.0];
    pub const TEXT: [f32; 4] = [0.9, 0.92, 0.95, 1.0];
    pub const HEART: [f32; 4] = [0.97, 0.44, 0.44, 1.0];
    pub const HP_BACK: [f32; 4] = [0.2, 0.2, 0.25, 1.0];
    pub const FAULT: [f32; 4] = [1.0, 0.3, 0.3, 1.0];
}

/// Palette color for a simulation tint
pub fn tint_color(tint: Tint) -> [f32; 4] {
    match tint {
        Tint::Orb => colors::ORB,
        Tint::Dash => colors::DASH,
        Tint::Enemy => colors::PATROL,
        Tint::Turret => colors::TURRET,
        Tint::Damage => colors::DAMAGE,
        Tint::Shield => colors::SHIELD,
        Tint::Powerup => colors::POWERUP,
        Tint::Dodge => colors::DODGE,
        Tint::Boss => colors::BOSS,
        Tint::BossEnraged => colors::BOSS_ENRAGED,
        Tint::LevelClear | Tint::Announce => colors::LEVEL_CLEAR,
        Tint::HeartLoss => colors::HEART,
        Tint::Text => colors::TEXT,
    }
}

/// Same color with its alpha scaled
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}
