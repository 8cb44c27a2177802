//! Triangle-list geometry for the 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::sim::collision::Rect;

#[inline]
fn rim(center: Vec2, radius: f32, i: u32, segments: u32) -> Vec2 {
    let theta = i as f32 / segments as f32 * TAU;
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}

#[inline]
fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    out.reserve(segments as usize * 3);
    for i in 0..segments {
        let a = rim(center, radius, i, segments);
        let b = rim(center, radius, i + 1, segments);
        push_tri(out, center, a, b, color);
    }
}

/// Hollow circle band between `inner` and `outer`
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner: f32,
    outer: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    out.reserve(segments as usize * 6);
    for i in 0..segments {
        let i1 = rim(center, inner, i, segments);
        let o1 = rim(center, outer, i, segments);
        let i2 = rim(center, inner, i + 1, segments);
        let o2 = rim(center, outer, i + 1, segments);
        push_tri(out, i1, o1, i2, color);
        push_tri(out, i2, o1, o2, color);
    }
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    let (min, max) = (r.min, r.max());
    let (tr, bl) = (Vec2::new(max.x, min.y), Vec2::new(min.x, max.y));
    push_tri(out, min, tr, bl, color);
    push_tri(out, bl, tr, max, color);
}

/// Square of side `size` around `center`, rotated by `angle`
pub fn rotated_square(out: &mut Vec<Vertex>, center: Vec2, size: f32, angle: f32, color: [f32; 4]) {
    let half = size / 2.0;
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y) * half);
    let (a, b, c, d) = (
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    );
    push_tri(out, a, b, d, color);
    push_tri(out, d, b, c, color);
}

/// Rectangle outline of thickness `width`
pub fn outline(out: &mut Vec<Vertex>, r: &Rect, width: f32, color: [f32; 4]) {
    let (min, size) = (r.min, r.size);
    let w = width.min(size.x / 2.0).min(size.y / 2.0);
    let edges = [
        Rect::new(min, Vec2::new(size.x, w)),
        Rect::new(Vec2::new(min.x, min.y + size.y - w), Vec2::new(size.x, w)),
        Rect::new(Vec2::new(min.x, min.y + w), Vec2::new(w, size.y - 2.0 * w)),
        Rect::new(
            Vec2::new(min.x + size.x - w, min.y + w),
            Vec2::new(w, size.y - 2.0 * w),
        ),
    ];
    for edge in &edges {
        rect(out, edge, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_fan_size() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, WHITE, 16);
        assert_eq!(out.len(), 48);
        for v in &out {
            let p = Vec2::from(v.position);
            assert!(p.length() <= 5.0 + 1e-4);
        }
    }

    #[test]
    fn test_degenerate_segment_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 1.0, WHITE, 0);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_ring_stays_in_band() {
        let mut out = Vec::new();
        ring(&mut out, Vec2::splat(10.0), 4.0, 6.0, WHITE, 12);
        assert_eq!(out.len(), 72);
        for v in &out {
            let d = Vec2::from(v.position).distance(Vec2::splat(10.0));
            assert!((4.0 - 1e-4..=6.0 + 1e-4).contains(&d));
        }
    }

    #[test]
    fn test_rect_corners() {
        let mut out = Vec::new();
        rect(&mut out, &Rect::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)), WHITE);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }
}
