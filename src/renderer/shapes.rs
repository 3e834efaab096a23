//! Shape generation for 2D primitives
//!
//! All builders emit triangle lists in world units on the play plane; the
//! pipeline projects them afterwards.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::Tuning;

/// Pipe measurements needed for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeDims {
    pub width: f32,
    pub cap_width: f32,
    pub shaft_height: f32,
    pub cap_height: f32,
}

impl From<&Tuning> for PipeDims {
    fn from(tuning: &Tuning) -> Self {
        Self {
            width: tuning.pipe_width,
            cap_width: tuning.cap_width,
            shaft_height: tuning.shaft_height,
            cap_height: tuning.cap_height,
        }
    }
}

impl PipeDims {
    fn total_height(&self) -> f32 {
        self.shaft_height + self.cap_height
    }
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Rectangle of `half` extents rotated by `angle` about its centre
pub fn quad(center: Vec2, half: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| {
        let p = center + rot.rotate(Vec2::new(x, y));
        Vertex::new(p.x, p.y, color)
    };

    let bl = corner(-half.x, -half.y);
    let br = corner(half.x, -half.y);
    let tr = corner(half.x, half.y);
    let tl = corner(-half.x, half.y);

    vec![bl, br, tr, bl, tr, tl]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// One pipe: shaft plus a cap (with dark opening) on the gap side
///
/// `center` is the centre of the shaft-plus-cap box.
pub fn pipe(center: Vec2, dims: &PipeDims, upper: bool) -> Vec<Vertex> {
    let half_total = dims.total_height() / 2.0;
    // Cap faces the gap: bottom of an upper pipe, top of a lower one
    let side = if upper { -1.0 } else { 1.0 };
    let cap_y = center.y + side * (half_total - dims.cap_height / 2.0);
    let shaft_y = center.y - side * dims.cap_height / 2.0;

    let mut vertices = Vec::with_capacity(18);
    vertices.extend(quad(
        Vec2::new(center.x, shaft_y),
        Vec2::new(dims.width / 2.0, dims.shaft_height / 2.0),
        0.0,
        colors::PIPE_BODY,
    ));
    vertices.extend(quad(
        Vec2::new(center.x, cap_y),
        Vec2::new(dims.cap_width / 2.0, dims.cap_height / 2.0),
        0.0,
        colors::PIPE_CAP,
    ));
    // Thin dark lip where the pipe opens
    vertices.extend(quad(
        Vec2::new(center.x, cap_y + side * dims.cap_height * 0.4),
        Vec2::new(dims.width * 0.4, dims.cap_height * 0.1),
        0.0,
        colors::PIPE_OPENING,
    ));
    vertices
}

/// Bird body facing the camera: body, eyes and beak
pub fn bird_body(center: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = circle(center, radius, color, 24);

    for side in [-1.0, 1.0] {
        let eye = center + Vec2::new(side * radius * 0.6, radius * 0.3);
        vertices.extend(circle(eye, radius * 0.25, colors::EYE, 10));
        vertices.extend(circle(eye, radius * 0.125, colors::PUPIL, 8));
    }

    let beak = center - Vec2::new(0.0, radius * 0.1);
    vertices.extend(triangle(
        beak + Vec2::new(-radius * 0.25, 0.0),
        beak + Vec2::new(radius * 0.25, 0.0),
        beak - Vec2::new(0.0, radius * 0.4),
        colors::BEAK,
    ));
    vertices
}

/// Horizontal offset of a wing from the body centre (`side` is -1 or 1)
pub fn wing_offset(radius: f32, side: f32) -> Vec2 {
    Vec2::new(side * radius * 0.8, 0.0)
}

/// A flat wing rotated about the view axis
pub fn wing(center: Vec2, radius: f32, angle: f32) -> Vec<Vertex> {
    quad(center, Vec2::new(0.04, radius * 0.9), angle, colors::WING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec2::from(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 1.0, colors::EYE, 16).len(), 48);
    }

    #[test]
    fn test_unrotated_quad_extents() {
        let v = quad(Vec2::new(1.0, 2.0), Vec2::new(0.5, 0.25), 0.0, colors::EYE);
        assert_eq!(v.len(), 6);
        let (min, max) = bounds(&v);
        assert!((min - Vec2::new(0.5, 1.75)).length() < 1e-6);
        assert!((max - Vec2::new(1.5, 2.25)).length() < 1e-6);
    }

    #[test]
    fn test_quarter_turn_swaps_extents() {
        let v = quad(Vec2::ZERO, Vec2::new(1.0, 0.1), PI / 2.0, colors::EYE);
        let (min, max) = bounds(&v);
        assert!((max.x - 0.1).abs() < 1e-5);
        assert!((max.y - 1.0).abs() < 1e-5);
        assert!((min.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pipe_fills_its_box() {
        let dims = PipeDims::from(&Tuning::default());
        for upper in [true, false] {
            let (min, max) = bounds(&pipe(Vec2::new(3.0, 0.0), &dims, upper));
            assert!((max.y - min.y - dims.total_height()).abs() < 1e-5);
            assert!((max.x - min.x - dims.cap_width).abs() < 1e-5);
        }
    }

    #[test]
    fn test_upper_pipe_cap_faces_down() {
        let dims = PipeDims::from(&Tuning::default());
        let v = pipe(Vec2::ZERO, &dims, true);
        // Second quad is the cap
        let (min, max) = bounds(&v[6..12]);
        assert!((min.y + dims.total_height() / 2.0).abs() < 1e-5);
        assert!(max.y < 0.0);
    }
}
