//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{Particle, Rect};

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (rect.min(), rect.max());
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline of the given thickness
///
/// The outline is drawn inside the rectangle.
pub fn rect_outline(outline: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (outline.min(), outline.max());
    let t = thickness.min(outline.size.x / 2.0).min(outline.size.y / 2.0);
    let w = outline.size.x;
    let h = outline.size.y;

    [
        Rect::new(min.x, min.y, w, t),     // bottom
        Rect::new(min.x, max.y - t, w, t), // top
        Rect::new(min.x, min.y + t, t, h - 2.0 * t),
        Rect::new(max.x - t, min.y + t, t, h - 2.0 * t),
    ]
    .iter()
    .flat_map(|side| rect(side, color))
    .collect()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
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

/// Generate vertices for burst particles, fading out with remaining life
pub fn particles(particles: &[Particle], color: [f32; 4]) -> Vec<Vertex> {
    particles
        .iter()
        .flat_map(|p| {
            let alpha = p.life.clamp(0.0, 1.0);
            let faded = [color[0], color[1], color[2], color[3] * alpha];
            rect(&Rect::centered(p.pos, Vec2::splat(p.size)), faded)
        })
        .collect()
}
