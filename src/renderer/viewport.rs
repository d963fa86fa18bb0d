//! Mapping between scene points, normalized device coordinates and screen
//! pixels.
//!
//! The arena is scaled uniformly to fit the surface and centred, leaving
//! letterbox bars on the long axis.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface size in pixels
    pub size: Vec2,
    /// Arena size in scene points
    pub arena: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32, arena: Vec2) -> Self {
        Self {
            size: Vec2::new(width, height),
            arena,
        }
    }

    /// Pixels per scene point
    pub fn scale(&self) -> f32 {
        (self.size.x / self.arena.x).min(self.size.y / self.arena.y)
    }

    /// Scene point (y-up, origin bottom-left) to NDC (-1..1, y-up)
    pub fn scene_to_ndc(&self, p: Vec2) -> Vec2 {
        (p - self.arena / 2.0) * self.scale() * 2.0 / self.size
    }

    /// Screen pixel (y-down, origin top-left) to scene point
    pub fn screen_to_scene(&self, x: f32, y: f32) -> Vec2 {
        let scale = self.scale();
        Vec2::new(
            (x - self.size.x / 2.0) / scale + self.arena.x / 2.0,
            (self.size.y / 2.0 - y) / scale + self.arena.y / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Vec2 = Vec2::new(750.0, 1334.0);

    #[test]
    fn test_arena_fills_tall_screen() {
        let vp = Viewport::new(375.0, 667.0, ARENA);
        assert!((vp.scale() - 0.5).abs() < 0.001);
        let corner = vp.scene_to_ndc(ARENA);
        assert!((corner - Vec2::ONE).length() < 0.001);
        let origin = vp.scene_to_ndc(Vec2::ZERO);
        assert!((origin + Vec2::ONE).length() < 0.001);
    }

    #[test]
    fn test_letterbox_on_wide_screen() {
        let vp = Viewport::new(1334.0, 667.0, ARENA);
        let right = vp.scene_to_ndc(Vec2::new(750.0, 667.0));
        assert!(right.x < 1.0);
        assert!(right.y.abs() < 0.001);
    }

    #[test]
    fn test_screen_to_scene_flips_y() {
        let vp = Viewport::new(375.0, 667.0, ARENA);
        let bottom_left = vp.screen_to_scene(0.0, 667.0);
        assert!(bottom_left.length() < 0.01);
        let centre = vp.screen_to_scene(187.5, 333.5);
        assert!((centre - ARENA / 2.0).length() < 0.01);
    }
}
