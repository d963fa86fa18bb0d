//! Collision detection and response for a circle against static geometry
//!
//! The ball is the only moving body, so every test here is "circle vs X":
//! solid rectangles (paddle, blocks), edge segments (border and floor
//! loops) and solid circles.

use glam::Vec2;

use super::body::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the obstacle
    pub point: Vec2,
    /// Surface normal at collision (pointing toward the circle centre)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(point: Vec2, normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            point,
            normal,
            penetration,
        }
    }

    /// Keep whichever of two results penetrates deeper
    pub fn deeper(self, other: CollisionResult) -> CollisionResult {
        match (self.hit, other.hit) {
            (true, true) if other.penetration > self.penetration => other,
            (false, true) => other,
            _ => self,
        }
    }
}

/// Check a circle against a solid axis-aligned rectangle
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = center.clamp(rect.min(), rect.max());
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult::hit(closest, offset / dist, radius - dist);
    }

    // Centre is inside the rectangle - push out through the nearest side
    let (min, max) = (rect.min(), rect.max());
    let sides = [
        (center.x - min.x, Vec2::NEG_X, Vec2::new(min.x, center.y)),
        (max.x - center.x, Vec2::X, Vec2::new(max.x, center.y)),
        (center.y - min.y, Vec2::NEG_Y, Vec2::new(center.x, min.y)),
        (max.y - center.y, Vec2::Y, Vec2::new(center.x, max.y)),
    ];
    let (depth, normal, point) = sides
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::Y, center));
    CollisionResult::hit(point, normal, radius + depth)
}

/// Check a circle against a line segment from `a` to `b`
pub fn circle_segment_collision(center: Vec2, radius: f32, a: Vec2, b: Vec2) -> CollisionResult {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();

    let t = if line_len_sq < 0.0001 {
        0.0 // Degenerate segment, treat as a point
    } else {
        ((center - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0)
    };
    let closest = a + line_vec * t;
    let offset = center - closest;
    let dist = offset.length();

    if dist >= radius {
        return CollisionResult::miss();
    }

    let normal = if dist > 0.0001 {
        offset / dist
    } else {
        // Centre sits on the segment - use the left-hand perpendicular
        Vec2::new(-line_vec.y, line_vec.x).normalize_or(Vec2::Y)
    };
    CollisionResult::hit(closest, normal, radius - dist)
}

/// Check a circle against the four edges of a hollow rectangle
pub fn circle_edge_loop_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    rect.edges()
        .into_iter()
        .map(|(a, b)| circle_segment_collision(center, radius, a, b))
        .fold(CollisionResult::miss(), CollisionResult::deeper)
}

/// Check a circle against another solid circle
pub fn circle_circle_collision(
    center: Vec2,
    radius: f32,
    other_center: Vec2,
    other_radius: f32,
) -> CollisionResult {
    let offset = center - other_center;
    let dist = offset.length();
    let reach = radius + other_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = offset.normalize_or(Vec2::Y);
    CollisionResult::hit(other_center + normal * other_radius, normal, reach - dist)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce velocity off a surface, keeping `restitution` of the normal part
///
/// Restitution 1 is a perfect reflection; 0 removes the normal component.
#[inline]
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rect_from_above() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let result = circle_rect_collision(Vec2::new(25.0, 30.0), 15.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_corner() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let result = circle_rect_collision(Vec2::new(53.0, 24.0), 15.0, &rect);
        assert!(result.hit);
        // Normal points diagonally away from the corner
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
        assert_eq!(result.point, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_circle_rect_miss() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let result = circle_rect_collision(Vec2::new(25.0, 36.0), 15.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_center_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 50.0, 20.0);
        let result = circle_rect_collision(Vec2::new(25.0, 18.0), 15.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 17.0).abs() < 0.001);
    }

    #[test]
    fn test_edge_loop_inside_bottom() {
        let arena = Rect::new(0.0, 0.0, 750.0, 1334.0);
        let result = circle_edge_loop_collision(Vec2::new(300.0, 10.0), 15.0, &arena);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 5.0).abs() < 0.001);

        let result = circle_edge_loop_collision(Vec2::new(300.0, 600.0), 15.0, &arena);
        assert!(!result.hit);
    }

    #[test]
    fn test_edge_loop_picks_deepest_edge() {
        let arena = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Near the bottom-left corner, closer to the left wall
        let result = circle_edge_loop_collision(Vec2::new(4.0, 10.0), 15.0, &arena);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
    }

    #[test]
    fn test_circle_circle() {
        let result = circle_circle_collision(Vec2::new(10.0, 0.0), 6.0, Vec2::ZERO, 6.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 2.0).abs() < 0.001);
        assert!(!circle_circle_collision(Vec2::new(13.0, 0.0), 6.0, Vec2::ZERO, 6.0).hit);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_bounce_restitution() {
        let velocity = Vec2::new(30.0, -100.0);
        let elastic = bounce_velocity(velocity, Vec2::Y, 1.0);
        assert_eq!(elastic, reflect_velocity(velocity, Vec2::Y));

        let dead = bounce_velocity(velocity, Vec2::Y, 0.0);
        assert!(dead.y.abs() < 0.001);
        assert!((dead.x - 30.0).abs() < 0.001);
    }
}
