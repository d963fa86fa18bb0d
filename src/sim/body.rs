//! Scene nodes and their physics bodies

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::Category;

/// Stable handle to a node in the scene graph
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned rectangle, origin at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rect of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// The four perimeter edges, counter-clockwise from the bottom edge
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let (min, max) = (self.min(), self.max());
        let bl = min;
        let br = Vec2::new(max.x, min.y);
        let tr = max;
        let tl = Vec2::new(min.x, max.y);
        [(bl, br), (br, tr), (tr, tl), (tl, bl)]
    }
}

/// Collision geometry, relative to the owning node's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Solid rectangle centred on the node
    Rect { size: Vec2 },
    /// Solid circle centred on the node
    Circle { radius: f32 },
    /// Hollow boundary along a rectangle's perimeter (scene coordinates)
    EdgeLoop { rect: Rect },
}

impl Shape {
    /// Does the solid area of this shape contain `point`?
    ///
    /// Edge loops have no area and never contain a point.
    pub fn contains(&self, position: Vec2, point: Vec2) -> bool {
        match *self {
            Shape::Rect { size } => Rect::centered(position, size).contains(point),
            Shape::Circle { radius } => position.distance_squared(point) <= radius * radius,
            Shape::EdgeLoop { .. } => false,
        }
    }

    /// Bounding size of the shape
    pub fn size(&self) -> Vec2 {
        match *self {
            Shape::Rect { size } => size,
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::EdgeLoop { rect } => rect.size,
        }
    }
}

/// Physical properties of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub shape: Shape,
    /// This body's own category
    pub category: Category,
    /// Categories this body bounces off
    pub collision: Category,
    /// Categories whose contacts with this body are reported
    pub contact_test: Category,
    /// Moved by the simulation (false = static)
    pub dynamic: bool,
    pub affected_by_gravity: bool,
    pub allows_rotation: bool,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub mass: f32,
    pub velocity: Vec2,
}

impl PhysicsBody {
    fn with_shape(shape: Shape, dynamic: bool) -> Self {
        Self {
            shape,
            category: Category::ALL,
            collision: Category::ALL,
            contact_test: Category::NONE,
            dynamic,
            affected_by_gravity: dynamic,
            allows_rotation: true,
            restitution: 0.2,
            friction: 0.2,
            linear_damping: 0.1,
            angular_damping: 0.1,
            mass: 1.0,
            velocity: Vec2::ZERO,
        }
    }

    /// Dynamic rectangle body
    pub fn rectangle(size: Vec2) -> Self {
        Self::with_shape(Shape::Rect { size }, true)
    }

    /// Dynamic circular body
    pub fn circle(radius: f32) -> Self {
        Self::with_shape(Shape::Circle { radius }, true)
    }

    /// Static edge loop along `rect`
    pub fn edge_loop(rect: Rect) -> Self {
        Self::with_shape(Shape::EdgeLoop { rect }, false)
    }
}

/// A node in the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub position: Vec2,
    /// Draw order (higher draws on top)
    pub z_position: f32,
    pub body: Option<PhysicsBody>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec2::ZERO,
            z_position: 0.0,
            body: None,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z_position = z;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Scene-space bounding rectangle
    pub fn frame(&self) -> Option<Rect> {
        let body = self.body.as_ref()?;
        Some(match body.shape {
            Shape::EdgeLoop { rect } => rect,
            shape => Rect::centered(self.position, shape.size()),
        })
    }
}
