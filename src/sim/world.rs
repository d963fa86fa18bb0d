//! Scene graph and fixed-step body stepper
//!
//! Nodes are kept in a `BTreeMap` keyed by `NodeId`, so iteration order is
//! stable and stepping is deterministic. Only dynamic bodies move; they
//! bounce off every other body whose category is in their collision mask.
//!
//! Contacts are reported once when a pair begins touching and again only
//! after the pair has separated.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::body::{Node, NodeId, PhysicsBody, Rect, Shape};
use super::collision::{
    CollisionResult, bounce_velocity, circle_circle_collision, circle_edge_loop_collision,
    circle_rect_collision,
};
use super::contact::{Contact, ContactBody};
use crate::error::{Result, SceneError};

/// Default gravity in points/s² (scenes usually override it)
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -980.0);

/// Distance at which two bodies count as touching without overlapping
pub const CONTACT_SLOP: f32 = 0.5;

/// Upper bound on sub-steps per step for a single body
const MAX_BODY_SUBSTEPS: usize = 64;

/// Scene graph plus physics world
#[derive(Debug, Clone)]
pub struct World {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
    /// Gravity applied to bodies with `affected_by_gravity`
    pub gravity: Vec2,
    /// Pairs (lower id first) currently in contact
    touching: BTreeSet<(NodeId, NodeId)>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            gravity: DEFAULT_GRAVITY,
            touching: BTreeSet::new(),
        }
    }

    /// Add a node to the scene and return its handle
    pub fn add_child(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        log::debug!("add_child {} '{}' at {:?}", id, node.name, node.position);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node from the scene permanently
    pub fn remove_from_parent(&mut self, id: NodeId) -> Result<Node> {
        let node = self.nodes.remove(&id).ok_or(SceneError::UnknownNode(id))?;
        self.touching.retain(|&(a, b)| a != id && b != id);
        log::debug!("remove_from_parent {} '{}'", id, node.name);
        Ok(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    /// First node (lowest id) with the given name
    pub fn child_node_with_name(&self, name: &str) -> Option<NodeId> {
        self.nodes_named(name).map(|(id, _)| id).next()
    }

    /// Every node with the given name, in id order
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (NodeId, &'a Node)> {
        self.nodes().filter(move |(_, node)| node.name == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Topmost body whose solid area contains `point`
    ///
    /// Edge loops have no area and are never returned.
    pub fn body_at(&self, point: Vec2) -> Option<NodeId> {
        self.nodes()
            .filter(|(_, node)| {
                node.body
                    .as_ref()
                    .is_some_and(|body| body.shape.contains(node.position, point))
            })
            // Highest z wins; among equals the earliest node
            .min_by(|(a_id, a), (b_id, b)| {
                b.z_position
                    .total_cmp(&a.z_position)
                    .then(a_id.cmp(b_id))
            })
            .map(|(id, _)| id)
    }

    /// Apply a one-shot impulse to a dynamic body
    ///
    /// Static bodies and nodes without a body ignore impulses.
    pub fn apply_impulse(&mut self, id: NodeId, impulse: Vec2) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        if let Some(body) = node.body.as_mut().filter(|b| b.dynamic && b.mass > 0.0) {
            body.velocity += impulse / body.mass;
        }
        Ok(())
    }

    /// Advance every dynamic body by `dt` and return the contacts that began
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let movers: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.body.as_ref().is_some_and(|b| b.dynamic))
            .map(|(&id, _)| id)
            .collect();

        let mut began = Vec::new();
        for id in movers {
            self.step_body(id, dt, &mut began);
        }
        began
    }

    fn step_body(&mut self, id: NodeId, dt: f32, began: &mut Vec<Contact>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let Some(body) = node.body.clone() else {
            return;
        };
        let radius = match body.shape {
            Shape::Circle { radius } => radius,
            Shape::Rect { size } => size.min_element() / 2.0,
            Shape::EdgeLoop { .. } => return,
        };

        let mut pos = node.position;
        let mut vel = body.velocity;

        if body.affected_by_gravity {
            vel += self.gravity * dt;
        }
        if body.linear_damping > 0.0 {
            vel /= 1.0 + dt * body.linear_damping;
        }

        // Small steps so the ball can't tunnel through thin blocks
        let move_dist = vel.length() * dt;
        let step_size = radius * 0.3;
        let num_steps = ((move_dist / step_size).ceil() as usize).clamp(1, MAX_BODY_SUBSTEPS);
        let step_dt = dt / num_steps as f32;

        for _ in 0..num_steps {
            pos += vel * step_dt;

            for (&other_id, other) in &self.nodes {
                if other_id == id {
                    continue;
                }
                let Some(other_body) = other.body.as_ref() else {
                    continue;
                };

                let key = (id.min(other_id), id.max(other_id));
                let result = overlap(pos, radius + CONTACT_SLOP, other.position, other_body);
                if !result.hit {
                    self.touching.remove(&key);
                    continue;
                }

                let penetration = result.penetration - CONTACT_SLOP;
                if penetration > 0.0 && body.collision.intersects(other_body.category) {
                    if vel.dot(result.normal) < 0.0 {
                        let restitution = body.restitution.max(other_body.restitution);
                        vel = bounce_velocity(vel, result.normal, restitution);
                    }
                    pos += result.normal * penetration;
                }

                if self.touching.insert(key) && reports_contact(&body, other_body) {
                    log::debug!(
                        "contact began {} {:?} / {} {:?}",
                        id,
                        body.category,
                        other_id,
                        other_body.category
                    );
                    began.push(Contact {
                        body_a: ContactBody {
                            node: id,
                            category: body.category,
                        },
                        body_b: ContactBody {
                            node: other_id,
                            category: other_body.category,
                        },
                        point: result.point,
                        normal: result.normal,
                    });
                }
            }
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = pos;
            if let Some(body) = node.body.as_mut() {
                body.velocity = vel;
            }
        }
    }
}

/// Overlap test of a circle against any body shape
fn overlap(center: Vec2, radius: f32, position: Vec2, body: &PhysicsBody) -> CollisionResult {
    match body.shape {
        Shape::Rect { size } => circle_rect_collision(center, radius, &Rect::centered(position, size)),
        Shape::Circle { radius: other } => circle_circle_collision(center, radius, position, other),
        Shape::EdgeLoop { rect } => circle_edge_loop_collision(center, radius, &rect),
    }
}

/// Should a contact between these bodies be reported?
fn reports_contact(a: &PhysicsBody, b: &PhysicsBody) -> bool {
    a.contact_test.intersects(b.category) || b.contact_test.intersects(a.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Category;

    fn ball_body(velocity: Vec2) -> PhysicsBody {
        let mut body = PhysicsBody::circle(10.0);
        body.category = Category::BALL;
        body.contact_test = Category::BLOCK;
        body.affected_by_gravity = false;
        body.linear_damping = 0.0;
        body.restitution = 1.0;
        body.velocity = velocity;
        body
    }

    fn wall(world: &mut World, category: Category) -> NodeId {
        let mut body = PhysicsBody::rectangle(Vec2::new(100.0, 20.0));
        body.dynamic = false;
        body.category = category;
        world.add_child(
            Node::new("wall")
                .with_position(Vec2::new(0.0, -50.0))
                .with_body(body),
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut world = World::new();
        let id = world.add_child(Node::new("block"));
        assert!(world.contains(id));
        assert_eq!(world.child_node_with_name("block"), Some(id));

        let removed = world.remove_from_parent(id).unwrap();
        assert_eq!(removed.name, "block");
        assert!(world.is_empty());
        assert!(matches!(
            world.remove_from_parent(id),
            Err(SceneError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut world = World::new();
        let a = world.add_child(Node::new("a"));
        world.remove_from_parent(a).unwrap();
        let b = world.add_child(Node::new("b"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_body_at_prefers_higher_z() {
        let mut world = World::new();
        let low = world.add_child(
            Node::new("low")
                .with_z(1.0)
                .with_body(PhysicsBody::rectangle(Vec2::splat(50.0))),
        );
        let high = world.add_child(
            Node::new("high")
                .with_z(3.0)
                .with_body(PhysicsBody::rectangle(Vec2::splat(20.0))),
        );
        assert_eq!(world.body_at(Vec2::ZERO), Some(high));
        assert_eq!(world.body_at(Vec2::new(20.0, 0.0)), Some(low));
        assert_eq!(world.body_at(Vec2::new(200.0, 0.0)), None);
    }

    #[test]
    fn test_impulse_ignored_by_static_body() {
        let mut world = World::new();
        let id = wall(&mut world, Category::BLOCK);
        world.apply_impulse(id, Vec2::new(5.0, 5.0)).unwrap();
        let body = world.node(id).unwrap().body.as_ref().unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_gravity_pulls_affected_bodies() {
        let mut world = World::new();
        let mut body = PhysicsBody::circle(5.0);
        body.linear_damping = 0.0;
        let id = world.add_child(Node::new("ball").with_body(body));
        world.step(0.1);
        let node = world.node(id).unwrap();
        assert!(node.position.y < 0.0);
        assert!(node.body.as_ref().unwrap().velocity.y < 0.0);
    }

    #[test]
    fn test_ball_bounces_and_reports_once() {
        let mut world = World::new();
        world.gravity = Vec2::ZERO;
        let ball = world.add_child(Node::new("ball").with_body(ball_body(Vec2::new(0.0, -200.0))));
        let wall_id = wall(&mut world, Category::BLOCK);

        let mut contacts = Vec::new();
        for _ in 0..60 {
            contacts.extend(world.step(1.0 / 120.0));
        }

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].body_a.node, ball);
        assert_eq!(contacts[0].body_b.node, wall_id);

        let body = world.node(ball).unwrap().body.as_ref().unwrap();
        assert!(body.velocity.y > 0.0, "ball should be moving back up");
        assert!((body.velocity.length() - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_unreported_category_still_bounces() {
        let mut world = World::new();
        world.gravity = Vec2::ZERO;
        let ball = world.add_child(Node::new("ball").with_body(ball_body(Vec2::new(0.0, -200.0))));
        wall(&mut world, Category::PADDLE);

        let mut contacts = Vec::new();
        for _ in 0..60 {
            contacts.extend(world.step(1.0 / 120.0));
        }
        assert!(contacts.is_empty());
        let body = world.node(ball).unwrap().body.as_ref().unwrap();
        assert!(body.velocity.y > 0.0);
    }

    #[test]
    fn test_collision_mask_lets_ball_pass() {
        let mut world = World::new();
        world.gravity = Vec2::ZERO;
        let mut body = ball_body(Vec2::new(0.0, -200.0));
        body.collision = Category::NONE;
        let ball = world.add_child(Node::new("ball").with_body(body));
        wall(&mut world, Category::BLOCK);

        let mut contacts = Vec::new();
        for _ in 0..60 {
            contacts.extend(world.step(1.0 / 120.0));
        }
        // Still reported, but no bounce
        assert_eq!(contacts.len(), 1);
        assert!(world.node(ball).unwrap().position.y < -50.0);
    }
}
