//! The game scene
//!
//! Owns the world, sets up the arena, forwards touches to the paddle and
//! turns contact-begin notifications into game-state changes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Node, NodeId, PhysicsBody, Rect};
use super::category::Category;
use super::contact::{Contact, ContactEffect, resolve};
use super::paddle::{PADDLE_NAME, PaddleController, clamp_paddle_x};
use super::world::World;
use crate::consts::{BLOCK_COUNT, BREAK_PARTICLE_COUNT, BREAK_PARTICLE_LIFE, FLOOR_HEIGHT};
use crate::error::{Result, SceneError};
use crate::settings::Settings;

pub const BALL_NAME: &str = "ball";
pub const BLOCK_NAME: &str = "block";
pub const FLOOR_NAME: &str = "floor";
pub const BORDER_NAME: &str = "border";

/// Something the front-end may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A touch landed on the paddle and is now dragging it
    TouchBeganOnPaddle,
    /// The ball touched the floor sensor
    BallReachedBottom,
    /// A block was struck and removed
    BlockBroken { node: NodeId, position: Vec2 },
}

/// A particle from a block-break burst (visual only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 at spawn, 0 when expired
    pub life: f32,
    pub size: f32,
}

/// Breakout scene controller
#[derive(Debug, Clone)]
pub struct GameScene {
    settings: Settings,
    world: World,
    paddle_id: NodeId,
    ball_id: NodeId,
    controller: PaddleController,
    events: Vec<GameEvent>,
    particles: Vec<Particle>,
    rng: Pcg32,
    /// Simulation tick counter
    time_ticks: u64,
}

impl GameScene {
    /// Validate settings and build the arena
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let mut world = World::new();
        let (paddle_id, ball_id) = did_move(&mut world, &settings)?;
        let rng = Pcg32::seed_from_u64(settings.seed);

        Ok(Self {
            settings,
            world,
            paddle_id,
            ball_id,
            controller: PaddleController::new(),
            events: Vec::new(),
            particles: Vec::new(),
            rng,
            time_ticks: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn paddle_id(&self) -> NodeId {
        self.paddle_id
    }

    pub fn ball_id(&self) -> NodeId {
        self.ball_id
    }

    pub fn paddle(&self) -> &Node {
        self.node(self.paddle_id)
    }

    pub fn ball(&self) -> &Node {
        self.node(self.ball_id)
    }

    fn node(&self, id: NodeId) -> &Node {
        // Paddle and ball are never removed: nothing in the scene removes
        // anything but blocks, and remove_block refuses other names.
        match self.world.node(id) {
            Some(node) => node,
            None => unreachable!("scene lost permanent node {id}"),
        }
    }

    /// Remaining blocks, in creation order
    pub fn blocks(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.world.nodes_named(BLOCK_NAME)
    }

    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn is_tracking_touch(&self) -> bool {
        self.controller.is_tracking()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Touch callbacks ===

    pub fn touches_began(&mut self, location: Vec2) {
        if self.controller.touch_began(&self.world, location) {
            self.events.push(GameEvent::TouchBeganOnPaddle);
        }
    }

    pub fn touches_moved(&mut self, location: Vec2, previous: Vec2) {
        self.controller.touch_moved(
            &mut self.world,
            self.paddle_id,
            self.settings.arena_width,
            location,
            previous,
        );
    }

    pub fn touches_ended(&mut self) {
        self.controller.touch_ended();
    }

    pub fn touches_cancelled(&mut self) {
        self.controller.touch_ended();
    }

    // === Contacts ===

    /// Step the world once and return the contacts that began
    pub fn simulate(&mut self, dt: f32) -> Vec<Contact> {
        self.time_ticks += 1;
        self.world.step(dt)
    }

    /// React to a pair of bodies that just began touching
    pub fn did_begin(&mut self, contact: &Contact) {
        match resolve(contact) {
            Some(ContactEffect::BallReachedBottom) => {
                log::info!("Hit bottom at x={:.1}", contact.point.x);
                self.events.push(GameEvent::BallReachedBottom);
            }
            Some(ContactEffect::BreakBlock(id)) => {
                log::info!("Hit block {id}, breaking it");
                if let Err(e) = self.break_block(id) {
                    // Two contacts with one block in the same step
                    log::debug!("Block already gone: {e}");
                }
                // TODO: detect the cleared board once a win state exists
            }
            None => {}
        }
    }

    /// Spray particles at a block and remove it from the world
    pub fn break_block(&mut self, id: NodeId) -> Result<()> {
        let node = self.remove_block(id)?;
        self.spawn_burst(node.position);
        self.events.push(GameEvent::BlockBroken {
            node: id,
            position: node.position,
        });
        Ok(())
    }

    fn remove_block(&mut self, id: NodeId) -> Result<Node> {
        match self.world.node(id) {
            Some(node) if node.name == BLOCK_NAME => self.world.remove_from_parent(id),
            Some(_) => Err(SceneError::NotABlock(id)),
            None => Err(SceneError::UnknownNode(id)),
        }
    }

    fn spawn_burst(&mut self, pos: Vec2) {
        if !self.settings.particles {
            return;
        }
        let room = self.settings.max_particles.saturating_sub(self.particles.len());
        for _ in 0..BREAK_PARTICLE_COUNT.min(room) {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(60.0..220.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                life: 1.0,
                size: self.rng.random_range(2.0..5.0),
            });
        }
    }

    /// Age and move burst particles
    pub fn update_particles(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel *= 0.98;
            particle.life -= dt / BREAK_PARTICLE_LIFE;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

/// Build the arena: paddle, ball, floor sensor, border and block row
///
/// Returns the paddle and ball ids.
fn did_move(world: &mut World, settings: &Settings) -> Result<(NodeId, NodeId)> {
    let size = settings.arena_size();
    world.gravity = Vec2::ZERO;

    // Paddle, left of centre by half its width
    let paddle_x = clamp_paddle_x(
        size.x / 2.0 - settings.paddle_width / 2.0,
        settings.paddle_width / 2.0,
        size.x,
    );
    let mut paddle_body =
        PhysicsBody::rectangle(Vec2::new(settings.paddle_width, settings.paddle_height));
    paddle_body.dynamic = false;
    paddle_body.friction = 0.0;
    paddle_body.restitution = 1.0;
    paddle_body.category = Category::PADDLE;
    let paddle_id = world.add_child(
        Node::new(PADDLE_NAME)
            .with_position(Vec2::new(paddle_x, settings.paddle_y))
            .with_z(3.0)
            .with_body(paddle_body),
    );

    // Ball
    let mut ball_body = PhysicsBody::circle(settings.ball_radius);
    ball_body.affected_by_gravity = false;
    ball_body.allows_rotation = false;
    ball_body.restitution = 1.0;
    ball_body.friction = 0.0;
    ball_body.linear_damping = 0.0;
    ball_body.angular_damping = 0.0;
    ball_body.mass = settings.ball_mass;
    ball_body.category = Category::BALL;
    ball_body.contact_test = Category::FLOOR | Category::BLOCK;
    let ball_id = world.add_child(
        Node::new(BALL_NAME)
            .with_position(size / 2.0)
            .with_z(2.0)
            .with_body(ball_body),
    );
    world.apply_impulse(ball_id, settings.launch_impulse())?;

    // Bottom of the screen
    let mut floor_body = PhysicsBody::edge_loop(Rect::new(0.0, 0.0, size.x, FLOOR_HEIGHT));
    floor_body.category = Category::FLOOR;
    world.add_child(Node::new(FLOOR_NAME).with_body(floor_body));

    // Barrier around the screen
    let mut border_body = PhysicsBody::edge_loop(Rect::new(0.0, 0.0, size.x, size.y));
    border_body.friction = 0.0;
    border_body.category = Category::BORDER;
    world.add_child(Node::new(BORDER_NAME).with_body(border_body));

    // Block row, centred horizontally
    let block_size = Vec2::new(settings.block_width, settings.block_height);
    let x_offset = (size.x - settings.block_row_width()) / 2.0;
    let y = size.y * settings.block_row_fraction;
    for i in 0..BLOCK_COUNT {
        let mut body = PhysicsBody::rectangle(block_size);
        body.dynamic = false;
        body.allows_rotation = false;
        body.friction = 0.0;
        body.affected_by_gravity = false;
        body.category = Category::BLOCK;
        world.add_child(
            Node::new(BLOCK_NAME)
                .with_position(Vec2::new(
                    x_offset + (i as f32 + 0.5) * settings.block_width,
                    y,
                ))
                .with_z(2.0)
                .with_body(body),
        );
    }

    log::info!(
        "Scene ready: {}x{} arena, {} blocks",
        size.x,
        size.y,
        BLOCK_COUNT
    );
    Ok((paddle_id, ball_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::contact::ContactBody;

    fn scene() -> GameScene {
        GameScene::new(Settings::default()).unwrap()
    }

    fn ball_contact(scene: &GameScene, other: NodeId, category: Category) -> Contact {
        Contact {
            body_a: ContactBody {
                node: other,
                category,
            },
            body_b: ContactBody {
                node: scene.ball_id(),
                category: Category::BALL,
            },
            point: Vec2::ZERO,
            normal: Vec2::Y,
        }
    }

    #[test]
    fn test_initial_layout() {
        let scene = scene();
        assert_eq!(scene.block_count(), 6);
        assert_eq!(scene.world().nodes_named(PADDLE_NAME).count(), 1);
        assert_eq!(scene.world().nodes_named(BALL_NAME).count(), 1);
        assert_eq!(scene.paddle().position, Vec2::new(275.0, 50.0));
        assert_eq!(scene.ball().position, Vec2::new(375.0, 667.0));
    }

    #[test]
    fn test_blocks_contiguous_and_centered() {
        let scene = scene();
        let frames: Vec<Rect> = scene.blocks().map(|(_, n)| n.frame().unwrap()).collect();

        for pair in frames.windows(2) {
            assert!((pair[0].max().x - pair[1].min().x).abs() < 0.001);
            assert_eq!(pair[0].origin.y, pair[1].origin.y);
        }
        let left = frames.first().unwrap().min().x;
        let right = frames.last().unwrap().max().x;
        assert!((left - (750.0 - right)).abs() < 0.001);
        assert!((frames[0].center().y - 1334.0 * 0.8).abs() < 0.001);
    }

    #[test]
    fn test_ball_launched_by_impulse() {
        let scene = scene();
        let body = scene.ball().body.as_ref().unwrap();
        assert!((body.velocity - Vec2::new(400.0, -400.0)).length() < 0.01);
        assert_eq!(body.contact_test, Category::FLOOR | Category::BLOCK);
    }

    #[test]
    fn test_ball_block_contact_removes_block() {
        let mut scene = scene();
        let (block, _) = scene.blocks().next().unwrap();
        scene.did_begin(&ball_contact(&scene, block, Category::BLOCK));

        assert_eq!(scene.block_count(), 5);
        assert!(!scene.world().contains(block));
        let events = scene.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::BlockBroken { node, .. }] if *node == block));
        assert!(!scene.particles().is_empty());
    }

    #[test]
    fn test_repeated_contact_with_same_block() {
        let mut scene = scene();
        let (block, _) = scene.blocks().next().unwrap();
        let contact = ball_contact(&scene, block, Category::BLOCK);
        scene.did_begin(&contact);
        scene.did_begin(&contact);
        assert_eq!(scene.block_count(), 5);
        assert_eq!(scene.drain_events().len(), 1);
    }

    #[test]
    fn test_n_distinct_contacts_remove_n_blocks() {
        for n in 0..=6 {
            let mut scene = scene();
            let ids: Vec<NodeId> = scene.blocks().map(|(id, _)| id).take(n).collect();
            for id in &ids {
                scene.did_begin(&ball_contact(&scene, *id, Category::BLOCK));
            }
            assert_eq!(scene.block_count(), 6 - n);
            assert!(ids.iter().all(|id| !scene.world().contains(*id)));
        }
    }

    #[test]
    fn test_floor_contact_records_event() {
        let mut scene = scene();
        let floor = scene.world().child_node_with_name(FLOOR_NAME).unwrap();
        scene.did_begin(&ball_contact(&scene, floor, Category::FLOOR));
        assert_eq!(scene.drain_events(), vec![GameEvent::BallReachedBottom]);
        assert_eq!(scene.block_count(), 6);
    }

    #[test]
    fn test_break_block_refuses_paddle() {
        let mut scene = scene();
        let paddle = scene.paddle_id();
        assert!(matches!(scene.break_block(paddle), Err(SceneError::NotABlock(_))));
        assert!(scene.world().contains(paddle));
    }

    #[test]
    fn test_touch_began_on_paddle_emits_event() {
        let mut scene = scene();
        scene.touches_began(Vec2::new(600.0, 1000.0));
        assert!(scene.drain_events().is_empty());

        scene.touches_began(Vec2::new(275.0, 50.0));
        assert!(scene.is_tracking_touch());
        assert_eq!(scene.drain_events(), vec![GameEvent::TouchBeganOnPaddle]);

        scene.touches_cancelled();
        assert!(!scene.is_tracking_touch());
    }

    #[test]
    fn test_particles_expire() {
        let mut scene = scene();
        let (block, _) = scene.blocks().next().unwrap();
        scene.break_block(block).unwrap();
        assert_eq!(scene.particles().len(), BREAK_PARTICLE_COUNT);

        for _ in 0..130 {
            scene.update_particles(1.0 / 120.0);
        }
        assert!(scene.particles().is_empty());
    }

    #[test]
    fn test_particles_can_be_disabled() {
        let mut scene = GameScene::new(Settings {
            particles: false,
            ..Default::default()
        })
        .unwrap();
        let (block, _) = scene.blocks().next().unwrap();
        scene.break_block(block).unwrap();
        assert!(scene.particles().is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = GameScene::new(Settings {
            arena_width: 100.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(SceneError::InvalidSettings(_))));
    }
}
