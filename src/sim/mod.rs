//! Deterministic scene simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by node ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod category;
pub mod collision;
pub mod contact;
pub mod paddle;
pub mod scene;
pub mod tick;
pub mod world;

pub use body::{Node, NodeId, PhysicsBody, Rect, Shape};
pub use category::Category;
pub use collision::{CollisionResult, bounce_velocity, reflect_velocity};
pub use contact::{Contact, ContactBody, ContactEffect, resolve};
pub use paddle::{PADDLE_NAME, PaddleController, clamp_paddle_x};
pub use scene::{BALL_NAME, BLOCK_NAME, BORDER_NAME, FLOOR_NAME, GameEvent, GameScene, Particle};
pub use tick::{TickInput, TouchInput, tick};
pub use world::World;
