//! Touch-driven paddle control
//!
//! A drag only moves the paddle if the touch began on it. Movement is a
//! direct mapping of the horizontal touch delta, clamped so the paddle never
//! leaves the arena.

use glam::Vec2;

use super::body::NodeId;
use super::world::World;

/// Name the paddle node is registered under
pub const PADDLE_NAME: &str = "paddle";

/// Tracks whether the active touch is dragging the paddle
#[derive(Debug, Clone, Default)]
pub struct PaddleController {
    finger_on_paddle: bool,
}

impl PaddleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.finger_on_paddle
    }

    /// Start tracking if the touch landed on the paddle
    ///
    /// Returns true when tracking started. A touch elsewhere leaves the
    /// current state alone.
    pub fn touch_began(&mut self, world: &World, location: Vec2) -> bool {
        let on_paddle = world
            .body_at(location)
            .and_then(|id| world.node(id))
            .is_some_and(|node| node.name == PADDLE_NAME);

        if on_paddle {
            log::info!("Began touch on paddle at ({:.1}, {:.1})", location.x, location.y);
            self.finger_on_paddle = true;
        }
        on_paddle
    }

    /// Move the paddle by the horizontal delta of a dragging touch
    ///
    /// Returns the paddle's new x, or None when not tracking.
    pub fn touch_moved(
        &mut self,
        world: &mut World,
        paddle: NodeId,
        arena_width: f32,
        location: Vec2,
        previous: Vec2,
    ) -> Option<f32> {
        if !self.finger_on_paddle {
            return None;
        }

        let node = world.node_mut(paddle)?;
        let half_width = node.frame()?.size.x / 2.0;
        let x = clamp_paddle_x(node.position.x + (location.x - previous.x), half_width, arena_width);
        node.position.x = x;
        Some(x)
    }

    /// Touch lifted or cancelled
    pub fn touch_ended(&mut self) {
        self.finger_on_paddle = false;
    }
}

/// Clamp a paddle centre so its frame stays within `[0, arena_width]`
#[inline]
pub fn clamp_paddle_x(x: f32, half_width: f32, arena_width: f32) -> f32 {
    x.max(half_width).min(arena_width - half_width)
}
