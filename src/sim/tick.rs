//! Fixed timestep simulation tick
//!
//! Applies queued touches, steps the world and routes contacts through the
//! scene.

use glam::Vec2;

use super::scene::GameScene;

/// A touch callback in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchInput {
    Began { location: Vec2 },
    Moved { location: Vec2, previous: Vec2 },
    Ended,
    Cancelled,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Touches received since the last tick, oldest first
    pub touches: Vec<TouchInput>,
}

impl TickInput {
    pub fn push(&mut self, touch: TouchInput) {
        self.touches.push(touch);
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}

/// Advance the scene by one fixed timestep
pub fn tick(scene: &mut GameScene, input: &TickInput, dt: f32) {
    for touch in &input.touches {
        match *touch {
            TouchInput::Began { location } => scene.touches_began(location),
            TouchInput::Moved { location, previous } => scene.touches_moved(location, previous),
            TouchInput::Ended => scene.touches_ended(),
            TouchInput::Cancelled => scene.touches_cancelled(),
        }
    }

    let contacts = scene.simulate(dt);
    for contact in &contacts {
        scene.did_begin(contact);
    }

    scene.update_particles(dt);
}
