//! Breakout - A minimal touch-driven brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic scene (bodies, contacts, paddle control)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Data-driven scene layout

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SceneError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default scene size in points
    pub const ARENA_WIDTH: f32 = 750.0;
    pub const ARENA_HEIGHT: f32 = 1334.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 200.0;
    pub const PADDLE_HEIGHT: f32 = 50.0;
    pub const PADDLE_Y: f32 = 50.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_MASS: f32 = 0.025;
    /// One-shot launch impulse (N·s), applied when the scene is set up
    pub const LAUNCH_IMPULSE: [f32; 2] = [10.0, -10.0];

    /// Block row defaults
    pub const BLOCK_COUNT: usize = 6;
    pub const BLOCK_WIDTH: f32 = 50.0;
    pub const BLOCK_HEIGHT: f32 = 20.0;
    /// Block row height as a fraction of the arena height
    pub const BLOCK_ROW_FRACTION: f32 = 0.8;

    /// Height of the floor sensor strip
    pub const FLOOR_HEIGHT: f32 = 1.0;

    /// Lifetime of a block-break particle burst (seconds)
    pub const BREAK_PARTICLE_LIFE: f32 = 1.0;
    pub const BREAK_PARTICLE_COUNT: usize = 24;
}
