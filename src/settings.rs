//! Scene settings
//!
//! Layout and tuning for the arena. Persisted as JSON (LocalStorage on web,
//! an optional file on native).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SceneError};

/// Scene layout and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Scene width in points
    pub arena_width: f32,
    /// Scene height in points
    pub arena_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Fixed y of the paddle centre
    pub paddle_y: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    /// Impulse applied once when the ball is created
    pub launch_impulse: [f32; 2],

    // === Blocks ===
    // The row always holds `BLOCK_COUNT` blocks; only their size and
    // height are tunable.
    pub block_width: f32,
    pub block_height: f32,
    /// Block row height as a fraction of the arena height
    pub block_row_fraction: f32,

    // === Effects ===
    /// Particle bursts when a block breaks
    pub particles: bool,
    /// Upper bound on live particles
    pub max_particles: usize,
    /// Seed for particle spray
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_y: PADDLE_Y,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            launch_impulse: LAUNCH_IMPULSE,

            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_row_fraction: BLOCK_ROW_FRACTION,

            particles: true,
            max_particles: 256,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Arena size as a vector
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    pub fn launch_impulse(&self) -> Vec2 {
        Vec2::from_array(self.launch_impulse)
    }

    /// Total width of the block row
    pub fn block_row_width(&self) -> f32 {
        self.block_width * BLOCK_COUNT as f32
    }

    /// Check that the layout fits inside the arena
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("ball_mass", self.ball_mass),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.paddle_width > self.arena_width {
            return Err(SceneError::InvalidSettings(format!(
                "paddle ({}) is wider than the arena ({})",
                self.paddle_width, self.arena_width
            )));
        }
        if self.block_row_width() > self.arena_width {
            return Err(SceneError::InvalidSettings(format!(
                "block row ({}) is wider than the arena ({})",
                self.block_row_width(),
                self.arena_width
            )));
        }
        if !(0.0..=1.0).contains(&self.block_row_fraction) {
            return Err(SceneError::InvalidSettings(format!(
                "block_row_fraction must be within 0..=1, got {}",
                self.block_row_fraction
            )));
        }
        if self.ball_radius * 2.0 > self.arena_width.min(self.arena_height) {
            return Err(SceneError::InvalidSettings(
                "ball does not fit in the arena".to_string(),
            ));
        }
        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "breakout_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
