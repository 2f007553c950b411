// Tuning constants for the exploration engine.
//
// All rates are per tick, not per second. The frame loop assumes a roughly
// constant display refresh (~60 Hz), so movement is dead-reckoned in tick
// units and only cosmetic effects and the modal close delay use elapsed time.

use glam::{Vec2, Vec3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------
    /// Heading change per tick while a turn action is held (radians).
    pub turn_rate: f32,
    /// Speed gained per tick while forward is held.
    pub acceleration: f32,
    /// Backward acceleration is `acceleration * reverse_factor`.
    pub reverse_factor: f32,
    /// Speed multiplier applied every tick. Must be in (0, 1).
    pub friction: f32,
    pub max_speed: f32,
    /// Reverse speed is capped at `max_speed * reverse_fraction`.
    pub reverse_fraction: f32,
    /// Speeds with a smaller magnitude snap to zero.
    pub rest_epsilon: f32,
    /// Speed multiplier applied when a move slides along one axis.
    pub scrape_damping: f32,
    /// Collision radius; every collider is inflated by this at load.
    pub character_radius: f32,
    /// Animation phase advanced per unit of speed.
    pub stride_rate: f32,
    pub bob_height: f32,

    // ------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------
    /// Camera offset at heading 0 (behind is +Z, above is +Y).
    pub camera_offset: Vec3,
    /// Distance ahead of the character the camera looks at.
    pub look_ahead: f32,
    pub look_height: f32,
    /// Fraction of the remaining distance covered each tick. In (0, 1].
    pub camera_smoothing: f32,

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------
    /// Seconds between a close request and the movement pipeline resuming.
    /// Matches the panel's closing animation.
    pub close_delay: f32,

    pub spawn_position: Vec2,
    pub spawn_heading: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_rate: 0.045,
            acceleration: 0.012,
            reverse_factor: 0.7,
            friction: 0.92,
            max_speed: 0.16,
            reverse_fraction: 0.5,
            rest_epsilon: 0.0005,
            scrape_damping: 0.5,
            character_radius: 0.45,
            stride_rate: 2.2,
            bob_height: 0.06,
            camera_offset: Vec3::new(0.0, 3.2, 6.5),
            look_ahead: 2.5,
            look_height: 1.0,
            camera_smoothing: 0.08,
            close_delay: 0.3,
            spawn_position: Vec2::new(0.0, 14.0),
            spawn_heading: 0.0,
        }
    }
}

impl EngineConfig {
    /// Parse a RON tuning file. Missing fields fall back to the defaults.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return invalid("friction", "must be in (0, 1)");
        }
        if !(self.reverse_factor > 0.0 && self.reverse_factor <= 1.0) {
            return invalid("reverse_factor", "must be in (0, 1]");
        }
        if !(self.reverse_fraction > 0.0 && self.reverse_fraction <= 1.0) {
            return invalid("reverse_fraction", "must be in (0, 1]");
        }
        if !(self.max_speed > 0.0) {
            return invalid("max_speed", "must be positive");
        }
        if self.acceleration < 0.0 {
            return invalid("acceleration", "must not be negative");
        }
        if !(self.scrape_damping >= 0.0 && self.scrape_damping <= 1.0) {
            return invalid("scrape_damping", "must be in [0, 1]");
        }
        if self.character_radius < 0.0 {
            return invalid("character_radius", "must not be negative");
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return invalid("camera_smoothing", "must be in (0, 1]");
        }
        if self.close_delay < 0.0 {
            return invalid("close_delay", "must not be negative");
        }
        Ok(())
    }

    /// Highest reachable reverse speed magnitude.
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed * self.reverse_fraction
    }
}
