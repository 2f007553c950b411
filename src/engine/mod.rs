// Engine module - first-person exploration core
// Movement, collision, camera follow and zone interaction for a small walkable
// space, plus the HUD that presents it.

pub mod camera;
pub mod collision;
pub mod components;
pub mod config;
pub mod events;
pub mod frame;
pub mod hud;
pub mod input;
pub mod interaction;
pub mod level;
pub mod movement;
pub mod systems;
pub mod zones;

// Re-export commonly used items
pub use config::{ConfigError, EngineConfig};
pub use events::{EngineEvent, EngineObserver, Telemetry};
pub use frame::{Engine, EngineError, FrameOutput};
pub use input::Action;
pub use interaction::EngineState;
pub use level::{LevelDescriptor, LevelError};
