// ECS components for decorative effects
// Flickering lights and drifting dust. None of these touch the character or
// collision state; they are pure functions of elapsed time and a seed.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Position of an entity in 3D space
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position }
    }
}

/// RGB color for rendering
#[derive(Component, Debug, Clone, Copy)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn from_array([r, g, b]: [f32; 3]) -> Self {
        Self { r, g, b }
    }

    pub fn scaled(&self, k: f32) -> [f32; 3] {
        [self.r * k, self.g * k, self.b * k]
    }
}

/// Stable per-entity seed. Drives every time-based effect on the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct EffectSeed(pub u32);

/// Light above a zone marker whose brightness wavers around `base`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Flicker {
    pub base: f32,
}

/// Dust mote rising slowly from `origin` and wrapping at `ceiling`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Drift {
    pub origin: Vec3,
    pub sway: f32,
    pub ceiling: f32,
}

/// Current brightness, written by the flicker system and read by the renderer.
#[derive(Component, Debug, Clone, Copy)]
pub struct Glow {
    pub intensity: f32,
}

/// Elapsed seconds since the engine started.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct EffectClock {
    pub elapsed: f32,
}
