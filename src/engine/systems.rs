// ECS systems for decorative effects
// Systems read the shared EffectClock and write Transform / Glow. They run
// every tick in both Explore and Modal states.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use super::components::*;
use super::level::LevelDescriptor;

const DUST_PER_ZONE: usize = 24;
const DUST_RISE_SPEED: f32 = 0.12;

// ============================================================================
// PURE EFFECT FUNCTIONS
// ============================================================================

#[inline]
fn seed_phase(seed: u32) -> f32 {
    (seed as f32 / u32::MAX as f32) * TAU
}

/// Brightness multiplier for a flickering light. Stays within [0.75, 1.05].
pub fn flicker_intensity(seed: u32, t: f32) -> f32 {
    let p = seed_phase(seed);
    0.9 + 0.1 * (t * 7.3 + p).sin() + 0.05 * (t * 13.1 + p * 2.0).sin()
}

/// Offset of a dust mote from its origin at time `t`.
pub fn drift_offset(seed: u32, t: f32, sway: f32, ceiling: f32) -> Vec3 {
    let p = seed_phase(seed);
    Vec3::new(
        (t * 0.31 + p).sin() * sway,
        (t * DUST_RISE_SPEED + p).rem_euclid(ceiling),
        (t * 0.23 + p * 1.7).cos() * sway,
    )
}

// ============================================================================
// SYSTEMS
// ============================================================================

pub fn flicker_system(clock: Res<EffectClock>, mut query: Query<(&EffectSeed, &Flicker, &mut Glow)>) {
    for (seed, flicker, mut glow) in query.iter_mut() {
        glow.intensity = flicker.base * flicker_intensity(seed.0, clock.elapsed);
    }
}

pub fn drift_system(clock: Res<EffectClock>, mut query: Query<(&EffectSeed, &Drift, &mut Transform)>) {
    for (seed, drift, mut transform) in query.iter_mut() {
        transform.position =
            drift.origin + drift_offset(seed.0, clock.elapsed, drift.sway, drift.ceiling);
    }
}

// ============================================================================
// EFFECT FIELD
// ============================================================================

/// One decorative instance for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectInstance {
    pub position: Vec3,
    pub size: f32,
    pub color: [f32; 3],
}

/// Owns the ECS world holding every decorative entity.
pub struct EffectField {
    world: World,
    schedule: Schedule,
}

impl EffectField {
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(EffectClock::default());

        // Effects are tiny; keep them on the frame-loop thread.
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((flicker_system, drift_system));

        Self { world, schedule }
    }

    /// Place one light above every zone and a cloud of dust around it.
    /// Placement is seeded, so the same level always decorates the same way.
    pub fn spawn_decorations(&mut self, level: &LevelDescriptor) {
        let mut rng = StdRng::seed_from_u64(level.decoration_seed);

        for zone in &level.zones {
            let center = Vec3::new(zone.position.x, 0.0, zone.position.y);
            let color = Color::from_array(zone.color);

            self.world.spawn((
                Transform::from_position(center + Vec3::Y * 2.4),
                color,
                EffectSeed(rng.r#gen()),
                Flicker { base: 1.0 },
                Glow { intensity: 1.0 },
            ));

            for _ in 0..DUST_PER_ZONE {
                let angle = rng.gen_range(0.0..TAU);
                let dist = rng.gen_range(0.0..zone.radius);
                let origin = center + Vec3::new(angle.cos() * dist, 0.1, angle.sin() * dist);
                self.world.spawn((
                    Transform::from_position(origin),
                    color,
                    EffectSeed(rng.r#gen()),
                    Drift {
                        origin,
                        sway: rng.gen_range(0.05..0.3),
                        ceiling: rng.gen_range(1.5..3.5),
                    },
                ));
            }
        }

        log::debug!("spawned {} decorative entities", self.entity_count());
    }

    /// Run every effect system for the given elapsed time.
    pub fn advance(&mut self, elapsed: f32) {
        self.world.resource_mut::<EffectClock>().elapsed = elapsed;
        self.schedule.run(&mut self.world);
    }

    pub fn entity_count(&mut self) -> usize {
        self.world.query::<&EffectSeed>().iter(&self.world).count()
    }

    /// Snapshot of every decorative entity for this frame.
    pub fn instances(&mut self) -> Vec<EffectInstance> {
        let mut out = Vec::new();

        let mut lights = self.world.query::<(&Transform, &Color, &Glow)>();
        for (transform, color, glow) in lights.iter(&self.world) {
            out.push(EffectInstance {
                position: transform.position,
                size: 0.35,
                color: color.scaled(glow.intensity),
            });
        }

        let mut dust = self.world.query_filtered::<(&Transform, &Color), With<Drift>>();
        for (transform, color) in dust.iter(&self.world) {
            out.push(EffectInstance {
                position: transform.position,
                size: 0.05,
                color: color.scaled(0.6),
            });
        }

        out
    }

    /// Despawn every decorative entity (engine teardown).
    pub fn clear(&mut self) {
        self.world.clear_entities();
    }
}

impl Default for EffectField {
    fn default() -> Self {
        Self::new()
    }
}
