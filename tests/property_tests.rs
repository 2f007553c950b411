//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Collision: the character never ends a tick inside a collider
//! - Movement: speed stays within [-max * reverse_fraction, max]
//! - Sliding: a one-axis block keeps the other axis of the candidate exactly
//! - Zones: holding still fires one enter, nearest zone flips at the bisector

use glam::Vec2;
use proptest::prelude::*;

use gallery_walk::engine::collision::{Collider, CollisionWorld, MoveOutcome};
use gallery_walk::engine::level::{Rect, Zone, ZoneContent};
use gallery_walk::engine::zones::{ZoneDetector, nearest_zone};
use gallery_walk::engine::{Action, Engine, EngineConfig, LevelDescriptor};

const DT: f32 = 1.0 / 60.0;

fn zone(id: &str, position: Vec2, radius: f32) -> Zone {
    Zone {
        id: id.to_string(),
        label: id.to_string(),
        subtitle: String::new(),
        position,
        radius,
        color: [1.0, 1.0, 1.0],
        content: ZoneContent {
            title: id.to_string(),
            subtitle: String::new(),
            body: String::new(),
        },
    }
}

/// Apply a bitmask of held actions for one tick.
fn hold(engine: &mut Engine, mask: u8) {
    for (bit, action) in Action::ALL.iter().enumerate() {
        engine.set_action(*action, mask & (1 << bit) != 0);
    }
}

// ============================================================
// Engine-level properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_character_never_enters_a_collider(
        inputs in prop::collection::vec((0u8..64, 1usize..20), 1..80),
    ) {
        let mut engine = Engine::new(EngineConfig::default(), LevelDescriptor::showcase()).unwrap();
        engine.start();

        for (mask, repeat) in inputs {
            hold(&mut engine, mask);
            for _ in 0..repeat {
                engine.tick(DT);
                let p = engine.position();
                prop_assert!(!engine.collision().is_blocked(p), "character inside geometry at {p:?}");
            }
        }
    }

    #[test]
    fn prop_speed_stays_within_bounds(
        inputs in prop::collection::vec((0u8..16, 1usize..40), 1..60),
        acceleration in 0.001f32..0.2,
        friction in 0.5f32..0.99,
    ) {
        let config = EngineConfig { acceleration, friction, ..EngineConfig::default() };
        let (max, max_rev) = (config.max_speed, config.max_reverse_speed());
        let mut engine = Engine::new(config, LevelDescriptor::showcase()).unwrap();
        engine.start();

        for (mask, repeat) in inputs {
            hold(&mut engine, mask);
            for _ in 0..repeat {
                engine.tick(DT);
                let speed = engine.character().speed;
                prop_assert!(speed <= max, "speed {speed} above {max}");
                prop_assert!(speed >= -max_rev, "speed {speed} below {}", -max_rev);
            }
        }
    }
}

// ============================================================
// Collision properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_slide_keeps_unblocked_axis_exactly(
        gap in 0.001f32..0.5,
        z0 in -50.0f32..50.0,
        push in 0.01f32..0.9,
        dz in prop_oneof![-0.5f32..-0.001, 0.001f32..0.5],
    ) {
        let world = CollisionWorld::new(
            vec![Collider::Aabb { min: Vec2::new(10.0, -100.0), max: Vec2::new(12.0, 100.0) }],
            Rect::new(Vec2::splat(-200.0), Vec2::splat(200.0)),
            0.5,
        );
        let current = Vec2::new(10.0 - gap, z0);
        let candidate = Vec2::new(10.0 + push, z0 + dz);

        let r = world.resolve(current, candidate, 0.1);
        prop_assert_eq!(r.outcome, MoveOutcome::SlideZ);
        prop_assert_eq!(r.position.x, current.x);
        prop_assert_eq!(r.position.y, candidate.y);
        prop_assert!(!world.is_blocked(r.position));
    }
}

// ============================================================
// Zone properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_holding_still_fires_one_enter(
        angle in 0.0f32..std::f32::consts::TAU,
        frac in 0.0f32..0.95,
        ticks in 1usize..200,
    ) {
        let zones = vec![zone("a", Vec2::new(3.0, -2.0), 2.0)];
        let p = zones[0].position + Vec2::from_angle(angle) * (frac * 2.0);
        let mut detector = ZoneDetector::new();

        let fired = (0..ticks).filter(|_| detector.update(&zones, p).is_some()).count();
        prop_assert_eq!(fired, 1);
        prop_assert_eq!(detector.active(), Some(0));
    }

    #[test]
    fn prop_nearest_zone_switches_at_bisector(
        half_gap in 0.5f32..5.0,
        x in -4.0f32..4.0,
        z in -4.0f32..4.0,
    ) {
        // Radii large enough that both zones always contain the point.
        let zones = vec![
            zone("west", Vec2::new(-half_gap, 0.0), 50.0),
            zone("east", Vec2::new(half_gap, 0.0), 50.0),
        ];
        prop_assume!(x.abs() > 1e-4);

        let expected = if x < 0.0 { 0 } else { 1 };
        prop_assert_eq!(nearest_zone(&zones, Vec2::new(x, z)), Some(expected));
    }
}
