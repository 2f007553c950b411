// Dead-reckoning movement: held actions become heading and speed each tick.
//
// There is no mass or force model. Heading turns at a fixed rate, speed is
// pushed by acceleration and decays geometrically through friction. Results are
// deterministic for a given input history but assume a steady tick interval.

use glam::Vec2;

use super::config::EngineConfig;
use super::input::MovementIntent;

/// The walking character. Owned by the engine, mutated only by the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Character {
    /// Ground-plane position. `y` holds world Z.
    pub position: Vec2,
    /// Radians. Heading 0 faces -Z.
    pub heading: f32,
    /// Signed forward speed in world units per tick.
    pub speed: f32,
    /// Walk cycle phase, advanced by distance covered.
    pub phase: f32,
}

impl Character {
    pub fn spawn(position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            speed: 0.0,
            phase: 0.0,
        }
    }

    /// Unit direction the character faces on the ground plane.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        forward_vector(self.heading)
    }

    /// Vertical offset of the walk bob.
    pub fn bob(&self, height: f32) -> f32 {
        self.phase.sin().abs() * height
    }
}

#[inline]
pub fn forward_vector(heading: f32) -> Vec2 {
    Vec2::new(-heading.sin(), -heading.cos())
}

/// Apply one tick of input to heading and speed and return the candidate
/// position. The caller commits the position only after collision resolution.
pub fn integrate(character: &mut Character, intent: MovementIntent, config: &EngineConfig) -> Vec2 {
    // Turning works even at a standstill.
    if intent.turn_left {
        character.heading += config.turn_rate;
    }
    if intent.turn_right {
        character.heading -= config.turn_rate;
    }

    let mut speed = character.speed;
    if intent.forward {
        speed += config.acceleration;
    }
    if intent.backward {
        speed -= config.acceleration * config.reverse_factor;
    }

    speed *= config.friction;
    speed = speed.clamp(-config.max_reverse_speed(), config.max_speed);
    if speed.abs() < config.rest_epsilon {
        speed = 0.0;
    }
    character.speed = speed;

    character.position + character.forward() * speed
}

/// Advance the walk cycle by the distance actually covered this tick.
pub fn advance_phase(character: &mut Character, distance: f32, config: &EngineConfig) {
    character.phase = (character.phase + distance * config.stride_rate) % std::f32::consts::TAU;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const FORWARD: MovementIntent = MovementIntent {
        forward: true,
        ..MovementIntent::IDLE
    };

    #[test]
    fn heading_zero_moves_toward_negative_z() {
        let config = EngineConfig::default();
        let mut c = Character::spawn(Vec2::ZERO, 0.0);
        let candidate = integrate(&mut c, FORWARD, &config);
        assert!(candidate.y < 0.0);
        assert!(candidate.x.abs() < 1e-6);
    }

    #[test]
    fn turning_happens_at_rest() {
        let config = EngineConfig::default();
        let mut c = Character::spawn(Vec2::ZERO, 0.0);
        let intent = MovementIntent {
            turn_left: true,
            ..MovementIntent::IDLE
        };
        let candidate = integrate(&mut c, intent, &config);
        assert_eq!(c.heading, config.turn_rate);
        assert_eq!(c.speed, 0.0);
        assert_eq!(candidate, Vec2::ZERO);
    }

    #[test]
    fn quarter_turn_left_faces_negative_x() {
        assert!((forward_vector(FRAC_PI_2) - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn friction_brings_speed_to_exact_rest() {
        let config = EngineConfig::default();
        let mut c = Character::spawn(Vec2::ZERO, 0.0);
        c.speed = config.max_speed;
        for _ in 0..500 {
            integrate(&mut c, MovementIntent::IDLE, &config);
        }
        assert_eq!(c.speed, 0.0);
    }

    #[test]
    fn reverse_is_capped_at_fraction_of_max() {
        let config = EngineConfig {
            acceleration: 1.0,
            ..EngineConfig::default()
        };
        let mut c = Character::spawn(Vec2::ZERO, 0.0);
        let intent = MovementIntent {
            backward: true,
            ..MovementIntent::IDLE
        };
        integrate(&mut c, intent, &config);
        assert_eq!(c.speed, -config.max_reverse_speed());
    }

    #[test]
    fn phase_stays_within_one_cycle() {
        let config = EngineConfig::default();
        let mut c = Character::spawn(Vec2::ZERO, 0.0);
        for _ in 0..1000 {
            advance_phase(&mut c, 0.16, &config);
        }
        assert!(c.phase >= 0.0 && c.phase < std::f32::consts::TAU);
    }
}
