// Third-person follow camera
//
// Camera model:
//   - A fixed offset (behind and above) rotated by the character's heading
//   - A look-at point slightly ahead of the character
//   - Eye and look-at both ease toward their targets each tick, so turns lag
//     instead of snapping
//
// The pose is derived data. It is recomputed from the character every tick
// and never feeds back into movement.

use glam::{Mat4, Quat, Vec3};

use super::config::EngineConfig;
use super::movement::Character;

/// Smoothed camera state published to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
}

pub struct FollowCamera {
    pose: CameraPose,

    /// Offset from the character at heading 0 (+Z is behind).
    pub offset: Vec3,
    pub look_ahead: f32,
    pub look_height: f32,

    /// Fraction of the remaining distance covered per tick.
    pub smoothing: f32,

    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl FollowCamera {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            pose: CameraPose {
                eye: config.camera_offset,
                look_at: Vec3::ZERO,
            },
            offset: config.camera_offset,
            look_ahead: config.look_ahead,
            look_height: config.look_height,
            smoothing: config.camera_smoothing,
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
        }
    }

    /// Where the camera wants to be for this character pose.
    pub fn target(&self, character: &Character) -> CameraPose {
        let base = Vec3::new(character.position.x, 0.0, character.position.y);
        let eye = base + Quat::from_rotation_y(character.heading) * self.offset;

        let ahead = character.forward() * self.look_ahead;
        let look_at = base + Vec3::new(ahead.x, self.look_height, ahead.y);

        CameraPose { eye, look_at }
    }

    /// Ease toward the target. Call once per Explore tick.
    pub fn update(&mut self, character: &Character) {
        let target = self.target(character);
        self.pose.eye += (target.eye - self.pose.eye) * self.smoothing;
        self.pose.look_at += (target.look_at - self.pose.look_at) * self.smoothing;
    }

    /// Jump straight to the target (engine start).
    pub fn snap_to(&mut self, character: &Character) {
        self.pose = self.target(character);
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// View matrix: looks from the camera eye toward the look-at point.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.eye, self.pose.look_at, Vec3::Y)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn target_sits_behind_the_heading() {
        let config = EngineConfig::default();
        let camera = FollowCamera::new(&config);
        let c = Character::spawn(Vec2::new(2.0, 3.0), 0.0);
        let t = camera.target(&c);
        assert!((t.eye - Vec3::new(2.0, config.camera_offset.y, 3.0 + config.camera_offset.z)).length() < 1e-5);
        assert!(t.look_at.z < 3.0);

        // Facing -X, behind is +X.
        let turned = Character::spawn(Vec2::ZERO, FRAC_PI_2);
        let t = camera.target(&turned);
        assert!((t.eye.x - config.camera_offset.z).abs() < 1e-5);
        assert!(t.eye.z.abs() < 1e-5);
    }

    #[test]
    fn update_moves_a_fraction_of_the_gap() {
        let config = EngineConfig::default();
        let mut camera = FollowCamera::new(&config);
        let c = Character::spawn(Vec2::ZERO, 0.0);
        camera.snap_to(&c);
        let before = camera.pose();

        let moved = Character::spawn(Vec2::new(10.0, 0.0), 0.0);
        camera.update(&moved);
        let after = camera.pose();
        let target = camera.target(&moved);

        let expected = before.eye + (target.eye - before.eye) * config.camera_smoothing;
        assert!((after.eye - expected).length() < 1e-5);
        assert!(after.eye.x < target.eye.x);
    }

    #[test]
    fn converges_without_overshoot() {
        let config = EngineConfig::default();
        let mut camera = FollowCamera::new(&config);
        let c = Character::spawn(Vec2::new(5.0, -5.0), 1.0);
        let target = camera.target(&c);
        let mut last_gap = f32::MAX;
        for _ in 0..400 {
            camera.update(&c);
            let gap = (target.eye - camera.pose().eye).length();
            assert!(gap <= last_gap);
            last_gap = gap;
        }
        assert!(last_gap < 1e-3);
    }
}
