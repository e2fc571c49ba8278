//! Smoothed follow camera
//!
//! The eye and target chase their desired positions with a fixed blend per
//! frame instead of snapping, which keeps view toggles and wall bumps soft.

use glam::{Mat4, Vec3};

use crate::blend;
use crate::consts::CAMERA_BLEND;
use crate::sim::state::{Player, ViewMode};

/// Distance of the third-person eye above the player
const THIRD_PERSON_HEIGHT: f32 = 25.0;
const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 1000.0;

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    /// Start already settled on the player's desired view
    pub fn new(player: &Player) -> Self {
        let (eye, target, up) = Self::desired(player);
        Self { eye, target, up }
    }

    /// Where the camera wants to be for the player's view mode
    ///
    /// The shaft runs along -z; third person looks down at the player from
    /// above, first person looks down the shaft from the player's center.
    pub fn desired(player: &Player) -> (Vec3, Vec3, Vec3) {
        let center = player.center();
        // "Up" on screen follows the player's facing
        let up = Vec3::new(-player.angle.sin(), player.angle.cos(), 0.0);
        match player.view {
            ViewMode::ThirdPerson => (center + Vec3::Z * THIRD_PERSON_HEIGHT, center, up),
            ViewMode::FirstPerson => (center, center - Vec3::Z, up),
        }
    }

    /// Blend one frame toward the desired view
    pub fn follow(&mut self, player: &Player) {
        let (eye, target, up) = Self::desired(player);
        self.eye = blend(self.eye, eye, CAMERA_BLEND);
        self.target = blend(self.target, target, CAMERA_BLEND);
        self.up = blend(self.up, up, CAMERA_BLEND).normalize_or(Vec3::Y);
    }

    /// View matrix
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(FOV_Y, aspect.max(0.01), Z_NEAR, Z_FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use glam::Vec2;

    #[test]
    fn test_camera_blends_a_tenth() {
        let config = SimConfig::default();
        let mut player = Player::new(&config);
        let mut camera = Camera::new(&player);
        let start_eye = camera.eye;

        player.pos = Vec2::new(5.0, 0.0);
        camera.follow(&player);
        let (desired_eye, _, _) = Camera::desired(&player);
        let moved = camera.eye - start_eye;
        assert!((moved - (desired_eye - start_eye) * 0.1).length() < 1e-5);
    }

    #[test]
    fn test_camera_converges() {
        let config = SimConfig::default();
        let mut player = Player::new(&config);
        let mut camera = Camera::new(&player);
        player.pos = Vec2::new(-3.0, 4.0);
        player.view = ViewMode::FirstPerson;
        for _ in 0..200 {
            camera.follow(&player);
        }
        assert!((camera.eye - player.center()).length() < 1e-3);
    }

    #[test]
    fn test_view_looks_at_target() {
        let config = SimConfig::default();
        let player = Player::new(&config);
        let camera = Camera::new(&player);
        let in_view = camera.view().transform_point3(camera.target);
        // Right-handed view space looks down -z
        assert!(in_view.z < 0.0);
        assert!(in_view.x.abs() < 1e-4 && in_view.y.abs() < 1e-4);
    }
}
