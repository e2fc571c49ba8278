//! Shaft Dropper - a falling-obstacle arcade game core
//!
//! Core modules:
//! - `sim`: Simulation (physics, platform generation, collisions, health, debris)
//! - `scene`: Renderer-facing output (draw instances, materials, camera)

pub mod scene;
pub mod sim;

pub use sim::{ConfigError, FrameInput, FrameOutput, GameState, SimConfig, tick};

use glam::{Vec2, Vec3};

/// Game configuration defaults
pub mod consts {
    /// Half-width of the shaft; walls sit at ±this value on x and y.
    /// Must be a whole number so the platform grid lines up with the walls.
    pub const WALL_SIDE_LENGTH: f32 = 10.0;
    /// Visual depth of the wall slabs
    pub const SHAFT_DEPTH: f32 = 1000.0;

    /// Gravity (units/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Quadratic drag coefficient
    pub const DRAG: f32 = 0.001;
    /// Legacy speed cap, also the damage normalization speed
    pub const TERMINAL_VELOCITY: f32 = 100.0;

    /// Fixed depth of the player along the shaft axis
    pub const PLAYER_DEPTH: f32 = -30.0;
    /// Half-extent of the player's cube
    pub const PLAYER_HALF_EXTENT: f32 = 1.0;
    /// Half-extent of a platform cell
    pub const CELL_HALF_EXTENT: f32 = 0.5;
    /// Horizontal speed at full thrust (units/s)
    pub const THRUST_SPEED: f32 = 5.0;
    /// Rotation rate at full rotation input (radians/s)
    pub const TURN_RATE: f32 = 2.0;

    /// Depth where new platforms appear
    pub const SPAWN_DEPTH: f32 = -100.0;
    /// Platforms scrolled past this depth are retired
    pub const RETIRE_DEPTH: f32 = 10.0;

    pub const START_DIFFICULTY: f32 = 0.1;
    pub const DIFFICULTY_STEP: f32 = 0.0025;
    pub const DIFFICULTY_CEILING: f32 = 0.8;
    pub const DIFFICULTY_RESET: f32 = 0.5;

    pub const MAX_HEALTH: f32 = 100.0;

    /// Camera blend factor per frame
    pub const CAMERA_BLEND: f32 = 0.1;
}

/// Rotate a 2D vector about the Z axis
#[inline]
pub fn rotate_z(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Linear blend from `current` toward `target`
#[inline]
pub fn blend(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor
}

/// Convert HSV (all components in [0, 1]) to linear RGB
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (i as u32) % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
