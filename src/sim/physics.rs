//! Fall speed and horizontal motion integration

use glam::Vec2;

use super::config::{SimConfig, VelocityModel};
use super::state::{Player, ViewMode};
use crate::rotate_z;

/// Advance the vertical fall speed by one frame
///
/// Drag model: `v' = v + (g - drag·v²)·dt`, never below zero.
/// Terminal-cap model: `v' = min(v + g·dt, terminal_velocity)`.
pub fn integrate_fall_speed(v: f32, dt: f32, config: &SimConfig) -> f32 {
    match config.velocity_model {
        VelocityModel::Drag => (v + (config.gravity - config.drag * v * v) * dt).max(0.0),
        VelocityModel::TerminalCap => (v + config.gravity * dt).min(config.terminal_velocity),
    }
}

/// Speed where gravity and drag cancel out
pub fn terminal_speed_estimate(config: &SimConfig) -> f32 {
    match config.velocity_model {
        VelocityModel::Drag => (config.gravity / config.drag).sqrt(),
        VelocityModel::TerminalCap => config.terminal_velocity,
    }
}

/// Distance the world scrolls past the player this frame
#[inline]
pub fn scroll_displacement(v: f32, dt: f32) -> f32 {
    v * dt
}

/// Thrust vector in world axes for the player's current view mode
pub fn world_thrust(player: &Player, thrust: Vec2) -> Vec2 {
    match player.view {
        ViewMode::ThirdPerson => rotate_z(thrust, player.angle),
        ViewMode::FirstPerson => thrust,
    }
}

/// Apply rotation and thrust input to the player's horizontal state
///
/// Thrust components are expected in [-1, 1]; the wall clamp runs afterwards.
pub fn integrate_horizontal(
    player: &mut Player,
    thrust: Vec2,
    rotation: f32,
    dt: f32,
    config: &SimConfig,
) {
    player.angle += rotation * config.turn_rate * dt;
    if thrust != Vec2::ZERO {
        player.pos += world_thrust(player, thrust) * config.thrust_speed * dt;
    }
}
