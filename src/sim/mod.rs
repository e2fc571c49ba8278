//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (by entity ID)
//! - No rendering or windowing dependencies; output is plain draw data

pub mod collision;
pub mod config;
pub mod debris;
pub mod health;
pub mod physics;
pub mod platform;
pub mod state;
pub mod tick;

pub use collision::{Walls, bounds_correction, box_corners, cube_cube_collision, extents};
pub use config::{ConfigError, GameMode, SimConfig, VariantWeights, VelocityModel};
pub use health::{HealthEvent, HealthState};
pub use platform::{Platform, PlatformVariant, ShapeCell};
pub use state::{GameState, Player, ViewMode};
pub use tick::{FrameInput, FrameOutput, Hud, tick};
