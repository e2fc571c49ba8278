//! Simulation configuration
//!
//! Fixed at process start. Loaded from JSON by the runner or built from the
//! defaults/presets below, then validated before a `GameState` is created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which wall-collision model the run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Single sphere pushed back along the first violated wall axis
    Classic,
    /// Full 8-corner bounding box clamp
    #[default]
    Arcade,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Arcade => "Arcade",
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "legacy" => Ok(GameMode::Classic),
            "arcade" => Ok(GameMode::Arcade),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// How the fall speed is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VelocityModel {
    /// Quadratic drag, self-limiting at sqrt(g / drag)
    #[default]
    Drag,
    /// Plain gravity with a hard terminal velocity cap
    TerminalCap,
}

/// Relative weights of the platform variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantWeights {
    pub dense: u32,
    pub varying: u32,
    pub holes: u32,
}

impl Default for VariantWeights {
    fn default() -> Self {
        Self {
            dense: 6,
            varying: 3,
            holes: 1,
        }
    }
}

impl VariantWeights {
    /// Sum of all weights, `None` if it does not fit in a `u32`
    pub fn total(&self) -> Option<u32> {
        self.dense
            .checked_add(self.varying)?
            .checked_add(self.holes)
    }
}

/// All tunables for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: GameMode,
    pub velocity_model: VelocityModel,

    // === Shaft ===
    pub wall_side_length: f32,
    pub shaft_depth: f32,
    /// Wall texture repeats every this many units of scroll
    pub wall_texture_period: f32,

    // === Physics ===
    pub gravity: f32,
    pub drag: f32,
    pub terminal_velocity: f32,

    // === Player ===
    pub player_depth: f32,
    pub player_half_extent: f32,
    pub thrust_speed: f32,
    pub turn_rate: f32,

    // === Platforms ===
    pub spawn_depth: f32,
    pub retire_depth: f32,
    pub min_active_platforms: usize,
    pub spacing_scale: f32,
    /// Layer count for dense scatter and holes
    pub platform_layers: u32,
    /// Depth range of the varying-depth scatter
    pub depth_range: f32,
    /// Gaps punched into every holes platform
    pub hole_count: u32,
    /// Fewer holes as difficulty rises: `max(1, ceil((1 - d) * hole_count))`
    pub scale_holes_with_difficulty: bool,
    /// Hole edge length in cells
    pub hole_size: u32,
    pub variant_weights: VariantWeights,

    // === Difficulty ===
    pub start_difficulty: f32,
    pub difficulty_step: f32,
    pub difficulty_ceiling: f32,
    pub difficulty_reset: f32,

    // === Health ===
    pub regen_delay: f32,
    pub regen_rate: f32,
    pub death_display_delay: f32,
    pub death_scale_window: f32,
    pub reset_delay: f32,

    // === Debris ===
    pub debris_lifetime: f32,
    pub debris_gravity: f32,
    pub spin_scale: f32,
    pub scatter_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Arcade,
            velocity_model: VelocityModel::Drag,

            wall_side_length: WALL_SIDE_LENGTH,
            shaft_depth: SHAFT_DEPTH,
            wall_texture_period: 20.0,

            gravity: GRAVITY,
            drag: DRAG,
            terminal_velocity: TERMINAL_VELOCITY,

            player_depth: PLAYER_DEPTH,
            player_half_extent: PLAYER_HALF_EXTENT,
            thrust_speed: THRUST_SPEED,
            turn_rate: TURN_RATE,

            spawn_depth: SPAWN_DEPTH,
            retire_depth: RETIRE_DEPTH,
            min_active_platforms: 3,
            spacing_scale: 60.0,
            platform_layers: 1,
            depth_range: 6.0,
            hole_count: 3,
            scale_holes_with_difficulty: false,
            hole_size: 4,
            variant_weights: VariantWeights::default(),

            start_difficulty: START_DIFFICULTY,
            difficulty_step: DIFFICULTY_STEP,
            difficulty_ceiling: DIFFICULTY_CEILING,
            difficulty_reset: DIFFICULTY_RESET,

            regen_delay: 1.0,
            regen_rate: 0.0005,
            death_display_delay: 1.0,
            death_scale_window: 1.0,
            reset_delay: 3.0,

            debris_lifetime: 3.0,
            debris_gravity: 6.0,
            spin_scale: 2.0,
            scatter_scale: 3.0,
        }
    }
}

impl SimConfig {
    /// Legacy single-platform rules: sphere wall checks and a hard speed cap
    pub fn classic() -> Self {
        Self {
            mode: GameMode::Classic,
            velocity_model: VelocityModel::TerminalCap,
            min_active_platforms: 1,
            variant_weights: VariantWeights {
                dense: 1,
                varying: 0,
                holes: 0,
            },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of grid cells along one horizontal axis
    pub fn grid_cells(&self) -> u32 {
        (self.wall_side_length * 2.0) as u32
    }

    /// Reject configurations that would make the bounds or generators meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = self.wall_side_length;
        if !(l > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "wall_side_length",
                value: l,
            });
        }
        if l.fract() != 0.0 {
            return Err(ConfigError::NonIntegralWallSide(l));
        }

        for (field, value) in [
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("player_half_extent", self.player_half_extent),
            ("wall_texture_period", self.wall_texture_period),
            ("spacing_scale", self.spacing_scale),
            ("debris_lifetime", self.debris_lifetime),
            ("reset_delay", self.reset_delay),
            ("death_scale_window", self.death_scale_window),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.drag < 0.0 {
            return Err(ConfigError::Negative {
                field: "drag",
                value: self.drag,
            });
        }
        if self.velocity_model == VelocityModel::Drag && self.drag == 0.0 {
            return Err(ConfigError::NonPositive {
                field: "drag",
                value: self.drag,
            });
        }
        for (field, value) in [
            ("depth_range", self.depth_range),
            ("spin_scale", self.spin_scale),
            ("scatter_scale", self.scatter_scale),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("start_difficulty", self.start_difficulty),
            ("difficulty_step", self.difficulty_step),
            ("difficulty_ceiling", self.difficulty_ceiling),
            ("difficulty_reset", self.difficulty_reset),
            ("regen_rate", self.regen_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }
        if self.difficulty_reset >= self.difficulty_ceiling {
            return Err(ConfigError::DifficultyCycle {
                reset: self.difficulty_reset,
                ceiling: self.difficulty_ceiling,
            });
        }

        // The rotated player box must always fit between the walls
        let player_reach = self.player_half_extent * std::f32::consts::SQRT_2;
        if player_reach >= l {
            return Err(ConfigError::PlayerTooLarge {
                reach: player_reach,
                wall_side_length: l,
            });
        }

        let footprint = (self.player_half_extent * 2.0).ceil() as u32;
        if self.hole_size < footprint || self.hole_size > self.grid_cells() {
            return Err(ConfigError::HoleSize {
                hole_size: self.hole_size,
                min: footprint,
                max: self.grid_cells(),
            });
        }

        if self.platform_layers == 0 {
            return Err(ConfigError::NonPositive {
                field: "platform_layers",
                value: 0.0,
            });
        }
        if self.min_active_platforms == 0 {
            return Err(ConfigError::NonPositive {
                field: "min_active_platforms",
                value: 0.0,
            });
        }
        match self.variant_weights.total() {
            None => return Err(ConfigError::WeightOverflow(self.variant_weights)),
            Some(0) => return Err(ConfigError::NoVariants),
            Some(_) => {}
        }
        if self.spawn_depth >= self.retire_depth {
            return Err(ConfigError::SpawnPastRetire {
                spawn_depth: self.spawn_depth,
                retire_depth: self.retire_depth,
            });
        }

        Ok(())
    }
}

/// Configuration rejected at startup
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f32 },
    Negative { field: &'static str, value: f32 },
    NonIntegralWallSide(f32),
    OutOfUnitRange { field: &'static str, value: f32 },
    DifficultyCycle { reset: f32, ceiling: f32 },
    PlayerTooLarge { reach: f32, wall_side_length: f32 },
    HoleSize { hole_size: u32, min: u32, max: u32 },
    NoVariants,
    WeightOverflow(VariantWeights),
    UnknownMode(String),
    SpawnPastRetire { spawn_depth: f32, retire_depth: f32 },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NonIntegralWallSide(l) => {
                write!(f, "wall_side_length must be a whole number, got {l}")
            }
            Self::OutOfUnitRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            Self::DifficultyCycle { reset, ceiling } => write!(
                f,
                "difficulty_reset ({reset}) must be below difficulty_ceiling ({ceiling})"
            ),
            Self::PlayerTooLarge {
                reach,
                wall_side_length,
            } => write!(
                f,
                "player reach {reach} does not fit inside wall half-width {wall_side_length}"
            ),
            Self::HoleSize {
                hole_size,
                min,
                max,
            } => write!(f, "hole_size {hole_size} must be within {min}..={max} cells"),
            Self::NoVariants => write!(f, "at least one platform variant weight must be non-zero"),
            Self::WeightOverflow(w) => write!(
                f,
                "variant weights {}/{}/{} overflow when summed",
                w.dense, w.varying, w.holes
            ),
            Self::UnknownMode(name) => {
                write!(f, "unknown game mode {name:?} (expected classic or arcade)")
            }
            Self::SpawnPastRetire {
                spawn_depth,
                retire_depth,
            } => write!(
                f,
                "spawn_depth ({spawn_depth}) must be below retire_depth ({retire_depth})"
            ),
            Self::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
