//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`, which the frame controller
//! owns and mutates exclusively.

use glam::{Mat4, Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Walls, box_corners};
use super::config::{ConfigError, SimConfig};
use super::health::HealthState;
use super::platform::Platform;
use crate::consts::MAX_HEALTH;
use crate::scene::{Camera, MaterialPalette};

/// Where the camera sits relative to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    /// Camera inside the player, thrust in world axes
    #[default]
    FirstPerson,
    /// Camera above the player, thrust follows the player's facing
    ThirdPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        }
    }
}

/// The falling player
#[derive(Debug, Clone)]
pub struct Player {
    /// Horizontal position
    pub pos: Vec2,
    /// Fixed position along the shaft axis
    pub depth: f32,
    pub half_extent: f32,
    /// Accumulated rotation about the shaft axis (radians)
    pub angle: f32,
    pub fall_speed: f32,
    pub health: f32,
    pub resting: bool,
    /// Collisions detected but not yet applied
    pub collision_count: u32,
    pub regen_start: Option<f32>,
    pub time_of_death: Option<f32>,
    /// Decorative texture offset, re-rolled on every damaging hit
    pub hit_jitter: Vec2,
    pub view: ViewMode,
}

impl Player {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            depth: config.player_depth,
            half_extent: config.player_half_extent,
            angle: 0.0,
            fall_speed: 0.0,
            health: MAX_HEALTH,
            resting: false,
            collision_count: 0,
            regen_start: None,
            time_of_death: None,
            hit_jitter: Vec2::ZERO,
            view: ViewMode::default(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.time_of_death.is_some()
    }

    pub fn health_state(&self) -> HealthState {
        if self.is_dead() {
            HealthState::Dead
        } else if self.resting {
            HealthState::Resting
        } else {
            HealthState::Falling
        }
    }

    pub fn center(&self) -> Vec3 {
        self.pos.extend(self.depth)
    }

    /// Cube transform: translate, rotate about the shaft axis, scale to size
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.center())
            * Mat4::from_rotation_z(self.angle)
            * Mat4::from_scale(Vec3::splat(self.half_extent))
    }

    pub fn corners(&self) -> [Vec3; 8] {
        box_corners(&self.transform())
    }
}

/// Complete game state for one process
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub walls: Walls,
    pub palette: MaterialPalette,
    pub camera: Camera,
    pub player: Player,
    /// Platforms still in play, ordered shallowest first
    pub platforms: Vec<Platform>,
    /// Struck platforms, simulated until they expire
    pub debris: Vec<Platform>,
    pub difficulty: f32,
    /// Platforms cleared this run
    pub score: u64,
    /// Physics and collisions run only while true
    pub running: bool,
    /// Total scroll distance this run
    pub scroll: f32,
    /// Wall texture phase in [0, wall_texture_period)
    pub wall_scroll: f32,
    /// Host time of the last frame (seconds)
    pub time: f32,
    pub run_started_at: f32,
    /// Runs started since process start (1-based)
    pub run_index: u32,
    /// Frames stepped this run
    pub frame: u64,
    /// Platforms generated this run, drives material choice
    pub platforms_spawned: u32,
    next_id: u32,
}

impl GameState {
    /// Validate the config and start the first run
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = Player::new(&config);
        let mut state = Self {
            walls: Walls::new(config.wall_side_length, config.shaft_depth),
            palette: MaterialPalette::new(),
            camera: Camera::new(&player),
            player,
            platforms: Vec::new(),
            debris: Vec::new(),
            difficulty: config.start_difficulty,
            score: 0,
            running: true,
            scroll: 0.0,
            wall_scroll: 0.0,
            time: 0.0,
            run_started_at: 0.0,
            run_index: 0,
            frame: 0,
            platforms_spawned: 0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            config,
        };
        state.reset_run(0.0);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reinitialize player, platforms and difficulty for a new run
    ///
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn reset_run(&mut self, now: f32) {
        let view = self.player.view;
        self.player = Player::new(&self.config);
        self.player.view = view;
        self.camera = Camera::new(&self.player);
        self.platforms.clear();
        self.debris.clear();
        self.difficulty = self.config.start_difficulty;
        self.score = 0;
        self.running = true;
        self.scroll = 0.0;
        self.wall_scroll = 0.0;
        self.run_started_at = now;
        self.time = now;
        self.frame = 0;
        self.platforms_spawned = 0;
        self.run_index += 1;

        log::info!(
            "Run {} started (seed {}, mode {}, difficulty {:.3})",
            self.run_index,
            self.seed,
            self.config.mode.as_str(),
            self.difficulty
        );
    }

    /// Seconds since the current run started
    pub fn run_time(&self) -> f32 {
        self.time - self.run_started_at
    }

    /// Ensure platforms are ordered by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.debris.sort_by_key(|p| p.id);
    }
}
