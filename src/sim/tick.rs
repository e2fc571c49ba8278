//! Per-frame simulation step
//!
//! One `tick` per rendered frame. The step order is fixed:
//! restart/reset, input + physics, collision drain, scroll + wall clamp,
//! platform top-up, platform advance + collision tests, debris pass,
//! retirement. Then the frame output is assembled for the renderer.

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

use super::collision::{bounds_correction, cube_cube_collision, extents};
use super::config::GameMode;
use super::debris::{detach_into_debris, is_expired, step_debris};
use super::health::{HealthState, death_visual_scale, reset_due, update_health};
use super::physics::{integrate_fall_speed, integrate_horizontal, scroll_displacement};
use super::platform::{Platform, choose_variant, generate, ramp_difficulty, spacing_for};
use super::state::{GameState, ViewMode};
use crate::consts::CELL_HALF_EXTENT;
use crate::scene::{Camera, DrawInstance, MaterialPalette, ShapeKind};

/// Size of the death marker at full scale
const DEATH_MARKER_SIZE: f32 = 3.0;

/// Input for a single frame, sampled by the host before the step
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Host clock (seconds)
    pub time: f32,
    /// Horizontal thrust, each component in [-1, 1]
    pub thrust: Vec2,
    /// Rotation input in [-1, 1]
    pub rotation: f32,
    /// Viewport width / height
    pub aspect: f32,
    /// One-shot: pause or resume
    pub toggle_pause: bool,
    /// One-shot: switch first/third person
    pub toggle_view: bool,
    /// One-shot: start a new run
    pub restart: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            dt: 0.0,
            time: 0.0,
            thrust: Vec2::ZERO,
            rotation: 0.0,
            aspect: 16.0 / 9.0,
            toggle_pause: false,
            toggle_view: false,
            restart: false,
        }
    }
}

impl FrameInput {
    pub fn at(dt: f32, time: f32) -> Self {
        Self {
            dt,
            time,
            ..Default::default()
        }
    }

    /// Clear one-shot flags after they have been processed
    pub fn clear_triggers(&mut self) {
        self.toggle_pause = false;
        self.toggle_view = false;
        self.restart = false;
    }
}

/// Values for the heads-up display
#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub health: f32,
    pub health_state: HealthState,
    pub score: u64,
    pub difficulty: f32,
    pub fall_speed: f32,
    pub run_index: u32,
    pub run_time: f32,
    pub paused: bool,
    /// Death marker scale once it is visible
    pub death_scale: Option<f32>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub camera: Mat4,
    pub projection: Mat4,
    pub instances: Vec<DrawInstance>,
    /// Wall texture scroll phase
    pub wall_scroll: f32,
    /// Decorative texture offset from the last damaging hit
    pub hit_jitter: Vec2,
    pub hud: Hud,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &FrameInput) -> FrameOutput {
    let dt = input.dt.max(0.0);
    let now = input.time;
    state.time = now;

    if input.restart {
        log::info!("Restart requested after {:.1}s", state.run_time());
        state.reset_run(now);
    }
    if input.toggle_pause {
        state.running = !state.running;
        log::info!("{}", if state.running { "Resumed" } else { "Paused" });
    }
    if input.toggle_view {
        state.player.view = state.player.view.toggled();
    }

    // 1. Dead long enough: start over
    if reset_due(&state.player, now, &state.config) {
        log::info!(
            "Run {} over: score {}, {:.1}s",
            state.run_index,
            state.score,
            now - state.run_started_at
        );
        state.reset_run(now);
        return frame_output(state, input.aspect);
    }

    state.frame += 1;

    // 2. Input and fall speed
    if state.running && !state.player.is_dead() {
        let thrust = input.thrust.clamp(Vec2::NEG_ONE, Vec2::ONE);
        let rotation = input.rotation.clamp(-1.0, 1.0);
        integrate_horizontal(&mut state.player, thrust, rotation, dt, &state.config);
        state.player.fall_speed = integrate_fall_speed(state.player.fall_speed, dt, &state.config);
    }

    // 3. Collisions detected last frame
    if state.running {
        let event = update_health(&mut state.player, now, &state.config, &mut state.rng);
        if event.impacts > 0 && !event.died {
            log::debug!(
                "{} impact(s), {:.1} damage, health {:.1}",
                event.impacts,
                event.damage,
                state.player.health
            );
        }
    }

    // 4. Scroll and keep the player inside the shaft
    let active = state.running && !state.player.is_dead();
    let displacement = if active {
        scroll_displacement(state.player.fall_speed, dt)
    } else {
        0.0
    };
    state.scroll += displacement;
    state.wall_scroll = (state.wall_scroll + displacement).rem_euclid(state.config.wall_texture_period);
    clamp_to_walls(state);

    // 5. Keep enough platforms incoming
    top_up_platforms(state);

    // 6. Scroll platforms, test cells against the player
    advance_platforms(state, displacement, active);

    // 7. Struck platforms become debris
    if state.running {
        detach_struck(state);
        for platform in &mut state.debris {
            step_debris(platform, dt, &state.config);
        }
    }

    // 8. Retire what has passed the player
    retire(state);

    state.normalize_order();
    state.camera.follow(&state.player);
    frame_output(state, input.aspect)
}

/// Push the player back inside the walls using the mode's collision model
fn clamp_to_walls(state: &mut GameState) {
    let correction = match state.config.mode {
        GameMode::Arcade => {
            let (min, max) = extents(&state.player.corners());
            bounds_correction(min, max, state.walls.side)
        }
        GameMode::Classic => state
            .walls
            .sphere_correction(state.player.center(), state.player.half_extent)
            .truncate(),
    };
    state.player.pos += correction;
}

/// Generate platforms until the active list reaches its minimum size
fn top_up_platforms(state: &mut GameState) {
    while state.platforms.len() < state.config.min_active_platforms {
        state.difficulty = ramp_difficulty(state.difficulty, &state.config);
        let gap = spacing_for(state.difficulty, &state.config);
        let spawn_depth = state
            .platforms
            .iter()
            .map(|p| p.position - gap)
            .fold(state.config.spawn_depth, f32::min);

        let variant = choose_variant(&state.config.variant_weights, &mut state.rng);
        let id = state.next_entity_id();
        let material = state.palette.platform(state.platforms_spawned);
        state.platforms_spawned += 1;

        let platform = generate(
            spawn_depth,
            state.difficulty,
            variant,
            &state.config,
            &mut state.rng,
            id,
            material,
        );
        state.platforms.push(platform);
    }
}

/// Scroll every platform and flag the ones the player hits
///
/// Flags only; list membership changes afterwards in `detach_struck`.
fn advance_platforms(state: &mut GameState, displacement: f32, detect: bool) {
    for platform in &mut state.debris {
        platform.position += displacement;
    }

    let corners = state.player.corners();
    let reach = state.player.half_extent * std::f32::consts::SQRT_2 + CELL_HALF_EXTENT;
    let depth = state.player.depth;
    let mut hits = 0;

    for platform in &mut state.platforms {
        platform.position += displacement;
        if !detect || platform.has_collided {
            continue;
        }

        // Broad phase: skip platforms whose cells are nowhere near the player
        let near = platform
            .z_span()
            .is_some_and(|(lo, hi)| lo - reach <= depth && depth <= hi + reach);
        if !near {
            continue;
        }

        let hit = platform.cells.iter().any(|cell| {
            cube_cube_collision(&corners, &platform.cell_transform(cell), CELL_HALF_EXTENT)
        });
        if hit {
            platform.has_collided = true;
            hits += 1;
        }
    }

    state.player.collision_count += hits;
}

/// Move newly struck platforms from the active list into debris
fn detach_struck(state: &mut GameState) {
    if !state.platforms.iter().any(|p| p.has_collided) {
        return;
    }

    let (struck, remaining): (Vec<Platform>, Vec<Platform>) =
        state.platforms.drain(..).partition(|p| p.has_collided);
    state.platforms = remaining;

    let impact_pos = state.player.pos;
    let impact_speed = state.player.fall_speed;
    for mut platform in struck {
        detach_into_debris(&mut platform, impact_pos, impact_speed, &state.config, &mut state.rng);
        state.debris.push(platform);
    }
}

/// Drop platforms past the retire depth (scoring them) and expired debris
fn retire(state: &mut GameState) {
    let retire_depth = state.config.retire_depth;
    let before = state.platforms.len();
    state.platforms.retain(|p| p.position <= retire_depth);
    let cleared = before - state.platforms.len();
    if cleared > 0 {
        state.score += cleared as u64;
        log::debug!("Cleared {} platform(s), score {}", cleared, state.score);
    }

    let config = &state.config;
    state.debris.retain(|p| !is_expired(p, config));
}

/// Assemble camera, draw list and HUD for the renderer
fn frame_output(state: &GameState, aspect: f32) -> FrameOutput {
    let cell_count: usize = state
        .platforms
        .iter()
        .chain(&state.debris)
        .map(|p| p.cells.len())
        .sum();
    let mut instances = Vec::with_capacity(cell_count + 6);

    for transform in state.walls.transforms() {
        instances.push(DrawInstance::new(
            *transform,
            ShapeKind::Wall,
            MaterialPalette::WALL,
        ));
    }

    let player = &state.player;
    if player.view == ViewMode::ThirdPerson && !player.is_dead() {
        instances.push(DrawInstance::new(
            player.transform(),
            ShapeKind::Cube,
            MaterialPalette::PLAYER,
        ));
    }

    let cell_scale = Mat4::from_scale(Vec3::splat(CELL_HALF_EXTENT));
    for platform in state.platforms.iter().chain(&state.debris) {
        for cell in &platform.cells {
            instances.push(DrawInstance::new(
                platform.cell_transform(cell) * cell_scale,
                cell.shape,
                platform.material,
            ));
        }
    }

    let death_scale = death_visual_scale(player, state.time, &state.config);
    if let Some(scale) = death_scale {
        let size = (scale * DEATH_MARKER_SIZE).max(f32::EPSILON);
        instances.push(DrawInstance::new(
            Mat4::from_translation(player.center()) * Mat4::from_scale(Vec3::splat(size)),
            ShapeKind::Sphere,
            MaterialPalette::DEATH,
        ));
    }

    FrameOutput {
        camera: state.camera.view(),
        projection: Camera::projection(aspect),
        instances,
        wall_scroll: state.wall_scroll,
        hit_jitter: player.hit_jitter,
        hud: Hud {
            health: player.health,
            health_state: player.health_state(),
            score: state.score,
            difficulty: state.difficulty,
            fall_speed: player.fall_speed,
            run_index: state.run_index,
            run_time: state.run_time(),
            paused: !state.running,
            death_scale,
        },
    }
}
