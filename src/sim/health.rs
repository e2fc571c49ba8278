//! Collision response and health state machine
//!
//! Falling -> Resting on impact, Resting -> Falling once a frame passes
//! without impacts, anything -> Dead when health runs out. Dead only ends
//! through the run reset in the frame controller.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::state::Player;
use crate::consts::MAX_HEALTH;

/// Player health state, derived from the player's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    Falling,
    Resting,
    Dead,
}

/// What happened during one state machine update
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthEvent {
    /// Impacts drained this frame
    pub impacts: u32,
    /// Total health removed
    pub damage: f32,
    /// Health crossed zero this frame
    pub died: bool,
    /// Left the resting state this frame
    pub resumed_falling: bool,
}

/// Damage for one impact at fall speed `v`
#[inline]
pub fn impact_damage(v: f32, config: &SimConfig) -> f32 {
    50.0 * v / config.terminal_velocity
}

/// Drain pending collisions and apply damage, bounce, death and regeneration
pub fn update_health<R: Rng>(
    player: &mut Player,
    now: f32,
    config: &SimConfig,
    rng: &mut R,
) -> HealthEvent {
    let mut event = HealthEvent::default();
    if player.is_dead() {
        player.collision_count = 0;
        return event;
    }

    // Damage is gated on the state the frame started in, so every impact
    // of a multi-hit frame counts.
    let was_resting = player.resting;
    while player.collision_count > 0 {
        if !was_resting {
            let damage = impact_damage(player.fall_speed, config);
            player.health = (player.health - damage).max(0.0);
            player.hit_jitter = Vec2::new(rng.random_range(-0.5..0.5), rng.random_range(-0.5..0.5));
            event.damage += damage;
        }
        player.fall_speed = player.fall_speed.sqrt();
        player.resting = true;
        player.collision_count -= 1;
        event.impacts += 1;

        if player.health <= 0.0 {
            player.time_of_death = Some(now);
            player.collision_count = 0;
            event.died = true;
            log::info!("Player died at t={:.2}s after {} impact(s)", now, event.impacts);
            return event;
        }
    }

    if event.impacts > 0 {
        return event;
    }

    if player.fall_speed > 0.0 && player.resting {
        player.resting = false;
        player.regen_start = Some(now);
        event.resumed_falling = true;
    }

    let regenerating = !player.resting
        && player
            .regen_start
            .is_some_and(|start| now - start > config.regen_delay);
    if regenerating {
        player.health =
            (player.health + config.regen_rate * (MAX_HEALTH - player.health)).min(MAX_HEALTH);
    }

    event
}

/// Scale of the death marker, once the display delay has passed
pub fn death_visual_scale(player: &Player, now: f32, config: &SimConfig) -> Option<f32> {
    let since = now - player.time_of_death?;
    if since < config.death_display_delay {
        return None;
    }
    let t = (since - config.death_display_delay) / config.death_scale_window;
    Some(t.clamp(0.0, 1.0))
}

/// True once the dead player has waited out the reset delay
pub fn reset_due(player: &Player, now: f32, config: &SimConfig) -> bool {
    player
        .time_of_death
        .is_some_and(|t| now - t > config.reset_delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (SimConfig, Player, Pcg32) {
        let config = SimConfig::default();
        let player = Player::new(&config);
        (config, player, Pcg32::seed_from_u64(7))
    }

    #[test]
    fn test_terminal_impact_takes_fifty() {
        let (config, mut player, mut rng) = setup();
        player.fall_speed = config.terminal_velocity;
        player.collision_count = 1;
        let event = update_health(&mut player, 1.0, &config, &mut rng);
        assert_eq!(event.impacts, 1);
        assert!((player.health - 50.0).abs() < 1e-4);
        assert!((player.fall_speed - 10.0).abs() < 1e-4);
        assert_eq!(player.health_state(), HealthState::Resting);
        assert!(player.hit_jitter.abs().max_element() <= 0.5);
    }

    #[test]
    fn test_three_impacts_in_one_frame() {
        let (config, mut player, mut rng) = setup();
        player.fall_speed = 100.0;
        player.collision_count = 3;
        let event = update_health(&mut player, 1.0, &config, &mut rng);
        assert_eq!(event.impacts, 3);
        // 50 + 5 + 50·sqrt(10)/100
        let expected = 50.0 + 5.0 + 50.0 * 10f32.sqrt() / 100.0;
        assert!((event.damage - expected).abs() < 1e-3);
        assert!((player.health - (100.0 - expected)).abs() < 1e-3);
        // Three square roots: 100 -> 10 -> 3.162 -> 1.778
        assert!((player.fall_speed - 100f32.powf(0.125)).abs() < 1e-4);
        assert_eq!(player.collision_count, 0);
        assert!(!event.died);
    }

    #[test]
    fn test_death_mid_sequence_stops_damage() {
        let (config, mut player, mut rng) = setup();
        player.health = 52.0;
        player.fall_speed = 100.0;
        player.collision_count = 3;
        let event = update_health(&mut player, 4.0, &config, &mut rng);
        assert!(event.died);
        assert_eq!(event.impacts, 2);
        assert!((event.damage - 55.0).abs() < 1e-3);
        assert_eq!(player.health, 0.0);
        assert_eq!(player.time_of_death, Some(4.0));
        assert_eq!(player.collision_count, 0);
        assert_eq!(player.health_state(), HealthState::Dead);

        // Dead is sticky: more collisions change nothing
        player.collision_count = 2;
        let event = update_health(&mut player, 4.1, &config, &mut rng);
        assert_eq!(event, HealthEvent::default());
        assert_eq!(player.time_of_death, Some(4.0));
    }

    #[test]
    fn test_resting_blocks_damage() {
        let (config, mut player, mut rng) = setup();
        player.resting = true;
        player.fall_speed = 81.0;
        player.collision_count = 1;
        let event = update_health(&mut player, 1.0, &config, &mut rng);
        assert_eq!(event.damage, 0.0);
        assert_eq!(player.health, MAX_HEALTH);
        assert!((player.fall_speed - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_resume_falling_then_regen() {
        let (config, mut player, mut rng) = setup();
        player.fall_speed = 100.0;
        player.collision_count = 1;
        update_health(&mut player, 1.0, &config, &mut rng);
        let after_hit = player.health;

        // Next frame without impacts: back to falling, regen clock starts
        let event = update_health(&mut player, 1.1, &config, &mut rng);
        assert!(event.resumed_falling);
        assert_eq!(player.regen_start, Some(1.1));
        assert_eq!(player.health, after_hit);

        // Within the delay: no regen yet
        update_health(&mut player, 2.0, &config, &mut rng);
        assert_eq!(player.health, after_hit);

        // After the delay: regen toward 100
        update_health(&mut player, 2.2, &config, &mut rng);
        let expected = after_hit + config.regen_rate * (MAX_HEALTH - after_hit);
        assert!((player.health - expected).abs() < 1e-5);
    }

    #[test]
    fn test_regen_never_exceeds_max() {
        let (config, mut player, mut rng) = setup();
        player.health = 1.0;
        player.regen_start = Some(0.0);
        let mut last = player.health;
        let frames = (MAX_HEALTH / config.regen_rate) as u32;
        for i in 0..frames {
            update_health(&mut player, 2.0 + i as f32 * 0.001, &config, &mut rng);
            assert!(player.health >= last);
            assert!(player.health <= MAX_HEALTH);
            last = player.health;
        }
        assert!(player.health > 99.0);
    }

    #[test]
    fn test_death_visual_and_reset_timing() {
        let (config, mut player, _) = setup();
        assert_eq!(death_visual_scale(&player, 10.0, &config), None);
        assert!(!reset_due(&player, 10.0, &config));

        player.time_of_death = Some(10.0);
        assert_eq!(death_visual_scale(&player, 10.5, &config), None);
        let half = death_visual_scale(&player, 10.0 + config.death_display_delay + 0.5, &config);
        assert!((half.unwrap() - 0.5 * (1.0 / config.death_scale_window)).abs() < 1e-4);
        assert!(!reset_due(&player, 10.0 + config.reset_delay - 0.01, &config));
        assert!(reset_due(&player, 10.0 + config.reset_delay + 0.01, &config));
    }
}
