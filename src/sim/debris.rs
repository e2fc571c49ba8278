//! Debris physics for struck platforms
//!
//! A struck platform stops interacting with the player. Its cells tumble
//! and scatter away from the impact point until the platform expires.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::config::SimConfig;
use super::platform::Platform;

/// Give every cell its own spin and scatter velocity
///
/// Harder impacts (higher fall speed) spin and scatter the cells more.
pub fn detach_into_debris<R: Rng>(
    platform: &mut Platform,
    impact_pos: Vec2,
    impact_speed: f32,
    config: &SimConfig,
    rng: &mut R,
) {
    let intensity = 1.0 + impact_speed / config.terminal_velocity;
    let spin = config.spin_scale * intensity;

    for cell in &mut platform.cells {
        cell.angular_vel = Vec3::new(
            rng.random_range(-spin..=spin),
            rng.random_range(-spin..=spin),
            rng.random_range(-spin..=spin),
        );

        let away = (cell.offset.truncate() - impact_pos).normalize_or_zero();
        let away = if away == Vec2::ZERO {
            Vec2::from_angle(rng.random_range(0.0..std::f32::consts::TAU))
        } else {
            away
        };
        let push = config.scatter_scale * intensity * rng.random_range(0.5..=1.0);
        cell.velocity = (away * push).extend(-rng.random_range(0.0..=push));
    }
    platform.has_collided = true;
    platform.age = 0.0;

    log::debug!(
        "Platform {} became debris ({} cells, impact speed {:.1})",
        platform.id,
        platform.cells.len(),
        impact_speed
    );
}

/// Advance spin and local motion of every cell by `dt`
pub fn step_debris(platform: &mut Platform, dt: f32, config: &SimConfig) {
    platform.age += dt;
    for cell in &mut platform.cells {
        cell.spin += cell.angular_vel * dt;
        cell.velocity.z -= config.debris_gravity * dt;
        cell.offset += cell.velocity * dt;
    }
}

/// Debris is gone once it has lived out its lifetime or scrolled past the player
pub fn is_expired(platform: &Platform, config: &SimConfig) -> bool {
    platform.age >= config.debris_lifetime || platform.position > config.retire_depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MaterialId;
    use crate::sim::platform::{PlatformVariant, generate};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn debris(speed: f32) -> (SimConfig, Platform) {
        let config = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut platform = generate(
            -30.0,
            1.0,
            PlatformVariant::DenseScatter,
            &config,
            &mut rng,
            9,
            MaterialId(1),
        );
        detach_into_debris(&mut platform, Vec2::new(0.3, -0.2), speed, &config, &mut rng);
        (config, platform)
    }

    fn mean_spin(platform: &Platform) -> f32 {
        platform
            .cells
            .iter()
            .map(|c| c.angular_vel.abs().element_sum())
            .sum::<f32>()
            / platform.cells.len() as f32
    }

    #[test]
    fn test_detach_marks_and_assigns_motion() {
        let (config, platform) = debris(50.0);
        assert!(platform.has_collided);
        let limit = config.spin_scale * 1.5;
        for cell in &platform.cells {
            assert!(cell.angular_vel.abs().max_element() <= limit + 1e-5);
            assert!(cell.velocity.z <= 0.0);
        }
        assert!(platform.cells.iter().any(|c| c.angular_vel != Vec3::ZERO));
    }

    #[test]
    fn test_cells_scatter_away_from_impact() {
        let (_, platform) = debris(50.0);
        let impact = Vec2::new(0.3, -0.2);
        for cell in &platform.cells {
            let outward = cell.offset.truncate() - impact;
            assert!(outward.dot(cell.velocity.truncate()) > 0.0);
        }
    }

    #[test]
    fn test_harder_impacts_spin_more() {
        let (_, soft) = debris(0.0);
        let (_, hard) = debris(100.0);
        assert!(mean_spin(&hard) > mean_spin(&soft));
    }

    #[test]
    fn test_step_integrates_spin_and_offset() {
        let (config, mut platform) = debris(20.0);
        let before = platform.cells[0].clone();
        step_debris(&mut platform, 0.1, &config);
        let after = &platform.cells[0];
        assert!((after.spin - before.angular_vel * 0.1).length() < 1e-5);
        assert!(after.velocity.z < before.velocity.z);
        assert_ne!(after.offset, before.offset);
        assert!((platform.age - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_expiry() {
        let (config, mut platform) = debris(20.0);
        assert!(!is_expired(&platform, &config));
        platform.age = config.debris_lifetime;
        assert!(is_expired(&platform, &config));

        platform.age = 0.0;
        platform.position = config.retire_depth + 1.0;
        assert!(is_expired(&platform, &config));
    }
}
