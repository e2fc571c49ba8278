//! Procedural platform generation
//!
//! A platform is a group of unit cells laid out on the shaft's `2L × 2L`
//! grid. Cell centers sit at `-L + 0.5 + i`, so the grid covers `[-L, L]`
//! exactly and lines up with the walls.

use glam::{Mat4, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{SimConfig, VariantWeights};
use crate::scene::{MaterialId, ShapeKind};

/// Platform generation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformVariant {
    /// Every cell kept with probability = difficulty
    DenseScatter,
    /// Like dense scatter, but each cell sits at a random depth
    VaryingDepth,
    /// Solid field with square gaps punched through
    Holes,
}

/// One drawable unit of a platform
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCell {
    pub shape: ShapeKind,
    /// Offset from the platform origin
    pub offset: Vec3,
    /// Spin angles about x/y/z (debris only)
    pub spin: Vec3,
    /// Spin rates about x/y/z in radians/s (debris only)
    pub angular_vel: Vec3,
    /// Local linear velocity (debris only)
    pub velocity: Vec3,
}

impl ShapeCell {
    pub fn new(shape: ShapeKind, offset: Vec3) -> Self {
        Self {
            shape,
            offset,
            spin: Vec3::ZERO,
            angular_vel: Vec3::ZERO,
            velocity: Vec3::ZERO,
        }
    }
}

/// A generated obstacle group
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    pub variant: PlatformVariant,
    /// Depth of the platform origin along the shaft axis
    pub position: f32,
    pub cells: Vec<ShapeCell>,
    pub has_collided: bool,
    pub material: MaterialId,
    /// Seconds spent as debris
    pub age: f32,
}

impl Platform {
    /// World transform of a cell, including debris spin
    pub fn cell_transform(&self, cell: &ShapeCell) -> Mat4 {
        let origin = Vec3::new(0.0, 0.0, self.position) + cell.offset;
        let translation = Mat4::from_translation(origin);
        if cell.spin == Vec3::ZERO {
            translation
        } else {
            translation
                * Mat4::from_rotation_x(cell.spin.x)
                * Mat4::from_rotation_y(cell.spin.y)
                * Mat4::from_rotation_z(cell.spin.z)
        }
    }

    /// World-space depth range covered by cell centers, `None` when empty
    pub fn z_span(&self) -> Option<(f32, f32)> {
        let mut cells = self.cells.iter().map(|c| c.offset.z);
        let first = cells.next()?;
        let (lo, hi) = cells.fold((first, first), |(lo, hi), z| (lo.min(z), hi.max(z)));
        Some((self.position + lo, self.position + hi))
    }
}

/// Build a platform of the given variant at `spawn_depth`
pub fn generate<R: Rng>(
    spawn_depth: f32,
    difficulty: f32,
    variant: PlatformVariant,
    config: &SimConfig,
    rng: &mut R,
    id: u32,
    material: MaterialId,
) -> Platform {
    let fill = difficulty.clamp(0.0, 1.0);
    let cells = match variant {
        PlatformVariant::DenseScatter => dense_scatter(fill, config, rng),
        PlatformVariant::VaryingDepth => varying_depth(fill, config, rng),
        PlatformVariant::Holes => holes(fill, config, rng),
    };

    log::debug!(
        "Platform {} {:?} at {:.1}: {} cells (difficulty {:.4})",
        id,
        variant,
        spawn_depth,
        cells.len(),
        difficulty
    );

    Platform {
        id,
        variant,
        position: spawn_depth,
        cells,
        has_collided: false,
        material,
        age: 0.0,
    }
}

/// Grid coordinate to cell-center offset
#[inline]
fn grid_offset(i: u32, side: f32) -> f32 {
    i as f32 - side + 0.5
}

fn dense_scatter<R: Rng>(fill: f32, config: &SimConfig, rng: &mut R) -> Vec<ShapeCell> {
    let n = config.grid_cells();
    let side = config.wall_side_length;
    let mut cells = Vec::new();
    for z in 0..config.platform_layers {
        for x in 0..n {
            for y in 0..n {
                if rng.random_bool(fill as f64) {
                    cells.push(ShapeCell::new(
                        ShapeKind::Cube,
                        Vec3::new(grid_offset(x, side), grid_offset(y, side), z as f32),
                    ));
                }
            }
        }
    }
    cells
}

fn varying_depth<R: Rng>(fill: f32, config: &SimConfig, rng: &mut R) -> Vec<ShapeCell> {
    let n = config.grid_cells();
    let side = config.wall_side_length;
    let mut cells = Vec::new();
    for x in 0..n {
        for y in 0..n {
            if rng.random_bool(fill as f64) {
                let dz = if config.depth_range > 0.0 {
                    rng.random_range(0.0..config.depth_range)
                } else {
                    0.0
                };
                cells.push(ShapeCell::new(
                    ShapeKind::Cube,
                    Vec3::new(grid_offset(x, side), grid_offset(y, side), dz),
                ));
            }
        }
    }
    cells
}

/// Number of holes punched into a holes platform
///
/// Exactly `hole_count` unless `scale_holes_with_difficulty` is set.
pub fn hole_count_for(difficulty: f32, config: &SimConfig) -> u32 {
    if !config.scale_holes_with_difficulty {
        return config.hole_count;
    }
    (((1.0 - difficulty) * config.hole_count as f32).ceil() as u32).max(1)
}

fn holes<R: Rng>(fill: f32, config: &SimConfig, rng: &mut R) -> Vec<ShapeCell> {
    let n = config.grid_cells();
    let side = config.wall_side_length;
    let size = config.hole_size.min(n);

    // Hole rectangles as [x0, x0 + size) × [y0, y0 + size) in grid space
    let hole_origins: Vec<(u32, u32)> = (0..hole_count_for(fill, config))
        .map(|_| {
            (
                rng.random_range(0..=n - size),
                rng.random_range(0..=n - size),
            )
        })
        .collect();
    let in_hole = |x: u32, y: u32| {
        hole_origins
            .iter()
            .any(|&(hx, hy)| x >= hx && x < hx + size && y >= hy && y < hy + size)
    };

    let mut cells = Vec::new();
    for z in 0..config.platform_layers {
        for x in 0..n {
            for y in 0..n {
                if !in_hole(x, y) {
                    cells.push(ShapeCell::new(
                        ShapeKind::Cube,
                        Vec3::new(grid_offset(x, side), grid_offset(y, side), z as f32),
                    ));
                }
            }
        }
    }
    cells
}

/// Vertical gap between consecutive platforms
#[inline]
pub fn spacing_for(difficulty: f32, config: &SimConfig) -> f32 {
    (1.0 - difficulty).powi(2) * config.spacing_scale
}

/// Step difficulty up; past the ceiling it drops back to the reset value
pub fn ramp_difficulty(difficulty: f32, config: &SimConfig) -> f32 {
    let next = difficulty + config.difficulty_step;
    if next >= config.difficulty_ceiling {
        config.difficulty_reset
    } else {
        next
    }
}

/// Weighted variant draw: dense most common, holes least
///
/// Summed in `u64` so any set of `u32` weights is safe; an all-zero set
/// falls back to dense scatter.
pub fn choose_variant<R: Rng>(weights: &VariantWeights, rng: &mut R) -> PlatformVariant {
    let dense = u64::from(weights.dense);
    let varying = u64::from(weights.varying);
    let total = dense + varying + u64::from(weights.holes);
    if total == 0 {
        return PlatformVariant::DenseScatter;
    }
    let roll = rng.random_range(0..total);
    if roll < dense {
        PlatformVariant::DenseScatter
    } else if roll < dense + varying {
        PlatformVariant::VaryingDepth
    } else {
        PlatformVariant::Holes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn make(variant: PlatformVariant, difficulty: f32, config: &SimConfig) -> Platform {
        generate(-100.0, difficulty, variant, config, &mut rng(), 1, MaterialId(0))
    }

    #[test]
    fn test_dense_fill_zero_is_empty() {
        let config = SimConfig::default();
        assert!(make(PlatformVariant::DenseScatter, 0.0, &config).cells.is_empty());
    }

    #[test]
    fn test_dense_fill_one_is_full() {
        let config = SimConfig {
            platform_layers: 3,
            ..Default::default()
        };
        let p = make(PlatformVariant::DenseScatter, 1.0, &config);
        let n = (2.0 * config.wall_side_length) as usize;
        assert_eq!(p.cells.len(), 3 * n * n);
    }

    #[test]
    fn test_grid_spans_walls() {
        let config = SimConfig::default();
        let p = make(PlatformVariant::DenseScatter, 1.0, &config);
        let l = config.wall_side_length;
        for cell in &p.cells {
            assert!(cell.offset.x - 0.5 >= -l && cell.offset.x + 0.5 <= l);
            assert!(cell.offset.y - 0.5 >= -l && cell.offset.y + 0.5 <= l);
        }
        let min_x = p.cells.iter().map(|c| c.offset.x).fold(f32::MAX, f32::min);
        let max_x = p.cells.iter().map(|c| c.offset.x).fold(f32::MIN, f32::max);
        assert_eq!(min_x, -l + 0.5);
        assert_eq!(max_x, l - 0.5);
    }

    #[test]
    fn test_dense_density_tracks_difficulty() {
        let config = SimConfig::default();
        let total = (config.grid_cells() * config.grid_cells()) as f32;
        let p = make(PlatformVariant::DenseScatter, 0.5, &config);
        let ratio = p.cells.len() as f32 / total;
        assert!(ratio > 0.35 && ratio < 0.65, "ratio {}", ratio);
    }

    #[test]
    fn test_varying_depth_within_range() {
        let config = SimConfig::default();
        let p = make(PlatformVariant::VaryingDepth, 1.0, &config);
        assert_eq!(p.cells.len(), (config.grid_cells() * config.grid_cells()) as usize);
        assert!(
            p.cells
                .iter()
                .all(|c| c.offset.z >= 0.0 && c.offset.z < config.depth_range)
        );
        // Jagged: not every cell at the same depth
        let first = p.cells[0].offset.z;
        assert!(p.cells.iter().any(|c| c.offset.z != first));
    }

    #[test]
    fn test_holes_leave_a_gap() {
        let config = SimConfig::default();
        let total = (config.grid_cells() * config.grid_cells()) as usize;
        let hole_area = (config.hole_size * config.hole_size) as usize;
        for difficulty in [0.0, 0.5, 0.8] {
            let p = make(PlatformVariant::Holes, difficulty, &config);
            assert!(p.cells.len() <= total - hole_area);
            assert!(p.cells.len() >= total - hole_area * config.hole_count as usize);
        }
    }

    #[test]
    fn test_hole_count_is_configured_count() {
        let config = SimConfig::default();
        for difficulty in [0.1, 0.5, 0.8, 1.0] {
            assert_eq!(hole_count_for(difficulty, &config), config.hole_count);
        }

        // Non-overlapping holes: a 1-hole platform is missing exactly one hole
        let config = SimConfig {
            hole_count: 1,
            ..Default::default()
        };
        let p = make(PlatformVariant::Holes, 0.9, &config);
        let total = (config.grid_cells() * config.grid_cells()) as usize;
        assert_eq!(p.cells.len(), total - (config.hole_size * config.hole_size) as usize);
    }

    #[test]
    fn test_fewer_holes_when_harder_if_enabled() {
        let config = SimConfig {
            scale_holes_with_difficulty: true,
            ..Default::default()
        };
        assert_eq!(hole_count_for(0.0, &config), config.hole_count);
        assert_eq!(hole_count_for(1.0, &config), 1);
        assert!(hole_count_for(0.7, &config) <= hole_count_for(0.2, &config));
    }

    #[test]
    fn test_choose_variant_handles_huge_weights() {
        let weights = VariantWeights {
            dense: u32::MAX,
            varying: u32::MAX,
            holes: u32::MAX,
        };
        let mut r = rng();
        let mut seen_holes = false;
        for _ in 0..200 {
            seen_holes |= choose_variant(&weights, &mut r) == PlatformVariant::Holes;
        }
        assert!(seen_holes);
    }

    #[test]
    fn test_spacing_shrinks_with_difficulty() {
        let config = SimConfig::default();
        assert_eq!(spacing_for(0.0, &config), config.spacing_scale);
        assert!((spacing_for(0.5, &config) - 0.25 * config.spacing_scale).abs() < 1e-5);
        assert!(spacing_for(0.8, &config) < spacing_for(0.1, &config));
    }

    #[test]
    fn test_difficulty_cycles() {
        let config = SimConfig::default();
        let mut d = config.start_difficulty;
        let mut wrapped = false;
        for _ in 0..1000 {
            let next = ramp_difficulty(d, &config);
            assert!(next < config.difficulty_ceiling);
            if next < d {
                assert_eq!(next, config.difficulty_reset);
                wrapped = true;
            }
            d = next;
        }
        assert!(wrapped);
    }

    #[test]
    fn test_variant_weights_respected() {
        let weights = VariantWeights {
            dense: 0,
            varying: 0,
            holes: 5,
        };
        let mut r = rng();
        for _ in 0..20 {
            assert_eq!(choose_variant(&weights, &mut r), PlatformVariant::Holes);
        }

        let weights = VariantWeights::default();
        let mut counts = [0u32; 3];
        for _ in 0..1000 {
            match choose_variant(&weights, &mut r) {
                PlatformVariant::DenseScatter => counts[0] += 1,
                PlatformVariant::VaryingDepth => counts[1] += 1,
                PlatformVariant::Holes => counts[2] += 1,
            }
        }
        assert!(counts[0] > counts[1] && counts[1] > counts[2]);
    }

    #[test]
    fn test_cell_transform_places_cell() {
        let config = SimConfig::default();
        let p = make(PlatformVariant::DenseScatter, 1.0, &config);
        let cell = &p.cells[0];
        let center = p.cell_transform(cell).transform_point3(Vec3::ZERO);
        assert_eq!(center, Vec3::new(cell.offset.x, cell.offset.y, -100.0 + cell.offset.z));
    }
}
