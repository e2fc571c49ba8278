//! Collision detection for the shaft walls and platform cells
//!
//! Everything here is axis-aligned. The cube test is a cheap corner/center
//! overlap check rather than a separating-axis test: platform cells are small
//! and fast-moving, so a slightly conservative answer is good enough.

use glam::{Mat4, Vec2, Vec3};

/// Unit cube corners, scaled by a transform into a box
const UNIT_CORNERS: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// The four static shaft walls
#[derive(Debug, Clone)]
pub struct Walls {
    /// Half-width of the shaft
    pub side: f32,
    /// Visual depth of the slabs
    pub depth: f32,
    transforms: [Mat4; 4],
}

impl Walls {
    pub fn new(side: f32, depth: f32) -> Self {
        let north_south_scale = Vec3::new(side, 1.0, depth);
        let east_west_scale = Vec3::new(1.0, side, depth);
        let slab = |offset: Vec3, scale: Vec3| {
            Mat4::from_translation(offset + Vec3::new(0.0, 0.0, -depth - 1.0))
                * Mat4::from_scale(scale)
        };

        Self {
            side,
            depth,
            transforms: [
                slab(Vec3::new(0.0, side + 1.0, 0.0), north_south_scale),
                slab(Vec3::new(0.0, -side - 1.0, 0.0), north_south_scale),
                slab(Vec3::new(side + 1.0, 0.0, 0.0), east_west_scale),
                slab(Vec3::new(-side - 1.0, 0.0, 0.0), east_west_scale),
            ],
        }
    }

    /// World transforms of the north, south, east and west slabs
    pub fn transforms(&self) -> &[Mat4; 4] {
        &self.transforms
    }

    /// Correction that pushes a sphere back inside the shaft
    ///
    /// Walls are tested north, south, east, west; only the first violated
    /// wall contributes, along its single axis.
    pub fn sphere_correction(&self, center: Vec3, radius: f32) -> Vec3 {
        let side = self.side;
        if center.y + radius > side {
            return Vec3::new(0.0, side - center.y - radius, 0.0);
        }
        if center.y - radius < -side {
            return Vec3::new(0.0, -side - center.y + radius, 0.0);
        }
        if center.x + radius > side {
            return Vec3::new(side - center.x - radius, 0.0, 0.0);
        }
        if center.x - radius < -side {
            return Vec3::new(-side - center.x + radius, 0.0, 0.0);
        }
        Vec3::ZERO
    }
}

/// The 8 corners of a unit cube placed by `transform`
pub fn box_corners(transform: &Mat4) -> [Vec3; 8] {
    UNIT_CORNERS.map(|c| transform.transform_point3(c))
}

/// Axis-aligned min/max over a set of points
pub fn extents(points: &[Vec3]) -> (Vec3, Vec3) {
    points.iter().fold(
        (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    )
}

#[inline]
fn inside(point: Vec3, min: Vec3, max: Vec3) -> bool {
    point.cmpge(min).all() && point.cmple(max).all()
}

/// Player cube against a platform cell
///
/// Hit when any player corner lies inside the cell's box, or any corner of
/// the cell lies inside the player's axis-aligned box. Bounds are inclusive.
/// The first half tests player corners against the cell's own half-extent
/// box rather than the cell center against a box around each player corner;
/// both answer the same overlap question for axis-aligned cells.
pub fn cube_cube_collision(
    player_corners: &[Vec3; 8],
    cell_transform: &Mat4,
    cell_half_extent: f32,
) -> bool {
    let cell_center = cell_transform.transform_point3(Vec3::ZERO);
    let cell_min = cell_center - Vec3::splat(cell_half_extent);
    let cell_max = cell_center + Vec3::splat(cell_half_extent);
    if player_corners.iter().any(|&c| inside(c, cell_min, cell_max)) {
        return true;
    }

    let (player_min, player_max) = extents(player_corners);
    let cell_box = *cell_transform * Mat4::from_scale(Vec3::splat(cell_half_extent));
    box_corners(&cell_box)
        .iter()
        .any(|&c| inside(c, player_min, player_max))
}

/// Translation that brings a horizontal extent back inside `±side`
pub fn bounds_correction(min: Vec3, max: Vec3, side: f32) -> Vec2 {
    let axis = |lo: f32, hi: f32| {
        if hi > side {
            side - hi
        } else if lo < -side {
            -side - lo
        } else {
            0.0
        }
    };
    Vec2::new(axis(min.x, max.x), axis(min.y, max.y))
}
