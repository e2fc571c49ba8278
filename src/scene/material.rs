//! Material handles and their colors
//!
//! Platforms carry a `MaterialId`; the renderer looks the color up here.

use serde::{Deserialize, Serialize};

use crate::hsv_to_rgb;

/// Handle into a `MaterialPalette`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Wall color (#fac91a)
const WALL_COLOR: [f32; 4] = [0.980, 0.788, 0.102, 1.0];
const PLAYER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const DEATH_COLOR: [f32; 4] = [0.85, 0.1, 0.1, 1.0];

/// Number of platform hues before the palette repeats
const PLATFORM_HUES: u32 = 12;

/// Fixed set of materials for the whole process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialPalette {
    colors: Vec<[f32; 4]>,
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialPalette {
    pub const WALL: MaterialId = MaterialId(0);
    pub const PLAYER: MaterialId = MaterialId(1);
    pub const DEATH: MaterialId = MaterialId(2);
    const FIRST_PLATFORM: u32 = 3;

    pub fn new() -> Self {
        let mut colors = vec![WALL_COLOR, PLAYER_COLOR, DEATH_COLOR];
        // Golden-ratio hue steps keep neighbours visually distinct
        for i in 0..PLATFORM_HUES {
            let hue = (i as f32 * 0.618_034).fract();
            let [r, g, b] = hsv_to_rgb(hue, 0.65, 0.95);
            colors.push([r, g, b, 1.0]);
        }
        Self { colors }
    }

    /// Material for the n-th generated platform
    pub fn platform(&self, n: u32) -> MaterialId {
        MaterialId(Self::FIRST_PLATFORM + n % PLATFORM_HUES)
    }

    /// RGBA color for a handle; unknown handles fall back to the player color
    pub fn color(&self, id: MaterialId) -> [f32; 4] {
        self.colors
            .get(id.0 as usize)
            .copied()
            .unwrap_or(PLAYER_COLOR)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
