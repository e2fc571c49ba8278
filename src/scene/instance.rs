//! Instance data for shape draws

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use serde::{Deserialize, Serialize};

use super::material::MaterialId;

/// Which mesh a draw uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ShapeKind {
    Cube = 0,
    Sphere = 1,
    Wall = 2,
}

/// One shape draw: world transform, mesh and material
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    /// Column-major world transform
    pub model: [[f32; 4]; 4],
    pub shape: u32,
    pub material: u32,
    _pad: [u32; 2],
}

impl DrawInstance {
    pub fn new(model: Mat4, shape: ShapeKind, material: MaterialId) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            shape: shape as u32,
            material: material.0,
            _pad: [0; 2],
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_instance_layout() {
        // 16 floats + shape + material + padding, 16-byte aligned rows
        assert_eq!(std::mem::size_of::<DrawInstance>(), 80);
        let inst = DrawInstance::new(Mat4::IDENTITY, ShapeKind::Sphere, MaterialId(3));
        let bytes: &[u8] = bytemuck::bytes_of(&inst);
        assert_eq!(bytes.len(), 80);
    }

    #[test]
    fn test_transform_roundtrip() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, -3.0));
        let inst = DrawInstance::new(m, ShapeKind::Cube, MaterialId(0));
        assert_eq!(inst.transform(), m);
        assert_eq!(inst.shape, ShapeKind::Cube as u32);
    }
}
