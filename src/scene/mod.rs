//! Renderer-facing output
//!
//! The simulation never draws. Each frame it hands the host a camera, a
//! projection and a flat list of instances to draw.

pub mod camera;
pub mod instance;
pub mod material;

pub use camera::Camera;
pub use instance::{DrawInstance, ShapeKind};
pub use material::{MaterialId, MaterialPalette};
