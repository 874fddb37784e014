pub mod camera;
pub mod ray;
pub mod sdf_instance;

pub use camera::{Camera3D, CameraUniform, Projection};
pub use ray::Ray;
pub use sdf_instance::{SDFBuffer, SDFInstance};
