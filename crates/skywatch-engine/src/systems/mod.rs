pub mod sdf_render;
#[cfg(feature = "vectors")]
pub mod vector;
