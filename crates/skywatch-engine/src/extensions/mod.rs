// extensions/mod.rs
//
// Optional helpers decoupled from core Entity/Scene.
// Games opt in by calling them from their own update code.

pub mod easing;

pub use easing::{lerp, lerp_vec3, smoothing_factor, Easing};
