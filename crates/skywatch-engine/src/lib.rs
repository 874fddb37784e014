pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, FrameInfo, Game, GameConfig, RenderContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, SDFColor, SDFShape};
pub use crate::core::rng::Rng;
pub use crate::core::scene::Scene;
pub use crate::core::time::{FrameClock, FrameStats};
pub use input::queue::{CommandQueue, InputEvent, InputQueue};
pub use renderer::camera::{Camera3D, CameraUniform, Projection};
pub use renderer::ray::Ray;
pub use renderer::sdf_instance::{SDFBuffer, SDFInstance};
pub use bridge::protocol::{FrameCounts, ProtocolLayout};
pub use systems::sdf_render::{build_sdf_buffer, collect_labels, ScreenLabel};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorColor, VectorState, VectorVertex};

pub use extensions::{lerp, lerp_vec3, smoothing_factor, Easing};
