use crate::api::types::{EntityId, GameEvent};
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;
#[cfg(feature = "vectors")]
use crate::systems::vector::VectorState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Upper bound on a single frame's delta in seconds (default: 0.1).
    /// Long stalls (tab switch, debugger) never produce a huge jump.
    pub max_frame_dt: f32,
    /// Initial viewport width in pixels.
    pub viewport_width: f32,
    /// Initial viewport height in pixels.
    pub viewport_height: f32,
    /// Maximum number of SDF instances (default: 1024).
    pub max_sdf_instances: usize,
    /// Maximum number of vector vertices (default: 65536).
    pub max_vector_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Frames per performance sample (default: 60).
    pub perf_window: u32,
    /// Average frame time above which decor quality is reduced (default: 25 ms).
    pub frame_budget_ms: f32,
    /// Highest quality-reduction level the game supports (default: 2).
    pub max_quality_level: u8,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            viewport_width: 800.0,
            viewport_height: 600.0,
            max_sdf_instances: 1024,
            max_vector_vertices: 65536,
            max_events: 32,
            perf_window: 60,
            frame_budget_ms: 25.0,
            max_quality_level: 2,
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 10000.0,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The per-frame tick. Drain commands, advance simulation, move the camera.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Per-frame timing handed to the game.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo {
    /// Clamped wall-clock delta in seconds.
    pub dt: f32,
    /// Number of ticks run so far.
    pub index: u64,
    /// Current quality-reduction level (0 = full detail).
    pub quality: u8,
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera3D,
    pub events: Vec<GameEvent>,
    pub frame: FrameInfo,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::from_config(&GameConfig::default())
    }

    /// Create a context whose camera matches the configured viewport and lens.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut camera = Camera3D::new(config.viewport_width, config.viewport_height);
        camera.fov_y = config.fov_y;
        camera.near = config.near;
        camera.far = config.far;
        Self {
            scene: Scene::with_capacity(config.max_sdf_instances),
            camera,
            events: Vec::with_capacity(config.max_events),
            frame: FrameInfo::default(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
/// Scene and camera are read-only here; only draw buffers are writable.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera3D,
    pub quality: u8,
    #[cfg(feature = "vectors")]
    pub vectors: &'a mut VectorState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_is_monotonic() {
        let mut ctx = EngineContext::new();
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_eq!(a, EntityId(1));
        assert_eq!(b, EntityId(2));
    }

    #[test]
    fn from_config_sizes_camera() {
        let config = GameConfig {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            far: 500.0,
            ..Default::default()
        };
        let ctx = EngineContext::from_config(&config);
        assert_eq!(ctx.camera.viewport_width, 1280.0);
        assert_eq!(ctx.camera.viewport_height, 720.0);
        assert_eq!(ctx.camera.far, 500.0);
    }

    #[test]
    fn clear_frame_data_drops_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent { kind: 1.0, a: 0.0, b: 0.0, c: 0.0 });
        assert_eq!(ctx.events.len(), 1);
        ctx.clear_frame_data();
        assert!(ctx.events.is_empty());
    }
}
