use skywatch_engine::bridge::protocol::HEADER_FLOATS;
use skywatch_engine::{
    build_sdf_buffer, collect_labels, EngineContext, FrameClock, FrameCounts, FrameStats, Game,
    GameConfig, InputEvent, InputQueue, ProtocolLayout, RenderContext, SDFBuffer, ScreenLabel,
};
#[cfg(feature = "vectors")]
use skywatch_engine::VectorState;

/// Generic game runner that drives the engine loop.
///
/// Each concrete app creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see `export_game!`), because
/// wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    sdf_buffer: SDFBuffer,
    #[cfg(feature = "vectors")]
    vectors: VectorState,
    labels: Vec<ScreenLabel>,
    clock: FrameClock,
    stats: FrameStats,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    initialized: bool,
    visible: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            sdf_buffer: SDFBuffer::with_capacity(config.max_sdf_instances),
            #[cfg(feature = "vectors")]
            vectors: VectorState::with_capacity(config.max_vector_vertices),
            labels: Vec::new(),
            clock: FrameClock::new(config.max_frame_dt),
            stats: FrameStats::new(
                config.perf_window,
                config.frame_budget_ms,
                config.max_quality_level,
            ),
            layout,
            header: [0.0; HEADER_FLOATS],
            config,
            game,
            initialized: false,
            visible: true,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        if self.ctx.camera.has_viewport() {
            self.render();
        }
    }

    /// Push an input event; it is acted on at the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Drive one frame from a host timestamp (ms). The delta is derived
    /// from the previous timestamp and clamped.
    pub fn frame(&mut self, timestamp_ms: f64) {
        if !self.visible {
            return;
        }
        if let Some(dt) = self.clock.advance(timestamp_ms) {
            self.step(dt);
        }
    }

    /// Drive one frame with an explicit delta (seconds), clamped to `max_frame_dt`.
    pub fn tick(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        let dt = self.clock.clamp(dt);
        self.step(dt);
    }

    fn step(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();
        self.ctx.frame.dt = dt;
        self.ctx.frame.index += 1;

        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();

        if self.ctx.events.len() > self.config.max_events {
            log::warn!(
                "{} game events this frame, keeping first {}",
                self.ctx.events.len(),
                self.config.max_events
            );
            self.ctx.events.truncate(self.config.max_events);
        }

        // Degenerate viewport: nothing to project onto.
        if self.ctx.camera.has_viewport() {
            self.render();
        }

        if let Some(level) = self.stats.record(dt) {
            self.ctx.frame.quality = level;
        }
    }

    fn render(&mut self) {
        build_sdf_buffer(self.ctx.scene.iter(), &self.ctx.camera, &mut self.sdf_buffer);
        self.labels = collect_labels(self.ctx.scene.iter(), &self.ctx.camera);

        #[cfg(feature = "vectors")]
        self.vectors.clear();

        {
            let mut render_ctx = RenderContext {
                scene: &self.ctx.scene,
                camera: &self.ctx.camera,
                quality: self.ctx.frame.quality,
                #[cfg(feature = "vectors")]
                vectors: &mut self.vectors,
            };
            self.game.render(&mut render_ctx);
        }

        self.header = self.layout.header(&FrameCounts {
            frame: self.ctx.frame.index,
            sdf_instances: self.sdf_buffer.instance_count(),
            vector_vertices: self.vector_vertex_count() as usize,
            events: self.ctx.events.len(),
            viewport_width: self.ctx.camera.viewport_width,
            viewport_height: self.ctx.camera.viewport_height,
            quality: self.ctx.frame.quality,
        });
    }

    /// Page visibility. While hidden, frames are ignored and nothing
    /// accumulates; the first frame after showing is a fresh baseline.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.clock.resume();
        } else {
            self.clock.suspend();
        }
        log::info!("runner {}", if visible { "resumed" } else { "suspended" });
    }

    /// New viewport size. Only the projection changes; the scene is untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.ctx.camera.resize(width, height);
        self.config.viewport_width = width;
        self.config.viewport_height = height;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn labels(&self) -> &[ScreenLabel] {
        &self.labels
    }

    pub fn quality_level(&self) -> u8 {
        self.ctx.frame.quality
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn sdf_instances_ptr(&self) -> *const f32 {
        self.sdf_buffer.instances_ptr()
    }

    pub fn sdf_instance_count(&self) -> u32 {
        self.sdf_buffer.instance_count() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    #[cfg(not(feature = "vectors"))]
    pub fn vector_vertex_count(&self) -> u32 {
        0
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.camera.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.ctx.camera.viewport_height
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_sdf_instances(&self) -> u32 {
        self.layout.max_sdf_instances as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
