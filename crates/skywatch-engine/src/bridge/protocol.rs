//! SharedArrayBuffer layout.
//! Must stay in sync with TypeScript `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [SDF instances: max_sdf_instances × 12 floats]
//! [Vectors: max_vector_vertices × 6 floats]
//! [Events: max_events × 4 floats]
//! ```
//!
//! Capacities are written into the header every frame.
//! TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_SDF_INSTANCES: usize = 2;
pub const HEADER_SDF_INSTANCE_COUNT: usize = 3;
pub const HEADER_MAX_VECTOR_VERTICES: usize = 4;
pub const HEADER_VECTOR_VERTEX_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_VIEWPORT_WIDTH: usize = 8;
pub const HEADER_VIEWPORT_HEIGHT: usize = 9;
pub const HEADER_PROTOCOL_VERSION: usize = 10;
pub const HEADER_QUALITY_LEVEL: usize = 11;

pub const PROTOCOL_VERSION: f32 = 2.0;

/// Floats per SDF instance: x, y, radius, rotation, r, g, b, shininess, emissive, depth, shape, extra.
pub const SDF_INSTANCE_FLOATS: usize = 12;

/// Floats per vector vertex: x, y, r, g, b, a (fixed wire format).
pub const VECTOR_VERTEX_FLOATS: usize = 6;

/// Floats per game event: kind, a, b, c (fixed wire format).
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_sdf_instances: usize,
    pub max_vector_vertices: usize,
    pub max_events: usize,

    pub sdf_data_floats: usize,
    pub vector_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where SDF data begins.
    pub sdf_data_offset: usize,
    /// Offset (in floats) where vector data begins.
    pub vector_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    pub buffer_total_floats: usize,
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_sdf_instances: usize, max_vector_vertices: usize, max_events: usize) -> Self {
        let sdf_data_floats = max_sdf_instances * SDF_INSTANCE_FLOATS;
        let vector_data_floats = max_vector_vertices * VECTOR_VERTEX_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let sdf_data_offset = HEADER_FLOATS;
        let vector_data_offset = sdf_data_offset + sdf_data_floats;
        let event_data_offset = vector_data_offset + vector_data_floats;
        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_sdf_instances,
            max_vector_vertices,
            max_events,
            sdf_data_floats,
            vector_data_floats,
            event_data_floats,
            sdf_data_offset,
            vector_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_sdf_instances,
            config.max_vector_vertices,
            config.max_events,
        )
    }

    /// Fill a header block for the current frame.
    pub fn header(&self, frame: &FrameCounts) -> [f32; HEADER_FLOATS] {
        let mut h = [0.0; HEADER_FLOATS];
        h[HEADER_FRAME_COUNTER] = frame.frame as f32;
        h[HEADER_MAX_SDF_INSTANCES] = self.max_sdf_instances as f32;
        h[HEADER_SDF_INSTANCE_COUNT] = frame.sdf_instances.min(self.max_sdf_instances) as f32;
        h[HEADER_MAX_VECTOR_VERTICES] = self.max_vector_vertices as f32;
        h[HEADER_VECTOR_VERTEX_COUNT] = frame.vector_vertices.min(self.max_vector_vertices) as f32;
        h[HEADER_MAX_EVENTS] = self.max_events as f32;
        h[HEADER_EVENT_COUNT] = frame.events.min(self.max_events) as f32;
        h[HEADER_VIEWPORT_WIDTH] = frame.viewport_width;
        h[HEADER_VIEWPORT_HEIGHT] = frame.viewport_height;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_QUALITY_LEVEL] = frame.quality as f32;
        h
    }
}

/// Per-frame counts written into the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCounts {
    pub frame: u64,
    pub sdf_instances: usize,
    pub vector_vertices: usize,
    pub events: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub quality: u8,
}
