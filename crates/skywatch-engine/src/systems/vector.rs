//! Lyon-based line and overlay tessellation.
//!
//! Orbit paths, planetary rings and selection markers are drawn as 2D
//! strokes over the SDF bodies. World-space polylines are projected through
//! the camera first and split wherever they pass behind it.
//!
//! ```ignore
//! // In your Game::render():
//! ctx.vectors.stroke_world_polyline(&orbit_points, ctx.camera, 1.0, VectorColor::rgb(0.3, 0.4, 0.6));
//! ctx.vectors.stroke_circle(center, 24.0, 1.5, VectorColor::CYAN);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::renderer::camera::Camera3D;

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// RGBA color for vector drawing operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const ORANGE: Self = Self::rgb(1.0, 0.5, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        let c = self.color;
        VectorVertex { x: p.x, y: p.y, r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

struct StrokeVertexCtor {
    color: VectorColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        let c = self.color;
        VectorVertex { x: p.x, y: p.y, r: c.r, g: c.g, b: c.b, a: c.a }
    }
}

/// Lyon tessellators plus the flat triangle-list output buffer.
/// Cleared each rendered frame and refilled by drawing commands.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    max_vertices: usize,
    overflowed: bool,
}

impl VectorState {
    pub fn new() -> Self {
        Self::with_capacity(16384)
    }

    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(max_vertices * VectorVertex::FLOATS),
            max_vertices,
            overflowed: false,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// True if a shape was dropped this frame because the buffer was full.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Raw pointer to the flat float buffer (for SAB copy).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Flush indexed geometry as a triangle list. Whole shapes that would
    /// exceed the capacity are dropped rather than cut mid-triangle.
    fn flush_geometry(&mut self) {
        let incoming = self.geometry.indices.len();
        if self.vertex_count() + incoming > self.max_vertices {
            self.overflowed = true;
        } else {
            for idx in &self.geometry.indices {
                let v = &self.geometry.vertices[*idx as usize];
                self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
            }
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();

        let result = self.fill_tess.tessellate_path(
            &path,
            &FillOptions::tolerance(0.5),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );
        if result.is_ok() {
            self.flush_geometry();
        }
    }

    /// Stroke an open screen-space polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        self.stroke_points(points, false, width, color);
    }

    /// Stroke a closed screen-space polygon.
    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        self.stroke_points(points, true, width, color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, lyon::path::Winding::Positive);
        let path = builder.build();
        self.stroke_path(&path, width, color);
    }

    /// Project a world-space polyline and stroke each run of visible points.
    /// A point behind the camera breaks the line; `closed` joins last to first.
    pub fn stroke_world_polyline(
        &mut self,
        points: &[Vec3],
        camera: &Camera3D,
        closed: bool,
        width: f32,
        color: VectorColor,
    ) {
        let projected: Vec<Option<Vec2>> =
            points.iter().map(|p| camera.project(*p).map(|pr| pr.pos)).collect();

        if closed && !projected.is_empty() && projected.iter().all(Option::is_some) {
            let run: Vec<Vec2> = projected.into_iter().flatten().collect();
            self.stroke_polygon(&run, width, color);
            return;
        }

        let mut run: Vec<Vec2> = Vec::new();
        for p in projected {
            match p {
                Some(p) => run.push(p),
                None => {
                    self.stroke_polyline(&run, width, color);
                    run.clear();
                }
            }
        }
        self.stroke_polyline(&run, width, color);
    }

    fn stroke_points(&mut self, points: &[Vec2], closed: bool, width: f32, color: VectorColor) {
        if points.len() < 2 {
            return;
        }
        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(closed);
        let path = builder.build();
        self.stroke_path(&path, width, color);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(0.5).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );
        if result.is_ok() {
            self.flush_geometry();
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}
