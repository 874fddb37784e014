use glam::Vec3;
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// Fat Entity: a single struct with optional components.
/// Designed for simplicity over ECS purity: a handful of celestial bodies
/// plus decor, not millions of objects.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name (games store their own ids here).
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Spin about the entity's own axis, in radians.
    pub rotation: f32,
    /// SDF mesh (optional; entities without meshes are invisible).
    pub mesh: Option<MeshComponent>,
    /// Screen label text (optional, projected alongside the mesh).
    pub label: Option<String>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: 0.0,
            mesh: None,
            label: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// World-space radius of the mesh, or 0.0 for mesh-less entities.
    pub fn radius(&self) -> f32 {
        self.mesh.map(|m| m.radius()).unwrap_or(0.0)
    }
}
