/// RGB color for SDF rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SDFColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl SDFColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl Default for SDFColor {
    fn default() -> Self {
        Self { r: 0.6, g: 0.6, b: 0.8 }
    }
}

/// SDF shape primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SDFShape {
    /// Raymarched sphere with a world-space radius.
    Sphere { radius: f32 },
    /// Small screen-facing marker (ground stations, spacecraft).
    /// `radius` is still world-space so it shrinks with distance.
    Marker { radius: f32 },
}

impl SDFShape {
    /// Numeric shape code written into the instance buffer.
    pub fn code(&self) -> f32 {
        match self {
            SDFShape::Sphere { .. } => 0.0,
            SDFShape::Marker { .. } => 1.0,
        }
    }
}

/// Component for SDF-rendered meshes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: SDFShape,
    pub color: SDFColor,
    /// Phong specular exponent (default: 32.0).
    pub shininess: f32,
    /// HDR glow multiplier (default: 0.0, values > 0 push into EDR range).
    pub emissive: f32,
    /// Texture slot the host binds for this mesh, if any.
    pub texture: Option<u32>,
}

impl Default for MeshComponent {
    fn default() -> Self {
        Self {
            shape: SDFShape::Sphere { radius: 1.0 },
            color: SDFColor::default(),
            shininess: 32.0,
            emissive: 0.0,
            texture: None,
        }
    }
}

impl MeshComponent {
    pub fn new(shape: SDFShape, color: SDFColor) -> Self {
        Self {
            shape,
            color,
            ..Default::default()
        }
    }

    pub fn sphere(radius: f32, color: SDFColor) -> Self {
        Self::new(SDFShape::Sphere { radius }, color)
    }

    pub fn marker(radius: f32, color: SDFColor) -> Self {
        Self::new(SDFShape::Marker { radius }, color)
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_texture(mut self, slot: u32) -> Self {
        self.texture = Some(slot);
        self
    }

    pub fn radius(&self) -> f32 {
        match self.shape {
            SDFShape::Sphere { radius } | SDFShape::Marker { radius } => radius,
        }
    }
}
