use bytemuck::{Pod, Zeroable};

/// Per-instance SDF render data, already projected to screen space.
/// Written to SharedArrayBuffer for the TypeScript SDF renderer.
/// 12 floats = 48 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SDFInstance {
    pub x: f32,
    pub y: f32,
    /// Screen-space radius in pixels.
    pub radius: f32,
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub shininess: f32,
    pub emissive: f32,
    /// View depth, for the host's own depth test.
    pub depth: f32,
    /// Shape code (0 = sphere, 1 = marker).
    pub shape: f32,
    /// Texture slot + 1, or 0 for untextured.
    pub extra: f32,
}

impl SDFInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Buffer of SDF instances, rebuilt every rendered frame.
pub struct SDFBuffer {
    instances: Vec<SDFInstance>,
    capacity: usize,
}

impl SDFBuffer {
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            capacity: max,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false (and drops it) once full.
    pub fn push(&mut self, instance: SDFInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances(&self) -> &[SDFInstance] {
        &self.instances
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for SDFBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdf_instance_is_48_bytes() {
        assert_eq!(std::mem::size_of::<SDFInstance>(), 48);
        assert_eq!(SDFInstance::FLOATS, 12);
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut buf = SDFBuffer::with_capacity(2);
        assert!(buf.push(SDFInstance::default()));
        assert!(buf.push(SDFInstance::default()));
        assert!(!buf.push(SDFInstance::default()));
        assert_eq!(buf.instance_count(), 2);
    }

    #[test]
    fn instances_cast_to_flat_floats() {
        let mut buf = SDFBuffer::new();
        buf.push(SDFInstance { x: 3.0, depth: 9.0, ..Default::default() });
        let floats: &[f32] = bytemuck::cast_slice(buf.instances());
        assert_eq!(floats.len(), SDFInstance::FLOATS);
        assert_eq!(floats[0], 3.0);
        assert_eq!(floats[9], 9.0);
    }
}
