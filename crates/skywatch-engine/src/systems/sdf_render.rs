use serde::Serialize;

use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::renderer::camera::Camera3D;
use crate::renderer::sdf_instance::{SDFBuffer, SDFInstance};

/// Screen-space label for an entity, consumed by the DOM overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenLabel {
    pub entity: EntityId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Project every active mesh entity and fill the SDF buffer, sorted
/// back-to-front (painter's algorithm). Entities behind the camera are skipped.
pub fn build_sdf_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &Camera3D,
    buffer: &mut SDFBuffer,
) {
    buffer.clear();

    let mut items: Vec<SDFInstance> = entities
        .filter(|e| e.active)
        .filter_map(|entity| {
            let mesh = entity.mesh.as_ref()?;
            let proj = camera.project(entity.pos)?;
            Some(SDFInstance {
                x: proj.pos.x,
                y: proj.pos.y,
                radius: mesh.radius() * proj.scale,
                rotation: entity.rotation,
                r: mesh.color.r,
                g: mesh.color.g,
                b: mesh.color.b,
                shininess: mesh.shininess,
                emissive: mesh.emissive,
                depth: proj.depth,
                shape: mesh.shape.code(),
                extra: mesh.texture.map(|slot| slot as f32 + 1.0).unwrap_or(0.0),
            })
        })
        .collect();

    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    for instance in items {
        if !buffer.push(instance) {
            log::warn!("SDF buffer full, dropping remaining instances");
            break;
        }
    }
}

/// Project the labels of active entities into screen space.
pub fn collect_labels<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &Camera3D,
) -> Vec<ScreenLabel> {
    entities
        .filter(|e| e.active)
        .filter_map(|entity| {
            let text = entity.label.as_ref()?;
            let proj = camera.project(entity.pos)?;
            Some(ScreenLabel {
                entity: entity.id,
                text: text.clone(),
                // Sit just above the body's silhouette.
                x: proj.pos.x,
                y: proj.pos.y - entity.radius() * proj.scale,
                depth: proj.depth,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mesh::{MeshComponent, SDFColor};
    use glam::Vec3;

    fn camera() -> Camera3D {
        let mut cam = Camera3D::new(800.0, 600.0);
        cam.look_at(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO);
        cam
    }

    #[test]
    fn projects_mesh_entity() {
        let entity = Entity::new(EntityId(1))
            .with_mesh(
                MeshComponent::sphere(5.0, SDFColor::new(1.0, 0.0, 0.0))
                    .with_shininess(64.0)
                    .with_emissive(0.5)
                    .with_texture(2),
            );
        let entities = vec![entity];
        let mut buffer = SDFBuffer::new();
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);

        assert_eq!(buffer.instance_count(), 1);
        let inst = buffer.instances()[0];
        assert!((inst.x - 400.0).abs() < 1e-3);
        assert!((inst.y - 300.0).abs() < 1e-3);
        assert!((inst.depth - 100.0).abs() < 1e-3);
        assert!(inst.radius > 0.0);
        assert_eq!(inst.r, 1.0);
        assert_eq!(inst.shininess, 64.0);
        assert_eq!(inst.emissive, 0.5);
        assert_eq!(inst.extra, 3.0);
    }

    #[test]
    fn skips_inactive_meshless_and_behind() {
        let e1 = Entity::new(EntityId(1));
        let mut e2 = Entity::new(EntityId(2)).with_mesh(MeshComponent::default());
        e2.active = false;
        let e3 = Entity::new(EntityId(3))
            .with_pos(Vec3::new(0.0, 0.0, 200.0))
            .with_mesh(MeshComponent::default());
        let e4 = Entity::new(EntityId(4)).with_mesh(MeshComponent::default());

        let entities = vec![e1, e2, e3, e4];
        let mut buffer = SDFBuffer::new();
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);
        assert_eq!(buffer.instance_count(), 1);
    }

    #[test]
    fn sorted_back_to_front() {
        let near = Entity::new(EntityId(1))
            .with_pos(Vec3::new(0.0, 0.0, 50.0))
            .with_mesh(MeshComponent::default());
        let far = Entity::new(EntityId(2))
            .with_pos(Vec3::new(0.0, 0.0, -50.0))
            .with_mesh(MeshComponent::default());
        let entities = vec![near, far];
        let mut buffer = SDFBuffer::new();
        build_sdf_buffer(entities.iter(), &camera(), &mut buffer);

        let depths: Vec<f32> = buffer.instances().iter().map(|i| i.depth).collect();
        assert!(depths[0] > depths[1]);
    }

    #[test]
    fn labels_only_for_labelled_visible_entities() {
        let a = Entity::new(EntityId(1))
            .with_label("Mars")
            .with_mesh(MeshComponent::sphere(2.0, SDFColor::default()));
        let b = Entity::new(EntityId(2)).with_mesh(MeshComponent::default());
        let c = Entity::new(EntityId(3))
            .with_pos(Vec3::new(0.0, 0.0, 300.0))
            .with_label("Behind");
        let entities = vec![a, b, c];
        let labels = collect_labels(entities.iter(), &camera());

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Mars");
        assert!(labels[0].y < 300.0);
    }
}
