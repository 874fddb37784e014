use std::collections::HashSet;

use skywatch_engine::{EngineContext, Entity, MeshComponent, SDFColor};

use crate::body::{BodyKind, CelestialBody, StationFix};
use crate::catalog::Catalogs;
use crate::config::TrackerConfig;
use crate::placement::{place_all, Epoch};
use crate::registry::{NodeRef, ObjectRegistry};

pub const STAR_ID: &str = "sun";

/// Bodies in spawn order plus the id lookup built alongside them.
/// `bodies[i]` is textured from slot `i`.
#[derive(Debug, Clone, Default)]
pub struct BuiltScene {
    pub bodies: Vec<CelestialBody>,
    pub registry: ObjectRegistry,
}

pub fn star() -> CelestialBody {
    CelestialBody {
        id: STAR_ID.to_string(),
        display_name: "Sun".to_string(),
        kind: BodyKind::Star { temperature_k: 5772.0 },
        visual_radius: 8.0,
        color: [1.0, 0.9, 0.5],
    }
}

pub fn station_body(fix: &StationFix, config: &TrackerConfig) -> CelestialBody {
    CelestialBody {
        id: config.station.id.clone(),
        display_name: config.station.name.clone(),
        kind: BodyKind::Satellite {
            fix: fix.clone(),
            orbit_radius: config.station.orbit_radius,
        },
        visual_radius: config.station.visual_radius,
        color: [0.9, 0.95, 1.0],
    }
}

/// Build every body from the catalogs, spawn one entity per body into
/// `ctx.scene` and register it. Duplicate ids and moons without a parent
/// planet are logged and skipped.
pub fn build_scene(
    catalogs: &Catalogs,
    station: &StationFix,
    config: &TrackerConfig,
    epoch: Epoch,
    ctx: &mut EngineContext,
) -> BuiltScene {
    let scale = &config.scale;
    let planet_ids: HashSet<&str> = catalogs.planets.iter().map(|p| p.id.as_str()).collect();

    let mut candidates = Vec::with_capacity(catalogs.len() + 2);
    candidates.push(star());
    candidates.extend(catalogs.planets.iter().map(|p| p.to_body(scale)));
    for moon in &catalogs.moons {
        if planet_ids.contains(moon.parent.as_str()) {
            candidates.push(moon.to_body(scale));
        } else {
            log::warn!("skipping moon {:?}: unknown parent {:?}", moon.id, moon.parent);
        }
    }
    candidates.push(station_body(station, config));
    candidates.extend(catalogs.ground_stations.iter().map(|g| g.to_body()));
    candidates.extend(catalogs.asteroids.iter().map(|a| a.to_body(scale)));
    candidates.extend(catalogs.probes.iter().map(|p| p.to_body()));

    let mut built = BuiltScene::default();
    let mut entities = Vec::with_capacity(candidates.len());
    for body in candidates {
        let node = NodeRef {
            entity: ctx.next_id(),
            body: built.bodies.len(),
        };
        if let Err(err) = built.registry.insert(&body.id, node) {
            log::warn!("skipping {}: {err}", body.display_name);
            continue;
        }
        entities.push(node.entity);
        built.bodies.push(body);
    }

    let placements = place_all(&built.bodies, epoch, config);
    for (slot, ((body, id), placed)) in built
        .bodies
        .iter()
        .zip(entities)
        .zip(placements)
        .enumerate()
    {
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag(body.id.as_str())
                .with_pos(placed.position)
                .with_rotation(placed.rotation)
                .with_mesh(mesh_for(body).with_texture(slot as u32))
                .with_label(body.display_name.as_str()),
        );
    }

    log::info!(
        "scene built: {} bodies ({} catalog entries)",
        built.bodies.len(),
        catalogs.len()
    );
    built
}

fn mesh_for(body: &CelestialBody) -> MeshComponent {
    let color = SDFColor::from_array(body.color);
    match &body.kind {
        BodyKind::Star { .. } => MeshComponent::sphere(body.visual_radius, color)
            .with_emissive(3.5)
            .with_shininess(8.0),
        BodyKind::Planet { .. } | BodyKind::Moon { .. } => {
            MeshComponent::sphere(body.visual_radius, color).with_shininess(16.0)
        }
        BodyKind::Satellite { .. }
        | BodyKind::GroundStation { .. }
        | BodyKind::Asteroid { .. }
        | BodyKind::Probe { .. } => MeshComponent::marker(body.visual_radius, color).with_emissive(0.6),
    }
}
