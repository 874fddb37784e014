use std::f32::consts::TAU;

use glam::Vec3;
use skywatch_engine::{EngineContext, Entity, EntityId, MeshComponent, Rng, SDFColor, Scene};

use crate::config::StarfieldConfig;

pub const STAR_TAG: &str = "decor:star";

/// Background stars on a large sphere. Purely decorative: never registered,
/// never picked, and the first thing thinned out when frames run slow.
pub struct Starfield {
    entities: Vec<EntityId>,
    levels: Vec<usize>,
    visible: usize,
}

impl Starfield {
    /// Spawn the full-detail star set. Positions come from a seeded RNG, so
    /// every session gets the same sky.
    pub fn spawn(config: &StarfieldConfig, ctx: &mut EngineContext) -> Self {
        let full = config.levels.first().copied().unwrap_or(0);
        let mut rng = Rng::new(config.seed);
        let mut entities = Vec::with_capacity(full);

        for _ in 0..full {
            let z = rng.range(-1.0, 1.0);
            let phi = rng.range(0.0, TAU);
            let ring = (1.0 - z * z).max(0.0).sqrt();
            let dir = Vec3::new(ring * phi.cos(), z, ring * phi.sin());

            let brightness = rng.range(0.55, 1.0);
            let tint = rng.range(-0.08, 0.08);
            let color = SDFColor::new(brightness - tint, brightness, brightness + tint);
            let size = config.radius * rng.range(0.0008, 0.0018);

            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(STAR_TAG)
                    .with_pos(dir * config.radius)
                    .with_mesh(MeshComponent::marker(size, color).with_emissive(1.2)),
            );
            entities.push(id);
        }

        Self {
            entities,
            levels: config.levels.clone(),
            visible: full,
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Show the star count for quality `level` (0 = full). Levels past the
    /// configured list stay at the sparsest one. Returns true when the
    /// visible set changed.
    pub fn apply_quality(&mut self, level: u8, scene: &mut Scene) -> bool {
        let Some(last) = self.levels.len().checked_sub(1) else {
            return false;
        };
        let target = self.levels[(level as usize).min(last)].min(self.entities.len());
        if target == self.visible {
            return false;
        }
        for (i, id) in self.entities.iter().enumerate() {
            if let Some(entity) = scene.get_mut(*id) {
                entity.active = i < target;
            }
        }
        log::info!("starfield: {} -> {} stars (quality {level})", self.visible, target);
        self.visible = target;
        true
    }
}
