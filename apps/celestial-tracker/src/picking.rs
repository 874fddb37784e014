use glam::Vec2;
use skywatch_engine::{Camera3D, EntityId, Scene};

use crate::body::CelestialBody;
use crate::config::PickingConfig;
use crate::registry::ObjectRegistry;

/// What a completed press turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Click(Vec2),
    Drag,
}

/// Tracks one press from down to up and tells clicks from drags.
/// Travel is the farthest the pointer got from the down point, so a drag
/// that returns to where it started is still a drag.
#[derive(Debug, Clone)]
pub struct PointerGesture {
    threshold: f32,
    down: Option<Vec2>,
    last: Vec2,
    max_travel: f32,
}

impl PointerGesture {
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold: threshold_px,
            down: None,
            last: Vec2::ZERO,
            max_travel: 0.0,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.down.is_some()
    }

    /// Past the drag threshold for the current press.
    pub fn is_dragging(&self) -> bool {
        self.down.is_some() && self.max_travel > self.threshold
    }

    pub fn down(&mut self, at: Vec2) {
        self.down = Some(at);
        self.last = at;
        self.max_travel = 0.0;
    }

    /// Record a move. Returns the delta since the previous position once the
    /// press has become a drag.
    pub fn moved(&mut self, to: Vec2) -> Option<Vec2> {
        let start = self.down?;
        self.max_travel = self.max_travel.max(start.distance(to));
        let delta = to - self.last;
        self.last = to;
        self.is_dragging().then_some(delta)
    }

    /// Finish the press. `None` for an up without a matching down.
    pub fn up(&mut self, at: Vec2) -> Option<Gesture> {
        let start = self.down.take()?;
        let travel = self.max_travel.max(start.distance(at));
        self.max_travel = 0.0;
        if travel > self.threshold {
            Some(Gesture::Drag)
        } else {
            Some(Gesture::Click(at))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub id: String,
    pub entity: EntityId,
    /// Index into the body list.
    pub body: usize,
    /// Ray distance to the hit.
    pub distance: f32,
}

/// Cast a ray through `pointer` and return the nearest registered body whose
/// pick sphere it crosses.
pub fn pick(
    pointer: Vec2,
    registry: &ObjectRegistry,
    scene: &Scene,
    bodies: &[CelestialBody],
    camera: &Camera3D,
    config: &PickingConfig,
) -> Option<PickHit> {
    let ray = camera.screen_ray(pointer)?;

    let mut best: Option<PickHit> = None;
    for (id, node) in registry.iter() {
        let Some(entity) = scene.get(node.entity).filter(|e| e.active) else {
            continue;
        };
        let Some(body) = bodies.get(node.body) else {
            continue;
        };
        let radius = (body.visual_radius * config.pick_scale).max(config.min_pick_radius);
        let Some(t) = ray.intersect_sphere(entity.pos, radius) else {
            continue;
        };
        // Ties broken by id so the result does not depend on map order.
        let closer = match &best {
            None => true,
            Some(b) => t < b.distance || (t == b.distance && id < b.id.as_str()),
        };
        if closer {
            best = Some(PickHit {
                id: id.to_string(),
                entity: node.entity,
                body: node.body,
                distance: t,
            });
        }
    }
    best
}
