use glam::Vec3;
use skywatch_engine::{lerp_vec3, Easing};

use crate::body::{BodyKind, CelestialBody};
use crate::config::TrackerConfig;
use crate::placement::{asteroid_orbit_radius, Home, Placement};

/// A straight-line pass near the home planet. The line is stored relative
/// to the home planet so it follows the planet along its orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct Flyby {
    start: Vec3,
    end: Vec3,
    elapsed: f32,
    duration: f32,
}

impl Flyby {
    /// Line perpendicular to the asteroid's current bearing from home,
    /// passing at `miss_radius` from the home center.
    pub fn new(bearing: Vec3, miss_radius: f32, half_length: f32, duration: f32) -> Self {
        let radial = bearing.normalize_or(Vec3::X);
        let along = radial.cross(Vec3::Y).normalize_or(Vec3::Z);
        let closest = radial * miss_radius;
        Self {
            start: closest - along * half_length,
            end: closest + along * half_length,
            elapsed: 0.0,
            duration: duration.max(f32::EPSILON),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt) % self.duration;
    }

    /// Eased position along the pass, repeating every `duration` seconds.
    pub fn position(&self, home: Vec3) -> Vec3 {
        let t = Easing::SineInOut.apply(self.elapsed / self.duration);
        home + lerp_vec3(self.start, self.end, t)
    }

    pub fn path(&self, home: Vec3) -> [Vec3; 2] {
        [home + self.start, home + self.end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlybyToggle {
    Started,
    Stopped,
    /// Not an asteroid.
    Ignored,
}

/// Active flyby previews, keyed by body index.
#[derive(Debug, Clone, Default)]
pub struct Flybys {
    sweeps: Vec<(usize, Flyby)>,
}

impl Flybys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, body: usize) -> bool {
        self.sweeps.iter().any(|(b, _)| *b == body)
    }

    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    /// Start a preview for an asteroid at `position`, or stop the running
    /// one so it returns to its orbit.
    pub fn toggle(
        &mut self,
        index: usize,
        body: &CelestialBody,
        position: Vec3,
        home: Home,
        config: &TrackerConfig,
    ) -> FlybyToggle {
        let BodyKind::Asteroid {
            miss_distance_km, ..
        } = body.kind
        else {
            return FlybyToggle::Ignored;
        };
        if let Some(at) = self.sweeps.iter().position(|(b, _)| *b == index) {
            self.sweeps.swap_remove(at);
            return FlybyToggle::Stopped;
        }
        let radius = asteroid_orbit_radius(miss_distance_km, home.radius, config);
        self.sweeps.push((
            index,
            Flyby::new(
                position - home.position,
                radius,
                config.flyby.half_length,
                config.flyby.duration_s,
            ),
        ));
        FlybyToggle::Started
    }

    pub fn advance(&mut self, dt: f32) {
        for (_, sweep) in &mut self.sweeps {
            sweep.advance(dt);
        }
    }

    /// Replace orbit placements of swept asteroids with their flyby position.
    pub fn apply(&self, home: Vec3, placements: &mut [Placement]) {
        for (index, sweep) in &self.sweeps {
            if let Some(p) = placements.get_mut(*index) {
                p.position = sweep.position(home);
            }
        }
    }

    pub fn paths(&self, home: Vec3) -> impl Iterator<Item = [Vec3; 2]> + '_ {
        self.sweeps.iter().map(move |(_, sweep)| sweep.path(home))
    }
}
