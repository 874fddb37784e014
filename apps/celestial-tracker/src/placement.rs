//! Where every body sits at a given simulated time.
//!
//! Placement is a pure function of the body list, the epoch and the config:
//! calling it twice with the same inputs yields the same positions.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::body::{BodyKind, CelestialBody};
use crate::config::TrackerConfig;
use crate::ephemeris::{ecliptic_point, lat_lon_to_scene, orbit_position, periodic_angle};

/// Ground stations sit slightly above the surface so they never z-fight it.
const SURFACE_LIFT: f32 = 1.02;

/// Simulated days used for spin display: one turn per this many days.
const SPIN_PERIOD_DAYS: f64 = 10.0;

/// Two clocks: `planet_days` stops while the user holds the camera, `days`
/// drives everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    pub days: f64,
    pub planet_days: f64,
}

impl Epoch {
    pub fn new(days: f64) -> Self {
        Self {
            days,
            planet_days: days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: f32,
}

/// Center and radius of the planet the near-home bodies are attached to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Home {
    pub position: Vec3,
    pub radius: f32,
}

impl Home {
    /// The origin with a unit radius, used when no home planet exists.
    pub const ORIGIN: Home = Home {
        position: Vec3::ZERO,
        radius: 1.0,
    };
}

/// Compute placements for `bodies`, index-aligned with the input.
pub fn place_all(bodies: &[CelestialBody], epoch: Epoch, config: &TrackerConfig) -> Vec<Placement> {
    let mut out = vec![
        Placement {
            position: Vec3::ZERO,
            rotation: 0.0,
        };
        bodies.len()
    ];

    // Star and planets first; everything else hangs off them.
    let mut planets: HashMap<&str, Vec3> = HashMap::new();
    for (i, body) in bodies.iter().enumerate() {
        match &body.kind {
            BodyKind::Star { .. } => {
                out[i].rotation = spin(epoch.days, SPIN_PERIOD_DAYS * 2.5);
            }
            BodyKind::Planet { orbit, .. } => {
                let position = orbit_position(orbit, epoch.planet_days);
                planets.insert(body.id.as_str(), position);
                out[i] = Placement {
                    position,
                    rotation: spin(epoch.planet_days, SPIN_PERIOD_DAYS),
                };
            }
            _ => {}
        }
    }

    let home = home_of(bodies, &planets, &config.scale.home_planet);

    for (i, body) in bodies.iter().enumerate() {
        let position = match &body.kind {
            BodyKind::Star { .. } | BodyKind::Planet { .. } => continue,
            BodyKind::Moon {
                parent,
                period_days,
                phase_deg,
                orbit_radius,
            } => {
                let center = planets.get(parent.as_str()).copied().unwrap_or(Vec3::ZERO);
                center + ecliptic_point(periodic_angle(*period_days, *phase_deg, epoch.days), *orbit_radius)
            }
            BodyKind::Satellite { fix, orbit_radius } => {
                home.position + lat_lon_to_scene(fix.latitude, fix.longitude, *orbit_radius)
            }
            BodyKind::GroundStation {
                latitude, longitude, ..
            } => home.position + lat_lon_to_scene(*latitude, *longitude, home.radius * SURFACE_LIFT),
            BodyKind::Asteroid {
                miss_distance_km,
                period_days,
                phase_deg,
                ..
            } => {
                let r = asteroid_orbit_radius(*miss_distance_km, home.radius, config);
                let flat = ecliptic_point(periodic_angle(*period_days, *phase_deg, epoch.days), r);
                // Tilted approach plane so asteroids do not all share the ecliptic.
                home.position + Vec3::new(flat.x, -0.25 * flat.z, flat.z)
            }
            BodyKind::Probe {
                distance_au,
                phase_deg,
                ecliptic_latitude_deg,
                ..
            } => {
                let r = distance_au.max(0.0).sqrt() * config.scale.au_scale;
                let angle = periodic_angle(config.scale.probe_period_days, *phase_deg, epoch.days);
                let lat = (*ecliptic_latitude_deg as f32).to_radians();
                ecliptic_point(angle, r * lat.cos()) + Vec3::Y * (r * lat.sin())
            }
        };
        out[i] = Placement {
            position,
            rotation: spin(epoch.days, SPIN_PERIOD_DAYS),
        };
    }

    out
}

/// Scene radius of an asteroid's approach orbit around the home planet.
pub fn asteroid_orbit_radius(miss_distance_km: f32, home_radius: f32, config: &TrackerConfig) -> f32 {
    let scaled = miss_distance_km / config.scale.asteroid_km_per_unit.max(f32::EPSILON);
    home_radius + scaled.min(config.scale.asteroid_max_radius)
}

/// Resolve the home planet from already-placed planets.
pub fn home_of(bodies: &[CelestialBody], planets: &HashMap<&str, Vec3>, home_id: &str) -> Home {
    let radius = bodies
        .iter()
        .find(|b| b.id == home_id && matches!(b.kind, BodyKind::Planet { .. }))
        .map(|b| b.visual_radius);
    match (planets.get(home_id), radius) {
        (Some(position), Some(radius)) => Home {
            position: *position,
            radius,
        },
        _ => Home::ORIGIN,
    }
}

/// Home planet as placed in `placements` (index-aligned with `bodies`).
pub fn home_in(bodies: &[CelestialBody], placements: &[Placement], home_id: &str) -> Home {
    bodies
        .iter()
        .zip(placements)
        .find(|(b, _)| b.id == home_id && matches!(b.kind, BodyKind::Planet { .. }))
        .map(|(b, p)| Home {
            position: p.position,
            radius: b.visual_radius,
        })
        .unwrap_or(Home::ORIGIN)
}

fn spin(days: f64, period_days: f64) -> f32 {
    ((days / period_days).rem_euclid(1.0) as f32) * TAU
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{OrbitalElement, StationFix};

    fn planet(id: &str, distance: f32, radius: f32) -> CelestialBody {
        CelestialBody {
            id: id.into(),
            display_name: id.into(),
            kind: BodyKind::Planet {
                orbit: OrbitalElement {
                    epoch_angle_deg: 0.0,
                    rate_per_century: 36000.0,
                    orbital_distance: distance,
                    axial_tilt: 0.0,
                },
                ring: None,
            },
            visual_radius: radius,
            color: [1.0; 3],
        }
    }

    fn station(lat: f64, lon: f64) -> CelestialBody {
        CelestialBody {
            id: "iss".into(),
            display_name: "ISS".into(),
            kind: BodyKind::Satellite {
                fix: StationFix::new(lat, lon, "test"),
                orbit_radius: 2.6,
            },
            visual_radius: 0.15,
            color: [1.0; 3],
        }
    }

    #[test]
    fn station_rides_home_planet() {
        let bodies = vec![planet("earth", 62.0, 1.4), station(0.0, 0.0)];
        let config = TrackerConfig::default();
        let placed = place_all(&bodies, Epoch::new(0.0), &config);
        let offset = placed[1].position - placed[0].position;
        assert!((offset - Vec3::new(2.6, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn station_uses_origin_without_home() {
        let bodies = vec![station(90.0, 0.0)];
        let placed = place_all(&bodies, Epoch::new(123.0), &TrackerConfig::default());
        assert!((placed[0].position - Vec3::new(0.0, 2.6, 0.0)).length() < 1e-4);
    }

    #[test]
    fn frozen_planet_clock_holds_planets_only() {
        let mut bodies = vec![planet("earth", 62.0, 1.4)];
        bodies.push(CelestialBody {
            id: "moon".into(),
            display_name: "Moon".into(),
            kind: BodyKind::Moon {
                parent: "earth".into(),
                period_days: 27.32,
                phase_deg: 0.0,
                orbit_radius: 4.0,
            },
            visual_radius: 0.4,
            color: [1.0; 3],
        });
        let config = TrackerConfig::default();
        let a = place_all(&bodies, Epoch { days: 10.0, planet_days: 10.0 }, &config);
        let b = place_all(&bodies, Epoch { days: 15.0, planet_days: 10.0 }, &config);
        assert_eq!(a[0].position, b[0].position);
        assert_ne!(a[1].position, b[1].position);
        assert!(((b[1].position - b[0].position).length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn placement_is_deterministic() {
        let bodies = vec![planet("earth", 62.0, 1.4), station(12.0, 34.0)];
        let config = TrackerConfig::default();
        let epoch = Epoch::new(9876.5);
        assert_eq!(place_all(&bodies, epoch, &config), place_all(&bodies, epoch, &config));
    }

    #[test]
    fn asteroid_radius_is_capped() {
        let config = TrackerConfig::default();
        assert!((asteroid_orbit_radius(5.0e6, 1.4, &config) - 6.4).abs() < 1e-4);
        assert!((asteroid_orbit_radius(9.0e9, 1.4, &config) - 41.4).abs() < 1e-4);
    }
}
