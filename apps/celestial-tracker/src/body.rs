use serde::Serialize;

pub use crate::ephemeris::OrbitalElement;

/// Ring geometry around a planet, as ratios of the planet's visual radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    pub inner: f32,
    pub outer: f32,
    pub color: [f32; 3],
}

/// Latest known position of the orbiting station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f32,
    /// Where this fix came from ("initial estimate", a feed name, ...).
    pub source: String,
}

impl StationFix {
    pub fn new(latitude: f64, longitude: f64, source: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            altitude_km: 420.0,
            source: source.into(),
        }
    }
}

/// Kind-specific detail. Each variant carries exactly what that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    Star {
        temperature_k: f32,
    },
    Planet {
        orbit: OrbitalElement,
        ring: Option<RingSpec>,
    },
    Moon {
        parent: String,
        period_days: f64,
        phase_deg: f64,
        orbit_radius: f32,
    },
    Satellite {
        fix: StationFix,
        orbit_radius: f32,
    },
    GroundStation {
        country: String,
        antennas: u32,
        missions: Vec<String>,
        latitude: f64,
        longitude: f64,
    },
    Asteroid {
        diameter_m: f32,
        speed_kms: f32,
        miss_distance_km: f32,
        hazardous: bool,
        period_days: f64,
        phase_deg: f64,
    },
    Probe {
        mission: String,
        launch_year: i32,
        status: String,
        distance_au: f32,
        last_signal: String,
        phase_deg: f64,
        ecliptic_latitude_deg: f64,
    },
}

/// Fieldless mirror of `BodyKind`, used in events and serialized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyClass {
    Star,
    Planet,
    Moon,
    Satellite,
    GroundStation,
    Asteroid,
    Probe,
}

impl BodyClass {
    /// Numeric code carried in game events.
    pub fn code(self) -> f32 {
        match self {
            BodyClass::Star => 0.0,
            BodyClass::Planet => 1.0,
            BodyClass::Moon => 2.0,
            BodyClass::Satellite => 3.0,
            BodyClass::GroundStation => 4.0,
            BodyClass::Asteroid => 5.0,
            BodyClass::Probe => 6.0,
        }
    }
}

/// A body in the tracked scene. `id` is also the tag of its scene entity.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub id: String,
    pub display_name: String,
    pub kind: BodyKind,
    pub visual_radius: f32,
    pub color: [f32; 3],
}

impl CelestialBody {
    pub fn class(&self) -> BodyClass {
        match self.kind {
            BodyKind::Star { .. } => BodyClass::Star,
            BodyKind::Planet { .. } => BodyClass::Planet,
            BodyKind::Moon { .. } => BodyClass::Moon,
            BodyKind::Satellite { .. } => BodyClass::Satellite,
            BodyKind::GroundStation { .. } => BodyClass::GroundStation,
            BodyKind::Asteroid { .. } => BodyClass::Asteroid,
            BodyKind::Probe { .. } => BodyClass::Probe,
        }
    }

    pub fn orbit(&self) -> Option<&OrbitalElement> {
        match &self.kind {
            BodyKind::Planet { orbit, .. } => Some(orbit),
            _ => None,
        }
    }

    pub fn ring(&self) -> Option<&RingSpec> {
        match &self.kind {
            BodyKind::Planet { ring, .. } => ring.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_follows_kind() {
        let body = CelestialBody {
            id: "dsn-goldstone".into(),
            display_name: "Goldstone".into(),
            kind: BodyKind::GroundStation {
                country: "USA".into(),
                antennas: 5,
                missions: vec![],
                latitude: 35.4,
                longitude: -116.9,
            },
            visual_radius: 0.1,
            color: [0.2, 0.9, 0.4],
        };
        assert_eq!(body.class(), BodyClass::GroundStation);
        assert!(body.orbit().is_none());
        assert_eq!(
            serde_json::to_string(&body.class()).unwrap(),
            "\"ground-station\""
        );
    }
}
