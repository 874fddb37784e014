//! Static body catalogs and their JSON form.
//!
//! A document is parsed section by section and entry by entry: a malformed
//! entry (missing field, wrong type, non-finite number) is logged and
//! skipped, the rest of the document still loads.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::body::{BodyKind, CelestialBody, OrbitalElement, RingSpec};
use crate::config::ScaleConfig;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RingRecord {
    pub inner: f32,
    pub outer: f32,
    #[serde(default = "default_ring_color")]
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetRecord {
    pub id: String,
    pub name: String,
    /// Mean distance from the star in AU.
    pub distance_au: f32,
    pub epoch_angle_deg: f64,
    pub rate_per_century: f64,
    #[serde(default)]
    pub axial_tilt: f32,
    pub radius: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub ring: Option<RingRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoonRecord {
    pub id: String,
    pub name: String,
    /// Id of the planet this moon orbits.
    pub parent: String,
    /// Negative for retrograde moons.
    pub period_days: f64,
    #[serde(default)]
    pub phase_deg: f64,
    #[serde(default)]
    pub orbit_radius: Option<f32>,
    pub radius: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundStationRecord {
    pub id: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub antennas: u32,
    #[serde(default)]
    pub missions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AsteroidRecord {
    pub id: String,
    pub name: String,
    pub diameter_m: f32,
    pub speed_kms: f32,
    pub miss_distance_km: f32,
    #[serde(default)]
    pub hazardous: bool,
    #[serde(default)]
    pub period_days: Option<f64>,
    #[serde(default)]
    pub phase_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeRecord {
    pub id: String,
    pub name: String,
    pub mission: String,
    pub launch_year: i32,
    pub status: String,
    pub distance_au: f32,
    #[serde(default)]
    pub last_signal: String,
    #[serde(default)]
    pub phase_deg: f64,
    #[serde(default)]
    pub ecliptic_latitude_deg: f64,
}

/// Shared validation hook for every record type.
trait CatalogRecord: DeserializeOwned {
    fn id(&self) -> &str;
    fn validate(&self) -> Result<()>;
}

fn check_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("empty id");
    }
    Ok(())
}

fn check_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        bail!("{field} is not finite");
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    check_finite(field, value)?;
    if value <= 0.0 {
        bail!("{field} must be positive, got {value}");
    }
    Ok(())
}

impl CatalogRecord for PlanetRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_id(&self.id)?;
        check_positive("distance_au", self.distance_au as f64)?;
        check_finite("epoch_angle_deg", self.epoch_angle_deg)?;
        check_finite("rate_per_century", self.rate_per_century)?;
        check_finite("axial_tilt", self.axial_tilt as f64)?;
        check_positive("radius", self.radius as f64)?;
        if let Some(ring) = &self.ring {
            check_positive("ring.inner", ring.inner as f64)?;
            check_positive("ring.outer", ring.outer as f64)?;
            if ring.outer <= ring.inner {
                bail!("ring outer {} not beyond inner {}", ring.outer, ring.inner);
            }
        }
        Ok(())
    }
}

impl CatalogRecord for MoonRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_id(&self.id)?;
        check_id(&self.parent).context("parent")?;
        check_finite("period_days", self.period_days)?;
        check_finite("phase_deg", self.phase_deg)?;
        check_positive("radius", self.radius as f64)?;
        if let Some(r) = self.orbit_radius {
            check_positive("orbit_radius", r as f64)?;
        }
        Ok(())
    }
}

impl CatalogRecord for GroundStationRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_id(&self.id)?;
        check_finite("latitude", self.latitude)?;
        check_finite("longitude", self.longitude)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!("latitude {} out of range", self.latitude);
        }
        Ok(())
    }
}

impl CatalogRecord for AsteroidRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_id(&self.id)?;
        check_positive("diameter_m", self.diameter_m as f64)?;
        check_finite("speed_kms", self.speed_kms as f64)?;
        check_positive("miss_distance_km", self.miss_distance_km as f64)?;
        check_finite("phase_deg", self.phase_deg)?;
        if let Some(p) = self.period_days {
            check_finite("period_days", p)?;
        }
        Ok(())
    }
}

impl CatalogRecord for ProbeRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<()> {
        check_id(&self.id)?;
        check_positive("distance_au", self.distance_au as f64)?;
        check_finite("phase_deg", self.phase_deg)?;
        check_finite("ecliptic_latitude_deg", self.ecliptic_latitude_deg)?;
        Ok(())
    }
}

/// Raw document shape. Entries stay untyped so one bad record cannot fail
/// the whole section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCatalogs {
    planets: Vec<Value>,
    moons: Vec<Value>,
    ground_stations: Vec<Value>,
    asteroids: Vec<Value>,
    probes: Vec<Value>,
}

/// Every catalog the scene is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub planets: Vec<PlanetRecord>,
    pub moons: Vec<MoonRecord>,
    pub ground_stations: Vec<GroundStationRecord>,
    pub asteroids: Vec<AsteroidRecord>,
    pub probes: Vec<ProbeRecord>,
}

impl Catalogs {
    /// Parse a catalog document. Only a document that is not a JSON object
    /// of arrays is an error; bad entries inside it are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCatalogs = serde_json::from_str(json)?;
        Ok(Self {
            planets: parse_section("planets", raw.planets),
            moons: parse_section("moons", raw.moons),
            ground_stations: parse_section("ground_stations", raw.ground_stations),
            asteroids: parse_section("asteroids", raw.asteroids),
            probes: parse_section("probes", raw.probes),
        })
    }

    /// Built-in catalogs: the standard planets and the Moon.
    pub fn standard() -> Self {
        Self {
            planets: standard_planets(),
            moons: vec![MoonRecord {
                id: "moon".into(),
                name: "Moon".into(),
                parent: "earth".into(),
                period_days: 27.32,
                phase_deg: 0.0,
                orbit_radius: None,
                radius: 0.4,
                color: [0.7, 0.7, 0.7],
            }],
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.planets.len()
            + self.moons.len()
            + self.ground_stations.len()
            + self.asteroids.len()
            + self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_section<T: CatalogRecord>(section: &str, entries: Vec<Value>) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            match parse_entry::<T>(value).with_context(|| format!("{section}[{index}]")) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("skipping catalog entry: {err:#}");
                    None
                }
            }
        })
        .collect()
}

fn parse_entry<T: CatalogRecord>(value: Value) -> Result<T> {
    let record: T = serde_json::from_value(value).context("malformed record")?;
    record
        .validate()
        .with_context(|| format!("invalid record {:?}", record.id()))?;
    Ok(record)
}

/// The seven inner-to-Uranus planets, J2000 mean longitudes and rates.
pub fn standard_planets() -> Vec<PlanetRecord> {
    let planet = |id: &str, name: &str, au: f32, l0: f64, rate: f64, tilt: f32, radius: f32, color: [f32; 3]| {
        PlanetRecord {
            id: id.into(),
            name: name.into(),
            distance_au: au,
            epoch_angle_deg: l0,
            rate_per_century: rate,
            axial_tilt: tilt,
            radius,
            color,
            ring: None,
        }
    };
    vec![
        planet("mercury", "Mercury", 0.3871, 252.251, 149472.675, 0.03, 0.8, [0.6, 0.55, 0.5]),
        planet("venus", "Venus", 0.7233, 181.980, 58517.816, 177.4, 1.3, [0.9, 0.75, 0.4]),
        planet("earth", "Earth", 1.0, 100.464, 35999.373, 23.44, 1.4, [0.2, 0.4, 0.8]),
        planet("mars", "Mars", 1.5237, 355.453, 19140.300, 25.19, 1.0, [0.8, 0.3, 0.15]),
        planet("jupiter", "Jupiter", 5.2026, 34.351, 3034.906, 3.13, 4.0, [0.8, 0.7, 0.5]),
        PlanetRecord {
            ring: Some(RingRecord {
                inner: 1.3,
                outer: 2.3,
                color: [0.85, 0.78, 0.6],
            }),
            ..planet("saturn", "Saturn", 9.5549, 50.077, 1222.114, 26.73, 3.4, [0.85, 0.75, 0.5])
        },
        planet("uranus", "Uranus", 19.2185, 314.055, 428.467, 97.77, 2.2, [0.5, 0.75, 0.85]),
    ]
}

impl PlanetRecord {
    /// Body with its orbit radius compressed as sqrt(AU) x `au_scale`.
    pub fn to_body(&self, scale: &ScaleConfig) -> CelestialBody {
        CelestialBody {
            id: self.id.clone(),
            display_name: self.name.clone(),
            kind: BodyKind::Planet {
                orbit: OrbitalElement {
                    epoch_angle_deg: self.epoch_angle_deg,
                    rate_per_century: self.rate_per_century,
                    orbital_distance: self.distance_au.sqrt() * scale.au_scale,
                    axial_tilt: self.axial_tilt,
                },
                ring: self.ring.as_ref().map(|r| RingSpec {
                    inner: r.inner,
                    outer: r.outer,
                    color: r.color,
                }),
            },
            visual_radius: self.radius,
            color: self.color,
        }
    }
}

impl MoonRecord {
    pub fn to_body(&self, scale: &ScaleConfig) -> CelestialBody {
        CelestialBody {
            id: self.id.clone(),
            display_name: self.name.clone(),
            kind: BodyKind::Moon {
                parent: self.parent.clone(),
                period_days: self.period_days,
                phase_deg: self.phase_deg,
                orbit_radius: self.orbit_radius.unwrap_or(scale.moon_orbit_radius),
            },
            visual_radius: self.radius,
            color: self.color,
        }
    }
}

impl GroundStationRecord {
    pub fn to_body(&self) -> CelestialBody {
        CelestialBody {
            id: self.id.clone(),
            display_name: self.name.clone(),
            kind: BodyKind::GroundStation {
                country: self.country.clone(),
                antennas: self.antennas,
                missions: self.missions.clone(),
                latitude: self.latitude,
                longitude: self.longitude,
            },
            visual_radius: 0.12,
            color: [0.3, 0.95, 0.5],
        }
    }
}

impl AsteroidRecord {
    pub fn to_body(&self, scale: &ScaleConfig) -> CelestialBody {
        // Marker size grows with the log of the diameter.
        let visual_radius = (0.15 + 0.08 * (self.diameter_m.max(1.0)).log10()).min(0.6);
        let color = if self.hazardous {
            [0.95, 0.35, 0.25]
        } else {
            [0.7, 0.65, 0.55]
        };
        CelestialBody {
            id: self.id.clone(),
            display_name: self.name.clone(),
            kind: BodyKind::Asteroid {
                diameter_m: self.diameter_m,
                speed_kms: self.speed_kms,
                miss_distance_km: self.miss_distance_km,
                hazardous: self.hazardous,
                period_days: self.period_days.unwrap_or(scale.asteroid_period_days),
                phase_deg: self.phase_deg,
            },
            visual_radius,
            color,
        }
    }
}

impl ProbeRecord {
    pub fn to_body(&self) -> CelestialBody {
        CelestialBody {
            id: self.id.clone(),
            display_name: self.name.clone(),
            kind: BodyKind::Probe {
                mission: self.mission.clone(),
                launch_year: self.launch_year,
                status: self.status.clone(),
                distance_au: self.distance_au,
                last_signal: self.last_signal.clone(),
                phase_deg: self.phase_deg,
                ecliptic_latitude_deg: self.ecliptic_latitude_deg,
            },
            visual_radius: 0.3,
            color: [0.95, 0.85, 0.3],
        }
    }
}

fn default_color() -> [f32; 3] {
    [0.7, 0.7, 0.7]
}

fn default_ring_color() -> [f32; 3] {
    [0.85, 0.8, 0.65]
}
