use std::fmt::Display;

use glam::Vec3;
use serde::Serialize;

use crate::body::{BodyClass, BodyKind, CelestialBody};
use crate::config::TrackerConfig;
use crate::ephemeris::{orbital_period_days, position_angle};

/// Light travel time across one AU, in seconds.
const LIGHT_SECONDS_PER_AU: f32 = 499.005;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

/// What the UI shows for the selected body. Facts keep their order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRecord {
    pub kind: BodyClass,
    pub name: String,
    pub id: String,
    pub facts: Vec<Fact>,
}

impl SelectionRecord {
    fn new(body: &CelestialBody) -> Self {
        Self {
            kind: body.class(),
            name: body.display_name.clone(),
            id: body.id.clone(),
            facts: Vec::new(),
        }
    }

    fn fact(mut self, label: &str, value: impl Display) -> Self {
        self.facts.push(Fact {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::warn!("selection {} not serializable: {err}", self.id);
            "null".to_string()
        })
    }
}

/// Scene facts a description may need beyond the body itself.
pub struct FactContext<'a> {
    pub home_position: Vec3,
    pub planet_days: f64,
    pub bodies: &'a [CelestialBody],
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Undo the sqrt(AU) distance compression.
fn scene_to_au(distance: f32, au_scale: f32) -> f32 {
    let r = distance / au_scale.max(f32::EPSILON);
    r * r
}

pub fn describe(
    body: &CelestialBody,
    node_position: Vec3,
    ctx: &FactContext,
    config: &TrackerConfig,
) -> SelectionRecord {
    let record = SelectionRecord::new(body);
    let au_scale = config.scale.au_scale;

    match &body.kind {
        BodyKind::Star { temperature_k } => record
            .fact("Type", "Main-sequence star")
            .fact("Surface temperature", format!("{temperature_k:.0} K"))
            .fact(
                "Distance to home planet",
                format!(
                    "{:.3} AU",
                    scene_to_au(node_position.distance(ctx.home_position), au_scale)
                ),
            ),
        BodyKind::Planet { orbit, ring } => {
            let longitude =
                position_angle(orbit.epoch_angle_deg, orbit.rate_per_century, ctx.planet_days);
            record
                .fact(
                    "Orbital distance",
                    format!("{:.2} AU", scene_to_au(orbit.orbital_distance, au_scale)),
                )
                .fact(
                    "Orbital period",
                    format!("{:.1} days", orbital_period_days(orbit.rate_per_century)),
                )
                .fact("Current longitude", format!("{longitude:.1}°"))
                .fact("Axial tilt", format!("{:.1}°", orbit.axial_tilt))
                .fact("Rings", yes_no(ring.is_some()))
        }
        BodyKind::Moon {
            parent,
            period_days,
            ..
        } => {
            let parent_name = ctx
                .bodies
                .iter()
                .find(|b| &b.id == parent)
                .map(|b| b.display_name.as_str())
                .unwrap_or(parent.as_str());
            let period = if *period_days < 0.0 {
                format!("{:.2} days (retrograde)", period_days.abs())
            } else {
                format!("{period_days:.2} days")
            };
            record
                .fact("Parent", parent_name)
                .fact("Orbital period", period)
        }
        BodyKind::Satellite { fix, .. } => record
            .fact("Latitude", format!("{:.2}°", fix.latitude))
            .fact("Longitude", format!("{:.2}°", fix.longitude))
            .fact("Altitude", format!("{:.0} km", fix.altitude_km))
            .fact("Last update", &fix.source),
        BodyKind::GroundStation {
            country,
            antennas,
            missions,
            ..
        } => {
            let missions = if missions.is_empty() {
                "None".to_string()
            } else {
                missions.join(", ")
            };
            record
                .fact("Country", country)
                .fact("Antennas", antennas)
                .fact("Active missions", missions)
        }
        BodyKind::Asteroid {
            diameter_m,
            speed_kms,
            miss_distance_km,
            hazardous,
            ..
        } => {
            let energy = diameter_m * speed_kms * config.energy_constant;
            record
                .fact("Diameter", format!("{diameter_m:.0} m"))
                .fact("Speed", format!("{speed_kms:.1} km/s"))
                .fact("Miss distance", format!("{miss_distance_km:.0} km"))
                .fact("Potentially hazardous", yes_no(*hazardous))
                .fact("Energy estimate", format!("{energy:.1}"))
        }
        BodyKind::Probe {
            mission,
            launch_year,
            status,
            distance_au,
            last_signal,
            ..
        } => {
            let light_hours = distance_au * LIGHT_SECONDS_PER_AU / 3600.0;
            let last_signal = if last_signal.is_empty() {
                "Unknown"
            } else {
                last_signal.as_str()
            };
            record
                .fact("Mission", mission)
                .fact("Launched", launch_year)
                .fact("Status", status)
                .fact("Distance", format!("{distance_au:.1} AU"))
                .fact("Light time", format!("{light_hours:.1} h"))
                .fact("Last signal", last_signal)
        }
    }
}
