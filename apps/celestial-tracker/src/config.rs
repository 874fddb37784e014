//! Tunables for the tracker. Every field has a default; JSON overrides only
//! need to name the values they change.

use serde::Deserialize;

/// Top-level tracker configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub camera: CameraConfig,
    pub vantage: VantageConfig,
    pub picking: PickingConfig,
    pub time: TimeConfig,
    pub scale: ScaleConfig,
    pub station: StationConfig,
    pub flyby: FlybyConfig,
    pub texture: TextureConfig,
    pub starfield: StarfieldConfig,
    /// Multiplier for the asteroid energy estimate (diameter × speed × k).
    pub energy_constant: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            vantage: VantageConfig::default(),
            picking: PickingConfig::default(),
            time: TimeConfig::default(),
            scale: ScaleConfig::default(),
            station: StationConfig::default(),
            flyby: FlybyConfig::default(),
            texture: TextureConfig::default(),
            starfield: StarfieldConfig::default(),
            energy_constant: 0.01,
        }
    }
}

impl TrackerConfig {
    /// Parse a (possibly partial) JSON override document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Camera navigation timing and limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Seconds without interaction before autorotate starts.
    pub idle_threshold_s: f32,
    /// Seconds after pointer-up during which the user still "owns" the camera.
    pub interaction_cooldown_s: f32,
    /// Arrival tolerance for fly-to, in scene units.
    pub fly_epsilon: f32,
    /// Fraction of the remaining fly-to gap kept per 60 Hz frame.
    pub fly_retention: f32,
    /// Autorotate angular speed in radians per second.
    pub autorotate_speed: f32,
    /// Pointer travel beyond which a press becomes a drag.
    pub drag_threshold_px: f32,
    /// Radians of orbit per dragged pixel.
    pub orbit_sensitivity: f32,
    /// Elevation clamp in radians.
    pub max_elevation: f32,
    /// Fractional distance change per wheel notch.
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Initial camera position, looking at the origin.
    pub default_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            idle_threshold_s: 10.0,
            interaction_cooldown_s: 2.0,
            fly_epsilon: 0.05,
            fly_retention: 0.9,
            autorotate_speed: 0.05,
            drag_threshold_px: 5.0,
            orbit_sensitivity: 0.005,
            max_elevation: 1.4,
            zoom_step: 0.1,
            min_distance: 0.5,
            max_distance: 3000.0,
            default_position: [0.0, 140.0, 360.0],
        }
    }
}

/// How far from a body the camera parks after a fly-to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VantageConfig {
    /// Vantage distance as a multiple of the body's visual radius.
    pub radius_factor: f32,
    pub star_min: f32,
    pub planet_min: f32,
    pub moon_min: f32,
    pub satellite_min: f32,
    pub ground_station_min: f32,
    pub asteroid_min: f32,
    pub probe_min: f32,
    /// Upward tilt mixed into the approach direction.
    pub elevation: f32,
    /// Share of the station approach taken along its orbit tangent (0..1).
    pub station_tangent_mix: f32,
}

impl Default for VantageConfig {
    fn default() -> Self {
        Self {
            radius_factor: 6.0,
            star_min: 60.0,
            planet_min: 8.0,
            moon_min: 3.0,
            satellite_min: 1.2,
            ground_station_min: 2.5,
            asteroid_min: 2.0,
            probe_min: 2.0,
            elevation: 0.35,
            station_tangent_mix: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Pick sphere radius as a multiple of visual radius.
    pub pick_scale: f32,
    /// Floor for the pick sphere so tiny markers stay clickable.
    pub min_pick_radius: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            pick_scale: 1.5,
            min_pick_radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulated days since J2000 at session start.
    pub start_day: f64,
    /// Simulated days per real second.
    pub days_per_second: f64,
    /// Speed requests are clamped to `±max_days_per_second`.
    pub max_days_per_second: f64,
}

impl TimeConfig {
    /// `days_per_second` held within `±max_days_per_second`. Non-finite
    /// speeds read as zero.
    pub fn limit_speed(&self, days_per_second: f64) -> f64 {
        if !days_per_second.is_finite() {
            return 0.0;
        }
        let max = self.max_days_per_second.abs();
        days_per_second.max(-max).min(max)
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_day: 9000.0,
            days_per_second: 1.0,
            max_days_per_second: 36525.0,
        }
    }
}

/// Mapping from physical quantities to scene units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Scene distance = sqrt(AU) × au_scale (compresses the outer system).
    pub au_scale: f32,
    /// Id of the planet the station, ground stations and asteroids belong to.
    pub home_planet: String,
    /// Kilometres of miss distance per scene unit.
    pub asteroid_km_per_unit: f32,
    /// Cap on an asteroid's approach orbit radius around the home planet.
    pub asteroid_max_radius: f32,
    pub asteroid_period_days: f64,
    pub probe_period_days: f64,
    /// Default moon orbit radius when the catalog gives none.
    pub moon_orbit_radius: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            au_scale: 62.0,
            home_planet: "earth".to_string(),
            asteroid_km_per_unit: 1.0e6,
            asteroid_max_radius: 40.0,
            asteroid_period_days: 30.0,
            probe_period_days: 73050.0,
            moon_orbit_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    /// Orbit radius around the home planet's center, in scene units.
    pub orbit_radius: f32,
    pub visual_radius: f32,
    /// Label for where station fixes come from.
    pub source: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            id: "iss".to_string(),
            name: "International Space Station".to_string(),
            orbit_radius: 2.6,
            visual_radius: 0.15,
            source: "initial estimate".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlybyConfig {
    /// Seconds for one sweep along the flyby line.
    pub duration_s: f32,
    /// Half the drawn flyby line length, in scene units.
    pub half_length: f32,
}

impl Default for FlybyConfig {
    fn default() -> Self {
        Self {
            duration_s: 12.0,
            half_length: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub radius: f32,
    /// Star counts per quality level, full detail first.
    pub levels: Vec<usize>,
    pub seed: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            radius: 2500.0,
            levels: vec![600, 300, 120],
            seed: 0x5eed_57a2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = TrackerConfig::from_json("{}").unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = TrackerConfig::from_json(
            r#"{ "camera": { "idle_threshold_s": 3.0 }, "energy_constant": 0.5 }"#,
        )
        .unwrap();
        assert_eq!(config.camera.idle_threshold_s, 3.0);
        assert_eq!(config.camera.interaction_cooldown_s, 2.0);
        assert_eq!(config.energy_constant, 0.5);
        assert_eq!(config.scale.home_planet, "earth");
    }

    #[test]
    fn speed_is_limited_both_ways() {
        let time = TimeConfig::default();
        assert_eq!(time.limit_speed(10.0), 10.0);
        assert_eq!(time.limit_speed(1e300), 36525.0);
        assert_eq!(time.limit_speed(-1e300), -36525.0);
        assert_eq!(time.limit_speed(f64::NAN), 0.0);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(TrackerConfig::from_json(r#"{ "camera": 5 }"#).is_err());
    }
}
