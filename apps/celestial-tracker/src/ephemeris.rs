//! Epoch-based angular positions. Pure math, no engine dependencies.
//!
//! Uses f64 for angle bookkeeping (centuries × deg/century gets large) and
//! only drops to f32 when producing scene coordinates.

use glam::Vec3;

pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Circular-orbit elements for a planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElement {
    /// Mean longitude at the J2000 epoch, degrees.
    pub epoch_angle_deg: f64,
    /// Mean longitude rate, degrees per Julian century.
    pub rate_per_century: f64,
    /// Orbit radius in scene units.
    pub orbital_distance: f32,
    /// Axial tilt in degrees (display and ring plane only).
    pub axial_tilt: f32,
}

/// Convert days from J2000 to Julian centuries from J2000.
pub fn days_to_centuries(days: f64) -> f64 {
    days / DAYS_PER_CENTURY
}

/// Wrap an angle into `[0, 360)`. Non-finite input maps to 0.
fn wrap_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Mean longitude at `days_since_epoch`, in `[0, 360)`.
pub fn position_angle(epoch_angle_deg: f64, rate_per_century: f64, days_since_epoch: f64) -> f64 {
    wrap_degrees(epoch_angle_deg + rate_per_century * days_to_centuries(days_since_epoch))
}

/// Days for one full revolution at the given rate. Infinite for a zero rate.
pub fn orbital_period_days(rate_per_century: f64) -> f64 {
    (360.0 / rate_per_century * DAYS_PER_CENTURY).abs()
}

/// Simplified uniform motion for moons, asteroids and probes.
/// A negative period runs retrograde; a zero period stays at `phase_deg`.
pub fn periodic_angle(period_days: f64, phase_deg: f64, days: f64) -> f64 {
    if period_days == 0.0 {
        return wrap_degrees(phase_deg);
    }
    wrap_degrees(phase_deg + 360.0 * days / period_days)
}

/// Point on the ecliptic (XZ) plane at `angle_deg` and `radius`, Y up.
/// Angles run counter-clockwise seen from +Y, 0° on +X.
pub fn ecliptic_point(angle_deg: f64, radius: f32) -> Vec3 {
    let a = angle_deg.to_radians();
    Vec3::new(radius * a.cos() as f32, 0.0, -radius * a.sin() as f32)
}

/// Scene-space position of a planet on its circular orbit.
pub fn orbit_position(element: &OrbitalElement, days: f64) -> Vec3 {
    let angle = position_angle(element.epoch_angle_deg, element.rate_per_century, days);
    ecliptic_point(angle, element.orbital_distance)
}

/// Spherical to Cartesian around the origin: Y toward the north pole,
/// longitude 0 on +X, east toward -Z (same sense as `ecliptic_point`).
pub fn lat_lon_to_scene(lat_deg: f64, lon_deg: f64, radius: f32) -> Vec3 {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    let r = radius as f64;
    Vec3::new(
        (r * lat.cos() * lon.cos()) as f32,
        (r * lat.sin()) as f32,
        (-r * lat.cos() * lon.sin()) as f32,
    )
}

/// Inverse of `lat_lon_to_scene`. The origin maps to (0, 0).
pub fn scene_to_lat_lon(point: Vec3) -> (f64, f64) {
    let r = point.length() as f64;
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let lat = (point.y as f64 / r).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = (-point.z as f64).atan2(point.x as f64).to_degrees();
    (lat, lon)
}

/// Dates are computed within about a million years of J2000; further days
/// read as the nearest end of that range.
pub const DATE_RANGE_DAYS: f64 = 3.6e8;

/// Convert days from J2000 to (year, month, day).
/// J2000.0 = January 1, 2000, 12:00 TT (Julian Day 2451545.0).
/// Non-finite input reads as the epoch.
pub fn days_to_date(days: f64) -> (i32, u32, u32) {
    let days = if days.is_finite() {
        days.max(-DATE_RANGE_DAYS).min(DATE_RANGE_DAYS)
    } else {
        0.0
    };
    let jd = days + 2451545.0;
    let z = (jd + 0.5).floor() as i64;
    let a = if z < 2299161 {
        z
    } else {
        let alpha = ((z as f64 - 1867216.25) / 36524.25).floor() as i64;
        z + 1 + alpha - alpha / 4
    };
    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day = (b - d - (30.6001 * e as f64).floor() as i64) as u32;
    let month = if e < 14 { (e - 1) as u32 } else { (e - 13) as u32 };
    let year = if month > 2 { (c - 4716) as i32 } else { (c - 4715) as i32 };

    (year, month, day)
}
