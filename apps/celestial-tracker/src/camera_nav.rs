//! Camera navigation: idle autorotate, user interaction and fly-to.
//!
//! The navigator is stepped once per tick by the tracker and is the only
//! writer of `CameraState`. Host input reaches it through the tracker's
//! input handling, never directly.

use glam::{Quat, Vec2, Vec3};
use skywatch_engine::{lerp_vec3, smoothing_factor};

use crate::body::{BodyClass, CelestialBody};
use crate::config::{CameraConfig, VantageConfig};

/// Where a flight ends: camera position, look target and the parking distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyTarget {
    pub position: Vec3,
    pub look: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub look_target: Vec3,
    pub pending_fly: Option<FlyTarget>,
    pub idle_elapsed: f32,
    pub is_user_interacting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    Idle { rotating: bool },
    Interacting,
    Flying,
}

impl NavMode {
    /// Numeric code carried in game events.
    pub fn code(self) -> f32 {
        match self {
            NavMode::Idle { rotating: false } => 0.0,
            NavMode::Idle { rotating: true } => 1.0,
            NavMode::Interacting => 2.0,
            NavMode::Flying => 3.0,
        }
    }
}

pub struct CameraNavigator {
    state: CameraState,
    config: CameraConfig,
    /// Pointer currently down.
    held: bool,
    /// Seconds left before a released interaction ends.
    cooldown: f32,
    last_goal: Option<FlyTarget>,
}

impl CameraNavigator {
    /// Idle at the default position, looking at the origin.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            state: CameraState {
                position: Vec3::from_array(config.default_position),
                look_target: Vec3::ZERO,
                pending_fly: None,
                idle_elapsed: 0.0,
                is_user_interacting: false,
            },
            config: config.clone(),
            held: false,
            cooldown: 0.0,
            last_goal: None,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn look_target(&self) -> Vec3 {
        self.state.look_target
    }

    /// Goal of the most recent focus, kept after arrival.
    pub fn last_goal(&self) -> Option<&FlyTarget> {
        self.last_goal.as_ref()
    }

    pub fn mode(&self) -> NavMode {
        if self.state.is_user_interacting {
            NavMode::Interacting
        } else if self.state.pending_fly.is_some() {
            NavMode::Flying
        } else {
            NavMode::Idle {
                rotating: self.state.idle_elapsed >= self.config.idle_threshold_s,
            }
        }
    }

    /// Planets hold still while the user has the camera.
    pub fn freezes_planets(&self) -> bool {
        self.state.is_user_interacting && self.state.idle_elapsed < self.config.idle_threshold_s
    }

    pub fn pointer_down(&mut self) {
        self.held = true;
        self.cooldown = 0.0;
        self.state.is_user_interacting = true;
        self.state.idle_elapsed = 0.0;
    }

    /// Release starts the cooldown; the interaction lasts until it runs out.
    pub fn pointer_up(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        self.cooldown = self.config.interaction_cooldown_s;
    }

    /// Orbit the camera around the look target by a pointer delta in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        if !self.held {
            return;
        }
        let offset = self.state.position - self.state.look_target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) - delta.x * self.config.orbit_sensitivity;
        let elevation = ((offset.y / radius).clamp(-1.0, 1.0).asin()
            + delta.y * self.config.orbit_sensitivity)
            .max(-self.config.max_elevation)
            .min(self.config.max_elevation);
        self.state.position = self.state.look_target
            + radius
                * Vec3::new(
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                    elevation.cos() * azimuth.cos(),
                );
        self.state.idle_elapsed = 0.0;
    }

    /// Move along the view line. Positive notches move closer.
    pub fn zoom(&mut self, notches: f32) {
        let offset = self.state.position - self.state.look_target;
        let distance = offset.length();
        if distance <= f32::EPSILON || !notches.is_finite() {
            return;
        }
        let scaled = (distance * (1.0 - self.config.zoom_step).powf(notches))
            .max(self.config.min_distance)
            .min(self.config.max_distance);
        self.state.position = self.state.look_target + offset / distance * scaled;
        self.state.idle_elapsed = 0.0;
    }

    /// Start (or replace) a flight. Overrides autorotate and ends any
    /// interaction in progress.
    pub fn focus(&mut self, target: FlyTarget) {
        self.state.pending_fly = Some(target);
        self.state.is_user_interacting = false;
        self.state.idle_elapsed = 0.0;
        self.held = false;
        self.cooldown = 0.0;
        self.last_goal = Some(target);
    }

    /// Shift the whole view by `delta`: camera, look target, pending goal and
    /// the remembered goal. Relative geometry is unchanged.
    pub fn translate(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO || !delta.is_finite() {
            return;
        }
        self.state.position += delta;
        self.state.look_target += delta;
        for goal in [&mut self.state.pending_fly, &mut self.last_goal]
            .into_iter()
            .flatten()
        {
            goal.position += delta;
            goal.look += delta;
        }
    }

    pub fn step(&mut self, dt: f32) {
        if self.state.is_user_interacting {
            self.state.idle_elapsed = 0.0;
            if !self.held {
                self.cooldown -= dt;
                if self.cooldown <= 0.0 {
                    self.cooldown = 0.0;
                    self.state.is_user_interacting = false;
                }
            }
            return;
        }

        if let Some(goal) = self.state.pending_fly {
            let f = smoothing_factor(self.config.fly_retention, dt);
            self.state.position = lerp_vec3(self.state.position, goal.position, f);
            self.state.look_target = lerp_vec3(self.state.look_target, goal.look, f);

            let eps = self.config.fly_epsilon;
            if self.state.position.distance(goal.position) < eps
                && self.state.look_target.distance(goal.look) < eps
            {
                self.state.position = goal.position;
                self.state.look_target = goal.look;
                self.state.pending_fly = None;
                self.state.idle_elapsed = 0.0;
            }
            return;
        }

        self.state.idle_elapsed += dt;
        if self.state.idle_elapsed >= self.config.idle_threshold_s {
            let turn = Quat::from_rotation_y(self.config.autorotate_speed * dt);
            let offset = self.state.position - self.state.look_target;
            self.state.position = self.state.look_target + turn * offset;
        }
    }
}

/// Parking spot in front of `body` at `position`.
///
/// Distance is `max(visual_radius * radius_factor, kind minimum)`. The
/// approach keeps the side the camera is already on, tilted upward; the
/// station is approached mostly along its orbit tangent around `home`.
pub fn vantage_for(
    body: &CelestialBody,
    position: Vec3,
    home: Vec3,
    camera: Vec3,
    config: &VantageConfig,
) -> FlyTarget {
    let class = body.class();
    let minimum = match class {
        BodyClass::Star => config.star_min,
        BodyClass::Planet => config.planet_min,
        BodyClass::Moon => config.moon_min,
        BodyClass::Satellite => config.satellite_min,
        BodyClass::GroundStation => config.ground_station_min,
        BodyClass::Asteroid => config.asteroid_min,
        BodyClass::Probe => config.probe_min,
    };
    let distance = (body.visual_radius * config.radius_factor).max(minimum);

    let toward_camera = (camera - position).normalize_or(Vec3::Z);
    let approach = match class {
        BodyClass::Satellite => {
            let radial = (position - home).normalize_or(Vec3::X);
            let tangent = Vec3::Y.cross(radial).normalize_or(Vec3::Z);
            let mix = config.station_tangent_mix.clamp(0.0, 1.0);
            tangent * mix + radial * (1.0 - mix)
        }
        _ => toward_camera,
    };
    let dir = (approach + Vec3::Y * config.elevation).normalize_or(Vec3::Y);

    FlyTarget {
        position: position + dir * distance,
        look: position,
        distance,
    }
}

/// The "origin" focus: default camera position looking at the origin.
pub fn origin_vantage(config: &CameraConfig) -> FlyTarget {
    let position = Vec3::from_array(config.default_position);
    FlyTarget {
        position,
        look: Vec3::ZERO,
        distance: position.length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyKind, StationFix};

    const DT: f32 = 0.016;

    fn nav() -> CameraNavigator {
        CameraNavigator::new(&CameraConfig::default())
    }

    fn target(x: f32) -> FlyTarget {
        FlyTarget {
            position: Vec3::new(x, 5.0, 10.0),
            look: Vec3::new(x, 0.0, 0.0),
            distance: 10.0,
        }
    }

    fn run_until_idle(nav: &mut CameraNavigator, max_ticks: usize) -> usize {
        for tick in 1..=max_ticks {
            nav.step(DT);
            if nav.state().pending_fly.is_none() {
                return tick;
            }
        }
        max_ticks + 1
    }

    #[test]
    fn starts_idle_at_default_position() {
        let n = nav();
        assert_eq!(n.mode(), NavMode::Idle { rotating: false });
        assert_eq!(n.position(), Vec3::new(0.0, 140.0, 360.0));
        assert_eq!(n.look_target(), Vec3::ZERO);
    }

    #[test]
    fn fly_to_converges_and_clears_pending_exactly_on_arrival() {
        let mut n = nav();
        let goal = target(100.0);
        n.focus(goal);
        assert_eq!(n.mode(), NavMode::Flying);

        let mut previous_gap = f32::MAX;
        for _ in 0..1000 {
            n.step(DT);
            let gap_pos = n.position().distance(goal.position);
            let gap_look = n.look_target().distance(goal.look);
            let arrived = gap_pos < 0.05 && gap_look < 0.05;
            assert_eq!(n.state().pending_fly.is_none(), arrived);
            assert!(gap_pos <= previous_gap);
            previous_gap = gap_pos;
            if arrived {
                break;
            }
        }
        assert!(n.state().pending_fly.is_none());
        assert_eq!(n.position(), goal.position);
        assert_eq!(n.look_target(), goal.look);
    }

    #[test]
    fn newer_focus_supersedes_current_flight() {
        let mut n = nav();
        n.focus(target(100.0));
        for _ in 0..10 {
            n.step(DT);
        }
        let second = target(-50.0);
        n.focus(second);
        assert!(run_until_idle(&mut n, 2000) <= 2000);
        assert_eq!(n.position(), second.position);
        assert_eq!(n.last_goal(), Some(&second));
    }

    #[test]
    fn interaction_suspends_flight_until_cooldown_ends() {
        let mut n = nav();
        n.focus(target(100.0));
        n.step(DT);
        n.pointer_down();
        assert_eq!(n.mode(), NavMode::Interacting);
        assert!(n.freezes_planets());

        let held_at = n.position();
        for _ in 0..50 {
            n.step(DT);
        }
        assert_eq!(n.position(), held_at);

        n.pointer_up();
        // Cooldown is 2 s; still interacting just before it runs out.
        for _ in 0..120 {
            n.step(DT);
        }
        assert_eq!(n.mode(), NavMode::Interacting);
        for _ in 0..10 {
            n.step(DT);
        }
        assert_eq!(n.mode(), NavMode::Flying);
        assert!(!n.freezes_planets());
    }

    #[test]
    fn focus_interrupts_interaction() {
        let mut n = nav();
        n.pointer_down();
        n.focus(target(3.0));
        assert_eq!(n.mode(), NavMode::Flying);
        // The stale pointer-up does not restart an interaction.
        n.pointer_up();
        n.step(DT);
        assert_eq!(n.mode(), NavMode::Flying);
    }

    #[test]
    fn autorotate_waits_for_idle_threshold_after_arrival() {
        let mut n = nav();
        let goal = target(20.0);
        n.focus(goal);
        run_until_idle(&mut n, 2000);
        assert_eq!(n.mode(), NavMode::Idle { rotating: false });

        // 9.6 s idle: not yet rotating, camera parked.
        for _ in 0..600 {
            n.step(DT);
        }
        assert_eq!(n.mode(), NavMode::Idle { rotating: false });
        assert_eq!(n.position(), goal.position);

        for _ in 0..100 {
            n.step(DT);
        }
        assert_eq!(n.mode(), NavMode::Idle { rotating: true });
        assert_ne!(n.position(), goal.position);
        let radius = goal.position.distance(goal.look);
        assert!((n.position().distance(n.look_target()) - radius).abs() < 1e-3);
        assert!((n.position().y - goal.position.y).abs() < 1e-4);
    }

    #[test]
    fn drag_orbits_and_clamps_elevation() {
        let mut n = nav();
        let radius = n.position().length();
        n.drag(Vec2::new(100.0, 0.0));
        assert_eq!(n.position(), Vec3::new(0.0, 140.0, 360.0));

        n.pointer_down();
        n.drag(Vec2::new(100.0, 0.0));
        assert!((n.position().length() - radius).abs() < 1e-2);
        assert!(n.position().x.abs() > 1.0);

        n.drag(Vec2::new(0.0, 10_000.0));
        let elevation = (n.position().y / n.position().length()).asin();
        assert!((elevation - 1.4).abs() < 1e-3);
    }

    #[test]
    fn zoom_respects_limits() {
        let mut n = nav();
        n.zoom(1.0);
        assert!((n.position().length() - 0.9 * 386.21).abs() < 0.5);
        n.zoom(-1000.0);
        assert!((n.position().length() - 3000.0).abs() < 1e-2);
        n.zoom(1000.0);
        assert!((n.position().length() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn vantage_distance_uses_kind_minimum() {
        let config = VantageConfig::default();
        let probe = CelestialBody {
            id: "voyager-1".into(),
            display_name: "Voyager 1".into(),
            kind: BodyKind::Probe {
                mission: "Interstellar".into(),
                launch_year: 1977,
                status: "active".into(),
                distance_au: 163.0,
                last_signal: String::new(),
                phase_deg: 0.0,
                ecliptic_latitude_deg: 0.0,
            },
            visual_radius: 0.3,
            color: [1.0; 3],
        };
        let at = Vec3::new(500.0, 0.0, 0.0);
        let v = vantage_for(&probe, at, Vec3::ZERO, Vec3::new(0.0, 0.0, 400.0), &config);
        assert!((v.distance - 2.0).abs() < 1e-6);
        assert!((v.position.distance(at) - 2.0).abs() < 1e-4);
        assert_eq!(v.look, at);
        assert!(v.position.y > 0.0);
    }

    #[test]
    fn station_vantage_is_mostly_tangential() {
        let config = VantageConfig::default();
        let station = CelestialBody {
            id: "iss".into(),
            display_name: "ISS".into(),
            kind: BodyKind::Satellite {
                fix: StationFix::new(0.0, 0.0, "test"),
                orbit_radius: 2.6,
            },
            visual_radius: 0.15,
            color: [1.0; 3],
        };
        let home = Vec3::new(62.0, 0.0, 0.0);
        let at = home + Vec3::new(2.6, 0.0, 0.0);
        let v = vantage_for(&station, at, home, Vec3::new(0.0, 100.0, 0.0), &config);
        let dir = (v.position - at).normalize();
        let radial = Vec3::X;
        assert!(dir.dot(radial).abs() < 0.5);
        assert!((v.distance - 1.2).abs() < 1e-6);
    }

    #[test]
    fn moving_goal_is_reached_where_it_ends_up() {
        let mut n = nav();
        n.focus(target(40.0));
        let step = Vec3::new(0.02, 0.0, -0.01);
        for _ in 0..400 {
            n.translate(step);
            n.step(DT);
        }
        let goal = *n.last_goal().unwrap();
        let moved = step * 400.0;
        assert!(goal.look.distance(Vec3::new(40.0, 0.0, 0.0) + moved) < 1e-3);
        assert!(n.state().pending_fly.is_none());
        assert!(n.look_target().distance(goal.look) < 0.05);
        assert!(n.position().distance(goal.position) < 0.05);
    }
}
