#[cfg(feature = "vectors")]
use glam::Quat;
use glam::{Vec2, Vec3};
use skywatch_engine::*;

use crate::body::{BodyKind, CelestialBody, StationFix};
use crate::camera_nav::{origin_vantage, vantage_for, CameraNavigator, NavMode};
use crate::catalog::Catalogs;
use crate::config::TrackerConfig;
use crate::decor::Starfield;
use crate::ephemeris::days_to_date;
use crate::flyby::{FlybyToggle, Flybys};
use crate::picking::{pick, Gesture, PointerGesture};
use crate::placement::{home_in, place_all, Epoch, Home, Placement};
use crate::registry::ObjectRegistry;
use crate::scene_builder::build_scene;
use crate::selection::{describe, FactContext};
use crate::texture::{generate_texture_sized, resolve_texture, TextureImage};

// ── Custom input kinds (TypeScript → Rust) ──────────────────────────
pub const CUSTOM_SET_SPEED: u32 = 1;
pub const CUSTOM_TOGGLE_PAUSE: u32 = 2;
pub const CUSTOM_FOCUS_ORIGIN: u32 = 3;
pub const CUSTOM_CLEAR_SELECTION: u32 = 4;
pub const CUSTOM_SET_STATION: u32 = 5;

// ── Key codes ────────────────────────────────────────────────────────
const KEY_ESCAPE: u32 = 27;
const KEY_SPACE: u32 = 32;
const KEY_HOME: u32 = 36;

// ── Game events (Rust → TypeScript) ──────────────────────────────────
/// a = simulated days, b = days per second, c = paused flag.
pub const EVENT_TIME_INFO: f32 = 1.0;
/// a = year, b = month, c = day. Emitted when the date changes.
pub const EVENT_DATE_INFO: f32 = 2.0;
/// a = body class code (-1 when cleared), b = body index. Read the details
/// with `tracker_selection_json`.
pub const EVENT_SELECTION_CHANGED: f32 = 3.0;
/// a = `NavMode::code`.
pub const EVENT_NAV_MODE: f32 = 4.0;
/// a = quality level, b = visible background stars.
pub const EVENT_QUALITY: f32 = 5.0;
/// a = body index, b = 1 started / 0 stopped.
pub const EVENT_FLYBY: f32 = 6.0;

// ── Drawing ──────────────────────────────────────────────────────────
#[cfg(feature = "vectors")]
const ORBIT_SAMPLES: usize = 96;
#[cfg(feature = "vectors")]
const ORBIT_LINE_WIDTH: f32 = 1.0;
#[cfg(feature = "vectors")]
const ORBIT_ALPHA: f32 = 0.25;
#[cfg(feature = "vectors")]
const RING_BANDS: usize = 3;
#[cfg(feature = "vectors")]
const RING_ALPHA: f32 = 0.35;
#[cfg(feature = "vectors")]
const SELECT_RING_COLOR: VectorColor = VectorColor::new(1.0, 1.0, 1.0, 0.6);
#[cfg(feature = "vectors")]
const SELECT_RING_WIDTH: f32 = 1.5;
#[cfg(feature = "vectors")]
const SELECT_RING_GAP_PX: f32 = 6.0;
#[cfg(feature = "vectors")]
const FLYBY_COLOR: VectorColor = VectorColor::ORANGE.with_alpha(0.7);

/// Focus request from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusTarget {
    Origin,
    Body(String),
}

impl FocusTarget {
    /// `"origin"` (any case) is the coordinate origin; anything else is a body id.
    pub fn parse(id: &str) -> Self {
        if id.trim().eq_ignore_ascii_case("origin") {
            FocusTarget::Origin
        } else {
            FocusTarget::Body(id.trim().to_string())
        }
    }
}

/// Requests from the UI, queued and applied at the start of the next tick.
#[derive(Debug, Clone)]
pub enum TrackerCommand {
    FocusOn(FocusTarget),
    /// Start or stop an asteroid flyby preview.
    ToggleSimulation(String),
    SetStation { latitude: f64, longitude: f64 },
    SetSpeed(f64),
    TogglePause,
    ClearSelection,
    /// Externally fetched surface for a body, or why it could not be fetched.
    SetTexture {
        id: String,
        image: Result<TextureImage, String>,
    },
    ReplaceCatalogs(Catalogs),
    Configure(Box<TrackerConfig>),
}

/// Everything that lives for one scene: built bodies, their lookup, the
/// camera machine and per-scene caches. Rebuilt when catalogs or config change.
pub struct SceneSessionState {
    bodies: Vec<CelestialBody>,
    registry: ObjectRegistry,
    nav: CameraNavigator,
    gesture: PointerGesture,
    starfield: Starfield,
    flybys: Flybys,
    textures: Vec<TextureImage>,
    epoch: Epoch,
    placements: Vec<Placement>,
    home: Home,
    selected: Option<usize>,
    /// Body the camera travels with, and where it was last placed.
    followed: Option<(usize, Vec3)>,
    last_date: Option<(i32, u32, u32)>,
    last_mode: Option<NavMode>,
    last_quality: u8,
}

impl SceneSessionState {
    /// Fly to a body and select it, or back to the origin view with nothing
    /// selected. Unknown ids change nothing.
    fn focus(&mut self, target: &FocusTarget, config: &TrackerConfig, ctx: &mut EngineContext) {
        match target {
            FocusTarget::Origin => {
                self.followed = None;
                self.nav.focus(origin_vantage(&config.camera));
                self.select(None, ctx);
            }
            FocusTarget::Body(id) => {
                let Some(node) = self.registry.get(id) else {
                    log::warn!("focus: unknown body id {id:?}");
                    return;
                };
                let body = &self.bodies[node.body];
                let position = self.placements[node.body].position;
                let goal = vantage_for(
                    body,
                    position,
                    self.home.position,
                    self.nav.position(),
                    &config.vantage,
                );
                self.followed = Some((node.body, position));
                self.nav.focus(goal);
                self.select(Some(node.body), ctx);
            }
        }
    }

    /// Carry the camera, its look target and any pending goal along with the
    /// followed body's latest move.
    fn follow(&mut self) {
        let Some((index, last)) = self.followed else {
            return;
        };
        let Some(placed) = self.placements.get(index) else {
            self.followed = None;
            return;
        };
        self.nav.translate(placed.position - last);
        self.followed = Some((index, placed.position));
    }

    fn select(&mut self, index: Option<usize>, ctx: &mut EngineContext) {
        if self.selected == index {
            return;
        }
        self.selected = index;
        let (class, slot) = match index.and_then(|i| self.bodies.get(i).map(|b| (i, b))) {
            Some((i, body)) => (body.class().code(), i as f32),
            None => (-1.0, -1.0),
        };
        ctx.emit_event(GameEvent {
            kind: EVENT_SELECTION_CHANGED,
            a: class,
            b: slot,
            c: 0.0,
        });
    }

    fn set_station(&mut self, fix: &StationFix, station_id: &str) {
        let Some(node) = self.registry.get(station_id) else {
            return;
        };
        if let BodyKind::Satellite { fix: current, .. } = &mut self.bodies[node.body].kind {
            *current = fix.clone();
        }
    }
}

pub struct CelestialTracker {
    config: TrackerConfig,
    catalogs: Catalogs,
    station: StationFix,
    days_per_second: f64,
    paused: bool,
    session: Option<SceneSessionState>,
    pub commands: CommandQueue<TrackerCommand>,
}

impl CelestialTracker {
    pub fn new() -> Self {
        Self::with_catalogs(TrackerConfig::default(), Catalogs::standard())
    }

    pub fn with_catalogs(config: TrackerConfig, catalogs: Catalogs) -> Self {
        Self {
            station: StationFix::new(0.0, 0.0, config.station.source.clone()),
            days_per_second: config.time.limit_speed(config.time.days_per_second),
            paused: false,
            session: None,
            commands: CommandQueue::new(),
            config,
            catalogs,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn days_per_second(&self) -> f64 {
        self.days_per_second
    }

    /// Simulated days since J2000, or `None` before init.
    pub fn days(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.epoch.days)
    }

    pub fn registry_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.registry.len())
    }

    pub fn navigator(&self) -> Option<&CameraNavigator> {
        self.session.as_ref().map(|s| &s.nav)
    }

    pub fn selected_id(&self) -> Option<&str> {
        let session = self.session.as_ref()?;
        session
            .selected
            .and_then(|i| session.bodies.get(i))
            .map(|b| b.id.as_str())
    }

    pub fn body_position(&self, id: &str) -> Option<Vec3> {
        let session = self.session.as_ref()?;
        let node = session.registry.get(id)?;
        session.placements.get(node.body).map(|p| p.position)
    }

    pub fn visible_stars(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.starfield.visible_count())
    }

    pub fn flyby_active(&self, id: &str) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.registry.get(id).map(|n| s.flybys.is_active(n.body)))
            .unwrap_or(false)
    }

    /// Facts for the current selection, computed from current positions.
    /// `"null"` when nothing is selected.
    pub fn selection_json(&self) -> String {
        let Some(session) = self.session.as_ref() else {
            return "null".to_string();
        };
        let Some(index) = session.selected else {
            return "null".to_string();
        };
        let (Some(body), Some(placed)) = (session.bodies.get(index), session.placements.get(index))
        else {
            return "null".to_string();
        };
        let ctx = FactContext {
            home_position: session.home.position,
            planet_days: session.epoch.planet_days,
            bodies: &session.bodies,
        };
        describe(body, placed.position, &ctx, &self.config).to_json()
    }

    pub fn texture(&self, id: &str) -> Option<&TextureImage> {
        let session = self.session.as_ref()?;
        let node = session.registry.get(id)?;
        session.textures.get(node.body)
    }

    /// Tear down any current scene and build a fresh one at `epoch`.
    fn start_session(&mut self, ctx: &mut EngineContext, epoch: Epoch) {
        if let Some(old) = self.session.take() {
            if old.selected.is_some() {
                ctx.emit_event(GameEvent {
                    kind: EVENT_SELECTION_CHANGED,
                    a: -1.0,
                    b: -1.0,
                    c: 0.0,
                });
            }
        }
        ctx.scene.clear();

        let built = build_scene(&self.catalogs, &self.station, &self.config, epoch, ctx);
        let mut starfield = Starfield::spawn(&self.config.starfield, ctx);
        starfield.apply_quality(ctx.frame.quality, &mut ctx.scene);

        let (w, h) = (self.config.texture.width, self.config.texture.height);
        let textures = built
            .bodies
            .iter()
            .map(|b| generate_texture_sized(&b.display_name, w, h))
            .collect();

        let placements = place_all(&built.bodies, epoch, &self.config);
        let home = home_in(&built.bodies, &placements, &self.config.scale.home_planet);
        let nav = CameraNavigator::new(&self.config.camera);
        ctx.camera.look_at(nav.position(), nav.look_target());

        self.session = Some(SceneSessionState {
            bodies: built.bodies,
            registry: built.registry,
            nav,
            gesture: PointerGesture::new(self.config.camera.drag_threshold_px),
            starfield,
            flybys: Flybys::new(),
            textures,
            epoch,
            placements,
            home,
            selected: None,
            followed: None,
            last_date: None,
            last_mode: None,
            last_quality: ctx.frame.quality,
        });
    }

    fn apply_command(&mut self, command: TrackerCommand, ctx: &mut EngineContext) {
        match command {
            TrackerCommand::FocusOn(target) => {
                if let Some(session) = self.session.as_mut() {
                    session.focus(&target, &self.config, ctx);
                }
            }
            TrackerCommand::ToggleSimulation(id) => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let Some(node) = session.registry.get(&id) else {
                    log::warn!("toggle_simulation: unknown body id {id:?}");
                    return;
                };
                let position = session.placements[node.body].position;
                match session.flybys.toggle(
                    node.body,
                    &session.bodies[node.body],
                    position,
                    session.home,
                    &self.config,
                ) {
                    FlybyToggle::Ignored => {
                        log::warn!("toggle_simulation: {id:?} is not an asteroid");
                    }
                    toggled => ctx.emit_event(GameEvent {
                        kind: EVENT_FLYBY,
                        a: node.body as f32,
                        b: if toggled == FlybyToggle::Started { 1.0 } else { 0.0 },
                        c: 0.0,
                    }),
                }
            }
            TrackerCommand::SetStation { latitude, longitude } => {
                if !latitude.is_finite()
                    || !longitude.is_finite()
                    || !(-90.0..=90.0).contains(&latitude)
                {
                    log::warn!("set_station: rejected fix ({latitude}, {longitude})");
                    return;
                }
                self.station = StationFix::new(latitude, longitude, "live");
                if let Some(session) = self.session.as_mut() {
                    session.set_station(&self.station, &self.config.station.id);
                }
            }
            TrackerCommand::SetSpeed(days_per_second) => {
                if !days_per_second.is_finite() {
                    log::warn!("set_speed: ignoring {days_per_second}");
                    return;
                }
                self.days_per_second = self.config.time.limit_speed(days_per_second);
                if self.days_per_second != days_per_second {
                    log::warn!("set_speed: {days_per_second} limited to {}", self.days_per_second);
                }
            }
            TrackerCommand::TogglePause => self.paused = !self.paused,
            TrackerCommand::ClearSelection => {
                if let Some(session) = self.session.as_mut() {
                    session.select(None, ctx);
                }
            }
            TrackerCommand::SetTexture { id, image } => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                let Some(node) = session.registry.get(&id) else {
                    log::warn!("set_texture: unknown body id {id:?}");
                    return;
                };
                let name = session.bodies[node.body].display_name.clone();
                session.textures[node.body] = resolve_texture(
                    &name,
                    image,
                    self.config.texture.width,
                    self.config.texture.height,
                );
            }
            TrackerCommand::ReplaceCatalogs(catalogs) => {
                log::info!("loading {} catalog entries", catalogs.len());
                self.catalogs = catalogs;
                let epoch = self
                    .session
                    .as_ref()
                    .map(|s| s.epoch)
                    .unwrap_or_else(|| Epoch::new(self.config.time.start_day));
                self.start_session(ctx, epoch);
            }
            TrackerCommand::Configure(config) => {
                log::info!("applying tracker configuration");
                self.config = *config;
                self.days_per_second =
                    self.config.time.limit_speed(self.config.time.days_per_second);
                self.station.source = self.config.station.source.clone();
                self.start_session(ctx, Epoch::new(self.config.time.start_day));
            }
        }
    }

    fn emit_changes(&mut self, ctx: &mut EngineContext) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        ctx.emit_event(GameEvent {
            kind: EVENT_TIME_INFO,
            a: session.epoch.days as f32,
            b: self.days_per_second as f32,
            c: if self.paused { 1.0 } else { 0.0 },
        });

        let date = days_to_date(session.epoch.days);
        if session.last_date != Some(date) {
            session.last_date = Some(date);
            ctx.emit_event(GameEvent {
                kind: EVENT_DATE_INFO,
                a: date.0 as f32,
                b: date.1 as f32,
                c: date.2 as f32,
            });
        }

        let mode = session.nav.mode();
        if session.last_mode != Some(mode) {
            session.last_mode = Some(mode);
            ctx.emit_event(GameEvent {
                kind: EVENT_NAV_MODE,
                a: mode.code(),
                b: 0.0,
                c: 0.0,
            });
        }
    }
}

impl Default for CelestialTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for CelestialTracker {
    fn init(&mut self, ctx: &mut EngineContext) {
        self.start_session(ctx, Epoch::new(self.config.time.start_day));
        log::info!(
            "celestial tracker: {} bodies, {} background stars",
            self.registry_len(),
            self.visible_stars()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let dt = ctx.frame.dt;

        // ── Commands ─────────────────────────────────────────────────
        for command in self.commands.drain() {
            self.apply_command(command, ctx);
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        // ── Input ────────────────────────────────────────────────────
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => {
                    session.gesture.down(Vec2::new(x, y));
                    session.nav.pointer_down();
                }
                InputEvent::PointerMove { x, y } => {
                    if let Some(delta) = session.gesture.moved(Vec2::new(x, y)) {
                        session.nav.drag(delta);
                    }
                }
                InputEvent::PointerUp { x, y } => {
                    session.nav.pointer_up();
                    if let Some(Gesture::Click(at)) = session.gesture.up(Vec2::new(x, y)) {
                        let hit = pick(
                            at,
                            &session.registry,
                            &ctx.scene,
                            &session.bodies,
                            &ctx.camera,
                            &self.config.picking,
                        );
                        match hit {
                            Some(hit) => {
                                session.focus(&FocusTarget::Body(hit.id), &self.config, ctx);
                            }
                            None => session.select(None, ctx),
                        }
                    }
                }
                InputEvent::Wheel { delta } => session.nav.zoom(delta),
                InputEvent::KeyDown { key_code } => match key_code {
                    KEY_SPACE => self.paused = !self.paused,
                    KEY_ESCAPE => session.select(None, ctx),
                    KEY_HOME => session.focus(&FocusTarget::Origin, &self.config, ctx),
                    _ => {}
                },
                InputEvent::Custom { kind, a, b, .. } => match kind {
                    CUSTOM_SET_SPEED => {
                        self.commands.push(TrackerCommand::SetSpeed(a as f64))
                    }
                    CUSTOM_TOGGLE_PAUSE => self.paused = !self.paused,
                    CUSTOM_FOCUS_ORIGIN => {
                        session.focus(&FocusTarget::Origin, &self.config, ctx)
                    }
                    CUSTOM_CLEAR_SELECTION => session.select(None, ctx),
                    CUSTOM_SET_STATION => self.commands.push(TrackerCommand::SetStation {
                        latitude: a as f64,
                        longitude: b as f64,
                    }),
                    _ => {}
                },
                InputEvent::KeyUp { .. } => {}
            }
        }

        // ── Clocks ───────────────────────────────────────────────────
        let sim_days = if self.paused {
            0.0
        } else {
            dt as f64 * self.days_per_second
        };
        session.epoch.days += sim_days;
        if !session.nav.freezes_planets() {
            session.epoch.planet_days += sim_days;
        }

        // ── Bodies ───────────────────────────────────────────────────
        let mut placements = place_all(&session.bodies, session.epoch, &self.config);
        session.home = home_in(&session.bodies, &placements, &self.config.scale.home_planet);
        if !self.paused {
            session.flybys.advance(dt);
        }
        session.flybys.apply(session.home.position, &mut placements);
        for (_, node) in session.registry.iter() {
            if let (Some(entity), Some(placed)) =
                (ctx.scene.get_mut(node.entity), placements.get(node.body))
            {
                entity.pos = placed.position;
                entity.rotation = placed.rotation;
            }
        }
        session.placements = placements;

        // ── Camera ───────────────────────────────────────────────────
        session.follow();
        session.nav.step(dt);
        ctx.camera.look_at(session.nav.position(), session.nav.look_target());

        // ── Decor density ────────────────────────────────────────────
        let quality = ctx.frame.quality;
        if quality != session.last_quality {
            session.last_quality = quality;
            session.starfield.apply_quality(quality, &mut ctx.scene);
            ctx.emit_event(GameEvent {
                kind: EVENT_QUALITY,
                a: quality as f32,
                b: session.starfield.visible_count() as f32,
                c: 0.0,
            });
        }

        self.emit_changes(ctx);
    }

    #[cfg(feature = "vectors")]
    fn render(&self, ctx: &mut RenderContext) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let camera = ctx.camera;

        // Orbit paths and rings
        for (body, placed) in session.bodies.iter().zip(&session.placements) {
            let color = VectorColor::rgb(body.color[0], body.color[1], body.color[2]);
            match &body.kind {
                BodyKind::Planet { orbit, ring } => {
                    let path = circle(Vec3::ZERO, orbit.orbital_distance, Quat::IDENTITY, ORBIT_SAMPLES);
                    ctx.vectors.stroke_world_polyline(
                        &path,
                        camera,
                        true,
                        ORBIT_LINE_WIDTH,
                        color.with_alpha(ORBIT_ALPHA),
                    );
                    if let Some(ring) = ring {
                        let tilt = Quat::from_rotation_x(orbit.axial_tilt.to_radians());
                        let ring_color = VectorColor::rgb(ring.color[0], ring.color[1], ring.color[2])
                            .with_alpha(RING_ALPHA);
                        for band in 0..RING_BANDS {
                            let t = band as f32 / (RING_BANDS - 1) as f32;
                            let radius = body.visual_radius * (ring.inner + (ring.outer - ring.inner) * t);
                            let path = circle(placed.position, radius, tilt, ORBIT_SAMPLES / 2);
                            ctx.vectors.stroke_world_polyline(&path, camera, true, 1.5, ring_color);
                        }
                    }
                }
                BodyKind::Moon {
                    parent,
                    orbit_radius,
                    ..
                } => {
                    let Some(center) = session
                        .registry
                        .get(parent)
                        .and_then(|n| session.placements.get(n.body))
                    else {
                        continue;
                    };
                    let path = circle(center.position, *orbit_radius, Quat::IDENTITY, ORBIT_SAMPLES / 2);
                    ctx.vectors.stroke_world_polyline(
                        &path,
                        camera,
                        true,
                        ORBIT_LINE_WIDTH,
                        color.with_alpha(ORBIT_ALPHA),
                    );
                }
                _ => {}
            }
        }

        // Flyby lines
        for path in session.flybys.paths(session.home.position) {
            ctx.vectors.stroke_world_polyline(&path, camera, false, 1.0, FLYBY_COLOR);
        }

        // Selection marker
        if let Some(index) = session.selected {
            let body = &session.bodies[index];
            if let Some(proj) = session
                .placements
                .get(index)
                .and_then(|p| camera.project(p.position))
            {
                let radius = body.visual_radius * proj.scale + SELECT_RING_GAP_PX;
                ctx.vectors.stroke_circle(proj.pos, radius, SELECT_RING_WIDTH, SELECT_RING_COLOR);
            }
        }
    }
}

/// Closed circle of `samples` points around `center`, in the XZ plane
/// rotated by `tilt`.
#[cfg(feature = "vectors")]
fn circle(center: Vec3, radius: f32, tilt: Quat, samples: usize) -> Vec<Vec3> {
    (0..samples)
        .map(|i| {
            let a = i as f32 / samples as f32 * std::f32::consts::TAU;
            center + tilt * Vec3::new(radius * a.cos(), 0.0, -radius * a.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{standard_planets, AsteroidRecord, GroundStationRecord, ProbeRecord};
    use crate::config::{StarfieldConfig, TextureConfig};
    use skywatch_web::GameRunner;

    const DT: f32 = 0.016;

    fn small_config() -> TrackerConfig {
        TrackerConfig {
            texture: TextureConfig {
                width: 8,
                height: 4,
            },
            starfield: StarfieldConfig {
                levels: vec![30, 12, 4],
                ..StarfieldConfig::default()
            },
            ..TrackerConfig::default()
        }
    }

    fn e2e_catalogs() -> Catalogs {
        Catalogs {
            planets: standard_planets(),
            moons: vec![],
            ground_stations: vec![GroundStationRecord {
                id: "dss-14".into(),
                name: "Goldstone DSS-14".into(),
                country: "USA".into(),
                latitude: 35.43,
                longitude: -116.89,
                antennas: 1,
                missions: vec!["Voyager 1".into()],
            }],
            asteroids: vec![AsteroidRecord {
                id: "2024-ab".into(),
                name: "2024 AB".into(),
                diameter_m: 120.0,
                speed_kms: 14.2,
                miss_distance_km: 4.5e6,
                hazardous: true,
                period_days: None,
                phase_deg: 0.0,
            }],
            probes: vec![ProbeRecord {
                id: "voyager-1".into(),
                name: "Voyager 1".into(),
                mission: "Interstellar".into(),
                launch_year: 1977,
                status: "active".into(),
                distance_au: 163.0,
                last_signal: "today".into(),
                phase_deg: 0.0,
                ecliptic_latitude_deg: 35.0,
            }],
        }
    }

    fn runner() -> GameRunner<CelestialTracker> {
        let mut r = GameRunner::new(CelestialTracker::with_catalogs(small_config(), e2e_catalogs()));
        r.init();
        r
    }

    fn ticks(r: &mut GameRunner<CelestialTracker>, n: usize) {
        for _ in 0..n {
            r.tick(DT);
        }
    }

    fn events_of(r: &GameRunner<CelestialTracker>, kind: f32) -> Vec<GameEvent> {
        r.context()
            .events
            .iter()
            .copied()
            .filter(|e| e.kind == kind)
            .collect()
    }

    fn screen_of(r: &GameRunner<CelestialTracker>, id: &str) -> Vec2 {
        let pos = r.game().body_position(id).unwrap();
        r.context().camera.project(pos).unwrap().pos
    }

    #[test]
    fn end_to_end_focus_on_probe_arrives_idle() {
        let mut r = runner();
        assert_eq!(r.game().registry_len(), 12);

        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse("voyager-1")));
        ticks(&mut r, 500);

        let nav = r.game().navigator().unwrap();
        assert_eq!(nav.mode(), NavMode::Idle { rotating: false });
        assert!(nav.state().pending_fly.is_none());
        let goal = nav.last_goal().unwrap();
        assert!(nav.position().distance(goal.position) < 0.05);
        assert!(nav.look_target().distance(goal.look) < 0.05);
        assert!((goal.distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn click_selects_and_flies_miss_clears() {
        let mut r = runner();
        r.tick(DT);
        let at = screen_of(&r, "sun");
        r.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
        r.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
        r.tick(DT);

        assert_eq!(r.game().selected_id(), Some("sun"));
        let selection = events_of(&r, EVENT_SELECTION_CHANGED);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].a, 0.0);
        assert_eq!(r.game().navigator().unwrap().mode(), NavMode::Flying);

        let json: serde_json::Value = serde_json::from_str(&r.game().selection_json()).unwrap();
        assert_eq!(json["kind"], "star");
        assert_eq!(json["facts"][1]["value"], "5772 K");

        r.push_input(InputEvent::PointerDown { x: 2.0, y: 2.0 });
        r.push_input(InputEvent::PointerUp { x: 2.0, y: 2.0 });
        r.tick(DT);
        assert_eq!(r.game().selected_id(), None);
        assert_eq!(r.game().selection_json(), "null");
        assert_eq!(events_of(&r, EVENT_SELECTION_CHANGED)[0].a, -1.0);
    }

    #[test]
    fn drag_never_selects() {
        let mut r = runner();
        r.tick(DT);
        let at = screen_of(&r, "sun");
        r.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
        r.push_input(InputEvent::PointerMove { x: at.x + 40.0, y: at.y });
        r.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
        r.tick(DT);
        assert_eq!(r.game().selected_id(), None);
        assert_eq!(r.game().navigator().unwrap().mode(), NavMode::Interacting);
    }

    #[test]
    fn focus_selects_and_origin_clears() {
        let mut r = runner();
        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse("voyager-1")));
        r.tick(DT);

        assert_eq!(r.game().selected_id(), Some("voyager-1"));
        let selection = events_of(&r, EVENT_SELECTION_CHANGED);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection[0].a, 6.0);
        let json: serde_json::Value = serde_json::from_str(&r.game().selection_json()).unwrap();
        assert_eq!(json["kind"], "probe");
        assert_eq!(json["id"], "voyager-1");

        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::Origin));
        r.tick(DT);
        assert_eq!(r.game().selected_id(), None);
        assert_eq!(events_of(&r, EVENT_SELECTION_CHANGED)[0].a, -1.0);
        assert_eq!(r.game().selection_json(), "null");
    }

    #[test]
    fn camera_stays_on_a_moving_planet() {
        let mut r = runner();
        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse("earth")));
        ticks(&mut r, 500);

        let earth = r.game().body_position("earth").unwrap();
        let nav = r.game().navigator().unwrap();
        let goal = *nav.last_goal().unwrap();
        assert_eq!(nav.mode(), NavMode::Idle { rotating: false });
        assert!(nav.look_target().distance(earth) < 0.05);
        assert!((nav.position().distance(earth) - goal.distance).abs() < 0.05);
        assert!((goal.distance - 8.4).abs() < 1e-4);
    }

    #[test]
    fn huge_speed_is_limited_and_date_stays_sane() {
        let mut r = runner();
        r.game_mut().commands.push(TrackerCommand::SetSpeed(1e300));
        ticks(&mut r, 3);
        assert_eq!(r.game().days_per_second(), 36525.0);
        assert!(r.game().days().unwrap().is_finite());
        let time = events_of(&r, EVENT_TIME_INFO);
        assert_eq!(time[0].b, 36525.0);
    }

    #[test]
    fn custom_speed_event_rejects_non_finite() {
        let mut r = runner();
        for a in [f32::NAN, f32::INFINITY] {
            r.push_input(InputEvent::Custom {
                kind: CUSTOM_SET_SPEED,
                a,
                b: 0.0,
                c: 0.0,
            });
        }
        ticks(&mut r, 2);
        assert_eq!(r.game().days_per_second(), 1.0);
        assert!(r.game().days().unwrap().is_finite());

        r.push_input(InputEvent::Custom {
            kind: CUSTOM_SET_SPEED,
            a: 5.0,
            b: 0.0,
            c: 0.0,
        });
        ticks(&mut r, 2);
        assert_eq!(r.game().days_per_second(), 5.0);
    }

    #[test]
    fn unknown_focus_is_ignored() {
        let mut r = runner();
        let before = r.game().navigator().unwrap().position();
        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse("pluto")));
        ticks(&mut r, 10);
        let nav = r.game().navigator().unwrap();
        assert_eq!(nav.mode(), NavMode::Idle { rotating: false });
        assert!(nav.last_goal().is_none());
        assert_eq!(nav.position(), before);
    }

    #[test]
    fn focus_origin_targets_default_vantage() {
        let mut r = runner();
        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse("Origin")));
        r.tick(DT);
        let goal = *r.game().navigator().unwrap().last_goal().unwrap();
        assert_eq!(goal.look, Vec3::ZERO);
        assert_eq!(goal.position, Vec3::new(0.0, 140.0, 360.0));
    }

    #[test]
    fn planets_hold_while_user_interacts() {
        let mut r = runner();
        r.tick(DT);
        r.push_input(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        r.tick(DT);
        let earth = r.game().body_position("earth").unwrap();
        let asteroid = r.game().body_position("2024-ab").unwrap();
        let days = r.game().days().unwrap();
        ticks(&mut r, 30);
        assert_eq!(r.game().body_position("earth").unwrap(), earth);
        assert!(r.game().days().unwrap() > days);
        assert_ne!(r.game().body_position("2024-ab").unwrap(), asteroid);
    }

    #[test]
    fn pause_and_speed_control_the_clock() {
        let mut r = runner();
        r.game_mut().commands.push(TrackerCommand::SetSpeed(10.0));
        r.tick(0.1);
        let days = r.game().days().unwrap();
        assert!((days - (9000.0 + 1.0)).abs() < 1e-4);

        r.game_mut().commands.push(TrackerCommand::TogglePause);
        ticks(&mut r, 5);
        assert_eq!(r.game().days().unwrap(), days);
        assert!(r.game().is_paused());
        let time = events_of(&r, EVENT_TIME_INFO);
        assert_eq!(time[0].c, 1.0);
    }

    #[test]
    fn station_fix_reprojects_station() {
        let mut r = runner();
        r.game_mut().commands.push(TrackerCommand::SetStation {
            latitude: 90.0,
            longitude: 0.0,
        });
        r.tick(DT);
        let earth = r.game().body_position("earth").unwrap();
        let iss = r.game().body_position("iss").unwrap();
        assert!((iss - earth - Vec3::new(0.0, 2.6, 0.0)).length() < 1e-3);

        // Out-of-range fixes are rejected.
        r.game_mut().commands.push(TrackerCommand::SetStation {
            latitude: 120.0,
            longitude: 0.0,
        });
        r.tick(DT);
        let earth = r.game().body_position("earth").unwrap();
        let iss = r.game().body_position("iss").unwrap();
        assert!((iss - earth - Vec3::new(0.0, 2.6, 0.0)).length() < 1e-3);
    }

    #[test]
    fn flyby_toggles_only_for_asteroids() {
        let mut r = runner();
        r.game_mut()
            .commands
            .push(TrackerCommand::ToggleSimulation("2024-ab".into()));
        r.game_mut()
            .commands
            .push(TrackerCommand::ToggleSimulation("earth".into()));
        r.game_mut()
            .commands
            .push(TrackerCommand::ToggleSimulation("nope".into()));
        r.tick(DT);
        assert!(r.game().flyby_active("2024-ab"));
        assert!(!r.game().flyby_active("earth"));
        let flyby = events_of(&r, EVENT_FLYBY);
        assert_eq!(flyby.len(), 1);
        assert_eq!(flyby[0].b, 1.0);

        r.game_mut()
            .commands
            .push(TrackerCommand::ToggleSimulation("2024-ab".into()));
        r.tick(DT);
        assert!(!r.game().flyby_active("2024-ab"));
    }

    #[test]
    fn slow_frames_thin_the_starfield() {
        let mut r = runner();
        assert_eq!(r.game().visible_stars(), 30);
        let registry = r.game().registry_len();
        ticks_with(&mut r, 61, 0.05);
        assert_eq!(r.quality_level(), 1);
        assert_eq!(r.game().visible_stars(), 12);
        assert_eq!(r.game().registry_len(), registry);
    }

    fn ticks_with(r: &mut GameRunner<CelestialTracker>, n: usize, dt: f32) {
        for _ in 0..n {
            r.tick(dt);
        }
    }

    #[test]
    fn replacing_catalogs_rebuilds_the_scene() {
        let mut r = runner();
        r.tick(DT);
        let days = r.game().days().unwrap();
        r.game_mut()
            .commands
            .push(TrackerCommand::ReplaceCatalogs(Catalogs::standard()));
        r.tick(DT);
        assert_eq!(r.game().registry_len(), 10);
        assert!(r.game().body_position("voyager-1").is_none());
        assert!(r.game().days().unwrap() > days);
        assert_eq!(r.context().scene.len(), 10 + 30);
    }

    #[test]
    fn configure_restarts_with_new_settings() {
        let mut r = runner();
        let mut config = small_config();
        config.time.start_day = 100.0;
        config.camera.default_position = [0.0, 10.0, 50.0];
        r.game_mut()
            .commands
            .push(TrackerCommand::Configure(Box::new(config)));
        r.tick(DT);
        assert!((r.game().days().unwrap() - 100.016).abs() < 1e-6);
        let nav = r.game().navigator().unwrap();
        assert_eq!(nav.position(), Vec3::new(0.0, 10.0, 50.0));
    }

    #[test]
    fn textures_fall_back_unless_fetch_is_valid() {
        let mut r = runner();
        let generated = r.game().texture("earth").unwrap().clone();
        assert_eq!(generated.pixels.len(), 8 * 4 * 4);

        let fetched = TextureImage {
            width: 1,
            height: 1,
            pixels: vec![9, 9, 9, 255],
        };
        r.game_mut().commands.push(TrackerCommand::SetTexture {
            id: "earth".into(),
            image: Ok(fetched.clone()),
        });
        r.tick(DT);
        assert_eq!(r.game().texture("earth"), Some(&fetched));

        r.game_mut().commands.push(TrackerCommand::SetTexture {
            id: "earth".into(),
            image: Err("network".into()),
        });
        r.tick(DT);
        assert_eq!(r.game().texture("earth"), Some(&generated));
    }

    #[test]
    fn renders_orbits_and_selection_marker() {
        let mut r = runner();
        r.tick(DT);
        assert!(r.sdf_instance_count() > 0);
        let without_selection = r.vector_vertex_count();
        assert!(without_selection > 0);

        let at = screen_of(&r, "sun");
        r.push_input(InputEvent::PointerDown { x: at.x, y: at.y });
        r.push_input(InputEvent::PointerUp { x: at.x, y: at.y });
        r.tick(DT);
        assert!(r.vector_vertex_count() > without_selection);
        assert!(r.labels().iter().any(|l| l.text == "Sun"));
    }
}
