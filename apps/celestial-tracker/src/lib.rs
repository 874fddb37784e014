use wasm_bindgen::prelude::*;

pub mod body;
pub mod camera_nav;
pub mod catalog;
pub mod config;
pub mod decor;
pub mod ephemeris;
pub mod flyby;
pub mod picking;
pub mod placement;
pub mod registry;
pub mod scene_builder;
pub mod selection;
pub mod texture;
pub mod tracker;

use catalog::Catalogs;
use config::TrackerConfig;
use texture::TextureImage;
use tracker::{CelestialTracker, FocusTarget, TrackerCommand};

skywatch_web::export_game!(CelestialTracker, "celestial-tracker", vectors);

// ---- Tracker commands (applied at the next tick) ----

#[wasm_bindgen]
pub fn tracker_focus_on(id: &str) {
    with_runner(|r| {
        r.game_mut()
            .commands
            .push(TrackerCommand::FocusOn(FocusTarget::parse(id)))
    });
}

#[wasm_bindgen]
pub fn tracker_toggle_simulation(id: &str) {
    with_runner(|r| {
        r.game_mut()
            .commands
            .push(TrackerCommand::ToggleSimulation(id.to_string()))
    });
}

#[wasm_bindgen]
pub fn tracker_set_station(latitude: f64, longitude: f64) {
    with_runner(|r| {
        r.game_mut().commands.push(TrackerCommand::SetStation {
            latitude,
            longitude,
        })
    });
}

#[wasm_bindgen]
pub fn tracker_set_speed(days_per_second: f64) {
    with_runner(|r| r.game_mut().commands.push(TrackerCommand::SetSpeed(days_per_second)));
}

#[wasm_bindgen]
pub fn tracker_toggle_pause() {
    with_runner(|r| r.game_mut().commands.push(TrackerCommand::TogglePause));
}

#[wasm_bindgen]
pub fn tracker_clear_selection() {
    with_runner(|r| r.game_mut().commands.push(TrackerCommand::ClearSelection));
}

/// Replace the catalogs and rebuild the scene. Returns false when the
/// document is not a catalog object; malformed entries inside it are skipped.
#[wasm_bindgen]
pub fn tracker_load_catalogs(json: &str) -> bool {
    match Catalogs::from_json(json) {
        Ok(catalogs) => with_runner(|r| {
            r.game_mut()
                .commands
                .push(TrackerCommand::ReplaceCatalogs(catalogs))
        })
        .is_some(),
        Err(err) => {
            log::warn!("catalog document rejected: {err}");
            false
        }
    }
}

/// Apply a (partial) JSON config and restart the session.
#[wasm_bindgen]
pub fn tracker_configure(json: &str) -> bool {
    match TrackerConfig::from_json(json) {
        Ok(config) => with_runner(|r| {
            r.game_mut()
                .commands
                .push(TrackerCommand::Configure(Box::new(config)))
        })
        .is_some(),
        Err(err) => {
            log::warn!("config rejected: {err}");
            false
        }
    }
}

/// Hand over a fetched RGBA8 surface for a body.
#[wasm_bindgen]
pub fn tracker_set_texture(id: &str, width: u32, height: u32, pixels: Vec<u8>) {
    let image = TextureImage {
        width,
        height,
        pixels,
    };
    with_runner(|r| {
        r.game_mut().commands.push(TrackerCommand::SetTexture {
            id: id.to_string(),
            image: Ok(image),
        })
    });
}

/// Report a failed texture fetch; the body keeps a generated surface.
#[wasm_bindgen]
pub fn tracker_texture_failed(id: &str, reason: &str) {
    with_runner(|r| {
        r.game_mut().commands.push(TrackerCommand::SetTexture {
            id: id.to_string(),
            image: Err(reason.to_string()),
        })
    });
}

// ---- Tracker queries ----

#[wasm_bindgen]
pub fn tracker_selection_json() -> String {
    with_runner(|r| r.game().selection_json()).unwrap_or_else(|| "null".to_string())
}

#[wasm_bindgen]
pub fn tracker_labels_json() -> String {
    with_runner(|r| serde_json::to_string(r.labels()).unwrap_or_else(|_| "[]".to_string()))
        .unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn tracker_texture_rgba(id: &str) -> Vec<u8> {
    with_runner(|r| r.game().texture(id).map(|t| t.pixels.clone()))
        .flatten()
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn tracker_texture_width(id: &str) -> u32 {
    with_runner(|r| r.game().texture(id).map_or(0, |t| t.width)).unwrap_or(0)
}

#[wasm_bindgen]
pub fn tracker_texture_height(id: &str) -> u32 {
    with_runner(|r| r.game().texture(id).map_or(0, |t| t.height)).unwrap_or(0)
}
