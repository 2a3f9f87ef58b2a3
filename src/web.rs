//! Browser bindings (wasm32 only)
//!
//! The JS host owns the canvas, audio, key listeners and the frame loop. It
//! forwards input and focus changes here and calls `advance()` every animation
//! frame; snapshots and events come back as JSON strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::controller::GameController;
use crate::persistence::LocalStorageStore;
use crate::settings::{Settings, Theme};
use crate::sim::DifficultyTier;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize for JS: {}", e);
        "null".to_string()
    })
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Chaos Snake starting...");
}

/// One game instance, owned by the page
#[wasm_bindgen]
pub struct WebGame {
    controller: GameController<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        WebGame {
            controller: GameController::new(settings, LocalStorageStore),
        }
    }

    pub fn skip_intro(&mut self) -> bool {
        self.controller.skip_intro()
    }

    /// Start a session; unknown tier names are ignored
    pub fn select_level(&mut self, tier: &str) -> bool {
        match DifficultyTier::from_str(tier) {
            Some(tier) => self.controller.select_level(tier, now_ms()),
            None => {
                log::warn!("Unknown difficulty {:?}", tier);
                false
            }
        }
    }

    pub fn restart(&mut self) -> bool {
        self.controller.restart(now_ms())
    }

    pub fn back_to_level_select(&mut self) -> bool {
        self.controller.back_to_level_select()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.controller.toggle_pause(now_ms())
    }

    /// Key name or direction word ("ArrowUp", "w", "left", ...)
    pub fn intent(&mut self, key: &str) -> bool {
        self.controller.intent(key)
    }

    pub fn focus_lost(&mut self) {
        self.controller.focus_lost();
    }

    pub fn focus_gained(&mut self) {
        self.controller.focus_gained(now_ms());
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.controller.set_autopilot(enabled);
    }

    /// Run everything due and return the per-step snapshots as a JSON array
    pub fn advance(&mut self) -> String {
        let frames = self.controller.advance(now_ms());
        to_json(&frames)
    }

    pub fn snapshot(&self) -> String {
        to_json(&self.controller.snapshot())
    }

    /// Pending notifications as a JSON array (sound cues, banners)
    pub fn drain_events(&mut self) -> String {
        to_json(&self.controller.drain_events())
    }

    pub fn phase(&self) -> String {
        self.controller.phase().as_str().to_string()
    }

    pub fn tier(&self) -> String {
        self.controller.tier().as_str().to_string()
    }

    pub fn theme(&self) -> String {
        self.controller.theme().as_str().to_string()
    }

    /// Persist a theme choice for the next page load
    pub fn save_theme(&self, theme: &str) {
        let settings = Settings {
            theme: Theme::from_str(theme),
            ..self.controller.settings().clone()
        };
        settings.save();
    }

    pub fn best_score(&self) -> f64 {
        self.controller.best_score() as f64
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
