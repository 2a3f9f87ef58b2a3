//! Game settings and preferences
//!
//! Persisted separately from the best score. Native builds read a JSON file,
//! browser builds use LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{DifficultyTier, Grid, SessionConfig};

/// Visual theme (cosmetic only, passed through to the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Retro,
    Modern,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Retro => "retro",
            Theme::Modern => "modern",
        }
    }

    /// Unknown names fall back to Retro
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "modern" => Theme::Modern,
            _ => Theme::Retro,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tier preselected on the level-select screen
    pub difficulty: DifficultyTier,
    pub theme: Theme,

    // === Board ===
    pub grid_width: i32,
    pub grid_height: i32,
    /// Foods kept on the board
    pub food_count: usize,

    // === Runs ===
    /// Fixed RNG seed (random per launch when unset)
    pub seed: Option<u64>,
    /// Let the autopilot steer
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyTier::Normal,
            theme: Theme::Retro,

            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            food_count: DEFAULT_FOOD_COUNT,

            seed: None,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Session parameters for `tier` under these settings
    pub fn session_config(&self, tier: DifficultyTier) -> SessionConfig {
        let grid = Grid::new(self.grid_width, self.grid_height);
        // Keep at least one cell free for the actor
        let max_foods = grid.cell_count().saturating_sub(1);
        SessionConfig {
            grid,
            tier,
            food_count: self.food_count.min(max_foods),
        }
    }

    /// Parse settings from JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings JSON, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "chaos_snake_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file (native); missing or broken files give defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::persistence::PersistError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
