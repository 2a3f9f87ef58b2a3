//! Chaos Snake - A neon grid snake with combos, power-ups and border traps
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, spawning, hazards, step)
//! - `controller`: Session lifecycle and tick scheduling
//! - `persistence`: Best score storage
//! - `settings`: Player-facing configuration

pub mod controller;
pub mod persistence;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::GameController;
pub use persistence::{BestScore, MemoryStore, ScoreStore};
pub use settings::{Settings, Theme};

/// Game configuration constants
///
/// All durations are in milliseconds of host time.
pub mod consts {
    /// Grid size used when no settings are provided
    pub const DEFAULT_GRID_WIDTH: i32 = 20;
    pub const DEFAULT_GRID_HEIGHT: i32 = 20;

    /// Foods kept on the board at all times
    pub const DEFAULT_FOOD_COUNT: usize = 2;
    /// Sampling budget for a free cell before accepting a collision
    pub const FREE_CELL_ATTEMPTS: u32 = 600;

    /// Food lifetime and fade window
    pub const FOOD_LIFESPAN_MS: u64 = 5500;
    pub const FOOD_FADE_START_MS: u64 = 4000;
    /// Faded food never becomes fully invisible
    pub const FOOD_MIN_OPACITY: f32 = 0.08;

    /// Reward tier probabilities (common tier takes the remainder)
    pub const RARE_CHANCE: f64 = 0.04;
    pub const PREMIUM_CHANCE: f64 = 0.12;
    /// Power-up tag probability for initial spawns and for respawns
    pub const SPAWN_POWER_CHANCE: f64 = 0.06;
    pub const RESPAWN_POWER_CHANCE: f64 = 0.04;
    /// Chance per maintenance pass of an extra power food
    pub const BONUS_FOOD_CHANCE: f64 = 0.03;

    /// Power effect durations
    pub const GLITCH_DURATION_MS: i64 = 600;
    pub const WAVE_DURATION_MS: i64 = 1200;
    pub const DIZZY_DURATION_MS: i64 = 1400;
    /// Smallest per-tick decrement applied to power effects
    pub const MIN_EFFECT_DECREMENT_MS: u64 = 16;

    /// Combo window and the grace before a lapsed combo is cleared
    pub const COMBO_WINDOW_MS: u64 = 2500;
    pub const COMBO_GRACE_MS: u64 = 400;

    /// Difficulty curve: every 30 points the interval shrinks by 6%
    pub const DIFFICULTY_SCORE_STEP: u64 = 30;
    pub const DIFFICULTY_DECAY: f64 = 0.94;
    pub const FLOOR_INTERVAL_MS: u64 = 38;

    /// Maintenance pass cadence (food top-up, bonus food, trap trigger)
    pub const MAINTENANCE_INTERVAL_MS: u64 = 1400;

    /// Border trap scheduling
    pub const TRAP_TRIGGER_CHANCE: f64 = 0.18;
    pub const TRAP_MIN_SCORE: u64 = 35;
    /// Chance a trigger is discarded while below `TRAP_MIN_SCORE`
    pub const TRAP_LOW_SCORE_SKIP: f64 = 0.6;
    pub const TRAP_WARNING_MS: u64 = 1000;
    pub const TRAP_MIN_DURATION_MS: u64 = 3500;
    pub const TRAP_DURATION_JITTER_MS: u64 = 1500;

    /// Maximum firings per timer in a single `advance` call to prevent spiral of death
    pub const MAX_CATCHUP_FIRINGS: u32 = 8;

    /// Storage key for the persisted best score
    pub const BEST_SCORE_KEY: &str = "chaos_snake_best";
}
