//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host time is passed in, never read
//! - Seeded RNG only
//! - Side effects are recorded as `GameEvent`s, never performed
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod combo;
pub mod difficulty;
pub mod grid;
pub mod hazard;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combo::ComboTimer;
pub use difficulty::{DifficultyTier, tick_interval};
pub use grid::{Cell, Direction, Grid};
pub use snapshot::{FoodView, Snapshot};
pub use state::{
    BorderTrap, DeathCause, Food, GameEvent, GamePhase, GameState, PendingTrap, PowerEffect,
    PowerKind, SessionConfig, Side,
};
pub use tick::{StepOutcome, maintain, tick};
