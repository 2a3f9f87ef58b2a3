//! Post-step view of a session for the render collaborator

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction};
use super::state::{BorderTrap, GamePhase, GameState, PowerEffect, PowerKind};

/// A food as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodView {
    pub pos: Cell,
    pub points: u8,
    pub power: Option<PowerKind>,
    /// Fade-adjusted opacity in `[FOOD_MIN_OPACITY, 1]`
    pub opacity: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: u64,
    pub phase: GamePhase,
    pub width: i32,
    pub height: i32,
    /// Head first
    pub actor: Vec<Cell>,
    pub direction: Direction,
    pub foods: Vec<FoodView>,
    pub effects: Vec<PowerEffect>,
    pub traps: Vec<BorderTrap>,
    /// A trap has been announced and is about to arm
    pub trap_warning: bool,
    pub score: u64,
    pub best: u64,
    pub combo: u32,
    pub interval_ms: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState, best: u64, now: u64) -> Self {
        Self {
            time: now,
            phase: state.phase,
            width: state.config.grid.width,
            height: state.config.grid.height,
            actor: state.actor.iter().copied().collect(),
            direction: state.direction,
            foods: state
                .foods
                .iter()
                .map(|f| FoodView {
                    pos: f.pos,
                    points: f.points,
                    power: f.power,
                    opacity: f.opacity(now),
                })
                .collect(),
            effects: state.effects.clone(),
            traps: state.traps.clone(),
            trap_warning: !state.pending_traps.is_empty(),
            score: state.score,
            best: best.max(state.score),
            combo: state.combo.count,
            interval_ms: state.interval_ms,
        }
    }
}
