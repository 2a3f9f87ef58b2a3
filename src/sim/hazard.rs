//! Border trap scheduling for the hazard tier
//!
//! A trigger announces a `PendingTrap`; once its warning elapses it becomes a
//! lethal `BorderTrap` until `expires_at`.

use rand::Rng;

use super::grid::Grid;
use super::state::{BorderTrap, GameEvent, GameState, PendingTrap, Side};
use crate::consts::*;

/// Roll a trap placement on a random side
pub fn plan_trap<R: Rng + ?Sized>(rng: &mut R, grid: &Grid, now: u64) -> PendingTrap {
    let side = Side::ALL[rng.random_range(0..Side::ALL.len())];
    let span = side.span(grid);

    let variable = (rng.random::<f64>() * (span as f64 / 2.0)).floor() as i32;
    let fixed = (span as f64 / 6.0).floor() as i32;
    let length = (variable + fixed).clamp(1, span);
    let start = (rng.random::<f64>() * (span - length) as f64).floor() as i32;
    let duration_ms = TRAP_MIN_DURATION_MS + rng.random_range(0..TRAP_DURATION_JITTER_MS);

    PendingTrap {
        side,
        start,
        length,
        duration_ms,
        arms_at: now + TRAP_WARNING_MS,
    }
}

/// Maintenance-time trigger; returns true when a warning was announced
pub fn maybe_schedule(state: &mut GameState, now: u64) -> bool {
    if !state.config.tier.hazards_enabled() {
        return false;
    }
    if !state.rng.random_bool(TRAP_TRIGGER_CHANCE) {
        return false;
    }
    schedule_with_warning(state, now)
}

/// Announce a trap, subject to the low-score discount
pub fn schedule_with_warning(state: &mut GameState, now: u64) -> bool {
    if !state.config.tier.hazards_enabled() {
        return false;
    }
    if state.score < TRAP_MIN_SCORE && state.rng.random_bool(TRAP_LOW_SCORE_SKIP) {
        return false;
    }
    let grid = state.config.grid;
    let pending = plan_trap(&mut state.rng, &grid, now);
    log::debug!(
        "Trap warning: {:?} [{}..{}) arms at {}",
        pending.side,
        pending.start,
        pending.start + pending.length,
        pending.arms_at
    );
    state.events.push(GameEvent::TrapWarning {
        side: pending.side,
        start: pending.start,
        length: pending.length,
    });
    state.pending_traps.push(pending);
    true
}

/// Earliest pending arm deadline
pub fn next_arm_at(state: &GameState) -> Option<u64> {
    state.pending_traps.iter().map(|p| p.arms_at).min()
}

/// Turn every pending trap whose warning has elapsed into a live trap
pub fn arm_due(state: &mut GameState, now: u64) -> usize {
    let (due, waiting): (Vec<_>, Vec<_>) = state
        .pending_traps
        .drain(..)
        .partition(|p| p.arms_at <= now);
    state.pending_traps = waiting;

    for pending in &due {
        let trap = BorderTrap {
            side: pending.side,
            start: pending.start,
            length: pending.length,
            expires_at: pending.arms_at + pending.duration_ms,
        };
        log::info!("Trap armed on {:?} side until {}", trap.side, trap.expires_at);
        state.events.push(GameEvent::TrapArmed { trap });
        state.traps.push(trap);
    }
    due.len()
}

/// Drop traps whose lifetime has passed
pub fn prune_expired(state: &mut GameState, now: u64) {
    let events = &mut state.events;
    state.traps.retain(|trap| {
        let keep = !trap.is_expired(now);
        if !keep {
            events.push(GameEvent::TrapCleared { side: trap.side });
        }
        keep
    });
}
