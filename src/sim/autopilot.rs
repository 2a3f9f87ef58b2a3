//! Idle/demo mode steering
//!
//! Greedy: head for the nearest food, never step onto a trap or the body.

use super::grid::Direction;
use super::state::GameState;

/// Pick a legal direction for the next step, or `None` to keep going straight
pub fn choose_direction(state: &GameState) -> Option<Direction> {
    let grid = state.config.grid;
    let head = state.head();
    let current = state.next_direction();

    let safe: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&dir| dir != state.direction.opposite())
        .filter(|&dir| {
            let next = grid.step(head, dir);
            !state.trap_at(next) && !state.actor_occupies(next)
        })
        .collect();

    if safe.is_empty() {
        return None;
    }

    let target = state
        .foods
        .iter()
        .min_by_key(|f| grid.distance(head, f.pos))
        .map(|f| f.pos);

    let best = match target {
        // Prefer the current heading on ties to avoid zig-zagging
        Some(target) => safe.iter().copied().min_by_key(|&dir| {
            let dist = grid.distance(grid.step(head, dir), target);
            (dist, dir != current)
        }),
        None => safe.iter().copied().find(|&dir| dir == current).or(safe.first().copied()),
    };

    best.filter(|&dir| dir != current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BorderTrap, Food, SessionConfig, Side};
    use crate::sim::tick::{StepOutcome, tick};
    use glam::IVec2;

    fn session() -> GameState {
        let mut state = GameState::new(SessionConfig::default(), 99, 0);
        state.foods.clear();
        state
    }

    #[test]
    fn test_turns_toward_food() {
        let mut state = session();
        state.foods.push(Food::new(IVec2::new(10, 4), 1, None, 0));
        assert_eq!(choose_direction(&state), Some(Direction::Up));
    }

    #[test]
    fn test_keeps_heading_when_aligned() {
        let mut state = session();
        state.foods.push(Food::new(IVec2::new(15, 10), 1, None, 0));
        assert_eq!(choose_direction(&state), None);
    }

    #[test]
    fn test_never_reverses() {
        let mut state = session();
        // Food directly behind
        state.foods.push(Food::new(IVec2::new(8, 10), 1, None, 0));
        let dir = choose_direction(&state);
        assert_ne!(dir, Some(Direction::Left));
    }

    #[test]
    fn test_avoids_trap() {
        let mut state = session();
        state.actor = [IVec2::new(5, 1)].into_iter().collect();
        state.direction = Direction::Up;
        state.foods.push(Food::new(IVec2::new(5, 19), 1, None, 0));
        state.traps.push(BorderTrap { side: Side::Top, start: 0, length: 20, expires_at: u64::MAX });
        let dir = choose_direction(&state);
        assert!(matches!(dir, Some(Direction::Left) | Some(Direction::Right)));
    }

    #[test]
    fn test_autopilot_survives_and_scores() {
        let mut state = GameState::new(SessionConfig::default(), 2024, 0);
        let mut now = 0;
        for _ in 0..300 {
            if let Some(dir) = choose_direction(&state) {
                assert!(state.try_set_direction(dir));
            }
            now += state.interval_ms;
            if let StepOutcome::Died(_) = tick(&mut state, now) {
                break;
            }
        }
        assert!(state.score > 0);
    }
}
