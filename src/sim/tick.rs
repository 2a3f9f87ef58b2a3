//! Fixed-tempo simulation step
//!
//! Advances one session by a single grid move. Also hosts the maintenance pass,
//! which runs on its own timer independent of the step interval.

use rand::Rng;

use super::difficulty::tick_interval;
use super::hazard;
use super::spawn;
use super::state::{DeathCause, GameEvent, GamePhase, GameState, PowerEffect};
use crate::consts::*;

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Session not running; nothing happened
    Skipped,
    /// Actor shifted one cell
    Moved,
    /// Actor ate the food that was in `slot`
    Ate { slot: usize, points: u8 },
    /// Session ended
    Died(DeathCause),
}

/// Advance the session by one step at host time `now`
pub fn tick(state: &mut GameState, now: u64) -> StepOutcome {
    if state.phase != GamePhase::Running {
        return StepOutcome::Skipped;
    }
    state.time_ticks += 1;

    if let Some(dir) = state.queued_direction.take() {
        state.direction = dir;
    }

    // Stale foods are replaced in place
    for slot in (0..state.foods.len()).rev() {
        if state.foods[slot].update_life(now) {
            state.respawn_food(slot, now);
            state.events.push(GameEvent::FoodExpired { slot });
        }
    }

    decay_effects(state);

    hazard::prune_expired(state, now);
    if state.combo.expire(now) {
        state.events.push(GameEvent::ComboExpired);
    }

    let grid = state.config.grid;
    let head = grid.step(state.head(), state.direction);

    // Traps are checked first so a simultaneous trap/self hit reports the trap
    if state.trap_at(head) {
        return game_over(state, DeathCause::Trap);
    }
    // Pre-move body: the tail has not vacated yet
    if state.actor_occupies(head) {
        return game_over(state, DeathCause::SelfCollision);
    }

    let outcome = match state.food_index_at(head) {
        Some(slot) => {
            let points = consume(state, slot, now);
            StepOutcome::Ate { slot, points }
        }
        None => {
            state.actor.pop_back();
            StepOutcome::Moved
        }
    };

    state.actor.push_front(head);
    outcome
}

/// Apply every effect of eating the food in `slot`; the actor grows by not popping
fn consume(state: &mut GameState, slot: usize, now: u64) -> u8 {
    let food = state.foods[slot].clone();
    state.score += u64::from(food.points);

    let combo = state.combo.on_consume(now);
    state.events.push(GameEvent::Consumed {
        pos: food.pos,
        points: food.points,
        combo,
    });

    if let Some(kind) = food.power {
        state.effects.push(PowerEffect {
            kind,
            remaining_ms: kind.duration_ms(),
        });
        state.events.push(GameEvent::PowerStarted { kind });
    }

    let interval = tick_interval(state.score, state.config.tier.base_interval_ms());
    if interval != state.interval_ms {
        log::debug!("Interval {} -> {} ms at score {}", state.interval_ms, interval, state.score);
        state.interval_ms = interval;
        state.events.push(GameEvent::IntervalChanged { interval_ms: interval });
    }

    state.respawn_food(slot, now);
    food.points
}

/// Count power effects down by one step's duration
fn decay_effects(state: &mut GameState) {
    let elapsed = state.interval_ms.max(MIN_EFFECT_DECREMENT_MS) as i64;
    let events = &mut state.events;
    state.effects.retain_mut(|effect| {
        effect.remaining_ms -= elapsed;
        if effect.remaining_ms <= 0 {
            events.push(GameEvent::PowerEnded { kind: effect.kind });
            false
        } else {
            true
        }
    });
}

fn game_over(state: &mut GameState, cause: DeathCause) -> StepOutcome {
    log::info!("Game over ({:?}) with score {}", cause, state.score);
    state.phase = GamePhase::GameOver;
    state.death_cause = Some(cause);
    state.events.push(GameEvent::GameOver {
        cause,
        score: state.score,
    });
    StepOutcome::Died(cause)
}

/// Periodic upkeep: top up foods, maybe drop a bonus food, roll for a trap
///
/// No-op unless the session is running.
pub fn maintain(state: &mut GameState, now: u64) {
    if state.phase != GamePhase::Running {
        return;
    }

    if state.foods.len() < state.config.food_count {
        state.spawn_foods(now);
    }

    if state.rng.random_bool(BONUS_FOOD_CHANCE) {
        let grid = state.config.grid;
        let target = state.config.food_count;
        spawn::spawn_bonus_food(
            &mut state.foods,
            &state.actor,
            &grid,
            target,
            &mut state.rng,
            now,
        );
    }

    hazard::maybe_schedule(state, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::DifficultyTier;
    use crate::sim::grid::{Direction, Grid};
    use crate::sim::state::{BorderTrap, Food, PowerKind, SessionConfig, Side};
    use glam::IVec2;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn session(food_count: usize) -> GameState {
        let config = SessionConfig {
            grid: Grid::new(20, 20),
            tier: DifficultyTier::Normal,
            food_count,
        };
        GameState::new(config, 12345, 0)
    }

    fn actor(cells: &[(i32, i32)]) -> VecDeque<IVec2> {
        cells.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn test_step_skipped_unless_running() {
        let mut state = session(2);
        state.phase = GamePhase::Paused;
        let before = state.actor.clone();
        assert_eq!(tick(&mut state, 100), StepOutcome::Skipped);
        assert_eq!(state.actor, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_eat_food_directly_ahead() {
        let mut state = session(1);
        let target = IVec2::new(11, 10);
        state.foods = vec![Food::new(target, 2, None, 0)];

        let outcome = tick(&mut state, 160);
        assert_eq!(outcome, StepOutcome::Ate { slot: 0, points: 2 });
        assert_eq!(state.score, 2);
        assert_eq!(state.actor.len(), 2);
        assert_eq!(state.head(), target);
        assert_eq!(state.foods.len(), 1);
        assert_ne!(state.foods[0].pos, target);
        assert!(!state.actor_occupies(state.foods[0].pos));
        assert!(state.events.contains(&GameEvent::Consumed { pos: target, points: 2, combo: 1 }));
    }

    #[test]
    fn test_move_without_food_keeps_length() {
        let mut state = session(0);
        state.actor = actor(&[(5, 5), (4, 5), (3, 5)]);
        assert_eq!(tick(&mut state, 160), StepOutcome::Moved);
        assert_eq!(state.actor, actor(&[(6, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_wraps_right_edge() {
        let mut state = session(0);
        state.actor = actor(&[(19, 3)]);
        tick(&mut state, 160);
        assert_eq!(state.head(), IVec2::new(0, 3));

        state.direction = Direction::Left;
        tick(&mut state, 320);
        assert_eq!(state.head(), IVec2::new(19, 3));
    }

    #[test]
    fn test_moving_into_tail_is_lethal() {
        let mut state = session(0);
        // Head (5,5), tail (5,6) directly below
        state.actor = actor(&[(5, 5), (6, 5), (6, 6), (5, 6)]);
        state.direction = Direction::Down;
        assert_eq!(tick(&mut state, 160), StepOutcome::Died(DeathCause::SelfCollision));
        assert_eq!(state.phase, GamePhase::GameOver);
        // Nothing committed on death
        assert_eq!(state.actor.len(), 4);
        assert_eq!(tick(&mut state, 320), StepOutcome::Skipped);
    }

    #[test]
    fn test_trap_checked_before_self() {
        let mut state = session(0);
        // Next head (0,0) is both on the body and on a top trap
        state.actor = actor(&[(1, 0), (1, 1), (0, 1), (0, 0)]);
        state.direction = Direction::Left;
        state.traps.push(BorderTrap { side: Side::Top, start: 0, length: 3, expires_at: 10_000 });
        assert_eq!(tick(&mut state, 160), StepOutcome::Died(DeathCause::Trap));
        assert_eq!(state.death_cause, Some(DeathCause::Trap));
    }

    #[test]
    fn test_expired_trap_is_not_lethal() {
        let mut state = session(0);
        state.actor = actor(&[(4, 1)]);
        state.direction = Direction::Up;
        state.traps.push(BorderTrap { side: Side::Top, start: 0, length: 20, expires_at: 100 });
        assert_eq!(tick(&mut state, 101), StepOutcome::Moved);
        assert!(state.traps.is_empty());
    }

    #[test]
    fn test_queued_direction_applies_on_step() {
        let mut state = session(0);
        assert!(state.try_set_direction(Direction::Up));
        tick(&mut state, 160);
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.head(), IVec2::new(10, 9));
        // Now DOWN is a reversal
        assert!(!state.try_set_direction(Direction::Down));
    }

    #[test]
    fn test_expired_food_respawns_in_place() {
        let mut state = session(2);
        state.actor = actor(&[(0, 19)]);
        state.direction = Direction::Up;
        state.foods = vec![
            Food::new(IVec2::new(5, 5), 1, None, 5000),
            Food::new(IVec2::new(7, 7), 1, None, 0),
        ];
        let old = state.foods[1].pos;

        tick(&mut state, FOOD_LIFESPAN_MS);
        assert_eq!(state.foods.len(), 2);
        assert_eq!(state.foods[1].spawned_at, FOOD_LIFESPAN_MS);
        assert_ne!(state.foods[1].pos, old);
        assert!(state.events.contains(&GameEvent::FoodExpired { slot: 1 }));
        assert!(!state.events.contains(&GameEvent::FoodExpired { slot: 0 }));
    }

    #[test]
    fn test_power_effect_lifecycle() {
        let mut state = session(1);
        state.foods = vec![Food::new(IVec2::new(11, 10), 1, Some(PowerKind::Glitch), 0)];
        tick(&mut state, 160);
        assert_eq!(state.effects.len(), 1);
        assert!(state.events.contains(&GameEvent::PowerStarted { kind: PowerKind::Glitch }));

        // 600ms at 160ms per step: gone on the fourth decrement
        state.foods.clear();
        for i in 0..3 {
            tick(&mut state, 320 + i * 160);
            assert_eq!(state.effects.len(), 1);
        }
        tick(&mut state, 800);
        assert!(state.effects.is_empty());
        assert!(state.events.contains(&GameEvent::PowerEnded { kind: PowerKind::Glitch }));
    }

    #[test]
    fn test_interval_shrinks_after_scoring() {
        let mut state = session(1);
        state.score = 29;
        state.foods = vec![Food::new(IVec2::new(11, 10), 1, None, 0)];
        tick(&mut state, 160);
        assert_eq!(state.interval_ms, 150);
        assert!(state.events.contains(&GameEvent::IntervalChanged { interval_ms: 150 }));
    }

    #[test]
    fn test_combo_expires_during_step() {
        let mut state = session(1);
        state.foods = vec![Food::new(IVec2::new(11, 10), 1, None, 0)];
        tick(&mut state, 1000);
        assert_eq!(state.combo.count, 1);
        state.foods.clear();
        tick(&mut state, 1000 + COMBO_WINDOW_MS + COMBO_GRACE_MS);
        assert_eq!(state.combo.count, 0);
        assert!(state.events.contains(&GameEvent::ComboExpired));
    }

    #[test]
    fn test_maintain_tops_up_foods() {
        let mut state = session(2);
        state.foods.clear();
        maintain(&mut state, 500);
        assert!(state.foods.len() >= 2);

        state.phase = GamePhase::Paused;
        state.foods.clear();
        maintain(&mut state, 1900);
        assert!(state.foods.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = session(2);
        let mut b = session(2);
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..200u64 {
            let dir = turns[(i / 7) as usize % 4];
            a.try_set_direction(dir);
            b.try_set_direction(dir);
            let now = i * 160;
            if i % 9 == 0 {
                maintain(&mut a, now);
                maintain(&mut b, now);
            }
            assert_eq!(tick(&mut a, now), tick(&mut b, now));
        }
        assert_eq!(a.actor, b.actor);
        assert_eq!(a.foods, b.foods);
        assert_eq!(a.score, b.score);
    }

    proptest! {
        #[test]
        fn prop_step_invariants(seed in any::<u64>(), turns in proptest::collection::vec(0usize..4, 1..120)) {
            let config = SessionConfig {
                grid: Grid::new(12, 9),
                tier: DifficultyTier::Normal,
                food_count: 3,
            };
            let mut state = GameState::new(config, seed, 0);
            let mut now = 0;
            for turn in turns {
                state.try_set_direction(Direction::ALL[turn]);
                let len_before = state.actor.len();
                let score_before = state.score;
                now += state.interval_ms;
                match tick(&mut state, now) {
                    StepOutcome::Moved => prop_assert_eq!(state.actor.len(), len_before),
                    StepOutcome::Ate { points, .. } => {
                        prop_assert_eq!(state.actor.len(), len_before + 1);
                        prop_assert_eq!(state.score, score_before + u64::from(points));
                    }
                    StepOutcome::Died(_) | StepOutcome::Skipped => break,
                }
                prop_assert!(state.score >= score_before);
                prop_assert_eq!(state.foods.len(), 3);
                prop_assert!(config.grid.contains(state.head()));
            }
        }

        #[test]
        fn prop_reverse_always_rejected(first in 0usize..4) {
            let mut state = session(0);
            state.direction = Direction::ALL[first];
            prop_assert!(!state.try_set_direction(state.direction.opposite()));
            prop_assert_eq!(state.next_direction(), Direction::ALL[first]);
        }
    }
}
