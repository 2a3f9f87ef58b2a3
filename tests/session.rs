use std::collections::HashSet;

use chaos_snake::persistence::{JsonFileStore, MemoryStore};
use chaos_snake::sim::{DifficultyTier, Direction, GameEvent, GamePhase, Snapshot};
use chaos_snake::{GameController, Settings};

const FRAME_MS: u64 = 16;

fn settings(seed: u64, autopilot: bool) -> Settings {
    Settings {
        seed: Some(seed),
        autopilot,
        ..Settings::default()
    }
}

/// Drive a session frame by frame, feeding scripted intents at given times
fn replay(
    seed: u64,
    tier: DifficultyTier,
    intents: &[(u64, &str)],
    until: u64,
) -> (Vec<Snapshot>, Vec<GameEvent>) {
    let mut game = GameController::new(settings(seed, false), MemoryStore::new());
    game.skip_intro();
    game.select_level(tier, 0);

    let mut frames = Vec::new();
    let mut events = Vec::new();
    let mut now = 0;
    while now < until {
        now += FRAME_MS;
        for &(_, key) in intents.iter().filter(|(at, _)| *at > now - FRAME_MS && *at <= now) {
            game.intent(key);
        }
        frames.extend(game.advance(now));
        events.extend(game.drain_events());
    }
    (frames, events)
}

#[test]
fn deterministic_replay_matches() {
    let intents = [(400, "up"), (900, "left"), (1500, "down"), (2600, "right")];
    let first = replay(77, DifficultyTier::Hard, &intents, 20_000);
    let second = replay(77, DifficultyTier::Hard, &intents, 20_000);

    assert!(!first.0.is_empty());
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn different_seeds_place_food_differently() {
    let a = replay(1, DifficultyTier::Normal, &[], 200);
    let b = replay(2, DifficultyTier::Normal, &[], 200);
    let foods = |s: &Snapshot| s.foods.iter().map(|f| f.pos).collect::<Vec<_>>();
    assert_ne!(foods(&a.0[0]), foods(&b.0[0]));
}

#[test]
fn autopilot_run_keeps_board_invariants() {
    let mut game = GameController::new(settings(2024, true), MemoryStore::new());
    game.skip_intro();
    game.select_level(DifficultyTier::Insane, 0);

    let mut now = 0;
    let mut last_score = 0;
    let mut eaten = 0usize;
    while now < 120_000 && game.phase() != GamePhase::GameOver {
        now += FRAME_MS;
        for frame in game.advance(now) {
            assert!(frame.score >= last_score);
            last_score = frame.score;

            let cells: HashSet<_> = frame.actor.iter().copied().collect();
            assert_eq!(cells.len(), frame.actor.len(), "actor overlaps itself");
            for cell in &frame.actor {
                assert!((0..frame.width).contains(&cell.x) && (0..frame.height).contains(&cell.y));
            }
            assert!(frame.foods.len() <= game.settings().food_count + 1);
            for food in &frame.foods {
                assert!((0.08..=1.0).contains(&food.opacity));
            }
            assert!(frame.interval_ms >= 38 && frame.interval_ms <= 80);
        }
        for event in game.drain_events() {
            if matches!(event, GameEvent::Consumed { .. }) {
                eaten += 1;
            }
        }
    }

    // Every consumption grows the actor by one; the fatal step moves nothing
    assert_eq!(game.snapshot().actor.len(), 1 + eaten);
    assert!(eaten > 0, "autopilot never reached food");
}

fn clockwise(dir: Direction) -> Direction {
    match dir {
        Direction::Right => Direction::Down,
        Direction::Down => Direction::Left,
        Direction::Left => Direction::Up,
        Direction::Up => Direction::Right,
    }
}

#[test]
fn best_score_survives_a_new_controller() {
    let dir = std::env::temp_dir().join(format!("chaos-snake-session-{}", std::process::id()));
    let _ = std::fs::create_dir_all(&dir);
    let path = dir.join("best.json");
    let _ = std::fs::remove_file(&path);

    let mut game = GameController::new(settings(9, true), JsonFileStore::new(&path));
    game.skip_intro();
    game.select_level(DifficultyTier::Normal, 0);

    // Grow a little under the autopilot
    let mut now = 0;
    while now < 600_000 && game.snapshot().actor.len() < 5 {
        now += FRAME_MS;
        game.advance(now);
    }
    assert_eq!(game.phase(), GamePhase::Running);
    assert!(game.snapshot().actor.len() >= 5);

    // Then spin in a 2x2 square until the head runs into the body
    game.set_autopilot(false);
    let deadline = now + 10_000;
    while now < deadline && game.phase() != GamePhase::GameOver {
        now += FRAME_MS;
        if let Some(frame) = game.advance(now).last() {
            game.set_direction(clockwise(frame.direction));
        }
    }
    assert_eq!(game.phase(), GamePhase::GameOver);

    let score = game.state().score;
    assert!(score > 0);
    assert_eq!(game.best_score(), score);
    assert!(game.drain_events().contains(&GameEvent::NewBest { score }));

    let reopened = GameController::new(settings(10, false), JsonFileStore::new(&path));
    assert_eq!(reopened.best_score(), score);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn pause_freezes_the_board() {
    let mut game = GameController::new(settings(5, false), MemoryStore::new());
    game.skip_intro();
    game.select_level(DifficultyTier::Easy, 0);
    game.advance(1000);
    game.toggle_pause(1000);
    let frozen = game.snapshot();

    assert!(game.advance(30_000).is_empty());
    let later = game.snapshot();
    assert_eq!(frozen.actor, later.actor);
    assert_eq!(frozen.score, later.score);
    assert_eq!(game.drain_events().last(), Some(&GameEvent::Paused));
}
