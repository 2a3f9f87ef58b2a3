//! Chaos Snake entry point
//!
//! The browser build is driven from JS through `chaos_snake::web`. The native
//! binary runs a headless autopilot session on a virtual clock and logs what
//! happened, which is handy for balancing and for reproducing seeds.
//!
//! Usage: `chaos-snake [settings.json] [best-score.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use chaos_snake::persistence::JsonFileStore;
    use chaos_snake::sim::{GameEvent, GamePhase};
    use chaos_snake::{GameController, Settings};

    /// Virtual time budget for one run
    const MAX_RUN_MS: u64 = 10 * 60 * 1000;
    /// Host frame cadence the clock advances by
    const FRAME_MS: u64 = 16;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let mut settings = match args.next() {
            Some(path) => Settings::load_from(&PathBuf::from(path)),
            None => Settings::default(),
        };
        let best_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("chaos_snake_best.json"));

        if settings.seed.is_none() {
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            settings.seed = Some(seed);
        }
        settings.autopilot = true;

        let tier = settings.difficulty;
        let mut game = GameController::new(settings, JsonFileStore::new(&best_path));
        game.skip_intro();
        game.select_level(tier, 0);

        let mut now = 0;
        let mut steps = 0usize;
        while now < MAX_RUN_MS && game.phase() != GamePhase::GameOver {
            now += FRAME_MS;
            steps += game.advance(now).len();
            for event in game.drain_events() {
                log_event(&event);
            }
        }

        let snapshot = game.snapshot();
        log::info!(
            "Run finished after {} steps ({:.1}s virtual): score {} length {} best {}",
            steps,
            now as f64 / 1000.0,
            snapshot.score,
            snapshot.actor.len(),
            snapshot.best
        );
        if game.phase() != GamePhase::GameOver {
            log::info!("Time budget reached before game over");
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Consumed { points, combo, .. } if *combo > 1 => {
                log::info!("+{} (combo x{})", points, combo)
            }
            GameEvent::GameOver { .. } | GameEvent::NewBest { .. } => log::info!("{:?}", event),
            GameEvent::TrapWarning { .. } | GameEvent::PowerStarted { .. } => {
                log::info!("{:?}", event)
            }
            _ => log::debug!("{:?}", event),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chaos Snake (native, headless autopilot) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is chaos_snake::web::wasm_main, this is just to satisfy the compiler
}
