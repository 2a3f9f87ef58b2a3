//! Game controller: session lifecycle and tick scheduling
//!
//! The host owns the clock and calls `advance(now)`; the controller fires every
//! deadline that has come due, in time order:
//! - the step timer at the current interval
//! - the maintenance timer at `MAINTENANCE_INTERVAL_MS`
//! - pending trap warnings reaching their arm time
//!
//! Each timer is a single deadline slot, so re-arming replaces the previous
//! deadline and two step callbacks can never be live at once.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{MAINTENANCE_INTERVAL_MS, MAX_CATCHUP_FIRINGS};
use crate::persistence::{BestScore, ScoreStore};
use crate::settings::{Settings, Theme};
use crate::sim::{
    DifficultyTier, Direction, GameEvent, GamePhase, GameState, Snapshot, StepOutcome, autopilot,
    hazard, maintain, tick,
};

/// A periodic callback handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub interval_ms: u64,
    next_due: Option<u64>,
}

impl Timer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due: None,
        }
    }

    /// Install the callback, replacing any previous one
    pub fn arm(&mut self, now: u64) {
        self.next_due = Some(now + self.interval_ms);
    }

    /// Cancel and reinstall with a new interval
    pub fn reschedule(&mut self, interval_ms: u64, now: u64) {
        self.interval_ms = interval_ms.max(1);
        self.arm(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_due
    }

    /// Deadline if it is at or before `now`
    fn due_at(&self, now: u64) -> Option<u64> {
        self.next_due.filter(|&due| due <= now)
    }

    /// Advance to the following period after a firing
    fn fired(&mut self) {
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.interval_ms);
        }
    }

    /// Skip missed periods instead of replaying them
    fn resync_if_behind(&mut self, now: u64) {
        if self.due_at(now).is_some() {
            self.next_due = Some(now + self.interval_ms);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Due {
    TrapArm,
    Maintenance,
    Step,
}

/// Owns the current session, the best score and all scheduling
pub struct GameController<S: ScoreStore> {
    settings: Settings,
    tier: DifficultyTier,
    state: GameState,
    best: BestScore<S>,
    /// Produces one seed per session so a whole run replays from one seed
    seeds: Pcg32,
    step_timer: Timer,
    maintenance_timer: Timer,
    /// Host window focus (scheduling-level suspension, not a game pause)
    focused: bool,
    autopilot: bool,
    /// Last time passed to `advance`
    now: u64,
}

impl<S: ScoreStore> GameController<S> {
    /// Create a controller on the intro screen
    pub fn new(settings: Settings, store: S) -> Self {
        let master_seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Controller seed: {}", master_seed);
        let mut seeds = Pcg32::seed_from_u64(master_seed);

        let tier = settings.difficulty;
        let mut state = GameState::new(settings.session_config(tier), seeds.random(), 0);
        state.phase = GamePhase::Intro;

        Self {
            tier,
            step_timer: Timer::new(state.interval_ms),
            maintenance_timer: Timer::new(MAINTENANCE_INTERVAL_MS),
            state,
            best: BestScore::load(store),
            seeds,
            focused: true,
            autopilot: settings.autopilot,
            now: 0,
            settings,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    pub fn best_score(&self) -> u64 {
        self.best.get()
    }

    pub fn best(&self) -> &BestScore<S> {
        &self.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn step_timer(&self) -> &Timer {
        &self.step_timer
    }

    pub fn maintenance_timer(&self) -> &Timer {
        &self.maintenance_timer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    // === Lifecycle ===

    /// Intro -> level select
    pub fn skip_intro(&mut self) -> bool {
        if self.state.phase != GamePhase::Intro {
            return false;
        }
        self.state.phase = GamePhase::LevelSelect;
        true
    }

    /// Start a session on `tier` from the level-select or game-over screen
    pub fn select_level(&mut self, tier: DifficultyTier, now: u64) -> bool {
        match self.state.phase {
            GamePhase::LevelSelect | GamePhase::GameOver => {
                self.tier = tier;
                self.start_session(now);
                true
            }
            _ => false,
        }
    }

    /// Discard the current session and start a fresh one on the same tier
    pub fn restart(&mut self, now: u64) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused | GamePhase::GameOver => {
                self.start_session(now);
                true
            }
            _ => false,
        }
    }

    /// Leave a finished or paused session for the level-select screen
    pub fn back_to_level_select(&mut self) -> bool {
        match self.state.phase {
            GamePhase::GameOver | GamePhase::Paused => {
                self.step_timer.cancel();
                self.maintenance_timer.cancel();
                self.state.phase = GamePhase::LevelSelect;
                true
            }
            _ => false,
        }
    }

    fn start_session(&mut self, now: u64) {
        let config = self.settings.session_config(self.tier);
        let seed = self.seeds.random();
        let leftover = self.state.drain_events();

        self.state = GameState::new(config, seed, now);
        self.state.events = leftover;
        self.now = self.now.max(now);

        self.step_timer = Timer::new(self.state.interval_ms);
        if self.focused {
            self.step_timer.arm(now);
        }
        self.maintenance_timer.arm(now);
        log::info!(
            "Session started: {} ({}ms, hazards={}) seed={}",
            self.tier.as_str(),
            self.state.interval_ms,
            self.tier.hazards_enabled(),
            seed
        );
    }

    /// Running <-> Paused; returns whether anything changed
    pub fn toggle_pause(&mut self, now: u64) -> bool {
        match self.state.phase {
            GamePhase::Running => {
                self.state.phase = GamePhase::Paused;
                self.step_timer.cancel();
                self.state.events.push(GameEvent::Paused);
                log::info!("Paused");
                true
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Running;
                if self.focused {
                    self.step_timer.arm(now);
                }
                self.state.events.push(GameEvent::Resumed);
                log::info!("Resumed");
                true
            }
            _ => false,
        }
    }

    // === Input ===

    /// Queue a direction for the next step; reversals are rejected
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        match self.state.phase {
            GamePhase::Running | GamePhase::Paused => self.state.try_set_direction(dir),
            _ => false,
        }
    }

    /// Raw intent from the input collaborator; unknown names are ignored
    pub fn intent(&mut self, name: &str) -> bool {
        match Direction::from_str(name) {
            Some(dir) => self.set_direction(dir),
            None => false,
        }
    }

    // === Host scheduling ===

    /// Window lost focus: suspend the step callback only
    pub fn focus_lost(&mut self) {
        self.focused = false;
        self.step_timer.cancel();
        log::debug!("Focus lost, step timer suspended");
    }

    /// Window regained focus: restart stepping unless the player paused
    pub fn focus_gained(&mut self, now: u64) {
        self.focused = true;
        if self.state.phase == GamePhase::Running && !self.step_timer.is_armed() {
            self.step_timer.arm(now);
            log::debug!("Focus regained, step timer restarted");
        }
    }

    /// Fire every deadline up to `now`; returns one snapshot per executed step
    pub fn advance(&mut self, now: u64) -> Vec<Snapshot> {
        let mut frames = Vec::new();
        if now < self.now {
            log::debug!("Ignoring clock going backwards ({} < {})", now, self.now);
            return frames;
        }

        let mut step_firings = 0;
        let mut maintenance_firings = 0;

        loop {
            let trap_due = hazard::next_arm_at(&self.state)
                .filter(|&at| at <= now)
                .map(|at| (at, Due::TrapArm));
            let maintenance_due = self
                .maintenance_timer
                .due_at(now)
                .map(|at| (at, Due::Maintenance));
            let step_due = self.step_timer.due_at(now).map(|at| (at, Due::Step));

            let Some((at, due)) = [trap_due, maintenance_due, step_due]
                .into_iter()
                .flatten()
                .min()
            else {
                break;
            };

            match due {
                Due::TrapArm => match self.state.phase {
                    GamePhase::Running | GamePhase::Paused => {
                        hazard::arm_due(&mut self.state, at);
                    }
                    _ => self.state.pending_traps.clear(),
                },
                Due::Maintenance => {
                    self.maintenance_timer.fired();
                    maintain(&mut self.state, at);
                    maintenance_firings += 1;
                    if maintenance_firings >= MAX_CATCHUP_FIRINGS {
                        self.maintenance_timer.resync_if_behind(now);
                    }
                }
                Due::Step => {
                    self.step_timer.fired();
                    if let Some(frame) = self.run_step(at) {
                        frames.push(frame);
                    }
                    step_firings += 1;
                    if step_firings >= MAX_CATCHUP_FIRINGS {
                        self.step_timer.resync_if_behind(now);
                    }
                }
            }
        }

        self.now = now;
        frames
    }

    fn run_step(&mut self, at: u64) -> Option<Snapshot> {
        if self.autopilot && self.state.is_running() {
            if let Some(dir) = autopilot::choose_direction(&self.state) {
                self.state.try_set_direction(dir);
            }
        }

        let interval_before = self.state.interval_ms;
        match tick(&mut self.state, at) {
            StepOutcome::Skipped => return None,
            StepOutcome::Died(_) => {
                self.step_timer.cancel();
                self.maintenance_timer.cancel();
                let score = self.state.score;
                if self.best.submit(score) {
                    self.state.events.push(GameEvent::NewBest { score });
                }
            }
            StepOutcome::Moved | StepOutcome::Ate { .. } => {
                if self.state.interval_ms != interval_before {
                    self.step_timer.reschedule(self.state.interval_ms, at);
                }
            }
        }
        Some(Snapshot::capture(&self.state, self.best.get(), at))
    }

    /// Current view at the last advanced time
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.best.get(), self.now)
    }

    /// Take all notifications produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}
