//! Game state and core simulation types
//!
//! Everything owned by one session lives in `GameState`. A new session is a new
//! `GameState`; nothing carries over except what the controller keeps.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTimer;
use super::difficulty::DifficultyTier;
use super::grid::{Cell, Direction, Grid};
use super::spawn;
use crate::consts::*;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, before any level is picked
    Intro,
    /// Waiting for a difficulty tier
    LevelSelect,
    /// Active gameplay
    Running,
    /// Explicitly paused by the player
    Paused,
    /// Session ended by a collision
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Intro => "intro",
            GamePhase::LevelSelect => "level_select",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Power-up tag carried by some foods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerKind {
    Glitch,
    Wave,
    Dizzy,
}

impl PowerKind {
    pub const ALL: [PowerKind; 3] = [PowerKind::Glitch, PowerKind::Wave, PowerKind::Dizzy];

    /// How long the effect stays active once triggered
    pub fn duration_ms(&self) -> i64 {
        match self {
            PowerKind::Glitch => GLITCH_DURATION_MS,
            PowerKind::Wave => WAVE_DURATION_MS,
            PowerKind::Dizzy => DIZZY_DURATION_MS,
        }
    }
}

/// A food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub pos: Cell,
    /// 1 (common), 2 (premium) or 3 (rare)
    pub points: u8,
    pub power: Option<PowerKind>,
    pub spawned_at: u64,
    /// Milliseconds left before the slot is respawned, refreshed every step
    pub remaining_life: u64,
}

impl Food {
    pub fn new(pos: Cell, points: u8, power: Option<PowerKind>, now: u64) -> Self {
        Self {
            pos,
            points,
            power,
            spawned_at: now,
            remaining_life: FOOD_LIFESPAN_MS,
        }
    }

    /// Recompute `remaining_life` for `now`; returns true once expired
    pub fn update_life(&mut self, now: u64) -> bool {
        let elapsed = now.saturating_sub(self.spawned_at);
        self.remaining_life = FOOD_LIFESPAN_MS.saturating_sub(elapsed);
        self.remaining_life == 0
    }

    /// Render opacity: 1.0 until the fade starts, then linear down to `FOOD_MIN_OPACITY`
    pub fn opacity(&self, now: u64) -> f32 {
        let elapsed = now.saturating_sub(self.spawned_at);
        if elapsed <= FOOD_FADE_START_MS {
            return 1.0;
        }
        let fade_span = (FOOD_LIFESPAN_MS - FOOD_FADE_START_MS) as f32;
        let left = FOOD_LIFESPAN_MS.saturating_sub(elapsed) as f32;
        (left / fade_span).clamp(FOOD_MIN_OPACITY, 1.0)
    }
}

/// An active power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerEffect {
    pub kind: PowerKind,
    pub remaining_ms: i64,
}

/// Board edge a trap sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    /// Number of boundary cells along this side
    pub fn span(&self, grid: &Grid) -> i32 {
        match self {
            Side::Top | Side::Bottom => grid.width,
            Side::Left | Side::Right => grid.height,
        }
    }
}

/// A live lethal run of boundary cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderTrap {
    pub side: Side,
    pub start: i32,
    pub length: i32,
    pub expires_at: u64,
}

impl BorderTrap {
    /// Whether `cell` lies on this trap's run
    pub fn covers(&self, cell: Cell, grid: &Grid) -> bool {
        let (on_edge, along) = match self.side {
            Side::Top => (cell.y == 0, cell.x),
            Side::Bottom => (cell.y == grid.height - 1, cell.x),
            Side::Left => (cell.x == 0, cell.y),
            Side::Right => (cell.x == grid.width - 1, cell.y),
        };
        on_edge && along >= self.start && along < self.start + self.length
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// A trap that has been announced but is not lethal yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTrap {
    pub side: Side,
    pub start: i32,
    pub length: i32,
    pub duration_ms: u64,
    pub arms_at: u64,
}

/// What ended a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Trap,
    SelfCollision,
}

/// Notifications for the render/audio collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Consumed { pos: Cell, points: u8, combo: u32 },
    ComboExpired,
    FoodExpired { slot: usize },
    PowerStarted { kind: PowerKind },
    PowerEnded { kind: PowerKind },
    TrapWarning { side: Side, start: i32, length: i32 },
    TrapArmed { trap: BorderTrap },
    TrapCleared { side: Side },
    IntervalChanged { interval_ms: u64 },
    Paused,
    Resumed,
    GameOver { cause: DeathCause, score: u64 },
    NewBest { score: u64 },
}

/// Fixed parameters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub grid: Grid,
    pub tier: DifficultyTier,
    /// Target number of foods on the board
    pub food_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            tier: DifficultyTier::Normal,
            food_count: DEFAULT_FOOD_COUNT,
        }
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SessionConfig,
    /// Seed this session's RNG was built from
    pub seed: u64,
    pub phase: GamePhase,
    /// Direction used by the most recent step
    pub direction: Direction,
    /// Accepted intent waiting for the next step
    pub queued_direction: Option<Direction>,
    /// Occupied cells, head first
    pub actor: VecDeque<Cell>,
    pub foods: Vec<Food>,
    pub effects: Vec<PowerEffect>,
    pub traps: Vec<BorderTrap>,
    pub pending_traps: Vec<PendingTrap>,
    pub combo: ComboTimer,
    pub score: u64,
    /// Current step interval
    pub interval_ms: u64,
    /// Steps executed this session
    pub time_ticks: u64,
    pub death_cause: Option<DeathCause>,
    /// Notifications produced since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a running session with the actor centred and foods spawned
    pub fn new(config: SessionConfig, seed: u64, now: u64) -> Self {
        let mut actor = VecDeque::new();
        actor.push_front(config.grid.center());

        let mut state = Self {
            config,
            seed,
            phase: GamePhase::Running,
            direction: Direction::Right,
            queued_direction: None,
            actor,
            foods: Vec::with_capacity(config.food_count + 1),
            effects: Vec::new(),
            traps: Vec::new(),
            pending_traps: Vec::new(),
            combo: ComboTimer::default(),
            score: 0,
            interval_ms: config.tier.base_interval_ms(),
            time_ticks: 0,
            death_cause: None,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_foods(now);
        state
    }

    pub fn head(&self) -> Cell {
        self.actor.front().copied().unwrap_or_else(|| self.config.grid.center())
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Queue a direction change for the next step
    ///
    /// Rejected when it reverses the direction the last step used. Returns
    /// whether the intent was accepted.
    pub fn try_set_direction(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.queued_direction = Some(dir);
        true
    }

    /// Direction the next step will use
    pub fn next_direction(&self) -> Direction {
        self.queued_direction.unwrap_or(self.direction)
    }

    /// Whether any body cell (tail included) occupies `cell`
    pub fn actor_occupies(&self, cell: Cell) -> bool {
        self.actor.contains(&cell)
    }

    /// Whether a live trap covers `cell`
    pub fn trap_at(&self, cell: Cell) -> bool {
        let grid = self.config.grid;
        self.traps.iter().any(|t| t.covers(cell, &grid))
    }

    pub fn food_index_at(&self, cell: Cell) -> Option<usize> {
        self.foods.iter().position(|f| f.pos == cell)
    }

    /// Top the board up to the target food count
    pub fn spawn_foods(&mut self, now: u64) -> usize {
        let target = self.config.food_count;
        spawn::spawn_foods(
            &mut self.foods,
            &self.actor,
            &self.config.grid,
            target,
            &mut self.rng,
            now,
        )
    }

    /// Replace the food in `index` with a fresh one elsewhere
    pub fn respawn_food(&mut self, index: usize, now: u64) {
        spawn::respawn_at(
            &mut self.foods,
            index,
            &self.actor,
            &self.config.grid,
            &mut self.rng,
            now,
        );
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
