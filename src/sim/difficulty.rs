//! Difficulty tiers and step-interval scaling

use serde::{Deserialize, Serialize};

use crate::consts::{DIFFICULTY_DECAY, DIFFICULTY_SCORE_STEP, FLOOR_INTERVAL_MS};

/// Level picked on the level-select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Normal,
    Hard,
    /// Fastest tier, the only one with border traps
    Insane,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 4] = [
        DifficultyTier::Easy,
        DifficultyTier::Normal,
        DifficultyTier::Hard,
        DifficultyTier::Insane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Hard => "Hard",
            DifficultyTier::Insane => "Insane",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyTier::Easy),
            "normal" => Some(DifficultyTier::Normal),
            "hard" => Some(DifficultyTier::Hard),
            "insane" => Some(DifficultyTier::Insane),
            _ => None,
        }
    }

    /// Step interval before any score scaling
    pub fn base_interval_ms(&self) -> u64 {
        match self {
            DifficultyTier::Easy => 200,
            DifficultyTier::Normal => 160,
            DifficultyTier::Hard => 110,
            DifficultyTier::Insane => 80,
        }
    }

    pub fn hazards_enabled(&self) -> bool {
        matches!(self, DifficultyTier::Insane)
    }
}

/// Step interval for `score`: 6% faster per 30 points, never below the floor
pub fn tick_interval(score: u64, base_interval_ms: u64) -> u64 {
    let steps = (score / DIFFICULTY_SCORE_STEP).min(i32::MAX as u64) as i32;
    let scaled = (base_interval_ms as f64 * DIFFICULTY_DECAY.powi(steps)).round() as u64;
    scaled.max(FLOOR_INTERVAL_MS)
}
