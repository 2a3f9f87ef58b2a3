//! Combo counter for consecutive timely consumptions
//!
//! The reset that follows a lapsed combo is an `expires_at` deadline checked by
//! the step, so correctness never depends on cancelling a timer.

use serde::{Deserialize, Serialize};

use crate::consts::{COMBO_GRACE_MS, COMBO_WINDOW_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTimer {
    pub count: u32,
    pub last_consume: Option<u64>,
    pub window_ms: u64,
    pub grace_ms: u64,
    /// Deadline after which a non-zero count is cleared
    pub expires_at: Option<u64>,
}

impl Default for ComboTimer {
    fn default() -> Self {
        Self::new(COMBO_WINDOW_MS, COMBO_GRACE_MS)
    }
}

impl ComboTimer {
    pub fn new(window_ms: u64, grace_ms: u64) -> Self {
        Self {
            count: 0,
            last_consume: None,
            window_ms,
            grace_ms,
            expires_at: None,
        }
    }

    /// Register a consumption at `now` and return the new count
    pub fn on_consume(&mut self, now: u64) -> u32 {
        let in_window = self
            .last_consume
            .is_some_and(|last| now.saturating_sub(last) <= self.window_ms);
        self.count = if in_window { self.count + 1 } else { 1 };
        self.last_consume = Some(now);
        self.expires_at = Some(now + self.window_ms + self.grace_ms);
        self.count
    }

    /// Clear the count if its deadline has passed; returns true on that transition
    pub fn expire(&mut self, now: u64) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.expires_at = None;
                let was_active = self.count > 0;
                self.count = 0;
                was_active
            }
            _ => false,
        }
    }
}
