//! Food spawning
//!
//! Pure functions over an injected RNG so tests can drive them with a seeded
//! generator.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use super::grid::{Cell, Grid};
use super::state::{Food, PowerKind};
use crate::consts::*;

/// Reward tier for a uniform roll in `[0, 1)`
pub fn reward_for_roll(roll: f64) -> u8 {
    if roll < RARE_CHANCE {
        3
    } else if roll < RARE_CHANCE + PREMIUM_CHANCE {
        2
    } else {
        1
    }
}

pub fn random_power<R: Rng + ?Sized>(rng: &mut R) -> PowerKind {
    PowerKind::ALL[rng.random_range(0..PowerKind::ALL.len())]
}

/// Draw reward points and an optional power tag
pub fn draw_food_kind<R: Rng + ?Sized>(rng: &mut R, power_chance: f64) -> (u8, Option<PowerKind>) {
    let points = reward_for_roll(rng.random::<f64>());
    let power = rng.random_bool(power_chance).then(|| random_power(rng));
    (points, power)
}

fn occupied_cells(foods: &[Food], actor: &VecDeque<Cell>, skip: Option<usize>) -> HashSet<Cell> {
    foods
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .map(|(_, f)| f.pos)
        .chain(actor.iter().copied())
        .collect()
}

/// Add foods until `target` are active; returns how many were added
pub fn spawn_foods<R: Rng + ?Sized>(
    foods: &mut Vec<Food>,
    actor: &VecDeque<Cell>,
    grid: &Grid,
    target: usize,
    rng: &mut R,
    now: u64,
) -> usize {
    let mut excluded = occupied_cells(foods, actor, None);
    let mut added = 0;
    while foods.len() < target {
        let pos = grid.random_free_cell(rng, &excluded);
        excluded.insert(pos);
        let (points, power) = draw_food_kind(rng, SPAWN_POWER_CHANCE);
        log::debug!("Spawned {}pt food at ({}, {}) power={:?}", points, pos.x, pos.y, power);
        foods.push(Food::new(pos, points, power, now));
        added += 1;
    }
    added
}

/// Replace the food in slot `index`, preferring a different cell
///
/// The slot keeps its index so the active count never changes.
pub fn respawn_at<R: Rng + ?Sized>(
    foods: &mut [Food],
    index: usize,
    actor: &VecDeque<Cell>,
    grid: &Grid,
    rng: &mut R,
    now: u64,
) {
    let Some(old_pos) = foods.get(index).map(|f| f.pos) else {
        return;
    };
    let excluded = occupied_cells(foods, actor, Some(index));

    let mut attempts = 0;
    let mut pos = grid.random_free_cell(rng, &excluded);
    while pos == old_pos && attempts < FREE_CELL_ATTEMPTS {
        pos = grid.random_free_cell(rng, &excluded);
        attempts += 1;
    }

    let (points, power) = draw_food_kind(rng, RESPAWN_POWER_CHANCE);
    foods[index] = Food::new(pos, points, power, now);
}

/// Place one extra power food if there is room for a bonus slot
pub fn spawn_bonus_food<R: Rng + ?Sized>(
    foods: &mut Vec<Food>,
    actor: &VecDeque<Cell>,
    grid: &Grid,
    target: usize,
    rng: &mut R,
    now: u64,
) -> bool {
    if foods.len() >= target + 1 {
        return false;
    }
    let excluded = occupied_cells(foods, actor, None);
    let pos = grid.random_free_cell(rng, &excluded);
    let power = random_power(rng);
    log::debug!("Bonus {:?} food at ({}, {})", power, pos.x, pos.y);
    foods.push(Food::new(pos, 1, Some(power), now));
    true
}
