//! Toroidal grid geometry
//!
//! Cells are `IVec2` values. Moving off one edge re-enters on the opposite edge.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::FREE_CELL_ATTEMPTS;

/// A grid coordinate, `0 <= x < width`, `0 <= y < height`
pub type Cell = IVec2;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }

    /// Parse a direction name or a common key binding (arrows, WASD)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "arrowup" | "w" => Some(Direction::Up),
            "down" | "arrowdown" | "s" => Some(Direction::Down),
            "left" | "arrowleft" | "a" => Some(Direction::Left),
            "right" | "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Fixed-size toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    pub fn center(&self) -> Cell {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// Reduce a coordinate onto the torus
    #[inline]
    pub fn wrap(&self, cell: Cell) -> Cell {
        IVec2::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
    }

    /// Neighbouring cell in `dir`, wrapped
    #[inline]
    pub fn step(&self, cell: Cell, dir: Direction) -> Cell {
        self.wrap(cell + dir.delta())
    }

    /// Manhattan distance measured the short way round each axis
    pub fn distance(&self, a: Cell, b: Cell) -> i32 {
        let dx = (a.x - b.x).rem_euclid(self.width);
        let dy = (a.y - b.y).rem_euclid(self.height);
        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    /// Sample a uniformly random cell not in `excluded`
    ///
    /// After `FREE_CELL_ATTEMPTS` misses the last sample is returned even if it
    /// collides, so a nearly full board can never stall the caller.
    pub fn random_free_cell<R: Rng + ?Sized>(&self, rng: &mut R, excluded: &HashSet<Cell>) -> Cell {
        let mut attempts = 0;
        loop {
            let cell = IVec2::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if !excluded.contains(&cell) {
                return cell;
            }
            attempts += 1;
            if attempts > FREE_CELL_ATTEMPTS {
                log::debug!("Free cell search exhausted, accepting ({}, {})", cell.x, cell.y);
                return cell;
            }
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        use crate::consts::{DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH};
        Self::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT)
    }
}
