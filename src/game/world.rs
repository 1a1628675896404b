use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::StartConfig;
use super::error::GameError;
use super::grid::Coord;
use super::snake::Snake;

/// The static world: impassable cells, wrapping boundary cells and the
/// set of cells food may occupy
///
/// The boundary ring sits one cell outside the nominal play rectangle, so
/// the playable area is exactly `width x height` and a wrapping snake
/// (which wraps modulo the true bounds) never reaches a ring cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    maze: BTreeSet<Coord>,
    portal: BTreeSet<Coord>,
    food_positions: BTreeSet<Coord>,
    width: i32,
    height: i32,
}

impl World {
    /// Build the world for a start configuration
    pub fn build(config: &StartConfig) -> Self {
        let mut maze = config.obstacles.clone();
        let mut portal = BTreeSet::new();

        let ring = boundary_ring(config.width, config.height);
        if config.portal {
            portal = ring;
        } else {
            maze.extend(ring);
        }

        let food_positions = (0..config.width)
            .flat_map(|x| (0..config.height).map(move |y| Coord::new(x, y)))
            .filter(|c| !config.obstacles.contains(c))
            .collect();

        Self {
            maze,
            portal,
            food_positions,
            width: config.width,
            height: config.height,
        }
    }

    pub fn maze(&self) -> &BTreeSet<Coord> {
        &self.maze
    }

    pub fn portal(&self) -> &BTreeSet<Coord> {
        &self.portal
    }

    pub fn food_positions(&self) -> &BTreeSet<Coord> {
        &self.food_positions
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Uniformly pick a food cell not occupied by the snake
    ///
    /// `Err(NoValidFoodPosition)` means the board is full; callers treat
    /// that as a terminal (win) condition rather than retrying.
    pub fn find_food_position(
        &self,
        snake: &Snake,
        rng: &mut impl Rng,
    ) -> Result<Coord, GameError> {
        let candidates: Vec<Coord> = self
            .food_positions
            .iter()
            .copied()
            .filter(|c| !snake.occupies(*c))
            .collect();

        candidates
            .choose(rng)
            .copied()
            .ok_or(GameError::NoValidFoodPosition)
    }
}

/// The rectangle boundary extended by one cell in each direction:
/// `x in {-1, width}` or `y in {-1, height}`, corners included
fn boundary_ring(width: i32, height: i32) -> BTreeSet<Coord> {
    let mut ring = BTreeSet::new();
    for x in -1..=width {
        ring.insert(Coord::new(x, -1));
        ring.insert(Coord::new(x, height));
    }
    for y in -1..=height {
        ring.insert(Coord::new(-1, y));
        ring.insert(Coord::new(width, y));
    }
    ring
}
