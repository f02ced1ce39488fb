use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::NavError;
use crate::maze::{Cell, Heading, WallAssumption, WallKnowledge};
use crate::motion::MoveType;

use super::flood::FloodFillSolver;

/// exploration strategy: one abstract move per cell given everything the
/// planner has learned so far; `MoveType::None` once a goal cell is reached
pub trait Explorer {
    fn next_move(
        &mut self,
        current: Cell,
        heading: Heading,
        walls: &WallKnowledge,
        goals: &[Cell],
    ) -> Result<MoveType, NavError>;

    fn name(&self) -> &'static str;

    fn reset(&mut self);
}

/// flood-fill exploration: re-solve distances optimistically after every
/// learned wall and descend the gradient
#[derive(Default)]
pub struct FloodFillExplorer;

impl Explorer for FloodFillExplorer {
    fn next_move(
        &mut self,
        current: Cell,
        heading: Heading,
        walls: &WallKnowledge,
        goals: &[Cell],
    ) -> Result<MoveType, NavError> {
        if goals.contains(&current) {
            return Ok(MoveType::None);
        }

        let distances =
            FloodFillSolver::recompute_distances(walls, goals, WallAssumption::Optimistic);
        FloodFillSolver::next_move(
            current,
            heading,
            &distances,
            walls,
            WallAssumption::Optimistic,
        )
    }

    fn name(&self) -> &'static str {
        "flood fill"
    }

    fn reset(&mut self) {}
}

/// wall follower that re-rolls its hand each cell: half the time a
/// left-hand step, half the time a right-hand step
pub struct RandomizedWallFollow {
    rng: StdRng,
}

impl RandomizedWallFollow {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomizedWallFollow {
    fn default() -> Self {
        Self::new()
    }
}

impl Explorer for RandomizedWallFollow {
    fn next_move(
        &mut self,
        current: Cell,
        heading: Heading,
        walls: &WallKnowledge,
        goals: &[Cell],
    ) -> Result<MoveType, NavError> {
        if goals.contains(&current) {
            return Ok(MoveType::None);
        }

        let left_hand = self.rng.gen_bool(0.5);
        let preference = if left_hand {
            [
                (heading.left(), MoveType::TurnLeft),
                (heading, MoveType::Forward),
                (heading.right(), MoveType::TurnRight),
                (heading.reverse(), MoveType::TurnAround),
            ]
        } else {
            [
                (heading.right(), MoveType::TurnRight),
                (heading, MoveType::Forward),
                (heading.left(), MoveType::TurnLeft),
                (heading.reverse(), MoveType::TurnAround),
            ]
        };

        for (side, move_type) in preference {
            if walls.passable(current, side, WallAssumption::Optimistic) {
                return Ok(move_type);
            }
        }

        // every side of an occupied cell reads as wall: evidence is corrupt
        Err(NavError::InconsistentMaze {
            x: current.x,
            y: current.y,
        })
    }

    fn name(&self) -> &'static str {
        "randomized wall follow"
    }

    fn reset(&mut self) {}
}
