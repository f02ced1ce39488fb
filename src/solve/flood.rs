use crate::error::NavError;
use crate::maze::{Cell, Heading, WallAssumption, WallKnowledge};
use crate::motion::MoveType;

use super::frontier::Frontier;

/// sentinel distance for cells the flood never reached
pub const UNREACHED: u32 = u32::MAX;

/// per-cell shortest known distance to the goal region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    distances: Vec<u32>,
}

impl DistanceMap {
    pub fn get(&self, cell: Cell) -> u32 {
        self.distances[cell.to_index(self.width)]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// breadth-first flood fill from the goal region outward over passages the
/// given wall assumption admits
pub struct FloodFillSolver;

impl FloodFillSolver {
    pub fn recompute_distances(
        walls: &WallKnowledge,
        goals: &[Cell],
        assumption: WallAssumption,
    ) -> DistanceMap {
        let (width, height) = (walls.width(), walls.height());
        let mut distances = vec![UNREACHED; width * height];
        let mut frontier = Frontier::new();

        for &goal in goals {
            distances[goal.to_index(width)] = 0;
            frontier.seed(goal);
        }

        while let Some(path) = frontier.pop_front() {
            let cell = frontier.top(path);
            let here = distances[cell.to_index(width)];

            for side in Heading::ALL {
                if !walls.passable(cell, side, assumption) {
                    continue;
                }
                let Some(neighbor) = cell.neighbor(side, width, height) else {
                    continue;
                };
                if distances[neighbor.to_index(width)] > here + 1 {
                    distances[neighbor.to_index(width)] = here + 1;
                    frontier.push_child(path, neighbor);
                }
            }
        }

        DistanceMap {
            width,
            height,
            distances,
        }
    }

    /// next move toward the goal: the neighbor with strictly smaller
    /// distance, preferring straight over any turn; `MoveType::None` at the
    /// goal, `InconsistentMaze` when no neighbor descends. The assumption
    /// must match the one the distance map was solved under, or a
    /// pessimistic map could route through an unsurveyed passage.
    pub fn next_move(
        current: Cell,
        heading: Heading,
        distances: &DistanceMap,
        walls: &WallKnowledge,
        assumption: WallAssumption,
    ) -> Result<MoveType, NavError> {
        let here = distances.get(current);
        if here == 0 {
            return Ok(MoveType::None);
        }

        let candidates = [
            (heading, MoveType::Forward),
            (heading.left(), MoveType::TurnLeft),
            (heading.right(), MoveType::TurnRight),
            (heading.reverse(), MoveType::TurnAround),
        ];

        for (side, move_type) in candidates {
            if !walls.passable(current, side, assumption) {
                continue;
            }
            let Some(neighbor) = current.neighbor(side, walls.width(), walls.height()) else {
                continue;
            };
            if distances.get(neighbor) < here {
                return Ok(move_type);
            }
        }

        Err(NavError::InconsistentMaze {
            x: current.x,
            y: current.y,
        })
    }
}
