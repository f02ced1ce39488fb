use super::cell::{Cell, Heading};
use crate::bridge::WallReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallState {
    Unknown,
    Open,
    Wall,
}

/// whether unknown walls are traversable during a flood-fill solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallAssumption {
    /// unknown walls are passable - exploration, so shortcuts can be discovered
    Optimistic,
    /// unknown walls block - safe return path over surveyed passages only
    Pessimistic,
}

/// per-cell, per-side wall evidence, monotonic: a side learned as Open or
/// Wall is never reverted (sensor noise is filtered upstream of this map)
#[derive(Debug, Clone)]
pub struct WallKnowledge {
    width: usize,
    height: usize,
    sides: Vec<[WallState; 4]>,
}

impl WallKnowledge {
    /// fresh map with only the exterior boundary known as walls
    pub fn new(width: usize, height: usize) -> Self {
        let mut knowledge = Self {
            width,
            height,
            sides: vec![[WallState::Unknown; 4]; width * height],
        };

        for x in 0..width {
            knowledge.set(Cell::new(x, 0), Heading::South, WallState::Wall);
            knowledge.set(Cell::new(x, height - 1), Heading::North, WallState::Wall);
        }
        for y in 0..height {
            knowledge.set(Cell::new(0, y), Heading::West, WallState::Wall);
            knowledge.set(Cell::new(width - 1, y), Heading::East, WallState::Wall);
        }

        knowledge
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, cell: Cell, side: Heading) -> WallState {
        self.sides[cell.to_index(self.width)][side.index()]
    }

    fn set(&mut self, cell: Cell, side: Heading, state: WallState) {
        self.sides[cell.to_index(self.width)][side.index()] = state;
    }

    /// record sensor evidence for one side of a cell, mirrored onto the
    /// adjacent cell's opposite side; contradictions keep the first verdict
    pub fn learn(&mut self, cell: Cell, side: Heading, wall: bool) {
        let state = if wall { WallState::Wall } else { WallState::Open };

        match self.get(cell, side) {
            WallState::Unknown => {
                self.set(cell, side, state);
                if let Some(adjacent) = cell.neighbor(side, self.width, self.height) {
                    self.set(adjacent, side.reverse(), state);
                }
            }
            existing if existing != state => {
                log::warn!(
                    "contradictory wall evidence at ({}, {}) {:?}: keeping {:?}, ignoring {:?}",
                    cell.x,
                    cell.y,
                    side,
                    existing,
                    state
                );
            }
            _ => {}
        }
    }

    /// merge one left/front/right reading taken at `cell` facing `heading`
    pub fn learn_reading(&mut self, cell: Cell, heading: Heading, reading: &WallReading) {
        self.learn(cell, heading.left(), reading.left);
        self.learn(cell, heading, reading.front);
        self.learn(cell, heading.right(), reading.right);
    }

    /// can the robot (or a flood-fill wave) cross from `cell` in `side`?
    pub fn passable(&self, cell: Cell, side: Heading, assumption: WallAssumption) -> bool {
        if cell.neighbor(side, self.width, self.height).is_none() {
            return false;
        }
        match self.get(cell, side) {
            WallState::Open => true,
            WallState::Wall => false,
            WallState::Unknown => matches!(assumption, WallAssumption::Optimistic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_prewalled() {
        let walls = WallKnowledge::new(4, 3);
        assert_eq!(walls.get(Cell::new(0, 0), Heading::West), WallState::Wall);
        assert_eq!(walls.get(Cell::new(0, 0), Heading::South), WallState::Wall);
        assert_eq!(walls.get(Cell::new(3, 2), Heading::East), WallState::Wall);
        assert_eq!(walls.get(Cell::new(3, 2), Heading::North), WallState::Wall);
        assert_eq!(
            walls.get(Cell::new(1, 1), Heading::North),
            WallState::Unknown
        );
    }

    #[test]
    fn learn_mirrors_to_adjacent_cell() {
        let mut walls = WallKnowledge::new(4, 4);
        walls.learn(Cell::new(1, 1), Heading::North, true);
        assert_eq!(walls.get(Cell::new(1, 1), Heading::North), WallState::Wall);
        assert_eq!(walls.get(Cell::new(1, 2), Heading::South), WallState::Wall);
    }

    #[test]
    fn learn_is_monotonic() {
        let mut walls = WallKnowledge::new(4, 4);
        walls.learn(Cell::new(1, 1), Heading::East, false);
        // contradicting evidence must not revert the side
        walls.learn(Cell::new(1, 1), Heading::East, true);
        assert_eq!(walls.get(Cell::new(1, 1), Heading::East), WallState::Open);
        assert_eq!(walls.get(Cell::new(2, 1), Heading::West), WallState::Open);
    }

    #[test]
    fn passable_honors_assumption() {
        let mut walls = WallKnowledge::new(4, 4);
        let cell = Cell::new(1, 1);
        assert!(walls.passable(cell, Heading::North, WallAssumption::Optimistic));
        assert!(!walls.passable(cell, Heading::North, WallAssumption::Pessimistic));

        walls.learn(cell, Heading::North, false);
        assert!(walls.passable(cell, Heading::North, WallAssumption::Pessimistic));

        walls.learn(cell, Heading::East, true);
        assert!(!walls.passable(cell, Heading::East, WallAssumption::Optimistic));

        // boundary is never passable regardless of assumption
        assert!(!walls.passable(Cell::new(0, 0), Heading::West, WallAssumption::Optimistic));
    }

    #[test]
    fn learn_reading_covers_three_sides() {
        let mut walls = WallKnowledge::new(4, 4);
        let reading = WallReading {
            left: true,
            front: false,
            right: true,
        };
        walls.learn_reading(Cell::new(1, 1), Heading::North, &reading);
        assert_eq!(walls.get(Cell::new(1, 1), Heading::West), WallState::Wall);
        assert_eq!(walls.get(Cell::new(1, 1), Heading::North), WallState::Open);
        assert_eq!(walls.get(Cell::new(1, 1), Heading::East), WallState::Wall);
    }
}
