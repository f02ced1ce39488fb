#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn to_index(self, width: usize) -> usize {
        self.y * width + self.x
    }

    /// adjacent cell in the given direction, None at the maze boundary
    pub fn neighbor(self, heading: Heading, width: usize, height: usize) -> Option<Self> {
        match heading {
            Heading::North if self.y + 1 < height => Some(Self::new(self.x, self.y + 1)),
            Heading::East if self.x + 1 < width => Some(Self::new(self.x + 1, self.y)),
            Heading::South if self.y > 0 => Some(Self::new(self.x, self.y - 1)),
            Heading::West if self.x > 0 => Some(Self::new(self.x - 1, self.y)),
            _ => None,
        }
    }
}

/// cardinal direction the robot can face; y grows northward, x grows eastward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    pub fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbor_respects_bounds() {
        let cell = Cell::new(0, 0);
        assert_eq!(cell.neighbor(Heading::North, 4, 4), Some(Cell::new(0, 1)));
        assert_eq!(cell.neighbor(Heading::East, 4, 4), Some(Cell::new(1, 0)));
        assert_eq!(cell.neighbor(Heading::South, 4, 4), None);
        assert_eq!(cell.neighbor(Heading::West, 4, 4), None);

        let corner = Cell::new(3, 3);
        assert_eq!(corner.neighbor(Heading::North, 4, 4), None);
        assert_eq!(corner.neighbor(Heading::East, 4, 4), None);
    }

    #[test]
    fn heading_rotations_are_inverses() {
        for heading in Heading::ALL {
            assert_eq!(heading.left().right(), heading);
            assert_eq!(heading.reverse().reverse(), heading);
            assert_eq!(heading.left().left(), heading.reverse());
        }
    }
}
