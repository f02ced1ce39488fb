use std::collections::VecDeque;

use crate::maze::Cell;

/// descriptor of one propagation path: a range into the frontier arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRef {
    start: usize,
    len: usize,
}

/// borrowed view of one path, LIFO: the top is the most recently
/// discovered cell on this propagation path
#[derive(Debug, Clone, Copy)]
pub struct CellStack<'a> {
    cells: &'a [Cell],
}

impl CellStack<'_> {
    pub fn top(&self) -> Cell {
        // paths are seeded non-empty and only ever grow
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        self.cells
    }
}

/// FIFO queue of cell stacks backing the flood fill; paths live in a single
/// cell arena indexed by [`PathRef`], so pushing a child path is a range
/// copy instead of a fresh allocation
#[derive(Debug, Default)]
pub struct Frontier {
    arena: Vec<Cell>,
    queue: VecDeque<PathRef>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// enqueue a fresh single-cell path (a flood-fill source)
    pub fn seed(&mut self, cell: Cell) {
        let start = self.arena.len();
        self.arena.push(cell);
        self.queue.push_back(PathRef { start, len: 1 });
    }

    /// remove and return the front path; each path is popped exactly once
    pub fn pop_front(&mut self) -> Option<PathRef> {
        self.queue.pop_front()
    }

    pub fn stack(&self, path: PathRef) -> CellStack<'_> {
        CellStack {
            cells: &self.arena[path.start..path.start + path.len],
        }
    }

    pub fn top(&self, path: PathRef) -> Cell {
        self.stack(path).top()
    }

    /// enqueue a copy of `parent` extended by `next`; rejected when `next`
    /// repeats the parent's top cell, which would be a trivial cycle
    pub fn push_child(&mut self, parent: PathRef, next: Cell) -> bool {
        if self.top(parent) == next {
            return false;
        }

        let start = self.arena.len();
        self.arena
            .extend_from_within(parent.start..parent.start + parent.len);
        self.arena.push(next);
        self.queue.push_back(PathRef {
            start,
            len: parent.len + 1,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.seed(Cell::new(0, 0));
        frontier.seed(Cell::new(3, 3));

        let first = frontier.pop_front().unwrap();
        assert_eq!(frontier.top(first), Cell::new(0, 0));
        let second = frontier.pop_front().unwrap();
        assert_eq!(frontier.top(second), Cell::new(3, 3));
        assert!(frontier.pop_front().is_none());
    }

    #[test]
    fn child_path_copies_parent_and_appends() {
        let mut frontier = Frontier::new();
        frontier.seed(Cell::new(1, 1));

        let parent = frontier.pop_front().unwrap();
        assert!(frontier.push_child(parent, Cell::new(1, 2)));

        let child = frontier.pop_front().unwrap();
        let stack = frontier.stack(child);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.cells(), &[Cell::new(1, 1), Cell::new(1, 2)]);
        assert_eq!(stack.top(), Cell::new(1, 2));
    }

    #[test]
    fn rejects_consecutive_duplicate() {
        let mut frontier = Frontier::new();
        frontier.seed(Cell::new(2, 2));

        let parent = frontier.pop_front().unwrap();
        assert!(!frontier.push_child(parent, Cell::new(2, 2)));
        assert!(frontier.is_empty());
    }
}
