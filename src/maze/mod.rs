mod cell;
mod walls;

pub use cell::{Cell, Heading};
pub use walls::{WallAssumption, WallKnowledge, WallState};

/// goal region for the exploration run: the geometric center cell(s),
/// one cell for odd dimensions, two or four for even ones
pub fn center_goals(width: usize, height: usize) -> Vec<Cell> {
    let xs = if width % 2 == 0 {
        vec![width / 2 - 1, width / 2]
    } else {
        vec![width / 2]
    };
    let ys = if height % 2 == 0 {
        vec![height / 2 - 1, height / 2]
    } else {
        vec![height / 2]
    };

    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| Cell::new(x, y)))
        .collect()
}
