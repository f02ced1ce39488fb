mod explore;
mod flood;
mod frontier;

pub use explore::{Explorer, FloodFillExplorer, RandomizedWallFollow};
pub use flood::{DistanceMap, FloodFillSolver, UNREACHED};
pub use frontier::{CellStack, Frontier, PathRef};
