use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::maze::Heading;

#[derive(Parser, Debug)]
#[command(name = "mousenav")]
#[command(about = "Micromouse navigation core: flood-fill planner and PID motion driver")]
pub struct Args {
    /// Sets the logger's verbosity level
    #[arg(short, long, value_name = "VERBOSITY", default_value_t = LevelFilter::Info)]
    pub verbosity: LevelFilter,

    /// Maze width in cells
    #[arg(long, default_value_t = 6)]
    pub width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = 6)]
    pub height: usize,

    /// Direction the robot faces in the start cell
    #[arg(long, value_enum, default_value = "north")]
    pub heading: InitialHeading,

    /// Exploration algorithm for the outbound run
    #[arg(short, long, value_enum, default_value = "flood-fill")]
    pub explorer: ExplorerKind,

    /// Delay between moves in milliseconds (0 = no delay)
    #[arg(short, long, default_value_t = 0)]
    pub delay: u64,

    /// Drive the built-in serpentine demo maze instead of an open arena
    #[arg(long)]
    pub demo: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InitialHeading {
    North,
    East,
    South,
    West,
}

impl From<InitialHeading> for Heading {
    fn from(heading: InitialHeading) -> Self {
        match heading {
            InitialHeading::North => Self::North,
            InitialHeading::East => Self::East,
            InitialHeading::South => Self::South,
            InitialHeading::West => Self::West,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExplorerKind {
    /// Flood-fill distance descent, re-solved after every learned wall
    #[value(name = "flood-fill")]
    FloodFill,

    /// Wall follower that picks a left- or right-hand step at random
    #[value(name = "randomized-wall-follow")]
    RandomizedWallFollow,
}

impl ExplorerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FloodFill => "flood fill",
            Self::RandomizedWallFollow => "randomized wall follow",
        }
    }
}
