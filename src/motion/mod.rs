mod config;
mod controller;

pub use config::MotionConfig;
pub use controller::{DriveState, MotionController, MotionState, TickOutcome};

/// abstract move produced by the planner and consumed by the motion
/// controller; `None` marks the end of a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    None,
    Forward,
    TurnLeft,
    TurnRight,
    TurnAround,
}
