use std::time::Duration;

use thiserror::Error;

use crate::motion::MoveType;

/// failure classes of the navigation core; `InconsistentMaze` and
/// `OutOfBoundsMove` are fatal to the run, `SensorTimeout` is recoverable
/// once, `TurnOvershoot` is clamped and only ever logged
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no decreasing-distance neighbor from ({x}, {y}) - wall knowledge is inconsistent")]
    InconsistentMaze { x: usize, y: usize },

    #[error("drive unresponsive: handshake flag not observed within {0:?}")]
    SensorTimeout(Duration),

    #[error("{move_type:?} from ({x}, {y}) would leave the {width}x{height} maze")]
    OutOfBoundsMove {
        move_type: MoveType,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("turn overshot {target_deg}° target by {excess_deg:.1}°, clamping")]
    TurnOvershoot { target_deg: f64, excess_deg: f64 },
}

impl NavError {
    /// fatal classes must halt motion before propagating
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InconsistentMaze { .. } | Self::OutOfBoundsMove { .. }
        )
    }
}
