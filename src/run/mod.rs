mod driver;
mod handshake;
mod planner;

pub use driver::Driver;
pub use handshake::{HandshakeBuffer, MOVE_BUFFER_CAPACITY};
pub use planner::{Planner, RunStats};

use std::sync::atomic::{AtomicBool, Ordering};

/// cooperative cancellation: observed by the driver between ticks and by
/// the planner between moves, never mid-correction
#[derive(Debug, Default)]
pub struct StopSignal(AtomicBool);

impl StopSignal {
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
