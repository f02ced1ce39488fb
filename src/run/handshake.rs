use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::bridge::WallReading;
use crate::error::NavError;
use crate::motion::MoveType;

pub const MOVE_BUFFER_CAPACITY: usize = 256;

/// the single coordination point between the planner and driver loops: a
/// bounded move buffer and a wall-reading slot behind two ping-pong flags.
///
/// `moves_ready` is set by the planner and cleared only by the driver;
/// `moves_done_and_walls_set` is set by the driver and cleared only by the
/// planner. Ownership of each side's data transfers with its flag, so the
/// flags are never simultaneously true and no batch is lost or duplicated.
#[derive(Default)]
pub struct HandshakeBuffer {
    moves: Mutex<Vec<MoveType>>,
    walls: Mutex<Option<WallReading>>,
    moves_ready: AtomicBool,
    moves_done_and_walls_set: AtomicBool,
}

impl HandshakeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// planner side: hand a move batch to the driver; the previous batch
    /// must already be consumed (strict ping-pong)
    pub fn publish(&self, moves: &[MoveType]) {
        debug_assert!(
            !self.moves_ready.load(Ordering::Acquire),
            "move batch published before the previous one was consumed"
        );
        debug_assert!(moves.len() <= MOVE_BUFFER_CAPACITY);

        {
            let mut buffer = self.moves.lock().expect("handshake mutex poisoned");
            buffer.clear();
            buffer.extend_from_slice(moves);
        }
        self.moves_ready.store(true, Ordering::Release);
    }

    /// driver side: take the pending batch, if any; clears `moves_ready`
    pub fn try_consume(&self) -> Option<Vec<MoveType>> {
        if !self.moves_ready.load(Ordering::Acquire) {
            return None;
        }
        let batch = {
            let mut buffer = self.moves.lock().expect("handshake mutex poisoned");
            std::mem::take(&mut *buffer)
        };
        self.moves_ready.store(false, Ordering::Release);
        Some(batch)
    }

    /// driver side: report batch completion together with fresh walls
    pub fn publish_result(&self, walls: WallReading) {
        debug_assert!(
            !self.moves_done_and_walls_set.load(Ordering::Acquire),
            "wall result published before the previous one was consumed"
        );

        *self.walls.lock().expect("handshake mutex poisoned") = Some(walls);
        self.moves_done_and_walls_set.store(true, Ordering::Release);
    }

    /// planner side: take the pending wall reading, if any
    pub fn try_consume_result(&self) -> Option<WallReading> {
        if !self.moves_done_and_walls_set.load(Ordering::Acquire) {
            return None;
        }
        let walls = self
            .walls
            .lock()
            .expect("handshake mutex poisoned")
            .take();
        self.moves_done_and_walls_set.store(false, Ordering::Release);
        walls
    }

    pub fn flags(&self) -> (bool, bool) {
        (
            self.moves_ready.load(Ordering::Acquire),
            self.moves_done_and_walls_set.load(Ordering::Acquire),
        )
    }

    /// bounded poll for a move batch; no blocking primitive, per the
    /// constrained-hardware protocol, just a sleep-poll with a budget
    pub async fn await_moves(
        &self,
        poll: Duration,
        budget: Duration,
    ) -> Result<Vec<MoveType>, NavError> {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            if let Some(batch) = self.try_consume() {
                return Ok(batch);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(NavError::SensorTimeout(budget));
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// bounded poll for the driver's wall reading
    pub async fn await_result(
        &self,
        poll: Duration,
        budget: Duration,
    ) -> Result<WallReading, NavError> {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            if let Some(walls) = self.try_consume_result() {
                return Ok(walls);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(NavError::SensorTimeout(budget));
            }
            tokio::time::sleep(poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const POLL: Duration = Duration::from_micros(200);
    const BUDGET: Duration = Duration::from_secs(2);

    #[test]
    fn batch_is_consumed_exactly_once() {
        let buffer = HandshakeBuffer::new();
        buffer.publish(&[MoveType::Forward, MoveType::TurnLeft]);

        let batch = buffer.try_consume().unwrap();
        assert_eq!(batch, vec![MoveType::Forward, MoveType::TurnLeft]);
        assert!(buffer.try_consume().is_none(), "batch must not repeat");
    }

    #[test]
    fn result_is_consumed_exactly_once() {
        let buffer = HandshakeBuffer::new();
        buffer.publish_result(WallReading {
            left: true,
            front: false,
            right: true,
        });

        let walls = buffer.try_consume_result().unwrap();
        assert!(walls.left && !walls.front && walls.right);
        assert!(buffer.try_consume_result().is_none());
    }

    #[tokio::test]
    async fn empty_buffer_times_out() {
        let buffer = HandshakeBuffer::new();
        let err = buffer
            .await_moves(Duration::from_micros(100), Duration::from_millis(5))
            .await
            .unwrap_err();
        assert!(matches!(err, NavError::SensorTimeout(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 3)]
    async fn ping_pong_transfers_every_batch_in_order() {
        let buffer = Arc::new(HandshakeBuffer::new());
        let rounds = 100usize;

        let driver = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                for round in 0..rounds {
                    let batch = buffer.await_moves(POLL, BUDGET).await.unwrap();
                    // batch length encodes the round: nothing lost, nothing duplicated
                    assert_eq!(batch.len(), round % MOVE_BUFFER_CAPACITY + 1);
                    let (ready, done) = buffer.flags();
                    assert!(!(ready && done), "handshake flags both true");
                    buffer.publish_result(WallReading::default());
                }
            })
        };

        let planner = {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                for round in 0..rounds {
                    buffer.publish(&vec![MoveType::Forward; round % MOVE_BUFFER_CAPACITY + 1]);
                    buffer.await_result(POLL, BUDGET).await.unwrap();
                    let (ready, done) = buffer.flags();
                    assert!(!(ready && done), "handshake flags both true");
                }
            })
        };

        driver.await.unwrap();
        planner.await.unwrap();
    }
}
