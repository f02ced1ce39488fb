use std::sync::Arc;
use std::time::Duration;

use crate::bridge::SensorBridge;
use crate::motion::{MotionConfig, MotionController, MoveType, TickOutcome};

use super::StopSignal;
use super::handshake::HandshakeBuffer;

/// the driver loop: consumes move batches from the handshake buffer, runs
/// the motion controller tick by tick against the sensor bridge, and
/// reports fresh wall readings once each batch is done
pub struct Driver<B: SensorBridge> {
    bridge: B,
    controller: MotionController,
    buffer: Arc<HandshakeBuffer>,
    stop: Arc<StopSignal>,
    tick_interval: Duration,
    poll: Duration,
    budget: Duration,
}

impl<B: SensorBridge> Driver<B> {
    pub fn new(
        bridge: B,
        config: MotionConfig,
        buffer: Arc<HandshakeBuffer>,
        stop: Arc<StopSignal>,
    ) -> Self {
        Self {
            bridge,
            controller: MotionController::new(config),
            buffer,
            stop,
            tick_interval: Duration::from_micros(500),
            poll: Duration::from_micros(200),
            budget: Duration::from_secs(5),
        }
    }

    pub fn with_timing(mut self, tick_interval: Duration, poll: Duration, budget: Duration) -> Self {
        self.tick_interval = tick_interval;
        self.poll = poll;
        self.budget = budget;
        self
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub async fn run(&mut self) -> eyre::Result<()> {
        log::debug!("driver loop started");

        // survey the starting cell so the planner sees before its first move
        let initial = self.bridge.read_walls();
        self.buffer.publish_result(initial);

        let mut consecutive_timeouts = 0u32;
        loop {
            if self.stop.is_requested() {
                log::info!("stop requested, halting drive");
                self.controller.stop(&mut self.bridge);
                return Ok(());
            }

            let batch = match self.buffer.await_moves(self.poll, self.budget).await {
                Ok(batch) => {
                    consecutive_timeouts = 0;
                    batch
                }
                Err(e) => {
                    consecutive_timeouts += 1;
                    if consecutive_timeouts >= 2 {
                        log::error!("planner unresponsive, halting drive: {e}");
                        self.controller.stop(&mut self.bridge);
                        return Err(e.into());
                    }
                    log::warn!("{e}; polling again");
                    continue;
                }
            };

            if batch.contains(&MoveType::None) {
                log::info!("mission complete, drive idle");
                self.controller.stop(&mut self.bridge);
                return Ok(());
            }

            for (index, &move_type) in batch.iter().enumerate() {
                // stop at the end of the batch and before any non-forward
                // move, so pivots always start from a standstill
                let stop_after = batch
                    .get(index + 1)
                    .is_none_or(|next| *next != MoveType::Forward);

                log::trace!("executing {move_type:?} (stop_after={stop_after})");
                self.controller.begin(move_type, stop_after, &mut self.bridge);

                loop {
                    if self.stop.is_requested() {
                        log::info!("stop requested mid-move, halting drive");
                        self.controller.stop(&mut self.bridge);
                        return Ok(());
                    }
                    if self.controller.tick(&mut self.bridge) == TickOutcome::Complete {
                        break;
                    }
                    tokio::time::sleep(self.tick_interval).await;
                }
            }

            let walls = self.bridge.read_walls();
            self.buffer.publish_result(walls);
        }
    }
}
