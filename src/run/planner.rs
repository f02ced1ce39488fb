use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bridge::WallReading;
use crate::error::NavError;
use crate::maze::{Cell, Heading, WallAssumption, WallKnowledge, center_goals};
use crate::motion::MoveType;
use crate::solve::{Explorer, FloodFillSolver};

use super::StopSignal;
use super::handshake::HandshakeBuffer;

/// outcome of a complete mission: explore to the goal region, then drive
/// the surveyed return path home
#[derive(Debug)]
pub struct RunStats {
    pub explore_steps: usize,
    pub return_steps: usize,
    pub planning_time: Duration,
    pub total_time: Duration,
}

/// the planner loop: learns walls from the driver's readings, selects one
/// abstract move at a time, and hands it across the handshake buffer
pub struct Planner<E: Explorer> {
    explorer: E,
    walls: WallKnowledge,
    position: Cell,
    heading: Heading,
    start: Cell,
    goals: Vec<Cell>,
    buffer: Arc<HandshakeBuffer>,
    stop: Arc<StopSignal>,
    delay: Duration,
    poll: Duration,
    budget: Duration,
}

impl<E: Explorer> Planner<E> {
    pub fn new(
        explorer: E,
        width: usize,
        height: usize,
        initial_heading: Heading,
        buffer: Arc<HandshakeBuffer>,
        stop: Arc<StopSignal>,
    ) -> Self {
        Self {
            explorer,
            walls: WallKnowledge::new(width, height),
            position: Cell::new(0, 0),
            heading: initial_heading,
            start: Cell::new(0, 0),
            goals: center_goals(width, height),
            buffer,
            stop,
            delay: Duration::ZERO,
            poll: Duration::from_micros(200),
            budget: Duration::from_secs(5),
        }
    }

    pub fn with_timing(mut self, poll: Duration, budget: Duration) -> Self {
        self.poll = poll;
        self.budget = budget;
        self
    }

    /// optional pause between moves, for watching a demo run
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub async fn run(&mut self) -> eyre::Result<RunStats> {
        let total_start = Instant::now();
        let mut planning_time = Duration::default();
        self.explorer.reset();

        // the driver surveys the starting cell before any move is issued
        let initial = self.await_walls().await?;
        self.walls
            .learn_reading(self.position, self.heading, &initial);

        log::info!(
            "phase 1: exploring toward the goal region with {}",
            self.explorer.name()
        );
        let explore_steps = self.explore_phase(&mut planning_time).await?;
        log::info!(
            "goal reached at ({}, {}) after {} steps",
            self.position.x,
            self.position.y,
            explore_steps
        );

        log::info!("phase 2: returning to start over surveyed passages");
        let return_steps = self.return_phase(&mut planning_time).await?;
        log::info!("back at start after {} steps", return_steps);

        // tell the driver the mission is over
        self.buffer.publish(&[MoveType::None]);

        let total_time = total_start.elapsed();
        Ok(RunStats {
            explore_steps,
            return_steps,
            planning_time,
            total_time,
        })
    }

    async fn explore_phase(&mut self, planning_time: &mut Duration) -> eyre::Result<usize> {
        let mut steps = 0usize;
        loop {
            self.check_stop()?;

            let planning_start = Instant::now();
            let next = self.explorer.next_move(
                self.position,
                self.heading,
                &self.walls,
                &self.goals,
            );
            *planning_time += planning_start.elapsed();

            let move_type = self.fatal_guard(next)?;
            if move_type == MoveType::None {
                return Ok(steps);
            }

            self.dispatch(move_type).await?;
            steps += 1;

            if steps > 10_000 {
                self.stop.request();
                eyre::bail!("too many exploration steps ({steps}) - possible infinite loop");
            }
            if self.delay > Duration::ZERO {
                tokio::time::sleep(self.delay).await;
            }
        }
    }

    async fn return_phase(&mut self, planning_time: &mut Duration) -> eyre::Result<usize> {
        let home = [self.start];
        let mut steps = 0usize;
        loop {
            self.check_stop()?;
            if self.position == self.start {
                return Ok(steps);
            }

            let planning_start = Instant::now();
            // unknown walls block the return path: only surveyed passages
            let distances = FloodFillSolver::recompute_distances(
                &self.walls,
                &home,
                WallAssumption::Pessimistic,
            );
            let next = FloodFillSolver::next_move(
                self.position,
                self.heading,
                &distances,
                &self.walls,
                WallAssumption::Pessimistic,
            );
            *planning_time += planning_start.elapsed();

            let move_type = self.fatal_guard(next)?;
            self.dispatch(move_type).await?;
            steps += 1;

            if steps > 10_000 {
                self.stop.request();
                eyre::bail!("too many return steps ({steps}) - possible infinite loop");
            }
            if self.delay > Duration::ZERO {
                tokio::time::sleep(self.delay).await;
            }
        }
    }

    /// publish one move, wait for the driver to finish it, and fold the
    /// fresh wall reading into our knowledge at the new pose
    async fn dispatch(&mut self, move_type: MoveType) -> eyre::Result<()> {
        log::debug!(
            "step: {:?} from ({}, {}) facing {:?}",
            move_type,
            self.position.x,
            self.position.y,
            self.heading
        );

        self.buffer.publish(&[move_type]);
        let reading = self.await_walls().await?;
        self.apply_move(move_type)?;
        self.walls
            .learn_reading(self.position, self.heading, &reading);
        Ok(())
    }

    fn apply_move(&mut self, move_type: MoveType) -> eyre::Result<()> {
        match move_type {
            MoveType::Forward => {
                let next = self
                    .position
                    .neighbor(self.heading, self.walls.width(), self.walls.height());
                let Some(next) = next else {
                    // assertion class: correct wall knowledge can never pick this
                    let err = NavError::OutOfBoundsMove {
                        move_type,
                        x: self.position.x,
                        y: self.position.y,
                        width: self.walls.width(),
                        height: self.walls.height(),
                    };
                    self.stop.request();
                    return Err(err.into());
                };
                self.position = next;
            }
            MoveType::TurnLeft => self.heading = self.heading.left(),
            MoveType::TurnRight => self.heading = self.heading.right(),
            MoveType::TurnAround => self.heading = self.heading.reverse(),
            MoveType::None => {}
        }
        Ok(())
    }

    /// wait for the driver's wall reading; one timeout is tolerated, a
    /// second consecutive one means the drive has stalled
    async fn await_walls(&self) -> eyre::Result<WallReading> {
        match self.buffer.await_result(self.poll, self.budget).await {
            Ok(reading) => Ok(reading),
            Err(first) => {
                log::warn!("{first}; polling once more");
                match self.buffer.await_result(self.poll, self.budget).await {
                    Ok(reading) => Ok(reading),
                    Err(second) => {
                        log::error!("drive unresponsive, aborting mission");
                        self.stop.request();
                        Err(second.into())
                    }
                }
            }
        }
    }

    /// fatal planner errors halt motion before they propagate
    fn fatal_guard(&self, next: Result<MoveType, NavError>) -> eyre::Result<MoveType> {
        match next {
            Ok(move_type) => Ok(move_type),
            Err(e) => {
                if e.is_fatal() {
                    self.stop.request();
                }
                Err(e.into())
            }
        }
    }

    fn check_stop(&self) -> eyre::Result<()> {
        if self.stop.is_requested() {
            eyre::bail!("stop requested before the mission completed");
        }
        Ok(())
    }
}
