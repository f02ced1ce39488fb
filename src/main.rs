mod bridge;
mod cli;
mod error;
mod logging;
mod maze;
mod motion;
mod run;
mod solve;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::{info, warn};

use bridge::SimBridge;
use cli::{Args, ExplorerKind};
use logging::Logger;
use maze::{Cell, Heading};
use motion::MotionConfig;
use run::{Driver, HandshakeBuffer, Planner, RunStats, StopSignal};
use solve::{FloodFillExplorer, RandomizedWallFollow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    if args.width < 2 || args.height < 2 {
        eyre::bail!("maze must be at least 2x2, got {}x{}", args.width, args.height);
    }

    info!(
        "mousenav: {}x{} maze, exploring with {}",
        args.width,
        args.height,
        args.explorer.name()
    );

    let config = MotionConfig::default();
    let heading: Heading = args.heading.into();
    let mut sim = SimBridge::new(args.width, args.height, heading, config.ticks_per_cell);
    if args.demo {
        add_demo_walls(&mut sim, args.width, args.height);
    }

    let buffer = Arc::new(HandshakeBuffer::new());
    let stop = Arc::new(StopSignal::default());

    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping");
                stop.request();
            }
        });
    }

    let mut driver = Driver::new(sim, config, buffer.clone(), stop.clone());
    let driver_task = tokio::spawn(async move {
        let result = driver.run().await;
        (driver, result)
    });

    let delay = Duration::from_millis(args.delay);
    let planner_result = match args.explorer {
        ExplorerKind::FloodFill => {
            let mut planner = Planner::new(
                FloodFillExplorer,
                args.width,
                args.height,
                heading,
                buffer,
                stop,
            )
            .with_delay(delay);
            planner.run().await
        }
        ExplorerKind::RandomizedWallFollow => {
            let mut planner = Planner::new(
                RandomizedWallFollow::new(),
                args.width,
                args.height,
                heading,
                buffer,
                stop,
            )
            .with_delay(delay);
            planner.run().await
        }
    };

    // the driver must wind down (and zero the wheels) before any planner
    // error is allowed to unwind the runtime
    let (driver, driver_result) = driver_task.await?;
    let stats = planner_result?;
    driver_result?;

    let parked = driver.bridge().cell();
    info!("robot parked at ({}, {})", parked.x, parked.y);
    print_summary(&stats);

    Ok(())
}

/// serpentine comb: every column walled off except one alternating gap,
/// so the whole arena stays connected but every run has to work for it
fn add_demo_walls(sim: &mut SimBridge, width: usize, height: usize) {
    let mut gap_at_top = false;
    for x in 0..width - 1 {
        let ys: Box<dyn Iterator<Item = usize>> = if gap_at_top {
            Box::new(0..height - 1)
        } else {
            Box::new(1..height)
        };
        for y in ys {
            sim.add_wall(Cell::new(x, y), Heading::East);
        }
        gap_at_top = !gap_at_top;
    }
}

fn print_summary(stats: &RunStats) {
    info!("{}", "mission summary".bold());
    info!("  explore:  {:>5} steps", stats.explore_steps);
    info!("  return:   {:>5} steps", stats.return_steps);
    info!("  planning: {:?}", stats.planning_time);
    info!("  total:    {:?}", stats.total_time);
    info!("  finished at {}", chrono::Local::now().format("%H:%M:%S"));
}
