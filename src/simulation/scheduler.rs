//! Fixed-interval scheduling of simulation ticks
//!
//! The scheduler is the timer service: it invokes [`SimWorld::tick`] once per
//! interval and hands each published tick to a [`TickObserver`]. Stopping is
//! simply not scheduling further ticks.

use std::thread;
use std::time::{Duration, Instant};

use log::info;

use super::events::{LogEvent, Transition};
use super::types::TICK_INTERVAL_MS;
use super::world::{SimWorld, TickOutput};

/// How ticks are spaced in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Run ticks back to back
    AsFastAsPossible,
    /// Sleep so that each tick takes one tick interval
    RealTime,
}

/// A collaborator that reads the world after each completed tick
pub trait TickObserver {
    fn on_tick(&mut self, world: &SimWorld, output: &TickOutput);
}

/// Observer that ignores every tick
pub struct NoopObserver;

impl TickObserver for NoopObserver {
    fn on_tick(&mut self, _world: &SimWorld, _output: &TickOutput) {}
}

/// Counters gathered over a scheduled run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Ticks that actually advanced the simulation
    pub ticks_run: u64,
    pub events_emitted: usize,
    pub warnings_emitted: usize,
    pub atp_stops: usize,
    pub lap_restarts: usize,
}

impl RunStats {
    pub fn record(&mut self, events: &[LogEvent]) {
        self.events_emitted += events.len();
        for event in events {
            if event.is_warning() {
                self.warnings_emitted += 1;
            }
            match event.transition {
                Transition::RedSignalStop { .. } => self.atp_stops += 1,
                Transition::LapRestart { .. } => self.lap_restarts += 1,
                _ => {}
            }
        }
    }
}

/// Schedule `ticks` timer firings on the world.
///
/// Firings while the clock is paused do not advance the simulation and are
/// not counted in [`RunStats::ticks_run`].
pub fn run<O: TickObserver>(
    world: &mut SimWorld,
    ticks: u32,
    pacing: Pacing,
    observer: &mut O,
) -> RunStats {
    let interval = Duration::from_millis(TICK_INTERVAL_MS);
    let mut stats = RunStats::default();

    for _ in 0..ticks {
        let started = Instant::now();
        let before = world.tick_count();

        let output = world.tick();
        if world.tick_count() != before {
            stats.ticks_run += 1;
            stats.record(&output.events);
        }
        observer.on_tick(world, &output);

        if pacing == Pacing::RealTime {
            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    info!(
        "Scheduled {} ticks, {} advanced the simulation",
        ticks, stats.ticks_run
    );
    stats
}
