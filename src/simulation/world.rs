//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the snapshot (trains, blocks, log) and the clock state.
//! A tick is computed by [`advance`], a pure function over the previous
//! snapshot, and only then published to readers.

use anyhow::Result;
use log::{debug, info};

use super::block::{recompute_blocks, BlockSection};
use super::events::{emit, EventLog, LogEvent, Transition};
use super::protection::enforce;
use super::scenario::{Preset, ScenarioDescriptor};
use super::track::SimTrack;
use super::train::{SimTrain, TrainUpdateResult};
use super::types::TICK_INTERVAL_MS;

/// Clock state of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    Running,
    #[default]
    Paused,
}

/// The mutable part of the simulation, replaced once per tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub trains: Vec<SimTrain>,
    pub blocks: Vec<BlockSection>,
}

/// What a tick published
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Number of ticks run since the scenario was loaded
    pub tick: u64,
    /// Simulated milliseconds since the scenario was loaded
    pub time_ms: u64,
    pub trains: Vec<SimTrain>,
    pub blocks: Vec<BlockSection>,
    /// Events produced by this tick, in emission order
    pub events: Vec<LogEvent>,
}

/// Advance a snapshot by one tick.
///
/// Every train is protected and moved against the pre-tick blocks, then the
/// blocks are recomputed from the new train positions. `time_ms` stamps the
/// emitted events.
pub fn advance(track: &SimTrack, snapshot: &Snapshot, time_ms: u64) -> (Snapshot, Vec<LogEvent>) {
    let mut transitions = Vec::new();

    let trains: Vec<SimTrain> = snapshot
        .trains
        .iter()
        .map(|train| {
            let outcome = enforce(train, track, &snapshot.blocks);
            transitions.extend(outcome.transitions);

            let mut train = train.clone();
            if train.advance(outcome.speed, track) == TrainUpdateResult::LapRestart {
                transitions.push(Transition::LapRestart { train: train.id });
            }
            train
        })
        .collect();

    let (blocks, block_transitions) = recompute_blocks(track, &snapshot.blocks, &trains);
    transitions.extend(block_transitions);

    (Snapshot { trains, blocks }, emit(transitions, time_ms))
}

/// The main simulation world
pub struct SimWorld {
    track: SimTrack,
    snapshot: Snapshot,
    log: EventLog,
    state: ClockState,

    /// Ticks run since the scenario was loaded
    tick_count: u64,

    /// Simulated time in milliseconds
    time_ms: u64,
}

impl SimWorld {
    /// Create a world running the given scenario, paused
    pub fn from_scenario(descriptor: &ScenarioDescriptor) -> Result<Self> {
        let (track, trains) = descriptor.build()?;
        let mut world = Self {
            snapshot: Snapshot {
                trains: Vec::new(),
                blocks: Vec::new(),
            },
            track,
            log: EventLog::new(),
            state: ClockState::Paused,
            tick_count: 0,
            time_ms: 0,
        };
        world.replace_state(descriptor, trains);
        Ok(world)
    }

    /// Create a world running one of the built-in scenarios
    pub fn with_preset(preset: Preset) -> Result<Self> {
        Self::from_scenario(&preset.descriptor())
    }

    /// Replace trains, blocks and log with a new scenario and pause the clock.
    ///
    /// An invalid descriptor is rejected and leaves the world untouched.
    pub fn load_scenario(&mut self, descriptor: &ScenarioDescriptor) -> Result<()> {
        let (track, trains) = descriptor.build()?;
        self.track = track;
        self.replace_state(descriptor, trains);
        Ok(())
    }

    fn replace_state(&mut self, descriptor: &ScenarioDescriptor, trains: Vec<SimTrain>) {
        let blocks = self
            .track
            .blocks()
            .iter()
            .map(BlockSection::from_extent)
            .collect();

        self.snapshot = Snapshot { trains, blocks };
        self.state = ClockState::Paused;
        self.tick_count = 0;
        self.time_ms = 0;
        self.log.clear();
        self.log.extend(emit(
            vec![Transition::ScenarioLoaded {
                description: descriptor.description.clone(),
            }],
            0,
        ));

        info!(
            "Loaded scenario '{}' with {} trains and {} blocks",
            descriptor.description,
            self.snapshot.trains.len(),
            self.snapshot.blocks.len()
        );
    }

    /// Start or pause the clock without touching the simulation state
    pub fn set_running(&mut self, running: bool) {
        let state = if running {
            ClockState::Running
        } else {
            ClockState::Paused
        };
        if state != self.state {
            info!("Clock {:?} -> {:?} at tick {}", self.state, state, self.tick_count);
            self.state = state;
        }
    }

    pub fn toggle(&mut self) {
        self.set_running(!self.is_running());
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Timer entry point: advances one interval while running, otherwise
    /// returns the current snapshot with no events.
    pub fn tick(&mut self) -> TickOutput {
        match self.state {
            ClockState::Running => self.step(),
            ClockState::Paused => self.output(Vec::new()),
        }
    }

    /// Advance exactly one interval, whatever the clock state
    pub fn step(&mut self) -> TickOutput {
        let time_ms = self.time_ms + TICK_INTERVAL_MS;
        let (snapshot, events) = advance(&self.track, &self.snapshot, time_ms);

        self.snapshot = snapshot;
        self.tick_count += 1;
        self.time_ms = time_ms;
        self.log.extend(events.iter().cloned());

        debug!(
            "Tick {} ({} ms): {} events",
            self.tick_count,
            self.time_ms,
            events.len()
        );

        self.output(events)
    }

    fn output(&self, events: Vec<LogEvent>) -> TickOutput {
        TickOutput {
            tick: self.tick_count,
            time_ms: self.time_ms,
            trains: self.snapshot.trains.clone(),
            blocks: self.snapshot.blocks.clone(),
            events,
        }
    }

    pub fn track(&self) -> &SimTrack {
        &self.track
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn trains(&self) -> &[SimTrain] {
        &self.snapshot.trains
    }

    pub fn blocks(&self) -> &[BlockSection] {
        &self.snapshot.blocks
    }

    /// The most recent events, capped for display
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Rail Simulation Summary ===");
        println!(
            "Tick: {}, Time: {:.1}s, Clock: {:?}",
            self.tick_count,
            self.time_ms as f64 / 1000.0,
            self.state
        );
        println!(
            "Blocks: {}, Occupied: {}",
            self.blocks().len(),
            self.blocks().iter().filter(|b| b.occupied).count()
        );
        println!();

        println!("--- Trains ---");
        for train in self.trains() {
            let next_station = self
                .track
                .next_station(train.position)
                .map(|s| s.name.as_str())
                .unwrap_or("-");
            println!(
                "  {}: position={:.0}m, speed={:.0} km/h, max={:.0} km/h, ma=+{:.0}m, next station={}",
                train.id,
                train.position,
                train.speed,
                train.max_speed,
                train.movement_authority,
                next_station
            );
        }

        println!("--- Blocks ---");
        for block in self.blocks() {
            println!(
                "  {} [{:.0}, {:.0}): {}{}",
                block.id,
                block.start,
                block.end,
                block.aspect,
                if block.occupied { " (occupied)" } else { "" }
            );
        }

        if !self.log.is_empty() {
            println!("--- Recent Events ---");
            for event in self.log.newest_first() {
                println!("  {}", event);
            }
        }
    }

    /// Draw the loop as a strip of characters in the terminal
    pub fn draw_track(&self) {
        const WIDTH: usize = 60;

        let length = self.track.length();
        let to_col = |position: f64| -> usize {
            ((position / length * WIDTH as f64) as usize).min(WIDTH - 1)
        };

        let mut rail = vec!['='; WIDTH];
        let mut markers = vec![' '; WIDTH];

        for station in self.track.stations() {
            markers[to_col(station.position)] = 'S';
        }
        for restriction in self.track.restrictions() {
            markers[to_col(restriction.position)] = 'b';
        }

        // Signals sit at the end of the block they protect
        for block in self.blocks() {
            let col = to_col(block.end).saturating_sub(1);
            rail[col] = block.aspect.symbol();
        }
        for train in self.trains() {
            let digit = char::from_digit(train.id.0 % 10, 10).unwrap_or('T');
            rail[to_col(train.position)] = digit;
        }

        println!("\n=== Track ===");
        println!("Legend: 1-9=Train, G/Y/R=Signal aspect, S=Station, b=Balise, ==Rail");
        println!();
        println!("{}", rail.iter().collect::<String>());
        println!("{}", markers.iter().collect::<String>());
        println!();
    }
}
