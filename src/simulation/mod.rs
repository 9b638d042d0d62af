//! Standalone rail traffic control simulation
//!
//! This module contains the control engine: track model, block signaling,
//! train protection, kinematics, event emission and the simulation clock.
//! It has no rendering dependencies and can be driven from the console or
//! from tests one tick at a time.

mod block;
mod events;
mod protection;
mod scenario;
mod scheduler;
mod track;
mod train;
mod types;
mod world;

// Re-export public types for external use
pub use block::{aspect_for, recompute_blocks, BlockSection};
pub use events::{emit, EventLog, LogEvent, Severity, Transition};
pub use protection::{aspect_ahead, authority_exceeded, enforce, Intervention, ProtectionOutcome};
pub use scenario::{Preset, ScenarioDescriptor, TrainSpec};
pub use scheduler::{run, NoopObserver, Pacing, RunStats, TickObserver};
pub use track::{BlockExtent, SimTrack, SpeedRestriction, Station, TrackLayout};
pub use train::{SimTrain, TrainUpdateResult};
pub use types::{
    Aspect, BlockId, TrainId, ACCELERATION_STEP, AUTHORITY_BRAKE_STEP, AUTHORITY_LOOKAHEAD,
    BLOCK_LOOKAHEAD, CAUTION_SPEED_LIMIT, DANGER_BRAKE_STEP, DEFAULT_LOOP_START,
    DEFAULT_TRACK_LENGTH, LOG_CAPACITY, RESTRICTION_APPLY_RADIUS, RESTRICTION_TRIGGER_RADIUS,
    SECONDS_PER_HOUR, TICK_DISTANCE_SCALE, TICK_INTERVAL_MS,
};
pub use world::{advance, ClockState, SimWorld, Snapshot, TickOutput};
