//! Core types for the rail simulation
//!
//! Identifiers, signal aspects and the tunables of the control engine.

use std::fmt;

/// A wrapper type for train IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(pub u32);

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "train {}", self.0)
    }
}

/// A wrapper type for block section IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}", self.0)
    }
}

/// The aspect shown by the signal protecting a block section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aspect {
    /// Green - block and the one after it are free
    #[default]
    Clear,
    /// Yellow - block is free but the following one is occupied
    Caution,
    /// Red - block is occupied
    Danger,
}

impl Aspect {
    /// Single character used by the console track strip
    pub fn symbol(&self) -> char {
        match self {
            Aspect::Clear => 'G',
            Aspect::Caution => 'Y',
            Aspect::Danger => 'R',
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aspect::Clear => "CLEAR",
            Aspect::Caution => "CAUTION",
            Aspect::Danger => "DANGER",
        };
        f.write_str(name)
    }
}

/// Simulated duration of one tick in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;

/// Seconds per hour, used to turn km/h into distance per tick
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Distance scaling applied per tick: `speed / 3600 * 100` metres
pub const TICK_DISTANCE_SCALE: f64 = 100.0;

/// Default modelled length of the loop in metres
pub const DEFAULT_TRACK_LENGTH: f64 = 1200.0;

/// Default position a train restarts from after passing the end of the loop
pub const DEFAULT_LOOP_START: f64 = 50.0;

/// How far ahead a train looks for the next block signal
pub const BLOCK_LOOKAHEAD: f64 = 100.0;

/// Fixed look-ahead compared against the movement authority
pub const AUTHORITY_LOOKAHEAD: f64 = 50.0;

/// Speed lost per tick while approaching a red signal (km/h)
pub const DANGER_BRAKE_STEP: f64 = 5.0;

/// Speed ceiling while approaching a yellow signal (km/h)
pub const CAUTION_SPEED_LIMIT: f64 = 60.0;

/// Speed gained per tick on a clear road (km/h)
pub const ACCELERATION_STEP: f64 = 2.0;

/// Speed lost per tick when the movement authority check fires (km/h)
pub const AUTHORITY_BRAKE_STEP: f64 = 3.0;

/// A previous speed above this counts as "moving" for the authority stop warning
pub const AUTHORITY_STOP_MIN_SPEED: f64 = 5.0;

/// A previous speed above this is required for the authority braking warning
pub const AUTHORITY_BRAKING_MIN_SPEED: f64 = 10.0;

/// A decrease larger than this is reported as authority braking
pub const AUTHORITY_BRAKING_MIN_DECREASE: f64 = 2.0;

/// Radius in which a balise is considered near a train
pub const RESTRICTION_TRIGGER_RADIUS: f64 = 5.0;

/// Radius in which a train is considered to be on top of a balise
pub const RESTRICTION_APPLY_RADIUS: f64 = 1.0;

/// Number of recent events kept by the event log
pub const LOG_CAPACITY: usize = 15;
