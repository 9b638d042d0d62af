//! Event emission for the rail simulation
//!
//! The engine records what happened during a tick as typed [`Transition`]s.
//! [`emit`] turns them into timestamped [`LogEvent`]s, and [`EventLog`] is the
//! bounded view kept for the log display.

use std::collections::VecDeque;
use std::fmt;

use super::types::{BlockId, TrainId, LOG_CAPACITY};

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A state transition detected during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A new scenario replaced the world state
    ScenarioLoaded { description: String },
    /// A block went from free to occupied
    BlockOccupied { block: BlockId },
    /// A train is passing over a balise
    RestrictionDetected { train: TrainId, speed_limit: f64 },
    /// ATP brought a train to a stand in front of a red signal
    RedSignalStop { train: TrainId },
    /// ATP cut a train's speed down to the caution limit
    CautionSpeedReduction { train: TrainId },
    /// A train stopped at the limit of its movement authority
    AuthorityStop { train: TrainId },
    /// A train is braking as it approaches its movement authority limit
    AuthorityBraking { train: TrainId },
    /// A train passed the end of the loop and restarted
    LapRestart { train: TrainId },
}

impl Transition {
    pub fn severity(&self) -> Severity {
        match self {
            Transition::RedSignalStop { .. }
            | Transition::CautionSpeedReduction { .. }
            | Transition::AuthorityStop { .. }
            | Transition::AuthorityBraking { .. } => Severity::Warning,
            Transition::ScenarioLoaded { .. }
            | Transition::BlockOccupied { .. }
            | Transition::RestrictionDetected { .. }
            | Transition::LapRestart { .. } => Severity::Info,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::ScenarioLoaded { description } => {
                write!(f, "scenario loaded: {}", description)
            }
            Transition::BlockOccupied { block } => write!(f, "{} occupied", block),
            Transition::RestrictionDetected { train, speed_limit } => {
                write!(f, "{} - restriction detected: {} km/h", train, speed_limit)
            }
            Transition::RedSignalStop { train } => {
                write!(f, "{} - ATP stop (red signal)", train)
            }
            Transition::CautionSpeedReduction { train } => {
                write!(f, "{} - ATP speed reduction (yellow signal)", train)
            }
            Transition::AuthorityStop { train } => {
                write!(f, "{} - movement-authority stop", train)
            }
            Transition::AuthorityBraking { train } => {
                write!(f, "{} - braking on movement-authority approach", train)
            }
            Transition::LapRestart { train } => write!(f, "{} - lap restart", train),
        }
    }
}

/// A single entry of the event log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Simulated milliseconds since the scenario was loaded
    pub timestamp_ms: u64,
    pub message: String,
    pub severity: Severity,
    pub transition: Transition,
}

impl LogEvent {
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.timestamp_ms / 60_000;
        let seconds = (self.timestamp_ms % 60_000) as f64 / 1000.0;
        let tag = match self.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
        };
        write!(f, "[{:02}:{:04.1}] {} {}", minutes, seconds, tag, self.message)
    }
}

/// Turn the ordered transitions of one tick into log events
pub fn emit(transitions: Vec<Transition>, timestamp_ms: u64) -> Vec<LogEvent> {
    transitions
        .into_iter()
        .map(|transition| LogEvent {
            timestamp_ms,
            message: transition.to_string(),
            severity: transition.severity(),
            transition,
        })
        .collect()
}

/// The most recent events, oldest dropped first
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: LogEvent) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn extend<I: IntoIterator<Item = LogEvent>>(&mut self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEvent> {
        self.entries.iter()
    }

    /// Newest first, the order the log display shows
    pub fn newest_first(&self) -> impl Iterator<Item = &LogEvent> {
        self.entries.iter().rev()
    }
}
