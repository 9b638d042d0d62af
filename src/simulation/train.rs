//! Train movement logic for the rail simulation

use super::track::SimTrack;
use super::types::{TrainId, SECONDS_PER_HOUR, TICK_DISTANCE_SCALE};

/// Result of a train update indicating what happened to the train
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainUpdateResult {
    Continue,    // Train moved along the loop
    LapRestart,  // Train passed the end of the loop and restarted
}

/// A train running on the loop
#[derive(Debug, Clone, PartialEq)]
pub struct SimTrain {
    pub id: TrainId,
    /// Distance along the loop in metres
    pub position: f64,
    /// Current speed in km/h, always within `[0, max_speed]`
    pub speed: f64,
    pub max_speed: f64,
    /// Metres ahead of the train up to which travel is authorized
    pub movement_authority: f64,
}

impl SimTrain {
    pub fn new(
        id: TrainId,
        position: f64,
        speed: f64,
        max_speed: f64,
        movement_authority: f64,
    ) -> Self {
        Self {
            id,
            position,
            speed: speed.max(0.0).min(max_speed),
            max_speed,
            movement_authority,
        }
    }

    /// Apply the enforced speed and move the train by one tick
    pub fn advance(&mut self, speed: f64, track: &SimTrack) -> TrainUpdateResult {
        self.speed = speed.max(0.0).min(self.max_speed);

        let position = self.position + self.speed / SECONDS_PER_HOUR * TICK_DISTANCE_SCALE;
        if position > track.length() {
            self.position = track.loop_start();
            TrainUpdateResult::LapRestart
        } else {
            self.position = position;
            TrainUpdateResult::Continue
        }
    }
}
