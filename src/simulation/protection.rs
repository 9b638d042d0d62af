//! Automatic train protection
//!
//! Works out the speed a train is allowed to run at this tick from the
//! signal ahead and its movement authority, and flags the interventions the
//! log should report.

use super::block::BlockSection;
use super::events::Transition;
use super::track::SimTrack;
use super::train::SimTrain;
use super::types::{
    Aspect, ACCELERATION_STEP, AUTHORITY_BRAKE_STEP, AUTHORITY_BRAKING_MIN_DECREASE,
    AUTHORITY_BRAKING_MIN_SPEED, AUTHORITY_LOOKAHEAD, AUTHORITY_STOP_MIN_SPEED, BLOCK_LOOKAHEAD,
    CAUTION_SPEED_LIMIT, DANGER_BRAKE_STEP,
};

/// Which protection rule limited the train this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intervention {
    /// Braking towards a red signal
    RedSignal,
    /// Held at the caution limit by a yellow signal
    CautionSignal,
    /// Braking for the movement authority limit
    MovementAuthority,
}

/// Result of running protection for one train
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectionOutcome {
    /// The speed the train runs at this tick
    pub speed: f64,
    /// The highest speed protection allows this tick; never below `speed`
    pub ceiling: f64,
    /// The last rule that intervened, if any
    pub intervention: Option<Intervention>,
    pub transitions: Vec<Transition>,
}

/// Aspect of the next block starting within the look-ahead window.
///
/// Nothing ahead counts as clear.
pub fn aspect_ahead(train: &SimTrain, track: &SimTrack, blocks: &[BlockSection]) -> Aspect {
    track
        .next_block_within(train.position, BLOCK_LOOKAHEAD)
        .and_then(|index| blocks.get(index))
        .map(|block| block.aspect)
        .unwrap_or(Aspect::Clear)
}

/// Whether the movement authority check fires for this train.
///
/// This compares the fixed look-ahead with the authority value only, so the
/// train's position plays no part and the check fires on every tick once the
/// authority is at or below the look-ahead.
pub fn authority_exceeded(train: &SimTrain) -> bool {
    AUTHORITY_LOOKAHEAD >= train.movement_authority
}

/// Compute the enforced speed for one train against the pre-tick blocks
pub fn enforce(train: &SimTrain, track: &SimTrack, blocks: &[BlockSection]) -> ProtectionOutcome {
    let mut transitions = Vec::new();
    let previous = train.speed;

    // Detection only; the balise limit does not feed the ceiling
    if let Some(restriction) = track.restriction_at(train.position) {
        transitions.push(Transition::RestrictionDetected {
            train: train.id,
            speed_limit: restriction.speed_limit,
        });
    }

    let (mut speed, mut ceiling, mut intervention) = match aspect_ahead(train, track, blocks) {
        Aspect::Danger => {
            let speed = (previous - DANGER_BRAKE_STEP).max(0.0);
            if speed == 0.0 && previous > 0.0 {
                transitions.push(Transition::RedSignalStop { train: train.id });
            }
            (speed, speed, Some(Intervention::RedSignal))
        }
        Aspect::Caution => {
            if previous > CAUTION_SPEED_LIMIT {
                transitions.push(Transition::CautionSpeedReduction { train: train.id });
            }
            (
                previous.min(CAUTION_SPEED_LIMIT),
                CAUTION_SPEED_LIMIT.min(train.max_speed),
                Some(Intervention::CautionSignal),
            )
        }
        Aspect::Clear => {
            let speed = if previous < train.max_speed {
                (previous + ACCELERATION_STEP).min(train.max_speed)
            } else {
                previous
            };
            (speed, train.max_speed, None)
        }
    };

    if authority_exceeded(train) {
        let braked = (speed - AUTHORITY_BRAKE_STEP).max(0.0);
        if braked == 0.0 && previous > AUTHORITY_STOP_MIN_SPEED {
            transitions.push(Transition::AuthorityStop { train: train.id });
        } else if previous > AUTHORITY_BRAKING_MIN_SPEED
            && braked < previous - AUTHORITY_BRAKING_MIN_DECREASE
        {
            transitions.push(Transition::AuthorityBraking { train: train.id });
        }
        speed = braked;
        ceiling = ceiling.min(braked);
        intervention = Some(Intervention::MovementAuthority);
    }

    let ceiling = ceiling.max(0.0).min(train.max_speed);
    ProtectionOutcome {
        speed: speed.max(0.0).min(ceiling),
        ceiling,
        intervention,
        transitions,
    }
}
