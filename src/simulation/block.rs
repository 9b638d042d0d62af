//! Fixed-block signaling
//!
//! Occupancy comes from the train positions produced this tick. The
//! "following block occupied" lookup reads the pre-tick block snapshot, so a
//! caution aspect trails the downstream occupancy by one tick.

use super::events::Transition;
use super::track::{BlockExtent, SimTrack};
use super::train::SimTrain;
use super::types::{Aspect, BlockId};

/// Runtime state of a block section
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSection {
    pub id: BlockId,
    pub start: f64,
    pub end: f64,
    pub occupied: bool,
    pub aspect: Aspect,
}

impl BlockSection {
    /// A free block showing clear, as created when a scenario is loaded
    pub fn from_extent(extent: &BlockExtent) -> Self {
        Self {
            id: extent.id,
            start: extent.start,
            end: extent.end,
            occupied: false,
            aspect: Aspect::Clear,
        }
    }
}

/// Aspect rule: red when occupied, yellow when the following block is occupied
pub fn aspect_for(occupied: bool, following_occupied: bool) -> Aspect {
    if occupied {
        Aspect::Danger
    } else if following_occupied {
        Aspect::Caution
    } else {
        Aspect::Clear
    }
}

/// Recompute occupancy and aspect for every block.
///
/// `previous` is the block snapshot from before this tick and must be laid
/// out like `track.blocks()`. Returns the new blocks and a `BlockOccupied`
/// transition for each block that became occupied.
pub fn recompute_blocks(
    track: &SimTrack,
    previous: &[BlockSection],
    trains: &[SimTrain],
) -> (Vec<BlockSection>, Vec<Transition>) {
    let mut transitions = Vec::new();

    let mut occupancy = vec![false; previous.len()];
    for index in trains.iter().filter_map(|train| track.block_at(train.position)) {
        if let Some(slot) = occupancy.get_mut(index) {
            *slot = true;
        }
    }

    let blocks = previous
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let occupied = occupancy[index];

            if occupied && !block.occupied {
                transitions.push(Transition::BlockOccupied { block: block.id });
            }

            let following_occupied = track
                .following_block(index)
                .and_then(|following| previous.get(following))
                .is_some_and(|following| following.occupied);

            BlockSection {
                occupied,
                aspect: aspect_for(occupied, following_occupied),
                ..block.clone()
            }
        })
        .collect();

    (blocks, transitions)
}
