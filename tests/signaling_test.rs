//! Block occupancy and aspect derivation

use rail_sim::simulation::{
    aspect_for, recompute_blocks, Aspect, BlockId, BlockSection, SimTrack, SimTrain, TrackLayout,
    Transition, TrainId,
};

fn standard_track() -> SimTrack {
    SimTrack::new(&TrackLayout::standard()).expect("standard layout is valid")
}

fn free_blocks(track: &SimTrack) -> Vec<BlockSection> {
    track.blocks().iter().map(BlockSection::from_extent).collect()
}

fn train_at(id: u32, position: f64) -> SimTrain {
    SimTrain::new(TrainId(id), position, 0.0, 100.0, 1000.0)
}

fn aspects(blocks: &[BlockSection]) -> Vec<Aspect> {
    blocks.iter().map(|b| b.aspect).collect()
}

#[test]
fn test_aspect_rule() {
    assert_eq!(aspect_for(true, true), Aspect::Danger);
    assert_eq!(aspect_for(true, false), Aspect::Danger);
    assert_eq!(aspect_for(false, true), Aspect::Caution);
    assert_eq!(aspect_for(false, false), Aspect::Clear);
}

#[test]
fn test_occupied_block_shows_danger() {
    let track = standard_track();
    let previous = free_blocks(&track);

    let (blocks, transitions) = recompute_blocks(&track, &previous, &[train_at(1, 450.0)]);

    assert_eq!(
        aspects(&blocks),
        vec![Aspect::Clear, Aspect::Danger, Aspect::Clear, Aspect::Clear]
    );
    assert!(blocks[1].occupied);
    assert_eq!(
        transitions,
        vec![Transition::BlockOccupied { block: BlockId(2) }]
    );
}

#[test]
fn test_block_start_is_inside_end_is_outside() {
    let track = standard_track();
    let previous = free_blocks(&track);

    let (blocks, _) = recompute_blocks(&track, &previous, &[train_at(1, 600.0)]);

    assert!(!blocks[1].occupied);
    assert!(blocks[2].occupied);
}

#[test]
fn test_occupancy_matches_track_lookup() {
    let track = standard_track();
    let previous = free_blocks(&track);

    for position in [0.0, 299.9, 300.0, 750.0, 899.99, 900.0, 1199.5, 1200.0] {
        let (blocks, _) = recompute_blocks(&track, &previous, &[train_at(1, position)]);
        let occupied: Vec<usize> = (0..blocks.len()).filter(|i| blocks[*i].occupied).collect();
        let expected: Vec<usize> = track.block_at(position).into_iter().collect();
        assert_eq!(occupied, expected, "position {}", position);
    }

    // The track end belongs to no block
    let (blocks, transitions) = recompute_blocks(&track, &previous, &[train_at(1, 1200.0)]);
    assert!(blocks.iter().all(|b| !b.occupied));
    assert!(transitions.is_empty());
}

#[test]
fn test_caution_reads_previous_snapshot() {
    let track = standard_track();
    let (previous, _) = recompute_blocks(&track, &free_blocks(&track), &[train_at(1, 450.0)]);

    // The train has moved into block 3 but block 1 still sees block 2 as
    // occupied from the pre-tick snapshot
    let (blocks, transitions) = recompute_blocks(&track, &previous, &[train_at(1, 650.0)]);

    assert_eq!(
        aspects(&blocks),
        vec![Aspect::Caution, Aspect::Clear, Aspect::Danger, Aspect::Clear]
    );
    assert_eq!(
        transitions,
        vec![Transition::BlockOccupied { block: BlockId(3) }]
    );

    // One tick later the lag has caught up
    let (blocks, _) = recompute_blocks(&track, &blocks, &[train_at(1, 655.0)]);
    assert_eq!(
        aspects(&blocks),
        vec![Aspect::Clear, Aspect::Caution, Aspect::Danger, Aspect::Clear]
    );
}

#[test]
fn test_last_block_never_shows_caution() {
    let track = standard_track();
    let (previous, _) = recompute_blocks(&track, &free_blocks(&track), &[train_at(1, 100.0)]);
    assert!(previous[0].occupied);

    let (blocks, _) = recompute_blocks(&track, &previous, &[train_at(1, 102.0)]);

    // Block 4 ends where block 1 starts on the loop, but nothing starts at 1200
    assert_eq!(blocks[3].aspect, Aspect::Clear);
    assert!(!blocks[3].occupied);
}

#[test]
fn test_occupied_event_only_on_rising_edge() {
    let track = standard_track();
    let trains = [train_at(1, 100.0), train_at(2, 120.0)];

    let (blocks, first) = recompute_blocks(&track, &free_blocks(&track), &trains);
    assert_eq!(first.len(), 1, "two trains in one block is still one event");

    let (_, second) = recompute_blocks(&track, &blocks, &trains);
    assert!(second.is_empty());
}

#[test]
fn test_danger_iff_occupied() {
    let track = standard_track();
    let trains = [train_at(1, 10.0), train_at(2, 899.0), train_at(3, 1199.9)];

    let mut blocks = free_blocks(&track);
    for _ in 0..3 {
        let (next, _) = recompute_blocks(&track, &blocks, &trains);
        for block in &next {
            assert_eq!(block.aspect == Aspect::Danger, block.occupied);
        }
        blocks = next;
    }
}
