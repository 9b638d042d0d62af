//! Track model lookups and layout validation

use rail_sim::simulation::{BlockExtent, SimTrack, SpeedRestriction, TrackLayout, BLOCK_LOOKAHEAD};

fn standard_track() -> SimTrack {
    SimTrack::new(&TrackLayout::standard()).expect("standard layout is valid")
}

#[test]
fn test_block_at_uses_half_open_extents() {
    let track = standard_track();

    assert_eq!(track.block_at(0.0), Some(0));
    assert_eq!(track.block_at(299.99), Some(0));
    assert_eq!(track.block_at(300.0), Some(1));
    assert_eq!(track.block_at(1199.5), Some(3));

    // Past the end of the track there is no block
    assert_eq!(track.block_at(1200.0), None);
    assert_eq!(track.block_at(-1.0), None);
}

#[test]
fn test_next_block_window_excludes_current_position() {
    let track = standard_track();

    // Window is (position, position + lookahead]
    assert_eq!(track.next_block_within(200.0, BLOCK_LOOKAHEAD), Some(1));
    assert_eq!(track.next_block_within(250.0, BLOCK_LOOKAHEAD), Some(1));
    assert_eq!(track.next_block_within(199.5, BLOCK_LOOKAHEAD), None);
    assert_eq!(track.next_block_within(300.0, BLOCK_LOOKAHEAD), None);
    assert_eq!(track.next_block_within(1150.0, BLOCK_LOOKAHEAD), None);
}

#[test]
fn test_following_block() {
    let track = standard_track();

    assert_eq!(track.following_block(0), Some(1));
    assert_eq!(track.following_block(2), Some(3));
    // The last block ends at the track end, nothing starts there
    assert_eq!(track.following_block(3), None);
    assert_eq!(track.following_block(10), None);
}

#[test]
fn test_restriction_lookups() {
    let track = standard_track();

    let near = track.restriction_near(753.0, 5.0).expect("balise near 753");
    assert_eq!(near.speed_limit, 60.0);
    assert!(track.restriction_near(755.0, 5.0).is_none());

    let on = track.restriction_at(750.5).expect("on top of the 750 m balise");
    assert_eq!(on.speed_limit, 60.0);
    assert_eq!(on.category, "Eurobalise");
    assert!(track.restriction_at(749.2).is_some());
    assert!(track.restriction_at(751.0).is_none());
    assert!(track.restriction_at(500.0).is_none());
}

#[test]
fn test_next_station() {
    let track = standard_track();

    assert_eq!(track.next_station(90.0).map(|s| s.name.as_str()), Some("Station A"));
    assert_eq!(track.next_station(450.0).map(|s| s.name.as_str()), Some("Station B"));
    assert!(track.next_station(1150.0).is_none());
}

#[test]
fn test_overlapping_blocks_rejected() {
    let mut layout = TrackLayout::standard();
    layout.blocks[1] = BlockExtent::new(2, 250.0, 600.0);

    let err = SimTrack::new(&layout).unwrap_err();
    assert!(err.to_string().contains("overlaps"), "unexpected error: {}", err);
}

#[test]
fn test_gap_between_blocks_rejected() {
    let mut layout = TrackLayout::standard();
    layout.blocks[2] = BlockExtent::new(3, 650.0, 900.0);

    let err = SimTrack::new(&layout).unwrap_err();
    assert!(err.to_string().contains("Gap"), "unexpected error: {}", err);
}

#[test]
fn test_blocks_must_cover_track() {
    let mut layout = TrackLayout::standard();
    layout.blocks.pop();
    assert!(SimTrack::new(&layout).is_err());

    let mut layout = TrackLayout::standard();
    layout.blocks.clear();
    assert!(SimTrack::new(&layout).is_err());
}

#[test]
fn test_invalid_layout_values_rejected() {
    let mut layout = TrackLayout::standard();
    layout.blocks[0] = BlockExtent::new(1, 0.0, 0.0);
    assert!(SimTrack::new(&layout).is_err());

    let mut layout = TrackLayout::standard();
    layout.blocks[3] = BlockExtent::new(1, 900.0, 1200.0);
    assert!(SimTrack::new(&layout).is_err(), "duplicate block id accepted");

    let mut layout = TrackLayout::standard();
    layout.loop_start = 1200.0;
    assert!(SimTrack::new(&layout).is_err());

    let mut layout = TrackLayout::standard();
    layout
        .restrictions
        .push(SpeedRestriction::new(750.0, 40.0, "Eurobalise"));
    assert!(SimTrack::new(&layout).is_err(), "duplicate balise accepted");

    let mut layout = TrackLayout::standard();
    layout
        .restrictions
        .push(SpeedRestriction::new(1500.0, 40.0, "Eurobalise"));
    assert!(SimTrack::new(&layout).is_err());
}
