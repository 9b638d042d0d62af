//! Static track model: block extents, balises and stations
//!
//! Pure lookups over an immutable layout. Absence of a block, restriction or
//! station is a normal `None`, never an error.

use anyhow::{bail, Context, Result};
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::ops::Bound;

use super::types::{
    BlockId, DEFAULT_LOOP_START, DEFAULT_TRACK_LENGTH, RESTRICTION_APPLY_RADIUS,
    RESTRICTION_TRIGGER_RADIUS,
};

/// The fixed extent of a block section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExtent {
    pub id: BlockId,
    pub start: f64,
    pub end: f64,
}

impl BlockExtent {
    pub fn new(id: u32, start: f64, end: f64) -> Self {
        Self {
            id: BlockId(id),
            start,
            end,
        }
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end
    }
}

/// A fixed speed restriction marker (balise)
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRestriction {
    pub position: f64,
    pub speed_limit: f64,
    /// Display metadata only
    pub category: String,
}

impl SpeedRestriction {
    pub fn new(position: f64, speed_limit: f64, category: &str) -> Self {
        Self {
            position,
            speed_limit,
            category: category.to_string(),
        }
    }
}

/// A named way-point along the track
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub position: f64,
}

impl Station {
    pub fn new(name: &str, position: f64) -> Self {
        Self {
            name: name.to_string(),
            position,
        }
    }
}

/// Unvalidated description of a track, as carried by a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLayout {
    pub length: f64,
    pub loop_start: f64,
    pub blocks: Vec<BlockExtent>,
    pub restrictions: Vec<SpeedRestriction>,
    pub stations: Vec<Station>,
}

impl TrackLayout {
    /// The 1200 m loop with four 300 m blocks, four stations and four balises
    pub fn standard() -> Self {
        Self {
            length: DEFAULT_TRACK_LENGTH,
            loop_start: DEFAULT_LOOP_START,
            blocks: vec![
                BlockExtent::new(1, 0.0, 300.0),
                BlockExtent::new(2, 300.0, 600.0),
                BlockExtent::new(3, 600.0, 900.0),
                BlockExtent::new(4, 900.0, 1200.0),
            ],
            restrictions: vec![
                SpeedRestriction::new(150.0, 80.0, "Eurobalise"),
                SpeedRestriction::new(400.0, 120.0, "Eurobalise"),
                SpeedRestriction::new(750.0, 60.0, "Eurobalise"),
                SpeedRestriction::new(1050.0, 100.0, "Eurobalise"),
            ],
            stations: vec![
                Station::new("Station A", 100.0),
                Station::new("Station B", 450.0),
                Station::new("Station C", 800.0),
                Station::new("Station D", 1100.0),
            ],
        }
    }
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validated, indexed track used by the engine
#[derive(Debug, Clone)]
pub struct SimTrack {
    length: f64,
    loop_start: f64,
    blocks: Vec<BlockExtent>,
    stations: Vec<Station>,

    /// Maps block start offsets to indices into `blocks`
    block_starts: BTreeMap<OrderedFloat<f64>, usize>,

    /// Restrictions keyed by position
    restrictions: BTreeMap<OrderedFloat<f64>, SpeedRestriction>,
}

impl SimTrack {
    /// Validate a layout and build the lookup indices.
    ///
    /// Blocks must be ordered, contiguous and cover `[0, length)` exactly.
    pub fn new(layout: &TrackLayout) -> Result<Self> {
        if !layout.length.is_finite() || layout.length <= 0.0 {
            bail!("Track length must be positive, got {}", layout.length);
        }
        if !layout.loop_start.is_finite()
            || layout.loop_start < 0.0
            || layout.loop_start >= layout.length
        {
            bail!(
                "Loop start {} lies outside the track [0, {})",
                layout.loop_start,
                layout.length
            );
        }
        if layout.blocks.is_empty() {
            bail!("Track has no block sections");
        }

        let mut block_starts = BTreeMap::new();
        let mut expected_start = 0.0;
        for (index, block) in layout.blocks.iter().enumerate() {
            if !block.start.is_finite() || !block.end.is_finite() {
                bail!("{} has a non-finite extent", block.id);
            }
            if block.end <= block.start {
                bail!(
                    "{} ends at {} before it starts at {}",
                    block.id,
                    block.end,
                    block.start
                );
            }
            if block.start < expected_start {
                bail!(
                    "{} starting at {} overlaps the previous block ending at {}",
                    block.id,
                    block.start,
                    expected_start
                );
            }
            if block.start > expected_start {
                bail!(
                    "Gap between {} and {} left uncovered before {}",
                    expected_start,
                    block.start,
                    block.id
                );
            }
            if layout.blocks[..index].iter().any(|b| b.id == block.id) {
                bail!("Duplicate block id {}", block.id.0);
            }
            block_starts.insert(OrderedFloat(block.start), index);
            expected_start = block.end;
        }
        if expected_start != layout.length {
            bail!(
                "Blocks cover [0, {}) but the track is {} m long",
                expected_start,
                layout.length
            );
        }

        let mut restrictions = BTreeMap::new();
        for restriction in &layout.restrictions {
            check_on_track(restriction.position, layout.length)
                .with_context(|| format!("Invalid balise '{}'", restriction.category))?;
            if !restriction.speed_limit.is_finite() || restriction.speed_limit <= 0.0 {
                bail!(
                    "Balise at {} has a non-positive limit {}",
                    restriction.position,
                    restriction.speed_limit
                );
            }
            if restrictions
                .insert(OrderedFloat(restriction.position), restriction.clone())
                .is_some()
            {
                bail!("Two balises share position {}", restriction.position);
            }
        }

        let mut stations = layout.stations.clone();
        for station in &stations {
            check_on_track(station.position, layout.length)
                .with_context(|| format!("Invalid station '{}'", station.name))?;
        }
        stations.sort_by_key(|s| OrderedFloat(s.position));

        Ok(Self {
            length: layout.length,
            loop_start: layout.loop_start,
            blocks: layout.blocks.clone(),
            stations,
            block_starts,
            restrictions,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn loop_start(&self) -> f64 {
        self.loop_start
    }

    pub fn blocks(&self) -> &[BlockExtent] {
        &self.blocks
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn restrictions(&self) -> impl Iterator<Item = &SpeedRestriction> {
        self.restrictions.values()
    }

    /// Index of the block containing `position`, if any
    pub fn block_at(&self, position: f64) -> Option<usize> {
        self.block_starts
            .range(..=OrderedFloat(position))
            .next_back()
            .map(|(_, index)| *index)
            .filter(|index| self.blocks[*index].contains(position))
    }

    /// Index of the nearest block starting in `(position, position + lookahead]`
    pub fn next_block_within(&self, position: f64, lookahead: f64) -> Option<usize> {
        if lookahead.is_nan() || lookahead < 0.0 {
            return None;
        }
        self.block_starts
            .range((
                Bound::Excluded(OrderedFloat(position)),
                Bound::Included(OrderedFloat(position + lookahead)),
            ))
            .next()
            .map(|(_, index)| *index)
    }

    /// Index of the block whose start equals the end of block `index`
    pub fn following_block(&self, index: usize) -> Option<usize> {
        let end = self.blocks.get(index)?.end;
        self.block_starts.get(&OrderedFloat(end)).copied()
    }

    /// Nearest restriction strictly within `radius` of `position`
    pub fn restriction_near(&self, position: f64, radius: f64) -> Option<&SpeedRestriction> {
        if !position.is_finite() || radius.is_nan() || radius <= 0.0 {
            return None;
        }
        self.restrictions
            .range((
                Bound::Excluded(OrderedFloat(position - radius)),
                Bound::Excluded(OrderedFloat(position + radius)),
            ))
            .map(|(_, restriction)| restriction)
            .min_by_key(|restriction| OrderedFloat((restriction.position - position).abs()))
    }

    /// The restriction a train at `position` is currently passing over
    pub fn restriction_at(&self, position: f64) -> Option<&SpeedRestriction> {
        self.restriction_near(position, RESTRICTION_TRIGGER_RADIUS)
            .filter(|restriction| {
                (restriction.position - position).abs() < RESTRICTION_APPLY_RADIUS
            })
    }

    /// Nearest station at or ahead of `position`, without wrapping
    pub fn next_station(&self, position: f64) -> Option<&Station> {
        self.stations.iter().find(|s| s.position >= position)
    }
}

fn check_on_track(position: f64, length: f64) -> Result<()> {
    if !position.is_finite() || position < 0.0 || position > length {
        bail!("position {} lies outside the track [0, {}]", position, length);
    }
    Ok(())
}
