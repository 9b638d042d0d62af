//! Scenario descriptors and the preset test scenarios

use anyhow::{bail, Context, Result};

use super::track::{SimTrack, TrackLayout};
use super::train::SimTrain;
use super::types::TrainId;

/// Initial state of one train in a scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainSpec {
    pub position: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub movement_authority: f64,
}

impl TrainSpec {
    pub fn new(position: f64, speed: f64, max_speed: f64, movement_authority: f64) -> Self {
        Self {
            position,
            speed,
            max_speed,
            movement_authority,
        }
    }
}

/// Everything needed to (re)start a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDescriptor {
    /// Message logged when the scenario is loaded
    pub description: String,
    /// Trains in order; train ids are assigned from 1
    pub trains: Vec<TrainSpec>,
    pub layout: TrackLayout,
}

impl ScenarioDescriptor {
    pub fn new(description: &str, trains: Vec<TrainSpec>, layout: TrackLayout) -> Self {
        Self {
            description: description.to_string(),
            trains,
            layout,
        }
    }

    /// Validate the descriptor and build the track and trains it describes
    pub fn build(&self) -> Result<(SimTrack, Vec<SimTrain>)> {
        let track = SimTrack::new(&self.layout).context("Invalid track layout")?;

        let trains = self
            .trains
            .iter()
            .enumerate()
            .map(|(index, spec)| -> Result<SimTrain> {
                let id = TrainId(index as u32 + 1);
                validate_train(spec, &track).with_context(|| format!("Invalid {}", id))?;
                Ok(SimTrain::new(
                    id,
                    spec.position,
                    spec.speed,
                    spec.max_speed,
                    spec.movement_authority,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((track, trains))
    }
}

fn validate_train(spec: &TrainSpec, track: &SimTrack) -> Result<()> {
    if !spec.position.is_finite() || spec.position < 0.0 || spec.position > track.length() {
        bail!(
            "position {} lies outside the track [0, {}]",
            spec.position,
            track.length()
        );
    }
    if !spec.max_speed.is_finite() || spec.max_speed <= 0.0 {
        bail!("max speed must be positive, got {}", spec.max_speed);
    }
    if !spec.speed.is_finite() || spec.speed < 0.0 {
        bail!("speed must not be negative, got {}", spec.speed);
    }
    if !spec.movement_authority.is_finite() || spec.movement_authority < 0.0 {
        bail!(
            "movement authority must not be negative, got {}",
            spec.movement_authority
        );
    }
    Ok(())
}

/// The built-in test scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// Both trains at a stand, the normal starting configuration
    #[default]
    Default,
    /// Two trains close together, ATP has to intervene
    Collision,
    /// A fast train catches up with a slow one
    CatchUp,
    /// A train passes over the 60 km/h balise at 750 m
    Balise,
    /// A train with a short movement authority
    AuthorityLimit,
}

impl Preset {
    pub fn all() -> [Preset; 5] {
        [
            Preset::Default,
            Preset::Collision,
            Preset::CatchUp,
            Preset::Balise,
            Preset::AuthorityLimit,
        ]
    }

    /// The scenario descriptor for this preset on the standard layout
    pub fn descriptor(&self) -> ScenarioDescriptor {
        let (description, trains) = match self {
            Preset::Default => (
                "initial configuration",
                vec![
                    TrainSpec::new(50.0, 0.0, 120.0, 500.0),
                    TrainSpec::new(600.0, 0.0, 100.0, 1000.0),
                ],
            ),
            Preset::Collision => (
                "collision test - ATP must intervene",
                vec![
                    TrainSpec::new(100.0, 80.0, 120.0, 800.0),
                    TrainSpec::new(500.0, 60.0, 100.0, 600.0),
                ],
            ),
            Preset::CatchUp => (
                "catch-up - train 1 must slow down",
                vec![
                    TrainSpec::new(50.0, 100.0, 120.0, 1000.0),
                    TrainSpec::new(400.0, 40.0, 60.0, 800.0),
                ],
            ),
            Preset::Balise => (
                "60 km/h balise at 750 m",
                vec![
                    TrainSpec::new(700.0, 100.0, 120.0, 500.0),
                    TrainSpec::new(50.0, 0.0, 100.0, 1000.0),
                ],
            ),
            Preset::AuthorityLimit => (
                "limited movement authority - train 1 must brake towards 600 m",
                vec![
                    TrainSpec::new(400.0, 80.0, 120.0, 200.0),
                    TrainSpec::new(50.0, 0.0, 100.0, 1000.0),
                ],
            ),
        };

        ScenarioDescriptor::new(description, trains, TrackLayout::standard())
    }
}
