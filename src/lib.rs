//! Rail Traffic Simulation Library
//!
//! A fixed-block signaling and train protection simulation on a looped track
//! that can be stepped from tests or run headless from the console.

pub mod simulation;
