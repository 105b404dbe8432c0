//! Black hole gravity toy.
//!
//! A single attractor at the centre of the playfield pulls in asteroids that
//! spawn at the edges.  Asteroids erode as they approach, split or shatter on
//! impact, and their debris is captured into an orbiting accretion ring that
//! makes the attractor heavier.
//!
//! The engine ([`simulation::Simulation`]) is plain Rust over `Vec2` and runs
//! headless; [`simulation::SimulationPlugin`] drives it from a Bevy app and
//! [`rendering`] draws it.

pub mod asteroid;
pub mod attractor;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod gravity;
pub mod particles;
pub mod rendering;
pub mod simulation;
pub mod store;
