//! Simulation root and per-tick orchestration

pub mod tick;
pub mod world;

pub use tick::{TickInput, TickReport, TickServices};
pub use world::StealthWorld;
