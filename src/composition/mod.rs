//! # Composition Engine
//!
//! Coordinates speech synthesis, phase timing, still rendering and encoding to turn a
//! vocabulary card into an "ask, then reveal" reel.

pub mod engine;
pub mod timeline;

// Re-exports for convenience
pub use engine::{Assets, DeckReport, ReelEngine, ReelReport, StillPair};
pub use timeline::{PhasePlan, TickPlacement};
