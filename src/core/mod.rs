//! Core deterministic primitives.

pub mod rng;

pub use rng::{DeterministicRng, derive_game_seed};
