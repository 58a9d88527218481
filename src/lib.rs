//! UNO round simulator
//!
//! Plays many independent rounds of UNO between pluggable strategies and
//! aggregates win and point shares. The engine owns all card state; strategies
//! only ever see their own hand plus a restricted [`game::GameState`] snapshot.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod report;
pub mod simulation;
pub mod strategy;
pub mod zones;

pub use config::{DeckComposition, GameConfig, PlayPolicy, SimulationConfig};
pub use error::{Result, UnoError};
