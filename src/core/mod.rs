//! Core card types

pub mod card;
pub mod effects;

pub use card::{Card, Color, Rank};
pub use effects::Transition;
