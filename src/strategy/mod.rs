//! Pluggable player strategies
//!
//! The engine consults a [`Strategy`] whenever its seat must act. A strategy
//! sees its own hand, the up-card, the active called color and a restricted
//! [`GameState`]; nothing else about the round is reachable from here.
//!
//! Strategies are looked up by identifier in a [`StrategyRegistry`], which
//! maps each identifier to a factory producing a fresh instance per round.

pub mod heuristic;
pub mod random;
pub mod zero;

pub use heuristic::HeuristicStrategy;
pub use random::RandomStrategy;
pub use zero::ZeroStrategy;

use crate::core::{Card, Color};
use crate::game::GameState;
use crate::{Result, UnoError};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Player decision interface
///
/// Implementations must be `Send` so the engine can run a call on another
/// thread when enforcing a time budget. Any memory a strategy keeps is its
/// own business; the engine neither persists nor resets it.
pub trait Strategy: Send {
    /// Choose a card to play
    ///
    /// Return `Some(index)` into `hand`, or `None` when no card can be
    /// played; the engine then forces a draw and asks once more.
    fn play(
        &mut self,
        hand: &[Card],
        up_card: Card,
        called_color: Option<Color>,
        state: &GameState,
    ) -> Option<usize>;

    /// Name a color after playing a wild
    fn call_color(&mut self, hand: &[Card]) -> Color;
}

/// Indices of the cards in `hand` that may legally be played
pub fn legal_plays(hand: &[Card], up_card: Card, called_color: Option<Color>) -> Vec<usize> {
    hand.iter()
        .enumerate()
        .filter(|(_, card)| card.can_play_on(&up_card, called_color))
        .map(|(i, _)| i)
        .collect()
}

/// The color held most often in `hand`; ties go to the earlier color in
/// [`Color::ALL`], and an all-wild hand yields red
pub fn most_held_color(hand: &[Card]) -> Color {
    let mut counts = [0usize; 4];
    for color in hand.iter().filter_map(Card::color) {
        counts[color as usize] += 1;
    }
    let mut best = Color::Red;
    for color in Color::ALL {
        if counts[color as usize] > counts[best as usize] {
            best = color;
        }
    }
    best
}

/// Builds a fresh strategy for one round; the argument is a seed for any
/// randomness the strategy uses
pub type StrategyFactory = Arc<dyn Fn(u64) -> Box<dyn Strategy> + Send + Sync>;

/// Maps strategy identifiers to factories
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    factories: FxHashMap<String, StrategyFactory>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `zero`, `random` and `heuristic`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("zero", |_| Box::new(ZeroStrategy::new()));
        registry.register("random", |seed| Box::new(RandomStrategy::with_seed(seed)));
        registry.register("heuristic", |_| Box::new(HeuristicStrategy::new()));
        registry
    }

    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(u64) -> Box<dyn Strategy> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn factory(&self, id: &str) -> Result<StrategyFactory> {
        self.factories
            .get(id)
            .cloned()
            .ok_or_else(|| UnoError::UnknownStrategy(id.to_string()))
    }

    pub fn create(&self, id: &str, seed: u64) -> Result<Box<dyn Strategy>> {
        Ok((self.factory(id)?)(seed))
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
