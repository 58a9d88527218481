//! Immutable configuration threaded through the simulation and each game
//!
//! Nothing here is global: a [`SimulationConfig`] is built once (usually from
//! CLI arguments), validated, and then shared read-only by every round.

use crate::core::{Card, Color};
use crate::game::VerbosityLevel;
use crate::{Result, UnoError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the engine treats an in-range play that fails the legality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayPolicy {
    /// Illegal plays are rejected and treated as "no play" (forced draw)
    #[default]
    Strict,
    /// Illegal plays are applied as-is; only out-of-range indices are rejected
    Trusting,
}

/// Number of copies of each card kind in a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckComposition {
    /// Copies of each 1-9 card per color
    pub dup_regular: usize,
    /// Copies of each 0 card per color
    pub dup_zero: usize,
    /// Copies of each Skip, Reverse and DrawTwo per color
    pub dup_special: usize,
    pub wilds: usize,
    pub wild_draw_fours: usize,
}

impl Default for DeckComposition {
    fn default() -> Self {
        DeckComposition {
            dup_regular: 2,
            dup_zero: 1,
            dup_special: 2,
            wilds: 4,
            wild_draw_fours: 4,
        }
    }
}

impl DeckComposition {
    /// Total number of cards this composition produces
    pub fn total(&self) -> usize {
        self.non_wild() + self.wilds + self.wild_draw_fours
    }

    /// Number of colored (non-wild) cards
    pub fn non_wild(&self) -> usize {
        Color::ALL.len() * (9 * self.dup_regular + self.dup_zero + 3 * self.dup_special)
    }

    /// Build the unshuffled card list
    pub fn build(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.total());
        for number in 1..=9 {
            for _ in 0..self.dup_regular {
                for color in Color::ALL {
                    cards.extend(Card::number(color, number));
                }
            }
        }
        for _ in 0..self.dup_zero {
            for color in Color::ALL {
                cards.extend(Card::number(color, 0));
            }
        }
        for _ in 0..self.dup_special {
            for color in Color::ALL {
                cards.push(Card::skip(color));
                cards.push(Card::reverse(color));
                cards.push(Card::draw_two(color));
            }
        }
        cards.extend(std::iter::repeat(Card::wild()).take(self.wilds));
        cards.extend(std::iter::repeat(Card::wild_draw_four()).take(self.wild_draw_fours));
        cards
    }
}

/// Per-round settings shared by every game in a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub initial_hand_size: usize,
    pub deck: DeckComposition,
    pub play_policy: PlayPolicy,
    /// Wall-clock budget per strategy call; `None` calls strategies inline
    pub strategy_budget: Option<Duration>,
    /// Safety valve for strategies that never shed cards
    pub max_turns: u32,
    pub verbosity: VerbosityLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_hand_size: 7,
            deck: DeckComposition::default(),
            play_policy: PlayPolicy::default(),
            strategy_budget: None,
            max_turns: 10_000,
            verbosity: VerbosityLevel::Silent,
        }
    }
}

impl GameConfig {
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.initial_hand_size = hand_size;
        self
    }

    pub fn with_policy(mut self, policy: PlayPolicy) -> Self {
        self.play_policy = policy;
        self
    }

    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.strategy_budget = budget;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Check that a round with `players` seats can be dealt and played
    pub fn validate(&self, players: usize) -> Result<()> {
        if players < 2 {
            return Err(UnoError::TooFewPlayers(players));
        }
        if self.deck.non_wild() == 0 {
            return Err(UnoError::InvalidConfig(
                "deck needs at least one non-wild card to reveal an up-card".to_string(),
            ));
        }
        // The reveal may skip every wild before it finds a colored card
        let deck_size = self.deck.total();
        let reserve = self.deck.wilds + self.deck.wild_draw_fours + 1;
        if players * self.initial_hand_size + reserve > deck_size {
            return Err(UnoError::DeckTooSmall {
                players,
                hand_size: self.initial_hand_size,
                deck_size,
            });
        }
        if self.max_turns == 0 {
            return Err(UnoError::InvalidConfig("max_turns must be positive".to_string()));
        }
        if self.strategy_budget == Some(Duration::ZERO) {
            return Err(UnoError::InvalidConfig(
                "strategy budget must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level settings for a batch of rounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub rounds: usize,
    /// Master seed; `None` draws every round from fresh entropy
    pub seed: Option<u64>,
    /// Worker threads for the round pool; `None` uses rayon's default
    pub threads: Option<usize>,
    pub game: GameConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            rounds: 10_000,
            seed: None,
            threads: None,
            game: GameConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self, players: usize) -> Result<()> {
        if self.threads == Some(0) {
            return Err(UnoError::InvalidConfig("threads must be positive".to_string()));
        }
        self.game.validate(players)
    }
}
