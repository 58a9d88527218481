//! The restricted view of a round handed to strategies

use crate::core::{Card, Color};
use crate::game::Game;
use serde::{Deserialize, Serialize};

/// Frozen snapshot of what a strategy is allowed to know
///
/// Built fresh for every consultation. Entry 0 of each per-player list is the
/// seat that would act next absent effect cards; the acting player is not
/// included, so each list has `players - 1` entries. Draw-pile contents and
/// opponents' cards are never part of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    upcoming_hand_sizes: Vec<usize>,
    upcoming_called_colors: Vec<Option<Color>>,
    played_cards: Vec<Card>,
}

impl GameState {
    /// Snapshot `game` from the current player's point of view
    pub fn capture(game: &Game) -> Self {
        let upcoming: Vec<usize> = (1..game.num_players())
            .map(|steps| game.position_after(steps))
            .collect();

        GameState {
            upcoming_hand_sizes: upcoming.iter().map(|&p| game.hand(p).len()).collect(),
            upcoming_called_colors: upcoming
                .iter()
                .map(|&p| game.most_recent_called(p))
                .collect(),
            played_cards: game.deck().discarded().to_vec(),
        }
    }

    /// Build a view directly, for exercising strategies outside a round
    pub fn new(
        upcoming_hand_sizes: Vec<usize>,
        upcoming_called_colors: Vec<Option<Color>>,
        played_cards: Vec<Card>,
    ) -> Self {
        GameState {
            upcoming_hand_sizes,
            upcoming_called_colors,
            played_cards,
        }
    }

    /// Hand sizes of the other players, next-to-act first
    pub fn upcoming_hand_sizes(&self) -> &[usize] {
        &self.upcoming_hand_sizes
    }

    /// Most recent color each other player called, next-to-act first
    pub fn upcoming_called_colors(&self) -> &[Option<Color>] {
        &self.upcoming_called_colors
    }

    /// Cards discarded since the last remix, oldest first
    pub fn played_cards(&self) -> &[Card] {
        &self.played_cards
    }

    /// Hand size of the seat that acts next
    pub fn next_hand_size(&self) -> Option<usize> {
        self.upcoming_hand_sizes.first().copied()
    }
}
