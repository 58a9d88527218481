//! Zero strategy: always plays the first legal card
//!
//! Deterministic and cheap, which makes it the baseline for engine tests and
//! benchmarks.

use crate::core::{Card, Color};
use crate::game::GameState;
use crate::strategy::{most_held_color, Strategy};

/// Plays the first legal card in hand order, otherwise asks to draw
#[derive(Debug, Default, Clone)]
pub struct ZeroStrategy;

impl ZeroStrategy {
    pub fn new() -> Self {
        ZeroStrategy
    }
}

impl Strategy for ZeroStrategy {
    fn play(
        &mut self,
        hand: &[Card],
        up_card: Card,
        called_color: Option<Color>,
        _state: &GameState,
    ) -> Option<usize> {
        hand.iter()
            .position(|card| card.can_play_on(&up_card, called_color))
    }

    fn call_color(&mut self, hand: &[Card]) -> Color {
        most_held_color(hand)
    }
}
