//! Random strategy: plays a uniformly chosen legal card

use crate::core::{Card, Color};
use crate::game::GameState;
use crate::strategy::{legal_plays, Strategy};
use rand::seq::SliceRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Picks uniformly among legal cards and calls a uniformly random color
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Create a random strategy seeded from OS entropy
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a random strategy with a seeded RNG (for deterministic testing)
    pub fn with_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    fn play(
        &mut self,
        hand: &[Card],
        up_card: Card,
        called_color: Option<Color>,
        _state: &GameState,
    ) -> Option<usize> {
        legal_plays(hand, up_card, called_color)
            .choose(&mut self.rng)
            .copied()
    }

    fn call_color(&mut self, _hand: &[Card]) -> Color {
        *Color::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Color::Red)
    }
}
