//! Heuristic strategy
//!
//! Plays to shed points quickly while keeping wilds in reserve:
//! - If the next player is down to one card, hit them with the strongest
//!   attack card available (Wild Draw Four, Draw Two, then Skip).
//! - Otherwise play the most expensive legal colored card, preferring the
//!   color we hold most of so later turns keep matching.
//! - Wilds are a last resort, plain Wild before Wild Draw Four.

use crate::core::{Card, Color, Rank};
use crate::game::GameState;
use crate::strategy::{legal_plays, most_held_color, Strategy};

#[derive(Debug, Default, Clone)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub fn new() -> Self {
        HeuristicStrategy
    }

    fn attack_priority(card: &Card) -> Option<u8> {
        match card.rank() {
            Rank::WildDrawFour => Some(3),
            Rank::DrawTwo => Some(2),
            Rank::Skip => Some(1),
            _ => None,
        }
    }
}

impl Strategy for HeuristicStrategy {
    fn play(
        &mut self,
        hand: &[Card],
        up_card: Card,
        called_color: Option<Color>,
        state: &GameState,
    ) -> Option<usize> {
        let legal = legal_plays(hand, up_card, called_color);
        if legal.is_empty() {
            return None;
        }

        if state.next_hand_size() == Some(1) {
            let attack = legal
                .iter()
                .copied()
                .filter_map(|i| Self::attack_priority(&hand[i]).map(|p| (p, i)))
                .max_by_key(|&(p, i)| (p, std::cmp::Reverse(i)));
            if let Some((_, index)) = attack {
                return Some(index);
            }
        }

        let favorite = most_held_color(hand);
        let colored = legal
            .iter()
            .copied()
            .filter(|&i| !hand[i].followed_by_call())
            .max_by_key(|&i| {
                let card = &hand[i];
                (
                    card.forfeit_cost(),
                    card.color() == Some(favorite),
                    std::cmp::Reverse(i),
                )
            });
        if colored.is_some() {
            return colored;
        }

        legal
            .iter()
            .copied()
            .find(|&i| hand[i].rank() == Rank::Wild)
            .or_else(|| legal.first().copied())
    }

    fn call_color(&mut self, hand: &[Card]) -> Color {
        most_held_color(hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(list: &str) -> Vec<Card> {
        list.split_whitespace().map(|s| s.parse().unwrap()).collect()
    }

    fn state(next_hand: usize) -> GameState {
        GameState::new(vec![next_hand, 7], vec![None, None], vec![])
    }

    #[test]
    fn test_attacks_player_on_one_card() {
        let mut strategy = HeuristicStrategy::new();
        let hand = cards("R9 RS R+2 W4");
        let up: Card = "R1".parse().unwrap();
        assert_eq!(strategy.play(&hand, up, None, &state(1)), Some(3));

        let hand = cards("R9 RS R+2");
        assert_eq!(strategy.play(&hand, up, None, &state(1)), Some(2));
    }

    #[test]
    fn test_sheds_most_expensive_colored_card() {
        let mut strategy = HeuristicStrategy::new();
        let hand = cards("R2 R+2 R7 W");
        let up: Card = "R1".parse().unwrap();
        assert_eq!(strategy.play(&hand, up, None, &state(5)), Some(1));
    }

    #[test]
    fn test_prefers_favorite_color_on_ties() {
        let mut strategy = HeuristicStrategy::new();
        // Both 5s are legal on B5; green is the color we hold most
        let hand = cards("R5 G5 G1 G2");
        let up: Card = "B5".parse().unwrap();
        assert_eq!(strategy.play(&hand, up, None, &state(5)), Some(1));
    }

    #[test]
    fn test_wild_is_last_resort() {
        let mut strategy = HeuristicStrategy::new();
        let hand = cards("G1 W4 W");
        let up: Card = "B5".parse().unwrap();
        assert_eq!(strategy.play(&hand, up, None, &state(5)), Some(2));

        let hand = cards("G1 W4");
        assert_eq!(strategy.play(&hand, up, None, &state(5)), Some(1));
        assert_eq!(strategy.play(&cards("G1"), up, None, &state(5)), None);
    }

    #[test]
    fn test_calls_most_held_color() {
        let mut strategy = HeuristicStrategy::new();
        assert_eq!(strategy.call_color(&cards("B1 B2 Y3 W")), Color::Blue);
    }
}
