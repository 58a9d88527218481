//! Card zones: the shared deck (draw + discard piles) and player hands

use crate::core::Card;
use crate::{Result, UnoError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Draw pile plus discard pile
///
/// The draw pile is stored top-last so drawing is a `pop`. The discard pile
/// keeps play order; it is also the card-counting history strategies see,
/// which restarts every time the deck is remixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Deck {
    /// Build a deck from `cards` and shuffle it
    pub fn shuffled(cards: Vec<Card>, rng: &mut impl Rng) -> Self {
        let mut deck = Deck {
            draw_pile: cards,
            discard_pile: Vec::new(),
        };
        deck.shuffle(rng);
        deck
    }

    /// Build an unshuffled deck; `draw_order[0]` is the first card drawn
    pub fn stacked(draw_order: Vec<Card>) -> Self {
        let mut draw_pile = draw_order;
        draw_pile.reverse();
        Deck {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    /// Remove and return the top card
    ///
    /// Fails with [`UnoError::EmptyDeck`] when the draw pile is empty; the
    /// game-level draw remixes before that can happen.
    pub fn draw(&mut self) -> Result<Card> {
        self.draw_pile.pop().ok_or(UnoError::EmptyDeck)
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    /// Shuffle the discard pile back into the draw pile
    pub fn remix(&mut self, rng: &mut impl Rng) {
        self.draw_pile.append(&mut self.discard_pile);
        self.shuffle(rng);
    }

    /// Uniformly permute the draw pile
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.draw_pile.shuffle(rng);
    }

    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    /// Cards left in the draw pile
    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Cards discarded since the last remix, oldest first
    pub fn discarded(&self) -> &[Card] {
        &self.discard_pile
    }

    /// Cards in both piles
    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }
}

/// One player's hand, in insertion order
///
/// Most hands fit in the inline buffer, so dealing and drawing rarely allocate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: SmallVec<[Card; 16]>,
}

impl Hand {
    pub fn new() -> Self {
        Hand {
            cards: SmallVec::new(),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Hand {
            cards: SmallVec::from_vec(cards),
        }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove the card at `index`, keeping the order of the rest
    pub fn remove(&mut self, index: usize) -> Option<Card> {
        // remove() rather than swap_remove(): strategies index into the order
        // they were shown, so the remaining order must stay stable.
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of forfeit costs of every card held
    pub fn forfeit_total(&self) -> u32 {
        self.cards.iter().map(Card::forfeit_cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeckComposition;
    use crate::core::Color;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn sorted(mut cards: Vec<Card>) -> Vec<String> {
        let mut names: Vec<String> = cards.drain(..).map(|c| c.to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_stacked_draw_order() {
        let a = Card::number(Color::Red, 1).unwrap();
        let b = Card::skip(Color::Blue);
        let mut deck = Deck::stacked(vec![a, b]);

        assert_eq!(deck.draw().unwrap(), a);
        assert_eq!(deck.draw().unwrap(), b);
        assert!(matches!(deck.draw(), Err(UnoError::EmptyDeck)));
    }

    #[test]
    fn test_remix_preserves_cards() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let all = DeckComposition::default().build();
        let mut deck = Deck::shuffled(all.clone(), &mut rng);

        for _ in 0..30 {
            let card = deck.draw().unwrap();
            deck.discard(card);
        }
        let (draw_before, discard_before) = (deck.len(), deck.discard_len());
        assert_eq!(discard_before, 30);

        deck.remix(&mut rng);
        assert_eq!(deck.len(), draw_before + discard_before);
        assert_eq!(deck.discard_len(), 0);
        assert!(deck.discarded().is_empty());

        let mut remaining = Vec::new();
        while let Ok(card) = deck.draw() {
            remaining.push(card);
        }
        assert_eq!(sorted(remaining), sorted(all));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let all = DeckComposition::default().build();
        let mut d1 = Deck::shuffled(all.clone(), &mut ChaCha12Rng::seed_from_u64(3));
        let mut d2 = Deck::shuffled(all.clone(), &mut ChaCha12Rng::seed_from_u64(3));
        let mut d3 = Deck::shuffled(all, &mut ChaCha12Rng::seed_from_u64(4));

        let top1: Vec<Card> = (0..10).map(|_| d1.draw().unwrap()).collect();
        let top2: Vec<Card> = (0..10).map(|_| d2.draw().unwrap()).collect();
        let top3: Vec<Card> = (0..10).map(|_| d3.draw().unwrap()).collect();
        assert_eq!(top1, top2);
        assert_ne!(top1, top3);
    }

    #[test]
    fn test_discard_keeps_order() {
        let mut deck = Deck::stacked(vec![]);
        let cards = [
            Card::number(Color::Red, 1).unwrap(),
            Card::wild(),
            Card::number(Color::Red, 1).unwrap(),
        ];
        for card in cards {
            deck.discard(card);
        }
        assert_eq!(deck.discarded(), &cards);
    }

    #[test]
    fn test_hand_remove_keeps_order() {
        let mut hand = Hand::from_cards(vec![
            Card::number(Color::Red, 1).unwrap(),
            Card::number(Color::Green, 2).unwrap(),
            Card::number(Color::Blue, 3).unwrap(),
        ]);
        assert_eq!(hand.remove(1), Some(Card::number(Color::Green, 2).unwrap()));
        assert_eq!(
            hand.cards(),
            &[Card::number(Color::Red, 1).unwrap(), Card::number(Color::Blue, 3).unwrap()]
        );
        assert_eq!(hand.remove(5), None);
        assert_eq!(hand.forfeit_total(), 4);
    }
}
