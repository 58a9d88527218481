//! Round state: hands, deck, up-card, direction and position
//!
//! [`Game`] owns every card of a round and exposes the primitive transitions
//! the turn loop and card effects are built from. It never talks to
//! strategies itself; see [`GameLoop`](crate::game::GameLoop).

use crate::config::GameConfig;
use crate::core::{Card, Color, Transition};
use crate::game::{GameLogger, LogCategory, VerbosityLevel};
use crate::zones::{Deck, Hand};
use crate::{Result, UnoError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Direction of play around the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A hand-built starting position, for tests and replays
#[derive(Debug, Clone)]
pub struct Arrangement {
    pub hands: Vec<Vec<Card>>,
    pub up_card: Card,
    /// `draw_pile[0]` is drawn first
    pub draw_pile: Vec<Card>,
    pub direction: Direction,
    pub current: usize,
}

/// Complete state of one round
#[derive(Debug)]
pub struct Game {
    hands: Vec<Hand>,
    deck: Deck,
    up_card: Card,
    direction: Direction,
    current: usize,
    /// Valid only while the up-card is a wild
    called_color: Option<Color>,
    most_recent_called: Vec<Option<Color>>,
    /// Cards in the round; fixed once dealt
    total_cards: usize,
    remixes: u32,
    rng: ChaCha12Rng,
    pub logger: GameLogger,
}

impl Game {
    /// Shuffle a fresh deck, deal, reveal the up-card and pick who starts
    pub fn new(players: usize, config: &GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(players, config, ChaCha12Rng::seed_from_u64(seed))
    }

    fn with_rng(players: usize, config: &GameConfig, mut rng: ChaCha12Rng) -> Result<Self> {
        config.validate(players)?;

        let cards = config.deck.build();
        let total_cards = cards.len();
        let mut deck = Deck::shuffled(cards, &mut rng);

        let mut hands = vec![Hand::new(); players];
        for hand in hands.iter_mut() {
            for _ in 0..config.initial_hand_size {
                hand.add(deck.draw()?);
            }
        }

        // Wilds can't start the round; bury them in the discard pile.
        // No remix here: running dry means the composition is defective.
        let mut up_card = deck.draw()?;
        while up_card.followed_by_call() {
            deck.discard(up_card);
            up_card = deck.draw()?;
        }

        let direction = if rng.gen_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let current = rng.gen_range(0..players);

        Ok(Game {
            hands,
            deck,
            up_card,
            direction,
            current,
            called_color: None,
            most_recent_called: vec![None; players],
            total_cards,
            remixes: 0,
            rng,
            logger: GameLogger::with_verbosity(config.verbosity),
        })
    }

    /// Build a game from an explicit position instead of a shuffled deal
    pub fn arranged(arrangement: Arrangement) -> Result<Self> {
        let players = arrangement.hands.len();
        if players < 2 {
            return Err(UnoError::TooFewPlayers(players));
        }
        if arrangement.current >= players {
            return Err(UnoError::InvalidConfig(format!(
                "starting position {} out of range for {players} players",
                arrangement.current
            )));
        }

        let hands: Vec<Hand> = arrangement.hands.into_iter().map(Hand::from_cards).collect();
        let deck = Deck::stacked(arrangement.draw_pile);
        let total_cards = deck.total() + hands.iter().map(Hand::len).sum::<usize>() + 1;

        Ok(Game {
            hands,
            deck,
            up_card: arrangement.up_card,
            direction: arrangement.direction,
            current: arrangement.current,
            called_color: None,
            most_recent_called: vec![None; players],
            total_cards,
            remixes: 0,
            rng: ChaCha12Rng::seed_from_u64(0),
            logger: GameLogger::new(),
        })
    }

    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    pub fn hand(&self, position: usize) -> &Hand {
        &self.hands[position]
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn up_card(&self) -> Card {
        self.up_card
    }

    pub fn called_color(&self) -> Option<Color> {
        self.called_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn current_position(&self) -> usize {
        self.current
    }

    pub fn most_recent_called(&self, position: usize) -> Option<Color> {
        self.most_recent_called[position]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn remixes(&self) -> u32 {
        self.remixes
    }

    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    /// Cards currently accounted for in piles, hands and the up-card
    ///
    /// Always equals [`Game::total_cards`] between transitions.
    pub fn card_count(&self) -> usize {
        self.deck.total() + self.hands.iter().map(Hand::len).sum::<usize>() + 1
    }

    /// Position `steps` seats away from the current one in the current direction
    pub fn position_after(&self, steps: usize) -> usize {
        let n = self.num_players();
        let steps = steps % n;
        match self.direction {
            Direction::Forward => (self.current + steps) % n,
            Direction::Backward => (self.current + n - steps) % n,
        }
    }

    /// The seat that acts next absent any effect card
    pub fn next_position(&self) -> usize {
        self.position_after(1)
    }

    pub fn advance(&mut self) {
        self.current = self.next_position();
    }

    pub fn reverse_direction(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// Draw one card, remixing the discard pile first if the draw pile is dry
    ///
    /// Only fails when every card is sitting in a hand.
    pub fn draw(&mut self) -> Result<Card> {
        if self.deck.is_empty() {
            if self.deck.discard_len() == 0 {
                return Err(UnoError::EmptyDeck);
            }
            self.deck.remix(&mut self.rng);
            self.remixes += 1;
            self.logger.log(
                VerbosityLevel::Verbose,
                Some(LogCategory::Remix),
                "...deck exhausted, remixing...",
            );
        }
        self.deck.draw()
    }

    /// Draw one card into the hand at `position`
    pub fn draw_into(&mut self, position: usize) -> Result<Card> {
        let card = self.draw()?;
        self.hands[position].add(card);
        Ok(card)
    }

    /// Apply one effect sub-transition
    pub fn apply(&mut self, transition: Transition) -> Result<()> {
        match transition {
            Transition::Advance => self.advance(),
            Transition::Reverse => self.reverse_direction(),
            Transition::NextPlayerDraws => {
                self.draw_into(self.next_position())?;
            }
        }
        Ok(())
    }

    /// Move the card at `index` of `position`'s hand onto the pile
    ///
    /// The old up-card goes to the discard pile and the called color is
    /// cleared; the caller records a new call if the card demands one.
    pub fn play_from_hand(&mut self, position: usize, index: usize) -> Option<Card> {
        let card = self.hands[position].remove(index)?;
        let previous = std::mem::replace(&mut self.up_card, card);
        self.deck.discard(previous);
        self.called_color = None;
        Some(card)
    }

    /// Record a color call by the player at `position`
    pub fn call_color(&mut self, position: usize, color: Color) {
        self.called_color = Some(color);
        self.most_recent_called[position] = Some(color);
    }

    /// Points collected by the winner: everything left in every hand
    pub fn round_points(&self) -> u32 {
        self.hands.iter().map(Hand::forfeit_total).sum()
    }
}
