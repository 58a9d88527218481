//! Card types and definitions

use crate::core::Transition;
use crate::game::Game;
use crate::{Result, UnoError};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four suit colors. Wild cards carry no color at all (`Option<Color>::None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Blue];

    /// Single-letter code used in card notation
    pub fn letter(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        match letter.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// Card rank. Only `Number` carries a face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    pub fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    /// Ranks that match each other regardless of color (everything but numbers)
    fn matches_by_rank(self, other: Rank) -> bool {
        !matches!(self, Rank::Number(_)) && self == other
    }
}

/// An immutable UNO card
///
/// Construct through the named constructors, which keep the invariant that a
/// card has a color iff it is not a wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    color: Option<Color>,
    rank: Rank,
}

impl Card {
    /// A number card; `None` unless `number` is 0 through 9
    pub fn number(color: Color, number: u8) -> Option<Self> {
        (number <= 9).then_some(Card {
            color: Some(color),
            rank: Rank::Number(number),
        })
    }

    pub fn skip(color: Color) -> Self {
        Card {
            color: Some(color),
            rank: Rank::Skip,
        }
    }

    pub fn reverse(color: Color) -> Self {
        Card {
            color: Some(color),
            rank: Rank::Reverse,
        }
    }

    pub fn draw_two(color: Color) -> Self {
        Card {
            color: Some(color),
            rank: Rank::DrawTwo,
        }
    }

    pub fn wild() -> Self {
        Card {
            color: None,
            rank: Rank::Wild,
        }
    }

    pub fn wild_draw_four() -> Self {
        Card {
            color: None,
            rank: Rank::WildDrawFour,
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Face value of a number card
    pub fn face_value(&self) -> Option<u8> {
        match self.rank {
            Rank::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Whether this card may legally be played on `up_card`
    ///
    /// `called_color` is the color announced after a wild; it is `None` while
    /// the up-card is a regular colored card.
    pub fn can_play_on(&self, up_card: &Card, called_color: Option<Color>) -> bool {
        if self.rank.is_wild() {
            return true;
        }
        if self.color.is_some() && (self.color == up_card.color || self.color == called_color) {
            return true;
        }
        if self.rank.matches_by_rank(up_card.rank) {
            return true;
        }
        matches!(
            (self.rank, up_card.rank),
            (Rank::Number(a), Rank::Number(b)) if a == b
        )
    }

    /// Points charged against a loser still holding this card
    pub fn forfeit_cost(&self) -> u32 {
        match self.rank {
            Rank::Number(n) => u32::from(n),
            Rank::Skip | Rank::Reverse | Rank::DrawTwo => 20,
            Rank::Wild | Rank::WildDrawFour => 50,
        }
    }

    /// Whether the player who plays this card must then call a color
    pub fn followed_by_call(&self) -> bool {
        self.rank.is_wild()
    }

    /// The engine sub-transitions this card triggers when played, in order.
    ///
    /// Forced draws always come before any position advance.
    pub fn transitions(&self) -> &'static [Transition] {
        use Transition::*;
        match self.rank {
            Rank::Skip => &[Advance, Advance],
            Rank::Reverse => &[Reverse, Advance],
            Rank::DrawTwo => &[NextPlayerDraws, NextPlayerDraws, Advance, Advance],
            Rank::WildDrawFour => &[
                NextPlayerDraws,
                NextPlayerDraws,
                NextPlayerDraws,
                NextPlayerDraws,
                Advance,
                Advance,
            ],
            Rank::Number(_) | Rank::Wild => &[Advance],
        }
    }

    /// Apply this card's effect to the game (draws, reversals, advances)
    pub fn perform_effect(&self, game: &mut Game) -> Result<()> {
        for &transition in self.transitions() {
            game.apply(transition)?;
        }
        Ok(())
    }

    /// Notation rendered with ANSI colors, for terminal transcripts
    pub fn colored(&self) -> ColoredString {
        let text = self.to_string();
        match self.color {
            Some(Color::Red) => text.red(),
            Some(Color::Yellow) => text.yellow(),
            Some(Color::Green) => text.green(),
            Some(Color::Blue) => text.blue(),
            None => text.bold(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(color) = self.color {
            write!(f, "{}", color.letter())?;
        }
        match self.rank {
            Rank::Number(n) => write!(f, "{n}"),
            Rank::Skip => f.write_str("S"),
            Rank::Reverse => f.write_str("R"),
            Rank::DrawTwo => f.write_str("+2"),
            Rank::Wild => f.write_str("W"),
            Rank::WildDrawFour => f.write_str("W4"),
        }
    }
}

impl FromStr for Card {
    type Err = UnoError;

    /// Parse compact notation: `R5`, `GS`, `BR`, `Y+2`, `W`, `W4`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "W" => return Ok(Card::wild()),
            "W4" | "W+4" => return Ok(Card::wild_draw_four()),
            _ => {}
        }

        let mut chars = s.chars();
        let color = chars
            .next()
            .and_then(Color::from_letter)
            .ok_or_else(|| UnoError::ParseError(format!("bad card color in '{s}'")))?;
        let rest = chars.as_str();

        match rest.to_ascii_uppercase().as_str() {
            "S" => Ok(Card::skip(color)),
            "R" => Ok(Card::reverse(color)),
            "+2" | "D2" => Ok(Card::draw_two(color)),
            digits => digits
                .parse::<u8>()
                .ok()
                .and_then(|n| Card::number(color, n))
                .ok_or_else(|| UnoError::ParseError(format!("bad card rank in '{s}'"))),
        }
    }
}
