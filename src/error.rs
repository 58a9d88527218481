//! Error types for the UNO simulator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnoError {
    /// Draw attempted on an empty draw pile (callers must remix first)
    #[error("Draw pile is empty")]
    EmptyDeck,

    #[error(
        "Deck too small: {players} players x {hand_size} cards leaves no guaranteed colored up-card in {deck_size} cards"
    )]
    DeckTooSmall {
        players: usize,
        hand_size: usize,
        deck_size: usize,
    },

    #[error("At least 2 players are required (got {0})")]
    TooFewPlayers(usize),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Round exceeded the limit of {0} turns")]
    TurnLimit(u32),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, UnoError>;
