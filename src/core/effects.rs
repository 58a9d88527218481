//! Engine sub-transitions triggered by played cards

use serde::{Deserialize, Serialize};

/// One primitive step of a card effect
///
/// A played card expands into a fixed sequence of these (see
/// [`Card::transitions`](crate::core::Card::transitions)); the engine applies
/// them one at a time so each intermediate state can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Move the current position one step in the current direction
    Advance,
    /// Flip the direction of play
    Reverse,
    /// The player who would act next draws one card
    NextPlayerDraws,
}
