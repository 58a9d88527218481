//! Roster loader
//!
//! Parses the roster format: one `name,strategyIdentifier` pair per line

pub mod roster;

pub use roster::{Roster, RosterEntry, RosterLoader};
