//! Roster file loader
//!
//! ```text
//! # comment
//! alice,heuristic
//! bob,random
//! ```

use crate::strategy::StrategyRegistry;
use crate::{Result, UnoError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Roster loader for `name,strategy` files
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a file
    pub fn load_from_file(path: &Path) -> Result<Roster> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a roster from its text content
    ///
    /// Blank lines and lines starting with `#` are skipped. Whitespace
    /// around either field is ignored.
    pub fn parse(content: &str) -> Result<Roster> {
        let mut entries: Vec<RosterEntry> = Vec::new();

        for (number, line) in content.lines().enumerate() {
            let number = number + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((name, strategy)) = line.split_once(',') else {
                return Err(UnoError::InvalidRoster(format!(
                    "line {number}: expected 'name,strategy', got '{line}'"
                )));
            };
            let (name, strategy) = (name.trim(), strategy.trim());

            if name.is_empty() {
                return Err(UnoError::InvalidRoster(format!("line {number}: missing player name")));
            }
            if strategy.is_empty() || strategy.contains(',') {
                return Err(UnoError::InvalidRoster(format!(
                    "line {number}: expected a single strategy identifier for '{name}'"
                )));
            }
            if entries.iter().any(|entry| entry.name == name) {
                return Err(UnoError::InvalidRoster(format!(
                    "line {number}: duplicate player name '{name}'"
                )));
            }

            entries.push(RosterEntry {
                name: name.to_string(),
                strategy: strategy.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(UnoError::InvalidRoster("no players listed".to_string()));
        }

        Ok(Roster { entries })
    }
}

/// One seat: a display name bound to a strategy identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub strategy: String,
}

/// Players in seating order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Roster { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Check that every strategy identifier is registered
    pub fn validate(&self, registry: &StrategyRegistry) -> Result<()> {
        match self.entries.iter().find(|entry| !registry.contains(&entry.strategy)) {
            Some(entry) => Err(UnoError::UnknownStrategy(format!(
                "{} (for player '{}')",
                entry.strategy, entry.name
            ))),
            None => Ok(()),
        }
    }
}
