//! Results rendering
//!
//! Text output lists each player's wins and points with their share of the
//! total, names aligned. JSON output carries the same numbers plus the raw
//! violation counters.

use crate::simulation::Standings;
use crate::{Result, UnoError};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Which totals the text report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringMode {
    /// Wins and points
    #[default]
    Points,
    /// Wins only; point columns are left out
    WinsOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Percentage rounded to the nearest whole number
fn percent(share: f64) -> u64 {
    (share * 100.0).round() as u64
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    strategy: &'a str,
    wins: u64,
    win_share: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    point_share: Option<f64>,
    violations: crate::game::SeatFlags,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    completed: u64,
    failed_rounds: u64,
    average_turns: f64,
    total_remixes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    players: Vec<JsonRow<'a>>,
}

pub struct Report<'a> {
    standings: &'a Standings,
    scoring: ScoringMode,
    color: bool,
}

impl<'a> Report<'a> {
    pub fn new(standings: &'a Standings) -> Self {
        Report {
            standings,
            scoring: ScoringMode::default(),
            color: false,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }

    /// One line per player: `name: W wins (P%)  S points (P%)`, with the
    /// labels padded after the colon so the counts line up
    pub fn render_text(&self) -> String {
        let standings = self.standings;
        let width = standings
            .players
            .iter()
            .map(|p| p.name.chars().count() + 1)
            .max()
            .unwrap_or(0);
        let leader = standings
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.wins > 0)
            .max_by_key(|&(i, p)| (p.wins, std::cmp::Reverse(i)))
            .map(|(i, _)| i);

        let mut out = String::new();
        for (i, player) in standings.players.iter().enumerate() {
            let label = format!("{:<width$}", format!("{}:", player.name));
            let label = if self.color && leader == Some(i) {
                label.green().bold().to_string()
            } else {
                label
            };

            let _ = write!(
                out,
                "{label} {} wins ({}%)",
                player.wins,
                percent(standings.win_share(i))
            );
            if self.scoring == ScoringMode::Points {
                let _ = write!(
                    out,
                    "  {} points ({}%)",
                    player.points,
                    percent(standings.point_share(i))
                );
            }
            out.push('\n');
        }

        if standings.failed_rounds > 0 {
            let line = format!(
                "{} rounds completed, {} abandoned",
                standings.completed, standings.failed_rounds
            );
            let line = if self.color {
                line.yellow().to_string()
            } else {
                line
            };
            let _ = writeln!(out, "{line}");
        }

        for player in standings.players.iter() {
            let v = &player.violations;
            if v.is_clean() {
                continue;
            }
            let line = format!(
                "{}: {} out-of-range, {} illegal, {} timed out, {} crashed",
                player.name, v.out_of_range, v.illegal_plays, v.timeouts, v.crashes
            );
            let line = if self.color {
                line.red().to_string()
            } else {
                line
            };
            let _ = writeln!(out, "{line}");
        }

        out
    }

    pub fn render_json(&self) -> Result<String> {
        let standings = self.standings;
        let points = self.scoring == ScoringMode::Points;
        let report = JsonReport {
            completed: standings.completed,
            failed_rounds: standings.failed_rounds,
            average_turns: standings.average_turns(),
            total_remixes: standings.total_remixes,
            seed: standings.seed,
            players: standings
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| JsonRow {
                    name: &p.name,
                    strategy: &p.strategy,
                    wins: p.wins,
                    win_share: standings.win_share(i),
                    points: points.then_some(p.points),
                    point_share: points.then(|| standings.point_share(i)),
                    violations: p.violations,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report).map_err(|e| UnoError::SerializationError(e.to_string()))
    }
}
