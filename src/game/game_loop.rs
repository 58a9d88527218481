//! Turn resolution
//!
//! Drives a [`Game`] from its opening position to the first empty hand,
//! consulting each seat's strategy in turn and validating what comes back.

/// Log through the game's logger, skipping message construction entirely
/// when the level is filtered out or verbose logging is compiled away
macro_rules! log_at {
    ($game:expr, $level:expr, $category:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            if $game.logger.enabled($level) {
                $game.logger.log($level, $category, &format!($($arg)*));
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$game;
        }
    };
}

use crate::config::{GameConfig, PlayPolicy};
use crate::core::Card;
use crate::game::{Game, GameState, LogCategory, Outcome, Seat, SeatFlags, VerbosityLevel};
use crate::{Result, UnoError};
use serde::{Deserialize, Serialize};

/// Result of a completed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    /// Seat index of the player who emptied their hand
    pub winner: usize,
    /// Forfeit cost of every card left in the other hands
    pub round_points: u32,
    /// Turns taken, counting the winning one
    pub turns: u32,
    /// Times the discard pile was recycled
    pub remixes: u32,
    /// Violations per seat, indexed like the seats
    pub flags: Vec<SeatFlags>,
}

pub struct GameLoop<'a> {
    pub game: &'a mut Game,
    max_turns: u32,
    policy: PlayPolicy,
    color: bool,
    turns: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        Self::with_config(game, &GameConfig::default())
    }

    /// Take the turn limit and play policy from `config`
    pub fn with_config(game: &'a mut Game, config: &GameConfig) -> Self {
        GameLoop {
            game,
            max_turns: config.max_turns,
            policy: config.play_policy,
            color: false,
            turns: 0,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_policy(mut self, policy: PlayPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render cards with ANSI colors in transcripts
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Play turns until someone goes out
    ///
    /// Fails with [`UnoError::TurnLimit`] if nobody has won after the
    /// configured number of turns, and with [`UnoError::EmptyDeck`] if a
    /// forced draw finds every card already sitting in a hand.
    pub fn run_round(&mut self, seats: &mut [Seat]) -> Result<Victory> {
        if seats.len() != self.game.num_players() {
            return Err(UnoError::InvalidConfig(format!(
                "{} seats for a {}-player game",
                seats.len(),
                self.game.num_players()
            )));
        }

        if let Some(first) = seats.get(self.game.current_position()) {
            log_at!(
                self.game,
                VerbosityLevel::Normal,
                None,
                "up-card {}, {} to start, direction {:?}",
                self.render(self.game.up_card()),
                first.name(),
                self.game.direction()
            );
        }

        loop {
            if self.turns >= self.max_turns {
                return Err(UnoError::TurnLimit(self.max_turns));
            }
            self.turns += 1;

            if let Some(winner) = self.run_turn(seats)? {
                let victory = Victory {
                    winner,
                    round_points: self.game.round_points(),
                    turns: self.turns,
                    remixes: self.game.remixes(),
                    flags: seats.iter().map(|seat| seat.flags).collect(),
                };
                log_at!(
                    self.game,
                    VerbosityLevel::Minimal,
                    Some(LogCategory::Outcome),
                    "{} wins the round for {} points ({} turns)",
                    seats[winner].name(),
                    victory.round_points,
                    victory.turns
                );
                return Ok(victory);
            }
        }
    }

    /// Resolve a single turn for the current seat
    ///
    /// Returns the seat index if that seat emptied its hand.
    pub fn run_turn(&mut self, seats: &mut [Seat]) -> Result<Option<usize>> {
        let position = self.game.current_position();

        log_at!(
            self.game,
            VerbosityLevel::Verbose,
            None,
            "{} holds [{}]",
            seats[position].name(),
            self.render_hand(position)
        );

        let mut played = self.consult(&mut seats[position], position);
        if played.is_none() {
            let drawn = self.game.draw_into(position)?;
            log_at!(
                self.game,
                VerbosityLevel::Normal,
                Some(LogCategory::Draw),
                "{} draws {}",
                seats[position].name(),
                self.render(drawn)
            );
            played = self.consult(&mut seats[position], position);
        }

        match played {
            Some(card) => {
                if card.followed_by_call() {
                    let seat = &mut seats[position];
                    let (color, outcome) = seat.call_color(self.game.hand(position).cards());
                    if !matches!(outcome, Outcome::Answered(_)) {
                        self.log_lost_call(seat.name(), outcome);
                    }
                    self.game.call_color(position, color);
                    log_at!(
                        self.game,
                        VerbosityLevel::Normal,
                        Some(LogCategory::Call),
                        "{} calls {}",
                        seats[position].name(),
                        color
                    );
                }

                let remaining = self.game.hand(position).len();
                if remaining == 0 {
                    return Ok(Some(position));
                }
                if remaining == 1 {
                    log_at!(
                        self.game,
                        VerbosityLevel::Normal,
                        None,
                        "{}: UNO!",
                        seats[position].name()
                    );
                }

                card.perform_effect(self.game)?;
            }
            None => self.game.advance(),
        }

        debug_assert_eq!(self.game.card_count(), self.game.total_cards());
        Ok(None)
    }

    /// Ask the seat for a play and apply it if acceptable
    ///
    /// Returns the card now on the pile, or `None` when the seat passed,
    /// timed out, or answered with something the policy rejects.
    #[cfg_attr(not(feature = "verbose-logging"), allow(unused_variables))]
    fn consult(&mut self, seat: &mut Seat, position: usize) -> Option<Card> {
        let up_card = self.game.up_card();
        let called_color = self.game.called_color();
        let state = GameState::capture(self.game);
        let hand = self.game.hand(position).cards();

        let index = match seat.play(hand, up_card, called_color, state) {
            Outcome::Answered(Some(index)) => index,
            Outcome::Answered(None) | Outcome::Forfeited => return None,
            outcome => {
                self.log_lost_call(seat.name(), outcome);
                return None;
            }
        };

        let Some(&card) = hand.get(index) else {
            seat.flags.out_of_range += 1;
            log_at!(
                self.game,
                VerbosityLevel::Verbose,
                Some(LogCategory::Violation),
                "{} chose index {} from a hand of {}; treated as no play",
                seat.name(),
                index,
                hand.len()
            );
            return None;
        };

        if !card.can_play_on(&up_card, called_color) {
            seat.flags.illegal_plays += 1;
            let verdict = match self.policy {
                PlayPolicy::Strict => "rejected",
                PlayPolicy::Trusting => "allowed",
            };
            log_at!(
                self.game,
                VerbosityLevel::Verbose,
                Some(LogCategory::Violation),
                "{} tried {} on {}; {}",
                seat.name(),
                card,
                up_card,
                verdict
            );
            if self.policy == PlayPolicy::Strict {
                return None;
            }
        }

        let card = self.game.play_from_hand(position, index)?;
        log_at!(
            self.game,
            VerbosityLevel::Normal,
            Some(LogCategory::Play),
            "{} plays {}",
            seat.name(),
            self.render(card)
        );
        Some(card)
    }

    #[cfg_attr(not(feature = "verbose-logging"), allow(unused_variables))]
    fn log_lost_call<T>(&self, name: &str, outcome: Outcome<T>) {
        let what = match outcome {
            Outcome::TimedOut => "ran out of time",
            Outcome::Crashed => "crashed",
            _ => return,
        };
        log_at!(
            self.game,
            VerbosityLevel::Verbose,
            Some(LogCategory::Timeout),
            "{} {}; strategy forfeited for the round",
            name,
            what
        );
    }

    #[allow(dead_code)]
    fn render(&self, card: Card) -> String {
        if self.color {
            card.colored().to_string()
        } else {
            card.to_string()
        }
    }

    #[allow(dead_code)]
    fn render_hand(&self, position: usize) -> String {
        self.game
            .hand(position)
            .cards()
            .iter()
            .map(|&card| self.render(card))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
