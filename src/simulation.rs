//! Simulation driver: many independent rounds in parallel, one tally
//!
//! Every round builds a fresh [`Game`] and fresh strategy instances from the
//! roster, so rounds share nothing but the read-only configuration. Rounds
//! are spread over rayon's pool; each worker folds results into its own
//! [`Tally`] and the partial tallies are merged once at the end.
//!
//! With a master seed, round `i` always gets the same derived seed, so the
//! standings are identical no matter how many threads run the batch.

use crate::config::SimulationConfig;
use crate::game::{Game, GameLoop, Invoker, OutputMode, Quarantine, Seat, SeatFlags, Victory};
use crate::loader::Roster;
use crate::strategy::StrategyRegistry;
use crate::{Result, UnoError};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tokio::runtime::Handle;

/// Golden-ratio increment used to spread round seeds apart
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for round `index` under `master`
pub fn round_seed(master: u64, index: usize) -> u64 {
    master.wrapping_add((index as u64).wrapping_mul(SEED_STRIDE))
}

/// How a single round ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    Won(Victory),
    /// Supply exhausted or turn limit hit; nobody scores
    Failed { flags: Vec<SeatFlags>, reason: String },
}

/// Running totals for a subset of rounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: Vec<u64>,
    pub points: Vec<u64>,
    pub flags: Vec<SeatFlags>,
    pub completed: u64,
    pub failed: u64,
    pub turns: u64,
    pub remixes: u64,
}

impl Tally {
    pub fn new(players: usize) -> Self {
        Tally {
            wins: vec![0; players],
            points: vec![0; players],
            flags: vec![SeatFlags::default(); players],
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &RoundOutcome) {
        match outcome {
            RoundOutcome::Won(victory) => {
                self.wins[victory.winner] += 1;
                self.points[victory.winner] += u64::from(victory.round_points);
                self.completed += 1;
                self.turns += u64::from(victory.turns);
                self.remixes += u64::from(victory.remixes);
                self.merge_flags(&victory.flags);
            }
            RoundOutcome::Failed { flags, .. } => {
                self.failed += 1;
                self.merge_flags(flags);
            }
        }
    }

    fn merge_flags(&mut self, flags: &[SeatFlags]) {
        for (total, seat) in self.flags.iter_mut().zip(flags) {
            total.merge(seat);
        }
    }

    pub fn merge(mut self, other: Tally) -> Tally {
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.points.iter_mut().zip(&other.points) {
            *a += b;
        }
        self.merge_flags(&other.flags);
        self.completed += other.completed;
        self.failed += other.failed;
        self.turns += other.turns;
        self.remixes += other.remixes;
        self
    }
}

/// Aggregated result for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub name: String,
    pub strategy: String,
    pub wins: u64,
    pub points: u64,
    pub violations: SeatFlags,
}

/// Final results of a simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub players: Vec<PlayerStanding>,
    /// Rounds that produced a winner
    pub completed: u64,
    pub failed_rounds: u64,
    pub total_turns: u64,
    pub total_remixes: u64,
    pub seed: Option<u64>,
}

impl Standings {
    pub fn from_tally(roster: &Roster, tally: Tally, seed: Option<u64>) -> Self {
        let players = roster
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| PlayerStanding {
                name: entry.name.clone(),
                strategy: entry.strategy.clone(),
                wins: tally.wins[i],
                points: tally.points[i],
                violations: tally.flags[i],
            })
            .collect();

        Standings {
            players,
            completed: tally.completed,
            failed_rounds: tally.failed,
            total_turns: tally.turns,
            total_remixes: tally.remixes,
            seed,
        }
    }

    pub fn total_points(&self) -> u64 {
        self.players.iter().map(|p| p.points).sum()
    }

    /// Fraction of completed rounds won by player `i` (0 when none completed)
    pub fn win_share(&self, i: usize) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.players[i].wins as f64 / self.completed as f64
    }

    /// Fraction of all points scored by player `i` (0 when nobody scored)
    pub fn point_share(&self, i: usize) -> f64 {
        let total = self.total_points();
        if total == 0 {
            return 0.0;
        }
        self.players[i].points as f64 / total as f64
    }

    pub fn average_turns(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.completed as f64
    }
}

/// A configured batch of rounds over a fixed roster
#[derive(Debug)]
pub struct Simulation {
    roster: Roster,
    registry: StrategyRegistry,
    config: SimulationConfig,
    color: bool,
}

impl Simulation {
    /// Check the roster and configuration before any round is played
    pub fn new(roster: Roster, registry: StrategyRegistry, config: SimulationConfig) -> Result<Self> {
        roster.validate(&registry)?;
        config.validate(roster.len())?;
        Ok(Simulation {
            roster,
            registry,
            config,
            color: false,
        })
    }

    /// Render cards with ANSI colors in round transcripts
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play every round and aggregate the results
    pub fn run(&self) -> Result<Standings> {
        // Budgeted strategy calls need a runtime to time them against
        let runtime = match self.config.game.strategy_budget {
            Some(_) => Some(
                tokio::runtime::Builder::new_multi_thread()
                    .enable_time()
                    .thread_name("uno-budget")
                    .build()?,
            ),
            None => None,
        };
        let handle = runtime.as_ref().map(|rt| rt.handle().clone());
        let quarantine = Quarantine::new();

        let tally = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| UnoError::InvalidConfig(format!("thread pool: {e}")))?
                .install(|| self.run_rounds(handle.as_ref(), &quarantine)),
            None => self.run_rounds(handle.as_ref(), &quarantine),
        };

        if let Some(runtime) = runtime {
            // Abandoned strategy calls may still be running; don't wait on them
            runtime.shutdown_background();
        }

        Ok(Standings::from_tally(&self.roster, tally?, self.config.seed))
    }

    fn run_rounds(&self, handle: Option<&Handle>, quarantine: &Quarantine) -> Result<Tally> {
        let players = self.roster.len();
        (0..self.config.rounds)
            .into_par_iter()
            .try_fold(
                || Tally::new(players),
                |mut tally, index| {
                    tally.record(&self.play_round(index, handle, quarantine)?);
                    Ok::<_, UnoError>(tally)
                },
            )
            .try_reduce(|| Tally::new(players), |a, b| Ok(a.merge(b)))
    }

    /// Play round `index` to completion
    ///
    /// A round that runs the supply dry or hits the turn limit comes back as
    /// [`RoundOutcome::Failed`]; anything else that goes wrong is an error.
    /// Seats in `quarantine` timed out in an earlier round and are never
    /// consulted again.
    pub fn play_round(
        &self,
        index: usize,
        handle: Option<&Handle>,
        quarantine: &Quarantine,
    ) -> Result<RoundOutcome> {
        let seed = match self.config.seed {
            Some(master) => round_seed(master, index),
            None => rand::random(),
        };
        let game_config = &self.config.game;

        let mut game = Game::new(self.roster.len(), game_config, seed)?;
        game.logger.set_output_mode(OutputMode::Memory);
        game.logger.minimal(&format!("Round {}", index + 1));

        // Strategy seeds come from their own stream so they never collide
        // with the deal
        let mut seed_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let invoker = Invoker::new(handle.cloned(), game_config.strategy_budget);
        let mut seats = self
            .roster
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let strategy = self.registry.create(&entry.strategy, seed_rng.gen())?;
                Ok(Seat::new(entry.name.clone(), strategy)
                    .with_invoker(invoker.clone())
                    .with_quarantine(quarantine.clone(), i))
            })
            .collect::<Result<Vec<_>>>()?;

        let result = GameLoop::with_config(&mut game, game_config)
            .with_color(self.color)
            .run_round(&mut seats);

        let outcome = match result {
            Ok(victory) => RoundOutcome::Won(victory),
            Err(err @ (UnoError::EmptyDeck | UnoError::TurnLimit(_))) => {
                game.logger.minimal(&format!("Round {} abandoned: {err}", index + 1));
                RoundOutcome::Failed {
                    flags: seats.iter().map(|seat| seat.flags).collect(),
                    reason: err.to_string(),
                }
            }
            Err(err) => return Err(err),
        };

        if !game.logger.logs().is_empty() {
            let mut out = std::io::stdout().lock();
            game.logger.flush_to(&mut out)?;
            out.flush()?;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::loader::RosterLoader;

    fn roster(content: &str) -> Roster {
        RosterLoader::parse(content).unwrap()
    }

    fn config(rounds: usize, seed: u64) -> SimulationConfig {
        SimulationConfig {
            rounds,
            seed: Some(seed),
            threads: None,
            game: GameConfig::default(),
        }
    }

    #[test]
    fn test_round_seeds_differ() {
        assert_eq!(round_seed(7, 0), 7);
        assert_ne!(round_seed(7, 1), round_seed(7, 2));
    }

    #[test]
    fn test_every_round_is_counted() {
        let sim = Simulation::new(
            roster("a,zero\nb,random\nc,heuristic"),
            StrategyRegistry::with_builtins(),
            config(200, 3),
        )
        .unwrap();
        let standings = sim.run().unwrap();

        assert_eq!(standings.completed + standings.failed_rounds, 200);
        let wins: u64 = standings.players.iter().map(|p| p.wins).sum();
        assert_eq!(wins, standings.completed);

        let share: f64 = (0..3).map(|i| standings.win_share(i)).sum();
        assert!((share - 1.0).abs() < 1e-9);
        let share: f64 = (0..3).map(|i| standings.point_share(i)).sum();
        assert!((share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_ignore_thread_count() {
        let run = |threads| {
            let mut config = config(120, 42);
            config.threads = Some(threads);
            Simulation::new(
                roster("a,random\nb,random\nc,zero\nd,heuristic"),
                StrategyRegistry::with_builtins(),
                config,
            )
            .unwrap()
            .run()
            .unwrap()
        };
        assert_eq!(run(1), run(4));
    }

    #[test]
    fn test_rejects_bad_setup_before_playing() {
        let registry = StrategyRegistry::with_builtins();
        assert!(matches!(
            Simulation::new(roster("a,zero\nb,oracle"), registry.clone(), config(1, 1)),
            Err(UnoError::UnknownStrategy(_))
        ));

        let mut big_hands = config(1, 1);
        big_hands.game = GameConfig::default().with_hand_size(40);
        assert!(matches!(
            Simulation::new(roster("a,zero\nb,zero\nc,zero"), registry.clone(), big_hands),
            Err(UnoError::DeckTooSmall { .. })
        ));

        assert!(matches!(
            Simulation::new(roster("solo,zero"), registry, config(1, 1)),
            Err(UnoError::TooFewPlayers(1))
        ));
    }

    #[test]
    fn test_turn_limit_counts_as_failed_round() {
        let mut config = config(10, 5);
        config.game = GameConfig::default().with_max_turns(1);
        let sim = Simulation::new(
            roster("a,zero\nb,zero"),
            StrategyRegistry::with_builtins(),
            config,
        )
        .unwrap();
        let standings = sim.run().unwrap();
        assert_eq!(standings.failed_rounds, 10);
        assert_eq!(standings.completed, 0);
        assert_eq!(standings.win_share(0), 0.0);
    }

    #[test]
    fn test_quarantined_seat_is_never_consulted() {
        let sim = Simulation::new(
            roster("benched,zero
player,zero"),
            StrategyRegistry::with_builtins(),
            config(1, 8),
        )
        .unwrap();
        let quarantine = Quarantine::new();
        quarantine.insert(0);

        match sim.play_round(0, None, &quarantine).unwrap() {
            RoundOutcome::Won(victory) => {
                assert_eq!(victory.winner, 1);
                assert!(victory.flags.iter().all(|f| f.is_clean()));
            }
            other => panic!("expected a win, got {other:?}"),
        }
        assert!(!quarantine.contains(1));
    }

    #[test]
    fn test_tally_merge() {
        let victory = Victory {
            winner: 1,
            round_points: 30,
            turns: 12,
            remixes: 0,
            flags: vec![SeatFlags::default(), SeatFlags { illegal_plays: 1, ..Default::default() }],
        };
        let mut a = Tally::new(2);
        a.record(&RoundOutcome::Won(victory.clone()));
        let mut b = Tally::new(2);
        b.record(&RoundOutcome::Won(victory));
        b.record(&RoundOutcome::Failed {
            flags: vec![SeatFlags::default(); 2],
            reason: "turn limit".to_string(),
        });

        let total = a.merge(b);
        assert_eq!(total.wins, vec![0, 2]);
        assert_eq!(total.points, vec![0, 60]);
        assert_eq!(total.completed, 2);
        assert_eq!(total.failed, 1);
        assert_eq!(total.flags[1].illegal_plays, 2);
    }
}
