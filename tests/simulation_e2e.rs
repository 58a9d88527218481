//! End-to-end simulation tests: the driver, custom strategies and the CLI

use std::process::Command;
use std::time::Duration;
use uno_sim::{
    core::{Card, Color},
    game::GameState,
    loader::RosterLoader,
    simulation::Simulation,
    strategy::{legal_plays, Strategy, StrategyRegistry},
    GameConfig, PlayPolicy, SimulationConfig,
};

/// Always answers with an index past the end of its hand
struct Overreach;

impl Strategy for Overreach {
    fn play(&mut self, hand: &[Card], _: Card, _: Option<Color>, _: &GameState) -> Option<usize> {
        Some(hand.len())
    }
    fn call_color(&mut self, _: &[Card]) -> Color {
        Color::Red
    }
}

/// Plays legally but takes far too long to decide once it has seen 3 turns
struct Dawdler {
    turns: u32,
}

impl Strategy for Dawdler {
    fn play(&mut self, hand: &[Card], up: Card, called: Option<Color>, _: &GameState) -> Option<usize> {
        self.turns += 1;
        if self.turns > 3 {
            std::thread::sleep(Duration::from_millis(300));
        }
        legal_plays(hand, up, called).first().copied()
    }
    fn call_color(&mut self, _: &[Card]) -> Color {
        Color::Blue
    }
}

/// Never returns from any call
struct Hang;

impl Strategy for Hang {
    fn play(&mut self, _: &[Card], _: Card, _: Option<Color>, _: &GameState) -> Option<usize> {
        std::thread::sleep(Duration::from_secs(3600));
        None
    }
    fn call_color(&mut self, _: &[Card]) -> Color {
        std::thread::sleep(Duration::from_secs(3600));
        Color::Red
    }
}

/// Plays the first card in hand whether or not it matches
struct Reckless;

impl Strategy for Reckless {
    fn play(&mut self, hand: &[Card], _: Card, _: Option<Color>, _: &GameState) -> Option<usize> {
        if hand.is_empty() {
            None
        } else {
            Some(0)
        }
    }
    fn call_color(&mut self, _: &[Card]) -> Color {
        Color::Green
    }
}

fn registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::with_builtins();
    registry.register("overreach", |_| Box::new(Overreach));
    registry.register("dawdler", |_| Box::new(Dawdler { turns: 0 }));
    registry.register("reckless", |_| Box::new(Reckless));
    registry.register("hang", |_| Box::new(Hang));
    registry
}

fn config(rounds: usize, game: GameConfig) -> SimulationConfig {
    SimulationConfig {
        rounds,
        seed: Some(2015),
        threads: None,
        game,
    }
}

#[test]
fn test_out_of_range_plays_are_flagged_not_fatal() {
    let roster = RosterLoader::parse("cheat,overreach\nhonest,heuristic").unwrap();
    let sim = Simulation::new(roster, registry(), config(50, GameConfig::default())).unwrap();
    let standings = sim.run().unwrap();

    let cheat = &standings.players[0];
    assert_eq!(cheat.wins, 0);
    assert!(cheat.violations.out_of_range > 0);
    assert!(standings.players[1].violations.is_clean());
    assert_eq!(standings.players[1].wins, standings.completed);
}

#[test]
fn test_slow_strategy_is_cut_off() {
    let roster = RosterLoader::parse("slow,dawdler\nquick,zero").unwrap();
    let game = GameConfig::default().with_budget(Some(Duration::from_millis(50)));
    let sim = Simulation::new(roster, registry(), config(4, game)).unwrap();
    let standings = sim.run().unwrap();

    assert_eq!(standings.completed + standings.failed_rounds, 4);
    let slow = &standings.players[0];
    assert!(slow.violations.timeouts > 0);
    assert!(slow.violations.timeouts <= 4, "one timeout per round at most");
    assert_eq!(standings.players[1].violations.timeouts, 0);
}

#[test]
fn test_hanging_strategy_does_not_starve_others() {
    // More rounds than tokio's default blocking-pool limit of 512 threads
    let roster = RosterLoader::parse("h,hang\nz,zero").unwrap();
    let game = GameConfig::default().with_budget(Some(Duration::from_millis(20)));
    let mut config = config(700, game);
    config.threads = Some(4);
    let standings = Simulation::new(roster, registry(), config).unwrap().run().unwrap();

    assert_eq!(standings.completed + standings.failed_rounds, 700);
    let hang = &standings.players[0];
    assert!(hang.violations.timeouts >= 1);
    assert!(
        hang.violations.timeouts <= 4,
        "at most one abandoned call per worker, got {}",
        hang.violations.timeouts
    );
    assert_eq!(hang.wins, 0);
    let zero = &standings.players[1];
    assert_eq!(zero.violations.timeouts, 0);
    assert_eq!(zero.wins, standings.completed);
}

#[test]
fn test_policy_decides_illegal_plays() {
    let roster = || RosterLoader::parse("wild,reckless\ncareful,zero").unwrap();

    let strict = Simulation::new(roster(), registry(), config(30, GameConfig::default()))
        .unwrap()
        .run()
        .unwrap();
    assert!(strict.players[0].violations.illegal_plays > 0);

    let trusting = GameConfig::default().with_policy(PlayPolicy::Trusting);
    let trusting = Simulation::new(roster(), registry(), config(30, trusting))
        .unwrap()
        .run()
        .unwrap();
    assert!(trusting.players[0].violations.illegal_plays > 0);
    // Playing anything at all sheds cards much faster than drawing
    assert!(trusting.players[0].wins > strict.players[0].wins);
}

fn uno(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_uno"))
        .args(args)
        .output()
        .expect("Failed to run uno binary")
}

#[test]
fn test_cli_reports_standings() {
    let output = uno(&[
        "simulate",
        "--roster",
        "test_rosters/mixed.txt",
        "--rounds",
        "100",
        "--seed",
        "1",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{stdout}");
    assert!(lines[0].starts_with("alice: "));
    assert!(lines.iter().all(|l| l.contains(" wins (") && l.contains(" points (")));
}

#[test]
fn test_cli_wins_only() {
    let output = uno(&[
        "simulate",
        "--roster",
        "test_rosters/heads_up.txt",
        "--rounds",
        "10",
        "--seed",
        "1",
        "--wins-only",
    ]);
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("points"));
}

#[test]
fn test_cli_rejects_malformed_roster() {
    let output = uno(&["simulate", "--roster", "test_rosters/malformed/missing_comma.bad"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2"));
}

#[test]
fn test_cli_rejects_oversized_hands() {
    let output = uno(&[
        "simulate",
        "--roster",
        "test_rosters/full_table.txt",
        "--hand-size",
        "20",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DeckTooSmall"));
}

#[test]
fn test_cli_lists_strategies() {
    let output = uno(&["strategies"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "heuristic\nrandom\nzero\n");
}
