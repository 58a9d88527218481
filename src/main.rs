//! UNO simulator - main binary
//!
//! Plays batches of rounds between strategies listed in a roster file and
//! prints each player's share of wins and points.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uno_sim::{
    game::VerbosityLevel,
    loader::RosterLoader,
    report::{Report, ReportFormat, ScoringMode},
    simulation::Simulation,
    strategy::StrategyRegistry,
    GameConfig, PlayPolicy, Result, SimulationConfig,
};

/// How to treat a strategy that picks a card it may not play
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Reject the play and force a draw instead
    Strict,
    /// Let the play stand
    Trusting,
}

impl From<PolicyArg> for PlayPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => PlayPolicy::Strict,
            PolicyArg::Trusting => PlayPolicy::Trusting,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "uno")]
#[command(about = "UNO simulator - pit strategies against each other over many rounds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a batch of rounds and report the standings
    Simulate {
        /// Roster file: one `name,strategy` pair per line
        #[arg(long, short = 'r', value_name = "FILE")]
        roster: PathBuf,

        /// Number of rounds to play
        #[arg(long, short = 'n', default_value_t = 10_000)]
        rounds: usize,

        /// Master seed for reproducible runs (default: fresh entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level for round output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v', default_value = "silent")]
        verbosity: VerbosityLevel,

        /// Cards dealt to each player
        #[arg(long, default_value_t = 7)]
        hand_size: usize,

        /// Worker threads (default: one per core)
        #[arg(long, short = 'j')]
        threads: Option<usize>,

        /// Time budget per strategy call in milliseconds; 0 disables it
        #[arg(long, default_value_t = 250)]
        budget_ms: u64,

        /// Treatment of illegal plays
        #[arg(long, value_enum, default_value = "strict")]
        policy: PolicyArg,

        /// Safety limit on turns per round
        #[arg(long, default_value_t = 10_000)]
        max_turns: u32,

        /// Colorize cards and results
        #[arg(long)]
        color: bool,

        /// Output format for the standings
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// Report wins only, without points
        #[arg(long)]
        wins_only: bool,
    },

    /// List the strategy identifiers a roster may use
    Strategies,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            roster,
            rounds,
            seed,
            verbosity,
            hand_size,
            threads,
            budget_ms,
            policy,
            max_turns,
            color,
            format,
            wins_only,
        } => {
            let budget = (budget_ms > 0).then(|| Duration::from_millis(budget_ms));
            let config = SimulationConfig {
                rounds,
                seed,
                threads,
                game: GameConfig::default()
                    .with_hand_size(hand_size)
                    .with_policy(policy.into())
                    .with_budget(budget)
                    .with_max_turns(max_turns)
                    .with_verbosity(verbosity),
            };
            let scoring = if wins_only {
                ScoringMode::WinsOnly
            } else {
                ScoringMode::Points
            };
            run_simulate(roster, config, color, format.into(), scoring)?
        }
        Commands::Strategies => {
            for id in StrategyRegistry::with_builtins().ids() {
                println!("{id}");
            }
        }
    }

    Ok(())
}

fn run_simulate(
    roster_path: PathBuf,
    config: SimulationConfig,
    color: bool,
    format: ReportFormat,
    scoring: ScoringMode,
) -> Result<()> {
    if color {
        colored::control::set_override(true);
    }

    let roster = RosterLoader::load_from_file(&roster_path)?;
    let verbosity = config.game.verbosity;
    let rounds = config.rounds;
    let simulation = Simulation::new(roster, StrategyRegistry::with_builtins(), config)?.with_color(color);

    if verbosity >= VerbosityLevel::Minimal {
        println!("=== UNO Simulation ===");
        println!(
            "Roster: {} ({} players)",
            roster_path.display(),
            simulation.roster().len()
        );
        if let Some(seed) = simulation.config().seed {
            println!("Using seed: {seed}");
        }
        println!("Running {rounds} rounds\n");
    }

    let start = Instant::now();
    let standings = simulation.run()?;
    let elapsed = start.elapsed();

    if verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Standings ===");
        // Timing goes to stderr so seeded stdout stays reproducible
        eprintln!(
            "Elapsed: {:.2}s ({:.0} rounds/sec)",
            elapsed.as_secs_f64(),
            rounds as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }

    let report = Report::new(&standings).with_scoring(scoring).with_color(color);
    print!("{}", report.render(format)?);
    if format == ReportFormat::Json {
        println!();
    }

    Ok(())
}
