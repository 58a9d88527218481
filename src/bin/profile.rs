//! Profiling binary for round execution
//!
//! Plays rounds in a tight loop on one thread for profiling with
//! cargo-flamegraph. Unlike the Criterion benchmarks, this has minimal
//! overhead and produces cleaner flamegraphs.
//!
//! Usage:
//!   cargo flamegraph --bin profile
//!   PROFILE_ITERATIONS=50000 cargo flamegraph --bin profile

use uno_sim::{
    game::{Game, GameLoop, Seat},
    strategy::{HeuristicStrategy, RandomStrategy},
    GameConfig,
};

fn main() {
    // Allow overriding iterations via environment variable
    let iterations: u64 = std::env::var("PROFILE_ITERATIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000);

    println!("Profiling round execution...");
    println!("Running {iterations} rounds with seed 42");
    println!();

    let seed = 42u64;
    let config = GameConfig::default();
    let mut turns = 0u64;

    for i in 0..iterations {
        let round_seed = seed.wrapping_add(i);
        let mut game = Game::new(4, &config, round_seed).expect("Failed to deal round");
        let mut seats = vec![
            Seat::new("random-a", Box::new(RandomStrategy::with_seed(round_seed))),
            Seat::new("random-b", Box::new(RandomStrategy::with_seed(round_seed + 1))),
            Seat::new("heuristic-a", Box::new(HeuristicStrategy::new())),
            Seat::new("heuristic-b", Box::new(HeuristicStrategy::new())),
        ];

        let victory = GameLoop::with_config(&mut game, &config)
            .run_round(&mut seats)
            .expect("Round execution failed");
        turns += u64::from(victory.turns);

        // Print progress every 1000 rounds
        if (i + 1) % 1000 == 0 {
            println!("Completed {} rounds", i + 1);
        }
    }

    println!();
    println!("Profiling complete! {iterations} rounds, {turns} turns executed.");
}
