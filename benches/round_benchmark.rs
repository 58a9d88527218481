//! Performance benchmarks for the UNO round engine
//!
//! Measures three things with Criterion.rs:
//!
//! 1. **Inline** - one 4-player round with strategies called directly
//! 2. **Budgeted** - the same round with every strategy call timed on the
//!    tokio blocking pool, to show what the time budget costs per turn
//! 3. **Simulation** - a 1000-round batch spread over rayon's pool

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use tokio::runtime::Runtime;
use uno_sim::{
    game::{Game, GameLoop, Invoker, Seat, Victory},
    loader::RosterLoader,
    simulation::Simulation,
    strategy::{HeuristicStrategy, RandomStrategy},
    GameConfig, SimulationConfig,
};

fn seats(seed: u64, invoker: &Invoker) -> Vec<Seat> {
    vec![
        Seat::new("random-a", Box::new(RandomStrategy::with_seed(seed))),
        Seat::new("random-b", Box::new(RandomStrategy::with_seed(seed + 1))),
        Seat::new("heuristic-a", Box::new(HeuristicStrategy::new())),
        Seat::new("heuristic-b", Box::new(HeuristicStrategy::new())),
    ]
    .into_iter()
    .map(|seat| seat.with_invoker(invoker.clone()))
    .collect()
}

fn play(config: &GameConfig, seed: u64, invoker: &Invoker) -> Victory {
    let mut game = Game::new(4, config, seed).expect("Failed to deal round");
    let mut seats = seats(seed, invoker);
    GameLoop::with_config(&mut game, config)
        .run_round(&mut seats)
        .expect("Round should complete successfully")
}

/// Benchmark: single round, inline and budgeted strategy calls
fn bench_round(c: &mut Criterion) {
    let config = GameConfig::default();
    let runtime = Runtime::new().expect("Failed to create tokio runtime");
    let budgeted = Invoker::new(
        Some(runtime.handle().clone()),
        Some(Duration::from_millis(250)),
    );

    let seed = 42u64;
    {
        let victory = play(&config, seed, &Invoker::Inline);
        println!("\nWarmup round (seed {seed}):");
        println!("  Turns: {}", victory.turns);
        println!("  Remixes: {}", victory.remixes);
        println!("  Points: {}", victory.round_points);
    }

    let mut group = c.benchmark_group("round_execution");
    group.bench_with_input(BenchmarkId::new("inline", seed), &seed, |b, &seed| {
        b.iter(|| play(&config, black_box(seed), &Invoker::Inline));
    });
    group.sample_size(20);
    group.bench_with_input(BenchmarkId::new("budgeted", seed), &seed, |b, &seed| {
        b.iter(|| play(&config, black_box(seed), &budgeted));
    });
    group.finish();
}

/// Benchmark: full parallel batch through the driver
fn bench_simulation(c: &mut Criterion) {
    let roster = RosterLoader::parse("a,random\nb,random\nc,heuristic\nd,zero")
        .expect("Failed to parse roster");
    let rounds = 1000;
    let config = SimulationConfig {
        rounds,
        seed: Some(42),
        threads: None,
        game: GameConfig::default(),
    };
    let simulation = Simulation::new(roster, uno_sim::strategy::StrategyRegistry::with_builtins(), config)
        .expect("Failed to configure simulation");

    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));
    group.throughput(Throughput::Elements(rounds as u64));
    group.bench_function(BenchmarkId::new("rounds", rounds), |b| {
        b.iter(|| simulation.run().expect("Simulation should complete"));
    });
    group.finish();
}

criterion_group!(benches, bench_round, bench_simulation);
criterion_main!(benches);
