//! A seat at the table: a named strategy plus the rules for consulting it
//!
//! With a time budget, every call runs on tokio's blocking pool and is
//! abandoned once the budget elapses. The budget is measured from the moment
//! the call starts running, not from when it was queued. An abandoned call
//! keeps the strategy instance, so the seat forfeits its strategy for the
//! rest of the round and is answered with "no play" from then on.
//!
//! An abandoned call may also keep its blocking thread forever. A
//! [`Quarantine`] shared across a batch remembers which roster seats have
//! timed out, and later rounds answer for them without spawning anything.

use crate::core::{Card, Color};
use crate::game::GameState;
use crate::strategy::{most_held_color, Strategy};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// How strategy calls are executed
#[derive(Debug, Clone, Default)]
pub enum Invoker {
    /// Call the strategy directly on the round's thread
    #[default]
    Inline,
    /// Run each call on the runtime's blocking pool, bounded by `budget`
    Budgeted { handle: Handle, budget: Duration },
}

impl Invoker {
    pub fn new(handle: Option<Handle>, budget: Option<Duration>) -> Self {
        match (handle, budget) {
            (Some(handle), Some(budget)) => Invoker::Budgeted { handle, budget },
            _ => Invoker::Inline,
        }
    }
}

/// Roster seats whose strategy timed out at some point during a batch
///
/// Cloning shares the same set.
#[derive(Debug, Clone, Default)]
pub struct Quarantine {
    seats: Arc<Mutex<FxHashSet<usize>>>,
}

impl Quarantine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashSet<usize>> {
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, seat: usize) -> bool {
        self.lock().contains(&seat)
    }

    pub fn insert(&self, seat: usize) {
        self.lock().insert(seat);
    }
}

/// Result of consulting a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Answered(T),
    /// The call overran its budget; the strategy is forfeited
    TimedOut,
    /// The strategy panicked; the strategy is forfeited
    Crashed,
    /// The strategy was forfeited earlier in the round, or quarantined in
    /// an earlier round
    Forfeited,
}

/// Contract violations recorded against a seat during a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatFlags {
    pub out_of_range: u32,
    pub illegal_plays: u32,
    pub timeouts: u32,
    pub crashes: u32,
}

impl SeatFlags {
    pub fn is_clean(&self) -> bool {
        *self == SeatFlags::default()
    }

    pub fn merge(&mut self, other: &SeatFlags) {
        self.out_of_range += other.out_of_range;
        self.illegal_plays += other.illegal_plays;
        self.timeouts += other.timeouts;
        self.crashes += other.crashes;
    }
}

pub struct Seat {
    name: String,
    strategy: Option<Box<dyn Strategy>>,
    invoker: Invoker,
    quarantine: Option<(Quarantine, usize)>,
    pub flags: SeatFlags,
}

impl Seat {
    pub fn new(name: impl Into<String>, strategy: Box<dyn Strategy>) -> Self {
        Seat {
            name: name.into(),
            strategy: Some(strategy),
            invoker: Invoker::Inline,
            quarantine: None,
            flags: SeatFlags::default(),
        }
    }

    pub fn with_invoker(mut self, invoker: Invoker) -> Self {
        self.invoker = invoker;
        self
    }

    /// Share `quarantine` with the other rounds of a batch, under roster
    /// index `seat`
    pub fn with_quarantine(mut self, quarantine: Quarantine, seat: usize) -> Self {
        self.quarantine = Some((quarantine, seat));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the strategy was lost to a timeout or panic
    pub fn is_forfeited(&self) -> bool {
        self.strategy.is_none()
    }

    /// Ask the strategy for a play (raw answer, not yet validated)
    pub fn play(
        &mut self,
        hand: &[Card],
        up_card: Card,
        called_color: Option<Color>,
        state: GameState,
    ) -> Outcome<Option<usize>> {
        let hand = hand.to_vec();
        self.invoke(move |strategy| strategy.play(&hand, up_card, called_color, &state))
    }

    /// Ask the strategy for a color call, falling back to the most-held
    /// color if it cannot answer
    pub fn call_color(&mut self, hand: &[Card]) -> (Color, Outcome<Color>) {
        let owned = hand.to_vec();
        let outcome = self.invoke(move |strategy| strategy.call_color(&owned));
        match outcome {
            Outcome::Answered(color) => (color, outcome),
            _ => (most_held_color(hand), outcome),
        }
    }

    fn invoke<T, F>(&mut self, call: F) -> Outcome<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut dyn Strategy) -> T + Send + 'static,
    {
        let Some(mut strategy) = self.strategy.take() else {
            return Outcome::Forfeited;
        };
        if let Some((quarantine, seat)) = &self.quarantine {
            if quarantine.contains(*seat) {
                return Outcome::Forfeited;
            }
        }

        match &self.invoker {
            Invoker::Inline => {
                let answer = call(strategy.as_mut());
                self.strategy = Some(strategy);
                Outcome::Answered(answer)
            }
            Invoker::Budgeted { handle, budget } => {
                let budget = *budget;
                let (started_tx, started_rx) = oneshot::channel();
                let task = handle.spawn_blocking(move || {
                    let _ = started_tx.send(());
                    let answer = call(strategy.as_mut());
                    (strategy, answer)
                });
                let result = handle.block_on(async {
                    // Time spent waiting for a free blocking thread is not charged
                    let _ = started_rx.await;
                    tokio::time::timeout(budget, task).await
                });
                match result {
                    Ok(Ok((strategy, answer))) => {
                        self.strategy = Some(strategy);
                        Outcome::Answered(answer)
                    }
                    Ok(Err(_join_error)) => {
                        self.flags.crashes += 1;
                        Outcome::Crashed
                    }
                    Err(_elapsed) => {
                        self.flags.timeouts += 1;
                        if let Some((quarantine, seat)) = &self.quarantine {
                            quarantine.insert(*seat);
                        }
                        Outcome::TimedOut
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seat")
            .field("name", &self.name)
            .field("forfeited", &self.is_forfeited())
            .field("flags", &self.flags)
            .finish()
    }
}
