//! Round state, turn structure and the strategy-facing view

pub mod game_loop;
pub mod logger;
pub mod seat;
pub mod state;
pub mod view;

pub use game_loop::{GameLoop, Victory};
pub use logger::{GameLogger, LogCategory, LogEntry, OutputMode, VerbosityLevel};
pub use seat::{Invoker, Outcome, Quarantine, Seat, SeatFlags};
pub use state::{Arrangement, Direction, Game};
pub use view::GameState;
