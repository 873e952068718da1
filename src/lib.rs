#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const GORSTAN_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod action;
pub mod command;
pub mod game;
pub mod loader;
pub mod objective;
pub mod repl;
pub mod save;
pub mod state;
pub mod style;
pub mod trap;
pub mod world;

// Re-exports for convenience
pub use action::{Action, reduce};
pub use game::{Game, MoveResult};
pub use loader::load_world;
pub use objective::{MarkOutcome, Objective, ObjectiveBook};
pub use repl::run_repl;
pub use state::{FlagValue, GameState};
pub use trap::{EntryOutcome, Trap, TrapRegistry};
pub use world::{RoomDef, WorldDef};
