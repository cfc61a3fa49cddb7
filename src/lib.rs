//! # Tic-tac-toe duel engine
//!
//! A turn-based tic-tac-toe engine that pits a human against an unbeatable
//! minimax bot and keeps score across repeated rounds.
//!
//! The pieces, leaves first:
//!
//! - [`board`]: the fixed 3x3 grid with move validation and win detection.
//! - [`bot`]: minimax move selection over board snapshots, with
//!   immediate-win and immediate-block shortcuts.
//! - [`rendezvous`]: the blocking handoff that lets the game thread wait on
//!   a human move supplied from another thread.
//! - [`players`]: bindings from marks to move sources (bot or human).
//! - [`engine`]: the one-ply-at-a-time round state machine.
//! - [`game_loop`]: the background thread driving rounds to completion,
//!   with shared standings and round-end notification.
//!
//! The library performs no I/O of its own; the `play` binary wires a
//! console front end around it.

pub mod board;
pub mod bot;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod players;
pub mod rendezvous;

pub use board::{Board, Cell, Grid, Mark, Move, BOARD_SIZE};
pub use bot::BotSearch;
pub use engine::{PlyOutcome, RoundOutcome, TurnEngine};
pub use error::{BoardError, EngineError};
pub use game_loop::{
    ChannelObserver, GameLoop, RoundObserver, RoundReport, Score, Scoreboard, Standings,
};
pub use players::{PlayerKind, Roster};
pub use rendezvous::MoveRendezvous;
