//! Player bindings: which move source controls which mark.
//!
//! The engine owns the bindings outright. A bot answers synchronously from
//! its search; a human answers through the shared rendezvous, which may
//! block the asking thread until the input side supplies a move.

use std::sync::Arc;

use crate::board::{Board, Mark, Move};
use crate::bot::BotSearch;
use crate::rendezvous::MoveRendezvous;

/// A move source bound to one side of the board.
pub enum PlayerKind {
    /// Optimal bot; never blocks.
    Bot(BotSearch),
    /// Human input fed through the rendezvous by another thread.
    Human(Arc<MoveRendezvous>),
}

impl PlayerKind {
    /// Produces the next move for `mark` on `board`.
    ///
    /// Returns `None` when a human source has been cancelled; bots always
    /// answer.
    pub fn next_move(&self, board: Board, mark: Mark) -> Option<Move> {
        match self {
            PlayerKind::Bot(search) => Some(search.select_move(board, mark)),
            PlayerKind::Human(rendezvous) => rendezvous.request_move(board),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, PlayerKind::Human(_))
    }
}

/// Both sides of a duel. `X` opens every round.
pub struct Roster {
    x: PlayerKind,
    o: PlayerKind,
}

impl Roster {
    pub fn new(x: PlayerKind, o: PlayerKind) -> Self {
        Self { x, o }
    }

    /// A human on `human_mark` against a bot on the other side.
    pub fn human_vs_bot(
        human_mark: Mark,
        rendezvous: Arc<MoveRendezvous>,
        search_threads: usize,
    ) -> Self {
        let human = PlayerKind::Human(rendezvous);
        let bot = PlayerKind::Bot(BotSearch::new(search_threads));
        match human_mark {
            Mark::X => Self::new(human, bot),
            Mark::O => Self::new(bot, human),
        }
    }

    /// Bots on both sides; useful for demos and soak tests.
    pub fn bot_vs_bot(search_threads: usize) -> Self {
        Self::new(
            PlayerKind::Bot(BotSearch::new(search_threads)),
            PlayerKind::Bot(BotSearch::new(search_threads)),
        )
    }

    /// The move source controlling `mark`.
    pub fn source(&self, mark: Mark) -> &PlayerKind {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }
}
