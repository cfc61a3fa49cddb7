//! # Turn Engine
//!
//! The per-round state machine. One call to [`TurnEngine::advance_ply`]
//! plays exactly one ply: it asks the current side's move source for a move,
//! re-validates it against the board, applies it, and reports whether the
//! round is still open, finished, or aborted by a cancelled source.
//!
//! The engine is the sole owner of the live board. Move sources only ever
//! see copies, and every move - including the bot's - is validated here
//! before it touches the board rather than trusted on arrival.

use tracing::{debug, info, trace, warn};

use crate::board::{Board, Mark};
use crate::error::EngineError;
use crate::players::Roster;

/// The fixed opener of every round.
const FIRST_MOVER: Mark = Mark::X;

/// Result of one completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Win(Mark),
    Draw,
}

/// What one call to [`TurnEngine::advance_ply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyOutcome {
    /// Move applied, round still open, turn passed to the other side.
    Continue,
    /// Move applied and the round reached a terminal state. The board keeps
    /// its final position until `reset_round`.
    RoundFinished(RoundOutcome),
    /// The current side's move source shut down; the round cannot proceed.
    Cancelled,
}

/// Drives a round of play over an owned board and a fixed pair of move
/// sources.
pub struct TurnEngine {
    board: Board,
    roster: Roster,
    turn: Mark,
    finished: bool,
}

impl TurnEngine {
    pub fn new(roster: Roster) -> Self {
        Self {
            board: Board::new(),
            roster,
            turn: FIRST_MOVER,
            finished: false,
        }
    }

    /// Snapshot of the current board.
    pub fn board(&self) -> Board {
        self.board
    }

    /// The side that moves next.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Plays one ply.
    ///
    /// Fails with [`EngineError::GameAlreadyFinished`] when called on a
    /// terminal round; the caller must `reset_round` first. A move rejected
    /// by the board fails with [`EngineError::Board`] and leaves the turn
    /// with the same side, so the source is simply asked again.
    pub fn advance_ply(&mut self) -> Result<PlyOutcome, EngineError> {
        if self.finished {
            warn!("advance requested on a finished round");
            return Err(EngineError::GameAlreadyFinished);
        }

        let mark = self.turn;
        trace!(%mark, "asking for a move");
        let Some(mv) = self.roster.source(mark).next_move(self.board, mark) else {
            debug!(%mark, "move source cancelled, aborting the round");
            return Ok(PlyOutcome::Cancelled);
        };

        let won = match self.board.apply_move(mv.row, mv.col, mark) {
            Ok(won) => won,
            Err(err) => {
                warn!(%mark, %mv, "move rejected: {err}");
                return Err(err.into());
            }
        };
        trace!(%mark, %mv, "move applied");

        if won {
            info!(%mark, "round won");
            self.finished = true;
            return Ok(PlyOutcome::RoundFinished(RoundOutcome::Win(mark)));
        }
        if self.board.is_full() {
            info!("board full, round drawn");
            self.finished = true;
            return Ok(PlyOutcome::RoundFinished(RoundOutcome::Draw));
        }

        self.turn = mark.opponent();
        Ok(PlyOutcome::Continue)
    }

    /// Starts a fresh round: clears the board, hands the opening move back
    /// to `X`. Cumulative score lives with the caller and is untouched.
    pub fn reset_round(&mut self) {
        debug!("resetting round");
        self.board.reset();
        self.turn = FIRST_MOVER;
        self.finished = false;
    }
}
