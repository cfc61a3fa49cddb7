//! Failure vocabulary for the engine.
//!
//! Board rejections are ordinary, recoverable outcomes when the move came
//! from a human source (the round continues and the same side is asked
//! again). The same rejection raised by the bot's own simulated moves is a
//! bug in move enumeration and panics at the call site instead of surfacing
//! here. Cancellation of a move source is not an error at all; it travels as
//! `PlyOutcome::Cancelled`.

/// Errors raised by [`crate::board::Board::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is occupied or out of range")]
    InvalidMove { row: usize, col: usize },
}

/// Errors raised by [`crate::engine::TurnEngine::advance_ply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The round reached a terminal state and nobody called `reset_round`.
    /// Always a caller sequencing bug.
    #[error("round is already finished; reset before advancing")]
    GameAlreadyFinished,

    /// The current move source produced a move the board rejected.
    #[error(transparent)]
    Board(#[from] BoardError),
}
