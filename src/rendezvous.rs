//! # Move Rendezvous
//!
//! Single-slot blocking handoff between one move producer (a keyboard
//! thread, a test script) and one consumer (the engine's driving thread).
//!
//! The consumer publishes the current board and suspends in
//! [`MoveRendezvous::request_move`] until the producer supplies a move or
//! the rendezvous is cancelled. Supply never blocks: a move posted with no
//! consumer waiting is buffered for the next request, and a second supply
//! before consumption overwrites the first (latest wins, deliberately not a
//! queue). Cancellation is sticky: it wakes any waiting consumer and makes
//! every later request return immediately, modeling permanent shutdown of
//! the input source.
//!
//! Teardown safety rests on that stickiness. The owning loop cancels before
//! joining its thread, so a consumer blocked here can never deadlock
//! shutdown.

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::board::{Board, Move};

/// Slot contents guarded by the mutex.
#[derive(Debug, Default)]
struct Slot {
    /// Move waiting to be consumed, if any. At most one; later supplies
    /// overwrite it.
    pending: Option<Move>,
    /// Board published by a blocked consumer, cleared once the request
    /// finishes.
    prompt: Option<Board>,
    /// Terminal state; never cleared.
    cancelled: bool,
}

/// Blocking single-value exchange between an input thread and the game
/// thread. All methods take `&self`; share it behind an [`std::sync::Arc`].
#[derive(Debug, Default)]
pub struct MoveRendezvous {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl MoveRendezvous {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumer side. Publishes `board` for the producer to render, then
    /// suspends the calling thread until a move arrives.
    ///
    /// Returns `None` once the rendezvous has been cancelled; after that,
    /// every call returns `None` immediately without blocking.
    pub fn request_move(&self, board: Board) -> Option<Move> {
        let mut slot = self.slot.lock();
        if slot.cancelled {
            trace!("request on a cancelled rendezvous");
            return None;
        }
        slot.prompt = Some(board);
        while slot.pending.is_none() && !slot.cancelled {
            self.ready.wait(&mut slot);
        }
        slot.prompt = None;
        if slot.cancelled {
            debug!("consumer woken by cancellation");
            return None;
        }
        slot.pending.take()
    }

    /// Producer side, never blocks. Stores `mv` and wakes a waiting
    /// consumer; with nobody waiting the move is buffered for the next
    /// request. Ignored after cancellation.
    pub fn supply_move(&self, mv: Move) {
        let mut slot = self.slot.lock();
        if slot.cancelled {
            trace!(%mv, "dropping move supplied after cancellation");
            return;
        }
        if let Some(previous) = slot.pending.replace(mv) {
            trace!(%previous, %mv, "unconsumed move overwritten");
        }
        self.ready.notify_one();
    }

    /// Board snapshot published by a consumer currently blocked in
    /// [`MoveRendezvous::request_move`], if any. Producers poll this to know
    /// when (and what) to render before prompting.
    pub fn pending_prompt(&self) -> Option<Board> {
        self.slot.lock().prompt
    }

    /// Shuts the rendezvous down for good, waking any waiting consumer.
    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        if !slot.cancelled {
            debug!("rendezvous cancelled");
            slot.cancelled = true;
        }
        self.ready.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot.lock().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_buffered_supply_is_consumed() {
        let rendezvous = MoveRendezvous::new();
        rendezvous.supply_move(Move::new(1, 1));
        assert_eq!(rendezvous.request_move(Board::new()), Some(Move::new(1, 1)));
    }

    #[test]
    fn test_later_supply_overwrites_earlier() {
        let rendezvous = MoveRendezvous::new();
        rendezvous.supply_move(Move::new(0, 0));
        rendezvous.supply_move(Move::new(2, 2));
        assert_eq!(rendezvous.request_move(Board::new()), Some(Move::new(2, 2)));
        // The slot holds one value, not a queue.
        rendezvous.supply_move(Move::new(1, 0));
        assert_eq!(rendezvous.request_move(Board::new()), Some(Move::new(1, 0)));
    }

    #[test]
    fn test_supply_wakes_blocked_consumer() {
        let rendezvous = Arc::new(MoveRendezvous::new());
        let consumer = {
            let rendezvous = Arc::clone(&rendezvous);
            thread::spawn(move || rendezvous.request_move(Board::new()))
        };
        // Wait until the consumer has published its prompt, then feed it.
        while rendezvous.pending_prompt().is_none() {
            thread::sleep(Duration::from_millis(1));
        }
        rendezvous.supply_move(Move::new(2, 1));
        assert_eq!(consumer.join().unwrap(), Some(Move::new(2, 1)));
        assert_eq!(rendezvous.pending_prompt(), None);
    }

    #[test]
    fn test_prompt_publishes_board_snapshot() {
        let rendezvous = Arc::new(MoveRendezvous::new());
        let mut board = Board::new();
        board.apply_move(0, 0, crate::board::Mark::X).unwrap();

        let consumer = {
            let rendezvous = Arc::clone(&rendezvous);
            thread::spawn(move || rendezvous.request_move(board))
        };
        let prompt = loop {
            if let Some(prompt) = rendezvous.pending_prompt() {
                break prompt;
            }
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(prompt, board);
        rendezvous.supply_move(Move::new(1, 1));
        consumer.join().unwrap();
    }

    #[test]
    fn test_cancel_wakes_blocked_consumer() {
        let rendezvous = Arc::new(MoveRendezvous::new());
        let consumer = {
            let rendezvous = Arc::clone(&rendezvous);
            thread::spawn(move || rendezvous.request_move(Board::new()))
        };
        while rendezvous.pending_prompt().is_none() {
            thread::sleep(Duration::from_millis(1));
        }
        rendezvous.cancel();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_cancellation_is_sticky() {
        let rendezvous = MoveRendezvous::new();
        rendezvous.cancel();
        assert!(rendezvous.is_cancelled());
        // Requests after cancellation return immediately, forever.
        assert_eq!(rendezvous.request_move(Board::new()), None);
        assert_eq!(rendezvous.request_move(Board::new()), None);
        // Supplies after cancellation are dropped.
        rendezvous.supply_move(Move::new(0, 0));
        assert_eq!(rendezvous.request_move(Board::new()), None);
    }
}
