//! # Game Loop
//!
//! The background thread that plays rounds forever: advance one ply, and on
//! a terminal state record the standings, tell the observers, reset the
//! board, go again. A short sleep between plies keeps the loop cooperative;
//! it is pacing, not correctness.
//!
//! ## Shutdown
//! Teardown always runs stop flag first, rendezvous cancellation second,
//! join last. The flag alone cannot free a thread blocked on a human move,
//! and joining before cancelling would wait on a request nobody will ever
//! satisfy. [`GameLoop::stop`] encodes that order and also runs from `Drop`,
//! so the driving thread is never left detached.
//!
//! ## Shared state
//! Score, round counter and last outcome live together under one mutex. A
//! display thread reading [`Standings`] therefore never sees a round counter
//! ahead of the score it belongs to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::board::{Board, Mark};
use crate::engine::{PlyOutcome, RoundOutcome, TurnEngine};
use crate::error::{BoardError, EngineError};
use crate::rendezvous::MoveRendezvous;

/// Pause between plies of the driving loop.
const DEFAULT_PLY_INTERVAL: Duration = Duration::from_millis(100);

/// Cumulative win counters, one per side. Draws touch neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub x: u32,
    pub o: u32,
}

impl Score {
    fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win(Mark::X) => self.x += 1,
            RoundOutcome::Win(Mark::O) => self.o += 1,
            RoundOutcome::Draw => {}
        }
    }
}

/// Everything a display thread wants in one consistent read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Standings {
    pub score: Score,
    /// Completed rounds since startup.
    pub round: u64,
    pub last_outcome: Option<RoundOutcome>,
}

/// Shared standings cell. Writes happen on the driving thread once per
/// round; reads may come from anywhere at any time.
#[derive(Debug, Default)]
pub struct Scoreboard {
    inner: Mutex<Standings>,
}

impl Scoreboard {
    /// A consistent copy of the current standings.
    pub fn standings(&self) -> Standings {
        *self.inner.lock()
    }

    fn record_round(&self, outcome: RoundOutcome) -> Standings {
        let mut standings = self.inner.lock();
        standings.score.record(outcome);
        standings.round += 1;
        standings.last_outcome = Some(outcome);
        *standings
    }
}

/// Snapshot handed to observers when a round completes.
#[derive(Debug, Clone, Copy)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub score: Score,
    pub round: u64,
    /// Final position, captured before the board resets.
    pub board: Board,
}

/// Receives round reports on the driving thread, before the board resets.
/// Implementations must return promptly; the next round waits on them.
pub trait RoundObserver: Send {
    fn round_finished(&self, report: &RoundReport);
}

/// Observer that forwards reports over a channel, for UI threads that want
/// to consume them at their own pace. Send failures mean the receiver is
/// gone and are ignored.
pub struct ChannelObserver {
    tx: mpsc::Sender<RoundReport>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<RoundReport>) -> Self {
        Self { tx }
    }
}

impl RoundObserver for ChannelObserver {
    fn round_finished(&self, report: &RoundReport) {
        self.tx.send(*report).ok();
    }
}

/// Owns the driving thread and everything shared with it.
pub struct GameLoop {
    handle: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
    /// Cancelled during teardown so a blocked human request cannot outlive
    /// the loop. `None` for bot-only line-ups.
    rendezvous: Option<Arc<MoveRendezvous>>,
    scoreboard: Arc<Scoreboard>,
}

impl GameLoop {
    /// Spawns the driving thread with the default ply interval.
    ///
    /// `rendezvous` must be the handle the engine's human side blocks on,
    /// when there is one; it is what `stop` cancels.
    pub fn start(
        engine: TurnEngine,
        rendezvous: Option<Arc<MoveRendezvous>>,
        observers: Vec<Box<dyn RoundObserver>>,
    ) -> Self {
        Self::with_interval(engine, rendezvous, observers, DEFAULT_PLY_INTERVAL)
    }

    /// Like [`GameLoop::start`] with an explicit pause between plies. Tests
    /// run with a near-zero interval.
    pub fn with_interval(
        engine: TurnEngine,
        rendezvous: Option<Arc<MoveRendezvous>>,
        observers: Vec<Box<dyn RoundObserver>>,
        ply_interval: Duration,
    ) -> Self {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let scoreboard = Arc::new(Scoreboard::default());

        let handle = {
            let stop_flag = Arc::clone(&stop_flag);
            let scoreboard = Arc::clone(&scoreboard);
            thread::Builder::new()
                .name("game-loop".to_string())
                .spawn(move || {
                    Self::run(engine, observers, stop_flag, scoreboard, ply_interval);
                })
                .expect("failed to spawn game loop thread")
        };

        Self {
            handle: Some(handle),
            stop_flag,
            rendezvous,
            scoreboard,
        }
    }

    /// The shared standings cell, for display threads.
    pub fn scoreboard(&self) -> Arc<Scoreboard> {
        Arc::clone(&self.scoreboard)
    }

    /// Convenience read of the current standings.
    pub fn standings(&self) -> Standings {
        self.scoreboard.standings()
    }

    /// Stops the loop: raises the stop flag, cancels the rendezvous to free
    /// a blocked ply, joins the driving thread. Idempotent.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(rendezvous) = &self.rendezvous {
            rendezvous.cancel();
        }
        if let Some(handle) = self.handle.take() {
            debug!("waiting for the game loop thread");
            let _ = handle.join();
        }
    }

    fn run(
        mut engine: TurnEngine,
        observers: Vec<Box<dyn RoundObserver>>,
        stop_flag: Arc<AtomicBool>,
        scoreboard: Arc<Scoreboard>,
        ply_interval: Duration,
    ) {
        debug!("game loop running");
        while !stop_flag.load(Ordering::Relaxed) {
            match engine.advance_ply() {
                Ok(PlyOutcome::Continue) => {}
                Ok(PlyOutcome::RoundFinished(outcome)) => {
                    let board = engine.board();
                    let standings = scoreboard.record_round(outcome);
                    let report = RoundReport {
                        outcome,
                        score: standings.score,
                        round: standings.round,
                        board,
                    };
                    info!(round = report.round, ?outcome, "round finished");
                    for observer in &observers {
                        observer.round_finished(&report);
                    }
                    engine.reset_round();
                }
                Ok(PlyOutcome::Cancelled) => {
                    debug!("move source cancelled, leaving the loop");
                    break;
                }
                Err(EngineError::Board(BoardError::InvalidMove { row, col })) => {
                    // Recoverable: the same side keeps the turn and is
                    // simply asked again on the next iteration.
                    warn!(row, col, "invalid move rejected, re-asking");
                }
                Err(EngineError::GameAlreadyFinished) => {
                    error!("ply advanced on a finished round; halting the loop");
                    break;
                }
            }
            thread::sleep(ply_interval);
        }
        debug!("game loop stopped");
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
