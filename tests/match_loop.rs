//! Cross-thread behavior of the full engine: the driving loop, the
//! rendezvous handoff, standings bookkeeping, and shutdown ordering.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tictactoe::{
    ChannelObserver, GameLoop, Mark, MoveRendezvous, Roster, RoundOutcome, Score, TurnEngine,
};

/// Near-zero pacing so the suite runs at full speed.
const FAST: Duration = Duration::from_millis(1);
/// Generous bound for anything that crosses threads.
const WAIT: Duration = Duration::from_secs(30);

fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT;
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn bot_vs_bot_rounds_are_all_draws() {
    let (tx, rx) = mpsc::channel();
    let mut game_loop = GameLoop::with_interval(
        TurnEngine::new(Roster::bot_vs_bot(1)),
        None,
        vec![Box::new(ChannelObserver::new(tx))],
        FAST,
    );

    for expected_round in 1..=3u64 {
        let report = rx.recv_timeout(WAIT).expect("round report");
        assert_eq!(report.round, expected_round);
        assert_eq!(report.outcome, RoundOutcome::Draw);
        assert_eq!(report.score, Score::default());
        assert!(report.board.is_full(), "report must carry the final board");
        assert!(!report.board.is_winner(Mark::X));
        assert!(!report.board.is_winner(Mark::O));
    }

    game_loop.stop();
    let standings = game_loop.standings();
    assert!(standings.round >= 3);
    assert_eq!(standings.score, Score::default());
    assert_eq!(standings.last_outcome, Some(RoundOutcome::Draw));
}

#[test]
fn stop_unblocks_a_round_waiting_on_the_human() {
    let rendezvous = Arc::new(MoveRendezvous::new());
    let roster = Roster::human_vs_bot(Mark::X, Arc::clone(&rendezvous), 1);
    let mut game_loop = GameLoop::with_interval(
        TurnEngine::new(roster),
        Some(Arc::clone(&rendezvous)),
        Vec::new(),
        FAST,
    );

    // The loop blocks on the human's opening move; stop must still join.
    wait_until("the opening prompt", || rendezvous.pending_prompt().is_some());
    game_loop.stop();

    assert_eq!(game_loop.standings().round, 0);
    assert!(rendezvous.is_cancelled());
}

#[test]
fn repeated_start_stop_cycles_do_not_deadlock() {
    for cycle in 0..3 {
        // Bot opens as X, then the loop blocks on the human O.
        let rendezvous = Arc::new(MoveRendezvous::new());
        let roster = Roster::human_vs_bot(Mark::O, Arc::clone(&rendezvous), 1);
        let mut game_loop = GameLoop::with_interval(
            TurnEngine::new(roster),
            Some(Arc::clone(&rendezvous)),
            Vec::new(),
            FAST,
        );

        wait_until("a human prompt", || rendezvous.pending_prompt().is_some());
        let board = rendezvous.pending_prompt().unwrap();
        assert_eq!(
            board.empty_cells().count(),
            8,
            "cycle {cycle}: the bot should have opened before prompting"
        );
        game_loop.stop();
    }
}

#[test]
fn human_round_completes_through_prompt_and_supply() {
    let rendezvous = Arc::new(MoveRendezvous::new());
    let (tx, rx) = mpsc::channel();
    let roster = Roster::human_vs_bot(Mark::X, Arc::clone(&rendezvous), 1);
    let mut game_loop = GameLoop::with_interval(
        TurnEngine::new(roster),
        Some(Arc::clone(&rendezvous)),
        vec![Box::new(ChannelObserver::new(tx))],
        FAST,
    );

    // Answer each prompt with its first open cell until the round ends.
    // Each board is answered once; the next prompt always differs because
    // the supplied move is valid for the board it answers.
    let deadline = Instant::now() + WAIT;
    let mut answered = None;
    let report = loop {
        assert!(Instant::now() < deadline, "round never finished");
        if let Ok(report) = rx.try_recv() {
            break report;
        }
        if let Some(board) = rendezvous.pending_prompt() {
            if answered != Some(board) {
                let mv = board.empty_cells().next().expect("prompted on a full board");
                rendezvous.supply_move(mv);
                answered = Some(board);
            }
        }
        thread::sleep(Duration::from_millis(1));
    };
    game_loop.stop();

    // A first-open-cell human cannot beat the bot.
    assert_ne!(report.outcome, RoundOutcome::Win(Mark::X));
    assert_eq!(report.round, 1);
    assert_eq!(report.score.x, 0);
    let standings = game_loop.standings();
    assert!(u64::from(standings.score.x + standings.score.o) <= standings.round);
    assert!(standings.round >= 1);
}
