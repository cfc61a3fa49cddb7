//! # Tic-tac-toe Duel
//!
//! Entry point for the console duel: a human against the unbeatable minimax
//! bot, round after round, with the score kept across rounds. The game loop
//! runs on a background thread; this thread owns the console, feeds human
//! moves through the rendezvous, and prints round reports as they arrive.
//!
//! `--bot-only` replaces the human with a second bot and plays a fixed
//! number of rounds unattended, which is mostly useful for watching the
//! engine soak.

pub mod console;

use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tictactoe::{ChannelObserver, GameLoop, Mark, MoveRendezvous, Roster, TurnEngine};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Play O and let the bot open each round
    #[clap(long, action = clap::ArgAction::SetTrue)]
    bot_first: bool,

    /// Bots on both sides; plays --rounds rounds and exits
    #[clap(long, action = clap::ArgAction::SetTrue)]
    bot_only: bool,

    /// Rounds to play in bot-only mode
    #[clap(short, long, default_value_t = 10)]
    rounds: u64,

    /// Threads for the bot search pool
    #[clap(short, long, default_value_t = num_cpus::get())]
    num_threads: usize,

    /// Milliseconds the driving loop pauses between plies
    #[clap(long, default_value_t = 100)]
    ply_interval_ms: u64,

    /// Log filter applied when RUST_LOG is unset
    #[clap(long, default_value = "warn")]
    log: String,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they interleave with nothing the console draws.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_writer(io::stderr)
        .init();

    if args.bot_only {
        run_bot_duel(&args)
    } else {
        run_human_duel(&args)
    }
}

/// Human against the bot, until the player quits.
fn run_human_duel(args: &Args) -> io::Result<()> {
    let human_mark = if args.bot_first { Mark::O } else { Mark::X };
    let rendezvous = Arc::new(MoveRendezvous::new());
    let (report_tx, report_rx) = mpsc::channel();

    let roster = Roster::human_vs_bot(human_mark, Arc::clone(&rendezvous), args.num_threads);
    let mut game_loop = GameLoop::with_interval(
        TurnEngine::new(roster),
        Some(Arc::clone(&rendezvous)),
        vec![Box::new(ChannelObserver::new(report_tx))],
        Duration::from_millis(args.ply_interval_ms),
    );

    let mut ui = console::Console::new(rendezvous, report_rx, game_loop.scoreboard(), human_mark);
    let result = ui.run();

    game_loop.stop();
    result
}

/// Bot against bot for a fixed number of rounds.
fn run_bot_duel(args: &Args) -> io::Result<()> {
    let (report_tx, report_rx) = mpsc::channel();
    let mut game_loop = GameLoop::with_interval(
        TurnEngine::new(Roster::bot_vs_bot(args.num_threads)),
        None,
        vec![Box::new(ChannelObserver::new(report_tx))],
        Duration::from_millis(args.ply_interval_ms),
    );

    for report in report_rx {
        println!("{}", console::render_report(&report, None));
        println!();
        if report.round >= args.rounds {
            break;
        }
    }
    game_loop.stop();

    let standings = game_loop.standings();
    println!(
        "Final: X {} : {} O after {} rounds",
        standings.score.x, standings.score.o, standings.round
    );
    Ok(())
}
