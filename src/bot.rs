//! # Bot Move Selection
//!
//! Exhaustive minimax over board snapshots, strong enough that the bot never
//! loses a round. Selection runs in three tiers:
//!
//! 1. **Immediate win**: take the first empty cell that completes a line for
//!    the bot.
//! 2. **Immediate block**: take the first empty cell where the opponent
//!    would complete a line.
//! 3. **Full search**: score every remaining candidate with minimax and keep
//!    the best one.
//!
//! The shortcut tiers decide nothing the full search would not; they skip
//! the tree walk in the common case and pick the same cell, because the
//! depth discount below also prefers the fastest win and the latest loss.
//!
//! Terminal scores are `+10 - depth` for a bot win and `-10 + depth` for an
//! opponent win, with depth counted in plies from the search root, and `0`
//! for a draw. Ties between root candidates resolve to the first cell in
//! row-major order, so the bot's play is fully reproducible.
//!
//! Root candidates are independent and are evaluated in parallel on a thread
//! pool owned by the searcher. Order-preserving collection keeps the
//! tie-break identical to a sequential scan.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::board::{Board, Mark, Move};

/// Magnitude of a decided-game score before the depth discount.
const WIN_SCORE: i32 = 10;

/// Minimax-based move selector for the bot side.
///
/// Holds no game state; every call works on the snapshot it is given, so a
/// single searcher can serve any number of rounds.
pub struct BotSearch {
    /// The rayon thread pool for parallel root evaluation.
    pool: ThreadPool,
}

impl BotSearch {
    /// Creates a new searcher.
    ///
    /// # Arguments
    /// * `num_threads` - Pool width for root evaluation. If 0, rayon picks
    ///   its default (one thread per CPU).
    pub fn new(num_threads: usize) -> Self {
        let pool_builder = ThreadPoolBuilder::new();
        let pool = if num_threads > 0 {
            pool_builder.num_threads(num_threads).build()
        } else {
            pool_builder.build()
        }
        .expect("failed to build bot search thread pool");
        BotSearch { pool }
    }

    /// Selects the strongest move for `bot_mark` on `board`.
    ///
    /// # Panics
    /// Panics when the board has no empty cell. Callers must check for a
    /// terminal position before asking for a move; a full board here is a
    /// sequencing bug, not a board condition.
    pub fn select_move(&self, board: Board, bot_mark: Mark) -> Move {
        let candidates: Vec<Move> = board.empty_cells().collect();
        assert!(
            !candidates.is_empty(),
            "select_move called on a full board"
        );

        if let Some(mv) = Self::winning_cell(&board, bot_mark, &candidates) {
            debug!(%mv, "taking the immediate win");
            return mv;
        }
        if let Some(mv) = Self::winning_cell(&board, bot_mark.opponent(), &candidates) {
            debug!(%mv, "blocking the opponent's win");
            return mv;
        }

        let scores: Vec<i32> = self.pool.install(|| {
            candidates
                .par_iter()
                .map(|&mv| {
                    let mut child = board;
                    child
                        .apply_move(mv.row, mv.col, bot_mark)
                        .expect("candidate cell was enumerated as empty");
                    Self::minimax(child, bot_mark, 0, false)
                })
                .collect()
        });

        // Strict comparison keeps the first maximal candidate, which is the
        // earliest cell in row-major order.
        let mut best = candidates[0];
        let mut best_score = scores[0];
        for (&mv, &score) in candidates.iter().zip(&scores).skip(1) {
            if score > best_score {
                best = mv;
                best_score = score;
            }
        }
        debug!(%best, best_score, "search finished");
        best
    }

    /// First candidate cell (row-major) where placing `mark` completes a
    /// line, if any.
    fn winning_cell(board: &Board, mark: Mark, candidates: &[Move]) -> Option<Move> {
        candidates.iter().copied().find(|mv| {
            let mut probe = *board;
            probe
                .apply_move(mv.row, mv.col, mark)
                .expect("candidate cell was enumerated as empty")
        })
    }

    /// Scores `board` from the bot's perspective.
    ///
    /// `depth` counts plies from the search root; `maximizing` says whose
    /// ply it is. Recursion always terminates: every level fills one cell.
    fn minimax(board: Board, bot_mark: Mark, depth: i32, maximizing: bool) -> i32 {
        if board.is_winner(bot_mark) {
            return WIN_SCORE - depth;
        }
        if board.is_winner(bot_mark.opponent()) {
            return depth - WIN_SCORE;
        }
        if board.is_full() {
            return 0;
        }

        let to_play = if maximizing { bot_mark } else { bot_mark.opponent() };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in board.empty_cells() {
            let mut child = board;
            child
                .apply_move(mv.row, mv.col, to_play)
                .expect("empty cell enumeration yielded an occupied cell");
            let score = Self::minimax(child, bot_mark, depth + 1, !maximizing);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn searcher() -> BotSearch {
        // Two threads keep the suite honest about parallel evaluation
        // without oversubscribing test runners.
        BotSearch::new(2)
    }

    #[test]
    fn test_takes_one_move_win() {
        let board = board_from(["XX.", "OO.", "..."]);
        assert_eq!(searcher().select_move(board, Mark::X), Move::new(0, 2));
    }

    #[test]
    fn test_blocks_imminent_loss() {
        let board = board_from(["OO.", ".X.", "..."]);
        assert_eq!(searcher().select_move(board, Mark::X), Move::new(0, 2));
    }

    #[test]
    fn test_prefers_win_over_block() {
        // Both sides threaten a line; taking the win beats blocking.
        let board = board_from(["XX.", "OO.", "..X"]);
        assert_eq!(searcher().select_move(board, Mark::X), Move::new(0, 2));
    }

    #[test]
    fn test_empty_board_tie_break_is_row_major() {
        // Perfect play draws from every opening cell, so all nine score
        // equal and the first row-major cell must win the tie.
        let bot = searcher();
        assert_eq!(bot.select_move(Board::new(), Mark::X), Move::new(0, 0));
    }

    #[test]
    fn test_defuses_opposite_corner_fork() {
        // X corners with O in the center; any corner reply loses to a fork,
        // only edges hold the draw. The first edge in row-major order wins
        // the tie among them.
        let board = board_from(["X..", ".O.", "..X"]);
        assert_eq!(searcher().select_move(board, Mark::O), Move::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "full board")]
    fn test_full_board_is_a_logic_error() {
        let board = board_from(["XOX", "XOO", "OXX"]);
        searcher().select_move(board, Mark::X);
    }

    /// Plays one round with the bot on `bot_mark` and a seeded random
    /// opponent on the other side. Returns the winner, if any.
    fn play_vs_random(bot: &BotSearch, bot_mark: Mark, rng: &mut Xoshiro256PlusPlus) -> Option<Mark> {
        let mut board = Board::new();
        let mut turn = Mark::X;
        loop {
            let mv = if turn == bot_mark {
                bot.select_move(board, bot_mark)
            } else {
                let open: Vec<Move> = board.empty_cells().collect();
                open[rng.gen_range(0..open.len())]
            };
            let won = board.apply_move(mv.row, mv.col, turn).unwrap();
            if won {
                return Some(turn);
            }
            if board.is_full() {
                return None;
            }
            turn = turn.opponent();
        }
    }

    #[test]
    fn test_never_loses_to_random_play() {
        let bot = searcher();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x7_1C7AC703);
        for episode in 0..40 {
            let bot_mark = if episode % 2 == 0 { Mark::X } else { Mark::O };
            let winner = play_vs_random(&bot, bot_mark, &mut rng);
            assert_ne!(
                winner,
                Some(bot_mark.opponent()),
                "bot lost episode {episode} as {bot_mark}"
            );
        }
    }

    #[test]
    fn test_self_play_draws() {
        let bot = searcher();
        let mut board = Board::new();
        let mut turn = Mark::X;
        loop {
            let mv = bot.select_move(board, turn);
            let won = board.apply_move(mv.row, mv.col, turn).unwrap();
            assert!(!won, "self-play must not produce a winner, got {turn}");
            if board.is_full() {
                break;
            }
            turn = turn.opponent();
        }
    }
}
