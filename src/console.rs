//! Console front end for the duel binary.
//!
//! Runs on the process's main thread and acts as the human move source: it
//! polls the rendezvous for a published board, renders it with the open
//! cells numbered 1-9, and feeds key presses back as moves. Round reports
//! arrive over a channel from the driving thread and are printed between
//! prompts.
//!
//! The terminal sits in raw mode while the loop runs, so every line is
//! written with an explicit carriage return.

use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use tictactoe::{
    Board, Cell, Mark, Move, MoveRendezvous, RoundOutcome, RoundReport, Score, Scoreboard,
    BOARD_SIZE,
};

/// Maps a digit key to its cell: `1` is the top-left corner, `9` the
/// bottom-right, row-major like the rendered grid.
pub fn key_to_move(code: KeyCode) -> Option<Move> {
    let KeyCode::Char(ch) = code else { return None };
    let digit = ch.to_digit(10)? as usize;
    if !(1..=9).contains(&digit) {
        return None;
    }
    let index = digit - 1;
    Some(Move::new(index / BOARD_SIZE, index % BOARD_SIZE))
}

fn cell_digit(mv: Move) -> usize {
    mv.row * BOARD_SIZE + mv.col + 1
}

fn paint_mark(mark: Mark) -> String {
    match mark {
        Mark::X => "X".red().bold().to_string(),
        Mark::O => "O".blue().bold().to_string(),
    }
}

fn paint_cell(cell: Cell, digit: usize) -> String {
    match cell {
        Cell::X => "X".red().bold().to_string(),
        Cell::O => "O".blue().bold().to_string(),
        Cell::Empty => digit.to_string().dimmed().to_string(),
    }
}

/// Renders the grid with marks colored and open cells showing the digit
/// that selects them.
pub fn render_board(board: &Board) -> String {
    let cells = board.cells();
    let mut lines = Vec::with_capacity(5);
    for (r, row) in cells.iter().enumerate() {
        if r > 0 {
            lines.push("---+---+---".dimmed().to_string());
        }
        let rendered: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, &cell)| paint_cell(cell, r * BOARD_SIZE + c + 1))
            .collect();
        lines.push(format!(" {} | {} | {} ", rendered[0], rendered[1], rendered[2]));
    }
    lines.join("\n")
}

fn score_line(score: Score, round_label: u64, human_mark: Option<Mark>) -> String {
    match human_mark {
        Some(Mark::X) => format!("You {} : {} Bot   round {round_label}", score.x, score.o),
        Some(Mark::O) => format!("You {} : {} Bot   round {round_label}", score.o, score.x),
        None => format!("X {} : {} O   round {round_label}", score.x, score.o),
    }
}

/// Renders a completed round: final position, headline, standings. With
/// `human_mark` set the headline speaks to the player; without it (bot-only
/// mode) it names the winning mark.
pub fn render_report(report: &RoundReport, human_mark: Option<Mark>) -> String {
    let headline = match report.outcome {
        RoundOutcome::Draw => "Round drawn.".yellow().to_string(),
        RoundOutcome::Win(mark) => match human_mark {
            Some(human) if mark == human => "You win the round!".green().bold().to_string(),
            Some(_) => "The bot wins the round.".red().bold().to_string(),
            None => format!("{} wins the round.", paint_mark(mark)),
        },
    };
    format!(
        "{}\n{}\n{}",
        render_board(&report.board),
        headline,
        score_line(report.score, report.round, human_mark)
    )
}

/// Writes `text` line by line with explicit carriage returns, as required
/// under raw mode. An empty string prints one blank line.
fn print_raw(text: &str) {
    let mut out = io::stdout();
    if text.is_empty() {
        let _ = write!(out, "\r\n");
    }
    for line in text.lines() {
        let _ = write!(out, "{line}\r\n");
    }
    let _ = out.flush();
}

/// The interactive console session: board prompts out, key presses in.
pub struct Console {
    rendezvous: Arc<MoveRendezvous>,
    reports: Receiver<RoundReport>,
    scoreboard: Arc<Scoreboard>,
    human_mark: Mark,
    /// Board most recently rendered as a prompt; used both to avoid
    /// re-printing an unchanged prompt and to pre-validate key presses.
    last_prompt: Option<Board>,
}

impl Console {
    pub fn new(
        rendezvous: Arc<MoveRendezvous>,
        reports: Receiver<RoundReport>,
        scoreboard: Arc<Scoreboard>,
        human_mark: Mark,
    ) -> Self {
        Self {
            rendezvous,
            reports,
            scoreboard,
            human_mark,
            last_prompt: None,
        }
    }

    /// Runs until the player quits with `q` or Esc. Raw mode is restored on
    /// both exit paths.
    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let result = self.event_loop();
        let _ = disable_raw_mode();
        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        print_raw(&format!(
            "You play {}. Digits 1-9 place your mark, q or Esc quits.",
            paint_mark(self.human_mark)
        ));
        loop {
            while let Ok(report) = self.reports.try_recv() {
                print_raw("");
                print_raw(&render_report(&report, Some(self.human_mark)));
                self.last_prompt = None;
            }

            if let Some(board) = self.rendezvous.pending_prompt() {
                if self.last_prompt != Some(board) {
                    let standings = self.scoreboard.standings();
                    print_raw("");
                    print_raw(&score_line(
                        standings.score,
                        standings.round + 1,
                        Some(self.human_mark),
                    ));
                    print_raw(&render_board(&board));
                    print_raw(&format!("{} to move.", paint_mark(self.human_mark)));
                    self.last_prompt = Some(board);
                }
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                        code => self.handle_move_key(code),
                    }
                }
            }
        }
    }

    fn handle_move_key(&mut self, code: KeyCode) {
        let Some(mv) = key_to_move(code) else { return };
        // Pre-check against the board we showed; the engine re-validates
        // anyway, but this keeps the feedback immediate.
        match self.last_prompt {
            Some(board) if !board.is_valid_move(mv.row, mv.col) => {
                print_raw(&format!("Cell {} is taken, pick another.", cell_digit(mv)));
            }
            _ => self.rendezvous.supply_move(mv),
        }
    }
}
