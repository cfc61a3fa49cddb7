//! # Board Model
//!
//! The fixed 3x3 playing grid and the vocabulary types that go with it:
//! which symbol occupies a cell, which symbol a player plays, and a single
//! (row, col) move. The board validates moves, detects wins by enumerating
//! the eight possible lines, and reports fullness for draw detection.
//!
//! The board is plain `Copy` data. The engine owns the live board; everyone
//! else (the bot search, the console) works on snapshots, so speculative
//! play during search can never leak into the real game.

use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// Side length of the grid. The win check below is written out for exactly
/// this size.
pub const BOARD_SIZE: usize = 3;

/// The symbol a player places on the board. `X` always opens a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other side.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Occupancy of a single board cell. Kept separate from [`Mark`]: a mark is
/// always a concrete player, while a cell may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::X => write!(f, "X"),
            Cell::O => write!(f, "O"),
        }
    }
}

/// A (row, col) target on the board, each coordinate expected in `[0, 3)`.
/// Out-of-range values are representable and rejected by validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Move {
    type Err = String;

    /// Parses `"row,col"` or `"row col"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
        let row = parts
            .next()
            .ok_or_else(|| "missing row".to_string())?
            .parse::<usize>()
            .map_err(|e| e.to_string())?;
        let col = parts
            .next()
            .ok_or_else(|| "missing column".to_string())?
            .parse::<usize>()
            .map_err(|e| e.to_string())?;
        if parts.next().is_some() {
            return Err(format!("expected two coordinates in {s:?}"));
        }
        Ok(Move { row, col })
    }
}

/// Snapshot of the grid contents, row-major.
pub type Grid = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// The eight winning lines of the 3x3 grid: three rows, three columns, two
/// diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// The 3x3 playing grid.
///
/// Mutated only through [`Board::apply_move`] and [`Board::reset`]; freely
/// copyable so the search can branch on private snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: Grid,
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the grid contents, for rendering or serialization.
    pub fn cells(&self) -> Grid {
        self.cells
    }

    /// Occupancy of one cell. Panics when the coordinates are out of range,
    /// like any slice index.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// True iff both coordinates are in range and the target cell is empty.
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE && self.cells[row][col].is_empty()
    }

    /// Places `mark` on the target cell.
    ///
    /// Returns whether the placement completed a line for `mark`. Fails with
    /// [`BoardError::InvalidMove`] when the target is occupied or out of
    /// range, leaving the board untouched.
    pub fn apply_move(&mut self, row: usize, col: usize, mark: Mark) -> Result<bool, BoardError> {
        if !self.is_valid_move(row, col) {
            return Err(BoardError::InvalidMove { row, col });
        }
        self.cells[row][col] = mark.into();
        Ok(self.is_winner(mark))
    }

    /// True iff any row, column or diagonal is entirely `mark`.
    pub fn is_winner(&self, mark: Mark) -> bool {
        let target = Cell::from(mark);
        LINES
            .iter()
            .any(|line| line.iter().all(|&(r, c)| self.cells[r][c] == target))
    }

    /// True iff no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        self.cells = Grid::default();
    }

    /// Empty cells in row-major order. The search relies on this order for
    /// its deterministic tie-break.
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Move { row, col }))
            .filter(|mv| self.cells[mv.row][mv.col].is_empty())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f, "---+---+---")?;
            }
            writeln!(f, " {} | {} | {} ", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

/// Builds a board from three strings of `X`, `O` and `.`. Test helper shared
/// by the unit suites of this crate.
#[cfg(test)]
pub(crate) fn board_from(rows: [&str; 3]) -> Board {
    let mut board = Board::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            let mark = match ch {
                'X' => Mark::X,
                'O' => Mark::O,
                '.' => continue,
                other => panic!("unexpected cell char {other:?}"),
            };
            board.apply_move(r, c, mark).unwrap();
        }
    }
    board
}
