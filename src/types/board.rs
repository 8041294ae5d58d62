use std::fmt::Display;

use smallvec::SmallVec;

use super::player_id::PlayerId;

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 7;
pub const CELL_COUNT: usize = COLUMNS * ROWS;

/// A match can never last longer than the number of cells on the board.
pub const MAX_TURNS_POSSIBLE: usize = CELL_COUNT;

/// Bits per column in the bitboard representation: one per row plus a guard bit.
const COLUMN_STRIDE: usize = ROWS + 1;

/// Bitboard shift offsets: vertical, horizontal and both diagonals.
const DIRECTIONS: [usize; 4] = [1, COLUMN_STRIDE, COLUMN_STRIDE - 1, COLUMN_STRIDE + 1];

pub type Column = usize;
pub type Row = usize;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidMoveReason {
    OutOfRange,
    ColumnFull,
}

impl Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMoveReason::OutOfRange => write!(f, "column out of range 0..={}", COLUMNS - 1),
            InvalidMoveReason::ColumnFull => write!(f, "column is full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error("invalid move at column {column}: {reason}")]
    InvalidMove { column: Column, reason: InvalidMoveReason },
}

impl BoardError {
    #[inline]
    pub fn out_of_range(column: Column) -> Self {
        Self::InvalidMove {
            column,
            reason: InvalidMoveReason::OutOfRange,
        }
    }

    #[inline]
    pub fn column_full(column: Column) -> Self {
        Self::InvalidMove {
            column,
            reason: InvalidMoveReason::ColumnFull,
        }
    }

    #[inline]
    pub fn column(&self) -> Column {
        match self {
            BoardError::InvalidMove { column, .. } => *column,
        }
    }
}

/// A 7x7 Connect Four board stored column-major.
///
/// Pieces fall to the lowest empty row, so within a column the occupied cells always form a
/// contiguous prefix starting at row 0. The board is `Copy`: search branches work on their
/// own copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    cells: [[Option<PlayerId>; ROWS]; COLUMNS],
}

impl Board {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from per-column stacks listed bottom to top.
    pub fn from_columns<C: AsRef<[PlayerId]>>(columns: &[C]) -> Result<Self, BoardError> {
        let mut board = Self::new();
        for (column, stack) in columns.iter().enumerate() {
            for &player in stack.as_ref() {
                board.apply(column, player)?;
            }
        }
        Ok(board)
    }

    /// Plays `moves` in order, alternating players starting from `first`.
    pub fn from_moves(moves: &[Column], first: PlayerId) -> Result<Self, BoardError> {
        let mut board = Self::new();
        let mut player = first;
        for &column in moves {
            board.apply(column, player)?;
            player = player.opposite();
        }
        Ok(board)
    }

    #[inline]
    pub fn cell(&self, column: Column, row: Row) -> Option<PlayerId> {
        self.cells[column][row]
    }

    /// Overwrites a single cell without applying gravity.
    ///
    /// Callers are responsible for keeping the column contiguous.
    #[inline]
    pub fn set_cell(&mut self, column: Column, row: Row, value: Option<PlayerId>) {
        self.cells[column][row] = value;
    }

    #[inline]
    fn check_column(column: Column) -> Result<(), BoardError> {
        if column >= COLUMNS {
            return Err(BoardError::out_of_range(column));
        }
        Ok(())
    }

    /// Number of occupied cells in a column.
    #[inline]
    pub fn height(&self, column: Column) -> usize {
        self.cells[column].iter().take_while(|c| c.is_some()).count()
    }

    /// Lowest empty row of `column`, `None` when the column is full.
    pub fn next_position(&self, column: Column) -> Result<Option<Row>, BoardError> {
        Self::check_column(column)?;
        let height = self.height(column);
        Ok((height < ROWS).then_some(height))
    }

    /// Drops a piece for `player` into `column` and returns the landing row.
    pub fn apply(&mut self, column: Column, player: PlayerId) -> Result<Row, BoardError> {
        let Some(row) = self.next_position(column)? else {
            return Err(BoardError::column_full(column));
        };
        self.cells[column][row] = Some(player);
        Ok(row)
    }

    #[inline]
    pub fn with_move(&self, column: Column, player: PlayerId) -> Result<(Board, Row), BoardError> {
        let mut board = *self;
        let row = board.apply(column, player)?;
        Ok((board, row))
    }

    /// Landing cell of every non-full column in ascending column order.
    pub fn available_positions(&self) -> impl Iterator<Item = (Column, Row)> {
        let board = *self;
        (0..COLUMNS).filter_map(move |column| {
            let height = board.height(column);
            (height < ROWS).then_some((column, height))
        })
    }

    #[inline]
    pub fn available_columns(&self) -> SmallVec<[Column; COLUMNS]> {
        self.available_positions().map(|(column, _)| column).collect()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.available_positions().next().is_none()
    }

    /// Number of pieces on the board.
    #[inline]
    pub fn ply(&self) -> usize {
        (0..COLUMNS).map(|column| self.height(column)).sum()
    }

    /// Side to move given the player who moved first, inferred from ply parity.
    #[inline]
    pub fn to_move(&self, first: PlayerId) -> PlayerId {
        if self.ply() % 2 == 0 {
            first
        } else {
            first.opposite()
        }
    }

    /// Occupied cells as `(column * ROWS + row, owner)`.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, PlayerId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(column, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(row, cell)| cell.map(|p| (column * ROWS + row, p)))
        })
    }

    /// One bitmask per player (`PlayerFirst`, `PlayerSecond`).
    ///
    /// Bit `column * 8 + row` is set when the player owns that cell. Bit 7 of every column is a
    /// guard that stays clear, so shifted masks never join pieces across columns.
    pub fn bit_board_split(&self) -> (u64, u64) {
        let (mut first, mut second) = (0u64, 0u64);
        for (index, player) in self.occupied_cells() {
            let (column, row) = (index / ROWS, index % ROWS);
            let bit = 1u64 << (column * COLUMN_STRIDE + row);
            match player {
                PlayerId::PlayerFirst => first |= bit,
                PlayerId::PlayerSecond => second |= bit,
            }
        }
        (first, second)
    }

    #[inline]
    fn has_four(mask: u64) -> bool {
        DIRECTIONS.iter().any(|&d| {
            let m = mask & (mask >> d);
            m & (m >> (2 * d)) != 0
        })
    }

    /// The player owning four in a row in any direction.
    pub fn winner(&self) -> Option<PlayerId> {
        let (first, second) = self.bit_board_split();
        if Self::has_four(first) {
            Some(PlayerId::PlayerFirst)
        } else if Self::has_four(second) {
            Some(PlayerId::PlayerSecond)
        } else {
            None
        }
    }

    /// Swaps the owner of every piece.
    pub fn switch_ids(&self) -> Board {
        let mut board = *self;
        for cell in board.cells.iter_mut().flatten() {
            *cell = cell.map(PlayerId::opposite);
        }
        board
    }

    /// Cell signs in `column * ROWS + row` order followed by the sign of `side`.
    pub fn features(&self, side: PlayerId) -> [f32; CELL_COUNT + 1] {
        let mut features = [0.0; CELL_COUNT + 1];
        for (index, player) in self.occupied_cells() {
            features[index] = player.sign() as f32;
        }
        features[CELL_COUNT] = side.sign() as f32;
        features
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in (0..ROWS).rev() {
            for column in 0..COLUMNS {
                let c = self.cells[column][row].map_or('_', PlayerId::symbol);
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        for column in 0..COLUMNS {
            if column > 0 {
                write!(f, " ")?;
            }
            write!(f, "{column}")?;
        }
        Ok(())
    }
}
