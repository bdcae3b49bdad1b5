//! Core domain types for tic-tac-toe.

use super::action::MoveError;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One player's symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Mark played by the local human in offline games.
    pub const HUMAN: Mark = Mark::X;

    /// Mark played by the computer opponent in offline games.
    pub const COMPUTER: Mark = Mark::O;

    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A cell on the board.
///
/// Serialized as a one-character string: `" "`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cell {
    /// No mark yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }

    /// Returns true if no mark has been placed here.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Single-character symbol for this cell.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(mark) => mark.symbol(),
        }
    }

    /// Parses a cell from its symbol. `' '`, `'.'` and `'-'` read as empty.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            ' ' | '.' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::Occupied(Mark::X)),
            'O' | 'o' => Some(Cell::Occupied(Mark::O)),
            _ => None,
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.symbol().to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = CellParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Cell::from_symbol(c).ok_or(CellParseError(value)),
            _ => Err(CellParseError(value)),
        }
    }
}

/// A cell string that is not one of `" "`, `"X"`, `"O"`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid cell value: {:?}", _0)]
pub struct CellParseError(#[error(not(source))] pub String);

/// 3x3 board, row-major (index = row * 3 + col).
///
/// Cells only ever go from empty to occupied. The one way back is
/// [`Board::clear`], which empties the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at a position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.to_index()]
    }

    /// Gets the cell at a raw index, `None` when out of bounds.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at a position is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_empty()
    }

    /// Places a mark on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CellOccupied`] if the cell already holds a mark.
    pub fn place(&mut self, pos: Position, mark: Mark) -> Result<(), MoveError> {
        if !self.is_empty(pos) {
            return Err(MoveError::CellOccupied(pos));
        }
        self.cells[pos.to_index()] = Cell::Occupied(mark);
        Ok(())
    }

    /// Returns a copy of this board with `mark` placed at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CellOccupied`] if the cell already holds a mark.
    pub fn with_mark(&self, pos: Position, mark: Mark) -> Result<Self, MoveError> {
        let mut next = *self;
        next.place(pos, mark)?;
        Ok(next)
    }

    /// Undoes a tentative placement. Only the planner simulates moves.
    pub(crate) fn revert(&mut self, pos: Position) {
        self.cells[pos.to_index()] = Cell::Empty;
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; 9];
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Empty positions in ascending index order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// Returns true if every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// The nine cell symbols as one string, e.g. `"X   O    "`.
    pub fn symbols(&self) -> String {
        self.cells.iter().map(|c| c.symbol()).collect()
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|c| c.mark() == Some(mark))
            .count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.cells[pos] {
                    Cell::Empty => write!(f, "{}", pos + 1)?,
                    Cell::Occupied(mark) => write!(f, "{}", mark)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// A board string that does not hold exactly nine valid cell symbols.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid board string: {:?}", _0)]
pub struct BoardParseError(#[error(not(source))] pub String);

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses nine cell symbols, ignoring `/` and newline separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.chars().filter(|c| *c != '/' && *c != '\n').collect();
        if symbols.len() != 9 {
            return Err(BoardParseError(s.to_string()));
        }
        let mut cells = [Cell::Empty; 9];
        for (slot, c) in cells.iter_mut().zip(symbols) {
            *slot = Cell::from_symbol(c).ok_or_else(|| BoardParseError(s.to_string()))?;
        }
        Ok(Self { cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_wire_form() {
        let json = serde_json::to_string(&Cell::Occupied(Mark::X)).unwrap();
        assert_eq!(json, "\"X\"");
        let empty: Cell = serde_json::from_str("\" \"").unwrap();
        assert_eq!(empty, Cell::Empty);
        assert!(serde_json::from_str::<Cell>("\"Q\"").is_err());
    }

    #[test]
    fn test_board_serializes_as_nine_strings() {
        let board: Board = "X   O    ".parse().unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, r#"["X"," "," "," ","O"," "," "," "," "]"#);
    }

    #[test]
    fn test_board_rejects_wrong_length() {
        assert!(serde_json::from_str::<Board>(r#"["X"," "]"#).is_err());
        assert!("XO".parse::<Board>().is_err());
    }

    #[test]
    fn test_place_refuses_occupied_cell() {
        let mut board = Board::new();
        board.place(Position::Center, Mark::X).unwrap();
        assert_eq!(
            board.place(Position::Center, Mark::O),
            Err(MoveError::CellOccupied(Position::Center))
        );
        assert_eq!(board.get(Position::Center), Cell::Occupied(Mark::X));
    }

    #[test]
    fn test_clear_empties_board() {
        let mut board: Board = "XOXOXOXOX".parse().unwrap();
        board.clear();
        assert!(board.is_blank());
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let board: Board = "X...O....".parse().unwrap();
        assert_eq!(board.to_string(), "X|2|3\n-+-+-\n4|O|6\n-+-+-\n7|8|9");
    }
}
