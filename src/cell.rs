use std::fmt;

use serde::{Deserialize, Serialize};

/// What a cell holds once the mines are scattered: nothing, a count of
/// adjacent mines, or a mine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Count(u8),
    Mine,
}

impl CellValue {
    /// One increment step of mine scattering: empty becomes 1, counts grow
    /// up to the 8-neighbor maximum, mines stay mines.
    pub const fn bumped(self) -> Self {
        match self {
            Self::Empty => Self::Count(1),
            Self::Count(n) if n < 8 => Self::Count(n + 1),
            other => other,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Number of adjacent mines; zero for empty cells and for mines.
    pub const fn adjacent_mines(self) -> u8 {
        match self {
            Self::Count(n) => n,
            _ => 0,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Count(n) => write!(f, "{n}"),
            Self::Mine => write!(f, "M"),
        }
    }
}

/// Player-visible exposure of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Opened,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One board cell: its value and its exposure, tracked independently.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) value: CellValue,
    pub(crate) state: CellState,
}

impl Cell {
    pub const fn value(self) -> CellValue {
        self.value
    }

    pub const fn state(self) -> CellState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_counts_up_to_eight() {
        let mut value = CellValue::Empty;
        for expected in 1..=8 {
            value = value.bumped();
            assert_eq!(value, CellValue::Count(expected));
        }
        assert_eq!(value.bumped(), CellValue::Count(8));
    }

    #[test]
    fn bump_leaves_mines_alone() {
        assert_eq!(CellValue::Mine.bumped(), CellValue::Mine);
    }

    #[test]
    fn display_labels_match_the_ui_strings() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Count(3).to_string(), "3");
        assert_eq!(CellValue::Mine.to_string(), "M");
    }

    #[test]
    fn new_cells_start_hidden_and_empty() {
        let cell = Cell::default();
        assert_eq!(cell.value(), CellValue::Empty);
        assert_eq!(cell.state(), CellState::Hidden);
    }
}
