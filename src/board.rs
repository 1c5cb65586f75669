use std::fmt;
use std::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellState, CellValue};
use crate::error::{GameError, Result};
use crate::level::Level;
use crate::types::{CellCount, Coord, NeighborIter, NeighborIterExt, Pos, ToIndex};

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// The minefield grid plus its three counters.
///
/// `remaining_flags` starts at `mine_count` and tracks how many flags the
/// player may still place. `correct_flags` counts flags sitting on mines
/// and is what the win rule compares against `mine_count`; see
/// [`Board::toggle_flag`] for its deliberately asymmetric bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    remaining_flags: CellCount,
    correct_flags: CellCount,
}

impl Board {
    /// Fresh all-hidden board for `level`, with no mines placed yet.
    pub fn new(level: &Level) -> Self {
        let shape = (usize::from(level.height()), usize::from(level.width()));
        Self {
            cells: Array2::default(shape),
            mine_count: level.mines(),
            remaining_flags: level.mines(),
            correct_flags: 0,
        }
    }

    /// Board size as `(rows, cols)`.
    pub fn size(&self) -> Pos {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn remaining_flags(&self) -> CellCount {
        self.remaining_flags
    }

    pub fn correct_flags(&self) -> CellCount {
        self.correct_flags
    }

    pub fn contains(&self, pos: Pos) -> bool {
        let (rows, cols) = self.size();
        pos.0 < rows && pos.1 < cols
    }

    pub fn validate(&self, pos: Pos) -> Result<Pos> {
        if self.contains(pos) {
            Ok(pos)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.to_index()]
    }

    pub(crate) fn cell_mut(&mut self, pos: Pos) -> &mut Cell {
        &mut self.cells[pos.to_index()]
    }

    pub(crate) fn iter_neighbors(&self, pos: Pos) -> NeighborIter {
        self.cells.iter_neighbors(pos)
    }

    /// Scatter mines at the given positions and raise the adjacency counts
    /// around each one.
    ///
    /// All positions are validated before anything is written. A position
    /// already holding a mine is applied once, extra occurrences are
    /// skipped so the counts stay consistent.
    pub fn place_mines(&mut self, mines: &[Pos]) -> Result<()> {
        for &pos in mines {
            self.validate(pos)?;
        }

        for &pos in mines {
            if self.cells[pos.to_index()].value.is_mine() {
                log::warn!("duplicate mine position {pos:?} skipped");
                continue;
            }
            self.cells[pos.to_index()].value = CellValue::Mine;
            for neighbor in self.iter_neighbors(pos) {
                let cell = &mut self.cells[neighbor.to_index()];
                cell.value = cell.value.bumped();
            }
        }
        Ok(())
    }

    /// Toggle the flag on a hidden or flagged cell.
    ///
    /// Flagging is refused once `remaining_flags` hits zero and on opened
    /// cells. Removing a flag gives the flag back but never takes back the
    /// `correct_flags` credit it may have earned; re-flagging the same mine
    /// earns credit again, capped at `mine_count`. Both quirks come from
    /// the reference implementation and are load-bearing for its win rule.
    pub fn toggle_flag(&mut self, pos: Pos) -> FlagOutcome {
        let cell = self.cells[pos.to_index()];
        match cell.state {
            CellState::Opened => FlagOutcome::NoChange,
            CellState::Hidden => {
                if self.remaining_flags == 0 {
                    return FlagOutcome::NoChange;
                }
                self.cells[pos.to_index()].state = CellState::Flagged;
                self.remaining_flags -= 1;
                if cell.value.is_mine() && self.correct_flags < self.mine_count {
                    self.correct_flags += 1;
                }
                FlagOutcome::Changed
            }
            CellState::Flagged => {
                self.cells[pos.to_index()].state = CellState::Hidden;
                if self.remaining_flags < self.mine_count {
                    self.remaining_flags += 1;
                }
                // correct_flags keeps its credit here
                FlagOutcome::Changed
            }
        }
    }
}

impl Index<Pos> for Board {
    type Output = Cell;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.to_index()]
    }
}

/// Value grid for diagnostics: `.` empty, digits for counts, `M` mines.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                match self.cell((row, col)).value() {
                    CellValue::Empty => write!(f, ". ")?,
                    value => write!(f, "{value} ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
