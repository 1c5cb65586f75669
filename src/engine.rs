use std::collections::{HashSet, VecDeque};
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cell::{CellState, CellValue};
use crate::types::Pos;

/// A cell opened by a clear operation, paired with the value it exposed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedCell {
    pub pos: Pos,
    pub value: CellValue,
}

/// Outcome of opening one or more cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    NoChange,
    Opened,
    Exploded,
}

impl OpenOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_explosion(self) -> bool {
        matches!(self, Self::Exploded)
    }
}

/// Merging for chords: an explosion anywhere dominates, any opened cell
/// beats no change.
impl BitOr for OpenOutcome {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        use OpenOutcome::*;

        match (self, rhs) {
            (Exploded, _) | (_, Exploded) => Exploded,
            (Opened, _) | (_, Opened) => Opened,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Clear operations. Every cell these open is appended to the caller's
/// `opened` buffer so the UI can redraw from the delta alone.
impl Board {
    /// Open a single cell. Empty cells flood-fill their zero region plus
    /// its numbered border; flagged and already-open cells are no-ops.
    pub fn open_cell(&mut self, pos: Pos, opened: &mut Vec<OpenedCell>) -> OpenOutcome {
        use CellState::*;

        let cell = self[pos];
        match (cell.state(), cell.value()) {
            (Flagged, _) | (Opened, _) => OpenOutcome::NoChange,
            (Hidden, CellValue::Mine) => {
                self.set_opened(pos, opened);
                log::debug!("mine hit at {pos:?}");
                OpenOutcome::Exploded
            }
            (Hidden, value) => {
                self.set_opened(pos, opened);
                log::debug!("opened {pos:?} showing {value:?}");
                if value == CellValue::Empty {
                    self.flood_from(pos, opened);
                }
                OpenOutcome::Opened
            }
        }
    }

    /// Open all neighbors of an opened numbered cell, provided at least
    /// that many of its neighbors are flagged. A flag on the wrong cell
    /// makes this open a mine instead; chording is a risk action.
    pub fn chord(&mut self, pos: Pos, opened: &mut Vec<OpenedCell>) -> OpenOutcome {
        let cell = self[pos];
        let CellValue::Count(required) = cell.value() else {
            return OpenOutcome::NoChange;
        };
        if !cell.state().is_opened() {
            return OpenOutcome::NoChange;
        }
        if self.count_flagged_neighbors_capped(pos, required) < required {
            return OpenOutcome::NoChange;
        }

        self.iter_neighbors(pos)
            .map(|neighbor| self.open_cell(neighbor, opened))
            .reduce(BitOr::bitor)
            .unwrap_or(OpenOutcome::NoChange)
    }

    /// Post-loss sweep: opens everything still hidden, row by row, mines
    /// included. Flags are left in place.
    pub fn open_all(&mut self, opened: &mut Vec<OpenedCell>) {
        let before = opened.len();
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                if self[(row, col)].state().is_hidden() {
                    self.set_opened((row, col), opened);
                }
            }
        }
        log::debug!("board swept open, {} cells revealed", opened.len() - before);
    }

    /// Iterative flood fill. The frontier only ever grows from zero cells,
    /// whose neighbors cannot be mines, so nothing here can explode.
    fn flood_from(&mut self, start: Pos, opened: &mut Vec<OpenedCell>) {
        let before = opened.len();
        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .iter_neighbors(start)
            .filter(|&pos| self[pos].state().is_hidden())
            .collect();

        while let Some(visit_pos) = to_visit.pop_front() {
            if !visited.insert(visit_pos) {
                continue;
            }

            // flagged cells block the flood and stay flagged
            if !self[visit_pos].state().is_hidden() {
                continue;
            }

            let value = self[visit_pos].value();
            self.set_opened(visit_pos, opened);

            if value == CellValue::Empty {
                to_visit.extend(
                    self.iter_neighbors(visit_pos)
                        .filter(|&pos| self[pos].state().is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        log::trace!(
            "flood fill from {start:?} opened {} further cells",
            opened.len() - before
        );
    }

    // Stops scanning once the count passes `cap`; the chord only needs to
    // know whether the threshold is met.
    fn count_flagged_neighbors_capped(&self, pos: Pos, cap: u8) -> u8 {
        let mut count = 0;
        for neighbor in self.iter_neighbors(pos) {
            if self[neighbor].state().is_flagged() {
                count += 1;
                if count > cap {
                    break;
                }
            }
        }
        count
    }

    fn set_opened(&mut self, pos: Pos, opened: &mut Vec<OpenedCell>) {
        let cell = self.cell_mut(pos);
        cell.state = CellState::Opened;
        opened.push(OpenedCell {
            pos,
            value: cell.value,
        });
    }
}
