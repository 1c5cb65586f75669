use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::types::{CellCount, Coord, area};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum LevelName {
    Easy,
    Intermediate,
    Expert,
    Custom,
}

/// Immutable game parameters: board dimensions and mine count.
///
/// The three classic presets are provided as constructors; anything else
/// goes through [`Level::custom`], which enforces nonzero dimensions, a
/// nonzero mine count, and `mines <= width * height - 2` so that the first
/// opened cell can always be kept mine-free with at least one safe cell
/// left over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    name: LevelName,
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl Level {
    pub const fn easy() -> Self {
        Self {
            name: LevelName::Easy,
            width: 9,
            height: 9,
            mines: 10,
        }
    }

    pub const fn intermediate() -> Self {
        Self {
            name: LevelName::Intermediate,
            width: 16,
            height: 16,
            mines: 40,
        }
    }

    pub const fn expert() -> Self {
        Self {
            name: LevelName::Expert,
            width: 30,
            height: 16,
            mines: 99,
        }
    }

    pub fn custom(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        if width == 0 || height == 0 || mines == 0 {
            return Err(GameError::InvalidConfig);
        }
        if mines > area(width, height).saturating_sub(2) {
            return Err(GameError::InvalidConfig);
        }
        Ok(Self {
            name: LevelName::Custom,
            width,
            height,
            mines,
        })
    }

    pub const fn name(&self) -> &'static str {
        match self.name {
            LevelName::Easy => "Easy",
            LevelName::Intermediate => "Intermediate",
            LevelName::Expert => "Expert",
            LevelName::Custom => "Custom",
        }
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.width, self.height)
    }
}
