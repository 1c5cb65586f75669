use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::types::CellCount;

/// Most records the table keeps.
pub const MAX_RECORDS: usize = 10;

/// One winning game: who, how long, and on which level.
///
/// Records rank by difficulty factor (mines per cell) ascending, ties by
/// the `HH:MM:SS` time string. The factor compares by cross-multiplying
/// `(mines, total_cells)`, so equal ratios tie exactly regardless of the
/// board shapes involved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreRecord {
    player_name: String,
    time: String,
    level_name: String,
    mines: CellCount,
    total_cells: CellCount,
}

impl HighscoreRecord {
    pub fn new(player_name: impl Into<String>, time: impl Into<String>, level: &Level) -> Self {
        Self {
            player_name: player_name.into(),
            time: time.into(),
            level_name: level.name().to_string(),
            mines: level.mines(),
            total_cells: level.total_cells(),
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    /// Mines per cell, for display.
    pub fn difficulty_factor(&self) -> f64 {
        f64::from(self.mines) / f64::from(self.total_cells)
    }

    fn rank(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.mines) * u64::from(other.total_cells);
        let rhs = u64::from(other.mines) * u64::from(self.total_cells);
        lhs.cmp(&rhs).then_with(|| self.time.cmp(&other.time))
    }
}

/// The highscore table: at most [`MAX_RECORDS`] entries, easiest boards
/// first, faster times first within a difficulty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highscores {
    records: Vec<HighscoreRecord>,
}

impl Highscores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HighscoreRecord] {
        &self.records
    }

    /// Insert a record in rank order, dropping whatever falls past the cap.
    pub fn add_record(&mut self, record: HighscoreRecord) {
        self.records.push(record);
        self.records.sort_by(HighscoreRecord::rank);
        self.records.truncate(MAX_RECORDS);
    }

    /// Serialize as a plain JSON array of records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self {
            records: serde_json::from_str(json)?,
        })
    }
}
