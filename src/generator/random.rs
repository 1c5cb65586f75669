use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::MinePlacer;
use crate::level::Level;
use crate::types::{Coord, Pos};

// Draw budget for the rejection loop, scaled by board area. Only boards
// mined close to capacity ever exhaust it.
const ATTEMPTS_PER_CELL: u32 = 16;

/// Uniform random placement: rejection sampling against the cells already
/// taken, with a shuffle of the remaining free cells as fallback once the
/// draw budget runs out. Both stages draw uniformly, so the fallback does
/// not change the layout distribution.
#[derive(Clone, Debug)]
pub struct RandomPlacer {
    rng: SmallRng,
}

impl RandomPlacer {
    /// Placer seeded from the system entropy source.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic placer: the same seed yields the same layout sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl MinePlacer for RandomPlacer {
    fn place_mines(&mut self, level: &Level, excluded: Pos) -> Vec<Pos> {
        let wanted = usize::from(level.mines());
        let width = level.width();
        let height = level.height();
        let max_attempts = u32::from(level.total_cells()).saturating_mul(ATTEMPTS_PER_CELL);

        let mut taken = vec![false; usize::from(level.total_cells())];
        let mut mines = Vec::with_capacity(wanted);
        let mut attempts: u32 = 0;

        while mines.len() < wanted && attempts < max_attempts {
            attempts += 1;
            let pos = (
                self.rng.random_range(0..height),
                self.rng.random_range(0..width),
            );
            if pos == excluded {
                continue;
            }
            let slot = linear(pos, width);
            if taken[slot] {
                continue;
            }
            taken[slot] = true;
            mines.push(pos);
        }

        if mines.len() < wanted {
            log::warn!(
                "placement stalled after {attempts} draws with {} of {wanted} mines, finishing with a shuffle",
                mines.len()
            );
            let missing = wanted - mines.len();
            mines.extend(self.shuffle_remaining(level, excluded, &taken, missing));
        }

        log::debug!("{} mines placed in {attempts} draws", mines.len());
        mines
    }
}

impl RandomPlacer {
    /// Completion stage for saturated boards: shuffle the still-free cells
    /// and take however many mines are missing. The level validation keeps
    /// at least one free cell beyond the excluded one, so this always
    /// finds enough.
    fn shuffle_remaining(
        &mut self,
        level: &Level,
        excluded: Pos,
        taken: &[bool],
        missing: usize,
    ) -> Vec<Pos> {
        let mut free: Vec<Pos> = Vec::new();
        for row in 0..level.height() {
            for col in 0..level.width() {
                let pos = (row, col);
                if pos != excluded && !taken[linear(pos, level.width())] {
                    free.push(pos);
                }
            }
        }
        free.shuffle(&mut self.rng);
        free.truncate(missing);
        free
    }
}

fn linear((row, col): Pos, width: Coord) -> usize {
    usize::from(row) * usize::from(width) + usize::from(col)
}
