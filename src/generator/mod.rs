use crate::level::Level;
use crate::types::Pos;

pub use random::*;

mod random;

/// Strategy for choosing mine positions when a game starts.
///
/// `excluded` is the first-opened cell; implementations must keep it
/// mine-free so the first open never explodes. Takes `&mut self` so a
/// session can reuse one strategy across games, continuing its RNG stream.
pub trait MinePlacer {
    fn place_mines(&mut self, level: &Level, excluded: Pos) -> Vec<Pos>;
}

/// Replays a fixed layout, for scripted boards and tests.
///
/// The excluded cell is deliberately not filtered out: a scripted layout
/// is the caller's responsibility, and letting the first open hit a mine
/// is useful for exercising the loss path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedPlacer {
    mines: Vec<Pos>,
}

impl FixedPlacer {
    pub fn new(mines: Vec<Pos>) -> Self {
        Self { mines }
    }
}

impl MinePlacer for FixedPlacer {
    fn place_mines(&mut self, _level: &Level, _excluded: Pos) -> Vec<Pos> {
        self.mines.clone()
    }
}
