use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts, flag counters, and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position `(row, col)`, zero-based from the top-left.
pub type Pos = (Coord, Coord);

pub trait ToIndex {
    type Output;
    fn to_index(self) -> Self::Output;
}

impl ToIndex for Pos {
    type Output = [usize; 2];

    fn to_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area(width: Coord, height: Coord) -> CellCount {
    let w = width as CellCount;
    let h = height as CellCount;
    w.saturating_mul(h)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Pos) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Pos) -> NeighborIter {
        let dim = self.dim();
        let bounds = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(center, bounds)
    }
}

// Row-major: the row delta varies slowest, so neighbors come out in
// reading order. The center itself is not listed.
const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Pos, delta: (isize, isize), bounds: Pos) -> Option<Pos> {
    let (row, col) = pos;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterator over the up-to-8 in-bounds neighbors of a position, in the
/// fixed order of [`DISPLACEMENTS`].
#[derive(Debug)]
pub struct NeighborIter {
    center: Pos,
    bounds: Pos,
    index: u8,
}

impl NeighborIter {
    fn new(center: Pos, bounds: Pos) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbors(center: Pos, bounds: Pos) -> Vec<Pos> {
        NeighborIter::new(center, bounds).collect()
    }

    #[test]
    fn center_cell_has_eight_neighbors_in_reading_order() {
        let got = neighbors((1, 1), (3, 3));
        assert_eq!(
            got,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ]
        );
    }

    #[test]
    fn corner_cells_have_three_neighbors() {
        assert_eq!(neighbors((0, 0), (3, 3)), vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(neighbors((2, 2), (3, 3)), vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn edge_cell_has_five_neighbors() {
        assert_eq!(
            neighbors((0, 1), (3, 3)),
            vec![(0, 0), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(neighbors((0, 0), (1, 1)), vec![]);
    }

    #[test]
    fn area_covers_the_full_coord_range() {
        assert_eq!(area(9, 9), 81);
        assert_eq!(area(30, 16), 480);
        assert_eq!(area(u8::MAX, u8::MAX), 65025);
    }
}
