//! Grid coordinates and neighbourhoods.

use std::fmt;

/// Offsets of the four edge-sharing neighbours, in row-major order.
const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Offsets of the eight edge- or corner-sharing neighbours, in row-major order.
const KING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A `(row, col)` grid coordinate.
///
/// Ordered row-major, so sorted collections of cells read top-left to
/// bottom-right.
///
/// # Examples
///
/// ```
/// use tents_trees::puzzle::Cell;
///
/// let a = Cell::new(1, 1);
/// assert!(a.is_orthogonally_adjacent(Cell::new(0, 1)));
/// assert!(!a.is_orthogonally_adjacent(Cell::new(0, 0)));
/// assert!(a.is_king_adjacent(Cell::new(0, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based column index.
    pub col: usize,
}

impl Cell {
    /// Creates a cell at `(row, col)`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether `other` shares an edge with this cell.
    pub fn is_orthogonally_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Whether `other` shares an edge or a corner with this cell.
    pub fn is_king_adjacent(self, other: Cell) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// The edge-sharing neighbours inside a `rows x cols` grid.
    pub fn orthogonal_neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Cell> {
        self.offset_all(&ORTHOGONAL, rows, cols)
    }

    /// The edge- or corner-sharing neighbours inside a `rows x cols` grid.
    pub fn king_neighbors(self, rows: usize, cols: usize) -> impl Iterator<Item = Cell> {
        self.offset_all(&KING, rows, cols)
    }

    fn offset_all(
        self,
        offsets: &'static [(isize, isize)],
        rows: usize,
        cols: usize,
    ) -> impl Iterator<Item = Cell> {
        offsets.iter().filter_map(move |&(dr, dc)| {
            let row = self.row.checked_add_signed(dr)?;
            let col = self.col.checked_add_signed(dc)?;
            (row < rows && col < cols).then_some(Cell::new(row, col))
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_neighbors_are_clipped() {
        let corner = Cell::new(0, 0);
        let orth: Vec<Cell> = corner.orthogonal_neighbors(3, 3).collect();
        assert_eq!(orth, vec![Cell::new(0, 1), Cell::new(1, 0)]);

        let king: Vec<Cell> = corner.king_neighbors(3, 3).collect();
        assert_eq!(king, vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn test_interior_neighbor_counts() {
        let mid = Cell::new(1, 1);
        assert_eq!(mid.orthogonal_neighbors(3, 3).count(), 4);
        assert_eq!(mid.king_neighbors(3, 3).count(), 8);
        assert!(mid.king_neighbors(3, 3).all(|n| n.is_king_adjacent(mid)));
    }

    #[test]
    fn test_adjacency_is_symmetric_and_irreflexive() {
        let a = Cell::new(2, 3);
        let b = Cell::new(3, 4);
        assert!(a.is_king_adjacent(b) && b.is_king_adjacent(a));
        assert!(!a.is_orthogonally_adjacent(b));
        assert!(!a.is_king_adjacent(a));
        assert!(!a.is_orthogonally_adjacent(a));
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(0, 2), Cell::new(0, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 0)]);
        assert_eq!(Cell::new(4, 2).to_string(), "(4, 2)");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_cell_json() {
        let json = serde_json::to_string(&Cell::new(3, 4)).unwrap();
        assert_eq!(json, r#"{"row":3,"col":4}"#);
        assert_eq!(serde_json::from_str::<Cell>(&json).unwrap(), Cell::new(3, 4));
    }
}
