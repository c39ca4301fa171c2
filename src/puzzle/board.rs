//! The puzzle definition: grid size, tent targets and trees.

use std::collections::HashSet;

use tracing::warn;

use super::grid::Cell;
use crate::error::InvalidPuzzleError;

/// A Tents and Trees puzzle.
///
/// Immutable once constructed. Tree membership is an O(1) lookup on the
/// packed index `row * cols + col`.
///
/// # Examples
///
/// ```
/// use tents_trees::puzzle::{Cell, Puzzle};
///
/// let puzzle = Puzzle::new(
///     vec![1, 1, 0, 2, 1],
///     vec![2, 0, 1, 1, 1],
///     [(1, 1), (1, 3), (3, 0), (3, 1), (4, 4)],
/// )
/// .unwrap();
///
/// assert_eq!(puzzle.rows(), 5);
/// assert!(puzzle.is_tree(Cell::new(3, 0)));
/// assert_eq!(puzzle.candidate_cells().count(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PuzzleData", into = "PuzzleData")
)]
pub struct Puzzle {
    row_sums: Vec<usize>,
    col_sums: Vec<usize>,
    /// Sorted row-major.
    trees: Vec<Cell>,
    tree_index: HashSet<usize>,
}

impl Puzzle {
    /// Builds a puzzle from row targets, column targets and tree positions.
    ///
    /// The grid is `row_sums.len() x col_sums.len()`. Fails when the grid is
    /// empty, a tree lies outside it, or a tree is listed twice.
    ///
    /// Unequal row and column totals are accepted (the solver proves such
    /// puzzles infeasible) but logged as a warning.
    pub fn new<I>(
        row_sums: Vec<usize>,
        col_sums: Vec<usize>,
        trees: I,
    ) -> Result<Self, InvalidPuzzleError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let rows = row_sums.len();
        let cols = col_sums.len();
        if rows == 0 || cols == 0 {
            return Err(InvalidPuzzleError::EmptyGrid { rows, cols });
        }

        let mut tree_index = HashSet::new();
        let mut tree_cells = Vec::new();
        for (row, col) in trees {
            if row >= rows || col >= cols {
                return Err(InvalidPuzzleError::TreeOutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
            if !tree_index.insert(row * cols + col) {
                return Err(InvalidPuzzleError::DuplicateTree { row, col });
            }
            tree_cells.push(Cell::new(row, col));
        }
        tree_cells.sort_unstable();

        let puzzle = Self {
            row_sums,
            col_sums,
            trees: tree_cells,
            tree_index,
        };

        if !puzzle.has_consistent_totals() {
            warn!(
                event = "inconsistent_totals",
                row_total = puzzle.row_sums.iter().sum::<usize>(),
                col_total = puzzle.col_sums.iter().sum::<usize>(),
                "row and column tent totals differ; the puzzle has no solution"
            );
        }

        Ok(puzzle)
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        self.row_sums.len()
    }

    /// Number of grid columns.
    pub fn cols(&self) -> usize {
        self.col_sums.len()
    }

    /// Required tent count per row.
    pub fn row_sums(&self) -> &[usize] {
        &self.row_sums
    }

    /// Required tent count per column.
    pub fn col_sums(&self) -> &[usize] {
        &self.col_sums
    }

    /// Tree positions, sorted row-major.
    pub fn trees(&self) -> &[Cell] {
        &self.trees
    }

    /// Whether `sum(row_sums) == sum(col_sums)`.
    pub fn has_consistent_totals(&self) -> bool {
        self.row_sums.iter().sum::<usize>() == self.col_sums.iter().sum::<usize>()
    }

    /// Whether `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows() && cell.col < self.cols()
    }

    /// Whether a tree stands on `cell`.
    pub fn is_tree(&self, cell: Cell) -> bool {
        self.contains(cell) && self.tree_index.contains(&self.index(cell))
    }

    /// Edge-sharing neighbours of `cell` that lie inside the grid.
    pub fn orthogonal_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        cell.orthogonal_neighbors(self.rows(), self.cols())
    }

    /// Edge- or corner-sharing neighbours of `cell` that lie inside the grid.
    pub fn king_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        cell.king_neighbors(self.rows(), self.cols())
    }

    /// Every cell without a tree, row-major.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted.
    pub fn candidate_cells(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        let cols = self.cols();
        (0..self.rows() * cols)
            .filter(move |index| !self.tree_index.contains(index))
            .map(move |index| Cell::new(index / cols, index % cols))
    }

    /// Candidate cells with at least one orthogonally adjacent tree.
    ///
    /// A tent elsewhere could never be attached to a tree, so these are the
    /// only cells a solution can use.
    pub fn attachable_cells(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.candidate_cells()
            .filter(move |&cell| self.orthogonal_neighbors(cell).any(|n| self.is_tree(n)))
    }

    fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols() + cell.col
    }
}

/// Plain serialized form of a [`Puzzle`]; checked on the way back in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PuzzleData {
    row_sums: Vec<usize>,
    col_sums: Vec<usize>,
    trees: Vec<(usize, usize)>,
}

#[cfg(feature = "serde")]
impl TryFrom<PuzzleData> for Puzzle {
    type Error = InvalidPuzzleError;

    fn try_from(data: PuzzleData) -> Result<Self, Self::Error> {
        Puzzle::new(data.row_sums, data.col_sums, data.trees)
    }
}

#[cfg(feature = "serde")]
impl From<Puzzle> for PuzzleData {
    fn from(puzzle: Puzzle) -> Self {
        Self {
            trees: puzzle.trees.iter().map(|&c| c.into()).collect(),
            row_sums: puzzle.row_sums,
            col_sums: puzzle.col_sums,
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let puzzle = Puzzle::new(vec![1, 0], vec![0, 1], [(1, 1)]).unwrap();
        let json = serde_json::to_string(&puzzle).unwrap();
        assert_eq!(json, r#"{"row_sums":[1,0],"col_sums":[0,1],"trees":[[1,1]]}"#);

        let back: Puzzle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, puzzle);
        assert!(back.is_tree(Cell::new(1, 1)));
    }

    #[test]
    fn test_deserialize_checks_trees() {
        let json = r#"{"row_sums":[1,1,1,1,1],"col_sums":[1,1,1,1,1],"trees":[[10,10]]}"#;
        let err = serde_json::from_str::<Puzzle>(json).unwrap_err();
        assert!(
            err.to_string().contains("tree at (10, 10) is outside the 5x5 grid"),
            "{err}"
        );

        let duplicate = r#"{"row_sums":[1],"col_sums":[1,1],"trees":[[0,0],[0,0]]}"#;
        assert!(serde_json::from_str::<Puzzle>(duplicate).is_err());
    }
}
