//! Checking a tent placement against the puzzle rules.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::board::Puzzle;
use super::grid::Cell;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A tent lies outside the grid.
    OutOfBounds { tent: Cell },
    /// A tent stands on a tree.
    OnTree { tent: Cell },
    /// Two tents touch, edge or corner. `first < second`.
    AdjacentTents { first: Cell, second: Cell },
    /// A tree has no tent on any of its four sides.
    UncoveredTree { tree: Cell },
    /// A tent has no tree on any of its four sides.
    UnattachedTent { tent: Cell },
    /// A row holds the wrong number of tents.
    RowCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A column holds the wrong number of tents.
    ColumnCount {
        col: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OutOfBounds { tent } => write!(f, "tent at {tent} is outside the grid"),
            Violation::OnTree { tent } => write!(f, "tent at {tent} is placed on a tree"),
            Violation::AdjacentTents { first, second } => {
                write!(f, "tents at {first} and {second} are adjacent")
            }
            Violation::UncoveredTree { tree } => {
                write!(f, "tree at {tree} has no orthogonally adjacent tent")
            }
            Violation::UnattachedTent { tent } => {
                write!(f, "tent at {tent} is not orthogonally adjacent to any tree")
            }
            Violation::RowCount {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} tents, expected {expected}"),
            Violation::ColumnCount {
                col,
                expected,
                actual,
            } => write!(f, "column {col} has {actual} tents, expected {expected}"),
        }
    }
}

/// Outcome of [`Puzzle::validate_solution`].
///
/// Violations are listed rule by rule in a fixed order: bounds, trees,
/// adjacency, tree/tent pairing, rows, columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// `true` iff `violations` is empty.
    pub valid: bool,
    /// Every broken rule.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Whether the placement satisfies every rule.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Human-readable descriptions, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "valid");
        }
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl Puzzle {
    /// Checks a tent placement against every rule and reports all failures.
    ///
    /// The input is treated as a set, so duplicates and ordering do not
    /// affect the report. Tents outside the grid are reported once and then
    /// ignored by the remaining rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use tents_trees::puzzle::{Cell, Puzzle};
    ///
    /// let puzzle = Puzzle::new(vec![1, 0], vec![1, 0], [(1, 0)]).unwrap();
    /// assert!(puzzle.validate_solution([Cell::new(0, 0)]).is_valid());
    ///
    /// let report = puzzle.validate_solution([Cell::new(0, 1)]);
    /// assert!(!report.valid);
    /// assert_eq!(report.violations.len(), 4);
    /// ```
    pub fn validate_solution<I>(&self, tents: I) -> ValidationReport
    where
        I: IntoIterator,
        I::Item: Borrow<Cell>,
    {
        let tents: BTreeSet<Cell> = tents.into_iter().map(|c| *c.borrow()).collect();
        let mut violations = Vec::new();

        let mut placed = Vec::with_capacity(tents.len());
        for &tent in &tents {
            if self.contains(tent) {
                placed.push(tent);
            } else {
                violations.push(Violation::OutOfBounds { tent });
            }
        }
        let occupied: HashSet<Cell> = placed.iter().copied().collect();

        for &tent in &placed {
            if self.is_tree(tent) {
                violations.push(Violation::OnTree { tent });
            }
        }

        for &first in &placed {
            for second in self.king_neighbors(first) {
                if second > first && occupied.contains(&second) {
                    violations.push(Violation::AdjacentTents { first, second });
                }
            }
        }

        for &tree in self.trees() {
            if !self.orthogonal_neighbors(tree).any(|n| occupied.contains(&n)) {
                violations.push(Violation::UncoveredTree { tree });
            }
        }
        for &tent in &placed {
            if !self.orthogonal_neighbors(tent).any(|n| self.is_tree(n)) {
                violations.push(Violation::UnattachedTent { tent });
            }
        }

        let mut row_counts = vec![0; self.rows()];
        let mut col_counts = vec![0; self.cols()];
        for tent in &placed {
            row_counts[tent.row] += 1;
            col_counts[tent.col] += 1;
        }
        for (row, (&actual, &expected)) in row_counts.iter().zip(self.row_sums()).enumerate() {
            if actual != expected {
                violations.push(Violation::RowCount {
                    row,
                    expected,
                    actual,
                });
            }
        }
        for (col, (&actual, &expected)) in col_counts.iter().zip(self.col_sums()).enumerate() {
            if actual != expected {
                violations.push(Violation::ColumnCount {
                    col,
                    expected,
                    actual,
                });
            }
        }

        ValidationReport::from_violations(violations)
    }
}
