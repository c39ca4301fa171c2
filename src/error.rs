//! Error types for puzzle construction and solving.

use std::time::Duration;

use thiserror::Error;

/// Malformed puzzle input, raised by [`Puzzle::new`](crate::puzzle::Puzzle::new).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPuzzleError {
    /// The grid has no rows or no columns.
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    /// A tree lies outside `[0, rows) x [0, cols)`.
    #[error("tree at ({row}, {col}) is outside the {rows}x{cols} grid")]
    TreeOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The same tree coordinate was given twice.
    #[error("tree at ({row}, {col}) is listed more than once")]
    DuplicateTree { row: usize, col: usize },
}

/// Failure reported by a [`CpSolver`](crate::cp::CpSolver) backend.
///
/// Always a fault of the backend or of the model handed to it, never a
/// statement about puzzle feasibility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The model references unknown variables or is otherwise malformed.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A constraint activity does not fit in `i64`.
    #[error("arithmetic overflow while evaluating constraint `{constraint}`")]
    Overflow { constraint: String },

    /// The backend returned an assignment that violates the model.
    #[error("backend returned an invalid assignment: {0}")]
    InvalidAssignment(String),

    /// The backend reported an outcome its configuration rules out.
    #[error("backend reported an unexpected outcome: {0}")]
    UnexpectedOutcome(String),
}

/// Failure of a solve call.
///
/// `NoSolution` is a definitive answer, `Timeout` is inconclusive, and
/// `Backend` means the search itself broke down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The backend proved that no tent placement satisfies the puzzle.
    #[error("no solution exists")]
    NoSolution,

    /// The time limit elapsed before the search reached a definitive answer.
    #[error("time limit of {limit:?} reached without a definitive answer")]
    Timeout { limit: Duration },

    /// The optimization backend failed.
    #[error("backend error")]
    Backend(#[from] BackendError),
}

impl SolveError {
    /// Whether this error is a proof of infeasibility.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveError::NoSolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages() {
        let e = InvalidPuzzleError::TreeOutOfBounds {
            row: 10,
            col: 10,
            rows: 5,
            cols: 5,
        };
        assert_eq!(e.to_string(), "tree at (10, 10) is outside the 5x5 grid");
        assert_eq!(SolveError::NoSolution.to_string(), "no solution exists");
    }

    #[test]
    fn test_backend_source_is_kept() {
        let err = SolveError::from(BackendError::InvalidModel("x".into()));
        assert!(!err.is_infeasible());
        let source = err.source().expect("backend cause attached");
        assert_eq!(source.to_string(), "invalid model: x");
    }
}
