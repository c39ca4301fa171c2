//! Model summaries.

use std::fmt;

/// Number of constraints per category in a tents model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintCounts {
    /// One equality per grid row.
    pub row: usize,
    /// One equality per grid column.
    pub column: usize,
    /// One `<= 1` per pair of touching candidate cells.
    pub adjacency: usize,
    /// One `>= 1` per tree.
    pub coverage: usize,
}

impl ConstraintCounts {
    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.row + self.column + self.adjacency + self.coverage
    }
}

/// Structure of the model built for a puzzle, without solving it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelSummary {
    /// One binary variable per candidate cell.
    pub variables: usize,
    /// Constraints by category.
    pub constraints: ConstraintCounts,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.constraints;
        write!(
            f,
            "{} variables, {} constraints (row {}, column {}, adjacency {}, coverage {})",
            self.variables,
            c.total(),
            c.row,
            c.column,
            c.adjacency,
            c.coverage
        )
    }
}

/// Backend name plus model structure for one puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverInfo {
    /// Name reported by the backend.
    pub backend: String,
    /// Model structure.
    pub model: ModelSummary,
}

impl fmt::Display for SolverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend {}: {}", self.backend, self.model)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_info_json() {
        let info = SolverInfo {
            backend: "backtracking".into(),
            model: ModelSummary {
                variables: 2,
                constraints: ConstraintCounts {
                    row: 2,
                    column: 2,
                    adjacency: 1,
                    coverage: 1,
                },
            },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["backend"], "backtracking");
        assert_eq!(json["model"]["constraints"]["adjacency"], 1);

        let back: SolverInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);
    }
}
