//! Translation of a puzzle into a binary linear model.
//!
//! One variable `x_r_c` per cell that is free of trees and touches a tree
//! on an edge. Restricting the variables this way makes the tent-attachment
//! rule hold by construction. On top of that:
//!
//! - `row_r`: `sum(x in row r) = row_sums[r]`
//! - `col_c`: `sum(x in column c) = col_sums[c]`
//! - `adj_r1_c1_r2_c2`: `x_a + x_b <= 1` for every touching pair, diagonals included
//! - `tree_r_c`: `sum(x next to the tree) >= 1`
//!
//! There is no objective; any feasible assignment is a solution.

use std::collections::{BTreeSet, HashMap};

use super::types::{ConstraintCounts, ModelSummary};
use crate::cp::{BoolVar, CpSolution, LinearModel, Sense, VarId};
use crate::puzzle::{Cell, Puzzle};

/// The model for one puzzle together with the cell behind each variable.
///
/// Built eagerly and owned by a single solve call.
#[derive(Debug, Clone)]
pub struct TentsFormulation {
    model: LinearModel,
    /// `cells[v.index()]` is the cell of variable `v`.
    cells: Vec<Cell>,
    counts: ConstraintCounts,
}

impl TentsFormulation {
    /// Builds every variable and constraint for `puzzle`.
    pub fn build(puzzle: &Puzzle) -> Self {
        let mut model = LinearModel::new("tents_and_trees");
        let cells: Vec<Cell> = puzzle.attachable_cells().collect();
        let mut var_of: HashMap<Cell, VarId> = HashMap::with_capacity(cells.len());
        for &cell in &cells {
            let var = model.add_bool_var(BoolVar::new(format!("x_{}_{}", cell.row, cell.col)));
            var_of.insert(cell, var);
        }

        let mut by_row = vec![Vec::new(); puzzle.rows()];
        let mut by_col = vec![Vec::new(); puzzle.cols()];
        for &cell in &cells {
            by_row[cell.row].push(var_of[&cell]);
            by_col[cell.col].push(var_of[&cell]);
        }
        for (row, (vars, &target)) in by_row.into_iter().zip(puzzle.row_sums()).enumerate() {
            model.add_unit(format!("row_{row}"), vars, Sense::Equal, to_rhs(target));
        }
        for (col, (vars, &target)) in by_col.into_iter().zip(puzzle.col_sums()).enumerate() {
            model.add_unit(format!("col_{col}"), vars, Sense::Equal, to_rhs(target));
        }

        let mut adjacency = 0;
        for &a in &cells {
            for b in puzzle.king_neighbors(a).filter(|&b| b > a) {
                if let Some(&var_b) = var_of.get(&b) {
                    model.add_unit(
                        format!("adj_{}_{}_{}_{}", a.row, a.col, b.row, b.col),
                        [var_of[&a], var_b],
                        Sense::LessEq,
                        1,
                    );
                    adjacency += 1;
                }
            }
        }

        for &tree in puzzle.trees() {
            let neighbors: Vec<VarId> = puzzle
                .orthogonal_neighbors(tree)
                .filter_map(|n| var_of.get(&n).copied())
                .collect();
            model.add_unit(
                format!("tree_{}_{}", tree.row, tree.col),
                neighbors,
                Sense::GreaterEq,
                1,
            );
        }

        let counts = ConstraintCounts {
            row: puzzle.rows(),
            column: puzzle.cols(),
            adjacency,
            coverage: puzzle.trees().len(),
        };
        Self {
            model,
            cells,
            counts,
        }
    }

    /// The binary linear model.
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Candidate cells, in variable order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Variable and constraint counts.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            variables: self.cells.len(),
            constraints: self.counts,
        }
    }

    /// Tent cells of an assignment.
    pub fn decode(&self, solution: &CpSolution) -> BTreeSet<Cell> {
        solution.true_vars().map(|v| self.cells[v.index()]).collect()
    }
}

/// Tent targets beyond `i64::MAX` cannot be met by any grid; saturate.
fn to_rhs(target: usize) -> i64 {
    i64::try_from(target).unwrap_or(i64::MAX)
}
