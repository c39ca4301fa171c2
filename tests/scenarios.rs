//! End-to-end puzzle scenarios through the public API.

use std::collections::BTreeSet;
use std::time::Duration;

use tents_trees::puzzle::{Cell, Puzzle, Violation};
use tents_trees::solver::{describe_model, export_model, solve, SolveOptions, TentsSolver};
use tents_trees::{InvalidPuzzleError, SolveError};

fn cells(coords: &[(usize, usize)]) -> BTreeSet<Cell> {
    coords.iter().copied().map(Cell::from).collect()
}

fn five_by_five() -> Puzzle {
    Puzzle::new(
        vec![1, 1, 0, 2, 1],
        vec![2, 0, 1, 1, 1],
        [(1, 1), (1, 3), (3, 0), (3, 1), (4, 4)],
    )
    .unwrap()
}

fn seven_by_seven() -> Puzzle {
    Puzzle::new(
        vec![2, 1, 2, 1, 2, 2, 0],
        vec![2, 1, 2, 1, 1, 1, 2],
        [
            (0, 0),
            (1, 2),
            (1, 6),
            (2, 4),
            (3, 0),
            (4, 2),
            (4, 5),
            (4, 6),
            (5, 0),
            (6, 2),
        ],
    )
    .unwrap()
}

#[test]
fn test_solve_five_by_five() {
    let puzzle = five_by_five();
    let tents = solve(&puzzle, &SolveOptions::default()).unwrap();

    assert_eq!(tents.len(), 5);
    assert_eq!(tents, cells(&[(0, 3), (1, 0), (3, 2), (3, 4), (4, 0)]));

    let report = puzzle.validate_solution(&tents);
    assert!(report.is_valid());
    assert!(report.violations.is_empty());
}

#[test]
fn test_infeasible_row_total() {
    let puzzle = Puzzle::new(
        vec![1, 1, 0, 2, 5],
        vec![2, 0, 1, 1, 1],
        [(1, 1), (1, 3), (3, 0), (3, 1), (4, 4)],
    )
    .unwrap();
    assert!(!puzzle.has_consistent_totals());

    let err = solve(&puzzle, &SolveOptions::default()).unwrap_err();
    assert_eq!(err, SolveError::NoSolution);
}

#[test]
fn test_tree_out_of_bounds() {
    let err = Puzzle::new(vec![1; 5], vec![1; 5], [(10, 10)]).unwrap_err();
    assert_eq!(
        err,
        InvalidPuzzleError::TreeOutOfBounds {
            row: 10,
            col: 10,
            rows: 5,
            cols: 5,
        }
    );
}

#[test]
fn test_diagonal_tents_are_rejected() {
    let puzzle = five_by_five();
    // The known solution with the tent at (4, 0) moved to (4, 1), which
    // touches (3, 2) at a corner.
    let tents = cells(&[(0, 3), (1, 0), (3, 2), (3, 4), (4, 1)]);

    let report = puzzle.validate_solution(&tents);
    assert!(!report.is_valid());
    assert!(report.violations.contains(&Violation::AdjacentTents {
        first: Cell::new(3, 2),
        second: Cell::new(4, 1),
    }));
    assert!(report
        .messages()
        .iter()
        .any(|m| m.contains("adjacent")));
}

#[test]
fn test_solve_seven_by_seven() {
    let puzzle = seven_by_seven();
    let summary = describe_model(&puzzle);
    assert_eq!(summary.variables, 29);
    assert_eq!(summary.constraints.adjacency, 54);
    assert_eq!(summary.constraints.total(), 78);

    let options = SolveOptions::default()
        .with_time_limit(Duration::from_secs(30))
        .with_verbose(true);
    let tents = TentsSolver::new().solve(&puzzle, &options).unwrap();
    assert_eq!(
        tents,
        cells(&[
            (0, 1),
            (0, 6),
            (1, 3),
            (2, 0),
            (2, 5),
            (3, 2),
            (4, 0),
            (4, 4),
            (5, 2),
            (5, 6),
        ])
    );
    assert!(puzzle.validate_solution(&tents).is_valid());
}

#[test]
fn test_tree_free_puzzle() {
    let empty = Puzzle::new(vec![0, 0], vec![0, 0, 0], Vec::new()).unwrap();
    assert_eq!(describe_model(&empty).variables, 0);
    assert_eq!(
        solve(&empty, &SolveOptions::default()).unwrap(),
        BTreeSet::new()
    );

    let wants_tent = Puzzle::new(vec![1, 0], vec![1, 0, 0], Vec::new()).unwrap();
    assert_eq!(
        solve(&wants_tent, &SolveOptions::default()).unwrap_err(),
        SolveError::NoSolution
    );
}

#[test]
fn test_boxed_in_tree_is_infeasible() {
    // (0, 0) is surrounded by trees; its coverage constraint has no terms.
    let puzzle = Puzzle::new(vec![0, 0], vec![0, 0], [(0, 0), (0, 1), (1, 0)]).unwrap();
    assert_eq!(
        solve(&puzzle, &SolveOptions::default()).unwrap_err(),
        SolveError::NoSolution
    );
}

#[test]
fn test_export_lists_every_constraint() {
    let puzzle = five_by_five();
    let lp = export_model(&puzzle);
    let rows = lp
        .lines()
        .skip_while(|line| *line != "Subject To")
        .skip(1)
        .take_while(|line| line.starts_with(' '))
        .count();
    assert_eq!(rows, describe_model(&puzzle).constraints.total());
    assert!(lp.trim_end().ends_with("End"));
}

#[test]
fn test_solve_all() {
    let puzzles = vec![five_by_five(), seven_by_seven()];
    let results = TentsSolver::new().solve_all(&puzzles, &SolveOptions::default());
    for (puzzle, result) in puzzles.iter().zip(&results) {
        let tents = result.as_ref().unwrap();
        assert!(puzzle.validate_solution(tents).is_valid());
    }
}
