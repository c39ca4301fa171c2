//! Backtracking search with bounds propagation.
//!
//! # Algorithm
//!
//! 1. Fix preset variables and queue every constraint
//! 2. At each step:
//!    a. Propagate queued constraints to a fixpoint
//!    b. On a conflict, undo to the latest decision with an untried value
//!    c. Otherwise branch (value `true` first) on a free variable of the open
//!       constraint with the fewest free variables
//!    d. On a complete assignment, report it, or tighten the objective bound
//!       and keep searching
//! 3. Terminate when the tree is exhausted or the time limit is hit
//!
//! Propagation works on the minimum and maximum activity of each constraint
//! under the partial assignment: a free variable whose value would push the
//! activity past a bound is fixed to the other value.

use std::collections::VecDeque;
use std::time::Instant;

use tracing::{debug, info};

use super::model::{LinearModel, Objective, Sense};
use super::solver::{CpSolution, CpSolver, SearchStats, SolverConfig, SolverOutcome};
use super::variables::VarId;
use crate::error::BackendError;

/// Exact solver for binary linear models.
///
/// Complete: it either finds an assignment, proves there is none, or runs
/// out of time. With an objective it proves optimality by branch and bound.
///
/// # Examples
///
/// ```
/// use tents_trees::cp::{BacktrackingSolver, BoolVar, CpSolver, LinearModel, Sense, SolverConfig};
///
/// let mut model = LinearModel::new("pick");
/// let x = model.add_bool_var(BoolVar::new("x"));
/// let y = model.add_bool_var(BoolVar::new("y"));
/// model.add_unit("one", [x, y], Sense::Equal, 1);
///
/// let outcome = BacktrackingSolver::new()
///     .solve(&model, &SolverConfig::default())
///     .unwrap();
/// let solution = outcome.solution().unwrap();
/// assert!(solution.value(x) ^ solution.value(y));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktrackingSolver {
    clock_check_mask: u64,
    progress_interval: u64,
}

impl BacktrackingSolver {
    /// Check the clock every 1,024 steps (2^10).
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FF;
    const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

    /// Creates a solver with default settings.
    pub fn new() -> Self {
        Self {
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
            progress_interval: Self::DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Sets how often the clock is read: every step where
    /// `steps & mask == 0`. Use `0` to read it on every step.
    pub fn with_clock_check_mask(mut self, mask: u64) -> Self {
        self.clock_check_mask = mask;
        self
    }

    /// Sets the number of steps between verbose progress events.
    pub fn with_progress_interval(mut self, steps: u64) -> Self {
        self.progress_interval = steps.max(1);
        self
    }
}

impl Default for BacktrackingSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for BacktrackingSolver {
    fn name(&self) -> &str {
        "backtracking"
    }

    fn solve(
        &self,
        model: &LinearModel,
        config: &SolverConfig,
    ) -> Result<SolverOutcome, BackendError> {
        model.validate().map_err(BackendError::InvalidModel)?;
        Ok(Search::new(model, config, *self)?.run())
    }
}

/// A constraint as `lower <= sum(coef * var) <= upper`.
#[derive(Debug)]
struct Row {
    terms: Vec<(usize, i64)>,
    lower: Option<i64>,
    upper: Option<i64>,
}

impl Row {
    fn new(
        name: &str,
        terms: &[(VarId, i64)],
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<Self, BackendError> {
        // Every partial activity is bounded by the sum of magnitudes, so
        // checking it once keeps all later arithmetic in range.
        terms
            .iter()
            .try_fold(0i64, |acc, &(_, coef)| acc.checked_add(coef.checked_abs()?))
            .ok_or_else(|| BackendError::Overflow {
                constraint: name.to_string(),
            })?;

        Ok(Self {
            terms: terms.iter().map(|&(var, coef)| (var.index(), coef)).collect(),
            lower,
            upper,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    var: usize,
    value: bool,
    trail_len: usize,
    flipped: bool,
}

struct Search<'a> {
    config: &'a SolverConfig,
    settings: BacktrackingSolver,
    objective: Option<&'a Objective>,
    rows: Vec<Row>,
    /// Rows each variable appears in.
    occurs: Vec<Vec<usize>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    decisions: Vec<Decision>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
    stats: SearchStats,
    steps: u64,
    start: Instant,
}

impl<'a> Search<'a> {
    fn new(
        model: &'a LinearModel,
        config: &'a SolverConfig,
        settings: BacktrackingSolver,
    ) -> Result<Self, BackendError> {
        let mut rows = Vec::with_capacity(model.constraint_count() + 1);
        for constraint in &model.constraints {
            let rhs = Some(constraint.rhs);
            let (lower, upper) = match constraint.sense {
                Sense::LessEq => (None, rhs),
                Sense::GreaterEq => (rhs, None),
                Sense::Equal => (rhs, rhs),
            };
            rows.push(Row::new(&constraint.name, &constraint.terms, lower, upper)?);
        }
        // The objective is a bound row, open until a first solution exists.
        let objective = model.objective.as_ref();
        if let Some(objective) = objective {
            rows.push(Row::new("objective", objective.terms(), None, None)?);
        }

        let mut occurs = vec![Vec::new(); model.var_count()];
        for (r, row) in rows.iter().enumerate() {
            for &(var, _) in &row.terms {
                occurs[var].push(r);
            }
        }

        let row_count = rows.len();
        let mut search = Self {
            config,
            settings,
            objective,
            rows,
            occurs,
            values: vec![None; model.var_count()],
            trail: Vec::new(),
            decisions: Vec::new(),
            queue: (0..row_count).collect(),
            queued: vec![true; row_count],
            stats: SearchStats::default(),
            steps: 0,
            start: Instant::now(),
        };
        for (var, bool_var) in model.vars().iter().enumerate() {
            if let Some(value) = bool_var.fixed {
                search.assign(var, value);
            }
        }
        Ok(search)
    }

    fn run(mut self) -> SolverOutcome {
        if self.config.verbose {
            info!(
                event = "search_start",
                variables = self.values.len(),
                constraints = self.rows.len(),
            );
        } else {
            debug!(
                event = "search_start",
                variables = self.values.len(),
                constraints = self.rows.len(),
            );
        }

        let mut best: Option<CpSolution> = None;
        loop {
            if self.out_of_time() {
                let stats = self.current_stats();
                self.log_end("time_limit", &stats);
                return match best {
                    Some(solution) => SolverOutcome::Feasible(solution),
                    None => SolverOutcome::TimeLimitReached { stats },
                };
            }
            self.steps += 1;
            self.report_progress();

            if self.propagate() {
                if let Some(var) = self.pick_branch_var() {
                    self.stats.nodes += 1;
                    self.decisions.push(Decision {
                        var,
                        value: true,
                        trail_len: self.trail.len(),
                        flipped: false,
                    });
                    self.assign(var, true);
                    continue;
                }

                self.stats.solutions += 1;
                let solution = self.snapshot();
                match (self.objective, solution.objective_value) {
                    (Some(objective), Some(value)) if !self.config.stop_after_first => {
                        debug!(event = "incumbent", objective = value);
                        self.tighten(objective, value);
                        best = Some(solution);
                    }
                    _ => {
                        self.log_end("feasible", &solution.stats);
                        return SolverOutcome::Feasible(solution);
                    }
                }
            }

            if !self.backtrack() {
                let stats = self.current_stats();
                return match best {
                    Some(solution) => {
                        self.log_end("optimal", &stats);
                        SolverOutcome::Optimal(solution)
                    }
                    None => {
                        self.log_end("infeasible", &stats);
                        SolverOutcome::Infeasible
                    }
                };
            }
        }
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
        for &r in &self.occurs[var] {
            if !self.queued[r] {
                self.queued[r] = true;
                self.queue.push_back(r);
            }
        }
    }

    fn enqueue(&mut self, r: usize) {
        if !self.queued[r] {
            self.queued[r] = true;
            self.queue.push_back(r);
        }
    }

    /// Runs queued rows to a fixpoint. Returns `false` on a conflict.
    fn propagate(&mut self) -> bool {
        while let Some(r) = self.queue.pop_front() {
            self.queued[r] = false;
            if !self.propagate_row(r) {
                for r in self.queue.drain(..) {
                    self.queued[r] = false;
                }
                return false;
            }
        }
        true
    }

    fn propagate_row(&mut self, r: usize) -> bool {
        let (min, max) = self.activity_bounds(r);
        let row = &self.rows[r];
        if row.upper.is_some_and(|u| min > u) || row.lower.is_some_and(|l| max < l) {
            return false;
        }

        // Forcing a variable never moves `min` or `max`: the forced value is
        // the one both bounds already assume.
        let mut forced = Vec::new();
        for &(var, coef) in &row.terms {
            if coef == 0 || self.values[var].is_some() {
                continue;
            }
            let magnitude = coef.abs();
            let raising_value = coef > 0;
            let cannot_raise = row.upper.is_some_and(|u| min + magnitude > u);
            let cannot_lower = row.lower.is_some_and(|l| max - magnitude < l);
            match (cannot_raise, cannot_lower) {
                (true, true) => return false,
                (true, false) => forced.push((var, !raising_value)),
                (false, true) => forced.push((var, raising_value)),
                (false, false) => {}
            }
        }

        for (var, value) in forced {
            self.stats.propagations += 1;
            self.assign(var, value);
        }
        true
    }

    /// Minimum and maximum activity of row `r` under the partial assignment.
    fn activity_bounds(&self, r: usize) -> (i64, i64) {
        let mut min = 0;
        let mut max = 0;
        for &(var, coef) in &self.rows[r].terms {
            match self.values[var] {
                Some(true) => {
                    min += coef;
                    max += coef;
                }
                Some(false) => {}
                None if coef < 0 => min += coef,
                None => max += coef,
            }
        }
        (min, max)
    }

    /// First-fail: a free variable of the open row with fewest free variables.
    fn pick_branch_var(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (r, row) in self.rows.iter().enumerate() {
            let (min, max) = self.activity_bounds(r);
            let entailed =
                row.upper.is_none_or(|u| max <= u) && row.lower.is_none_or(|l| min >= l);
            if entailed {
                continue;
            }

            let mut free = row
                .terms
                .iter()
                .map(|&(var, _)| var)
                .filter(|&var| self.values[var].is_none());
            let Some(first) = free.next() else {
                continue;
            };
            let count = 1 + free.count();
            if best.is_none_or(|(best_count, _)| count < best_count) {
                best = Some((count, first));
            }
        }

        best.map(|(_, var)| var)
            .or_else(|| self.values.iter().position(Option::is_none))
    }

    /// Undoes decisions until one can be flipped. Returns `false` when the
    /// search tree is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            self.undo_to(decision.trail_len);
            self.stats.backtracks += 1;
            if !decision.flipped {
                self.decisions.push(Decision {
                    value: !decision.value,
                    flipped: true,
                    ..decision
                });
                self.assign(decision.var, !decision.value);
                if self.objective.is_some() {
                    // The bound may have tightened since this level was propagated.
                    self.enqueue(self.rows.len() - 1);
                }
                return true;
            }
        }
        false
    }

    fn undo_to(&mut self, trail_len: usize) {
        while self.trail.len() > trail_len {
            if let Some(var) = self.trail.pop() {
                self.values[var] = None;
            }
        }
    }

    fn tighten(&mut self, objective: &Objective, value: i64) {
        let r = self.rows.len() - 1;
        match objective {
            Objective::Minimize { .. } => self.rows[r].upper = Some(value.saturating_sub(1)),
            Objective::Maximize { .. } => self.rows[r].lower = Some(value.saturating_add(1)),
        }
        self.enqueue(r);
    }

    fn snapshot(&self) -> CpSolution {
        let values: Vec<bool> = self.values.iter().map(|v| v.unwrap_or(false)).collect();
        debug_assert!(
            self.rows.iter().all(|row| {
                let lhs: i64 = row
                    .terms
                    .iter()
                    .filter(|&&(var, _)| values[var])
                    .map(|&(_, coef)| coef)
                    .sum();
                row.lower.is_none_or(|l| lhs >= l) && row.upper.is_none_or(|u| lhs <= u)
            }),
            "complete assignment violates a row"
        );
        CpSolution {
            objective_value: self.objective.and_then(|o| o.evaluate(&values)),
            values,
            stats: self.current_stats(),
        }
    }

    fn current_stats(&self) -> SearchStats {
        SearchStats {
            elapsed: self.start.elapsed(),
            ..self.stats
        }
    }

    fn out_of_time(&self) -> bool {
        let Some(limit) = self.config.time_limit else {
            return false;
        };
        (self.steps & self.settings.clock_check_mask) == 0 && self.start.elapsed() >= limit
    }

    fn report_progress(&self) {
        if self.config.verbose && self.steps % self.settings.progress_interval == 0 {
            info!(
                event = "search_progress",
                steps = self.steps,
                nodes = self.stats.nodes,
                backtracks = self.stats.backtracks,
                depth = self.decisions.len(),
                elapsed_ms = self.current_stats().elapsed_ms(),
            );
        }
    }

    fn log_end(&self, outcome: &str, stats: &SearchStats) {
        let elapsed_ms = stats.elapsed_ms();
        if self.config.verbose {
            info!(
                event = "search_end",
                outcome,
                nodes = stats.nodes,
                backtracks = stats.backtracks,
                propagations = stats.propagations,
                elapsed_ms,
            );
        } else {
            debug!(
                event = "search_end",
                outcome,
                nodes = stats.nodes,
                backtracks = stats.backtracks,
                propagations = stats.propagations,
                elapsed_ms,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BoolVar, LinearConstraint};
    use std::time::Duration;

    fn solve(model: &LinearModel) -> SolverOutcome {
        BacktrackingSolver::new()
            .solve(model, &SolverConfig::default())
            .unwrap()
    }

    fn vars(model: &mut LinearModel, names: &[&str]) -> Vec<VarId> {
        names
            .iter()
            .map(|n| model.add_bool_var(BoolVar::new(*n)))
            .collect()
    }

    fn assert_satisfies(model: &LinearModel, solution: &CpSolution) {
        for c in &model.constraints {
            assert!(c.is_satisfied_by(&solution.values), "violates {}", c.name);
        }
    }

    #[test]
    fn test_exactly_one() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b", "c"]);
        model.add_unit("one", v.clone(), Sense::Equal, 1);

        let outcome = solve(&model);
        let solution = outcome.solution().expect("feasible");
        assert_eq!(solution.true_vars().count(), 1);
        assert_satisfies(&model, solution);
        assert!(matches!(outcome, SolverOutcome::Feasible(_)));
    }

    #[test]
    fn test_infeasible_sum() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_unit("too_many", v, Sense::GreaterEq, 3);
        assert_eq!(solve(&model), SolverOutcome::Infeasible);
    }

    #[test]
    fn test_parity_conflict() {
        // 2a = 1 has no 0/1 solution; both bounds force opposite values.
        let mut model = LinearModel::new("test");
        let a = model.add_bool_var(BoolVar::new("a"));
        model.add_constraint(LinearConstraint::new("odd", vec![(a, 2)], Sense::Equal, 1));
        assert_eq!(solve(&model), SolverOutcome::Infeasible);
    }

    #[test]
    fn test_empty_constraint() {
        let mut model = LinearModel::new("test");
        vars(&mut model, &["a"]);
        model.add_unit("nothing", [], Sense::GreaterEq, 1);
        assert_eq!(solve(&model), SolverOutcome::Infeasible);

        let empty = LinearModel::new("empty");
        let outcome = solve(&empty);
        assert_eq!(outcome.solution().map(|s| s.values.len()), Some(0));
    }

    #[test]
    fn test_fixed_variable() {
        let mut model = LinearModel::new("test");
        let a = model.add_bool_var(BoolVar::fixed("a", false));
        let b = model.add_bool_var(BoolVar::new("b"));
        model.add_unit("one", [a, b], Sense::Equal, 1);

        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert!(!solution.value(a));
        assert!(solution.value(b));
    }

    #[test]
    fn test_negative_coefficients() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_constraint(LinearConstraint::new(
            "diff",
            vec![(v[0], 1), (v[1], -1)],
            Sense::GreaterEq,
            1,
        ));

        let outcome = solve(&model);
        let solution = outcome.solution().unwrap();
        assert!(solution.value(v[0]));
        assert!(!solution.value(v[1]));
    }

    #[test]
    fn test_pigeonhole_is_infeasible() {
        // 4 pigeons, 3 holes.
        let mut model = LinearModel::new("pigeonhole");
        let mut x = Vec::new();
        for p in 0..4 {
            let row: Vec<VarId> = (0..3)
                .map(|h| model.add_bool_var(BoolVar::new(format!("x_{p}_{h}"))))
                .collect();
            model.add_unit(format!("pigeon_{p}"), row.clone(), Sense::Equal, 1);
            x.push(row);
        }
        for h in 0..3 {
            model.add_unit(format!("hole_{h}"), x.iter().map(|row| row[h]), Sense::LessEq, 1);
        }

        let outcome = BacktrackingSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap();
        assert_eq!(outcome, SolverOutcome::Infeasible);
    }

    #[test]
    fn test_minimize_proves_optimum() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b", "c"]);
        model.add_unit("two", v.clone(), Sense::GreaterEq, 2);
        model.set_objective(Objective::Minimize {
            terms: vec![(v[0], 3), (v[1], 2), (v[2], 1)],
        });

        match solve(&model) {
            SolverOutcome::Optimal(solution) => {
                assert_eq!(solution.objective_value, Some(3));
                assert!(!solution.value(v[0]));
                assert!(solution.stats.solutions >= 1);
            }
            other => panic!("expected optimal, got {other:?}"),
        }
    }

    #[test]
    fn test_maximize_proves_optimum() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b", "c"]);
        model.add_unit("ab", [v[0], v[1]], Sense::LessEq, 1);
        model.add_unit("bc", [v[1], v[2]], Sense::LessEq, 1);
        model.set_objective(Objective::Maximize {
            terms: vec![(v[0], 2), (v[1], 3), (v[2], 2)],
        });

        match solve(&model) {
            SolverOutcome::Optimal(solution) => {
                assert_eq!(solution.objective_value, Some(4));
                assert!(solution.value(v[0]) && solution.value(v[2]));
            }
            other => panic!("expected optimal, got {other:?}"),
        }
    }

    #[test]
    fn test_stop_after_first() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_unit("any", v.clone(), Sense::GreaterEq, 1);
        model.set_objective(Objective::Minimize {
            terms: vec![(v[0], 1), (v[1], 1)],
        });

        let config = SolverConfig::default().with_stop_after_first(true);
        let outcome = BacktrackingSolver::new().solve(&model, &config).unwrap();
        assert!(matches!(outcome, SolverOutcome::Feasible(_)));
        assert_eq!(outcome.solution().unwrap().stats.solutions, 1);
    }

    #[test]
    fn test_zero_time_limit() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_unit("one", v, Sense::Equal, 1);

        let config = SolverConfig::default().with_time_limit(Duration::ZERO);
        let outcome = BacktrackingSolver::new().solve(&model, &config).unwrap();
        assert!(matches!(outcome, SolverOutcome::TimeLimitReached { .. }));
    }

    #[test]
    fn test_generous_time_limit_still_solves() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_unit("one", v, Sense::Equal, 1);

        let config = SolverConfig::default()
            .with_time_limit(Duration::from_secs(60))
            .with_verbose(true);
        let solver = BacktrackingSolver::new()
            .with_clock_check_mask(0)
            .with_progress_interval(1);
        assert!(solver.solve(&model, &config).unwrap().is_solution_found());
    }

    #[test]
    fn test_invalid_model_is_backend_error() {
        let mut model = LinearModel::new("test");
        model.add_constraint(LinearConstraint::new("bad", vec![(VarId(3), 1)], Sense::Equal, 1));

        let err = BacktrackingSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidModel(_)));
    }

    #[test]
    fn test_overflow_is_backend_error() {
        let mut model = LinearModel::new("test");
        let v = vars(&mut model, &["a", "b"]);
        model.add_constraint(LinearConstraint::new(
            "big",
            vec![(v[0], i64::MAX), (v[1], i64::MAX)],
            Sense::LessEq,
            0,
        ));

        let err = BacktrackingSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::Overflow {
                constraint: "big".into()
            }
        );
    }
}
