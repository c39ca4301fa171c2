//! CP model definition.

use std::collections::HashSet;
use std::fmt;

use super::variables::{BoolVar, VarId};

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs >= rhs`
    GreaterEq,
    /// `lhs = rhs`
    Equal,
}

impl Sense {
    /// Whether `lhs (sense) rhs` holds.
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Sense::LessEq => lhs <= rhs,
            Sense::GreaterEq => lhs >= rhs,
            Sense::Equal => lhs == rhs,
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::LessEq => "<=",
            Sense::GreaterEq => ">=",
            Sense::Equal => "=",
        })
    }
}

/// A linear constraint `sum(coef * var) (sense) rhs` over boolean variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    /// Constraint name, used in exports and diagnostics.
    pub name: String,
    /// `(variable, coefficient)` pairs.
    pub terms: Vec<(VarId, i64)>,
    /// Relation to the right-hand side.
    pub sense: Sense,
    /// Right-hand side.
    pub rhs: i64,
}

impl LinearConstraint {
    /// Creates a constraint from explicit terms.
    pub fn new(name: impl Into<String>, terms: Vec<(VarId, i64)>, sense: Sense, rhs: i64) -> Self {
        Self {
            name: name.into(),
            terms,
            sense,
            rhs,
        }
    }

    /// `sum(vars) (sense) rhs` with unit coefficients.
    pub fn unit(
        name: impl Into<String>,
        vars: impl IntoIterator<Item = VarId>,
        sense: Sense,
        rhs: i64,
    ) -> Self {
        Self::new(name, vars.into_iter().map(|v| (v, 1)).collect(), sense, rhs)
    }

    /// Value of the left-hand side under a full assignment, `None` on overflow.
    pub fn activity(&self, values: &[bool]) -> Option<i64> {
        self.terms
            .iter()
            .filter(|(var, _)| values[var.0])
            .try_fold(0i64, |acc, &(_, coef)| acc.checked_add(coef))
    }

    /// Whether a full assignment satisfies this constraint.
    ///
    /// An overflowing left-hand side counts as unsatisfied.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        self.activity(values)
            .is_some_and(|lhs| self.sense.holds(lhs, self.rhs))
    }
}

/// Objective function for the CP model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    /// Minimize a linear combination of boolean variables.
    Minimize {
        /// `(variable, coefficient)` pairs.
        terms: Vec<(VarId, i64)>,
    },

    /// Maximize a linear combination of boolean variables.
    Maximize {
        /// `(variable, coefficient)` pairs.
        terms: Vec<(VarId, i64)>,
    },
}

impl Objective {
    /// The objective's terms.
    pub fn terms(&self) -> &[(VarId, i64)] {
        match self {
            Objective::Minimize { terms } | Objective::Maximize { terms } => terms,
        }
    }

    /// Objective value under a full assignment, `None` on overflow.
    pub fn evaluate(&self, values: &[bool]) -> Option<i64> {
        self.terms()
            .iter()
            .filter(|(var, _)| values[var.0])
            .try_fold(0i64, |acc, &(_, coef)| acc.checked_add(coef))
    }
}

/// A binary linear model: boolean variables, linear constraints and an
/// optional linear objective.
///
/// Without an objective the model is a pure feasibility problem.
///
/// # Examples
///
/// ```
/// use tents_trees::cp::{BoolVar, LinearModel, Sense};
///
/// let mut model = LinearModel::new("example");
/// let x = model.add_bool_var(BoolVar::new("x"));
/// let y = model.add_bool_var(BoolVar::new("y"));
/// model.add_unit("pick_one", [x, y], Sense::Equal, 1);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.var_count(), 2);
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    /// Model name.
    pub name: String,
    vars: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Objective function.
    pub objective: Option<Objective>,
}

impl LinearModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.vars.push(var);
        VarId(self.vars.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add `sum(vars) (sense) rhs` with unit coefficients.
    pub fn add_unit(
        &mut self,
        name: impl Into<String>,
        vars: impl IntoIterator<Item = VarId>,
        sense: Sense,
        rhs: i64,
    ) {
        self.constraints
            .push(LinearConstraint::unit(name, vars, sense, rhs));
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// All variables, indexed by [`VarId::index`].
    pub fn vars(&self) -> &[BoolVar] {
        &self.vars
    }

    /// The variable behind `id`.
    pub fn var(&self, id: VarId) -> Option<&BoolVar> {
        self.vars.get(id.0)
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists, that no constraint
    /// repeats a variable, and that variable names are unique.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::with_capacity(self.vars.len());
        for var in &self.vars {
            if !names.insert(var.name.as_str()) {
                return Err(format!("duplicate variable name: {}", var.name));
            }
        }

        for constraint in &self.constraints {
            self.check_terms(&constraint.name, &constraint.terms)?;
        }
        if let Some(objective) = &self.objective {
            self.check_terms("objective", objective.terms())?;
        }
        Ok(())
    }

    /// Checks a full assignment: one value per variable, fixed variables
    /// at their value, every constraint satisfied.
    ///
    /// Reports the first problem found.
    pub fn check_assignment(&self, values: &[bool]) -> Result<(), String> {
        if values.len() != self.vars.len() {
            return Err(format!(
                "expected {} values, got {}",
                self.vars.len(),
                values.len()
            ));
        }
        for (var, &value) in self.vars.iter().zip(values) {
            if var.fixed.is_some_and(|fixed| fixed != value) {
                return Err(format!("fixed variable {} changed", var.name));
            }
        }
        match self.constraints.iter().find(|c| !c.is_satisfied_by(values)) {
            Some(c) => Err(format!("constraint {} is violated", c.name)),
            None => Ok(()),
        }
    }

    fn check_terms(&self, owner: &str, terms: &[(VarId, i64)]) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(terms.len());
        for (var, _) in terms {
            if var.0 >= self.vars.len() {
                return Err(format!("{owner}: undefined variable {var}"));
            }
            if !seen.insert(var.0) {
                return Err(format!(
                    "{owner}: variable {} appears more than once",
                    self.vars[var.0].name
                ));
            }
        }
        Ok(())
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
