//! CP variable types.

use std::fmt;

/// Handle to a variable of a [`LinearModel`](super::LinearModel).
///
/// Issued by [`LinearModel::add_bool_var`](super::LinearModel::add_bool_var);
/// wraps the variable's position in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in its model.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A boolean (0/1) decision variable.
///
/// # Examples
///
/// ```
/// use tents_trees::cp::BoolVar;
///
/// let free = BoolVar::new("x_0_1");
/// assert!(!free.is_fixed());
///
/// let fixed = BoolVar::fixed("x_2_2", false);
/// assert_eq!(fixed.fixed, Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolVar {
    /// Variable name, used in exports and diagnostics.
    pub name: String,
    /// Fixed value, if any.
    pub fixed: Option<bool>,
}

impl BoolVar {
    /// Creates a free boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a boolean variable fixed to `value`.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_var() {
        let b = BoolVar::new("flag");
        assert!(b.fixed.is_none());
        assert!(!b.is_fixed());

        let f = BoolVar::fixed("flag2", true);
        assert_eq!(f.fixed, Some(true));
        assert!(f.is_fixed());
    }

    #[test]
    fn test_var_id() {
        let id = VarId(3);
        assert_eq!(id.index(), 3);
        assert_eq!(id.to_string(), "#3");
    }
}
