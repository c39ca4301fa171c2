//! CPLEX LP format export.

use std::fmt::{self, Write};

use super::model::{LinearModel, Objective};
use super::variables::VarId;

impl LinearModel {
    /// Writes the model in CPLEX LP format.
    ///
    /// Feasibility models get an empty `Minimize` objective. Fixed variables
    /// are written as equality bounds.
    pub fn write_lp<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "\\ Model: {}", self.name)?;

        let (heading, terms): (&str, &[(VarId, i64)]) = match &self.objective {
            Some(Objective::Maximize { terms }) => ("Maximize", terms),
            Some(Objective::Minimize { terms }) => ("Minimize", terms),
            None => ("Minimize", &[]),
        };
        writeln!(out, "{heading}")?;
        write!(out, " obj:")?;
        if !terms.is_empty() {
            write!(out, " ")?;
            self.write_terms(out, terms)?;
        }
        writeln!(out)?;

        writeln!(out, "Subject To")?;
        for c in &self.constraints {
            write!(out, " {}: ", c.name)?;
            self.write_terms(out, &c.terms)?;
            writeln!(out, " {} {}", c.sense, c.rhs)?;
        }

        let fixed: Vec<_> = self.vars().iter().filter(|v| v.is_fixed()).collect();
        if !fixed.is_empty() {
            writeln!(out, "Bounds")?;
            for var in fixed {
                writeln!(out, " {} = {}", var.name, u8::from(var.fixed == Some(true)))?;
            }
        }

        if !self.vars().is_empty() {
            writeln!(out, "Binaries")?;
            for var in self.vars() {
                writeln!(out, " {}", var.name)?;
            }
        }
        writeln!(out, "End")
    }

    /// The model in CPLEX LP format.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_lp(&mut out);
        out
    }

    fn write_terms<W: Write>(&self, out: &mut W, terms: &[(VarId, i64)]) -> fmt::Result {
        if terms.is_empty() {
            // LP rows need a variable; a zero multiple of any one will do.
            return match self.vars().first() {
                Some(var) => write!(out, "0 {}", var.name),
                None => write!(out, "0"),
            };
        }

        for (i, &(var, coef)) in terms.iter().enumerate() {
            let name = self.var(var).map_or("?", |v| v.name.as_str());
            let sign = if coef < 0 { "-" } else { "+" };
            if i == 0 {
                if coef < 0 {
                    write!(out, "- ")?;
                }
            } else {
                write!(out, " {sign} ")?;
            }
            match coef.unsigned_abs() {
                1 => write!(out, "{name}")?,
                magnitude => write!(out, "{magnitude} {name}")?,
            }
        }
        Ok(())
    }
}
