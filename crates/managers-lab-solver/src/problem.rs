use thiserror::Error;

/// Represents a linear programming problem over non-negative variables
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
    /// Optional upper bound per variable (lower bound is always 0)
    pub upper_bounds: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Objective has {found} coefficients but the problem has {expected} variables")]
    ObjectiveSize { expected: usize, found: usize },
    #[error("Constraint {name} has {found} coefficients but the problem has {expected} variables")]
    ConstraintSize {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
}

impl ConstraintOp {
    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl Constraint {
    /// Left-hand side value at the given point
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Whether the point satisfies this constraint within `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(values);
        match self.op {
            ConstraintOp::Le => lhs <= self.rhs + tolerance,
            ConstraintOp::Ge => lhs >= self.rhs - tolerance,
            ConstraintOp::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                minimize: true,
            },
            constraints: Vec::new(),
            upper_bounds: vec![None; n],
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective { coefficients, minimize };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    /// Bound variable `index` from above. `None` removes the bound.
    pub fn set_upper_bound(&mut self, index: usize, bound: Option<f64>) {
        if let Some(slot) = self.upper_bounds.get_mut(index) {
            *slot = bound;
        }
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Explicit constraints followed by one `x_j <= ub_j` row per bounded variable.
    pub fn rows(&self) -> Vec<Constraint> {
        let n = self.num_variables();
        let mut rows = self.constraints.clone();
        for (j, bound) in self.upper_bounds.iter().enumerate() {
            if let Some(ub) = bound {
                let mut coefficients = vec![0.0; n];
                coefficients[j] = 1.0;
                rows.push(Constraint {
                    name: format!("{} upper bound", self.variables[j]),
                    coefficients,
                    op: ConstraintOp::Le,
                    rhs: *ub,
                });
            }
        }
        rows
    }

    /// Check dimensions and finiteness before building a tableau
    pub fn validate(&self) -> Result<(), ProblemError> {
        let n = self.num_variables();
        if self.objective.coefficients.len() != n {
            return Err(ProblemError::ObjectiveSize {
                expected: n,
                found: self.objective.coefficients.len(),
            });
        }
        if self.objective.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }
        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintSize {
                    name: c.name.clone(),
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|x| !x.is_finite()) {
                return Err(ProblemError::NonFinite(c.name.clone()));
            }
        }
        for (j, bound) in self.upper_bounds.iter().enumerate() {
            if bound.is_some_and(|ub| !ub.is_finite()) {
                return Err(ProblemError::NonFinite(format!("{} upper bound", self.variables[j])));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_include_bounds() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.set_upper_bound(1, Some(3.0));

        let rows = problem.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "y upper bound");
        assert_eq!(rows[1].coefficients, vec![0.0, 1.0]);
        assert_eq!(rows[1].rhs, 3.0);
    }

    #[test]
    fn test_validate_size_mismatch() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.add_constraint("bad", vec![1.0, 2.0], ConstraintOp::Le, 1.0);
        assert!(matches!(
            problem.validate(),
            Err(ProblemError::ConstraintSize { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn test_is_satisfied() {
        let c = Constraint {
            name: "c".to_string(),
            coefficients: vec![2.0, 1.0],
            op: ConstraintOp::Ge,
            rhs: 5.0,
        };
        assert!(c.is_satisfied(&[2.0, 1.0], 1e-9));
        assert!(!c.is_satisfied(&[1.0, 1.0], 1e-9));
    }
}
