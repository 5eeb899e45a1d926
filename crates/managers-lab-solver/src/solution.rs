/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable (empty when no point was found)
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Detailed analysis
    pub analysis: Analysis,
    /// Constraint violations (populated when infeasible)
    pub violations: Vec<ConstraintViolation>,
    /// Simplex pivots performed across both phases
    pub iterations: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The solver stopped before reaching a verdict
    NotSolved,
}

impl SolutionStatus {
    /// Numeric status code, using the values common to LP modelling layers
    pub fn code(self) -> i32 {
        match self {
            SolutionStatus::Optimal => 1,
            SolutionStatus::NotSolved => 0,
            SolutionStatus::Infeasible => -1,
            SolutionStatus::Unbounded => -2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::NotSolved => "Not Solved",
        }
    }

    pub fn is_optimal(self) -> bool {
        self == SolutionStatus::Optimal
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dual information at the optimum
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Shadow prices (dual values) for each explicit constraint.
    /// Positive values mean raising the RHS improves the objective.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Objective improvement per unit increase of the RHS
    pub value: f64,
    /// Interpretation
    pub interpretation: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Objective loss per unit forced into the solution (0 for basic variables)
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    fn without_point(status: SolutionStatus, objective_value: f64, iterations: usize) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value,
            analysis: Analysis::default(),
            violations: Vec::new(),
            iterations,
        }
    }

    pub fn infeasible_with_violations(violations: Vec<ConstraintViolation>, iterations: usize) -> Self {
        Self {
            violations,
            ..Self::without_point(SolutionStatus::Infeasible, f64::NAN, iterations)
        }
    }

    pub fn infeasible_with_relaxed(
        values: Vec<f64>,
        objective_value: f64,
        violations: Vec<ConstraintViolation>,
        iterations: usize,
    ) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values,
            objective_value,
            analysis: Analysis::default(),
            violations,
            iterations,
        }
    }

    pub fn unbounded(minimize: bool, iterations: usize) -> Self {
        let objective_value = if minimize { f64::NEG_INFINITY } else { f64::INFINITY };
        Self::without_point(SolutionStatus::Unbounded, objective_value, iterations)
    }

    pub fn not_solved(iterations: usize) -> Self {
        Self::without_point(SolutionStatus::NotSolved, f64::NAN, iterations)
    }

    /// Value of variable `index`, if the solver produced one
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Shadow price of the named constraint, if reported
    pub fn shadow_price(&self, constraint: &str) -> Option<f64> {
        self.analysis
            .shadow_prices
            .iter()
            .find(|sp| sp.constraint == constraint)
            .map(|sp| sp.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SolutionStatus::Optimal.code(), 1);
        assert_eq!(SolutionStatus::NotSolved.code(), 0);
        assert_eq!(SolutionStatus::Infeasible.code(), -1);
        assert_eq!(SolutionStatus::Unbounded.code(), -2);
    }

    #[test]
    fn test_not_solved_has_no_values() {
        let solution = Solution::not_solved(3);
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert_eq!(solution.value(0), None);
        assert_eq!(solution.iterations, 3);
        assert_eq!(solution.status.to_string(), "Not Solved");
    }
}
