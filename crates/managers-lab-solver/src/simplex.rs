use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::problem::{Constraint, ConstraintOp, LpProblem};
use crate::solution::{Analysis, ConstraintViolation, ReducedCost, ShadowPrice, Solution, SolutionStatus};

const MIN_ITERATIONS: usize = 10_000;
const ITERATIONS_PER_DIMENSION: usize = 50;

/// Two-phase simplex solver for bounded-variable linear programs
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots (both phases) before giving up; `None` scales with
    /// the problem size
    max_iterations: Option<usize>,
    /// Tolerance for floating point comparisons
    tolerance: f64,
    /// Wall-clock budget for a single solve
    time_limit: Option<Duration>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-9,
            time_limit: None,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Give up with `NotSolved` once a solve has run for longer than `limit`
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Pivot cap for a problem with `rows` constraint rows (bound rows
    /// included) and `variables` columns
    pub fn iteration_limit(&self, rows: usize, variables: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| MIN_ITERATIONS.max(ITERATIONS_PER_DIMENSION * (rows + variables)))
    }

    /// Solve the LP problem using the two-phase simplex method
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        if let Err(err) = problem.validate() {
            warn!(%err, "rejecting malformed LP problem");
            return Solution::not_solved(0);
        }

        let rows = problem.rows();
        let mut limits = Limits::start(self, self.iteration_limit(rows.len(), problem.num_variables()));
        debug!(
            variables = problem.num_variables(),
            rows = rows.len(),
            minimize = problem.objective.minimize,
            "solving LP"
        );

        let solution = match self.run(problem, &rows, &mut limits) {
            Outcome::Optimal(tableau) => self.extract_solution(&tableau, problem, limits.iterations),
            Outcome::Unbounded => Solution::unbounded(problem.objective.minimize, limits.iterations),
            Outcome::Stalled => Solution::not_solved(limits.iterations),
            Outcome::Infeasible => self.solve_with_relaxation(problem, &rows, &mut limits),
        };

        debug!(
            status = %solution.status,
            iterations = solution.iterations,
            elapsed_us = limits.started.elapsed().as_micros() as u64,
            "LP solve finished"
        );
        solution
    }

    /// Run both phases over `rows` with the objective of `problem`
    fn run(&self, problem: &LpProblem, rows: &[Constraint], limits: &mut Limits) -> Outcome {
        let mut tableau = Tableau::build(problem, rows);

        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau, limits) {
                Phase1::Feasible => {}
                Phase1::Infeasible => return Outcome::Infeasible,
                Phase1::Stalled => return Outcome::Stalled,
            }
        }

        match self.phase2(&mut tableau, limits) {
            Phase2::Optimal => Outcome::Optimal(tableau),
            Phase2::Unbounded => Outcome::Unbounded,
            Phase2::Stalled => Outcome::Stalled,
        }
    }

    /// When the original problem is infeasible, find a "best effort" point
    /// by dropping the rows the origin violates, then report which rows that
    /// point breaks.
    fn solve_with_relaxation(&self, problem: &LpProblem, rows: &[Constraint], limits: &mut Limits) -> Solution {
        let origin = vec![0.0; problem.num_variables()];
        let relaxed: Vec<Constraint> = rows
            .iter()
            .filter(|c| c.is_satisfied(&origin, self.tolerance))
            .cloned()
            .collect();
        trace!(kept = relaxed.len(), dropped = rows.len() - relaxed.len(), "relaxing infeasible LP");

        match self.run(problem, &relaxed, limits) {
            Outcome::Optimal(tableau) => {
                let values = tableau.values(problem.num_variables());
                let violations = self.find_violations(rows, &values);
                let objective_value = objective_at(problem, &values);
                if violations.is_empty() {
                    // Relaxed optimum satisfies everything; its duals belong to the
                    // relaxed rows, so no analysis is reported
                    return Solution {
                        status: SolutionStatus::Optimal,
                        values,
                        objective_value,
                        analysis: Analysis::default(),
                        violations,
                        iterations: limits.iterations,
                    };
                }
                Solution::infeasible_with_relaxed(values, objective_value, violations, limits.iterations)
            }
            Outcome::Stalled => Solution::not_solved(limits.iterations),
            Outcome::Infeasible | Outcome::Unbounded => {
                Solution::infeasible_with_violations(self.find_violations(rows, &origin), limits.iterations)
            }
        }
    }

    /// Find which constraints are violated by a given point, worst first
    fn find_violations(&self, rows: &[Constraint], values: &[f64]) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = rows
            .iter()
            .filter(|c| !c.is_satisfied(values, self.tolerance))
            .map(|c| {
                let lhs = c.lhs(values);
                let (violation_amount, description) = match c.op {
                    ConstraintOp::Le => {
                        let amt = lhs - c.rhs;
                        (amt, format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, amt))
                    }
                    ConstraintOp::Ge => {
                        let amt = c.rhs - lhs;
                        (amt, format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, amt))
                    }
                    ConstraintOp::Eq => (
                        (lhs - c.rhs).abs(),
                        format!("{} requires exactly {:.2} but got {:.2}", c.name, c.rhs, lhs),
                    ),
                };
                ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual: lhs,
                    violation_amount,
                    description,
                }
            })
            .collect();

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }

    fn phase1(&self, tableau: &mut Tableau, limits: &mut Limits) -> Phase1 {
        // Auxiliary objective: maximize -sum(artificials)
        let obj_row = tableau.obj_row();
        let n_cols = tableau.n_cols();
        let art_start = tableau.art_start();

        let orig_obj = tableau.data[obj_row].clone();

        tableau.data[obj_row].iter_mut().for_each(|x| *x = 0.0);
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[obj_row][j] = -1.0;
        }

        // Price out the basic artificials
        for i in 0..obj_row {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[obj_row][j] += tableau.data[i][j];
                }
            }
        }

        match self.iterate(tableau, n_cols - 1, limits) {
            Phase2::Optimal => {}
            // Phase 1 objective is bounded by 0, so this only shows numerical trouble
            Phase2::Unbounded => return Phase1::Infeasible,
            Phase2::Stalled => return Phase1::Stalled,
        }

        let rhs_col = n_cols - 1;
        for i in 0..obj_row {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > self.tolerance {
                return Phase1::Infeasible;
            }
        }

        self.drive_out_artificials(tableau);

        // Restore original objective and price out the basis
        tableau.data[obj_row] = orig_obj;
        for i in 0..obj_row {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[obj_row][basic];
            if ratio.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.data[obj_row][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        Phase1::Feasible
    }

    /// Pivot zero-valued artificials out of the basis so phase 2 cannot raise them
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let art_start = tableau.art_start();
        for i in 0..tableau.obj_row() {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            if let Some(col) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                tableau.pivot(i, col);
            }
        }
    }

    fn phase2(&self, tableau: &mut Tableau, limits: &mut Limits) -> Phase2 {
        // Artificial columns may not re-enter
        let limit = tableau.art_start();
        self.iterate(tableau, limit, limits)
    }

    /// Pivot until no column below `col_limit` can improve the objective
    fn iterate(&self, tableau: &mut Tableau, col_limit: usize, limits: &mut Limits) -> Phase2 {
        let mut degenerate_streak = 0;
        loop {
            let bland = degenerate_streak > tableau.obj_row();
            let Some(pivot_col) = self.find_pivot_column(tableau, col_limit, bland) else {
                return Phase2::Optimal;
            };
            let Some((pivot_row, ratio)) = self.find_pivot_row(tableau, pivot_col) else {
                return Phase2::Unbounded;
            };
            if limits.exhausted() {
                warn!(iterations = limits.iterations, "simplex stopped before reaching a verdict");
                return Phase2::Stalled;
            }
            degenerate_streak = if ratio <= self.tolerance { degenerate_streak + 1 } else { 0 };
            trace!(row = pivot_row, col = pivot_col, bland, "pivot");
            tableau.pivot(pivot_row, pivot_col);
            limits.iterations += 1;
        }
    }

    /// Dantzig's rule (most positive reduced cost), or Bland's rule
    /// (first improving column) while degenerate pivots keep repeating
    fn find_pivot_column(&self, tableau: &Tableau, col_limit: usize, bland: bool) -> Option<usize> {
        let obj = &tableau.data[tableau.obj_row()];

        if bland {
            return (0..col_limit).find(|&j| obj[j] > self.tolerance);
        }

        let mut max_val = self.tolerance;
        let mut max_col = None;
        for (j, &value) in obj.iter().enumerate().take(col_limit) {
            if value > max_val {
                max_val = value;
                max_col = Some(j);
            }
        }
        max_col
    }

    /// Minimum ratio test; ties go to the lowest basic variable index
    fn find_pivot_row(&self, tableau: &Tableau, col: usize) -> Option<(usize, f64)> {
        let rhs_col = tableau.n_cols() - 1;

        let mut best: Option<(usize, f64)> = None;
        for i in 0..tableau.obj_row() {
            let val = tableau.data[i][col];
            if val <= self.tolerance {
                continue;
            }
            let ratio = (tableau.data[i][rhs_col] / val).max(0.0);
            best = match best {
                None => Some((i, ratio)),
                Some((row, min)) => {
                    if ratio < min - self.tolerance
                        || (ratio <= min + self.tolerance && tableau.basic_vars[i] < tableau.basic_vars[row])
                    {
                        Some((i, ratio))
                    } else {
                        Some((row, min))
                    }
                }
            };
        }
        best
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem, iterations: usize) -> Solution {
        let values = tableau.values(problem.num_variables());
        let objective_value = objective_at(problem, &values);
        let analysis = self.analyze(tableau, problem, &values);

        Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            analysis,
            violations: Vec::new(),
            iterations,
        }
    }

    fn analyze(&self, tableau: &Tableau, problem: &LpProblem, values: &[f64]) -> Analysis {
        let obj = &tableau.data[tableau.obj_row()];

        // Explicit constraints occupy the first rows
        let shadow_prices: Vec<ShadowPrice> = problem
            .constraints
            .iter()
            .zip(&tableau.dual_cols)
            .map(|(constraint, &(col, sign))| {
                let value = -obj[col] * sign;
                let value = if value.abs() < self.tolerance { 0.0 } else { value };
                let interpretation = if value == 0.0 {
                    "Non-binding constraint".to_string()
                } else if value > 0.0 {
                    format!("Raising the limit by 1 unit would improve the objective by {:.4}", value)
                } else {
                    format!("Raising the limit by 1 unit would worsen the objective by {:.4}", -value)
                };
                ShadowPrice {
                    constraint: constraint.name.clone(),
                    value,
                    interpretation,
                }
            })
            .collect();

        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, var_name)| {
                let is_basic = tableau.basic_vars.contains(&j);
                let rc = if is_basic { 0.0 } else { -obj[j] };
                ReducedCost {
                    variable: var_name.clone(),
                    value: values[j],
                    reduced_cost: rc,
                    is_basic,
                }
            })
            .collect();

        let binding_constraints = shadow_prices
            .iter()
            .filter(|sp| sp.value != 0.0)
            .map(|sp| sp.constraint.clone())
            .collect();

        Analysis {
            shadow_prices,
            reduced_costs,
            binding_constraints,
        }
    }
}

fn objective_at(problem: &LpProblem, values: &[f64]) -> f64 {
    problem
        .objective
        .coefficients
        .iter()
        .zip(values)
        .map(|(c, v)| c * v)
        .sum()
}

/// Iteration and wall-clock accounting for one solve
struct Limits {
    started: Instant,
    deadline: Option<Instant>,
    max_iterations: usize,
    iterations: usize,
}

impl Limits {
    fn start(solver: &Solver, max_iterations: usize) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: solver.time_limit.map(|limit| started + limit),
            max_iterations,
            iterations: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.iterations >= self.max_iterations || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

struct Tableau {
    /// Constraint rows followed by the objective row (maximization form)
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    /// Per row: column whose reduced cost prices the row, and the sign
    /// mapping it back to the row as written
    dual_cols: Vec<(usize, f64)>,
}

impl Tableau {
    fn build(problem: &LpProblem, rows: &[Constraint]) -> Self {
        let n_vars = problem.num_variables();
        let n_rows = rows.len();

        // Negate rows with a negative RHS so every RHS starts non-negative
        let normalized: Vec<(f64, ConstraintOp)> = rows
            .iter()
            .map(|c| if c.rhs < 0.0 { (-1.0, c.op.flipped()) } else { (1.0, c.op) })
            .collect();

        let n_slack = normalized.iter().filter(|(_, op)| *op != ConstraintOp::Eq).count();
        let n_artificial = normalized.iter().filter(|(_, op)| *op != ConstraintOp::Le).count();
        let total_cols = n_vars + n_slack + n_artificial + 1;

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; n_rows + 1],
            basic_vars: vec![0; n_rows],
            n_vars,
            n_slack,
            n_artificial,
            dual_cols: Vec::with_capacity(n_rows),
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, (c, &(flip, op))) in rows.iter().zip(&normalized).enumerate() {
            for (j, &coef) in c.coefficients.iter().enumerate() {
                tableau.data[i][j] = flip * coef;
            }
            tableau.data[i][total_cols - 1] = flip * c.rhs;

            match op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    tableau.dual_cols.push((slack_idx, flip));
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    tableau.dual_cols.push((slack_idx, -flip));
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.dual_cols.push((artificial_idx, flip));
                    artificial_idx += 1;
                }
            }
        }

        // Simplex maximizes, so minimization negates the coefficients
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            tableau.data[n_rows][j] = if problem.objective.minimize { -coef } else { coef };
        }

        tableau
    }

    fn obj_row(&self) -> usize {
        self.data.len() - 1
    }

    fn n_cols(&self) -> usize {
        self.data[0].len()
    }

    fn art_start(&self) -> usize {
        self.n_vars + self.n_slack
    }

    fn values(&self, n_vars: usize) -> Vec<f64> {
        let rhs_col = self.n_cols() - 1;
        let mut values = vec![0.0; n_vars];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            if basic < n_vars {
                values[basic] = self.data[i][rhs_col];
            }
        }
        values
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let n_cols = self.n_cols();

        self.basic_vars[row] = col;

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for (i, data_row) in self.data.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = data_row[col];
            if factor != 0.0 {
                for (x, p) in data_row.iter_mut().zip(&pivot_row) {
                    *x -= factor * p;
                }
            }
        }
    }
}

enum Outcome {
    Optimal(Tableau),
    Infeasible,
    Unbounded,
    Stalled,
}

enum Phase1 {
    Feasible,
    Infeasible,
    Stalled,
}

enum Phase2 {
    Optimal,
    Unbounded,
    Stalled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.values[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.values[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.objective_value, 11.0, epsilon = 1e-6);
    }

    #[test]
    fn test_upper_bounds_as_variable_bounds() {
        // Same problem with the two limits expressed as variable bounds
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.set_upper_bound(0, Some(3.0));
        problem.set_upper_bound(1, Some(3.0));

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.values[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.values[1], 1.0, epsilon = 1e-6);
        // Only the explicit row gets a shadow price: one more unit of "sum" buys one more y
        assert_eq!(solution.analysis.shadow_prices.len(), 1);
        assert_abs_diff_eq!(solution.shadow_price("sum").unwrap(), 2.0, epsilon = 1e-6);
        assert_eq!(solution.analysis.binding_constraints, vec!["sum".to_string()]);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.values[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.values[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.objective_value, 9.0, epsilon = 1e-6);
        // Raising the ">= 4" requirement costs 3 per unit (one more y)
        assert_abs_diff_eq!(solution.shadow_price("sum").unwrap(), -3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_equality_constraint() {
        // Minimize x + 2y subject to x + y = 5, x <= 2
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 5.0);
        problem.set_upper_bound(0, Some(2.0));

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.values[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.values[1], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(solution.objective_value, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.violations.len(), 1);
        // Relaxed point minimizes x under "upper" alone, landing at 0
        assert_eq!(solution.violations[0].constraint, "lower");
        assert_abs_diff_eq!(solution.violations[0].violation_amount, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_rhs_le_is_infeasible() {
        // x <= -1 has no non-negative solution
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("limit", vec![1.0], ConstraintOp::Le, -1.0);
        problem.set_upper_bound(0, Some(10.0));

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.violations[0].constraint, "limit");
    }

    #[test]
    fn test_unbounded() {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_iteration_limit_reports_not_solved() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("x_max", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_iteration_limit_scales_with_size() {
        let solver = Solver::new();
        assert_eq!(solver.iteration_limit(3, 2), 10_000);
        // 12,000 bounded products: one bound row each
        assert_eq!(solver.iteration_limit(12_000, 12_000), 1_200_000);
        assert_eq!(Solver::new().with_max_iterations(7).iteration_limit(12_000, 12_000), 7);
    }

    #[test]
    fn test_each_bound_row_takes_a_pivot() {
        let n = 400;
        let names = (0..n).map(|j| format!("x{}", j)).collect();
        let mut problem = LpProblem::new(names);
        problem.set_objective(vec![1.0; n], false);
        for j in 0..n {
            problem.set_upper_bound(j, Some(1.0));
        }

        let solution = Solver::new().solve(&problem);
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.iterations, n);
        assert_abs_diff_eq!(solution.objective_value, n as f64, epsilon = 1e-6);

        // A fixed cap below the row count would stall the same problem
        let capped = Solver::new().with_max_iterations(n - 1).solve(&problem);
        assert_eq!(capped.status, SolutionStatus::NotSolved);
    }

    #[test]
    fn test_zero_time_limit_reports_not_solved() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("x_max", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().with_time_limit(Duration::ZERO).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::NotSolved);
    }

    #[test]
    fn test_malformed_problem_reports_not_solved() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0, 2.0], false);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::NotSolved);
    }

    #[test]
    fn test_empty_problem_is_optimal() {
        let problem = LpProblem::new(Vec::new());
        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, 0.0);
    }

    #[test]
    fn test_degenerate_problem_terminates() {
        // Classic degenerate vertex at the origin with redundant rows
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string(), "z".to_string()]);
        problem.set_objective(vec![10.0, -57.0, -9.0], false);
        problem.add_constraint("r1", vec![0.5, -5.5, -2.5], ConstraintOp::Le, 0.0);
        problem.add_constraint("r2", vec![0.5, -1.5, -0.5], ConstraintOp::Le, 0.0);
        problem.add_constraint("r3", vec![1.0, 0.0, 0.0], ConstraintOp::Le, 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_abs_diff_eq!(solution.objective_value, 1.0, epsilon = 1e-6);
    }
}
