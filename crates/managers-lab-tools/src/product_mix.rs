//! Product mix optimization.
//!
//! Builds a linear program that maximizes total contribution margin over
//! one continuous quantity per product, bounded by demand and by optional
//! global capacity and budget ceilings, then reads the mix back from the
//! solver.

use std::collections::HashSet;

use indexmap::IndexMap;
use managers_lab_solver::{ConstraintOp, ConstraintViolation, LpProblem, Solution, SolutionStatus, Solver};
use tracing::debug;

use crate::validate::{self, ValidationError};

/// Name of the capacity row in the LP model
pub const CAPACITY_CONSTRAINT: &str = "capacity";
/// Name of the budget row in the LP model
pub const BUDGET_CONSTRAINT: &str = "budget";

/// A product competing for capacity and budget
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    /// Unit selling price
    pub price: f64,
    /// Unit variable cost
    pub cost: f64,
    /// Demand cap; `None` leaves the quantity unbounded
    pub max_demand: Option<f64>,
    /// Resource units consumed per unit produced
    pub capacity_required: f64,
    /// Baseline quantity, carried through for comparison only
    pub current_qty: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, cost: f64) -> Self {
        Self {
            name: name.into(),
            price,
            cost,
            max_demand: None,
            capacity_required: 0.0,
            current_qty: 0.0,
        }
    }

    pub fn with_max_demand(mut self, max_demand: f64) -> Self {
        self.max_demand = Some(max_demand);
        self
    }

    pub fn with_capacity_required(mut self, capacity_required: f64) -> Self {
        self.capacity_required = capacity_required;
        self
    }

    pub fn with_current_qty(mut self, current_qty: f64) -> Self {
        self.current_qty = current_qty;
        self
    }

    /// Unit contribution margin
    pub fn margin(&self) -> f64 {
        self.price - self.cost
    }

    fn validate(&self, row: usize) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName(row));
        }
        let field = |what: &str| format!("{} of {}", what, self.name);
        validate::non_negative(&field("price"), self.price)?;
        validate::non_negative(&field("cost"), self.cost)?;
        validate::non_negative(&field("capacity_required"), self.capacity_required)?;
        validate::finite(&field("current_qty"), self.current_qty)?;
        if let Some(max_demand) = self.max_demand {
            validate::non_negative(&field("max_demand"), max_demand)?;
        }
        Ok(())
    }
}

/// Products plus the optional global ceilings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationRequest {
    pub products: Vec<Product>,
    /// Global resource ceiling
    pub capacity: Option<f64>,
    /// Global cost ceiling
    pub budget: Option<f64>,
}

impl OptimizationRequest {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            capacity: None,
            budget: None,
        }
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Reject malformed rows before any model is built.
    ///
    /// Ceilings only need to be finite: a negative ceiling is a well-formed
    /// request that the solver reports as infeasible.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (row, product) in self.products.iter().enumerate() {
            product.validate(row)?;
            if !seen.insert(product.name.as_str()) {
                return Err(ValidationError::DuplicateName(product.name.clone()));
            }
        }
        if let Some(capacity) = self.capacity {
            validate::finite("capacity", capacity)?;
        }
        if let Some(budget) = self.budget {
            validate::finite("budget", budget)?;
        }
        Ok(())
    }
}

/// The LP built from a request, ready for solving
#[derive(Debug, Clone)]
pub struct MixModel {
    pub lp_problem: LpProblem,
    pub has_capacity: bool,
    pub has_budget: bool,
}

/// Validate the request and build its LP
pub fn build_model(request: &OptimizationRequest) -> Result<MixModel, ValidationError> {
    request.validate()?;

    let products = &request.products;
    let variables = products.iter().map(|p| format!("qty_{}", p.name)).collect();
    let mut lp_problem = LpProblem::new(variables);

    // Maximize total contribution margin
    lp_problem.set_objective(products.iter().map(Product::margin).collect(), false);

    for (j, product) in products.iter().enumerate() {
        lp_problem.set_upper_bound(j, product.max_demand);
    }

    if let Some(capacity) = request.capacity {
        lp_problem.add_constraint(
            CAPACITY_CONSTRAINT,
            products.iter().map(|p| p.capacity_required).collect(),
            ConstraintOp::Le,
            capacity,
        );
    }

    if let Some(budget) = request.budget {
        lp_problem.add_constraint(
            BUDGET_CONSTRAINT,
            products.iter().map(|p| p.cost).collect(),
            ConstraintOp::Le,
            budget,
        );
    }

    Ok(MixModel {
        lp_problem,
        has_capacity: request.capacity.is_some(),
        has_budget: request.budget.is_some(),
    })
}

/// One product's row in the optimized plan
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MixLine {
    pub name: String,
    pub optimal_qty: f64,
    pub current_qty: f64,
    pub price: f64,
    pub cost: f64,
    pub margin: f64,
    /// `optimal_qty * price`
    pub optimal_revenue: f64,
    /// `optimal_qty * margin`
    pub optimal_margin: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal quantity per product, in request order
    pub product_mix: IndexMap<String, f64>,
    pub total_margin: f64,
    pub capacity_used: f64,
    pub capacity: Option<f64>,
    /// `capacity_used / capacity`, only for a strictly positive capacity
    pub capacity_usage: Option<f64>,
    pub total_cost_used: f64,
    pub status: SolutionStatus,
    pub status_code: i32,
    pub lines: Vec<MixLine>,
    /// Margin gained per extra unit of capacity (Optimal only)
    pub capacity_shadow_price: Option<f64>,
    /// Margin gained per extra unit of budget (Optimal only)
    pub budget_shadow_price: Option<f64>,
    pub violations: Vec<ConstraintViolation>,
    pub iterations: usize,
}

impl OptimizationResult {
    pub fn quantity(&self, name: &str) -> Option<f64> {
        self.product_mix.get(name).copied()
    }
}

/// Optimize with default solver settings
pub fn optimize(request: &OptimizationRequest) -> Result<OptimizationResult, ValidationError> {
    optimize_with(&Solver::new(), request)
}

pub fn optimize_with(solver: &Solver, request: &OptimizationRequest) -> Result<OptimizationResult, ValidationError> {
    let model = build_model(request)?;
    debug!(
        products = request.products.len(),
        capacity = ?request.capacity,
        budget = ?request.budget,
        "optimizing product mix"
    );

    let solution = solver.solve(&model.lp_problem);
    let result = extract_result(request, &model, solution);

    debug!(
        status = %result.status,
        total_margin = result.total_margin,
        "product mix optimized"
    );
    Ok(result)
}

/// Read quantities back and recompute every total from them
fn extract_result(request: &OptimizationRequest, model: &MixModel, solution: Solution) -> OptimizationResult {
    let optimal = solution.status.is_optimal();

    let mut product_mix = IndexMap::with_capacity(request.products.len());
    let mut lines = Vec::with_capacity(request.products.len());
    let mut total_margin = 0.0;
    let mut capacity_used = 0.0;
    let mut total_cost_used = 0.0;

    for (j, product) in request.products.iter().enumerate() {
        let solved = if optimal { solution.value(j).unwrap_or(0.0) } else { 0.0 };
        let qty = clamp_quantity(solved, product.max_demand);

        total_margin += product.margin() * qty;
        capacity_used += product.capacity_required * qty;
        total_cost_used += product.cost * qty;

        product_mix.insert(product.name.clone(), qty);
        lines.push(MixLine {
            name: product.name.clone(),
            optimal_qty: qty,
            current_qty: product.current_qty,
            price: product.price,
            cost: product.cost,
            margin: product.margin(),
            optimal_revenue: qty * product.price,
            optimal_margin: qty * product.margin(),
        });
    }

    let capacity_usage = request
        .capacity
        .filter(|&capacity| capacity > 0.0)
        .map(|capacity| capacity_used / capacity);

    let shadow = |present: bool, name: &str| {
        if optimal && present {
            solution.shadow_price(name)
        } else {
            None
        }
    };

    OptimizationResult {
        product_mix,
        total_margin,
        capacity_used,
        capacity: request.capacity,
        capacity_usage,
        total_cost_used,
        status: solution.status,
        status_code: solution.status.code(),
        lines,
        capacity_shadow_price: shadow(model.has_capacity, CAPACITY_CONSTRAINT),
        budget_shadow_price: shadow(model.has_budget, BUDGET_CONSTRAINT),
        violations: solution.violations,
        iterations: solution.iterations,
    }
}

/// Strip solver residue so the quantity sits inside `[0, max_demand]`
fn clamp_quantity(qty: f64, max_demand: Option<f64>) -> f64 {
    let qty = qty.max(0.0);
    match max_demand {
        Some(max) => qty.min(max),
        None => qty,
    }
}
