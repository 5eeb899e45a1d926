pub mod break_even;
pub mod complementary;
pub mod computed;
pub mod discount_npv;
pub mod inventory;
pub mod loan_leasing;
pub mod loss_threshold;
pub mod product_mix;
pub mod substitutes;
pub mod supplier_credit;
pub mod unit_cost;
pub mod validate;

#[cfg(feature = "serde")]
pub mod io;

pub use computed::{Computed, UndefinedReason};
pub use product_mix::{
    BUDGET_CONSTRAINT, CAPACITY_CONSTRAINT, MixLine, OptimizationRequest, OptimizationResult, Product, optimize,
    optimize_with,
};
pub use validate::ValidationError;

pub use managers_lab_solver::{SolutionStatus, Solver};
