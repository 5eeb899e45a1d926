//! Human-readable output. Figures are rounded for display only.

use managers_lab_tools::{
    Computed, OptimizationResult, SolutionStatus,
    break_even::BreakEvenShift,
    complementary::ComplementaryAnalysis,
    discount_npv::DiscountNpv,
    inventory::TurnoverLine,
    loan_leasing::{Financing, FinancingBreakdown, LoanVsLeasing},
    loss_threshold::{LossVerdict, loss_verdict},
    substitutes::SubstitutesAnalysis,
    supplier_credit::SupplierCreditAnalysis,
    unit_cost::UnitCosts,
};
use serde::Serialize;
use std::fmt::Display;

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn or_reason<T>(value: &Computed<T>, show: impl FnOnce(&T) -> String) -> String {
    match value {
        Computed::Value(v) => show(v),
        Computed::Undefined(reason) => format!("undefined ({})", reason),
    }
}

fn row(label: &str, value: impl Display) {
    println!("  {:36} {:>16}", label, value);
}

pub fn mix(result: &OptimizationResult) {
    println!("Status: {} ({})", result.status, result.status_code);
    match result.status {
        SolutionStatus::Optimal => {}
        SolutionStatus::Infeasible => {
            println!("Capacity and budget cannot be met even with zero production.");
            for v in &result.violations {
                println!(
                    "  {:20} needs {:.2}, reaches {:.2} (off by {:.2})",
                    v.constraint, v.required, v.actual, v.violation_amount
                );
            }
            return;
        }
        SolutionStatus::Unbounded => {
            println!("A product with positive margin has no demand, capacity or budget limit.");
            return;
        }
        SolutionStatus::NotSolved => {
            println!("Solver stopped after {} iterations without a verdict.", result.iterations);
            return;
        }
    }
    println!();

    println!(
        "  {:16} {:>10} {:>10} {:>8} {:>8} {:>8} {:>12} {:>12}",
        "product", "optimal", "current", "price", "cost", "margin", "revenue", "total margin"
    );
    for line in &result.lines {
        println!(
            "  {:16} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>8.2} {:>12.2} {:>12.2}",
            line.name,
            line.optimal_qty,
            line.current_qty,
            line.price,
            line.cost,
            line.margin,
            line.optimal_revenue,
            line.optimal_margin
        );
    }
    println!();

    row("Total contribution margin", format!("{:.2}", result.total_margin));
    row("Total cost", format!("{:.2}", result.total_cost_used));
    match (result.capacity, result.capacity_usage) {
        (Some(capacity), Some(usage)) => row(
            "Capacity used",
            format!("{:.2} / {:.2} ({})", result.capacity_used, capacity, percent(usage)),
        ),
        _ => row("Capacity used", format!("{:.2}", result.capacity_used)),
    }
    if let Some(price) = result.capacity_shadow_price {
        row("Margin per extra capacity unit", format!("{:.4}", price));
    }
    if let Some(price) = result.budget_shadow_price {
        row("Margin per extra budget unit", format!("{:.4}", price));
    }
}

pub fn break_even(shift: &Computed<BreakEvenShift>) {
    let Computed::Value(shift) = shift else {
        println!("Break-even: {}", or_reason(shift, |_| String::new()));
        return;
    };
    row("Fixed costs (before)", format!("{:.2}", shift.fixed_costs_old));
    row("Fixed costs (after)", format!("{:.2}", shift.fixed_costs_new));
    row("Break-even units (before)", format!("{:.2}", shift.old_break_even));
    row("Break-even units (after)", format!("{:.2}", shift.new_break_even));
    row("Additional units", format!("{:.2}", shift.units_change));
    row("Change", or_reason(&shift.percent_change, |c| percent(*c)));
    row("Verdict", or_reason(&shift.verdict, |v| format!("{:?}", v)));
}

pub fn complementary(analysis: &ComplementaryAnalysis) {
    row("New price", format!("{:.2}", analysis.new_price));
    row("Core margin (before / after)", format!(
        "{:.2} / {:.2}",
        analysis.core_margin_before, analysis.core_margin_after
    ));
    row("Complement margin per core unit", format!("{:.2}", analysis.expected_complement_margin));
    row("Blended margin (before / after)", format!(
        "{:.2} / {:.2}",
        analysis.blended_margin_before, analysis.blended_margin_after
    ));
    row("Required volume increase", or_reason(&analysis.required_volume_increase, |v| percent(*v)));
    row(
        "Required increase, core only",
        or_reason(&analysis.required_volume_increase_core_only, |v| percent(*v)),
    );
}

pub fn discount_npv(npv: &Computed<DiscountNpv>) {
    let Computed::Value(r) = npv else {
        println!("Discount NPV: {}", or_reason(npv, |_| String::new()));
        return;
    };
    row("Current collection days", format!("{:.1}", r.avg_current_collection_days));
    row("New collection days", format!("{:.1}", r.new_avg_collection_days));
    row("Current receivables", format!("{:.2}", r.current_receivables));
    row("New receivables", format!("{:.2}", r.new_receivables));
    row("Released capital", format!("{:.2}", r.released_capital));
    row("Profit from extra sales", format!("{:.2}", r.profit_from_extra_sales));
    row("Profit from released capital", format!("{:.2}", r.profit_from_released_capital));
    row("Discount cost", format!("{:.2}", r.discount_cost));
    row("NPV", format!("{:.2}", r.npv));
    row("Maximum discount", or_reason(&r.max_discount, |d| percent(*d)));
    row("Optimum discount", percent(r.optimum_discount));
    if r.creates_value() {
        println!("The proposed discount creates value.");
    } else {
        println!("The proposed discount destroys value.");
    }
}

fn financing(label: &str, side: &FinancingBreakdown) {
    println!("{}", label);
    row("Monthly installment", format!("{:.2}", side.installment));
    row("Working capital", format!("{:.2}", side.working_capital));
    row("Working capital installment", format!("{:.2}", side.working_capital_installment));
    row("Cash outflows", format!("{:.2}", side.cash_outflows));
    row("Financing cost", format!("{:.2}", side.financing_cost));
    row("Depreciation", format!("{:.2}", side.depreciation));
    row("Tax benefit", format!("{:.2}", side.tax_benefit));
    row("Final burden", format!("{:.2}", side.final_burden));
}

pub fn loan_lease(comparison: &Computed<LoanVsLeasing>) {
    let Computed::Value(comparison) = comparison else {
        println!("Loan vs leasing: {}", or_reason(comparison, |_| String::new()));
        return;
    };
    financing("Loan", &comparison.loan);
    financing("Leasing", &comparison.leasing);
    let preferred = match comparison.preferred {
        Financing::Loan => "loan",
        Financing::Leasing => "leasing",
    };
    println!("Lower final burden: {}", preferred);
}

pub fn turnover(lines: &[TurnoverLine]) {
    for line in lines {
        row(&line.name, format!("{:.1} days", line.days));
    }
}

pub fn substitutes(analysis: &SubstitutesAnalysis) {
    row("Required increase", format!("{:.2}%", analysis.base_required));
    row("Feasible increase", format!("{:.2}%", analysis.base_feasible));
    println!();
    println!(
        "  {:28} {:>8} {:>10} {:>10} {:>10}",
        "scenario", "factor", "required", "feasible", "impact"
    );
    for outcome in &analysis.scenarios {
        println!(
            "  {:28} {:>8.2} {:>9.2}% {:>9.2}% {:>+9.2}%{}",
            outcome.name,
            outcome.factor,
            outcome.required,
            outcome.feasible,
            outcome.impact,
            if outcome.exceeds_market() { "  exceeds market" } else { "" }
        );
    }
}

pub fn supplier_credit(analysis: &SupplierCreditAnalysis) {
    row("Gain from discount", format!("{:.2}", analysis.discount_gain));
    row("Cost of giving up credit", format!("{:.2}", analysis.credit_cost));
    row("Net gain", format!("{:.2}", analysis.net_gain));
    if analysis.is_profitable() {
        println!("Taking the discount pays off.");
    } else {
        println!("Keep the supplier credit.");
    }
}

pub fn unit_cost(costs: &UnitCosts) {
    row("Average unit cost", format!("{:.2}", costs.average_total));
    row("Regular production", format!("{:.2}", costs.average_regular));
    row("Overtime production", format!("{:.2}", costs.average_overtime));
}

pub fn loss_threshold(threshold: &Computed<f64>) {
    row("Tolerable sales loss", or_reason(threshold, |t| format!("{:.2}%", t)));
    if let Computed::Value(t) = threshold {
        match loss_verdict(*t) {
            LossVerdict::CanAbsorb(t) => {
                println!("Sales can drop by up to {:.2}% before a price cut is needed.", t)
            }
            LossVerdict::NoLossMargin => println!("No room to absorb the competitor's move."),
        }
    }
}
