//! Early payment discount versus supplier credit.

use crate::validate::{self, ValidationError};

/// Commercial year used for credit terms
const CREDIT_YEAR_DAYS: f64 = 360.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SupplierCreditInput {
    /// Days the supplier lets you delay payment
    pub credit_days: f64,
    /// Early payment discount (fraction)
    pub discount: f64,
    /// Share of sales paid in cash (fraction)
    pub cash_share: f64,
    pub current_sales: f64,
    pub unit_price: f64,
    pub unit_cost: f64,
    /// Annual cost of capital (fraction)
    pub interest_rate: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierCreditAnalysis {
    /// Gain from paying early and taking the discount
    pub discount_gain: f64,
    /// Opportunity cost of giving up the credit terms
    pub credit_cost: f64,
    pub net_gain: f64,
}

impl SupplierCreditAnalysis {
    pub fn is_profitable(&self) -> bool {
        self.net_gain > 0.0
    }
}

pub fn supplier_credit(input: &SupplierCreditInput) -> Result<SupplierCreditAnalysis, ValidationError> {
    validate::non_negative("credit_days", input.credit_days)?;
    validate::fraction("discount", input.discount)?;
    validate::fraction("cash_share", input.cash_share)?;
    validate::non_negative("current_sales", input.current_sales)?;
    validate::positive("unit_price", input.unit_price)?;
    validate::non_negative("unit_cost", input.unit_cost)?;
    validate::non_negative("interest_rate", input.interest_rate)?;

    let discount_gain = input.current_sales * input.discount * input.cash_share;

    let cost_ratio = input.unit_cost / input.unit_price;
    let credit_share = input.credit_days / CREDIT_YEAR_DAYS;
    let financed_all = input.current_sales * credit_share * cost_ratio;
    let financed_credit_sales = input.current_sales * (1.0 - input.cash_share) * credit_share * cost_ratio;
    let credit_cost = (financed_all - financed_credit_sales) * input.interest_rate;

    Ok(SupplierCreditAnalysis {
        discount_gain,
        credit_cost,
        net_gain: discount_gain - credit_cost,
    })
}
