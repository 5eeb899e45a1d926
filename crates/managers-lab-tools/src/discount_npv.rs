//! Cash discount for early payment, judged by net present value.
//!
//! Compares the current collection policy with one where a share of
//! customers pays early in exchange for a discount, and where the discount
//! brings extra sales. Cash flows are discounted daily at `wacc / 365`.

use crate::computed::{Computed, UndefinedReason};
use crate::validate::{self, ValidationError};

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountNpvInput {
    pub current_sales: f64,
    /// Extra sales the discount is expected to bring
    pub extra_sales: f64,
    /// Proposed discount (fraction)
    pub discount: f64,
    /// Share of current customers who would take the discount (fraction)
    pub share_taking_discount: f64,
    /// Days those customers take to pay today
    pub days_taking_discount: f64,
    /// Days the remaining customers take to pay
    pub days_not_taking_discount: f64,
    /// Target payment days for customers taking the discount
    pub new_days_taking_discount: f64,
    pub cogs: f64,
    /// Annual cost of capital (fraction)
    pub wacc: f64,
    pub supplier_payment_days: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountNpv {
    pub avg_current_collection_days: f64,
    pub current_receivables: f64,
    /// Share of total sales under the discount policy
    pub new_policy_share: f64,
    pub old_policy_share: f64,
    pub new_avg_collection_days: f64,
    pub new_receivables: f64,
    /// Working capital released by faster collection
    pub released_capital: f64,
    pub profit_from_extra_sales: f64,
    pub profit_from_released_capital: f64,
    pub discount_cost: f64,
    pub npv: f64,
    /// Discount (fraction) at which NPV falls to zero
    pub max_discount: Computed<f64>,
    /// Balance point between collection speed and discount cost (fraction)
    pub optimum_discount: f64,
}

impl DiscountNpv {
    pub fn creates_value(&self) -> bool {
        self.npv > 0.0
    }
}

pub fn discount_npv(input: &DiscountNpvInput) -> Result<Computed<DiscountNpv>, ValidationError> {
    validate::non_negative("current_sales", input.current_sales)?;
    validate::non_negative("extra_sales", input.extra_sales)?;
    validate::fraction("discount", input.discount)?;
    validate::fraction("share_taking_discount", input.share_taking_discount)?;
    validate::non_negative("days_taking_discount", input.days_taking_discount)?;
    validate::non_negative("days_not_taking_discount", input.days_not_taking_discount)?;
    validate::non_negative("new_days_taking_discount", input.new_days_taking_discount)?;
    validate::non_negative("cogs", input.cogs)?;
    validate::finite("wacc", input.wacc)?;
    validate::non_negative("supplier_payment_days", input.supplier_payment_days)?;

    if input.current_sales <= 0.0 {
        return Ok(Computed::Undefined(UndefinedReason::NonPositiveSales));
    }
    let i = input.wacc / DAYS_PER_YEAR;
    if 1.0 + i <= 0.0 {
        return Ok(Computed::Undefined(UndefinedReason::InvalidDiscountRate));
    }

    let sales = input.current_sales;
    let extra = input.extra_sales;
    let take = input.share_taking_discount;
    let d_take = input.days_taking_discount;
    let d_rest = input.days_not_taking_discount;
    let d_new = input.new_days_taking_discount;
    let d_sup = input.supplier_payment_days;
    let growth = |days: f64| (1.0 + i).powf(days);

    let avg_current_collection_days = take * d_take + (1.0 - take) * d_rest;
    let current_receivables = sales * avg_current_collection_days / DAYS_PER_YEAR;

    let total_sales = sales + extra;
    let new_policy_share = (sales * take + extra) / total_sales;
    let old_policy_share = 1.0 - new_policy_share;

    let new_avg_collection_days = new_policy_share * d_new + old_policy_share * d_rest;
    let new_receivables = total_sales * new_avg_collection_days / DAYS_PER_YEAR;
    let released_capital = current_receivables - new_receivables;

    let cost_ratio = input.cogs / sales;
    let extra_ratio = extra / sales;
    let profit_from_extra_sales = extra * (1.0 - cost_ratio);
    let profit_from_released_capital = released_capital * input.wacc;
    let discount_cost = total_sales * new_policy_share * input.discount;

    let inflow = total_sales * new_policy_share * (1.0 - input.discount) / growth(d_new)
        + total_sales * old_policy_share / growth(d_rest);
    let outflow = cost_ratio * extra_ratio * sales / growth(d_sup) + sales / growth(avg_current_collection_days);
    let npv = inflow - outflow;

    let max_discount = if new_policy_share == 0.0 {
        Computed::Undefined(UndefinedReason::NoDiscountTakers)
    } else {
        Computed::finite(
            1.0 - growth(d_new - d_rest)
                * ((1.0 - 1.0 / new_policy_share)
                    + (growth(d_rest - avg_current_collection_days)
                        + cost_ratio * extra_ratio * growth(d_rest - d_sup))
                        / (new_policy_share * (1.0 + extra_ratio))),
        )
    };

    let optimum_discount = (1.0 - growth(d_new - avg_current_collection_days)) / 2.0;

    let result = DiscountNpv {
        avg_current_collection_days,
        current_receivables,
        new_policy_share,
        old_policy_share,
        new_avg_collection_days,
        new_receivables,
        released_capital,
        profit_from_extra_sales,
        profit_from_released_capital,
        discount_cost,
        npv,
        max_discount,
        optimum_discount,
    };

    if !(result.npv.is_finite() && result.optimum_discount.is_finite() && result.released_capital.is_finite()) {
        return Ok(Computed::Undefined(UndefinedReason::NonFinite));
    }
    Ok(Computed::Value(result))
}
