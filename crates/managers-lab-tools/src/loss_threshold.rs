//! How much sales volume can be lost before matching a competitor's price cut
//! becomes unavoidable.

use crate::computed::{Computed, UndefinedReason};
use crate::validate::{self, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct LossThresholdInput {
    pub competitor_old_price: f64,
    pub competitor_new_price: f64,
    pub our_price: f64,
    pub unit_cost: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LossVerdict {
    /// Sales can drop by up to this many percent before a cut is needed
    CanAbsorb(f64),
    /// Current price leaves no room to absorb competitive pressure
    NoLossMargin,
}

/// Tolerable sales loss in percent: competitor price change over our
/// margin-to-price ratio.
pub fn sales_loss_threshold(input: &LossThresholdInput) -> Result<Computed<f64>, ValidationError> {
    validate::non_negative("competitor_old_price", input.competitor_old_price)?;
    validate::non_negative("competitor_new_price", input.competitor_new_price)?;
    validate::non_negative("our_price", input.our_price)?;
    validate::non_negative("unit_cost", input.unit_cost)?;

    if input.competitor_old_price == 0.0 {
        return Ok(Computed::Undefined(UndefinedReason::ZeroDenominator(
            "competitor_old_price".to_string(),
        )));
    }
    if input.our_price == 0.0 {
        return Ok(Computed::Undefined(UndefinedReason::ZeroDenominator("our_price".to_string())));
    }

    let top = (input.competitor_new_price - input.competitor_old_price) / input.competitor_old_price;
    let bottom = (input.unit_cost - input.our_price) / input.our_price;
    Ok(Computed::ratio(top, bottom, UndefinedReason::ZeroDenominator("margin".to_string())).map(|r| r * 100.0))
}

pub fn loss_verdict(threshold: f64) -> LossVerdict {
    if threshold <= 0.0 {
        LossVerdict::NoLossMargin
    } else {
        LossVerdict::CanAbsorb(threshold)
    }
}
