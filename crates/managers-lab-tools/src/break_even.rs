//! Break-even shift after a price, cost or fixed-cost change.
//!
//! Fixed costs are derived from the current state (`margin * units_sold`), so
//! today's break-even equals last period's sales by construction; the tool
//! shows how far the survival threshold moves.

use crate::computed::{Computed, UndefinedReason};
use crate::validate::{self, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct BreakEvenInput {
    pub old_price: f64,
    pub new_price: f64,
    pub old_cost: f64,
    pub new_cost: f64,
    /// Investment or extra fixed costs (0 when not applicable)
    pub investment: f64,
    /// Units sold last period
    pub units_sold: f64,
}

/// How hard the new threshold is to reach
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftVerdict {
    /// Under 10%: absorbed by the current model
    Absorbed,
    /// 10% to 30%: looks small but stresses sales capacity
    Stressed,
    /// Over 30%: the survival threshold jumps
    HighRisk,
}

impl ShiftVerdict {
    pub fn from_change(percent_change: f64) -> Self {
        if percent_change < 0.10 {
            ShiftVerdict::Absorbed
        } else if percent_change <= 0.30 {
            ShiftVerdict::Stressed
        } else {
            ShiftVerdict::HighRisk
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BreakEvenShift {
    pub fixed_costs_old: f64,
    pub fixed_costs_new: f64,
    pub old_break_even: f64,
    pub new_break_even: f64,
    /// Additional units required
    pub units_change: f64,
    /// Relative change as a fraction; undefined when the old break-even is 0
    pub percent_change: Computed<f64>,
    pub verdict: Computed<ShiftVerdict>,
}

pub fn break_even_shift(input: &BreakEvenInput) -> Result<Computed<BreakEvenShift>, ValidationError> {
    validate::non_negative("old_price", input.old_price)?;
    validate::non_negative("new_price", input.new_price)?;
    validate::non_negative("old_cost", input.old_cost)?;
    validate::non_negative("new_cost", input.new_cost)?;
    validate::finite("investment", input.investment)?;
    validate::non_negative("units_sold", input.units_sold)?;

    let old_cm = input.old_price - input.old_cost;
    let new_cm = input.new_price - input.new_cost;
    if old_cm <= 0.0 || new_cm <= 0.0 {
        return Ok(Computed::Undefined(UndefinedReason::NonPositiveMargin));
    }

    let fixed_costs_old = old_cm * input.units_sold;
    let fixed_costs_new = fixed_costs_old + input.investment;

    let old_break_even = fixed_costs_old / old_cm;
    let new_break_even = fixed_costs_new / new_cm;
    let units_change = new_break_even - old_break_even;
    let percent_change = Computed::ratio(units_change, old_break_even, UndefinedReason::ZeroBaseline);
    let verdict = percent_change.clone().map(ShiftVerdict::from_change);

    Ok(Computed::Value(BreakEvenShift {
        fixed_costs_old,
        fixed_costs_new,
        old_break_even,
        new_break_even,
        units_change,
        percent_change,
        verdict,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BreakEvenInput {
        BreakEvenInput {
            old_price: 10.50,
            new_price: 11.00,
            old_cost: 6.00,
            new_cost: 6.50,
            investment: 0.0,
            units_sold: 500.0,
        }
    }

    #[test]
    fn test_default_scenario() {
        let shift = break_even_shift(&base()).unwrap().value().unwrap();
        assert!((shift.old_break_even - 500.0).abs() < 1e-9);
        // Same 4.50 margin on both sides
        assert!((shift.new_break_even - 500.0).abs() < 1e-9);
        assert_eq!(shift.verdict, Computed::Value(ShiftVerdict::Absorbed));
    }

    #[test]
    fn test_unchanged_inputs_keep_break_even() {
        let input = BreakEvenInput {
            new_price: 10.50,
            new_cost: 6.00,
            ..base()
        };
        let shift = break_even_shift(&input).unwrap().value().unwrap();
        assert_eq!(shift.old_break_even, shift.new_break_even);
        assert_eq!(shift.units_change, 0.0);
        assert_eq!(shift.percent_change, Computed::Value(0.0));
    }

    #[test]
    fn test_investment_raises_threshold() {
        let input = BreakEvenInput {
            new_price: 10.50,
            new_cost: 6.00,
            investment: 900.0,
            ..base()
        };
        let shift = break_even_shift(&input).unwrap().value().unwrap();
        // 900 / 4.5 = 200 extra units, +40%
        assert!((shift.units_change - 200.0).abs() < 1e-9);
        assert!((shift.percent_change.clone().value().unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(shift.verdict, Computed::Value(ShiftVerdict::HighRisk));
    }

    #[test]
    fn test_zero_margin_is_undefined() {
        let input = BreakEvenInput {
            old_price: 6.00,
            old_cost: 6.00,
            ..base()
        };
        assert_eq!(
            break_even_shift(&input).unwrap(),
            Computed::Undefined(UndefinedReason::NonPositiveMargin)
        );
    }

    #[test]
    fn test_negative_new_margin_is_undefined() {
        let input = BreakEvenInput {
            new_cost: 12.0,
            ..base()
        };
        assert!(break_even_shift(&input).unwrap().is_undefined());
    }

    #[test]
    fn test_zero_units_sold() {
        let input = BreakEvenInput {
            units_sold: 0.0,
            investment: 100.0,
            ..base()
        };
        let shift = break_even_shift(&input).unwrap().value().unwrap();
        assert_eq!(shift.old_break_even, 0.0);
        assert!(shift.percent_change.is_undefined());
        assert!(shift.verdict.is_undefined());
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(ShiftVerdict::from_change(0.05), ShiftVerdict::Absorbed);
        assert_eq!(ShiftVerdict::from_change(0.10), ShiftVerdict::Stressed);
        assert_eq!(ShiftVerdict::from_change(0.30), ShiftVerdict::Stressed);
        assert_eq!(ShiftVerdict::from_change(0.31), ShiftVerdict::HighRisk);
    }

    #[test]
    fn test_negative_price_rejected() {
        let input = BreakEvenInput {
            old_price: -1.0,
            ..base()
        };
        assert!(matches!(break_even_shift(&input), Err(ValidationError::Negative { .. })));
    }
}
