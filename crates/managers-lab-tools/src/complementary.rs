//! Price cut on a core product that drags complementary sales along.
//!
//! Each core unit sold brings, on average, `attach_rate` units of every
//! complement. The blended margin per core unit is the core margin plus the
//! expected complement margin; the required volume increase is the one that
//! keeps total blended margin unchanged after the cut.

use crate::computed::{Computed, UndefinedReason};
use crate::validate::{self, ValidationError};

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Complement {
    pub name: String,
    pub price: f64,
    pub cost: f64,
    /// Expected complement units sold per core unit, between 0 and 1
    pub attach_rate: f64,
}

impl Complement {
    pub fn expected_margin(&self) -> f64 {
        self.attach_rate * (self.price - self.cost)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplementaryInput {
    pub price: f64,
    pub unit_cost: f64,
    /// Price cut as a fraction of the current price
    pub price_cut: f64,
    pub complements: Vec<Complement>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementaryAnalysis {
    pub new_price: f64,
    pub core_margin_before: f64,
    pub core_margin_after: f64,
    /// Expected complement margin per core unit
    pub expected_complement_margin: f64,
    pub blended_margin_before: f64,
    pub blended_margin_after: f64,
    /// Required core volume increase (fraction) counting complements
    pub required_volume_increase: Computed<f64>,
    /// Required core volume increase (fraction) ignoring complements
    pub required_volume_increase_core_only: Computed<f64>,
}

pub fn complementary_analysis(input: &ComplementaryInput) -> Result<ComplementaryAnalysis, ValidationError> {
    validate::non_negative("price", input.price)?;
    validate::non_negative("unit_cost", input.unit_cost)?;
    validate::fraction("price_cut", input.price_cut)?;
    for c in &input.complements {
        validate::non_negative(&format!("price of {}", c.name), c.price)?;
        validate::non_negative(&format!("cost of {}", c.name), c.cost)?;
        validate::fraction(&format!("attach_rate of {}", c.name), c.attach_rate)?;
    }

    let new_price = input.price * (1.0 - input.price_cut);
    let core_margin_before = input.price - input.unit_cost;
    let core_margin_after = new_price - input.unit_cost;
    let expected_complement_margin: f64 = input.complements.iter().map(Complement::expected_margin).sum();
    let blended_margin_before = core_margin_before + expected_complement_margin;
    let blended_margin_after = core_margin_after + expected_complement_margin;

    Ok(ComplementaryAnalysis {
        new_price,
        core_margin_before,
        core_margin_after,
        expected_complement_margin,
        blended_margin_before,
        blended_margin_after,
        required_volume_increase: required_increase(blended_margin_before, blended_margin_after),
        required_volume_increase_core_only: required_increase(core_margin_before, core_margin_after),
    })
}

/// Volume growth that keeps `before * q` margin at the `after` unit margin
fn required_increase(before: f64, after: f64) -> Computed<f64> {
    if before <= 0.0 || after <= 0.0 {
        return Computed::Undefined(UndefinedReason::NonPositiveMargin);
    }
    Computed::finite(before / after - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(complements: Vec<Complement>) -> ComplementaryInput {
        ComplementaryInput {
            price: 100.0,
            unit_cost: 60.0,
            price_cut: 0.10,
            complements,
        }
    }

    #[test]
    fn test_core_only() {
        let analysis = complementary_analysis(&input(Vec::new())).unwrap();
        // 40 -> 30 margin: +33.3% volume
        assert!((analysis.core_margin_after - 30.0).abs() < 1e-9);
        let required = analysis.required_volume_increase.value().unwrap();
        assert!((required - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(analysis.required_volume_increase_core_only, Computed::finite(required));
    }

    #[test]
    fn test_complements_lower_required_increase() {
        let analysis = complementary_analysis(&input(vec![Complement {
            name: "case".to_string(),
            price: 30.0,
            cost: 10.0,
            attach_rate: 0.5,
        }]))
        .unwrap();

        assert!((analysis.expected_complement_margin - 10.0).abs() < 1e-9);
        // Blended 50 -> 40: +25%
        let required = analysis.required_volume_increase.value().unwrap();
        assert!((required - 0.25).abs() < 1e-9);
        assert!(required < analysis.required_volume_increase_core_only.value().unwrap());
    }

    #[test]
    fn test_core_loss_offset_by_complements() {
        // Core sells at a loss after the cut, complements carry it
        let analysis = complementary_analysis(&ComplementaryInput {
            price: 100.0,
            unit_cost: 95.0,
            price_cut: 0.10,
            complements: vec![Complement {
                name: "refill".to_string(),
                price: 20.0,
                cost: 5.0,
                attach_rate: 1.0,
            }],
        })
        .unwrap();

        assert!(analysis.required_volume_increase_core_only.is_undefined());
        // Blended 20 -> 10
        assert!((analysis.required_volume_increase.value().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_blended_margin_is_undefined() {
        let analysis = complementary_analysis(&ComplementaryInput {
            price: 100.0,
            unit_cost: 95.0,
            price_cut: 0.10,
            complements: vec![Complement {
                name: "refill".to_string(),
                price: 10.0,
                cost: 5.0,
                attach_rate: 1.0,
            }],
        })
        .unwrap();

        assert_eq!(analysis.blended_margin_after, 0.0);
        assert_eq!(
            analysis.required_volume_increase,
            Computed::Undefined(UndefinedReason::NonPositiveMargin)
        );
    }

    #[test]
    fn test_attach_rate_out_of_range() {
        let result = complementary_analysis(&input(vec![Complement {
            name: "case".to_string(),
            price: 30.0,
            cost: 10.0,
            attach_rate: 1.5,
        }]));
        assert!(matches!(result, Err(ValidationError::NotAFraction { .. })));
    }
}
