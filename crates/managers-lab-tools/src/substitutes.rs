//! Required sales increase after a price cut when substitutes compete.
//!
//! Percent values (`required`, `feasible`, market capacity) are expressed in
//! percentage points; price reduction and margin are fractions.

use crate::validate::{self, ValidationError};

/// Sales increase (%) needed to offset a price reduction, scaled by how
/// strongly substitutes pull demand away.
///
/// A margin outside `(0, 1)` reports 0.
pub fn required_sales_increase(
    price_reduction: f64,
    contribution_margin: f64,
    substitution_factor: f64,
) -> Result<f64, ValidationError> {
    validate::non_negative("price_reduction", price_reduction)?;
    validate::finite("contribution_margin", contribution_margin)?;
    validate::non_negative("substitution_factor", substitution_factor)?;

    if contribution_margin <= 0.0 || contribution_margin >= 1.0 {
        return Ok(0.0);
    }
    let base_increase = price_reduction / contribution_margin * 100.0;
    Ok(base_increase * substitution_factor)
}

/// Cap a required increase at what the market can absorb
pub fn feasible_sales_increase(required: f64, max_market_capacity: f64) -> f64 {
    required.min(max_market_capacity)
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionScenario {
    pub name: String,
    pub factor: f64,
}

impl SubstitutionScenario {
    pub fn new(name: impl Into<String>, factor: f64) -> Self {
        Self {
            name: name.into(),
            factor,
        }
    }
}

/// Low, base, high and very aggressive substitution
pub fn default_scenarios() -> Vec<SubstitutionScenario> {
    vec![
        SubstitutionScenario::new("Low substitution", 0.8),
        SubstitutionScenario::new("Base case", 1.0),
        SubstitutionScenario::new("High substitution", 1.25),
        SubstitutionScenario::new("Very aggressive substitute", 1.5),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutesInput {
    pub price_reduction: f64,
    pub contribution_margin: f64,
    /// Largest sales increase (%) the market can absorb
    pub max_market_capacity: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub name: String,
    pub factor: f64,
    pub required: f64,
    pub feasible: f64,
    /// Change against the no-substitution requirement
    pub impact: f64,
}

impl ScenarioOutcome {
    /// The market cannot absorb the required increase
    pub fn exceeds_market(&self) -> bool {
        self.required > self.feasible
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutesAnalysis {
    pub base_required: f64,
    pub base_feasible: f64,
    pub scenarios: Vec<ScenarioOutcome>,
}

pub fn substitutes_sensitivity(
    input: &SubstitutesInput,
    scenarios: &[SubstitutionScenario],
) -> Result<SubstitutesAnalysis, ValidationError> {
    validate::non_negative("max_market_capacity", input.max_market_capacity)?;

    let base_required = required_sales_increase(input.price_reduction, input.contribution_margin, 1.0)?;
    let base_feasible = feasible_sales_increase(base_required, input.max_market_capacity);

    let scenarios = scenarios
        .iter()
        .map(|scenario| {
            let required =
                required_sales_increase(input.price_reduction, input.contribution_margin, scenario.factor)?;
            Ok(ScenarioOutcome {
                name: scenario.name.clone(),
                factor: scenario.factor,
                required,
                feasible: feasible_sales_increase(required, input.max_market_capacity),
                impact: required - base_required,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(SubstitutesAnalysis {
        base_required,
        base_feasible,
        scenarios,
    })
}
