//! Inventory turnover in days, by units or by value.

use crate::validate::{self, ValidationError};

const DAYS_PER_YEAR: f64 = 365.0;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnoverBasis {
    /// Average units held against units sold
    Quantity,
    /// Average inventory value against cost of goods sold
    Value,
}

/// Days inventory is held: `average * 365 / flow`.
///
/// A period with no outflow reports 0 days rather than infinity.
pub fn turnover_days(average: f64, flow: f64) -> Result<f64, ValidationError> {
    validate::non_negative("average inventory", average)?;
    validate::non_negative("outflow", flow)?;
    if flow == 0.0 {
        return Ok(0.0);
    }
    Ok(average * DAYS_PER_YEAR / flow)
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    /// Average inventory, in units or value depending on the basis
    pub average: f64,
    /// Units sold, or cost of goods sold
    pub flow: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TurnoverLine {
    pub name: String,
    pub basis: TurnoverBasis,
    pub days: f64,
}

/// Turnover for several products on the same basis
pub fn turnover_report(basis: TurnoverBasis, items: &[InventoryItem]) -> Result<Vec<TurnoverLine>, ValidationError> {
    items
        .iter()
        .map(|item| {
            Ok(TurnoverLine {
                name: item.name.clone(),
                basis,
                days: turnover_days(item.average, item.flow)?,
            })
        })
        .collect()
}
