//! Average unit cost across regular and overtime production.

use crate::validate::{self, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct UnitCostInput {
    pub regular_units: f64,
    pub overtime_units: f64,
    pub raw_material_cost: f64,
    pub operating_cost_regular: f64,
    pub operating_cost_overtime: f64,
    pub labor_cost_regular: f64,
    pub labor_cost_overtime: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCosts {
    pub average_total: f64,
    pub average_regular: f64,
    pub average_overtime: f64,
}

/// Averages with no volume behind them report 0.
pub fn unit_costs(input: &UnitCostInput) -> Result<UnitCosts, ValidationError> {
    validate::non_negative("regular_units", input.regular_units)?;
    validate::non_negative("overtime_units", input.overtime_units)?;
    validate::non_negative("raw_material_cost", input.raw_material_cost)?;
    validate::non_negative("operating_cost_regular", input.operating_cost_regular)?;
    validate::non_negative("operating_cost_overtime", input.operating_cost_overtime)?;
    validate::non_negative("labor_cost_regular", input.labor_cost_regular)?;
    validate::non_negative("labor_cost_overtime", input.labor_cost_overtime)?;

    let total_units = input.regular_units + input.overtime_units;
    let total_cost = input.raw_material_cost
        + input.operating_cost_regular
        + input.operating_cost_overtime
        + input.labor_cost_regular
        + input.labor_cost_overtime;

    let per_unit = |cost: f64, units: f64| if units == 0.0 { 0.0 } else { cost / units };
    // Raw material is shared evenly across every unit produced
    let raw_per_unit = per_unit(input.raw_material_cost, total_units);

    let shift_average = |labor: f64, operating: f64, units: f64| {
        if units == 0.0 {
            0.0
        } else {
            labor / units + operating / units + raw_per_unit
        }
    };

    Ok(UnitCosts {
        average_total: per_unit(total_cost, total_units),
        average_regular: shift_average(input.labor_cost_regular, input.operating_cost_regular, input.regular_units),
        average_overtime: shift_average(
            input.labor_cost_overtime,
            input.operating_cost_overtime,
            input.overtime_units,
        ),
    })
}
