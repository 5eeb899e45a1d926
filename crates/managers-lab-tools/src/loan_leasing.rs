//! Loan versus leasing for a property purchase.
//!
//! Both structures finance part of the value through monthly annuity
//! installments and the remainder (plus extra costs) through working capital.
//! Interest and depreciation shield taxes; the final burden is what the
//! property costs after that shield.

use crate::computed::{Computed, UndefinedReason};
use crate::validate::{self, ValidationError};

const MONTHS_PER_YEAR: f64 = 12.0;

/// When installments fall due within each period
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentTiming {
    #[default]
    EndOfPeriod,
    BeginningOfPeriod,
}

/// Level installment that repays `present_value` over `periods` at `rate`
/// per period. A zero rate degenerates to straight division.
pub fn payment(rate: f64, periods: f64, present_value: f64, timing: PaymentTiming) -> f64 {
    // (1 + rate)^periods - 1 without cancellation for tiny rates
    let accrued = (periods * rate.ln_1p()).exp_m1();
    if rate == 0.0 || accrued == 0.0 {
        return present_value / periods;
    }
    let growth = 1.0 + accrued;
    let when = match timing {
        PaymentTiming::EndOfPeriod => 0.0,
        PaymentTiming::BeginningOfPeriod => 1.0,
    };
    present_value * growth * rate / ((1.0 + rate * when) * accrued)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanLeaseInput {
    /// Annual loan (and leasing) interest rate, fraction
    pub loan_rate: f64,
    /// Annual working capital interest rate, fraction
    pub working_capital_rate: f64,
    pub years: f64,
    /// Corporate tax rate, fraction
    pub tax_rate: f64,
    pub timing: PaymentTiming,
    pub property_value: f64,
    /// Share of the value financed by the loan
    pub loan_share: f64,
    /// Share of the value financed by the lease
    pub lease_share: f64,
    pub loan_extra_costs: f64,
    pub lease_extra_costs: f64,
    pub residual_value: f64,
    pub depreciation_years: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FinancingBreakdown {
    pub installment: f64,
    pub working_capital: f64,
    pub working_capital_installment: f64,
    pub cash_outflows: f64,
    /// Interest or financing cost over the whole term
    pub financing_cost: f64,
    /// Depreciation (plus residual value for leasing)
    pub depreciation: f64,
    pub tax_benefit: f64,
    pub final_burden: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Financing {
    Loan,
    Leasing,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LoanVsLeasing {
    pub loan: FinancingBreakdown,
    pub leasing: FinancingBreakdown,
    pub preferred: Financing,
}

/// Inputs too extreme for a finite burden report `Undefined(NonFinite)`.
pub fn loan_vs_leasing(input: &LoanLeaseInput) -> Result<Computed<LoanVsLeasing>, ValidationError> {
    validate::non_negative("loan_rate", input.loan_rate)?;
    validate::non_negative("working_capital_rate", input.working_capital_rate)?;
    validate::positive("years", input.years)?;
    validate::fraction("tax_rate", input.tax_rate)?;
    validate::non_negative("property_value", input.property_value)?;
    validate::fraction("loan_share", input.loan_share)?;
    validate::fraction("lease_share", input.lease_share)?;
    validate::non_negative("loan_extra_costs", input.loan_extra_costs)?;
    validate::non_negative("lease_extra_costs", input.lease_extra_costs)?;
    validate::non_negative("residual_value", input.residual_value)?;
    validate::positive("depreciation_years", input.depreciation_years)?;

    let months = input.years * MONTHS_PER_YEAR;
    let value = input.property_value;
    let monthly = |annual: f64, principal: f64| payment(annual / MONTHS_PER_YEAR, months, principal, input.timing);

    let loan = {
        let installment = monthly(input.loan_rate, value * input.loan_share);
        let working_capital = value * (1.0 - input.loan_share) + input.loan_extra_costs;
        let working_capital_installment = monthly(input.working_capital_rate, working_capital);

        let cash_outflows = (installment + working_capital_installment) * months;
        let financing_cost = cash_outflows - value;
        let depreciation = (value + input.loan_extra_costs) / input.depreciation_years * input.years;
        let tax_benefit = (financing_cost + depreciation) * input.tax_rate;
        FinancingBreakdown {
            installment,
            working_capital,
            working_capital_installment,
            cash_outflows,
            financing_cost,
            depreciation,
            tax_benefit,
            final_burden: value + financing_cost - tax_benefit,
        }
    };

    let leasing = {
        let installment = monthly(input.loan_rate, value * input.lease_share);
        let working_capital = value * (1.0 - input.lease_share) + input.lease_extra_costs;
        let working_capital_installment = monthly(input.working_capital_rate, working_capital);

        let cash_outflows = (installment + working_capital_installment) * months;
        let financing_cost = cash_outflows - value;
        // Value, extra costs and residual are all deductible under a lease
        let depreciation = value + input.lease_extra_costs + input.residual_value;
        let working_capital_interest = working_capital_installment * months - working_capital;
        let tax_benefit = (working_capital_interest + depreciation) * input.tax_rate;
        FinancingBreakdown {
            installment,
            working_capital,
            working_capital_installment,
            cash_outflows,
            financing_cost,
            depreciation,
            tax_benefit,
            final_burden: value + financing_cost - tax_benefit,
        }
    };

    if !(loan.final_burden.is_finite() && leasing.final_burden.is_finite()) {
        return Ok(Computed::Undefined(UndefinedReason::NonFinite));
    }

    let preferred = if loan.final_burden < leasing.final_burden {
        Financing::Loan
    } else {
        Financing::Leasing
    };

    Ok(Computed::Value(LoanVsLeasing {
        loan,
        leasing,
        preferred,
    }))
}
