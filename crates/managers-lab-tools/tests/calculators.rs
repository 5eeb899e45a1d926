use approx::assert_abs_diff_eq;
use managers_lab_tools::{
    Computed, UndefinedReason,
    break_even::{BreakEvenInput, ShiftVerdict, break_even_shift},
    inventory::{InventoryItem, TurnoverBasis, turnover_days, turnover_report},
    loss_threshold::{LossThresholdInput, sales_loss_threshold},
    substitutes::{SubstitutesInput, default_scenarios, substitutes_sensitivity},
    supplier_credit::{SupplierCreditInput, supplier_credit},
    validate::{ValidationError, parse_number},
};
use rstest::*;

#[fixture]
fn break_even_input() -> BreakEvenInput {
    BreakEvenInput {
        old_price: 10.50,
        new_price: 11.00,
        old_cost: 6.00,
        new_cost: 6.50,
        investment: 0.0,
        units_sold: 500.0,
    }
}

#[rstest]
fn break_even_reproduces_current_volume(break_even_input: BreakEvenInput) {
    let shift = break_even_shift(&break_even_input).unwrap().value().unwrap();

    assert_abs_diff_eq!(shift.old_break_even, 500.0, epsilon = 1e-9);
    // Margin unchanged at 4.50, so nothing moves
    assert_abs_diff_eq!(shift.new_break_even, 500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(shift.percent_change.value().unwrap(), 0.0, epsilon = 1e-9);
    assert_eq!(shift.verdict, Computed::Value(ShiftVerdict::Absorbed));
}

#[rstest]
#[case(0.0, ShiftVerdict::Absorbed)]
#[case(450.0, ShiftVerdict::Stressed)]
#[case(2250.0, ShiftVerdict::HighRisk)]
fn investment_raises_break_even(
    break_even_input: BreakEvenInput,
    #[case] investment: f64,
    #[case] expected: ShiftVerdict,
) {
    let shift = break_even_shift(&BreakEvenInput {
        investment,
        ..break_even_input
    })
    .unwrap()
    .value()
    .unwrap();

    assert_abs_diff_eq!(shift.units_change, investment / 4.5, epsilon = 1e-9);
    assert_eq!(shift.verdict, Computed::Value(expected));
}

#[rstest]
fn zero_margin_break_even_is_undefined(break_even_input: BreakEvenInput) {
    let result = break_even_shift(&BreakEvenInput {
        old_price: 6.00,
        old_cost: 6.00,
        ..break_even_input
    })
    .unwrap();
    assert_eq!(result.undefined_reason(), Some(&UndefinedReason::NonPositiveMargin));
}

#[rstest]
#[case::zero_flow(100.0, 0.0, 0.0)]
#[case::units(100.0, 1000.0, 36.5)]
#[case::value(20_000.0, 146_000.0, 50.0)]
fn turnover(#[case] average: f64, #[case] flow: f64, #[case] days: f64) {
    assert_abs_diff_eq!(turnover_days(average, flow).unwrap(), days, epsilon = 1e-9);
}

#[rstest]
fn turnover_report_keeps_order() {
    let items = vec![
        InventoryItem {
            name: "steel".to_string(),
            average: 500.0,
            flow: 3650.0,
        },
        InventoryItem {
            name: "paint".to_string(),
            average: 40.0,
            flow: 0.0,
        },
    ];
    let report = turnover_report(TurnoverBasis::Quantity, &items).unwrap();
    let names: Vec<_> = report.iter().map(|line| line.name.as_str()).collect();
    assert_eq!(names, ["steel", "paint"]);
    assert_abs_diff_eq!(report[0].days, 50.0, epsilon = 1e-9);
    assert_eq!(report[1].days, 0.0);
}

#[rstest]
fn substitutes_scenarios_scale_linearly() {
    let input = SubstitutesInput {
        price_reduction: 0.05,
        contribution_margin: 0.40,
        max_market_capacity: 150.0,
    };
    let analysis = substitutes_sensitivity(&input, &default_scenarios()).unwrap();

    assert_abs_diff_eq!(analysis.base_required, 12.5, epsilon = 1e-9);
    for outcome in &analysis.scenarios {
        assert_abs_diff_eq!(outcome.required, 12.5 * outcome.factor, epsilon = 1e-9);
        assert!(!outcome.exceeds_market());
    }
}

#[rstest]
fn supplier_credit_default_case() {
    let result = supplier_credit(&SupplierCreditInput {
        credit_days: 60.0,
        discount: 0.02,
        cash_share: 0.50,
        current_sales: parse_number("sales", "2,000,000").unwrap(),
        unit_price: 20.0,
        unit_cost: 18.0,
        interest_rate: 0.10,
    })
    .unwrap();

    assert_abs_diff_eq!(result.net_gain, 5_000.0, epsilon = 1e-6);
    assert!(result.is_profitable());
}

#[rstest]
fn loss_threshold_serializes_undefined() {
    let result = sales_loss_threshold(&LossThresholdInput {
        competitor_old_price: 8.0,
        competitor_new_price: 7.2,
        our_price: 4.5,
        unit_cost: 4.5,
    })
    .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "undefined");
    assert_eq!(json["value"]["zero_denominator"], "margin");
}

#[rstest]
fn undefined_reasons_serialize_snake_case(break_even_input: BreakEvenInput) {
    let result = break_even_shift(&BreakEvenInput {
        new_price: 6.50,
        ..break_even_input
    })
    .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "undefined", "value": "non_positive_margin"}));
}

#[rstest]
#[case("-3", "must not be negative")]
#[case("abc", "Invalid number")]
fn bad_inputs_are_rejected(#[case] text: &str, #[case] message: &str) {
    let err = parse_number("units_sold", text)
        .and_then(|units_sold| {
            break_even_shift(&BreakEvenInput {
                units_sold,
                ..break_even_input()
            })
            .map(|_| units_sold)
        })
        .unwrap_err();
    assert!(err.to_string().contains(message), "{err}");
    assert!(matches!(
        err,
        ValidationError::Negative { .. } | ValidationError::InvalidNumber { .. }
    ));
}
