use benefits_calculator::{
    confidence, evaluate, registry, CalculationResult, InputValues, ProjectTypeId, CONFIDENCE_LEVELS,
};
use proptest::prelude::*;

fn project_type_strategy() -> impl Strategy<Value = ProjectTypeId> {
    prop_oneof![
        Just(ProjectTypeId::Sales),
        Just(ProjectTypeId::Productivity),
        Just(ProjectTypeId::Employee),
        Just(ProjectTypeId::Nps),
    ]
}

#[test]
fn test_spec_sales_example_end_to_end() {
    let inputs: InputValues = [
        ("stores", 2.0),
        ("weeks", 10.0),
        ("baseSales", 5000.0),
        ("uplift", 10.0),
        ("grossMargin", 40.0),
    ]
    .into_iter()
    .collect();

    let result = evaluate("sales", &inputs).unwrap();
    assert!((result.get("incrementalSales").unwrap() - 10000.0).abs() < 1e-6);
    assert!((result.get("grossProfit").unwrap() - 4000.0).abs() < 1e-6);
    assert!((confidence(&result, 50) - 2000.0).abs() < 1e-6);
    assert!((confidence(&result, 125) - 5000.0).abs() < 1e-6);
}

#[test]
fn test_confidence_100_equals_total_for_defaults() {
    for project_type in registry().iter() {
        let result = project_type.calculate(&project_type.defaults());
        assert_eq!(confidence(&result, 100), result.total());
    }
}

proptest! {
    #[test]
    fn prop_missing_keys_read_as_zero(
        id in project_type_strategy(),
        mask in 0u32..32,
        values in prop::collection::vec(-1.0e6f64..1.0e6, 5),
    ) {
        let project_type = registry().by_id(id);
        let mut partial = InputValues::new();
        let mut zero_filled = InputValues::new();

        for (i, field) in project_type.inputs.iter().enumerate() {
            if mask & (1 << i) != 0 {
                partial.set(field.key, values[i]);
                zero_filled.set(field.key, values[i]);
            } else {
                zero_filled.set(field.key, 0.0);
            }
        }

        let from_partial = project_type.calculate(&partial);
        let from_zeros = project_type.calculate(&zero_filled);

        prop_assert!(from_partial.total().is_finite());
        for (key, value) in from_partial.iter() {
            prop_assert!(value.is_finite(), "{} is not finite", key);
        }
        prop_assert_eq!(from_partial, from_zeros);
    }

    #[test]
    fn prop_non_numeric_entries_read_as_zero(id in project_type_strategy(), slot in 0usize..5) {
        let project_type = registry().by_id(id);
        let mut inputs = project_type.defaults();
        let key = project_type.inputs[slot].key;

        inputs.set(key, f64::NAN);
        let with_nan = project_type.calculate(&inputs);
        inputs.set(key, 0.0);
        let with_zero = project_type.calculate(&inputs);

        prop_assert_eq!(with_nan, with_zero);
    }

    #[test]
    fn prop_confidence_monotonic(total in 1.0e-3f64..1.0e12, negative in any::<bool>()) {
        let total = if negative { -total } else { total };
        let result = CalculationResult::new(ProjectTypeId::Sales, Vec::new(), total);
        let values: Vec<f64> = CONFIDENCE_LEVELS.iter().map(|&p| confidence(&result, p)).collect();

        for pair in values.windows(2) {
            if negative {
                prop_assert!(pair[0] > pair[1]);
            } else {
                prop_assert!(pair[0] < pair[1]);
            }
        }
        prop_assert_eq!(confidence(&result, 100), total);
    }
}
