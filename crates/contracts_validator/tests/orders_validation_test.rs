//! Integration tests for the validation engine.
//!
//! These tests run complete contracts against realistic order records, covering
//! the jump from a structural-only contract to one with semantic units.

use contracts_core::{
    Contract, ContractBuilder, DataSet, DataValue, FailureDetail, FieldBuilder, Outcome, Phase,
    Record, RuleErrorCause, SemanticViolation, ValidationContext, ValueKind,
};
use contracts_validator::{DataValidator, compile, evaluate_rule, validate, validate_batch};
use pretty_assertions::assert_eq;

/// Structural-only contract: amounts are just numbers.
fn orders_v1() -> Contract {
    ContractBuilder::new("orders")
        .version("1.0.0")
        .owner("payments-team")
        .field(FieldBuilder::new("order_id", "string").required(true).build())
        .field(FieldBuilder::new("amount_cents", "number").required(true).build())
        .field(FieldBuilder::new("currency", "string").required(true).build())
        .build()
}

/// Same fields, now with a unit tag and business rules.
fn orders_v2() -> Contract {
    ContractBuilder::new("orders")
        .version("2.0.0")
        .owner("payments-team")
        .field(FieldBuilder::new("order_id", "string").required(true).build())
        .field(
            FieldBuilder::new("amount_cents", "number")
                .required(true)
                .tag("unit", "cents")
                .description("Order total in minor currency units")
                .build(),
        )
        .field(FieldBuilder::new("currency", "string").required(true).build())
        .quality_rule("positive_amount", "amount_cents > 0")
        .quality_rule("iso_currency", "matches(currency, '^[A-Z]{3}$')")
        .build()
}

fn order(id: &str, amount: DataValue, currency: &str) -> Record {
    Record::from([
        ("order_id".to_string(), DataValue::from(id)),
        ("amount_cents".to_string(), amount),
        ("currency".to_string(), DataValue::from(currency)),
    ])
}

#[test]
fn test_v1_accepts_what_v2_rejects() {
    let record = order("o-1", DataValue::Number(19.99), "EUR");

    let v1 = validate(&orders_v1(), &record).unwrap();
    assert!(v1.passed(), "v1 should pass: {:?}", v1);

    let v2 = validate(&orders_v2(), &record).unwrap();
    let failure = v2.outcome.failure().unwrap();
    assert_eq!(failure.phase, Phase::Semantic);
    assert_eq!(
        failure.detail,
        FailureDetail::Semantic(SemanticViolation {
            field: "amount_cents".to_string(),
            tag_key: "unit".to_string(),
            tag: "cents".to_string(),
            expected_type: ValueKind::Integer,
            actual_type: ValueKind::Number,
        })
    );
    assert_eq!(
        failure.message,
        "Field 'amount_cents' with unit 'cents' must be integer, found number"
    );
}

#[test]
fn test_negative_amount_fails_positive_amount_rule() {
    let verdict = validate(&orders_v2(), &order("o-2", DataValue::Integer(-5), "EUR")).unwrap();

    let failure = verdict.outcome.failure().unwrap();
    assert_eq!(failure.phase, Phase::QualityRule);
    assert_eq!(failure.subject, "positive_amount");
    assert!(matches!(failure.detail, FailureDetail::RuleFalse { .. }));
}

#[test]
fn test_missing_required_field_is_the_only_violation() {
    let record = Record::from([
        ("order_id".to_string(), DataValue::from("o-3")),
        ("currency".to_string(), DataValue::from("EUR")),
    ]);

    let verdict = validate(&orders_v2(), &record).unwrap();
    let failure = verdict.outcome.failure().unwrap();
    assert_eq!(failure.phase, Phase::Structural);
    assert_eq!(failure.message, "Required field 'amount_cents' is missing");
    assert!(failure.additional.is_empty());
}

#[test]
fn test_rule_referencing_absent_field_is_a_rule_error() {
    let contract = ContractBuilder::new("orders")
        .field(FieldBuilder::new("amount_cents", "integer").build())
        .quality_rule("positive_amount", "amount_cents > 0")
        .build();

    let verdict = validate(&contract, &Record::new()).unwrap();
    let failure = verdict.outcome.failure().unwrap();
    match &failure.detail {
        FailureDetail::RuleError(err) => {
            assert_eq!(err.rule_name, "positive_amount");
            assert_eq!(
                err.cause,
                RuleErrorCause::MissingField {
                    field: "amount_cents".to_string()
                }
            );
        }
        other => panic!("expected a rule error, got {:?}", other),
    }
}

#[test]
fn test_rule_result_equals_direct_evaluation() {
    let contract = orders_v2();
    for amount in [-100_i64, -1, 0, 1, 100] {
        let record = order("o", DataValue::Integer(amount), "EUR");
        let direct = evaluate_rule(&contract.quality_rules()[0], &record).unwrap();
        assert_eq!(direct, amount > 0);

        let verdict = validate(&contract, &record).unwrap();
        assert_eq!(verdict.passed(), amount > 0);
    }
}

#[test]
fn test_revalidation_is_idempotent() {
    let validator = compile(&orders_v2()).unwrap();
    let records = vec![
        order("o-1", DataValue::Integer(1999), "EUR"),
        order("o-2", DataValue::Number(19.99), "EUR"),
        order("o-3", DataValue::Integer(500), "euro"),
    ];

    let first = validator.validate_batch(&records);
    let second = validator.validate_batch(&records);
    assert_eq!(first, second);
}

#[test]
fn test_batch_retains_every_failure() {
    let records = vec![
        order("o-1", DataValue::Integer(1999), "EUR"),
        order("o-2", DataValue::Number(19.99), "EUR"),
        order("o-3", DataValue::Integer(500), "euro"),
        order("o-4", DataValue::Integer(-1), "USD"),
        order("o-5", DataValue::Integer(250), "USD"),
    ];

    let report = validate_batch(&orders_v2(), &records).unwrap();
    assert!(!report.passed);
    assert_eq!(report.records_validated, 5);
    assert_eq!(report.records_failed, 3);

    let failures: Vec<(usize, Phase, &str)> = report
        .failures()
        .map(|(index, failure)| (index, failure.phase, failure.subject.as_str()))
        .collect();
    assert_eq!(
        failures,
        vec![
            (1, Phase::Semantic, "amount_cents"),
            (2, Phase::QualityRule, "iso_currency"),
            (3, Phase::QualityRule, "positive_amount"),
        ]
    );
}

#[test]
fn test_empty_batch_passes() {
    let report = validate_batch(&orders_v2(), &[]).unwrap();
    assert!(report.passed);
    assert!(report.verdicts.is_empty());
}

#[test]
fn test_records_loaded_from_json() {
    let input = r#"[
        {"order_id": "o-1", "amount_cents": 1999, "currency": "EUR"},
        {"order_id": "o-2", "amount_cents": 19.99, "currency": "EUR"},
        {"order_id": "o-3", "amount_cents": 500, "currency": null}
    ]"#;
    let dataset = DataSet::from_json_str(input).unwrap();
    let validator = DataValidator::compile(&orders_v2()).unwrap();

    let report = validator.validate_with_data(&dataset, &ValidationContext::new());
    let phases: Vec<Phase> = report.failures().map(|(_, f)| f.phase).collect();
    assert_eq!(phases, vec![Phase::Semantic, Phase::Structural]);
}

#[test]
fn test_shared_validator_across_threads() {
    let validator = compile(&orders_v2()).unwrap();
    let records: Vec<Record> = (0..64)
        .map(|i| order(&format!("o-{}", i), DataValue::Integer(i - 32), "EUR"))
        .collect();

    let expected: Vec<Outcome> = records.iter().map(|r| validator.validate(r)).collect();

    let outcomes: Vec<Vec<Outcome>> = std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(16)
            .map(|chunk| {
                let validator = &validator;
                scope.spawn(move || chunk.iter().map(|r| validator.validate(r)).collect::<Vec<_>>())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.concat(), expected);
}
