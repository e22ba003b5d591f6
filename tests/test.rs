use std::f64::consts::PI;
use std::path::PathBuf;

use rstest::*;
use safe_calc::{evaluate, evaluate_with, CalculatorTool, EvalError, EvalOptions, Strictness};

/// Every non-comment line of a fixture reads `expression => expected`, where
/// `expected` is a number, `inf` or `invalid`.
#[rstest]
fn test_files(#[files("tests/resources/**/*.calc")] file: PathBuf) {
    let source = std::fs::read_to_string(&file).expect("failed to read fixture file");

    for line in source.lines().filter(|l| !l.starts_with('#') && !l.trim().is_empty()) {
        let (expression, expected) = line
            .rsplit_once("=>")
            .expect("fixture lines look like `expression => expected`");
        let expected = expected.trim();
        let result = evaluate(expression);

        if expected == "invalid" {
            assert!(result.is_err(), "'{expression}' should be invalid, got {result:?}");
            continue;
        }

        let expected: f64 = expected.parse().expect("expected value is a number");
        let value = result.unwrap_or_else(|e| panic!("'{expression}' failed: {e}"));
        if expected.is_infinite() {
            assert_eq!(value, expected, "when evaluating '{expression}'");
        } else {
            assert!(
                (value - expected).abs() <= 1e-12 * expected.abs().max(1.0),
                "'{expression}' evaluated to {value}, expected {expected}"
            );
        }
    }
}

#[rstest]
#[case("2 + 3 * 4", "2 + 3 * 4 = 14")]
#[case("2**3**2", "2**3**2 = 512")]
#[case("sqrt(144) * pi", "sqrt(144) * pi = 37.69911184307752")]
#[case("foo(1)", "Could not evaluate expression: foo(1)")]
#[case("(((", "Could not evaluate expression: (((")]
fn test_tool_reply(#[case] expression: &str, #[case] expected: &str) {
    assert_eq!(CalculatorTool::default().call(expression), expected);
}

/// Malformed input never panics: strict mode always rejects it, lenient mode
/// either rejects it or recovers the value given here.
#[rstest]
#[case("", None)]
#[case("(", None)]
#[case(")))", None)]
#[case("2 +", None)]
#[case("**", None)]
#[case("sqrt()", None)]
#[case("$$$", None)]
#[case("1..2", None)]
#[case("-", None)]
#[case("ünïcödé ÷ 2", None)]
#[case("pi pi pi (", Some(PI))]
#[case("(1 + 2", Some(3.0))]
#[case("4 $ * 2", Some(8.0))]
fn test_malformed_input(#[case] expression: &str, #[case] lenient: Option<f64>) {
    let result = evaluate(expression);
    match lenient {
        Some(expected) => assert_eq!(result, Ok(expected), "when evaluating '{expression}'"),
        None => assert!(result.is_err(), "'{expression}' should fail, got {result:?}"),
    }

    let strict = EvalOptions {
        strictness: Strictness::Strict,
        ..EvalOptions::default()
    };
    let result = evaluate_with(expression, &strict);
    assert!(result.is_err(), "'{expression}' should fail in strict mode, got {result:?}");
}

#[test]
fn test_idempotent() {
    for expression in ["sqrt(2) ^ 2", "foo(1)", "(1 + 2", "1/3"] {
        let first = evaluate(expression);
        for _ in 0..3 {
            assert_eq!(evaluate(expression), first, "when evaluating '{expression}'");
        }
    }
}

#[test]
fn test_concurrent_evaluation() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let expression = format!("{i} ** 2 + sqrt({i} * {i})");
                evaluate(&expression)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let i = i as f64;
        assert_eq!(handle.join().expect("thread panicked"), Ok(i * i + i));
    }
}

#[test]
fn test_deeply_nested_input_is_rejected() {
    let expression = "(".repeat(100_000);
    assert!(matches!(
        evaluate(&expression),
        Err(EvalError::TooDeep { .. })
    ));

    let tool = CalculatorTool::default();
    assert!(matches!(
        tool.evaluate(&expression),
        Err(EvalError::TooLong { len: 100_000, .. })
    ));
}
