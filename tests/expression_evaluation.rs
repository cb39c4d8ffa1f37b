use loancalc::expression::{
    Expression, ParseError,
    parse::{MAX_NESTING, MAX_OPERATORS},
};
use loancalc::{CompiledFunction, evaluate};
use proptest::prelude::*;

#[test]
fn test_evaluate_scenarios() {
    assert_eq!(evaluate(2.0, "x^2"), Some(4.0));
    assert_eq!(evaluate(0.0, "1/x"), None);
}

#[test]
fn test_negative_x_is_substituted_as_a_value() {
    // x is a value, not text pasted into the expression
    assert_eq!(evaluate(-2.0, "x^2"), Some(4.0));
    assert_eq!(evaluate(-2.0, "2^x"), Some(0.25));
    assert_eq!(evaluate(-2.0, "3-x"), Some(5.0));
    assert_eq!(evaluate(-2.0, "-x"), Some(2.0));
}

#[test]
fn test_only_arithmetic_is_accepted() {
    let hostile = [
        "alert(1)",
        "process.exit()",
        "x; x",
        "x = 2",
        "Math.sin(x)",
        "this",
        "[x]",
        "\"x\"",
        "x.constructor",
        "exp(x)",
    ];
    for text in hostile {
        assert_eq!(evaluate(1.0, text), None, "'{}' should not evaluate", text);
        assert!(CompiledFunction::new(text).is_err(), "'{}' should not parse", text);
    }
}

#[test]
fn test_parse_errors_say_where() {
    assert_eq!(Expression::parse("   ").unwrap_err(), ParseError::Empty);
    assert_eq!(
        Expression::parse("foo(x)").unwrap_err(),
        ParseError::UnknownName {
            name: "foo".to_string(),
            position: 0
        }
    );
    assert_eq!(Expression::parse("(x + 1").unwrap_err(), ParseError::UnexpectedEnd);
}

#[test]
fn test_deep_nesting_is_rejected_not_overflowed() {
    let deep = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
    assert_eq!(
        Expression::parse(&deep).unwrap_err(),
        ParseError::TooDeep(MAX_NESTING)
    );
    assert_eq!(evaluate(1.0, &deep), None);

    let signs = format!("{}x", "-".repeat(10_000));
    assert_eq!(evaluate(1.0, &signs), None);

    let shallow = format!("{}x{}", "(".repeat(32), ")".repeat(32));
    assert_eq!(evaluate(3.0, &shallow), Some(3.0));
}

#[test]
fn test_long_power_chain_is_rejected_not_overflowed() {
    let tower = format!("{}x", "x^".repeat(5_000));
    assert_eq!(
        Expression::parse(&tower).unwrap_err(),
        ParseError::TooDeep(MAX_NESTING)
    );
    assert_eq!(evaluate(1.0, &tower), None);

    let signed = format!("{}2", "2^-".repeat(5_000));
    assert_eq!(evaluate(1.0, &signed), None);

    assert_eq!(evaluate(2.0, "x^x^x"), Some(16.0));
}

#[test]
fn test_long_sum_is_rejected_not_overflowed() {
    let sum = vec!["x"; 200_000].join("+");
    assert_eq!(
        Expression::parse(&sum).unwrap_err(),
        ParseError::TooLong(MAX_OPERATORS)
    );
    assert_eq!(evaluate(1.0, &sum), None);

    let sum = vec!["x"; 100].join(" + ");
    assert_eq!(evaluate(1.0, &sum), Some(100.0));
}

#[test]
fn test_display_is_reparseable() {
    for text in ["-x^2", "(1 + x) * 2", "sin(x) / cos(x)", "2^3^x", "1 - (x - 1)"] {
        let expr = Expression::parse(text).unwrap();
        let reparsed = Expression::parse(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed, "{} -> {}", text, expr);
    }
}

proptest! {
    #[test]
    fn prop_evaluate_never_panics(text in "\\PC{0,40}", x in -1e6f64..1e6) {
        let _ = evaluate(x, &text);
    }

    #[test]
    fn prop_polynomial_matches_arithmetic(x in -1000i32..1000) {
        let x = x as f64;
        prop_assert_eq!(evaluate(x, "x^2 + 2*x + 1"), Some(x * x + 2.0 * x + 1.0));
    }

    #[test]
    fn prop_results_are_finite_or_undefined(x in -1e3f64..1e3) {
        for text in ["1/x", "ln(x)", "sqrt(x)", "tan(x)", "x^x"] {
            if let Some(y) = evaluate(x, text) {
                prop_assert!(y.is_finite());
            }
        }
    }
}
