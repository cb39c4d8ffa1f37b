#![cfg(test)]

use crate::expression::CompiledFunction;

// Helper function to assert floating point equality with tolerance
pub fn assert_float_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() < tolerance,
        "Expected {} to be approximately equal to {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

/// Parse a function that the test expects to be valid.
pub fn compile(text: &str) -> CompiledFunction {
    CompiledFunction::new(text)
        .unwrap_or_else(|err| panic!("'{}' should parse: {}", text, err))
}
