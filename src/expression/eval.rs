//! Interpretation of a parsed [`Expression`] over the reals.
//!
//! Evaluation is total over the AST: the only failure is a non-finite
//! intermediate or final value, which callers treat as "undefined at this
//! point" rather than as an error of the whole expression.

use std::str::FromStr;

use log::trace;
use thiserror::Error;

use super::{Expression, parse::ParseError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("'{expression}' is not a finite number at x = {x}")]
    NonFinite { expression: String, x: f64 },
}

impl Expression {
    /// Evaluates the expression with `x` bound to the given value.
    pub fn eval(&self, x: f64) -> Result<f64, EvalError> {
        let value = self.eval_raw(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite {
                expression: self.to_string(),
                x,
            })
        }
    }

    /// Evaluates without checking; non-finite values propagate through
    /// IEEE arithmetic and are rejected once at the top.
    fn eval_raw(&self, x: f64) -> f64 {
        match self {
            Expression::Constant(value) => value.0,
            Expression::Named(constant) => constant.value(),
            Expression::Variable => x,
            Expression::Parentheses(expr) | Expression::UnaryPlus(expr) => expr.eval_raw(x),
            Expression::UnaryMinus(expr) => -expr.eval_raw(x),
            Expression::Exponentiation(base, exponent) => {
                base.eval_raw(x).powf(exponent.eval_raw(x))
            }
            Expression::Multiply(lhs, rhs) => lhs.eval_raw(x) * rhs.eval_raw(x),
            Expression::Divide(lhs, rhs) => lhs.eval_raw(x) / rhs.eval_raw(x),
            Expression::Add(lhs, rhs) => lhs.eval_raw(x) + rhs.eval_raw(x),
            Expression::Subtract(lhs, rhs) => lhs.eval_raw(x) - rhs.eval_raw(x),
            Expression::FunctionCall { function, argument } => {
                let arg = argument.eval_raw(x);
                // A non-finite argument stays undefined even when the
                // function would map it back into the reals (e.g. tan(inf)).
                if arg.is_finite() {
                    function.apply(arg)
                } else {
                    f64::NAN
                }
            }
        }
    }
}

/// A parsed function of `x`, ready to be sampled many times.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    source: String,
    expression: Expression,
}

impl CompiledFunction {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            source: source.trim().to_string(),
            expression: Expression::parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Value at `x`, or `None` where the function is undefined.
    pub fn at(&self, x: f64) -> Option<f64> {
        match self.expression.eval(x) {
            Ok(value) => Some(value),
            Err(err) => {
                trace!("{}", err);
                None
            }
        }
    }
}

impl FromStr for CompiledFunction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompiledFunction::new(s)
    }
}

/// Evaluates `text` at `x`.
///
/// Returns `None` when the text does not parse or the value is not a finite
/// real number. Never panics and never executes anything but arithmetic.
///
/// ```rust
/// use loancalc::evaluate;
///
/// assert_eq!(evaluate(2.0, "x^2"), Some(4.0));
/// assert_eq!(evaluate(0.0, "1/x"), None);
/// assert_eq!(evaluate(1.0, "x +"), None);
/// ```
pub fn evaluate(x: f64, text: &str) -> Option<f64> {
    match CompiledFunction::new(text) {
        Ok(function) => function.at(x),
        Err(err) => {
            trace!("'{}' does not parse: {}", text, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_float_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate(2.0, "x^2"), Some(4.0));
        assert_eq!(evaluate(3.0, "2 * x + 1"), Some(7.0));
        assert_eq!(evaluate(0.0, "(1 + 2) * 4"), Some(12.0));
        assert_eq!(evaluate(0.0, "8 / 4 / 2"), Some(1.0));
        assert_eq!(evaluate(0.0, "8 - 4 - 2"), Some(2.0));
    }

    #[test]
    fn test_negative_substitution_keeps_precedence() {
        assert_eq!(evaluate(-3.0, "x^2"), Some(9.0));
        assert_eq!(evaluate(-3.0, "-x^2"), Some(-9.0));
        assert_eq!(evaluate(-2.0, "x*x*x"), Some(-8.0));
        assert_eq!(evaluate(-2.0, "1 - x"), Some(3.0));
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(evaluate(0.0, "2^3^2"), Some(512.0));
        assert_eq!(evaluate(0.0, "2^-1"), Some(0.5));
        assert_eq!(evaluate(4.0, "x^0.5"), Some(2.0));
    }

    #[test]
    fn test_functions_and_constants() {
        assert_float_eq(evaluate(PI / 2.0, "sin(x)").unwrap(), 1.0, 1e-12);
        assert_float_eq(evaluate(0.0, "cos(x)").unwrap(), 1.0, 1e-12);
        assert_float_eq(evaluate(PI / 4.0, "tan(x)").unwrap(), 1.0, 1e-12);
        assert_eq!(evaluate(16.0, "sqrt(x)"), Some(4.0));
        assert_eq!(evaluate(-5.0, "abs(x)"), Some(5.0));
        assert_eq!(evaluate(100.0, "log(x)"), Some(2.0));
        assert_float_eq(evaluate(1.0, "ln(e)").unwrap(), 1.0, 1e-12);
        assert_float_eq(evaluate(1.0, "pi * x").unwrap(), PI, 1e-12);
        assert_float_eq(evaluate(1.0, "sin(x)+x^2").unwrap(), 1.0f64.sin() + 1.0, 1e-12);
    }

    #[test]
    fn test_undefined_points() {
        assert_eq!(evaluate(0.0, "1/x"), None);
        assert_eq!(evaluate(-1.0, "sqrt(x)"), None);
        assert_eq!(evaluate(0.0, "ln(x)"), None);
        assert_eq!(evaluate(-8.0, "x^(1/3)"), None);
        assert_eq!(evaluate(0.0, "0/0"), None);
        assert_eq!(evaluate(1000.0, "10^x"), None);
    }

    #[test]
    fn test_malformed_text_is_undefined() {
        assert_eq!(evaluate(1.0, ""), None);
        assert_eq!(evaluate(1.0, "x +"), None);
        assert_eq!(evaluate(1.0, "alert(1)"), None);
        assert_eq!(evaluate(1.0, "y"), None);
    }

    #[test]
    fn test_eval_error_names_the_point() {
        let expr = Expression::parse("1/x").unwrap();
        let err = expr.eval(0.0).unwrap_err();
        assert_eq!(
            err,
            EvalError::NonFinite {
                expression: "1 / x".to_string(),
                x: 0.0
            }
        );
    }

    #[test]
    fn test_compiled_function_keeps_source() {
        let function: CompiledFunction = "  x^2 + 1 ".parse().unwrap();
        assert_eq!(function.source(), "x^2 + 1");
        assert_eq!(function.at(3.0), Some(10.0));
        assert!(function.expression().contains_variable());
    }
}
