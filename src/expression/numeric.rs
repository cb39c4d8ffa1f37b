//! # Numeric constants
//!
//! Parsing and validation of the plain decimal numbers users type into the
//! calculators: expression literals, data-set entries and repayment form
//! fields all go through [`NumericConstant`].
//!
//! ## Accepted syntax
//!
//! ```bnf
//! number ::= [{+ | -}] { [digit]+[.[digit]*] | [digit]*.[digit]+ }[{E | e} [{+ | -}] [digit]+]
//! ```
//!
//! - **US English conventions** with a period as decimal separator
//! - **Leading or trailing dot** (`.375`, `14.`)
//! - **Scientific notation** (`6E5`, `1.23e-4`)
//! - **Optional sign**: `-1` is accepted, `+1` is accepted with a warning
//!
//! Thousands separators (`1,000`) are rejected: the data-set input treats the
//! comma as a value separator.
//!
//! ## Examples
//!
//! ```rust
//! use loancalc::NumericConstant;
//! use std::str::FromStr;
//!
//! let balance = NumericConstant::from_str("50000").unwrap();
//! assert_eq!(f64::from(balance), 50000.0);
//!
//! let small = NumericConstant::from_str("8.123e-10").unwrap();
//! assert_eq!(small.0, 8.123e-10);
//!
//! assert!(NumericConstant::from_str("1.2.3").is_err());
//! assert!(NumericConstant::from_str("abc").is_err());
//! ```

use log::warn;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors that can occur during numeric constant parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericConstantError {
    /// The input string is empty or contains only whitespace.
    #[error("Empty numeric constant")]
    EmptyNumericConstant,

    /// Multiple decimal points found in the number, e.g. `"1.2.3"`.
    #[error("Multiple decimal points: '{0}'")]
    MultipleDecimalPoints(String),

    /// Scientific notation without a base or an exponent, e.g. `"1E"`, `"E5"`.
    #[error("Invalid scientific notation: '{0}'")]
    InvalidScientificNotation(String),

    /// Unexpected character found in the numeric constant, e.g. `"1a2"`.
    #[error("Unexpected character: '{1}' in '{0}'")]
    UnexpectedCharacter(String, char),

    /// No digits found in the mantissa, e.g. `"."` or `"-"`.
    #[error("No digits: '{0}'")]
    NoDigits(String),

    /// The value overflowed to infinity.
    #[error("Not a real number: '{0}' is not a finite real number")]
    NotARealNumber(String),
}

/// A validated, finite numeric constant.
///
/// Can only be created through parsing or conversion from an `f64`; parsed
/// values are always finite.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NumericConstant(pub f64);

/// Splits a numeric string into mantissa and optional exponent part.
fn split_exponent(input: &str) -> (&str, Option<&str>) {
    match input.find(['E', 'e']) {
        Some(pos) => (&input[..pos], Some(&input[pos + 1..])),
        None => (input, None),
    }
}

/// Strips an optional leading sign.
fn strip_sign(input: &str) -> &str {
    input
        .strip_prefix('-')
        .or_else(|| input.strip_prefix('+'))
        .unwrap_or(input)
}

fn check_mantissa(full: &str, mantissa: &str) -> Result<(), NumericConstantError> {
    let digits = strip_sign(mantissa);
    let mut has_digits = false;
    let mut has_decimal = false;

    for ch in digits.chars() {
        match ch {
            '0'..='9' => has_digits = true,
            '.' if has_decimal => {
                return Err(NumericConstantError::MultipleDecimalPoints(full.to_string()));
            }
            '.' => has_decimal = true,
            c => {
                return Err(NumericConstantError::UnexpectedCharacter(full.to_string(), c));
            }
        }
    }

    if !has_digits {
        return Err(NumericConstantError::NoDigits(full.to_string()));
    }
    Ok(())
}

fn check_exponent(full: &str, exponent: &str) -> Result<(), NumericConstantError> {
    let digits = strip_sign(exponent);
    if digits.is_empty() {
        return Err(NumericConstantError::InvalidScientificNotation(full.to_string()));
    }
    match digits.chars().find(|c| !c.is_ascii_digit()) {
        Some(c) => Err(NumericConstantError::UnexpectedCharacter(full.to_string(), c)),
        None => Ok(()),
    }
}

impl FromStr for NumericConstant {
    type Err = NumericConstantError;

    /// Parses a numeric constant, trimming surrounding whitespace.
    ///
    /// ```rust
    /// use loancalc::NumericConstant;
    /// use std::str::FromStr;
    ///
    /// assert!(NumericConstant::from_str("42").is_ok());
    /// assert!(NumericConstant::from_str(".375").is_ok());
    /// assert!(NumericConstant::from_str("-1").is_ok());
    ///
    /// assert!(NumericConstant::from_str("").is_err());
    /// assert!(NumericConstant::from_str("1E").is_err());
    /// assert!(NumericConstant::from_str("1,000").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(NumericConstantError::EmptyNumericConstant);
        }

        let (mantissa, exponent) = split_exponent(input);
        if mantissa.is_empty() {
            return Err(NumericConstantError::InvalidScientificNotation(input.to_string()));
        }
        check_mantissa(input, mantissa)?;
        if let Some(exponent) = exponent {
            check_exponent(input, exponent)?;
        }

        if input.starts_with('+') {
            warn!("Numeric constant '{}' starts with a redundant '+' sign, ignoring.", input);
        }

        // The structure has been checked, so the standard parser cannot fail
        // on anything but overflow.
        match input.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(NumericConstant(value)),
            _ => Err(NumericConstantError::NotARealNumber(input.to_string())),
        }
    }
}

impl From<f64> for NumericConstant {
    fn from(value: f64) -> Self {
        NumericConstant(value)
    }
}

impl From<NumericConstant> for f64 {
    fn from(value: NumericConstant) -> Self {
        value.0
    }
}

impl fmt::Display for NumericConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
