//! ### Allow-listed functions and named constants
//!
//! The evaluator only knows the names below. Anything else in an expression
//! is rejected at parse time, so a parsed [`Expression`](super::Expression)
//! can never do more than real arithmetic.
//!
//! | Name   | Meaning                         |
//! |:------:|:--------------------------------|
//! | `sin`  | sine (radians)                  |
//! | `cos`  | cosine (radians)                |
//! | `tan`  | tangent (radians)               |
//! | `sqrt` | square root                     |
//! | `abs`  | absolute value                  |
//! | `ln`   | natural logarithm               |
//! | `log`  | base-10 logarithm               |
//! | `pi`   | π                               |
//! | `e`    | Euler's number                  |
//!
//! Names are matched case-insensitively.

use std::{f64::consts, fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown name '{0}'")]
pub struct UnknownName(pub String);

/// A single-argument real function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
    Ln,
    Log,
}

impl Function {
    pub const ALL: [Function; 7] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sqrt,
        Function::Abs,
        Function::Ln,
        Function::Log,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Ln => "ln",
            Function::Log => "log",
        }
    }

    /// Applies the function. Domain errors surface as `NaN` or infinities,
    /// which the interpreter turns into "undefined".
    pub fn apply(&self, arg: f64) -> f64 {
        match self {
            Function::Sin => arg.sin(),
            Function::Cos => arg.cos(),
            Function::Tan => arg.tan(),
            Function::Sqrt => arg.sqrt(),
            Function::Abs => arg.abs(),
            Function::Ln => arg.ln(),
            Function::Log => arg.log10(),
        }
    }
}

impl FromStr for Function {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named mathematical constant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => consts::PI,
            Constant::E => consts::E,
        }
    }
}

impl FromStr for Constant {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pi") {
            Ok(Constant::Pi)
        } else if s.eq_ignore_ascii_case("e") {
            Ok(Constant::E)
        } else {
            Err(UnknownName(s.to_string()))
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Pi => f.write_str("pi"),
            Constant::E => f.write_str("e"),
        }
    }
}
