//! Calculation core of a personal-finance and maths calculator site: a
//! graphing calculator, a descriptive statistics calculator and an
//! income-driven student loan repayment estimator.

pub mod assistant;
pub mod errors;
pub mod expression;
pub mod plot;
pub mod repayment;
pub mod settings;
pub mod stats;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use crate::errors::{CalcError, ErrorKind};
pub use crate::expression::{CompiledFunction, Expression, NumericConstant, Operator, evaluate};
pub use crate::plot::{GraphingCalculator, PlotDomain, SamplePoint, TableRow};
pub use crate::repayment::{IdrForm, PaymentEstimate, RepaymentPlan};
pub use crate::settings::CalcSpecs;
pub use crate::stats::{DataSet, StatResult, compute_stats};
