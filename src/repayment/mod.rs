//! # Income-driven repayment estimator
//!
//! Estimates the monthly payment on a federal student loan under each
//! income-driven repayment plan, from the balance, the annual income and
//! the household size.
//!
//! ```rust
//! use loancalc::repayment::{RepaymentPlan, estimate};
//!
//! let monthly = estimate(50000.0, 45000.0, 1, RepaymentPlan::Save).unwrap();
//! assert!((monthly - 93.375).abs() < 1e-9);
//! ```

use std::{fmt, str::FromStr};

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::{expression::NumericConstant, settings::RepaymentSettings};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepaymentError {
    #[error("Please fill in the {0} field")]
    MissingField(String),
    #[error("Invalid {field}: {reason}")]
    InvalidNumber { field: String, reason: String },
    #[error("Unknown repayment plan '{0}'")]
    UnknownPlan(String),
}

fn invalid(field: &str, reason: impl Into<String>) -> RepaymentError {
    RepaymentError::InvalidNumber {
        field: field.to_string(),
        reason: reason.into(),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum RepaymentPlan {
    Save,
    Paye,
    Repaye,
    Ibr,
    Icr,
}

impl RepaymentPlan {
    pub const ALL: [RepaymentPlan; 5] = [
        RepaymentPlan::Save,
        RepaymentPlan::Paye,
        RepaymentPlan::Repaye,
        RepaymentPlan::Ibr,
        RepaymentPlan::Icr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RepaymentPlan::Save => "SAVE",
            RepaymentPlan::Paye => "PAYE",
            RepaymentPlan::Repaye => "REPAYE",
            RepaymentPlan::Ibr => "IBR",
            RepaymentPlan::Icr => "ICR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RepaymentPlan::Save => "Saving on a Valuable Education",
            RepaymentPlan::Paye => "Pay As You Earn",
            RepaymentPlan::Repaye => "Revised Pay As You Earn",
            RepaymentPlan::Ibr => "Income-Based Repayment",
            RepaymentPlan::Icr => "Income-Contingent Repayment",
        }
    }

    /// Share of discretionary income paid each year.
    pub fn income_share(&self) -> f64 {
        match self {
            RepaymentPlan::Save => 0.05,
            RepaymentPlan::Paye | RepaymentPlan::Repaye | RepaymentPlan::Ibr => 0.10,
            RepaymentPlan::Icr => 0.20,
        }
    }
}

impl FromStr for RepaymentPlan {
    type Err = RepaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RepaymentPlan::ALL
            .into_iter()
            .find(|plan| plan.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RepaymentError::UnknownPlan(s.to_string()))
    }
}

impl fmt::Display for RepaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HHS poverty guideline for a household of `family_size`.
pub fn poverty_guideline(family_size: u32) -> f64 {
    poverty_guideline_with(&RepaymentSettings::default(), family_size)
}

pub fn poverty_guideline_with(settings: &RepaymentSettings, family_size: u32) -> f64 {
    let additional = family_size.saturating_sub(1) as f64;
    settings.poverty_base + additional * settings.poverty_per_person
}

/// Income above the protected multiple of the poverty guideline, never
/// negative.
pub fn discretionary_income(
    settings: &RepaymentSettings,
    annual_income: f64,
    family_size: u32,
) -> f64 {
    let protected =
        settings.discretionary_multiplier * poverty_guideline_with(settings, family_size);
    (annual_income - protected).max(0.0)
}

/// A monthly payment together with the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentEstimate {
    pub plan: RepaymentPlan,
    pub monthly: f64,
    pub annual: f64,
    pub poverty_guideline: f64,
    pub discretionary_income: f64,
}

fn check_inputs(balance: f64, annual_income: f64, family_size: u32) -> Result<(), RepaymentError> {
    if !balance.is_finite() || balance <= 0.0 {
        return Err(invalid("balance", "must be a number greater than zero"));
    }
    if !annual_income.is_finite() || annual_income < 0.0 {
        return Err(invalid("income", "must be a number of zero or more"));
    }
    if family_size == 0 {
        return Err(invalid("family size", "must be at least 1"));
    }
    Ok(())
}

impl PaymentEstimate {
    pub fn compute(
        settings: &RepaymentSettings,
        balance: f64,
        annual_income: f64,
        family_size: u32,
        plan: RepaymentPlan,
    ) -> Result<Self, RepaymentError> {
        check_inputs(balance, annual_income, family_size)?;

        let guideline = poverty_guideline_with(settings, family_size);
        let discretionary = discretionary_income(settings, annual_income, family_size);
        let share = plan.income_share() * discretionary / 12.0;
        let monthly = match plan {
            RepaymentPlan::Icr => share.min(balance / settings.icr_months),
            _ => share,
        }
        .max(0.0);

        debug!(
            "{} estimate: guideline {}, discretionary {}, monthly {}",
            plan, guideline, discretionary, monthly
        );
        Ok(Self {
            plan,
            monthly,
            annual: monthly * 12.0,
            poverty_guideline: guideline,
            discretionary_income: discretionary,
        })
    }
}

impl fmt::Display for PaymentEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2}/month (${:.2}/year)",
            self.plan, self.monthly, self.annual
        )
    }
}

/// Monthly payment under `plan` with the default guideline figures.
pub fn estimate(
    balance: f64,
    annual_income: f64,
    family_size: u32,
    plan: RepaymentPlan,
) -> Result<f64, RepaymentError> {
    PaymentEstimate::compute(
        &RepaymentSettings::default(),
        balance,
        annual_income,
        family_size,
        plan,
    )
    .map(|estimate| estimate.monthly)
}

/// Estimates under every plan, in [`RepaymentPlan::ALL`] order.
pub fn compare_plans(
    settings: &RepaymentSettings,
    balance: f64,
    annual_income: f64,
    family_size: u32,
) -> Result<Vec<PaymentEstimate>, RepaymentError> {
    RepaymentPlan::ALL
        .into_iter()
        .map(|plan| PaymentEstimate::compute(settings, balance, annual_income, family_size, plan))
        .collect()
}

/// Raw field values of the estimator form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdrForm {
    pub balance: Option<String>,
    pub income: Option<String>,
    pub family_size: Option<String>,
    pub state: Option<String>,
    pub plan: Option<String>,
}

/// The trimmed field text, or `None` when absent or blank.
fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|text| !text.is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, RepaymentError> {
    filled(field).ok_or_else(|| RepaymentError::MissingField(name.to_string()))
}

fn parse_amount(text: &str, name: &str) -> Result<f64, RepaymentError> {
    NumericConstant::from_str(text)
        .map(f64::from)
        .map_err(|err| invalid(name, err.to_string()))
}

/// Form values after validation.
struct FormInputs {
    balance: f64,
    income: f64,
    family_size: u32,
    plan: RepaymentPlan,
}

impl IdrForm {
    pub fn submit(&self) -> Result<PaymentEstimate, RepaymentError> {
        self.submit_with(&RepaymentSettings::default())
    }

    /// Validates the form and computes the estimate for the chosen plan.
    ///
    /// Balance, income and state are required. The household size defaults
    /// to 1 and the plan to SAVE. The state does not change the estimate.
    pub fn submit_with(&self, settings: &RepaymentSettings) -> Result<PaymentEstimate, RepaymentError> {
        let inputs = self.validate()?;
        PaymentEstimate::compute(
            settings,
            inputs.balance,
            inputs.income,
            inputs.family_size,
            inputs.plan,
        )
    }

    /// Validates the form and computes the estimate under every plan.
    pub fn compare_with(
        &self,
        settings: &RepaymentSettings,
    ) -> Result<Vec<PaymentEstimate>, RepaymentError> {
        let inputs = self.validate()?;
        compare_plans(settings, inputs.balance, inputs.income, inputs.family_size)
    }

    fn validate(&self) -> Result<FormInputs, RepaymentError> {
        let balance = required(&self.balance, "balance")?;
        let income = required(&self.income, "income")?;
        let state = required(&self.state, "state")?;

        let balance = parse_amount(balance, "balance")?;
        let income = parse_amount(income, "income")?;
        let family_size = match filled(&self.family_size) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|err| invalid("family size", err.to_string()))?,
            None => 1,
        };
        let plan = match filled(&self.plan) {
            Some(text) => text.parse()?,
            None => RepaymentPlan::Save,
        };

        debug!("Validated {} repayment form for a borrower in {}", plan, state);
        Ok(FormInputs {
            balance,
            income,
            family_size,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_float_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_poverty_guideline() {
        assert_eq!(poverty_guideline(1), 15060.0);
        assert_eq!(poverty_guideline(4), 15060.0 + 3.0 * 5380.0);
    }

    #[test]
    fn test_save_scenario() {
        let estimate = PaymentEstimate::compute(
            &RepaymentSettings::default(),
            50000.0,
            45000.0,
            1,
            RepaymentPlan::Save,
        )
        .unwrap();
        assert_float_eq(estimate.discretionary_income, 22410.0, 1e-9);
        assert_float_eq(estimate.monthly, 93.375, 1e-9);
        assert_float_eq(estimate.annual, 1120.5, 1e-9);
    }

    #[test]
    fn test_ten_percent_plans() {
        for plan in [RepaymentPlan::Paye, RepaymentPlan::Repaye, RepaymentPlan::Ibr] {
            assert_float_eq(estimate(50000.0, 45000.0, 1, plan).unwrap(), 186.75, 1e-9);
        }
    }

    #[test]
    fn test_icr_is_capped_by_balance() {
        // 20% share: 22410 * 0.2 / 12 = 373.5, cap 14400 / 144 = 100
        assert_float_eq(
            estimate(14400.0, 45000.0, 1, RepaymentPlan::Icr).unwrap(),
            100.0,
            1e-9,
        );
        assert_float_eq(
            estimate(500000.0, 45000.0, 1, RepaymentPlan::Icr).unwrap(),
            373.5,
            1e-9,
        );
    }

    #[test]
    fn test_low_income_pays_nothing() {
        assert_eq!(estimate(30000.0, 20000.0, 3, RepaymentPlan::Save).unwrap(), 0.0);
        assert_eq!(estimate(30000.0, 0.0, 1, RepaymentPlan::Icr).unwrap(), 0.0);
    }

    #[test]
    fn test_out_of_domain_inputs() {
        assert!(matches!(
            estimate(0.0, 45000.0, 1, RepaymentPlan::Save),
            Err(RepaymentError::InvalidNumber { field, .. }) if field == "balance"
        ));
        assert!(matches!(
            estimate(1000.0, -1.0, 1, RepaymentPlan::Save),
            Err(RepaymentError::InvalidNumber { field, .. }) if field == "income"
        ));
        assert!(matches!(
            estimate(1000.0, 1000.0, 0, RepaymentPlan::Save),
            Err(RepaymentError::InvalidNumber { .. })
        ));
        assert!(estimate(f64::NAN, 1000.0, 1, RepaymentPlan::Save).is_err());
    }

    #[test]
    fn test_plan_names() {
        assert_eq!("save".parse::<RepaymentPlan>().unwrap(), RepaymentPlan::Save);
        assert_eq!(" RePaYe ".parse::<RepaymentPlan>().unwrap(), RepaymentPlan::Repaye);
        assert_eq!(
            "PSLF".parse::<RepaymentPlan>().unwrap_err(),
            RepaymentError::UnknownPlan("PSLF".to_string())
        );
        assert_eq!(RepaymentPlan::Ibr.to_string(), "IBR");
    }

    #[test]
    fn test_compare_plans() {
        let estimates = compare_plans(&RepaymentSettings::default(), 50000.0, 45000.0, 1).unwrap();
        let plans: Vec<_> = estimates.iter().map(|e| e.plan).collect();
        assert_eq!(plans, RepaymentPlan::ALL.to_vec());
        assert!(estimates[0].monthly < estimates[1].monthly);
    }

    fn form(balance: &str, income: &str, state: &str) -> IdrForm {
        IdrForm {
            balance: Some(balance.to_string()),
            income: Some(income.to_string()),
            state: Some(state.to_string()),
            ..IdrForm::default()
        }
    }

    #[test]
    fn test_form_defaults() {
        let estimate = form("50000", "45000", "Ohio").submit().unwrap();
        assert_eq!(estimate.plan, RepaymentPlan::Save);
        assert_float_eq(estimate.monthly, 93.375, 1e-9);
    }

    #[test]
    fn test_form_missing_fields() {
        assert_eq!(
            IdrForm::default().submit().unwrap_err(),
            RepaymentError::MissingField("balance".to_string())
        );
        assert_eq!(
            form("50000", "  ", "Ohio").submit().unwrap_err(),
            RepaymentError::MissingField("income".to_string())
        );
        assert_eq!(
            form("50000", "45000", "").submit().unwrap_err(),
            RepaymentError::MissingField("state".to_string())
        );
    }

    #[test]
    fn test_form_invalid_numbers() {
        assert!(matches!(
            form("lots", "45000", "Ohio").submit(),
            Err(RepaymentError::InvalidNumber { field, .. }) if field == "balance"
        ));
        assert!(matches!(
            form("-5", "45000", "Ohio").submit(),
            Err(RepaymentError::InvalidNumber { field, .. }) if field == "balance"
        ));

        let mut with_family = form("50000", "45000", "Ohio");
        with_family.family_size = Some("two".to_string());
        assert!(matches!(
            with_family.submit(),
            Err(RepaymentError::InvalidNumber { field, .. }) if field == "family size"
        ));

        with_family.family_size = Some("2".to_string());
        with_family.plan = Some("forgiveness".to_string());
        assert!(matches!(
            with_family.submit(),
            Err(RepaymentError::UnknownPlan(_))
        ));
    }

    #[test]
    fn test_form_compare() {
        let estimates = form("50000", "45000", "Ohio")
            .compare_with(&RepaymentSettings::default())
            .unwrap();
        assert_eq!(estimates.len(), 5);
        assert_float_eq(estimates[0].monthly, 93.375, 1e-9);

        assert_eq!(
            IdrForm::default()
                .compare_with(&RepaymentSettings::default())
                .unwrap_err(),
            RepaymentError::MissingField("balance".to_string())
        );
    }
}
