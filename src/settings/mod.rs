//! # Calculator settings
//!
//! Every tunable constant of the calculators lives in [`CalcSpecs`]. The
//! defaults reproduce the behaviour of the site; a host may override any of
//! them with a `<calc_specs>` XML document:
//!
//! ```xml
//! <calc_specs>
//!     <plot>
//!         <x_min>-10</x_min>
//!         <x_max>10</x_max>
//!         <y_min>-10</y_min>
//!         <y_max>10</y_max>
//!         <zoom_factor>0.25</zoom_factor>
//!         <min_span>0.000000001</min_span>
//!         <resolution>800</resolution>
//!         <table_steps>20</table_steps>
//!         <decimals>2</decimals>
//!     </plot>
//!     <repayment>
//!         <poverty_base>15060</poverty_base>
//!         <poverty_per_person>5380</poverty_per_person>
//!         <discretionary_multiplier>1.5</discretionary_multiplier>
//!         <icr_months>144</icr_months>
//!     </repayment>
//! </calc_specs>
//! ```
//!
//! Elements that are left out keep their default value.

pub mod xml;

use std::{fmt, num::ParseIntError, path::Path};

use serde::Serialize;
use thiserror::Error;

use crate::{
    expression::NumericConstantError,
    plot::domain::{DomainError, MIN_SPAN, PlotDomain, ZoomPolicy},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Unexpected end of XML")]
    UnexpectedEof,
    #[error("Unexpected element: expected {expected}, found {found}")]
    UnexpectedElement { expected: String, found: String },
    #[error("Invalid number in <{element}>: {source}")]
    InvalidNumber {
        element: String,
        source: NumericConstantError,
    },
    #[error("Invalid count in <{element}>: {source}")]
    InvalidCount {
        element: String,
        source: ParseIntError,
    },
    #[error("Invalid plot domain: {0}")]
    Domain(#[from] DomainError),
    #[error("Invalid settings:\n{}", format_errors(.0))]
    Invalid(Vec<String>),
}

fn format_errors(errors: &[String]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(idx, error)| format!("  {}. {}", idx + 1, error))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings of the graphing calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSettings {
    /// Domain shown initially and restored by reset.
    pub default_domain: PlotDomain,
    pub zoom: ZoomPolicy,
    /// Number of sampling steps across the x range when plotting.
    pub resolution: usize,
    /// Number of sampling steps across the x range in the value table.
    pub table_steps: usize,
    /// Decimal places kept in the value table.
    pub decimals: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            default_domain: PlotDomain::default(),
            zoom: ZoomPolicy::default(),
            resolution: 800,
            table_steps: 20,
            decimals: 2,
        }
    }
}

/// Settings of the income-driven repayment estimator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepaymentSettings {
    /// Poverty guideline for a household of one.
    pub poverty_base: f64,
    /// Added to the guideline for each additional household member.
    pub poverty_per_person: f64,
    /// Income above this multiple of the guideline is discretionary.
    pub discretionary_multiplier: f64,
    /// Amortisation period of the ICR balance cap.
    pub icr_months: f64,
}

impl Default for RepaymentSettings {
    fn default() -> Self {
        Self {
            poverty_base: 15060.0,
            poverty_per_person: 5380.0,
            discretionary_multiplier: 1.5,
            icr_months: 144.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CalcSpecs {
    pub plot: PlotSettings,
    pub repayment: RepaymentSettings,
}

impl CalcSpecs {
    /// Reads settings from a `<calc_specs>` document.
    pub fn from_xml_str(xml: &str) -> Result<Self, SettingsError> {
        let specs = xml::deserialize_calc_specs(xml)?;
        specs.validate()?;
        Ok(specs)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_xml_str(&text)
    }

    pub fn to_xml(&self) -> Result<String, SettingsError> {
        xml::serialize_calc_specs(self)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_xml()?)?;
        Ok(())
    }

    /// Checks the values a document may have set to something unusable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut errors = Vec::new();
        let plot = &self.plot;
        let repayment = &self.repayment;

        if !(plot.zoom.factor > 0.0 && plot.zoom.factor < 1.0) {
            errors.push(format!(
                "zoom_factor must lie strictly between 0 and 1, got {}",
                plot.zoom.factor
            ));
        }
        if !(plot.zoom.min_span >= MIN_SPAN && plot.zoom.min_span.is_finite()) {
            errors.push(format!(
                "min_span must be a finite number of at least {}, got {}",
                MIN_SPAN, plot.zoom.min_span
            ));
        }
        if plot.resolution == 0 {
            errors.push("resolution must be at least 1".to_string());
        }
        if plot.table_steps == 0 {
            errors.push("table_steps must be at least 1".to_string());
        }
        if plot.decimals > 10 {
            errors.push(format!("decimals must be at most 10, got {}", plot.decimals));
        }
        check_non_negative(&mut errors, "poverty_base", repayment.poverty_base);
        check_non_negative(&mut errors, "poverty_per_person", repayment.poverty_per_person);
        check_non_negative(
            &mut errors,
            "discretionary_multiplier",
            repayment.discretionary_multiplier,
        );
        if !(repayment.icr_months > 0.0 && repayment.icr_months.is_finite()) {
            errors.push(format!(
                "icr_months must be positive, got {}",
                repayment.icr_months
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Invalid(errors))
        }
    }
}

fn check_non_negative(errors: &mut Vec<String>, name: &str, value: f64) {
    if !(value >= 0.0 && value.is_finite()) {
        errors.push(format!("{} must be a non-negative number, got {}", name, value));
    }
}

impl fmt::Display for CalcSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domain = &self.plot.default_domain;
        writeln!(
            f,
            "plot: x [{}, {}], y [{}, {}], zoom {}, {} steps, table {} steps",
            domain.x_min(),
            domain.x_max(),
            domain.y_min(),
            domain.y_max(),
            self.plot.zoom.factor,
            self.plot.resolution,
            self.plot.table_steps
        )?;
        write!(
            f,
            "repayment: guideline {} + {} per person, {}x multiplier, ICR over {} months",
            self.repayment.poverty_base,
            self.repayment.poverty_per_person,
            self.repayment.discretionary_multiplier,
            self.repayment.icr_months
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let specs = CalcSpecs::default();
        assert!(specs.validate().is_ok());
        assert_eq!(specs.plot.default_domain, PlotDomain::default());
        assert_eq!(specs.plot.zoom.factor, 0.25);
        assert_eq!(specs.plot.table_steps, 20);
        assert_eq!(specs.repayment.poverty_base, 15060.0);
        assert_eq!(specs.repayment.poverty_per_person, 5380.0);
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let mut specs = CalcSpecs::default();
        specs.plot.zoom.factor = 1.0;
        specs.plot.table_steps = 0;
        specs.repayment.icr_months = 0.0;

        match specs.validate() {
            Err(SettingsError::Invalid(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].contains("zoom_factor"));
                assert!(errors[1].contains("table_steps"));
                assert!(errors[2].contains("icr_months"));
            }
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_error_display() {
        let err = SettingsError::Invalid(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "Invalid settings:\n  1. first\n  2. second");
    }
}
