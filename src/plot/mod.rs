//! # Graphing calculator
//!
//! Validates a function typed by the user, samples it over a [`PlotDomain`]
//! and produces the polylines and value table the page draws.
//!
//! ```rust
//! use loancalc::plot::GraphingCalculator;
//!
//! let mut calc = GraphingCalculator::default();
//! calc.set_function("x^2").unwrap();
//! assert_eq!(calc.table().len(), 21);
//!
//! calc.zoom_in();
//! assert_eq!(calc.domain().x_range(), (-7.5, 7.5));
//! ```

pub mod domain;
pub mod sampler;

use log::{debug, warn};
use thiserror::Error;

pub use domain::{DomainError, PlotDomain, ZoomPolicy, grid_step};
pub use sampler::{
    DEFAULT_TABLE_STEPS, Plottable, SamplePoint, Samples, TableRow, plot, segments, tabulate,
};

use crate::{expression::CompiledFunction, settings::PlotSettings, types::WithWarnings};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error("Please enter a function to plot")]
    EmptyFunction,
    #[error("Invalid function '{function}': {reason}")]
    InvalidFunction { function: String, reason: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Whether the text contains an `x` or `X` character anywhere.
///
/// This is a character match, not a token match: `max(2)` and `exp(1)`
/// count as mentioning the variable.
fn mentions_variable(text: &str) -> bool {
    text.contains(['x', 'X'])
}

/// Checks a function before plotting it.
///
/// The function is evaluated once at `x = 0`. Text containing an `x` character
/// that is undefined there (including text that does not parse) is rejected,
/// so `1/x` is rejected although it is defined everywhere else, and so is a
/// typo like `max(2)`. Text without an `x` that does not parse is accepted
/// with a warning and plots as nothing.
pub fn validate(text: &str) -> Result<WithWarnings<Option<CompiledFunction>, String>, PlotError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlotError::EmptyFunction);
    }

    match CompiledFunction::new(text) {
        Ok(function) => {
            if function.at(0.0).is_none() && mentions_variable(text) {
                return Err(PlotError::InvalidFunction {
                    function: text.to_string(),
                    reason: "not defined at x = 0".to_string(),
                });
            }
            debug!("Validated function '{}' as {}", text, function.expression());
            Ok(WithWarnings::Ok(Some(function)))
        }
        Err(err) if mentions_variable(text) => Err(PlotError::InvalidFunction {
            function: text.to_string(),
            reason: err.to_string(),
        }),
        Err(err) => {
            let warning = format!("'{}' does not parse and will not be drawn: {}", text, err);
            warn!("{}", warning);
            Ok(WithWarnings::Warning(None, vec![warning]))
        }
    }
}

/// State of the graphing calculator widget.
#[derive(Debug, Clone)]
pub struct GraphingCalculator {
    settings: PlotSettings,
    text: String,
    function: Option<CompiledFunction>,
    domain: PlotDomain,
    resolution: usize,
    warnings: Vec<String>,
}

impl Default for GraphingCalculator {
    fn default() -> Self {
        Self::new(PlotSettings::default())
    }
}

impl GraphingCalculator {
    pub fn new(settings: PlotSettings) -> Self {
        Self {
            domain: settings.default_domain,
            resolution: settings.resolution.max(1),
            settings,
            text: String::new(),
            function: None,
            warnings: Vec::new(),
        }
    }

    /// Replaces the function being plotted.
    ///
    /// On error the calculator is left without a function, so nothing is
    /// drawn until a valid one is entered.
    pub fn set_function(&mut self, text: &str) -> Result<(), PlotError> {
        self.text = text.trim().to_string();
        self.warnings.clear();
        match validate(text) {
            Ok(validated) => {
                let (function, warnings): (Option<CompiledFunction>, Vec<String>) =
                    validated.into();
                self.function = function;
                self.warnings = warnings;
                Ok(())
            }
            Err(err) => {
                self.function = None;
                Err(err)
            }
        }
    }

    pub fn function_text(&self) -> &str {
        &self.text
    }

    pub fn function(&self) -> Option<&CompiledFunction> {
        self.function.as_ref()
    }

    /// Warnings raised by the last [`set_function`](Self::set_function).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn settings(&self) -> &PlotSettings {
        &self.settings
    }

    pub fn domain(&self) -> &PlotDomain {
        &self.domain
    }

    pub fn set_domain(&mut self, domain: PlotDomain) {
        self.domain = domain;
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sets the number of sampling steps, usually the canvas width in pixels.
    pub fn set_resolution(&mut self, resolution_px: usize) {
        self.resolution = resolution_px.max(1);
    }

    /// Samples the current function over the current domain.
    pub fn samples(&self) -> Samples<'_, Option<CompiledFunction>> {
        plot(&self.function, &self.domain, self.resolution)
    }

    /// The polylines to draw.
    pub fn plot(&self) -> Vec<Vec<(f64, f64)>> {
        segments(self.samples())
    }

    pub fn table(&self) -> Vec<TableRow> {
        sampler::tabulate_with_decimals(
            &self.function,
            &self.domain,
            self.settings.table_steps,
            self.settings.decimals,
        )
    }

    pub fn zoom_in(&mut self) -> bool {
        self.domain.zoom_in_with(&self.settings.zoom)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.domain.zoom_out_with(&self.settings.zoom)
    }

    pub fn pan(&mut self, dx_fraction: f64, dy_fraction: f64) -> bool {
        self.domain.pan(dx_fraction, dy_fraction)
    }

    /// Restores the configured default domain.
    pub fn reset(&mut self) {
        self.domain = self.settings.default_domain;
    }
}
