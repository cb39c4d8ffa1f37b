//! # Plot domain
//!
//! The rectangle of the plane shown by the graphing calculator, with the
//! zoom, pan and reset transforms and the data-to-pixel mapping used by
//! renderers.
//!
//! ## Invariants
//!
//! - All four bounds are finite
//! - `x_min < x_max` and `y_min < y_max`
//! - Neither span is narrower than [`MIN_SPAN`], so the pixel scale
//!   `width / span` never blows up
//!
//! ## Zooming
//!
//! Zooming scales both spans about their centres. Zooming in multiplies each
//! span by `1 - factor`; zooming out divides by the same amount, so a zoom-in
//! followed by a zoom-out restores the original domain.
//!
//! ```rust
//! use loancalc::PlotDomain;
//!
//! let mut domain = PlotDomain::default();
//! assert!(domain.zoom_in());
//! assert_eq!(domain.x_range(), (-7.5, 7.5));
//! assert!(domain.zoom_out());
//! assert_eq!(domain.x_range(), (-10.0, 10.0));
//! ```

use log::warn;
use serde::Serialize;
use thiserror::Error;

/// Narrowest span any domain may have on either axis.
pub const MIN_SPAN: f64 = 1e-9;

/// Fraction of the current span removed by one zoom-in.
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.25;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{axis} bounds must be finite numbers, got [{min}, {max}]")]
    NotFinite { axis: Axis, min: f64, max: f64 },
    #[error("{axis} minimum {min} must be less than maximum {max}")]
    EmptyRange { axis: Axis, min: f64, max: f64 },
    #[error("{axis} span {span} is narrower than the minimum {minimum}")]
    TooNarrow { axis: Axis, span: f64, minimum: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// How far one zoom step goes and how far in zooming may go.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ZoomPolicy {
    /// Fraction of the span removed by a zoom-in, in `(0, 1)`.
    pub factor: f64,
    /// Zooming in is refused once a span would drop below this.
    pub min_span: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            factor: DEFAULT_ZOOM_FACTOR,
            min_span: MIN_SPAN,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PlotDomain {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

fn check_axis(axis: Axis, min: f64, max: f64) -> Result<(), DomainError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(DomainError::NotFinite { axis, min, max });
    }
    if min >= max {
        return Err(DomainError::EmptyRange { axis, min, max });
    }
    let span = max - min;
    if !span.is_finite() {
        return Err(DomainError::NotFinite { axis, min, max });
    }
    if span < MIN_SPAN {
        return Err(DomainError::TooNarrow {
            axis,
            span,
            minimum: MIN_SPAN,
        });
    }
    Ok(())
}

/// Bounds of a span rescaled about its centre.
fn rescale(min: f64, max: f64, ratio: f64) -> (f64, f64) {
    let center = min + (max - min) / 2.0;
    let half = (max - min) * ratio / 2.0;
    (center - half, center + half)
}

impl PlotDomain {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, DomainError> {
        check_axis(Axis::X, x_min, x_max)?;
        check_axis(Axis::Y, y_min, y_max)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether `y` lies inside the visible vertical range (inclusive).
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y_min && y <= self.y_max
    }

    /// Restores the default `[-10, 10] × [-10, 10]` domain.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zooms in by [`DEFAULT_ZOOM_FACTOR`].
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_in_with(&ZoomPolicy::default())
    }

    /// Zooms out by [`DEFAULT_ZOOM_FACTOR`], undoing one [`zoom_in`](Self::zoom_in).
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_out_with(&ZoomPolicy::default())
    }

    /// Shrinks both spans to `1 - factor` of their size.
    ///
    /// Returns `false` and leaves the domain untouched when either span
    /// would drop below the policy's minimum span.
    pub fn zoom_in_with(&mut self, policy: &ZoomPolicy) -> bool {
        self.apply_ratio(1.0 - policy.factor, policy.min_span.max(MIN_SPAN))
    }

    /// Expands both spans by `1 / (1 - factor)`.
    ///
    /// Returns `false` and leaves the domain untouched when the result would
    /// no longer be finite.
    pub fn zoom_out_with(&mut self, policy: &ZoomPolicy) -> bool {
        self.apply_ratio(1.0 / (1.0 - policy.factor), MIN_SPAN)
    }

    fn apply_ratio(&mut self, ratio: f64, min_span: f64) -> bool {
        let (x_min, x_max) = rescale(self.x_min, self.x_max, ratio);
        let (y_min, y_max) = rescale(self.y_min, self.y_max, ratio);

        match PlotDomain::new(x_min, x_max, y_min, y_max) {
            Ok(domain) if domain.x_span() >= min_span && domain.y_span() >= min_span => {
                *self = domain;
                true
            }
            Ok(_) => {
                warn!(
                    "Refusing to zoom: span would drop below {} (x span {}, y span {})",
                    min_span,
                    self.x_span(),
                    self.y_span()
                );
                false
            }
            Err(err) => {
                warn!("Refusing to zoom: {}", err);
                false
            }
        }
    }

    /// Shifts the domain by fractions of its spans; positive values move
    /// the view right and up.
    pub fn pan(&mut self, dx_fraction: f64, dy_fraction: f64) -> bool {
        let dx = self.x_span() * dx_fraction;
        let dy = self.y_span() * dy_fraction;
        match PlotDomain::new(
            self.x_min + dx,
            self.x_max + dx,
            self.y_min + dy,
            self.y_max + dy,
        ) {
            Ok(domain) => {
                *self = domain;
                true
            }
            Err(err) => {
                warn!("Refusing to pan: {}", err);
                false
            }
        }
    }

    /// Maps a point in data coordinates to pixel coordinates on a
    /// `width × height` canvas whose y axis points down.
    pub fn to_screen(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        let px = (x - self.x_min) / self.x_span() * width;
        let py = height - (y - self.y_min) / self.y_span() * height;
        (px, py)
    }

    /// Inverse of [`to_screen`](Self::to_screen).
    pub fn from_screen(&self, px: f64, py: f64, width: f64, height: f64) -> (f64, f64) {
        let x = self.x_min + px / width * self.x_span();
        let y = self.y_min + (height - py) / height * self.y_span();
        (x, y)
    }
}

impl Default for PlotDomain {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

/// A "nice" grid spacing (1, 2 or 5 times a power of ten) giving roughly
/// `target_lines` lines across `span`.
pub fn grid_step(span: f64, target_lines: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / target_lines.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
