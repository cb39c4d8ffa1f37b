//! Sampling a function over a [`PlotDomain`].

use std::iter::FusedIterator;

use itertools::Itertools;
use log::debug;
use serde::Serialize;

use super::domain::PlotDomain;
use crate::expression::CompiledFunction;

/// Number of sampling steps in a value table.
pub const DEFAULT_TABLE_STEPS: usize = 20;

/// Decimal places kept in a value table.
pub const DEFAULT_TABLE_DECIMALS: u32 = 2;

/// Anything that can be evaluated at a point of the x axis.
pub trait Plottable {
    /// The value at `x`, or `None` where undefined.
    fn at(&self, x: f64) -> Option<f64>;
}

impl Plottable for CompiledFunction {
    fn at(&self, x: f64) -> Option<f64> {
        CompiledFunction::at(self, x)
    }
}

/// An absent function is undefined everywhere.
impl<P: Plottable> Plottable for Option<P> {
    fn at(&self, x: f64) -> Option<f64> {
        self.as_ref().and_then(|function| function.at(x))
    }
}

impl<P: Plottable + ?Sized> Plottable for &P {
    fn at(&self, x: f64) -> Option<f64> {
        (**self).at(x)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    /// `None` breaks the plotted line at this point.
    pub y: Option<f64>,
}

/// The `index`-th of `steps + 1` evenly spaced points of the x range. The
/// last point is exactly `x_max`.
fn sample_x(domain: &PlotDomain, steps: usize, index: usize) -> f64 {
    if index >= steps {
        domain.x_max()
    } else {
        domain.x_min() + domain.x_span() * index as f64 / steps as f64
    }
}

/// Lazy samples of a function, produced by [`plot`].
///
/// Cloning restarts nothing; it forks the iterator at its current position.
pub struct Samples<'a, P: ?Sized> {
    function: &'a P,
    domain: PlotDomain,
    steps: usize,
    next: usize,
}

impl<P: ?Sized> Clone for Samples<'_, P> {
    fn clone(&self) -> Self {
        Self {
            function: self.function,
            domain: self.domain,
            steps: self.steps,
            next: self.next,
        }
    }
}

impl<P: ?Sized> Samples<'_, P> {
    pub fn domain(&self) -> &PlotDomain {
        &self.domain
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<P: Plottable + ?Sized> Iterator for Samples<'_, P> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        if self.next > self.steps {
            return None;
        }
        let x = sample_x(&self.domain, self.steps, self.next);
        self.next += 1;
        let y = self.function.at(x).filter(|y| self.domain.contains_y(*y));
        Some(SamplePoint { x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<P: Plottable + ?Sized> ExactSizeIterator for Samples<'_, P> {}

impl<P: Plottable + ?Sized> FusedIterator for Samples<'_, P> {}

/// Samples `function` at `resolution_px` evenly spaced steps across the x
/// range of `domain`, both ends included.
///
/// Points where the function is undefined or falls outside the y range
/// have `y == None`. A resolution of zero is treated as one.
///
/// ```rust
/// use loancalc::{CompiledFunction, PlotDomain, plot::plot};
///
/// let square: CompiledFunction = "x^2".parse().unwrap();
/// let points: Vec<_> = plot(&square, &PlotDomain::default(), 4).collect();
/// assert_eq!(points.len(), 5);
/// assert_eq!(points[2].y, Some(0.0));
/// assert_eq!(points[0].y, None); // 100 is above the visible range
/// ```
pub fn plot<'a, P: Plottable + ?Sized>(
    function: &'a P,
    domain: &PlotDomain,
    resolution_px: usize,
) -> Samples<'a, P> {
    let steps = resolution_px.max(1);
    debug!(
        "Sampling {} points over x [{}, {}]",
        steps + 1,
        domain.x_min(),
        domain.x_max()
    );
    Samples {
        function,
        domain: *domain,
        steps,
        next: 0,
    }
}

/// Splits samples into connected polylines. Undefined points separate
/// lines and are never bridged.
pub fn segments<I>(samples: I) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = SamplePoint>,
{
    let chunks = samples.into_iter().chunk_by(|point| point.y.is_some());
    let lines: Vec<Vec<(f64, f64)>> = chunks
        .into_iter()
        .filter(|(defined, _)| *defined)
        .map(|(_, points)| {
            points
                .filter_map(|point| point.y.map(|y| (point.x, y)))
                .collect()
        })
        .collect();
    lines
}

/// One row of a value table.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub x: f64,
    pub y: f64,
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    // Values this large have no fractional digits left to round
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / scale;
    // -0.0 reads badly in a table
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Value table over `steps` evenly spaced steps of the x range, rounded to
/// two decimals.
///
/// Undefined points are left out; the y range is not applied.
pub fn tabulate<P: Plottable + ?Sized>(
    function: &P,
    domain: &PlotDomain,
    steps: usize,
) -> Vec<TableRow> {
    tabulate_with_decimals(function, domain, steps, DEFAULT_TABLE_DECIMALS)
}

pub fn tabulate_with_decimals<P: Plottable + ?Sized>(
    function: &P,
    domain: &PlotDomain,
    steps: usize,
    decimals: u32,
) -> Vec<TableRow> {
    let steps = steps.max(1);
    (0..=steps)
        .filter_map(|index| {
            let x = sample_x(domain, steps, index);
            function.at(x).map(|y| TableRow {
                x: round_to(x, decimals),
                y: round_to(y, decimals),
            })
        })
        .collect()
}
