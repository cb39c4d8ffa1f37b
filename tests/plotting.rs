use loancalc::plot::{
    GraphingCalculator, PlotDomain, PlotError, grid_step, plot, segments, tabulate,
    domain::MIN_SPAN,
};
use loancalc::{CompiledFunction, evaluate};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn compile(text: &str) -> CompiledFunction {
    text.parse()
        .unwrap_or_else(|err| panic!("'{}' should parse: {}", text, err))
}

fn assert_close(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Expected {} to be within {} of {}",
        a,
        tolerance,
        b
    );
}

#[test]
fn test_default_session() {
    let mut calc = GraphingCalculator::default();
    calc.set_function("sin(x)").unwrap();

    assert_eq!(calc.domain(), &PlotDomain::default());
    let lines = calc.plot();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].first().map(|p| p.0), Some(-10.0));
    assert_eq!(lines[0].last().map(|p| p.0), Some(10.0));

    let table = calc.table();
    assert_eq!(table.len(), 21);
    assert_eq!(table[11].x, 1.0);
    assert_eq!(table[11].y, 0.84);
}

#[test]
fn test_zero_check_false_positive_is_kept() {
    let mut calc = GraphingCalculator::default();
    match calc.set_function("1/x") {
        Err(PlotError::InvalidFunction { function, .. }) => assert_eq!(function, "1/x"),
        other => panic!("Expected InvalidFunction, got {:?}", other),
    }
    // The same curve shifted away from zero is accepted
    calc.set_function("1/(x - 0.5)").unwrap();
    assert_eq!(calc.plot().len(), 2);
}

#[test]
fn test_empty_function() {
    let mut calc = GraphingCalculator::default();
    assert_eq!(calc.set_function("").unwrap_err(), PlotError::EmptyFunction);
}

#[test]
fn test_unparseable_constant_plots_nothing() {
    let mut calc = GraphingCalculator::default();
    calc.set_function("5 +* 2").unwrap();
    assert_eq!(calc.warnings().len(), 1);
    assert!(calc.plot().is_empty());
    assert!(calc.table().is_empty());
}

#[test]
fn test_points_outside_y_range_break_lines() {
    let steep = compile("x^3");
    let domain = PlotDomain::default();
    let lines = segments(plot(&steep, &domain, 200));
    assert_eq!(lines.len(), 1);
    for (_, y) in &lines[0] {
        assert!(domain.contains_y(*y));
    }

    let tan = compile("tan(x)");
    assert!(segments(plot(&tan, &domain, 800)).len() > 3);
}

#[test]
fn test_plot_is_restartable() {
    let function = compile("x^2 - 3");
    let samples = plot(&function, &PlotDomain::default(), 50);
    let first: Vec<_> = samples.clone().collect();
    let second: Vec<_> = samples.collect();
    assert_eq!(first, second);
}

#[test]
fn test_repeated_zoom_in_stops_at_minimum_span() {
    let mut calc = GraphingCalculator::default();
    let mut steps = 0;
    while calc.zoom_in() {
        steps += 1;
        assert!(steps < 200, "zoom-in never stopped");
    }
    let domain = calc.domain();
    assert!(domain.x_span() >= MIN_SPAN);
    assert!(domain.y_span() >= MIN_SPAN);

    let (px, py) = domain.to_screen(0.0, 0.0, 800.0, 600.0);
    assert!(px.is_finite() && py.is_finite());
}

#[test]
fn test_reset_after_navigation() {
    let mut calc = GraphingCalculator::default();
    calc.zoom_in();
    calc.pan(0.25, -0.25);
    calc.zoom_out();
    calc.reset();
    assert_eq!(calc.domain(), &PlotDomain::default());
}

#[test]
fn test_grid_step_is_nice() {
    assert_eq!(grid_step(20.0, 10), 2.0);
    assert_eq!(grid_step(15.0, 10), 2.0);
    assert_close(grid_step(0.3, 10), 0.05, 1e-15);
    assert_eq!(grid_step(1000.0, 4), 500.0);
}

proptest! {
    #[test]
    fn prop_zoom_in_then_out_restores_domain(
        x_min in -1e3f64..1e3,
        x_span in 1e-3f64..1e3,
        y_min in -1e3f64..1e3,
        y_span in 1e-3f64..1e3,
    ) {
        let original = PlotDomain::new(x_min, x_min + x_span, y_min, y_min + y_span).unwrap();
        let mut domain = original;
        prop_assert!(domain.zoom_in());
        prop_assert!(domain.zoom_out());

        let x_tol = 1e-9 * (x_min.abs() + x_span);
        let y_tol = 1e-9 * (y_min.abs() + y_span);
        prop_assert!((domain.x_min() - original.x_min()).abs() <= x_tol);
        prop_assert!((domain.x_max() - original.x_max()).abs() <= x_tol);
        prop_assert!((domain.y_min() - original.y_min()).abs() <= y_tol);
        prop_assert!((domain.y_max() - original.y_max()).abs() <= y_tol);
    }

    #[test]
    fn prop_tabulate_matches_evaluate(start in -50i32..50, a in -3i32..3, b in -3i32..3) {
        let text = format!("{}*x^2 + {}*x - 1", a, b);
        let function = compile(&text);
        let start = start as f64;
        let domain = PlotDomain::new(start, start + 20.0, -10.0, 10.0).unwrap();

        let rows = tabulate(&function, &domain, 20);
        prop_assert_eq!(rows.len(), 21);
        for row in rows {
            let expected = evaluate(row.x, &text).unwrap();
            assert_close(row.y, expected, 0.005 + 1e-9);
        }
    }
}
