//! Tests for the interpolation engine

use super::*;
use crate::Error;
use crate::app::models::RepairMethod;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
    let origin = Utc.with_ymd_and_hms(2019, 5, 23, 0, 0, 0).unwrap();
    (0..n)
        .map(|k| origin + Duration::seconds(20 * k as i64))
        .collect()
}

fn series_from(values: Vec<Option<f64>>) -> Series {
    Series::new(timestamps(values.len()), values).unwrap()
}

/// Series sampled from `f` over elapsed seconds with the given positions missing
fn sampled_series(n: usize, missing: &[usize], f: impl Fn(f64) -> f64) -> Series {
    let values = (0..n)
        .map(|k| (!missing.contains(&k)).then(|| f(20.0 * k as f64)))
        .collect();
    series_from(values)
}

fn assert_close(actual: Option<f64>, expected: f64, tolerance: f64) {
    let actual = actual.expect("value should be filled");
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_linear_fills_single_gap_with_midpoint() {
    let series = series_from(vec![Some(100.0), None, Some(102.0)]);
    let repaired = interpolate(&series, InterpolationMethod::Linear, None).unwrap();

    assert_eq!(repaired.filled(), &[Some(100.0), Some(101.0), Some(102.0)]);
}

#[test]
fn test_linear_follows_time_formula() {
    let series = series_from(vec![Some(10.0), None, None, None, Some(50.0), Some(0.0)]);
    let repaired = interpolate(&series, InterpolationMethod::Linear, None).unwrap();

    // a + (b - a) * (t - t0) / (t1 - t0) with t0 = 0 s, t1 = 80 s
    assert_close(repaired.filled()[1], 10.0 + 40.0 * 20.0 / 80.0, 1e-12);
    assert_close(repaired.filled()[2], 30.0, 1e-12);
    assert_close(repaired.filled()[3], 40.0, 1e-12);
    assert_eq!(repaired.filled()[5], Some(0.0));
}

#[test]
fn test_linear_uses_real_time_spacing() {
    let origin = Utc.with_ymd_and_hms(2019, 5, 23, 0, 0, 0).unwrap();
    let ts = vec![
        origin,
        origin + Duration::seconds(20),
        origin + Duration::seconds(100),
    ];
    let series = Series::new(ts, vec![Some(0.0), None, Some(100.0)]).unwrap();
    let repaired = interpolate(&series, InterpolationMethod::Linear, None).unwrap();

    assert_close(repaired.filled()[1], 20.0, 1e-12);
}

#[test]
fn test_linear_ignores_order_argument() {
    let series = series_from(vec![Some(1.0), None, Some(3.0)]);
    let with_order = interpolate(&series, InterpolationMethod::Linear, Some(5)).unwrap();
    let without = interpolate(&series, InterpolationMethod::Linear, None).unwrap();

    assert_eq!(with_order.filled(), without.filled());
    assert_eq!(
        with_order.method(),
        &RepairMethod::Interpolation {
            method: InterpolationMethod::Linear,
            order: None
        }
    );
}

#[test]
fn test_boundary_gaps_stay_missing_for_every_method() {
    let series = sampled_series(12, &[0, 1, 5, 10, 11], |t| 0.01 * t * t + 3.0);

    for method in InterpolationMethod::ALL {
        let repaired = interpolate(&series, method, Some(2)).unwrap();
        assert_eq!(repaired.filled()[0], None, "{}", method);
        assert_eq!(repaired.filled()[1], None, "{}", method);
        assert_eq!(repaired.filled()[10], None, "{}", method);
        assert_eq!(repaired.filled()[11], None, "{}", method);
        assert!(repaired.filled()[5].is_some(), "{}", method);
    }
}

#[test]
fn test_original_channel_is_untouched() {
    let series = sampled_series(10, &[3, 4, 7], |t| t.sin());
    let before = series.clone();

    for method in InterpolationMethod::ALL {
        let repaired = interpolate(&series, method, Some(3)).unwrap();
        assert_eq!(series, before);
        assert_eq!(repaired.original_series(), before);
        assert_eq!(repaired.timestamps(), before.timestamps());
    }
}

#[test]
fn test_known_values_are_preserved() {
    let series = sampled_series(10, &[2, 6], |t| (t / 30.0).cos() * 50.0);
    for method in InterpolationMethod::ALL {
        let repaired = interpolate(&series, method, Some(3)).unwrap();
        for (original, filled) in repaired.original().iter().zip(repaired.filled()) {
            if original.is_some() {
                assert_eq!(original, filled);
            }
        }
    }
}

#[test]
fn test_quadratic_reproduces_quadratic_signal() {
    let f = |t: f64| 0.002 * t * t - 0.5 * t + 49870.0;
    let series = sampled_series(15, &[4, 5, 9], f);
    let repaired = interpolate(&series, InterpolationMethod::Quadratic, Some(2)).unwrap();

    for i in [4, 5, 9] {
        assert_close(repaired.filled()[i], f(20.0 * i as f64), 1e-6);
    }
}

#[test]
fn test_cubic_and_spline_three_reproduce_cubic_signal() {
    let f = |t: f64| 1e-5 * t * t * t - 0.003 * t * t + 0.2 * t + 5.0;
    let series = sampled_series(16, &[3, 7, 8, 12], f);

    let cubic = interpolate(&series, InterpolationMethod::Cubic, Some(3)).unwrap();
    let spline = interpolate(&series, InterpolationMethod::Spline, Some(3)).unwrap();
    for i in [3, 7, 8, 12] {
        let expected = f(20.0 * i as f64);
        assert_close(cubic.filled()[i], expected, 1e-6);
        assert_close(spline.filled()[i], expected, 1e-6);
    }
}

#[test]
fn test_polynomial_reproduces_signal_of_its_order() {
    let f = |t: f64| 0.01 * t * t - t + 2.0;
    let series = sampled_series(10, &[1, 5, 6], f);
    let repaired = interpolate(&series, InterpolationMethod::Polynomial, Some(2)).unwrap();

    for i in [1, 5, 6] {
        assert_close(repaired.filled()[i], f(20.0 * i as f64), 1e-8);
    }
}

#[test]
fn test_polynomial_order_one_matches_linear() {
    let series = series_from(vec![Some(1.0), Some(4.0), None, None, Some(10.0), Some(2.0)]);
    let linear = interpolate(&series, InterpolationMethod::Linear, None).unwrap();
    let polynomial = interpolate(&series, InterpolationMethod::Polynomial, Some(1)).unwrap();

    for (a, b) in linear.filled().iter().zip(polynomial.filled()) {
        assert!((a.unwrap() - b.unwrap()).abs() < 1e-9);
    }
}

#[test]
fn test_polynomial_is_the_spline_of_the_same_degree() {
    let f = |t: f64| (t / 90.0).sin() * 40.0 + 0.02 * t;
    let series = sampled_series(24, &[2, 3, 9, 15, 16, 17, 21], f);

    for order in 1..=5 {
        let spline = interpolate(&series, InterpolationMethod::Spline, Some(order)).unwrap();
        let polynomial =
            interpolate(&series, InterpolationMethod::Polynomial, Some(order)).unwrap();
        assert_eq!(spline.filled(), polynomial.filled(), "order {}", order);
    }
}

#[test]
fn test_missing_order_is_interpolation_error() {
    let series = series_from(vec![Some(1.0), None, Some(3.0)]);
    for method in [
        InterpolationMethod::Quadratic,
        InterpolationMethod::Cubic,
        InterpolationMethod::Spline,
        InterpolationMethod::Polynomial,
    ] {
        let result = interpolate(&series, method, None);
        assert!(matches!(result, Err(Error::Interpolation { .. })), "{}", method);
        let result = interpolate(&series, method, Some(0));
        assert!(matches!(result, Err(Error::Interpolation { .. })), "{}", method);
    }
}

#[test]
fn test_not_enough_known_samples_for_degree() {
    let series = series_from(vec![Some(1.0), None, Some(3.0), Some(4.0)]);
    let result = interpolate(&series, InterpolationMethod::Spline, Some(5));
    assert!(matches!(result, Err(Error::Interpolation { .. })));

    let result = interpolate(&series, InterpolationMethod::Polynomial, Some(4));
    assert!(matches!(result, Err(Error::Interpolation { .. })));
}

#[test]
fn test_series_without_interior_gaps_is_returned_as_is() {
    let series = series_from(vec![None, Some(1.0), Some(2.0), None]);
    let repaired = interpolate(&series, InterpolationMethod::Spline, Some(5)).unwrap();
    assert_eq!(repaired.filled(), series.values());
    assert_eq!(repaired.filled_count(), 0);

    let empty = Series::default();
    let repaired = interpolate(&empty, InterpolationMethod::Linear, None).unwrap();
    assert!(repaired.is_empty());
}
