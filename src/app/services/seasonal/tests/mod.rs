//! Tests for the seasonal reconstruction engine

use super::*;
use crate::Error;
use crate::app::models::{RepairMethod, Series};
use crate::constants::DEFAULT_SEASONAL_PERIOD;
use chrono::{DateTime, Duration, TimeZone, Utc};

const PERIOD: usize = 6;

fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 5, 23, 0, 0, 0).unwrap()
}

fn at(k: usize) -> DateTime<Utc> {
    origin() + Duration::seconds(20 * k as i64)
}

fn series_from(values: Vec<Option<f64>>) -> Series {
    let timestamps = (0..values.len()).map(at).collect();
    Series::new(timestamps, values).unwrap()
}

/// Daily-like signal: level + slow drift + periodic pattern + small wobble
fn signal(k: usize) -> f64 {
    const PATTERN: [f64; PERIOD] = [12.0, 5.0, -3.0, -9.0, -6.0, 1.0];
    49870.0 + 0.05 * k as f64 + PATTERN[k % PERIOD] + ((k * 13) % 7) as f64 * 0.1
}

fn gappy_series(n: usize, missing: &[usize]) -> Series {
    series_from(
        (0..n)
            .map(|k| (!missing.contains(&k)).then(|| signal(k)))
            .collect(),
    )
}

#[test]
fn test_values_outside_window_follow_first_pass() {
    let missing = [2, 3, 9, 20, 33, 34, 35];
    let series = gappy_series(48, &missing);
    let passes = run_passes(&series, PERIOD).unwrap();

    let repaired = seasonal_reconstruct_with_period(&series, at(24), at(29), PERIOD).unwrap();

    for i in (0..48).filter(|i| !(24..=29).contains(i)) {
        match series.values()[i] {
            Some(value) => assert_eq!(repaired.filled()[i], Some(value), "known at {}", i),
            None => assert_eq!(repaired.filled()[i], Some(passes.first[i]), "missing at {}", i),
        }
    }
}

#[test]
fn test_values_inside_window_follow_second_pass() {
    let missing = [2, 3, 25, 26];
    let series = gappy_series(48, &missing);
    let passes = run_passes(&series, PERIOD).unwrap();

    let repaired = seasonal_reconstruct_with_period(&series, at(24), at(29), PERIOD).unwrap();

    for i in 24..=29 {
        assert_eq!(repaired.filled()[i], Some(passes.second[i]), "position {}", i);
    }
    // known readings inside the window are replaced as well
    assert!(repaired.overwritten_count() > 0);
    assert_eq!(repaired.remaining_missing(), 0);
}

#[test]
fn test_passes_match_manual_decomposition() {
    let series = gappy_series(36, &[4, 5, 17]);
    let passes = run_passes(&series, PERIOD).unwrap();

    let mean = series.known_mean().unwrap();
    let placeholder: Vec<f64> = series.values().iter().map(|v| v.unwrap_or(mean)).collect();
    let first = decompose_additive(&placeholder, PERIOD).unwrap().reconstruction();
    assert_eq!(passes.first, first);

    assert_eq!(passes.corrected[4], first[4]);
    assert_eq!(passes.corrected[6], signal(6));

    let second = decompose_additive(&passes.corrected, PERIOD)
        .unwrap()
        .reconstruction();
    assert_eq!(passes.second, second);
}

#[test]
fn test_original_channel_is_untouched() {
    let series = gappy_series(36, &[1, 7, 8]);
    let before = series.clone();

    let repaired = seasonal_reconstruct_with_period(&series, at(0), at(5), PERIOD).unwrap();

    assert_eq!(series, before);
    assert_eq!(repaired.original(), before.values());
    assert_eq!(
        repaired.method(),
        &RepairMethod::Seasonal {
            period: PERIOD,
            window_start: at(0),
            window_end: at(5)
        }
    );
}

#[test]
fn test_window_is_clipped_to_series() {
    let series = gappy_series(24, &[]);
    let start = origin() - Duration::days(1);
    let repaired = seasonal_reconstruct_with_period(&series, start, at(2), PERIOD).unwrap();
    let passes = run_passes(&series, PERIOD).unwrap();

    for i in 0..=2 {
        assert_eq!(repaired.filled()[i], Some(passes.second[i]));
    }
    assert_eq!(repaired.filled()[3], series.values()[3]);
}

#[test]
fn test_window_outside_series_is_decomposition_error() {
    let series = gappy_series(24, &[3]);
    let result = seasonal_reconstruct_with_period(
        &series,
        at(100),
        at(200),
        PERIOD,
    );
    assert!(matches!(result, Err(Error::Decomposition { .. })));
}

#[test]
fn test_reversed_window_is_decomposition_error() {
    let series = gappy_series(24, &[3]);
    let result = seasonal_reconstruct_with_period(&series, at(10), at(2), PERIOD);
    assert!(matches!(result, Err(Error::Decomposition { .. })));
}

#[test]
fn test_all_missing_is_decomposition_error() {
    let series = series_from(vec![None; 24]);
    let result = seasonal_reconstruct_with_period(&series, at(0), at(3), PERIOD);
    assert!(matches!(result, Err(Error::Decomposition { .. })));
}

#[test]
fn test_short_series_with_default_period() {
    let n = 2 * DEFAULT_SEASONAL_PERIOD - 1;
    let series = series_from((0..n).map(|k| Some(signal(k))).collect());
    let result = seasonal_reconstruct(&series, at(0), at(10));

    match result {
        Err(Error::Decomposition { message }) => assert!(message.contains("8640")),
        other => panic!("expected decomposition error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_two_days_with_default_period() {
    let n = 2 * DEFAULT_SEASONAL_PERIOD;
    let values: Vec<Option<f64>> = (0..n)
        .map(|k| {
            let phase = (k % DEFAULT_SEASONAL_PERIOD) as f64 / DEFAULT_SEASONAL_PERIOD as f64;
            let reading = 49870.0 + 25.0 * (phase * std::f64::consts::TAU).sin();
            (k % 500 != 7).then_some(reading)
        })
        .collect();
    let series = series_from(values);

    let repaired = seasonal_reconstruct(&series, at(4000), at(4100)).unwrap();

    assert_eq!(repaired.len(), n);
    assert_eq!(repaired.remaining_missing(), 0);

    let truth = |k: usize| {
        let phase = k as f64 / DEFAULT_SEASONAL_PERIOD as f64;
        49870.0 + 25.0 * (phase * std::f64::consts::TAU).sin()
    };

    // A purely daily signal is reproduced closely where both days are known
    let estimate = repaired.filled()[4050].unwrap();
    assert!((estimate - truth(4050)).abs() < 0.25, "{} vs {}", estimate, truth(4050));

    // A gap outside the window gets a seasonally informed estimate
    assert!(series.values()[2007].is_none());
    let estimate = repaired.filled()[2007].unwrap();
    assert!((estimate - truth(2007)).abs() < 15.0, "{} vs {}", estimate, truth(2007));
}
