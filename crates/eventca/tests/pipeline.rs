//! End-to-end event studies from polars frames to scored events and chart data.

use std::io::Cursor;

use approx::assert_relative_eq;
use eventca::{
    components::{ComponentConfig, add_components, add_ics, add_pcs},
    primitives::{ComponentMethod, Date, EventTable, OffsetLabel, ReturnSeries},
    utils::{
        component_time_series, conditional_cumulative_returns, conditional_distribution,
        events_from_frame, events_to_frame, loading_profile, returns_from_frame,
    },
    window::{WindowConfig, construct_event_windows},
};
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

const N_DAYS: usize = 2500;

fn day(i: usize) -> Date {
    Date::from_num_days_from_ce_opt(738_886 + i as i32).unwrap()
}

fn iso(i: usize) -> String {
    day(i).format("%Y-%m-%d").to_string()
}

/// Uniform daily log returns, listed newest first.
fn returns_frame() -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let returns: Vec<f64> = (0..N_DAYS).map(|_| rng.r#gen::<f64>() * 0.04 - 0.02).collect();
    df! {
        "Date" => (0..N_DAYS).rev().map(iso).collect::<Vec<_>>(),
        "Log Return" => returns.into_iter().rev().collect::<Vec<_>>(),
    }
    .unwrap()
}

/// 400 events six days apart, one before the first return, and one duplicate date.
fn events_frame() -> DataFrame {
    let mut days: Vec<usize> = (0..400).map(|j| 20 + 6 * j).collect();
    days.push(0);
    days.push(20);
    let tickers: Vec<&str> = days.iter().map(|d| ["AAA", "BBB", "CCC"][(d / 6) % 3]).collect();
    let surprise: Vec<f64> = days.iter().map(|&d| (d as f64 * 0.37).sin()).collect();
    df! {
        "Date" => days.iter().copied().map(iso).collect::<Vec<_>>(),
        "ticker" => tickers,
        "surprise" => surprise,
    }
    .unwrap()
}

fn load() -> (EventTable, ReturnSeries) {
    let events = events_from_frame(&events_frame(), "Date").unwrap();
    let returns = returns_from_frame(&returns_frame(), "Date", "Log Return").unwrap();
    (events, returns)
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|c| c.to_string()).collect()
}

#[test]
fn frames_to_scored_events() {
    let (events, returns) = load();
    assert_eq!(events.len(), 402);
    assert_eq!(returns.len(), N_DAYS);

    let (aligned, labels) =
        construct_event_windows(&events, &returns, &WindowConfig::new(-1, 1, Some(4))).unwrap();
    // one unmatched event and three warm-up rows
    assert_eq!(aligned.len(), 398);
    assert_eq!(labels, OffsetLabel::range(-1, 1));
    assert!(aligned.dates().windows(2).all(|w| w[0] <= w[1]));
    assert!(aligned.aligned_dates().iter().zip(aligned.dates()).all(|(a, e)| a < e));

    let (scored, artifact) = add_ics(&aligned, &labels, 3).unwrap();
    assert_eq!(artifact.method(), ComponentMethod::IndependentSource);

    let frame = events_to_frame(&scored).unwrap();
    assert_eq!(frame.height(), 398);
    assert_eq!(
        column_names(&frame),
        vec![
            "Date",
            "ticker",
            "surprise",
            "aligned_date",
            "Log Return",
            "-1",
            "0",
            "1",
            "IC1",
            "IC2",
            "IC3"
        ]
    );
}

#[test]
fn reruns_are_identical() {
    let (events, returns) = load();
    let config = WindowConfig::new(-1, 1, Some(4));
    let (aligned, labels) = construct_event_windows(&events, &returns, &config).unwrap();

    let (first, first_artifact) = add_ics(&aligned, &labels, 3).unwrap();
    let (second, second_artifact) = add_ics(&aligned, &labels, 3).unwrap();
    assert_eq!(first.scores(), second.scores());
    assert_eq!(first_artifact.loadings(), second_artifact.loadings());
}

#[rstest]
#[case(ComponentMethod::Orthogonal)]
#[case(ComponentMethod::IndependentSource)]
fn artifact_rescores_fitted_events(#[case] method: ComponentMethod) {
    let (events, returns) = load();
    let config = WindowConfig::new(-1, 1, Some(4));
    let (aligned, labels) = construct_event_windows(&events, &returns, &config).unwrap();

    let (scored, artifact) =
        add_components(&aligned, &labels, &ComponentConfig::new(method, 3)).unwrap();
    let rescored = artifact.transform(&aligned).unwrap();
    for (a, b) in rescored.iter().zip(scored.scores()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-8);
    }
}

#[test]
fn default_window_pcs() {
    let (events, returns) = load();
    let (aligned, labels) =
        construct_event_windows(&events, &returns, &WindowConfig::default()).unwrap();
    assert_eq!(labels.len(), 91);
    assert_eq!(aligned.values().ncols(), 91);
    assert!(!aligned.is_empty());

    let (scored, artifact) = add_pcs(&aligned, &labels, 3).unwrap();
    assert_eq!(scored.scores().ncols(), 3);
    let ratios = artifact.diagnostics().explained_variance_ratio().unwrap();
    assert!(ratios[0] >= ratios[1] && ratios[1] >= ratios[2]);

    let err = add_pcs(&aligned, &labels, 92).unwrap_err();
    assert!(err.is_invalid_parameter());
}

#[test]
fn chart_data_from_scored_frame() {
    let (events, returns) = load();
    let config = WindowConfig::new(-1, 1, Some(4));
    let (aligned, labels) = construct_event_windows(&events, &returns, &config).unwrap();
    let (scored, artifact) = add_pcs(&aligned, &labels, 2).unwrap();
    let frame = events_to_frame(&scored).unwrap();

    let profile = loading_profile(&artifact, &labels).unwrap();
    assert_eq!(profile.shape(), (3, 3));

    let paths = conditional_cumulative_returns(&frame, &labels, "PC1", 3).unwrap();
    assert_eq!(paths.height(), 3);
    let event_day = paths.column("0").unwrap().as_materialized_series().f64().unwrap();
    assert!(event_day.into_iter().all(|v| v == Some(0.0)));

    let by_ticker = conditional_distribution(&frame, "ticker", &["PC1", "PC2"]).unwrap();
    assert_eq!(by_ticker.height(), 6);

    let series = component_time_series(&frame, "Date", &["PC1"], Some(5), true).unwrap();
    assert_eq!(series.height(), frame.height());
    assert_eq!(series.column("PC1").unwrap().null_count(), 4);
}

#[test]
fn scored_frame_survives_csv() {
    let (events, returns) = load();
    let config = WindowConfig::new(-2, 2, None);
    let (aligned, labels) = construct_event_windows(&events, &returns, &config).unwrap();
    // without demeaning only the unmatched event is dropped
    assert_eq!(aligned.len(), 401);
    let (scored, _) = add_pcs(&aligned, &labels, 2).unwrap();

    let mut frame = events_to_frame(&scored).unwrap();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer).include_header(true).finish(&mut frame).unwrap();

    let read = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .into_reader_with_file_handle(Cursor::new(buffer))
        .finish()
        .unwrap();
    assert_eq!(read.column("Date").unwrap().dtype(), &DataType::Date);

    let table = events_from_frame(&read, "Date").unwrap();
    assert_eq!(table.len(), scored.len());
    assert_eq!(table.dates(), scored.aligned().dates());
    assert!(table.column("PC2").is_some());
}
