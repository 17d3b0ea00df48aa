use approx::assert_relative_eq;
use chrono::{Datelike, Days, NaiveDate};
use nifty_momentum::prelude::*;
use std::fs;
use std::path::Path;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

//weekdays in [start, end)
fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut date = start;
    while date < end {
        if date.weekday().number_from_monday() <= 5 {
            days.push(date);
        }
        date = date + Days::new(1);
    }
    days
}

//writes <symbol>.csv with closes from `close_of`
fn write_prices(dir: &Path, symbol: &str, days: &[NaiveDate], close_of: impl Fn(usize) -> f64) {
    let mut contents = String::from("date,open,close\n");
    for (i, date) in days.iter().enumerate() {
        let close = close_of(i);
        contents.push_str(&format!("{},{},{}\n", date, close * 0.99, close));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), contents).unwrap();
}

struct Fixture {
    _dir: tempfile::TempDir,
    config: AnalysisConfig,
}

//benchmark over oct-dec 2023, rising stock over nov-jan, falling and flat stocks over oct-dec
fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let prices = dir.path().join("prices");
    fs::create_dir(&prices).unwrap();

    let benchmark_days = trading_days(d(2023, 10, 1), d(2024, 1, 1));
    write_prices(&prices, "^NSEI", &benchmark_days, |i| 19000.0 + i as f64 * 10.0);

    let rising_days = trading_days(d(2023, 11, 1), d(2024, 1, 8));
    write_prices(&prices, "RISE.NS", &rising_days, |i| 100.0 + i as f64);

    let other_days = trading_days(d(2023, 10, 1), d(2024, 1, 1));
    write_prices(&prices, "FALL.NS", &other_days, |i| 500.0 - i as f64);
    write_prices(&prices, "FLAT.NS", &other_days, |_| 250.0);

    let listing = dir.path().join("nifty.csv");
    fs::write(
        &listing,
        "name,symbol\nRising Industries,RISE\nFalling Motors,FALL\nFlat Textiles,FLAT\n",
    )
    .unwrap();

    let config = AnalysisConfig {
        start_date: d(2023, 10, 1),
        end_date: d(2024, 1, 8),
        reference_date: d(2023, 12, 15),
        prices_dir: Some(prices),
        constituents_csv: Some(listing),
        ..AnalysisConfig::default()
    };

    Fixture { _dir: dir, config }
}

#[test]
fn selects_rising_stock_and_aligns_with_benchmark() {
    let fixture = fixture();
    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let report = engine.run(&fixture.config).unwrap();

    assert_eq!(report.universe_size, 3);
    assert_eq!(report.strategy.selected, vec!["Rising Industries".to_string()]);

    let view = report.comparison.view().unwrap();
    //benchmark ends in december, the rising stock starts in november
    assert_eq!(view.dates.first(), Some(&d(2023, 11, 1)));
    assert_eq!(view.dates.last(), Some(&d(2023, 12, 29)));
    assert_eq!(view.benchmark.len(), view.strategy.len());

    //aggregate of a single stock is its own cumulative return
    let rising = engine
        .load_series("RISE.NS", fixture.config.range().unwrap())
        .unwrap();
    for (date, _, strategy) in view.rows() {
        assert_relative_eq!(
            strategy,
            rising.cumulative_return(date).value().unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn amount_scales_both_curves_from_principal() {
    let mut fixture = fixture();
    fixture.config.amount = Some(1000.0);

    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let report = engine.run(&fixture.config).unwrap();
    let view = report.comparison.view().unwrap();

    //the rising stock's first day has zero cumulative return
    assert_relative_eq!(view.strategy[0], 1000.0);
    assert!(view.strategy.iter().all(|value| *value >= 1000.0));

    let summary = report.summary().unwrap();
    assert_eq!(summary.unit, "$");
    assert_eq!(summary.selected_count, 1);
}

#[test]
fn reference_month_without_risers_is_empty() {
    let mut fixture = fixture();
    //october: only falling and flat stocks have data
    fixture.config.reference_date = d(2023, 11, 20);

    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let report = engine.run(&fixture.config).unwrap();

    assert!(report.strategy.is_empty());
    assert!(report.strategy.aggregate.is_none());
    assert!(matches!(report.comparison, ComparisonOutcome::NoSelection));

    let text = TablePresenter::new().render(&report);
    assert!(text.contains("no instrument met the momentum criterion"));
}

#[test]
fn presenters_write_aligned_outputs() {
    let mut fixture = fixture();
    let out = tempfile::tempdir().unwrap();
    let csv_path = out.path().join("comparison.csv");
    let svg_path = out.path().join("comparison.svg");
    fixture.config.amount = Some(500.0);

    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let report = engine.run(&fixture.config).unwrap();

    CsvPresenter::new(&csv_path).present(&report).unwrap();
    SvgChartPresenter::new(&svg_path).present(&report).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("date,benchmark,strategy"));
    assert!(lines.next().unwrap().starts_with("2023-11-01,"));
    assert_eq!(csv.lines().count(), report.comparison.view().unwrap().len() + 1);

    let svg = fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("Benchmark"));
    assert!(svg.contains("Selected stocks"));

    let text = TablePresenter::new().render(&report);
    assert!(text.contains("Rising Industries"));
    assert!(text.contains("Final Value"));
}

#[test]
fn missing_price_file_names_the_instrument() {
    let fixture = fixture();
    fs::remove_file(
        fixture
            .config
            .prices_dir
            .as_ref()
            .unwrap()
            .join("FLAT.NS.csv"),
    )
    .unwrap();

    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let err = engine.run(&fixture.config).unwrap_err();
    assert!(err.to_string().contains("FLAT.NS"));

    let config = AnalysisConfig {
        skip_failed_constituents: true,
        ..fixture.config.clone()
    };
    let report = engine.run(&config).unwrap();
    assert_eq!(report.skipped, vec!["Flat Textiles".to_string()]);
}

#[test]
fn per_date_lookups_on_loaded_series() {
    let fixture = fixture();
    let engine = AnalysisEngine::from_config(&fixture.config).unwrap();
    let benchmark = engine
        .load_series("^NSEI", fixture.config.range().unwrap())
        .unwrap();

    //saturday
    assert_eq!(benchmark.price_at(d(2023, 10, 7)).to_string(), "--");
    assert!(benchmark.trailing_30_price(d(2023, 10, 20)).reason().is_some());

    let first = benchmark.first_date();
    assert_eq!(benchmark.cumulative_return(first), Lookup::Available(0.0));

    let day_40 = benchmark.samples()[40].date;
    assert_eq!(
        benchmark.trailing_30_price(day_40),
        Lookup::Available(19000.0 + 100.0)
    );
    assert_relative_eq!(
        benchmark.n_day_return(40, day_40).value().unwrap(),
        (19400.0 - 19000.0) / 19000.0 * 100.0
    );
    assert_relative_eq!(
        benchmark.daily_return(day_40).value().unwrap(),
        (19400.0 - 19400.0 * 0.99) / (19400.0 * 0.99) * 100.0,
        epsilon = 1e-9
    );
}
