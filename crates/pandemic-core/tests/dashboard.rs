use chrono::NaiveDate;
use pandemic_core::figure::Trace;
use pandemic_core::heatmap::GRID_SLOTS;
use pandemic_core::prelude::*;
use std::collections::BTreeMap;

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn bars(symbol: &str, closes: &[f64]) -> Vec<PriceBar> {
    let dates = ["2020-03-02", "2020-03-03", "2020-03-04"];
    dates
        .iter()
        .zip(closes)
        .map(|(date, close)| PriceBar {
            date: day(date),
            open: *close,
            high: *close,
            low: *close,
            close: *close,
            volume: 1_000_000,
            symbol: symbol.to_string(),
        })
        .collect()
}

fn snapshot() -> Snapshot {
    let mut prices = BTreeMap::new();
    prices.insert("SPY".to_string(), normalize(&bars("SPY", &[100.0, 110.0, 121.0])));
    prices.insert("AAPL".to_string(), normalize(&bars("AAPL", &[50.0, 55.0, 60.5])));

    Snapshot {
        events: vec![
            Event {
                date: day("2020-03-02"),
                news: Some(vec!["Markets slide on virus fears".to_string()]),
            },
            Event {
                date: day("2020-03-04"),
                news: None,
            },
        ],
        infections: ["2020-03-02", "2020-03-03", "2020-03-04"]
            .iter()
            .enumerate()
            .map(|(i, date)| InfectionRecord {
                date: day(date),
                new_cases_smoothed: Some(10.0 * (i + 1) as f64),
                iso_code: "USA".to_string(),
            })
            .collect(),
        prices,
    }
}

#[test]
fn two_tickers_end_to_end() {
    let config = DashboardConfig::default();
    let chart = ChartBuilder::new(&config);
    let selection = chart.selection(&["SPY", "AAPL"]);
    let figure = chart.build(&selection, ColorMode::from_flag(false), &snapshot());

    assert_eq!(figure.data.len(), 4);

    let lines: Vec<&Vec<f64>> = figure
        .data
        .iter()
        .filter_map(|trace| match trace {
            Trace::Scatter(s) if s.mode == "lines" => Some(&s.y),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|y| y[0] == 100.0));
    assert!((lines[0][2] - 121.0).abs() < 1e-9);

    let markers = figure
        .data
        .iter()
        .filter(|trace| matches!(trace, Trace::Scatter(s) if s.mode == "markers"))
        .count();
    let bars = figure
        .data
        .iter()
        .filter(|trace| matches!(trace, Trace::Bar(_)))
        .count();
    assert_eq!((markers, bars), (1, 1));
    assert_eq!(figure.data[0].name(), Some("Overall Market (S&P 500)"));
    assert_eq!(figure.layout.hovermode.as_deref(), Some("x unified"));
}

#[test]
fn figure_serializes_for_plotly() {
    let config = DashboardConfig::default();
    let chart = ChartBuilder::new(&config);
    let figure = chart.build(&chart.selection(&["SPY"]), ColorMode::Standard, &snapshot());
    let json = serde_json::to_value(&figure).unwrap();

    assert_eq!(json["data"][0]["type"], "scatter");
    assert_eq!(json["data"][0]["x"][0], "2020-03-02");
    assert_eq!(json["data"][1]["customdata"][1], "No event");
    assert_eq!(json["data"][2]["type"], "bar");
    assert_eq!(json["layout"]["xaxis"]["range"][1], "2020-03-04");
    assert_eq!(json["layout"]["yaxis2"]["overlaying"], "y");
}

#[test]
fn heatmap_from_the_same_prices() {
    let config = DashboardConfig::default();
    let spy = bars("SPY", &[100.0, 110.0, 125.0]);
    let aapl = bars("AAPL", &[50.0, 55.0, 60.0]);
    let frame = HeatmapFrame::from_prices([("SPY", spy.as_slice()), ("AAPL", aapl.as_slice())]);
    let builder = HeatmapBuilder::new(&config.catalog);

    let latest = builder.grid(&frame, None);
    assert_eq!(latest.cells.len(), GRID_SLOTS);
    let change = |i: usize| latest.cells[i].change.unwrap();
    assert!((change(0) - 25.0).abs() < 1e-9);
    assert!((change(1) - 20.0).abs() < 1e-9);
    assert_eq!(latest.cells[2].change, None);

    let missing = builder.grid(&frame, Some(day("2021-01-01")));
    assert!(!missing.has_data());
}
