use crate::catalog::TickerCatalog;
use crate::figure::*;
use crate::model::PriceBar;
use crate::normalize::{normalize, BASE};
use crate::palette::ColorMode;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const GRID_ROWS: usize = 4;
pub const GRID_COLUMNS: usize = 3;

/// Fixed number of grid slots; a catalog beyond this is truncated.
pub const GRID_SLOTS: usize = GRID_ROWS * GRID_COLUMNS;

const TITLE: &str = "Stock Price Heatmap based on index price change from the Base Price (100)";
const NOT_AVAILABLE: &str = "N/A";
const SCALE_MIN: f64 = -100.0;
const SCALE_MAX: f64 = 100.0;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Frame: indexed price history of every ticker
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Indexed close of every ticker over its whole history.
///
/// This is the expensive part of the heatmap; callers are expected to memoize it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapFrame {
    series: BTreeMap<String, Vec<(NaiveDate, f64)>>,
}

impl HeatmapFrame {
    /// Index each ticker's date-ordered bars against its own first close.
    pub fn from_prices<'a, I>(prices: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [PriceBar])>,
    {
        let series = prices
            .into_iter()
            .filter(|(_, bars)| !bars.is_empty())
            .map(|(ticker, bars)| {
                let indexed = normalize(bars)
                    .into_iter()
                    .map(|bar| (bar.bar.date, bar.indexed_close))
                    .collect();
                (ticker.to_string(), indexed)
            })
            .collect();
        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Indexed value of `ticker` on `date`, or its latest value when `date` is `None`.
    pub fn value(&self, ticker: &str, date: Option<NaiveDate>) -> Option<f64> {
        let series = self.series.get(ticker)?;
        match date {
            Some(date) => series
                .iter()
                .find(|(day, _)| *day == date)
                .map(|(_, value)| *value),
            None => series
                .iter()
                .max_by_key(|(day, _)| *day)
                .map(|(_, value)| *value),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Grid
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// One grid slot. Padding slots carry no ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub ticker: Option<String>,
    pub name: Option<String>,
    /// Percentage change from the base; `None` when the ticker has no data for the date.
    pub change: Option<f64>,
}

impl Cell {
    fn padding() -> Self {
        Self {
            ticker: None,
            name: None,
            change: None,
        }
    }

    /// Annotation drawn on the cell; padding slots get none.
    pub fn label(&self) -> Option<String> {
        let name = self.name.as_ref()?;
        Some(match self.change {
            Some(change) => format!("{name}<br>{change:+.2}%"),
            None => NOT_AVAILABLE.to_string(),
        })
    }
}

/// Row-major 4×3 grid of [`Cell`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    pub cells: Vec<Cell>,
    pub date: Option<NaiveDate>,
}

impl HeatmapGrid {
    /// Lay the catalog out slot by slot, padding up to (and truncating down to) [`GRID_SLOTS`].
    pub fn build(catalog: &TickerCatalog, frame: &HeatmapFrame, date: Option<NaiveDate>) -> Self {
        if catalog.len() > GRID_SLOTS {
            log::warn!(
                "ticker catalog holds {} entries; only the first {GRID_SLOTS} fit the heatmap",
                catalog.len()
            );
        }

        let mut cells: Vec<Cell> = catalog
            .iter()
            .take(GRID_SLOTS)
            .map(|entry| Cell {
                ticker: Some(entry.ticker.clone()),
                name: Some(entry.name.clone()),
                change: frame.value(&entry.ticker, date).map(|value| value - BASE),
            })
            .collect();
        cells.resize(GRID_SLOTS, Cell::padding());

        Self { cells, date }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    pub fn has_data(&self) -> bool {
        self.cells.iter().any(|cell| cell.change.is_some())
    }
}

// -------------------------------------------------------------------------------------------------

/// Renders the grid of percentage changes as a diverging heatmap.
pub struct HeatmapBuilder<'a> {
    catalog: &'a TickerCatalog,
}

impl<'a> HeatmapBuilder<'a> {
    pub fn new(catalog: &'a TickerCatalog) -> Self {
        Self { catalog }
    }

    pub fn grid(&self, frame: &HeatmapFrame, date: Option<NaiveDate>) -> HeatmapGrid {
        HeatmapGrid::build(self.catalog, frame, date)
    }

    pub fn build(&self, frame: &HeatmapFrame, date: Option<NaiveDate>, mode: ColorMode) -> Figure {
        render(&self.grid(frame, date), mode)
    }
}

pub fn render(grid: &HeatmapGrid, mode: ColorMode) -> Figure {
    let z = grid
        .rows()
        .map(|row| row.iter().map(|cell| cell.change).collect())
        .collect();

    let annotations = grid
        .rows()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter().enumerate().filter_map(move |(j, cell)| {
                cell.label().map(|text| Annotation {
                    x: j,
                    y: i,
                    text,
                    showarrow: false,
                    font: Font {
                        family: None,
                        size: 10,
                        color: "black".to_string(),
                    },
                })
            })
        })
        .collect();

    let heatmap = Heatmap {
        z,
        x: (1..=GRID_COLUMNS).map(|i| format!("Column {i}")).collect(),
        y: (1..=GRID_ROWS).map(|i| format!("Row {i}")).collect(),
        colorscale: mode
            .diverging_scale()
            .iter()
            .map(|(stop, color)| (*stop, color.to_string()))
            .collect(),
        zmin: SCALE_MIN,
        zmax: SCALE_MAX,
        colorbar: ColorBar {
            title: Title::new(""),
            tickvals: vec![SCALE_MIN, 0.0, SCALE_MAX],
        },
    };

    let hidden = || Axis {
        showticklabels: Some(false),
        ..Default::default()
    };

    Figure {
        data: vec![Trace::Heatmap(heatmap)],
        layout: Layout {
            title: Some(Title::new(TITLE)),
            xaxis: Some(hidden()),
            yaxis: Some(hidden()),
            annotations,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn bars(symbol: &str, rows: &[(&str, f64)]) -> Vec<PriceBar> {
        rows.iter()
            .map(|(date, close)| PriceBar {
                date: day(date),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 1,
                symbol: symbol.to_string(),
            })
            .collect()
    }

    fn frame() -> HeatmapFrame {
        let spy = bars("SPY", &[("2020-03-02", 200.0), ("2020-03-03", 150.0), ("2020-03-04", 250.0)]);
        let xle = bars("XLE", &[("2020-03-03", 40.0), ("2020-03-04", 30.0)]);
        HeatmapFrame::from_prices([("SPY", spy.as_slice()), ("XLE", xle.as_slice())])
    }

    #[test]
    fn frame_values_by_date_or_latest() {
        let frame = frame();
        assert_eq!(frame.value("SPY", Some(day("2020-03-02"))), Some(100.0));
        assert_eq!(frame.value("SPY", Some(day("2020-03-03"))), Some(75.0));
        assert_eq!(frame.value("SPY", None), Some(125.0));
        assert_eq!(frame.value("XLE", Some(day("2020-03-02"))), None);
        assert_eq!(frame.value("QQQ", None), None);
    }

    #[test]
    fn grid_always_has_twelve_cells() {
        let frame = HeatmapFrame::default();
        for size in 1..=15 {
            let catalog = TickerCatalog::new((0..size).map(|i| (format!("T{i}"), format!("Ticker {i}"))));
            let grid = HeatmapGrid::build(&catalog, &frame, None);
            assert_eq!(grid.cells.len(), GRID_SLOTS);
            assert_eq!(grid.rows().count(), GRID_ROWS);
        }
    }

    #[test]
    fn oversized_catalog_keeps_first_twelve() {
        let catalog = TickerCatalog::new((0..14).map(|i| (format!("T{i}"), format!("Ticker {i}"))));
        let grid = HeatmapGrid::build(&catalog, &HeatmapFrame::default(), None);
        assert_eq!(grid.cells[11].ticker.as_deref(), Some("T11"));
        assert!(grid.cells.iter().all(|c| c.ticker.as_deref() != Some("T12")));
    }

    #[test]
    fn small_catalog_is_padded() {
        let catalog = TickerCatalog::new([("SPY", "Market"), ("XLE", "Energy")]);
        let grid = HeatmapGrid::build(&catalog, &frame(), None);
        assert_eq!(grid.cells[0].change, Some(25.0));
        assert_eq!(grid.cells[1].change, Some(-25.0));
        assert!(grid.cells[2..].iter().all(|cell| *cell == Cell::padding()));
    }

    #[test]
    fn unmatched_date_renders_all_not_available() {
        let catalog = TickerCatalog::default();
        let builder = HeatmapBuilder::new(&catalog);
        let grid = builder.grid(&frame(), Some(day("1999-01-01")));
        assert!(!grid.has_data());

        let figure = render(&grid, ColorMode::Standard);
        let Trace::Heatmap(heatmap) = &figure.data[0] else {
            panic!("expected a heatmap trace");
        };
        assert!(heatmap.z.iter().flatten().all(Option::is_none));
        assert_eq!(figure.layout.annotations.len(), 12);
        assert!(figure.layout.annotations.iter().all(|a| a.text == "N/A"));
    }

    #[test]
    fn annotations_are_signed_with_two_decimals() {
        let catalog = TickerCatalog::new([("SPY", "Market"), ("XLE", "Energy")]);
        let figure = HeatmapBuilder::new(&catalog).build(&frame(), None, ColorMode::Standard);
        let texts: Vec<&str> = figure.layout.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["Market<br>+25.00%", "Energy<br>-25.00%"]);
        assert_eq!((figure.layout.annotations[1].x, figure.layout.annotations[1].y), (1, 0));
    }

    #[test]
    fn scale_is_fixed_and_mode_dependent() {
        let catalog = TickerCatalog::default();
        let builder = HeatmapBuilder::new(&catalog);
        for mode in [ColorMode::Standard, ColorMode::Colorblind] {
            let figure = builder.build(&frame(), None, mode);
            let Trace::Heatmap(heatmap) = &figure.data[0] else {
                panic!("expected a heatmap trace");
            };
            assert_eq!((heatmap.zmin, heatmap.zmax), (-100.0, 100.0));
            assert_eq!(heatmap.z.len(), 4);
            assert!(heatmap.z.iter().all(|row| row.len() == 3));
            assert_eq!(heatmap.colorscale[2].1, mode.diverging_scale()[2].1);
        }
    }
}
