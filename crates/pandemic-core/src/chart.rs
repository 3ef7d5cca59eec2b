use crate::align::{self, Aligned};
use crate::config::DashboardConfig;
use crate::events::{format_events, FormattedEvent};
use crate::figure::*;
use crate::model::{InfectionRecord, Snapshot};
use crate::normalize::BASE;
use crate::palette::ColorMode;
use chrono::NaiveDate;

const TITLE: &str = "Indexed Close Price and COVID-19 Cases";
const EVENT_NAME: &str = "Event";
const EVENT_TEMPLATE: &str = "<b>Event:</b><br>%{customdata}<extra></extra>";
const CASES_NAME: &str = "COVID-19 Cases (Smoothed)";

/// Builds the dual-axis figure: one indexed price line per selected ticker, invisible event
/// markers carrying the tooltips, and the infection bars on a secondary axis.
///
/// Holds no state between calls; the same inputs always give the same figure.
pub struct ChartBuilder<'a> {
    config: &'a DashboardConfig,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    /// Resolve a user selection against the catalog.
    ///
    /// Unknown tickers are dropped and duplicates keep their first position; if nothing is
    /// left, the configured default ticker is selected.
    pub fn selection<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<String> {
        let mut selected: Vec<String> = Vec::with_capacity(tickers.len());
        for ticker in tickers.iter().map(AsRef::as_ref) {
            if !self.config.catalog.contains(ticker) {
                log::warn!("[{ticker}] is not a tracked ticker; dropping it from the selection");
                continue;
            }
            if !selected.iter().any(|s| s == ticker) {
                selected.push(ticker.to_string());
            }
        }

        if selected.is_empty() {
            log::debug!(
                "empty selection; falling back to [{}]",
                self.config.default_ticker
            );
            selected.push(self.config.default_ticker.clone());
        }
        selected
    }

    /// Last date shown on the chart: the earliest of the events' end, the infections' end
    /// and the configured hard cutoff.
    pub fn cutoff(&self, snapshot: &Snapshot) -> NaiveDate {
        self.aligned(snapshot).limit
    }

    fn aligned(&self, snapshot: &Snapshot) -> Aligned<FormattedEvent, InfectionRecord> {
        let events = format_events(&snapshot.events, self.config.wrap_width);
        align::align(&events, &snapshot.infections, self.config.cutoff)
    }

    /// Build the figure for `selection` (already resolved with [`selection`]).
    ///
    /// A selected ticker missing from the snapshot draws an empty line.
    ///
    /// [`selection`]: ChartBuilder::selection
    pub fn build(&self, selection: &[String], mode: ColorMode, snapshot: &Snapshot) -> Figure {
        let Aligned {
            left: events,
            right: infections,
            limit: cutoff,
        } = self.aligned(snapshot);

        let mut data = Vec::with_capacity(selection.len() + 2);
        let mut earliest: Option<NaiveDate> = None;

        // price lines
        for (i, ticker) in selection.iter().enumerate() {
            let series = snapshot
                .prices
                .get(ticker)
                .map(|series| align::truncate(series, cutoff))
                .unwrap_or_default();
            earliest = earliest.into_iter().chain(align::first_date(&series)).min();

            data.push(Trace::Scatter(Scatter {
                x: series.iter().map(|bar| bar.bar.date).collect(),
                y: series.iter().map(|bar| bar.indexed_close).collect(),
                mode: "lines".to_string(),
                name: self.config.catalog.display_name(ticker).to_string(),
                line: Some(Line {
                    width: 2.0,
                    color: Some(mode.line_color(i).to_string()),
                }),
                marker: None,
                yaxis: Some("y".to_string()),
                customdata: None,
                hovertemplate: None,
                visible: Some(true),
            }));
        }

        // event tooltips, pinned to the base line
        data.push(Trace::Scatter(Scatter {
            x: events.iter().map(|event| event.date).collect(),
            y: vec![BASE; events.len()],
            mode: "markers".to_string(),
            name: EVENT_NAME.to_string(),
            line: None,
            marker: Some(Marker {
                color: "blue".to_string(),
                size: Some(8.0),
                opacity: 0.0,
            }),
            yaxis: None,
            customdata: Some(events.into_iter().map(|event| event.text).collect()),
            hovertemplate: Some(EVENT_TEMPLATE.to_string()),
            visible: None,
        }));

        // infections on the secondary axis
        data.push(Trace::Bar(Bar {
            x: infections.iter().map(|record| record.date).collect(),
            y: infections
                .iter()
                .map(|record| record.new_cases_smoothed)
                .collect(),
            name: CASES_NAME.to_string(),
            marker: Marker {
                color: mode.bar_color().to_string(),
                size: None,
                opacity: 0.4,
            },
            yaxis: Some("y2".to_string()),
        }));

        Figure {
            data,
            layout: layout(earliest.map(|start| (start, cutoff))),
        }
    }
}

fn layout(range: Option<(NaiveDate, NaiveDate)>) -> Layout {
    Layout {
        title: Some(Title::new(TITLE)),
        xaxis: Some(Axis {
            title: Some(Title::new("Date")),
            range,
            ..Default::default()
        }),
        yaxis: Some(Axis {
            title: Some(Title::new("Indexed Price (%)")),
            side: Some("left".to_string()),
            showgrid: Some(true),
            ..Default::default()
        }),
        yaxis2: Some(Axis {
            title: Some(Title::new(CASES_NAME)),
            overlaying: Some("y".to_string()),
            side: Some("right".to_string()),
            showgrid: Some(false),
            ..Default::default()
        }),
        hovermode: Some("x unified".to_string()),
        template: Some("plotly_white".to_string()),
        hoverlabel: Some(HoverLabel {
            bordercolor: "white".to_string(),
            font: Font {
                family: Some("Arial, sans-serif".to_string()),
                size: 12,
                color: "black".to_string(),
            },
            align: "left".to_string(),
            namelength: 0,
        }),
        legend: Some(Legend {
            x: 0.5,
            y: 1.05,
            xanchor: "center".to_string(),
            orientation: "h".to_string(),
        }),
        margin: Some(Margin { l: 80 }),
        annotations: Vec::new(),
    }
}
