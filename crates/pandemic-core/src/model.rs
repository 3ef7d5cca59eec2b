use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything that sits on a calendar date; used by the [`align`] routines.
///
/// [`align`]: crate::align
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Prices
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// One daily bar of a single ticker.
///
/// ```json
/// {
///     "date": "2020-03-16",
///     "open": 241.18,
///     "high": 256.9,
///     "low": 237.36,
///     "close": 239.85,
///     "volume": 297240000,
///     "symbol": "SPY"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub symbol: String,
}

/// A [`PriceBar`] rescaled against the first close of its series.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IndexedPriceBar {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub indexed_close: f64,
}

impl Dated for PriceBar {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for IndexedPriceBar {
    fn date(&self) -> NaiveDate {
        self.bar.date
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// COVID-19
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Daily infection count for one country. Early records carry no smoothed value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InfectionRecord {
    pub date: NaiveDate,
    pub new_cases_smoothed: Option<f64>,
    pub iso_code: String,
}

impl Dated for InfectionRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Timeline entry; `news` is `None` when the stored field was missing or not a list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub date: NaiveDate,
    pub news: Option<Vec<String>>,
}

impl Dated for Event {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Everything the line chart needs for one request: the events, the infection series and
/// the indexed price series of the selected tickers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub infections: Vec<InfectionRecord>,
    pub prices: BTreeMap<String, Vec<IndexedPriceBar>>,
}
