//! Raw documents as stored, and their validation into the typed model.

pub mod common_de;

use anyhow::{ensure, Result};
use chrono::NaiveDate;
use common_de::{de_date, de_news, de_optional_f64};
use pandemic_core::model::{Event, InfectionRecord, PriceBar};
use serde::Deserialize;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// covid-19_timeline
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// ```json
/// {
///     "date": "March 11, 2020",
///     "news": ["WHO declares COVID-19 a pandemic", "..."]
/// }
/// ```
#[derive(Deserialize, Debug)]
pub struct EventDoc {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de_news")]
    pub news: Option<Vec<String>>,
}

impl From<EventDoc> for Event {
    fn from(doc: EventDoc) -> Self {
        Event {
            date: doc.date,
            news: doc.news,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// covid-19_infections
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// ```json
/// {
///     "date": "2020-03-11",
///     "iso_code": "USA",
///     "new_cases_smoothed": 94.571
/// }
/// ```
#[derive(Deserialize, Debug)]
pub struct InfectionDoc {
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub new_cases_smoothed: Option<f64>,
    #[serde(default)]
    pub iso_code: Option<String>,
}

impl InfectionDoc {
    /// `country` stands in for a missing `iso_code`; the query already filtered on it.
    ///
    /// Negative counts (reporting corrections) are kept as they are.
    pub fn into_record(self, country: &str) -> InfectionRecord {
        InfectionRecord {
            date: self.date,
            new_cases_smoothed: self.new_cases_smoothed,
            iso_code: self.iso_code.unwrap_or_else(|| country.to_string()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// {TICKER}_1Day
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// ```json
/// {
///     "timestamp": "2020-03-16T04:00:00Z",
///     "symbol": "SPY",
///     "open": 241.18,
///     "high": 256.9,
///     "low": 237.36,
///     "close": 239.85,
///     "volume": 297240000,
///     "trade_count": 1956822,
///     "vwap": 245.87
/// }
/// ```
#[derive(Deserialize, Debug)]
pub struct BarDoc {
    #[serde(alias = "date", deserialize_with = "de_date")]
    pub timestamp: NaiveDate,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "de_optional_f64")]
    pub volume: Option<f64>,
}

impl BarDoc {
    /// A bar needs a positive close to be indexed against; the other prices fall back to it.
    pub fn validate(self, ticker: &str) -> Result<PriceBar> {
        let close = self.close.unwrap_or(f64::NAN);
        ensure!(
            close.is_finite() && close > 0.0,
            "[{ticker}] unusable close {close} on {}",
            self.timestamp
        );
        let volume = self.volume.unwrap_or(0.0);
        ensure!(volume >= 0.0, "[{ticker}] negative volume on {}", self.timestamp);

        Ok(PriceBar {
            date: self.timestamp,
            open: self.open.unwrap_or(close),
            high: self.high.unwrap_or(close),
            low: self.low.unwrap_or(close),
            close,
            volume: volume.round() as u64,
            symbol: self.symbol.unwrap_or_else(|| ticker.to_string()),
        })
    }
}
