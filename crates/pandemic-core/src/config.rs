use crate::catalog::TickerCatalog;
use chrono::NaiveDate;
use std::time::Duration;

/// Latest date any series is displayed to, unless the events end sooner.
pub const HARD_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2022, 7, 8) {
    Some(date) => date,
    None => panic!("invalid hard cutoff date"),
};

/// Tooltip line width, in characters.
pub const WRAP_WIDTH: usize = 100;

/// Immutable settings handed to every component; nothing in the crate reads globals.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub catalog: TickerCatalog,
    /// Used when a request selects no (known) tickers.
    pub default_ticker: String,
    pub cutoff: NaiveDate,
    /// ISO 3166 alpha-3 code the infection series is filtered on.
    pub country: String,
    pub wrap_width: usize,
    pub collections: Collections,
    pub cache: CacheConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            catalog: TickerCatalog::default(),
            default_ticker: "SPY".to_string(),
            cutoff: HARD_CUTOFF,
            country: "USA".to_string(),
            wrap_width: WRAP_WIDTH,
            collections: Collections::default(),
            cache: CacheConfig::default(),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Collection names in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub events: String,
    pub infections: String,
    /// Appended to the ticker symbol, e.g. `SPY` -> `SPY_1Day`.
    pub price_suffix: String,
}

impl Collections {
    pub fn prices(&self, ticker: &str) -> String {
        format!("{ticker}{}", self.price_suffix)
    }
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            events: "covid-19_timeline".to_string(),
            infections: "covid-19_infections".to_string(),
            price_suffix: "_1Day".to_string(),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Expiry of the two memoization layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Raw documents fetched from the store.
    pub fetch_ttl: Duration,
    /// Per-ticker indexed histories behind the heatmap.
    pub heatmap_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fetch_ttl: Duration::from_secs(60 * 60),
            heatmap_ttl: Duration::from_secs(10 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_collection_is_suffixed() {
        let collections = Collections::default();
        assert_eq!(collections.prices("SPY"), "SPY_1Day");
    }

    #[test]
    fn defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.cutoff.to_string(), "2022-07-08");
        assert_eq!(config.default_ticker, "SPY");
        assert!(config.catalog.contains(&config.default_ticker));
        assert!(config.cache.heatmap_ttl < config.cache.fetch_ttl);
    }
}
