use serde::{Deserialize, Serialize};

/// A tracked ticker and the name shown for it.
///
/// ```json
/// {
///     "ticker": "XLK",
///     "name": "Technology Sector"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TickerEntry {
    pub ticker: String,
    pub name: String,
}

/// Ordered ticker -> display name mapping.
///
/// The order is significant: it is the order of the heatmap grid, slot by slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct TickerCatalog {
    entries: Vec<TickerEntry>,
}

impl TickerCatalog {
    /// Build a catalog from `(ticker, name)` pairs; a repeated ticker keeps its first position.
    pub fn new<I, T, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, N)>,
        T: Into<String>,
        N: Into<String>,
    {
        let mut catalog = Self { entries: Vec::new() };
        for (ticker, name) in entries {
            let ticker = ticker.into();
            if catalog.contains(&ticker) {
                log::warn!("[{ticker}] appears twice in the ticker catalog; keeping the first entry");
                continue;
            }
            catalog.entries.push(TickerEntry {
                ticker,
                name: name.into(),
            });
        }
        catalog
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickerEntry> {
        self.entries.iter()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.ticker.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entries.iter().any(|entry| entry.ticker == ticker)
    }

    pub fn name(&self, ticker: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.ticker == ticker)
            .map(|entry| entry.name.as_str())
    }

    /// Display name, falling back to the ticker symbol itself.
    pub fn display_name<'a>(&'a self, ticker: &'a str) -> &'a str {
        self.name(ticker).unwrap_or(ticker)
    }
}

impl Default for TickerCatalog {
    fn default() -> Self {
        Self::new([
            ("SPY", "Overall Market (S&P 500)"),
            ("AAPL", "Apple Inc."),
            ("DIA", "Dow Jones Industrial Average"),
            ("VNQ", "Real Estate (Vanguard Real Estate ETF)"),
            ("XLE", "Energy Sector"),
            ("XLF", "Financial Sector"),
            ("XLK", "Technology Sector"),
            ("XLU", "Utilities Sector"),
            ("XLV", "Healthcare Sector"),
            ("XLY", "Consumer Discretionary Sector"),
            ("IWM", "Russell 2000 Index ETF"),
            ("QQQ", "Nasdaq-100 Index ETF"),
        ])
    }
}
