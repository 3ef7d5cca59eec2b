use anyhow::Result;
use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};
use pandemic_core::prelude::*;
use pandemic_store::loader::DataAccess;
use pandemic_store::schema::common_de::parse_date_str;
use pandemic_store::store::DataStore;
use std::sync::Arc;

/// A resolved chart request.
#[derive(Debug, Clone)]
pub struct Chart {
    pub tickers: Vec<String>,
    pub cutoff: NaiveDate,
    pub figure: Figure,
}

/// A resolved heatmap request.
#[derive(Debug, Clone)]
pub struct Heatmap {
    pub date: Option<NaiveDate>,
    pub figure: Figure,
}

/// Wires the store, the caches and the figure builders together.
///
/// Raw series are memoized for `fetch_ttl`, the heatmap's indexed frame for `heatmap_ttl`.
/// A failed fetch is logged, answered with an empty series and never cached.
pub struct Dashboard {
    store: Arc<dyn DataStore>,
    config: DashboardConfig,
    events: TtlCache<Arc<Vec<Event>>>,
    infections: TtlCache<Arc<Vec<InfectionRecord>>>,
    prices: TtlCache<Arc<Vec<PriceBar>>>,
    frames: TtlCache<Arc<HeatmapFrame>>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn DataStore>, config: DashboardConfig) -> Self {
        Self {
            store,
            config,
            events: TtlCache::new(),
            infections: TtlCache::new(),
            prices: TtlCache::new(),
            frames: TtlCache::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn tickers(&self) -> &TickerCatalog {
        &self.config.catalog
    }

    fn access(&self) -> DataAccess<'_> {
        DataAccess::new(self.store.as_ref(), &self.config)
    }

    // ---------------------------------------------------------------------------------------------
    // fetches

    pub async fn events(&self) -> Arc<Vec<Event>> {
        let access = self.access();
        self.events
            .get_or_try_compute("load_events", self.config.cache.fetch_ttl, move || async move {
                access.events().await.map(Arc::new)
            })
            .await
            .unwrap_or_else(|e| {
                warn!("failed to load events: {e:#}");
                Arc::default()
            })
    }

    pub async fn infections(&self) -> Arc<Vec<InfectionRecord>> {
        let access = self.access();
        let key = TtlCache::<()>::key("load_infections", &[self.config.country.as_str()]);
        self.infections
            .get_or_try_compute(&key, self.config.cache.fetch_ttl, move || async move {
                access.infections().await.map(Arc::new)
            })
            .await
            .unwrap_or_else(|e| {
                warn!("failed to load infections: {e:#}");
                Arc::default()
            })
    }

    async fn try_prices(&self, ticker: &str) -> Result<Arc<Vec<PriceBar>>> {
        let access = self.access();
        let key = TtlCache::<()>::key("load_prices", &[ticker]);
        self.prices
            .get_or_try_compute(&key, self.config.cache.fetch_ttl, move || async move {
                access.prices(ticker).await.map(Arc::new)
            })
            .await
    }

    pub async fn prices(&self, ticker: &str) -> Arc<Vec<PriceBar>> {
        self.try_prices(ticker).await.unwrap_or_else(|e| {
            warn!("[{ticker}] failed to load prices: {e:#}");
            Arc::default()
        })
    }

    /// Everything the chart needs for `selection`, with the price series indexed.
    pub async fn snapshot(&self, selection: &[String]) -> Snapshot {
        let (events, infections, prices) = futures::join!(
            self.events(),
            self.infections(),
            join_all(selection.iter().map(|ticker| self.prices(ticker))),
        );

        Snapshot {
            events: events.as_ref().clone(),
            infections: infections.as_ref().clone(),
            prices: selection
                .iter()
                .zip(prices)
                .map(|(ticker, bars)| (ticker.clone(), normalize(&bars)))
                .collect(),
        }
    }

    /// Indexed history of the whole catalog. Only cached when every ticker loaded.
    pub async fn heatmap_frame(&self) -> Arc<HeatmapFrame> {
        let key = TtlCache::<()>::key("heatmap_frame", &[]);
        if let Some(frame) = self.frames.get(&key) {
            return frame;
        }

        let tickers: Vec<&str> = self.config.catalog.tickers().collect();
        let results = join_all(tickers.iter().map(|ticker| self.try_prices(ticker))).await;

        let mut complete = true;
        let mut loaded = Vec::with_capacity(tickers.len());
        for (ticker, result) in tickers.iter().zip(results) {
            match result {
                Ok(bars) => loaded.push((*ticker, bars)),
                Err(e) => {
                    warn!("[{ticker}] failed to load prices: {e:#}");
                    complete = false;
                }
            }
        }

        let frame = Arc::new(HeatmapFrame::from_prices(
            loaded.iter().map(|(ticker, bars)| (*ticker, bars.as_slice())),
        ));
        if complete {
            self.frames
                .insert(key, frame.clone(), self.config.cache.heatmap_ttl);
        }
        frame
    }

    // ---------------------------------------------------------------------------------------------
    // figures

    pub async fn chart<S: AsRef<str>>(&self, tickers: &[S], colorblind: bool) -> Chart {
        let builder = ChartBuilder::new(&self.config);
        let selection = builder.selection(tickers);
        let snapshot = self.snapshot(&selection).await;
        let figure = builder.build(&selection, ColorMode::from_flag(colorblind), &snapshot);
        Chart {
            cutoff: builder.cutoff(&snapshot),
            tickers: selection,
            figure,
        }
    }

    /// `date` is the hovered point of the chart; see [`hover_date`].
    pub async fn heatmap(&self, date: Option<&str>, colorblind: bool) -> Heatmap {
        let date = hover_date(date);
        let frame = self.heatmap_frame().await;
        let figure = HeatmapBuilder::new(&self.config.catalog).build(
            &frame,
            date,
            ColorMode::from_flag(colorblind),
        );
        Heatmap { date, figure }
    }

    /// Drop expired entries from every cache.
    pub fn purge_expired(&self) {
        self.events.purge_expired();
        self.infections.purge_expired();
        self.prices.purge_expired();
        self.frames.purge_expired();
        debug!("purged expired cache entries");
    }
}

/// Calendar date of a hover payload (`2020-03-16`, `2020-03-16 00:00`, `2020-03-16T00:00:00`).
///
/// Blank is no date; anything unparseable is logged and treated as no date.
pub fn hover_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
    let date = parse_date_str(raw);
    if date.is_none() {
        warn!("ignoring unparseable hover date {raw:?}");
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_dates() {
        let day = NaiveDate::from_ymd_opt(2020, 3, 16);
        assert_eq!(hover_date(Some("2020-03-16")), day);
        assert_eq!(hover_date(Some("2020-03-16T00:00:00")), day);
        assert_eq!(hover_date(Some("2020-03-16 00:00:00")), day);
        assert_eq!(hover_date(Some("2020-03-16T00:00")), day);
        assert_eq!(hover_date(Some("2020-03-16 00:00")), day);
        assert_eq!(hover_date(Some("2020-03-16 ")), day);
        assert_eq!(hover_date(Some("")), None);
        assert_eq!(hover_date(Some("yesterday")), None);
        assert_eq!(hover_date(None), None);
    }
}
