use crate::schema::{BarDoc, EventDoc, InfectionDoc};
use crate::store::{DataStore, Filter};
use anyhow::Result;
use log::{debug, warn};
use pandemic_core::config::DashboardConfig;
use pandemic_core::model::{Dated, Event, InfectionRecord, PriceBar};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Typed reads of the three dashboard collections.
///
/// Every series comes back sorted ascending by date, the daily series with one entry per date;
/// documents that fail to decode or validate are logged and skipped. Only a failing store is an
/// error.
pub struct DataAccess<'a> {
    store: &'a dyn DataStore,
    config: &'a DashboardConfig,
}

impl<'a> DataAccess<'a> {
    pub fn new(store: &'a dyn DataStore, config: &'a DashboardConfig) -> Self {
        Self { store, config }
    }

    /// The whole timeline. Several entries may share a date; all of them are kept, in the
    /// order read, for the formatter to concatenate.
    pub async fn events(&self) -> Result<Vec<Event>> {
        let collection = &self.config.collections.events;
        let docs = self.store.find(collection, &Filter::All).await?;
        let mut events: Vec<Event> = decode::<EventDoc>(collection, docs)
            .map(Event::from)
            .collect();
        events.sort_by_key(Dated::date);
        debug!("[{collection}] {} documents", events.len());
        Ok(events)
    }

    /// Infections of the configured country.
    pub async fn infections(&self) -> Result<Vec<InfectionRecord>> {
        let collection = &self.config.collections.infections;
        let country = &self.config.country;
        let docs = self
            .store
            .find(collection, &Filter::eq("iso_code", country.as_str()))
            .await?;
        let records = decode::<InfectionDoc>(collection, docs)
            .map(|doc| doc.into_record(country))
            .collect();
        Ok(by_date(collection, records))
    }

    /// Daily bars of `ticker`, read from `{ticker}{price_suffix}`.
    pub async fn prices(&self, ticker: &str) -> Result<Vec<PriceBar>> {
        let collection = self.config.collections.prices(ticker);
        let docs = self
            .store
            .find(&collection, &Filter::eq("symbol", ticker))
            .await?;
        let bars = decode::<BarDoc>(&collection, docs)
            .filter_map(|doc| {
                doc.validate(ticker)
                    .map_err(|e| warn!("[{collection}] skipping document: {e}"))
                    .ok()
            })
            .collect();
        Ok(by_date(&collection, bars))
    }
}

fn decode<'c, T: DeserializeOwned>(
    collection: &'c str,
    docs: Vec<Value>,
) -> impl Iterator<Item = T> + 'c {
    docs.into_iter().filter_map(move |doc| {
        serde_json::from_value(doc)
            .map_err(|e| warn!("[{collection}] skipping malformed document: {e}"))
            .ok()
    })
}

/// Sort ascending; for a repeated date the first document read wins. Daily series only.
fn by_date<T: Dated>(collection: &str, mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(Dated::date);
    let before = items.len();
    items.dedup_by_key(|item| item.date());
    if items.len() < before {
        warn!(
            "[{collection}] dropped {} documents with repeated dates",
            before - items.len()
        );
    }
    debug!("[{collection}] {} documents", items.len());
    items
}
