use anyhow::{anyhow, Result};
use log::{debug, trace, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;

/// Documents requested per `_find` round trip.
pub const PAGE_SIZE: usize = 1_000;

/// One page of a Mango query; see [`find_docs()`] for more.
///
/// ```json
/// {
///     "docs": [{ "_id": "...", "_rev": "...", "symbol": "SPY", ... }],
///     "bookmark": "g1AAAABweJzLY...",
///     "warning": "No matching index found, create an index to optimize query time."
/// }
/// ```
///
/// [`find_docs()`]: ./trait.ClientCouchExt.html#method.find_docs
#[derive(Deserialize, Debug, Clone)]
pub struct FindResponse {
    pub docs: Vec<Value>,
    #[serde(default)]
    pub bookmark: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

pub trait ClientCouchExt {
    /// Every document of database `db` matching the Mango `selector`.
    fn find_docs(
        &self,
        conn: &str,
        db: &str,
        selector: &Value,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;
}

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
impl ClientCouchExt for Client {
    async fn find_docs(&self, conn: &str, db: &str, selector: &Value) -> Result<Vec<Value>> {
        let url = format!("{conn}/{db}/_find");
        let mut docs = Vec::new();
        let mut bookmark: Option<String> = None;

        // page through the results with the bookmark CouchDB hands back
        loop {
            let mut body = json!({
                "selector": selector,
                "limit": PAGE_SIZE,
            });
            if let Some(bookmark) = &bookmark {
                body["bookmark"] = json!(bookmark);
            }

            trace!("POST {db}/_find, {} documents so far", docs.len());
            let response = self.post(&url).json(&body).send().await?;
            match response.status() {
                StatusCode::OK => {}

                // missing database
                StatusCode::NOT_FOUND => {
                    warn!("database {db} not found; treating it as empty");
                    return Ok(docs);
                }

                status => {
                    let text = response.text().await.unwrap_or_default();
                    return Err(anyhow!("{db}/_find answered {status}: {text}"));
                }
            }

            let page: FindResponse = response.json().await?;
            if let Some(warning) = &page.warning {
                debug!("{db}/_find: {warning}");
            }

            let fetched = page.docs.len();
            docs.extend(page.docs);
            if fetched < PAGE_SIZE {
                break;
            }
            match page.bookmark {
                Some(next) => bookmark = Some(next),
                None => break,
            }
        }

        debug!("fetched {} documents from {db}", docs.len());
        Ok(docs)
    }
}
