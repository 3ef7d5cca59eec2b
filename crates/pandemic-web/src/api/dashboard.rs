use crate::state::Dashboard;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::NaiveDate;
use pandemic_core::figure::Figure;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

////////////////////////////////////////////////////////////////////////////////////////////////////

/// Tracked ticker and its display name
///
/// ```json
/// [
///     {
///         "ticker": "SPY",
///         "name": "Overall Market (S&P 500)"
///     },
///     ...
/// ]
/// ```
#[derive(Deserialize, Serialize, ToSchema, Debug, PartialEq)]
pub struct TickerInfo {
    pub ticker: String,
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/tickers",
    responses(
        (
            status = 200, description = "Tracked tickers, in heatmap order",
            body = [TickerInfo], content_type = "application/json",
            example = json!([
                {
                    "ticker": "SPY",
                    "name": "Overall Market (S&P 500)"
                }
            ])
        )
    )
)]
#[get("/tickers")]
pub async fn tickers(dashboard: web::Data<Dashboard>) -> impl Responder {
    let data: Vec<TickerInfo> = dashboard
        .tickers()
        .iter()
        .map(|entry| TickerInfo {
            ticker: entry.ticker.clone(),
            name: entry.name.clone(),
        })
        .collect();

    HttpResponse::Ok().json(data)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    /// Comma separated tickers, e.g. `SPY,AAPL`; falls back to `SPY`.
    pub tickers: Option<String>,
    /// Colorblind friendly palette.
    #[serde(default)]
    pub colorblind: bool,
}

impl ChartQuery {
    pub fn tickers(&self) -> Vec<&str> {
        self.tickers
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|ticker| !ticker.is_empty())
            .collect()
    }
}

/// Dual-axis chart of indexed prices, events and smoothed infections
///
/// ```json
/// {
///     "tickers": ["SPY", "AAPL"],
///     "cutoff": "2022-07-08",
///     "figure": { "data": [...], "layout": {...} }
/// }
/// ```
#[derive(Serialize, ToSchema, Debug)]
pub struct ChartResponse {
    /// Tickers actually drawn.
    pub tickers: Vec<String>,
    pub cutoff: NaiveDate,
    /// Plotly figure.
    #[schema(value_type = Object)]
    pub figure: Figure,
}

#[utoipa::path(
    get,
    path = "/chart",
    params(ChartQuery),
    responses(
        (
            status = 200, description = "Plotly figure of the selected tickers against COVID-19 cases",
            body = ChartResponse, content_type = "application/json"
        )
    )
)]
#[get("/chart")]
pub async fn chart(
    query: web::Query<ChartQuery>,
    dashboard: web::Data<Dashboard>,
) -> impl Responder {
    let chart = dashboard.chart(query.tickers().as_slice(), query.colorblind).await;

    HttpResponse::Ok().json(ChartResponse {
        tickers: chart.tickers,
        cutoff: chart.cutoff,
        figure: chart.figure,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct HeatmapQuery {
    /// Hovered date (`YYYY-MM-DD`, or an ISO datetime); latest values when absent or unparseable.
    pub date: Option<String>,
    /// Colorblind friendly scale.
    #[serde(default)]
    pub colorblind: bool,
}

/// 4x3 grid of percentage change from the base price
///
/// ```json
/// {
///     "date": "2020-03-16",
///     "figure": { "data": [{ "type": "heatmap", ... }], "layout": {...} }
/// }
/// ```
#[derive(Serialize, ToSchema, Debug)]
pub struct HeatmapResponse {
    /// Date shown, `null` for latest values.
    pub date: Option<NaiveDate>,
    /// Plotly figure.
    #[schema(value_type = Object)]
    pub figure: Figure,
}

#[utoipa::path(
    get,
    path = "/heatmap",
    params(HeatmapQuery),
    responses(
        (
            status = 200, description = "Plotly heatmap of every tracked ticker",
            body = HeatmapResponse, content_type = "application/json"
        )
    )
)]
#[get("/heatmap")]
pub async fn heatmap(
    query: web::Query<HeatmapQuery>,
    dashboard: web::Data<Dashboard>,
) -> impl Responder {
    let heatmap = dashboard
        .heatmap(query.date.as_deref(), query.colorblind)
        .await;

    HttpResponse::Ok().json(HeatmapResponse {
        date: heatmap.date,
        figure: heatmap.figure,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Serialize, ToSchema, Debug)]
pub struct Health {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = Health, example = json!({ "status": "ok" }))
    )
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(Health {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_tickers() {
        let query = ChartQuery {
            tickers: Some(" SPY, AAPL,,".to_string()),
            colorblind: false,
        };
        assert_eq!(query.tickers(), vec!["SPY", "AAPL"]);
        assert!(ChartQuery::default().tickers().is_empty());
    }
}
