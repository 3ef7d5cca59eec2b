pub mod dashboard;

use actix_web::web;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(dashboard::tickers, dashboard::chart, dashboard::heatmap, dashboard::health),
    components(schemas(
        dashboard::TickerInfo,
        dashboard::ChartResponse,
        dashboard::HeatmapResponse,
        dashboard::Health
    )),
    info(
        title = "pandemic",
        description = "Stock indices against COVID-19 waves, as Plotly figures"
    )
)]
pub struct ApiDoc;

/// Register every endpoint; the [`Dashboard`](crate::state::Dashboard) is expected as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard::tickers)
        .service(dashboard::chart)
        .service(dashboard::heatmap)
        .service(dashboard::health);
}
