use crate::api::{self, ApiDoc};
use crate::state::Dashboard;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Serve the API, with Swagger UI under `/swagger-ui/` and Redoc under `/redoc`.
///
/// Expired cache entries are swept every `heatmap_ttl`.
pub async fn run(dashboard: Dashboard, host: &str, port: u16) -> std::io::Result<()> {
    let dashboard = web::Data::new(dashboard);

    let sweep = dashboard.clone().into_inner();
    let period = sweep.config().cache.heatmap_ttl;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            sweep.purge_expired();
        }
    });

    let openapi = ApiDoc::openapi();
    info!("serving on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(dashboard.clone())
            // api endpoints
            .configure(api::configure)
            // api documentation
            .service(Redoc::with_url("/redoc", openapi.clone()))
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()))
    })
    .bind((host, port))?
    .run()
    .await
}
