//! JSON API over the dashboard: chart and heatmap figures, the ticker catalog and a health
//! check, documented with OpenAPI.
pub mod api;
pub mod server;
pub mod state;

pub use server::run;
pub use state::Dashboard;
