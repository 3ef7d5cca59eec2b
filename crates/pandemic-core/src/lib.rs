//! Date alignment, indexing and figure building for the COVID-19 market dashboard.
//!
//! Everything here is a pure function of its explicit inputs; memoization lives in
//! [`cache::TtlCache`] and is applied by the caller.
//!
//! ```rust
//! use pandemic_core::prelude::*;
//!
//! let config = DashboardConfig::default();
//! let chart = ChartBuilder::new(&config);
//! let selection = chart.selection(&["SPY", "AAPL"]);
//! let figure = chart.build(&selection, ColorMode::Standard, &Snapshot::default());
//! assert_eq!(figure.data.len(), 4);
//! ```
pub mod align;
pub mod cache;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod events;
pub mod figure;
pub mod heatmap;
pub mod model;
pub mod normalize;
pub mod palette;

pub mod prelude {
    pub use crate::cache::TtlCache;
    pub use crate::catalog::{TickerCatalog, TickerEntry};
    pub use crate::chart::ChartBuilder;
    pub use crate::config::{CacheConfig, Collections, DashboardConfig};
    pub use crate::figure::Figure;
    pub use crate::heatmap::{HeatmapBuilder, HeatmapFrame, HeatmapGrid};
    pub use crate::model::{Dated, Event, IndexedPriceBar, InfectionRecord, PriceBar, Snapshot};
    pub use crate::normalize::normalize;
    pub use crate::palette::ColorMode;
}
