//! Reading the dashboard's collections out of CouchDB, or out of JSON fixtures.
//!
//! ```rust,ignore
//! use pandemic_store::prelude::*;
//!
//! let store = CouchStore::from_env()?;
//! let config = DashboardConfig::default();
//! let spy = DataAccess::new(&store, &config).prices("SPY").await?;
//! ```
pub mod client_ext;
pub mod loader;
pub mod schema;
pub mod store;

pub mod prelude {
    pub use crate::loader::DataAccess;
    pub use crate::store::{CouchStore, DataStore, Filter, MemoryStore};
    pub use pandemic_core::config::DashboardConfig;
}
