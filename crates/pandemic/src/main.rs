use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*};
use dotenv::dotenv;
use log::{debug, info, trace, LevelFilter};
use pandemic_core::config::DashboardConfig;
use pandemic_store::store::{CouchStore, DataStore, MemoryStore};
use pandemic_web::api::dashboard::{ChartResponse, HeatmapResponse, TickerInfo};
use pandemic_web::Dashboard;
use std::path::Path;
use std::sync::Arc;

mod cli;

/// `.env` first, then logging at `level` (`RUST_LOG` still wins).
fn preprocess(level: LevelFilter) {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn open_store(fixtures: Option<&Path>) -> Result<Arc<dyn DataStore>> {
    match fixtures {
        Some(dir) => {
            info!("reading fixtures from {}", dir.display());
            Ok(Arc::new(MemoryStore::open(dir).await?))
        }
        None => {
            let store = CouchStore::from_env()?;
            info!("reading from CouchDB at {}", store.url());
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preprocess(cli.trace.into());
    trace!("Command line input recorded: {cli:#?}");

    let config = DashboardConfig::default();

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> pandemic <COMMAND>"
    match cli.command {
        // "> pandemic tickers"
        Tickers => {
            let tickers: Vec<TickerInfo> = config
                .catalog
                .iter()
                .map(|entry| TickerInfo {
                    ticker: entry.ticker.clone(),
                    name: entry.name.clone(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&tickers)?);
        }

        // "> pandemic chart [TICKERS] [--colorblind]"
        Chart {
            tickers,
            colorblind,
        } => {
            let store = open_store(cli.fixtures.as_deref()).await?;
            let chart = Dashboard::new(store, config).chart(tickers.as_slice(), colorblind).await;
            debug!("charted {:?} up to {}", chart.tickers, chart.cutoff);
            let response = ChartResponse {
                tickers: chart.tickers,
                cutoff: chart.cutoff,
                figure: chart.figure,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        // "> pandemic heatmap [--date YYYY-MM-DD] [--colorblind]"
        Heatmap { date, colorblind } => {
            let store = open_store(cli.fixtures.as_deref()).await?;
            let heatmap = Dashboard::new(store, config)
                .heatmap(date.as_deref(), colorblind)
                .await;
            let response = HeatmapResponse {
                date: heatmap.date,
                figure: heatmap.figure,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        // "> pandemic serve [--host] [--port]"
        Serve { host, port } => {
            let store = open_store(cli.fixtures.as_deref()).await?;
            pandemic_web::run(Dashboard::new(store, config), &host, port).await?;
        }
    }

    Ok(())
}
