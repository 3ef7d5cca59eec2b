use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, default_value = "INFO", ignore_case = true)]
    pub trace: TraceLevel,

    /// Read `<collection>.json` files from this directory instead of CouchDB ($COUCHDB_URL).
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Print the chart figure of some tickers.
    Chart {
        /// e.g. `SPY AAPL` or `SPY,AAPL`; defaults to SPY.
        #[arg(value_delimiter = ',')]
        tickers: Vec<String>,

        #[arg(long)]
        colorblind: bool,
    },

    /// Print the heatmap figure, on a date or with the latest values.
    Heatmap {
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        colorblind: bool,
    },

    /// List the tracked tickers.
    Tickers,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<TraceLevel> for LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::TRACE => LevelFilter::Trace,
            TraceLevel::DEBUG => LevelFilter::Debug,
            TraceLevel::INFO => LevelFilter::Info,
            TraceLevel::WARN => LevelFilter::Warn,
            TraceLevel::ERROR => LevelFilter::Error,
        }
    }
}
