//! # dashboard
//!
//! Command-line front end for store/item unit-sales forecasts.

mod commands;
mod table;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::App;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Unit-sales forecasting dashboard", long_about = None)]
struct Cli {
    /// JSON config file; artifact paths in it are relative to the file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every forecast step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured stores
    Stores,

    /// List the items a store carries
    Items {
        #[arg(short, long)]
        store: u32,
    },

    /// Show model metadata and validation metrics
    Info,

    /// Forecast unit sales for a store/item pair
    Forecast {
        #[arg(short, long)]
        store: u32,

        #[arg(short, long)]
        item: u32,

        /// Days to forecast
        #[arg(short, long, default_value = "7")]
        days: usize,

        /// Forecast from this date (YYYY-MM-DD) instead of the last known day
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Observed days shown before the forecast
        #[arg(long, default_value = "14")]
        show_history: usize,

        /// Write the forecast CSV here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast from a past date and compare with observed sales
    Backtest {
        #[arg(short, long)]
        store: u32,

        #[arg(short, long)]
        item: u32,

        #[arg(long)]
        as_of: NaiveDate,

        #[arg(short, long, default_value = "7")]
        days: usize,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> demand_forecast::Result<String> {
    let app = App::from_config_file(cli.config.as_deref())?;

    match cli.command {
        Commands::Stores => app.stores(),
        Commands::Items { store } => app.items(store),
        Commands::Info => app.info(),
        Commands::Forecast {
            store,
            item,
            days,
            as_of,
            show_history,
            output,
        } => app.forecast(store, item, days, as_of, show_history, output.as_ref()),
        Commands::Backtest {
            store,
            item,
            as_of,
            days,
        } => app.backtest(store, item, as_of, days),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
