//! ebay-crawler - Browser-driven eBay search scraper
//!
//! Collects search results into a CSV table and summarizes their prices.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ebay_crawler::commands::{CollectCommand, SummarizeCommand};
use ebay_crawler::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ebay-crawler",
    version,
    about = "Browser-driven eBay search scraper",
    long_about = "Searches eBay through a WebDriver-controlled browser, saves the results as CSV, \
                  and summarizes their prices with statistics and a histogram."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for summaries
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct CollectArgs {
    /// Search query
    #[arg(short, long)]
    query: Option<String>,

    /// Marketplace landing page
    #[arg(long)]
    base_url: Option<String>,

    /// WebDriver server URL
    #[arg(long, env = "EBAY_WEBDRIVER_URL")]
    webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Record table to write
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct SummarizeArgs {
    /// Record table to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Histogram image to write
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Histogram bin count
    #[arg(long)]
    bins: Option<usize>,

    /// Number of highest-priced records to list
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape search results into the record table
    #[command(alias = "c")]
    Collect(CollectArgs),

    /// Summarize prices from the record table
    #[command(alias = "s")]
    Summarize(SummarizeArgs),

    /// Collect, then summarize
    Run {
        #[command(flatten)]
        collect: CollectArgs,

        #[command(flatten)]
        summarize: SummarizeArgs,
    },
}

impl CollectArgs {
    fn apply(self, config: &mut Config) {
        if let Some(query) = self.query {
            config.query = query;
        }
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(url) = self.webdriver_url {
            config.webdriver_url = url;
        }
        if self.headless {
            config.headless = true;
        }
        if let Some(path) = self.output {
            config.records_path = path;
        }
    }
}

impl SummarizeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(path) = self.input {
            config.records_path = path;
        }
        if let Some(path) = self.chart {
            config.chart_path = path;
        }
        if let Some(bins) = self.bins {
            config.bins = bins;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(format) = cli.format {
        config.format = format;
    }

    match cli.command {
        Commands::Collect(args) => {
            args.apply(&mut config);
            let output = CollectCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Summarize(args) => {
            args.apply(&mut config);
            let output = SummarizeCommand::new(config).execute()?;
            println!("{}", output);
        }

        Commands::Run { collect, summarize } => {
            collect.apply(&mut config);
            summarize.apply(&mut config);

            let output = CollectCommand::new(config.clone()).execute().await?;
            println!("{}", output);

            let output = SummarizeCommand::new(config).execute()?;
            println!("{}", output);
        }
    }

    Ok(())
}
