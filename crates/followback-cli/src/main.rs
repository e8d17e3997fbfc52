use std::sync::Arc;

use clap::{Parser, Subcommand};
use followback_analyzer::Analyzer;
use followback_core::AppConfig;
use followback_scraper::{default_profile_sources, default_relationship_sources, ScraperSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "followback-cli")]
#[command(about = "Find Instagram accounts that don't follow back")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one account and print the result as JSON
    Analyze {
        /// Instagram username, with or without a leading `@`
        username: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List data sources in priority order with their availability
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = followback_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { username, pretty } => run_analyze(&config, &username, pretty).await,
        Commands::Sources => run_sources(&config),
    }
}

async fn run_analyze(config: &AppConfig, username: &str, pretty: bool) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config)?;
    let result = analyzer.analyze(username).await?;
    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}

fn run_sources(config: &AppConfig) -> anyhow::Result<()> {
    let settings = ScraperSettings::from_app_config(config);
    let client = Arc::new(settings.build_client()?);

    println!("profile sources:");
    for (i, source) in default_profile_sources(Arc::clone(&client), &settings)
        .iter()
        .enumerate()
    {
        println!("  {:>2}. {:<18} {}", i + 1, source.name(), availability(source.is_available()));
    }

    println!("relationship sources:");
    for (i, source) in default_relationship_sources(client, &settings)
        .iter()
        .enumerate()
    {
        println!("  {:>2}. {:<18} {}", i + 1, source.name(), availability(source.is_available()));
    }
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable (credential not configured)"
    }
}
