//! Pretalab main entry point

use anyhow::Context;
use clap::Parser;
use pretalab_api::{start_server, AppState};
use pretalab_config::Config;
use pretalab_gemini::GeminiClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "pretalab")]
#[command(version = "0.1.0")]
#[command(about = "Task and transaction REST API with Gemini text generation", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            anyhow::bail!("failed to load configuration from {}", args.config.display());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    log::debug!("Configuration: {:?}", config);

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = pretalab_core::connect(&config.database)
            .await
            .context("failed to open the document store")?;
        let generator = GeminiClient::from_config(&config.gemini)
            .context("failed to build the Gemini client")?;
        log::info!("Gemini model: {}", config.gemini.model);

        let state = AppState::new(store, Arc::new(generator), config);
        start_server(state).await.context("server error")
    })
}
