use anyhow::Context;
use clap::Parser;
use hypixelio::config::cli::{self, Cli};
use hypixelio::utils::logger::{self, LogFormat};
use hypixelio::HypixelClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, file) = match cli.client_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            logger::init(LogFormat::Compact, cli.verbose);
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let verbose = cli.verbose || file.as_ref().is_some_and(|file| file.verbose());
    let format = if file.as_ref().is_some_and(|file| file.json_logs()) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init(format, verbose);

    tracing::debug!(
        "Using {} API key(s), cache: {:?}",
        config.api_keys.len(),
        config.cache.as_ref().map(|cache| cache.backend)
    );

    let client = HypixelClient::with_config(config).context("failed to build the client")?;

    match cli::execute(&client, &cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Request failed: {}", e);
            eprintln!("❌ {}", e);
            let exit_code = if e.is_not_found() { 2 } else { 1 };
            std::process::exit(exit_code);
        }
    }
}
