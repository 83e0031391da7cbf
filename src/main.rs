use anyhow::Context;
use clap::Parser;
use nutrisight::adapters::build_http_client;
use nutrisight::server::{self, keepalive, AppState};
use nutrisight::utils::{logger, validation::Validate};
use nutrisight::{CliConfig, Gateway};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting NutriSight gateway");

    let config = match cli.load_gateway_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let gateway = Arc::new(Gateway::from_config(&config).context("building provider clients")?);

    if let Some(url) = config.server.public_url.clone() {
        let client = build_http_client(&config).context("building keep-alive client")?;
        tracing::info!(
            "🔁 Keep-alive enabled for {} every {:?}",
            url,
            config.keepalive_interval()
        );
        keepalive::spawn(client, url, config.keepalive_interval());
    }

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("🚀 Listening on {}", addr);

    let state = AppState::new(gateway, config.server.app_key.as_str());
    server::serve(listener, state).await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}
