use clap::Parser;
use nutrisight::server::ApiResponse;
use nutrisight::utils::logger;
use nutrisight::{Gateway, GatewayConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutrisight-lookup")]
#[command(about = "Resolve a barcode through the provider chain and print the result")]
struct Args {
    /// Barcode to resolve
    barcode: String,

    /// Path to TOML configuration file; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::from_env()?,
    };
    config.validate_providers()?;

    let gateway = Gateway::from_config(&config)?;

    match gateway.resolve_by_barcode(&args.barcode).await {
        Ok(resolution) => {
            let response = ApiResponse {
                message: resolution.source.success_message().to_string(),
                data: resolution.summary,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Lookup failed: {} ({:?})", e, e.kind());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(match e.kind() {
                nutrisight::utils::error::ErrorKind::NotFound => 2,
                _ => 1,
            });
        }
    }
}
