pub mod toml_config;

pub use toml_config::GatewayConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nutrisight")]
#[command(about = "Barcode and food-photo nutrition lookup gateway")]
pub struct CliConfig {
    /// Path to a TOML configuration file; environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    pub port: Option<u16>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_gateway_config(&self) -> crate::utils::error::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)?,
            None => GatewayConfig::from_env()?,
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(config)
    }
}
