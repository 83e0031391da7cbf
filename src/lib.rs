pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::Gateway;
pub use config::GatewayConfig;
pub use crate::core::{resolver::BarcodeResolver, scanner::FoodScanner};
pub use utils::error::{GatewayError, Result};
