use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_secret, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 1169;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Process configuration, built once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub usda: UsdaConfig,
    pub nutritionix: NutritionixConfig,
    #[serde(default)]
    pub open_food_facts: OpenFoodFactsConfig,
    pub huggingface: HuggingFaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret clients send in `X-APP-KEY`; only the HTTP server needs it.
    #[serde(default)]
    pub app_key: String,
    /// Public URL pinged by the keep-alive task; disabled when absent.
    pub public_url: Option<String>,
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            app_key: String::new(),
            public_url: None,
            keepalive_interval_seconds: default_keepalive_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsdaConfig {
    #[serde(default = "default_usda_url")]
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionixConfig {
    #[serde(default = "default_nutritionix_url")]
    pub base_url: String,
    pub app_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFoodFactsConfig {
    #[serde(default = "default_off_url")]
    pub base_url: String,
    /// Open Food Facts asks every client to identify itself.
    #[serde(default = "default_off_user_agent")]
    pub user_agent: String,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: default_off_url(),
            user_agent: default_off_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    #[serde(default = "default_huggingface_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_keepalive_interval() -> u64 {
    600
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("nutrisight/{}", env!("CARGO_PKG_VERSION"))
}

fn default_usda_url() -> String {
    "https://api.nal.usda.gov/fdc/v1".to_string()
}

fn default_nutritionix_url() -> String {
    "https://trackapi.nutritionix.com/v2".to_string()
}

fn default_off_url() -> String {
    "https://world.openfoodfacts.net".to_string()
}

fn default_off_user_agent() -> String {
    format!("nutrisight/{} - (barcode lookup gateway)", env!("CARGO_PKG_VERSION"))
}

fn default_huggingface_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_model() -> String {
    "nateraw/food".to_string()
}

impl GatewayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USDA_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Build the configuration from environment variables, reading `.env` first when present.
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_err() {
            tracing::debug!("No .env file loaded");
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| GatewayError::InvalidConfigValueError {
                    field: "PORT".to_string(),
                    value: raw.clone(),
                    reason: "Port must be a number between 1 and 65535".to_string(),
                })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            server: ServerConfig {
                port,
                app_key: optional_env("APP_KEY").unwrap_or_default(),
                public_url: std::env::var("SERVER_URL").ok().filter(|v| !v.is_empty()),
                keepalive_interval_seconds: optional_env("KEEPALIVE_INTERVAL_SECONDS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_keepalive_interval),
            },
            http: HttpConfig {
                timeout_seconds: optional_env("HTTP_TIMEOUT_SECONDS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_timeout),
                user_agent: default_user_agent(),
            },
            usda: UsdaConfig {
                base_url: optional_env("USDA_BASE_URL").unwrap_or_else(default_usda_url),
                api_key: required_env("USDA_API_KEY")?,
            },
            nutritionix: NutritionixConfig {
                base_url: optional_env("NUTRITIONIX_BASE_URL")
                    .unwrap_or_else(default_nutritionix_url),
                app_id: required_env("NUTRITIONIX_APP_ID")?,
                api_key: required_env("NUTRITIONIX_API_KEY")?,
            },
            open_food_facts: OpenFoodFactsConfig {
                base_url: optional_env("OPEN_FOOD_FACTS_BASE_URL").unwrap_or_else(default_off_url),
                user_agent: default_off_user_agent(),
            },
            huggingface: HuggingFaceConfig {
                base_url: optional_env("HUGGINGFACE_BASE_URL")
                    .unwrap_or_else(default_huggingface_url),
                model: optional_env("HUGGINGFACE_MODEL").unwrap_or_else(default_model),
                api_key: required_env("HUGGINGFACE_API_KEY")?,
            },
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.server.keepalive_interval_seconds)
    }
}

fn required_env(name: &str) -> Result<String> {
    optional_env(name).ok_or_else(|| GatewayError::MissingConfigError {
        field: name.to_string(),
    })
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl GatewayConfig {
    /// Checks what the provider clients need, without the `[server]` section.
    pub fn validate_providers(&self) -> Result<()> {
        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;
        validate_non_empty_string("http.user_agent", &self.http.user_agent)?;

        validate_url("usda.base_url", &self.usda.base_url)?;
        validate_secret("usda.api_key", &self.usda.api_key)?;

        validate_url("nutritionix.base_url", &self.nutritionix.base_url)?;
        validate_secret("nutritionix.app_id", &self.nutritionix.app_id)?;
        validate_secret("nutritionix.api_key", &self.nutritionix.api_key)?;

        validate_url("open_food_facts.base_url", &self.open_food_facts.base_url)?;
        validate_non_empty_string("open_food_facts.user_agent", &self.open_food_facts.user_agent)?;

        validate_url("huggingface.base_url", &self.huggingface.base_url)?;
        validate_non_empty_string("huggingface.model", &self.huggingface.model)?;
        validate_secret("huggingface.api_key", &self.huggingface.api_key)?;

        Ok(())
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        validate_range("server.port", self.server.port, 1, u16::MAX)?;
        validate_secret("server.app_key", &self.server.app_key)?;
        if let Some(url) = &self.server.public_url {
            validate_url("server.public_url", url)?;
            validate_range(
                "server.keepalive_interval_seconds",
                self.server.keepalive_interval_seconds,
                60,
                86_400,
            )?;
        }
        self.validate_providers()?;

        tracing::info!("✅ Gateway configuration validation passed");
        Ok(())
    }
}
