use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {message}")]
    InvalidInputError { message: String },

    #[error("Not found: {message}")]
    NotFoundError { message: String },

    #[error("Upstream provider {provider} failed: {message}")]
    UpstreamError { provider: String, message: String },

    #[error("Unauthorized")]
    UnauthorizedError,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// Coarse classification used by the HTTP layer and the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Upstream,
    Unauthorized,
    Internal,
}

impl GatewayError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInputError {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError {
            message: message.into(),
        }
    }

    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInputError { .. } => ErrorKind::InvalidInput,
            Self::NotFoundError { .. } => ErrorKind::NotFound,
            Self::UpstreamError { .. } | Self::ApiError(_) => ErrorKind::Upstream,
            Self::UnauthorizedError => ErrorKind::Unauthorized,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorKind::Internal,
        }
    }

    /// Message safe to hand back to API clients.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidInputError { message } | Self::NotFoundError { message } => {
                message.clone()
            }
            Self::UpstreamError { message, .. } => message.clone(),
            Self::UnauthorizedError => "Unauthorized".to_string(),
            Self::ApiError(_) => "Failed to fetch data.".to_string(),
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Internal server error".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
