use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitesError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

impl SitesError {
    /// 給使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            SitesError::IoError(_) => "Could not read a required file".to_string(),
            SitesError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            SitesError::ConfigError { message } => format!("Configuration problem: {}", message),
            SitesError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            SitesError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            SitesError::RenderError { message } => format!("Could not render output: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, SitesError>;

/// Why a project could not be fetched. Callers on the public surface collapse
/// every variant into "not found"; the distinction exists for logging.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API responded with status {0}")]
    Status(StatusCode),

    #[error("could not decode project payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no project registered for tenant")]
    NotFound,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FetchError {
    /// True when the API answered cleanly that the tenant has no project.
    pub fn is_not_found(&self) -> bool {
        match self {
            FetchError::NotFound => true,
            FetchError::Status(status) => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}
