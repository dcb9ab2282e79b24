use std::env;
use std::fmt;

use url::Url;

use crate::bills::{Session, UserType};

const DEFAULT_API_URL: &str = "http://localhost:5678";

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub user: UserConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("APP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api = ApiConfig::new(base_url, non_empty_var("APP_API_TOKEN"))?;

        let user_type = match env::var("APP_USER_TYPE") {
            Ok(raw) => UserType::parse(&raw).ok_or(ConfigError::InvalidUserType(raw))?,
            Err(_) => UserType::Employee,
        };
        let user = UserConfig {
            email: non_empty_var("APP_USER_EMAIL"),
            user_type,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api,
            user,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Location and credentials of the remote bill store.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&base_url).map_err(|source| ConfigError::InvalidApiUrl {
            value: base_url.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }
}

/// Identity of the connected user, as left behind by the login flow.
#[derive(Debug, Clone)]
pub struct UserConfig {
    pub email: Option<String>,
    pub user_type: UserType,
}

impl UserConfig {
    /// Session for the employee bill pages. Admin accounts have no bills of
    /// their own and are refused.
    pub fn session(&self) -> Result<Session, ConfigError> {
        if self.user_type == UserType::Admin {
            return Err(ConfigError::NotAnEmployee);
        }
        let email = self.email.clone().ok_or(ConfigError::MissingUserEmail)?;
        Ok(Session {
            user_type: self.user_type,
            email,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl {
        value: String,
        source: url::ParseError,
    },
    UnsupportedScheme(String),
    InvalidUserType(String),
    MissingUserEmail,
    NotAnEmployee,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl { value, .. } => {
                write!(f, "APP_API_URL '{value}' is not a valid URL")
            }
            ConfigError::UnsupportedScheme(scheme) => {
                write!(f, "APP_API_URL must use http or https, got '{scheme}'")
            }
            ConfigError::InvalidUserType(value) => {
                write!(f, "APP_USER_TYPE must be 'employee' or 'admin', got '{value}'")
            }
            ConfigError::MissingUserEmail => {
                write!(f, "no connected user: set APP_USER_EMAIL or pass --email")
            }
            ConfigError::NotAnEmployee => {
                write!(f, "bill pages are reserved to employees, APP_USER_TYPE is 'admin'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidApiUrl { source, .. } => Some(source),
            _ => None,
        }
    }
}
