use crate::export::PageMode;
use crate::i18n::{Locale, UnknownLocale};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_EXPORT_PREFIX: &str = "Hasil-Tes-Tenis-Meja";

/// Distinguishes runtime behavior for different stages of the service.
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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub default_locale: Locale,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_locale = match env::var("APP_DEFAULT_LOCALE") {
            Ok(raw) => raw
                .parse::<Locale>()
                .map_err(|source| ConfigError::InvalidLocale { source })?,
            Err(_) => Locale::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            default_locale,
            export: ExportConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Document export settings. The layout width and supersampling factor are
/// fixed in [`crate::export`] so every export uses the desktop layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub filename_prefix: String,
    pub page_mode: PageMode,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            page_mode: PageMode::Paginated,
        }
    }
}

impl ExportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let filename_prefix = env::var("APP_EXPORT_PREFIX")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.filename_prefix);

        let page_mode = match env::var("APP_EXPORT_PAGINATE") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => PageMode::Paginated,
                "0" | "false" | "no" | "off" => PageMode::Continuous,
                _ => return Err(ConfigError::InvalidPageMode { value: raw }),
            },
            Err(_) => defaults.page_mode,
        };

        Ok(Self {
            filename_prefix,
            page_mode,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLocale { source: UnknownLocale },
    InvalidPageMode { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLocale { source } => {
                write!(f, "APP_DEFAULT_LOCALE is not supported: {source}")
            }
            ConfigError::InvalidPageMode { value } => {
                write!(f, "APP_EXPORT_PAGINATE must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidLocale { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::InvalidPageMode { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_DEFAULT_LOCALE",
            "APP_EXPORT_PREFIX",
            "APP_EXPORT_PAGINATE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.default_locale, Locale::Id);
        assert_eq!(config.export, ExportConfig::default());
        assert_eq!(config.export.filename_prefix, "Hasil-Tes-Tenis-Meja");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn export_settings_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DEFAULT_LOCALE", "en");
        env::set_var("APP_EXPORT_PREFIX", "Table-Tennis-Result");
        env::set_var("APP_EXPORT_PAGINATE", "false");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.export.filename_prefix, "Table-Tennis-Result");
        assert_eq!(config.export.page_mode, PageMode::Continuous);
        reset_env();
    }

    #[test]
    fn rejects_invalid_export_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_EXPORT_PAGINATE", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPageMode { .. })
        ));

        reset_env();
        env::set_var("APP_DEFAULT_LOCALE", "fr");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLocale { .. })
        ));

        reset_env();
        env::set_var("APP_EXPORT_PAGINATE", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPageMode { .. })
        ));
        reset_env();
    }
}
