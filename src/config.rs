/*
 * Responsibility
 * - Read settings from the environment once at startup (.env supported)
 * - Validate them (missing or invalid -> refuse to start)
 * - Everything is read-only after this point
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Server certificate, key and the CA bundle client certificates are verified against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_filename: PathBuf,
    pub key_filename: PathBuf,
    pub client_ca_filename: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: AppEnv,
    pub service_addr: SocketAddr,
    pub status_addr: SocketAddr,

    // None => the service listener speaks plain HTTP (TLS terminated upstream)
    pub tls: Option<TlsFiles>,

    // Handed to the identity provider integration as-is
    pub account_configuration_url: Option<String>,
    pub account_configuration_check_interval: Duration,

    pub session_lifetime_hours: u32,
    // Duration::ZERO disables the expired-session sweep
    pub session_sweep_interval: Duration,

    pub identity_header: HeaderName,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let service_port: u16 = parse_or(&get, "SERVICE_PORT", 443)?;
        let status_port: u16 = parse_or(&get, "STATUS_PORT", 6930)?;

        let service_addr = SocketAddr::from_str(&format!("0.0.0.0:{}", service_port))
            .map_err(|_| ConfigError::Invalid("SERVICE_PORT"))?;
        let status_addr = SocketAddr::from_str(&format!("0.0.0.0:{}", status_port))
            .map_err(|_| ConfigError::Invalid("STATUS_PORT"))?;
        if service_port == status_port {
            return Err(ConfigError::Invalid("STATUS_PORT"));
        }

        let tls = match (
            non_empty(&get, "TLS_CERT_FILENAME"),
            non_empty(&get, "TLS_KEY_FILENAME"),
        ) {
            (Some(cert), Some(key)) => Some(TlsFiles {
                cert_filename: cert.into(),
                key_filename: key.into(),
                client_ca_filename: non_empty(&get, "TLS_CLIENT_CA_FILENAME").map(PathBuf::from),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("TLS_KEY_FILENAME")),
            (None, Some(_)) => return Err(ConfigError::Missing("TLS_CERT_FILENAME")),
        };

        let account_configuration_url = non_empty(&get, "ACCOUNT_CONFIGURATION_URL");
        let account_configuration_check_interval = Duration::from_secs(parse_or(
            &get,
            "ACCOUNT_CONFIGURATION_CHECK_INTERVAL_SECONDS",
            300,
        )?);

        let session_lifetime_hours: u32 = parse_or(&get, "SESSION_LIFETIME_HOURS", 3)?;
        if session_lifetime_hours == 0 {
            return Err(ConfigError::Invalid("SESSION_LIFETIME_HOURS"));
        }

        let session_sweep_interval =
            Duration::from_secs(parse_or(&get, "SESSION_SWEEP_INTERVAL_SECONDS", 0)?);

        let identity_header = get("IDENTITY_HEADER")
            .unwrap_or_else(|| "x-forwarded-user".to_string())
            .to_ascii_lowercase();
        let identity_header = HeaderName::from_str(identity_header.trim())
            .map_err(|_| ConfigError::Invalid("IDENTITY_HEADER"))?;

        Ok(Self {
            app_env,
            service_addr,
            status_addr,
            tls,
            account_configuration_url,
            account_configuration_check_interval,
            session_lifetime_hours,
            session_sweep_interval,
            identity_header,
        })
    }

    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_lifetime_hours))
    }
}

fn non_empty(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Unset => default. Set but unparsable => startup error, never a silent default.
fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty(get, key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
