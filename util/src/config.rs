//! Application configuration.
//!
//! `AppConfig` is loaded once at process start from `.env` and environment
//! variables, then handed to the server inside [`crate::state::AppState`].
//! Nothing else in the workspace reads the environment directly.

use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while reading configuration from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

const DSN_SCHEMES: [&str; 3] = ["sqlite:", "postgres://", "mysql://"];

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Shared password for the admin login.
    pub admin_password: String,
    /// Secret guarding the report and admin routes. `None` closes the gate entirely.
    pub secret_key: Option<String>,
    pub avatar_storage_root: String,
    pub max_avatar_bytes: usize,
    /// Request body cap for `POST /reports/email`, which carries a base64 PDF.
    pub max_report_email_bytes: usize,
    /// Offset from UTC, in minutes, that defines the event's calendar day.
    pub event_utc_offset_minutes: i32,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from_name: String,
    pub email_from_address: String,
}

impl AppConfig {
    /// Loads `.env` (if present) and builds the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let project_name = or("PROJECT_NAME", "gala-checkin");
        let smtp_username = or("SMTP_USERNAME", "");

        let event_utc_offset_minutes: i32 = parse_or(&get, "EVENT_UTC_OFFSET_MINUTES", 0)?;
        if event_utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Invalid {
                key: "EVENT_UTC_OFFSET_MINUTES",
                value: event_utc_offset_minutes.to_string(),
            });
        }

        Ok(Self {
            env: or("APP_ENV", "development"),
            log_level: or("LOG_LEVEL", "api=info,db=info"),
            log_file: or("LOG_FILE", "api.log"),
            log_to_stdout: parse_or(&get, "LOG_TO_STDOUT", false)?,
            database_path: required("DATABASE_PATH")?,
            host: or("HOST", "127.0.0.1"),
            port: parse_or(&get, "PORT", 3000)?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_duration_minutes: parse_or(&get, "JWT_DURATION_MINUTES", 24 * 60)?,
            admin_password: required("ADMIN_PASSWORD")?,
            secret_key: get("SECRET_KEY"),
            avatar_storage_root: or("AVATAR_STORAGE_ROOT", "data/avatars"),
            max_avatar_bytes: parse_or(&get, "MAX_AVATAR_BYTES", 5 * 1024 * 1024)?,
            max_report_email_bytes: parse_or(&get, "MAX_REPORT_EMAIL_BYTES", 25 * 1024 * 1024)?,
            event_utc_offset_minutes,
            smtp_host: or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: parse_or(&get, "SMTP_PORT", 587)?,
            smtp_password: or("SMTP_PASSWORD", ""),
            email_from_name: get("EMAIL_FROM_NAME").unwrap_or_else(|| project_name.clone()),
            email_from_address: get("EMAIL_FROM_ADDRESS").unwrap_or_else(|| smtp_username.clone()),
            smtp_username,
            project_name,
        })
    }

    /// Connection URL for `DATABASE_PATH`.
    ///
    /// A value that is already a DSN is used as is; a plain path becomes a
    /// read-write-create SQLite URL.
    pub fn database_url(&self) -> String {
        match self.sqlite_file_path() {
            Some(path) => format!("sqlite://{}?mode=rwc", path.display()),
            None => self.database_path.clone(),
        }
    }

    /// The SQLite file behind `DATABASE_PATH`, or `None` when it is a DSN.
    pub fn sqlite_file_path(&self) -> Option<&Path> {
        let raw = self.database_path.as_str();
        let is_dsn = DSN_SCHEMES.iter().any(|scheme| raw.starts_with(scheme));
        (!is_dsn).then(|| Path::new(raw))
    }

    /// True when enough SMTP settings exist to build a mail transport.
    pub fn email_enabled(&self) -> bool {
        !self.smtp_username.is_empty() && !self.email_from_address.is_empty()
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
