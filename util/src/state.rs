//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection, the configuration loaded at startup, the
//! JWT keys derived from it and the optional outgoing mailer. Cloned into
//! every handler through Axum's `State<T>` extractor.

use crate::config::AppConfig;
use crate::mailer::Mailer;
use jsonwebtoken::{DecodingKey, EncodingKey};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    config: Arc<AppConfig>,
    jwt_encoding_key: EncodingKey,
    jwt_decoding_key: DecodingKey,
    mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    /// Creates a new `AppState` with no mailer attached.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            jwt_encoding_key: EncodingKey::from_secret(secret),
            jwt_decoding_key: DecodingKey::from_secret(secret),
            db,
            config: Arc::new(config),
            mailer: None,
        }
    }

    /// Attaches the mailer used by the report email endpoint.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.jwt_encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.jwt_decoding_key
    }

    pub fn mailer(&self) -> Option<&Arc<dyn Mailer>> {
        self.mailer.as_ref()
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
