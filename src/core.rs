//! Core Rowhaus functionality
//!
//! This module contains the main Rowhaus struct and its implementation,
//! providing the single shared database session and a registry of
//! per-table record gateways.

use record_gateway::{DbSession, RecordGateway, TableMeta};
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::RowhausError;
use config::{AppConfig, GatewayConfig};

/// Main Rowhaus coordinator that owns the database session and gateways
///
/// One instance per process. Every gateway opened through it shares the
/// same connection pool, and the pagination defaults from the loaded
/// configuration apply to each of them.
pub struct Rowhaus {
    session: DbSession,
    gateway_defaults: GatewayConfig,
    gateways: HashMap<String, RecordGateway>,
}

impl Rowhaus {
    /// Create a new Rowhaus with an eagerly connected pool
    ///
    /// Connecting at startup keeps a misconfigured database from surfacing
    /// later as a swallowed per-query failure.
    pub async fn new(config: AppConfig) -> Result<Self, RowhausError> {
        let database = &config.database;
        let connection_string = database.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        // Set max lifetime if specified
        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = match pool_options.connect(&connection_string).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(
                    "Database connection to {}:{}/{} failed: {}",
                    database.host,
                    database.port,
                    database.database,
                    e
                );
                return Err(e.into());
            }
        };

        Ok(Self {
            session: DbSession::new(pool),
            gateway_defaults: config.gateway,
            gateways: HashMap::new(),
        })
    }

    /// Create a new Rowhaus from the discovered configuration file
    ///
    /// Reads `.env` for a `ROWHAUS_CONFIG` path and falls back to
    /// `./rowhaus.toml`.
    pub async fn from_env() -> Result<Self, RowhausError> {
        let config = AppConfig::load()?;
        Self::new(config).await
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        self.session.pool()
    }

    /// Get the shared database session
    pub fn session(&self) -> &DbSession {
        &self.session
    }

    /// Open a gateway for a table without registering it
    pub fn open(&self, meta: TableMeta) -> RecordGateway {
        RecordGateway::with_defaults(
            self.session.clone(),
            meta,
            self.gateway_defaults.clone(),
        )
    }

    /// Open a gateway and register it under the given name
    pub fn register_gateway(&mut self, name: String, meta: TableMeta) -> Result<(), RowhausError> {
        if self.gateways.contains_key(&name) {
            return Err(RowhausError::GatewayAlreadyRegistered(name));
        }

        let gateway = self.open(meta);
        self.gateways.insert(name, gateway);
        Ok(())
    }

    /// Get a registered gateway by name
    pub fn gateway(&self, name: &str) -> Result<&RecordGateway, RowhausError> {
        self.gateways
            .get(name)
            .ok_or_else(|| RowhausError::GatewayNotFound(name.to_string()))
    }

    /// List all registered gateway names
    pub fn list_gateways(&self) -> Vec<&String> {
        self.gateways.keys().collect()
    }

    /// Remove a registered gateway by name
    pub fn unregister_gateway(&mut self, name: &str) -> Result<(), RowhausError> {
        self.gateways
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| RowhausError::GatewayNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), RowhausError> {
        self.session.ping().await?;
        Ok(())
    }

    /// Whether the database currently answers a trivial round trip
    pub async fn is_healthy(&self) -> bool {
        self.session.is_healthy().await
    }
}
