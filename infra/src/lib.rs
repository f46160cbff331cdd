//! # Infrastructure Layer
//!
//! This crate wires the Tessera token service to its production
//! collaborators. It provides:
//! - **Cache**: Redis client and the Redis-backed session store
//! - **Telemetry**: tracing subscriber setup from the logging configuration
//! - **Startup**: configuration loading, fail-fast key loading and service assembly

use std::sync::Arc;

use config::{Config, File};
use tracing::{info, warn};

use ts_core::errors::DomainError;
use ts_core::services::{ClaimCodec, KeyManager, TokenService, TokenServiceConfig};
use ts_shared::config::AppConfig;

/// Cache module - Redis client and session store
pub mod cache;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

use cache::{RedisClient, RedisSessionStore};

/// Prefix of structured environment overrides (`TESSERA__JWT__ISSUER=...`)
const ENV_OVERRIDE_PREFIX: &str = "TESSERA";

/// Token service running against Redis
pub type RedisTokenService = TokenService<RedisSessionStore>;

/// Services assembled at startup
#[derive(Clone)]
pub struct AuthServices {
    /// Effective configuration
    pub config: AppConfig,
    /// Token lifecycle service
    pub token_service: Arc<RedisTokenService>,
    /// Shared Redis client
    pub redis: RedisClient,
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads `.env` and the layered configuration
/// - Installs the tracing subscriber
/// - Loads the signing keys, failing fast on bad key material
/// - Connects to Redis
/// - Builds the token service
pub async fn initialize() -> Result<AuthServices, InfrastructureError> {
    let config = load_config()?;

    if let Err(e) = telemetry::init_tracing(&config.logging) {
        // A subscriber installed by the host binary takes precedence
        warn!("Keeping existing tracing subscriber: {}", e);
    }

    info!(environment = %config.environment, "Initializing infrastructure services...");

    let keys = KeyManager::from_config(&config.jwt)?;
    let codec = ClaimCodec::from_config(keys, &config.jwt);

    let redis = RedisClient::new(config.cache.clone()).await?;
    if !redis.health_check().await? {
        return Err(InfrastructureError::Config(
            "Redis answered PING with an unexpected reply".to_string(),
        ));
    }

    let service_config = TokenServiceConfig::from_settings(&config.jwt, &config.session)?;
    let token_service = TokenService::new(
        codec,
        RedisSessionStore::new(redis.clone()),
        service_config,
    )?;

    info!("Infrastructure services initialized successfully");

    Ok(AuthServices {
        config,
        token_service: Arc::new(token_service),
        redis,
    })
}

/// Load the application configuration
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults and the plain variables (`JWT_SIGN_ALGO`, `REDIS_URL`, ...)
/// 2. The optional per-environment file (`config.<environment>.toml`)
/// 3. Structured overrides such as `TESSERA__JWT__LEEWAY=5`
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let base = AppConfig::from_env();
    let file = base.environment.config_file().to_string();

    Config::builder()
        .add_source(Config::try_from(&base)?)
        .add_source(File::with_name(&file).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_OVERRIDE_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
        .map_err(InfrastructureError::from)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Redis did not answer in time
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key material or service construction rejected by the domain
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<config::ConfigError> for InfrastructureError {
    fn from(err: config::ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}
