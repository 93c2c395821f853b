//! Conversation Store server.
//!
//! Loads configuration from the environment, connects the selected storage
//! backend once, and serves the REST API until Ctrl-C.

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use conversation_store::adapters::auth::{OidcConfig, OidcSessionValidator};
use conversation_store::adapters::http::app_router;
use conversation_store::adapters::{
    InMemoryConversationRepository, PostgresConversationRepository, RedisConversationRepository,
};
use conversation_store::application::ConversationStore;
use conversation_store::config::{AppConfig, ConfigError, StorageBackend, ValidationError};
use conversation_store::domain::foundation::AuthError;
use conversation_store::ports::ConversationRepository;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis unavailable: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis connection timed out")]
    RedisTimeout,

    #[error("Auth validator: {0}")]
    Auth(#[from] AuthError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for StartupError {
    fn from(err: ValidationError) -> Self {
        StartupError::Config(ConfigError::from(err))
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Conversation store failed");
        eprintln!("conversation-store: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let repository = connect_repository(&config).await?;
    let store = ConversationStore::new(repository);

    let validator = Arc::new(OidcSessionValidator::new(OidcConfig::from(&config.auth))?);
    let app = app_router(store, validator, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        backend = %config.storage.backend,
        environment = ?config.server.environment,
        "Conversation store listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Conversation store stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn connect_repository(
    config: &AppConfig,
) -> Result<Arc<dyn ConversationRepository>, StartupError> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or(ValidationError::MissingRequired("DATABASE__URL"))?;

            let pool = database.pool_options().connect(&database.url).await?;
            if database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }

            Ok(Arc::new(PostgresConversationRepository::new(pool)))
        }
        StorageBackend::Redis => {
            let redis_config = config
                .redis
                .as_ref()
                .ok_or(ValidationError::MissingRequired("REDIS__URL"))?;

            let client = redis::Client::open(redis_config.url.as_str())?;
            let conn = tokio::time::timeout(
                redis_config.timeout(),
                client.get_multiplexed_tokio_connection(),
            )
            .await
            .map_err(|_| StartupError::RedisTimeout)??;

            Ok(Arc::new(RedisConversationRepository::new(
                conn,
                redis_config.key_prefix.clone(),
            )))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; conversations are lost on restart");
            Ok(Arc::new(InMemoryConversationRepository::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
