//! # circleshare binary
//!
//! Assembles the application from adapters selected at compile time and
//! serves the API.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{AppState, Metrics};
use domains::{ContentRepo, CredentialHasher, FriendRequestRepo, TokenAuthority, UserRepo};
use services::{AccessGate, ContentService, FriendService, UserService};

#[cfg(feature = "auth-jwt")]
use auth_adapters::JwtAuthority;
use auth_adapters::Argon2Hasher;

#[cfg(feature = "db-postgres")]
use storage_adapters::PgStore;
#[cfg(not(feature = "db-postgres"))]
use storage_adapters::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configs::load().context("failed to load configuration")?;
    init_tracing(settings.log.json);

    // 1. Storage
    #[cfg(feature = "db-postgres")]
    let store = {
        let store = PgStore::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("failed to connect to Postgres")?;
        store.migrate().await.context("failed to run migrations")?;
        Arc::new(store)
    };
    #[cfg(not(feature = "db-postgres"))]
    let store = {
        tracing::warn!("db-postgres feature disabled; using the volatile in-memory store");
        Arc::new(MemoryStore::new())
    };

    let user_repo: Arc<dyn UserRepo> = store.clone();
    let request_repo: Arc<dyn FriendRequestRepo> = store.clone();
    let content_repo: Arc<dyn ContentRepo> = store;

    // 2. Auth
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new());
    #[cfg(feature = "auth-jwt")]
    let tokens: Arc<dyn TokenAuthority> = Arc::new(JwtAuthority::new(
        &settings.auth.jwt_secret,
        settings.auth.access_ttl_secs,
        settings.auth.refresh_ttl_secs,
    ));

    // 3. Services
    let access = AccessGate::new(user_repo.clone());
    let state = AppState {
        users: UserService::new(user_repo.clone(), hasher),
        friends: FriendService::new(user_repo.clone(), request_repo),
        content: ContentService::new(content_repo, access),
        tokens,
        user_repo,
        metrics: Arc::new(Metrics::new()),
    };

    // 4. Serve
    let app = api_adapters::router(state);
    let listener =
        tokio::net::TcpListener::bind((settings.server.host.as_str(), settings.server.port))
            .await
            .context("failed to bind listener")?;
    tracing::info!(addr = %listener.local_addr()?, "circleshare listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing(json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
