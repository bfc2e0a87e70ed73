//! # seed
//!
//! Provisions the admin account. This is the only path in the system that
//! creates a user with the admin role; registration never does.
//!
//! ```sh
//! SEED_ADMIN_PASSWORD=... cargo run -p seed
//! ```

use std::env;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use domains::{CredentialHasher, Role, User, UserRepo};
use uuid::Uuid;

use auth_adapters::Argon2Hasher;
use storage_adapters::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let settings = configs::load().context("failed to load configuration")?;

    let username = env::var("SEED_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
    let password = env::var("SEED_ADMIN_PASSWORD")
        .context("SEED_ADMIN_PASSWORD must be set; refusing to seed a guessable admin")?;

    let store = PgStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("failed to connect to Postgres")?;
    store.migrate().await.context("failed to run migrations")?;

    if store.find_by_username(&username).await?.is_some() {
        tracing::info!(%username, "admin account already present; nothing to do");
        return Ok(());
    }

    let hasher = Argon2Hasher::new();
    let admin = User {
        id: Uuid::new_v4(),
        username: username.clone(),
        email,
        password_hash: hasher.hash(&password)?,
        role: Role::Admin,
        first_name: "Site".to_string(),
        last_name: "Admin".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date"),
        created_at: Utc::now(),
    };
    UserRepo::create(&store, admin).await?;
    tracing::info!(%username, "admin account created");
    Ok(())
}
