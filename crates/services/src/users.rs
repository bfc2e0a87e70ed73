//! # User Service
//!
//! Registration, credential checks for login, and friendship-gated profile
//! access. Role is always `Regular` here; admin accounts come from the seed
//! binary, never from registration.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domains::{CredentialHasher, DomainError, Result, Role, User, UserRepo};
use uuid::Uuid;

use crate::access::AccessGate;

/// Registration input. `role` is intentionally absent.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn CredentialHasher>,
    access: AccessGate,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepo>, hasher: Arc<dyn CredentialHasher>) -> Self {
        let access = AccessGate::new(users.clone());
        Self {
            users,
            hasher,
            access,
        }
    }

    /// Registers a new regular user. Duplicate username or email surfaces as
    /// `Validation`, matching the other field-level failures.
    #[tracing::instrument(skip(self, profile), fields(username = %profile.username))]
    pub async fn register(&self, profile: NewUser) -> Result<User> {
        validate_registration(&profile)?;

        let user = User {
            id: Uuid::new_v4(),
            username: profile.username,
            email: profile.email,
            password_hash: self.hasher.hash(&profile.password)?,
            role: Role::Regular,
            first_name: profile.first_name,
            last_name: profile.last_name,
            date_of_birth: profile.date_of_birth,
            created_at: Utc::now(),
        };
        let created = self
            .users
            .create(user)
            .await
            .map_err(conflict_to_validation)?;
        tracing::info!(user = %created.id, "user registered");
        Ok(created)
    }

    /// Verifies a username/password pair for token issuance. The same
    /// `Unauthenticated` error covers unknown users and bad passwords, so
    /// login failures do not reveal which usernames exist.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let rejected = || DomainError::Unauthenticated("invalid username or password".to_string());
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(rejected)?;
        if self.hasher.verify(password, &user.password_hash) {
            Ok(user)
        } else {
            Err(rejected())
        }
    }

    /// Fetches a profile, gated by ownership/friendship/admin.
    pub async fn profile(&self, actor: &User, username: &str) -> Result<User> {
        self.access.resolve_owner(actor, username).await
    }

    /// Applies a partial profile update, gated like [`Self::profile`].
    #[tracing::instrument(skip(self, actor, changes), fields(actor = %actor.username))]
    pub async fn update_profile(
        &self,
        actor: &User,
        username: &str,
        changes: ProfileUpdate,
    ) -> Result<User> {
        let mut user = self.access.resolve_owner(actor, username).await?;

        if let Some(email) = changes.email {
            validate_email(&email)?;
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            user.date_of_birth = date_of_birth;
        }

        self.users
            .update(user)
            .await
            .map_err(conflict_to_validation)
    }
}

/// The store reports uniqueness violations as `Conflict`; to callers they are
/// field validation failures like any other.
fn conflict_to_validation(err: DomainError) -> DomainError {
    match err {
        DomainError::Conflict(msg) => DomainError::Validation(msg),
        other => other,
    }
}

fn validate_registration(profile: &NewUser) -> Result<()> {
    if profile.username.trim().is_empty() || profile.username.len() > MAX_NAME_LEN {
        return Err(DomainError::Validation(
            "username must be between 1 and 150 characters".to_string(),
        ));
    }
    validate_email(&profile.email)?;
    if profile.password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    // Full RFC validation is not worth the trouble here; the store's
    // uniqueness constraint is what actually matters.
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if well_formed {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "email address is not valid".to_string(),
        ))
    }
}
