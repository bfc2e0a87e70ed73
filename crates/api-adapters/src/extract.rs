//! Actor extraction.
//!
//! Every gated route takes a [`CurrentUser`] argument; extraction fails with
//! 401 before the handler body runs, so services always receive a real,
//! authenticated actor.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use domains::{DomainError, User};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user behind the request's bearer token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                DomainError::Unauthenticated("missing bearer token".to_string())
            })?;

        let user_id = state.tokens.verify_access(token)?;
        let user = state
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthenticated("unknown user".to_string()))?;
        Ok(Self(user))
    }
}
