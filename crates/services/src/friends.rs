//! # Friend-Request State Machine
//!
//! `active` is the only live state; `accepted` and `rejected` are terminal.
//! Acceptance is the single code path that materializes friendship edges,
//! and the store writes status plus both edge directions in one transaction.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    DomainError, FriendRequest, FriendRequestRepo, RequestDecision, RequestStatus, Result, User,
    UserRepo,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct FriendService {
    users: Arc<dyn UserRepo>,
    requests: Arc<dyn FriendRequestRepo>,
}

impl FriendService {
    pub fn new(users: Arc<dyn UserRepo>, requests: Arc<dyn FriendRequestRepo>) -> Self {
        Self { users, requests }
    }

    /// Opens a friend request from `actor` to the named user.
    ///
    /// Fails with `NotFound` for an unknown requestee, `Validation` for a
    /// self-request, and `DuplicateRequest` when an active request for this
    /// ordered pair already exists.
    #[tracing::instrument(skip(self, actor), fields(requestor = %actor.username))]
    pub async fn request(&self, actor: &User, requestee_username: &str) -> Result<FriendRequest> {
        let requestee = self
            .users
            .find_by_username(requestee_username)
            .await?
            .ok_or_else(|| DomainError::NotFound("user", requestee_username.to_string()))?;
        if requestee.id == actor.id {
            return Err(DomainError::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }

        let request = FriendRequest {
            id: Uuid::new_v4(),
            requestor: actor.id,
            requestee: requestee.id,
            status: RequestStatus::Active,
            created_at: Utc::now(),
        };
        let created = self.requests.create(request).await?;
        tracing::info!(request = %created.id, "friend request opened");
        Ok(created)
    }

    /// Active requests addressed to the actor, oldest first.
    pub async fn list_active(&self, actor: &User) -> Result<Vec<FriendRequest>> {
        self.requests.list_active_for(actor.id).await
    }

    /// Applies the requestee's decision to an active request.
    ///
    /// Only the requestee may respond, and only while the request is active.
    /// On acceptance the symmetric friendship edge exists before this method
    /// returns.
    #[tracing::instrument(skip(self, actor), fields(responder = %actor.username))]
    pub async fn respond(
        &self,
        actor: &User,
        request_id: Uuid,
        decision: RequestDecision,
    ) -> Result<FriendRequest> {
        let request = self
            .requests
            .find(request_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("friend request", request_id.to_string()))?;

        if request.requestee != actor.id {
            return Err(DomainError::Forbidden(
                "only the requestee may respond to a friend request".to_string(),
            ));
        }
        if request.status != RequestStatus::Active {
            return Err(DomainError::Forbidden(
                "friend request has already been responded to".to_string(),
            ));
        }

        // The store re-checks `active` inside its transaction; losing that
        // race reads the same as responding to an already-finalized request.
        let finalized = self
            .requests
            .finalize(request_id, decision)
            .await
            .map_err(|err| match err {
                DomainError::Conflict(_) => DomainError::Forbidden(
                    "friend request has already been responded to".to_string(),
                ),
                other => other,
            })?;
        tracing::info!(request = %finalized.id, status = %finalized.status, "friend request finalized");
        Ok(finalized)
    }
}
