//! # Core Ports
//!
//! Contracts every adapter must implement. Storage adapters provide the
//! repos; auth adapters provide credential hashing and token issuance.
//!
//! Atomicity requirements live at this boundary: `FriendRequestRepo::create`
//! must reject a duplicate active pair even under concurrent calls, and
//! `FriendRequestRepo::finalize` must write the status change and (on
//! acceptance) both friendship edges in a single transaction.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, Content, FriendRequest, Rating, RequestDecision, User};

/// Persistence contract for users and the symmetric friendship relation.
///
/// There is intentionally no public mutator for friendship edges: the only
/// code path that creates them is [`FriendRequestRepo::finalize`] with an
/// accepting decision.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Persists a new user. Fails with `Conflict` when the username or email
    /// is already taken (the message names the offending field).
    async fn create(&self, user: User) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Replaces the stored record for `user.id`. Fails with `NotFound` if the
    /// user does not exist and `Conflict` if a changed email collides.
    async fn update(&self, user: User) -> Result<User>;

    /// Whether a friendship edge exists between `a` and `b`. The relation is
    /// symmetric, so argument order does not matter.
    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool>;

    async fn friends_of(&self, id: Uuid) -> Result<Vec<Uuid>>;
}

/// Persistence contract for the friend-request lifecycle.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FriendRequestRepo: Send + Sync {
    /// Persists a new `active` request. Fails with `DuplicateRequest` when an
    /// active request for the same ordered (requestor, requestee) pair
    /// exists; the check-and-insert is atomic.
    async fn create(&self, request: FriendRequest) -> Result<FriendRequest>;

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>>;

    /// Active requests addressed to `requestee`, oldest first.
    async fn list_active_for(&self, requestee: Uuid) -> Result<Vec<FriendRequest>>;

    /// Moves an `active` request into a terminal state. On acceptance the
    /// symmetric friendship edge is written in the same transaction, so a
    /// reader can never observe `accepted` without the edge. Fails with
    /// `Conflict` when the request is no longer active (lost race) and
    /// `NotFound` when it does not exist.
    async fn finalize(&self, id: Uuid, decision: RequestDecision) -> Result<FriendRequest>;
}

/// Persistence contract for content and its comments and ratings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Persists new content. Fails with `Conflict` when the title is taken.
    async fn create(&self, content: Content) -> Result<Content>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Content>>;

    /// All content posted by `owner`, oldest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Content>>;

    async fn add_comment(&self, comment: Comment) -> Result<Comment>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>>;

    /// Comments on a piece of content, oldest first.
    async fn list_comments(&self, content_id: Uuid) -> Result<Vec<Comment>>;

    async fn add_rating(&self, rating: Rating) -> Result<Rating>;

    /// Ratings on a piece of content, oldest first.
    async fn list_ratings(&self, content_id: Uuid) -> Result<Vec<Rating>>;
}

/// Password hashing contract. CPU-bound and synchronous.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    /// Constant-result verification: any malformed stored hash is a mismatch,
    /// never an error.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// An access/refresh bearer-token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token issuance and verification contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenAuthority: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<TokenPair>;

    /// Verifies an access token and returns the subject user id. Fails with
    /// `Unauthenticated` for anything but a valid, unexpired access token.
    fn verify_access(&self, token: &str) -> Result<Uuid>;

    /// Exchanges a valid refresh token for a fresh pair.
    fn refresh(&self, token: &str) -> Result<TokenPair>;
}
