//! Request and response bodies for the JSON API.
//!
//! Response types are deliberate subsets of the domain models: nothing
//! user-facing ever carries a password hash, and friend requests render
//! requestor/requestee as usernames rather than ids.

use chrono::{DateTime, NaiveDate, Utc};
use domains::{Comment, Content, Rating, RequestDecision, RequestStatus, Role, TokenPair, User};
use serde::{Deserialize, Serialize};
use services::{NewContent, NewUser, ProfileUpdate};
use uuid::Uuid;

// ── Auth & users ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl From<RegisterPayload> for NewUser {
    fn from(payload: RegisterPayload) -> Self {
        Self {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            date_of_birth: payload.date_of_birth,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access: pair.access,
            refresh: pair.refresh,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_of_birth: user.date_of_birth,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdatePayload {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<ProfileUpdatePayload> for ProfileUpdate {
    fn from(payload: ProfileUpdatePayload) -> Self {
        Self {
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            date_of_birth: payload.date_of_birth,
        }
    }
}

// ── Friend requests ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FriendRequestPayload {
    pub requestee: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondPayload {
    pub status: RequestDecision,
}

#[derive(Debug, Serialize)]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub requestor: String,
    pub requestee: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

// ── Content, comments, ratings ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub media: String,
}

impl From<ContentPayload> for NewContent {
    fn from(payload: ContentPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            media: payload.media,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub media: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Content> for ContentResponse {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id,
            owner: content.owner,
            title: content.title.clone(),
            description: content.description.clone(),
            media: content.media.clone(),
            created_at: content.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub text: String,
    #[serde(default)]
    pub parent_comment: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub content: Uuid,
    pub text: String,
    pub parent_comment: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            owner: comment.owner,
            content: comment.content_id,
            text: comment.text.clone(),
            parent_comment: comment.parent_comments.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingPayload {
    pub value: i32,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub content: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Rating> for RatingResponse {
    fn from(rating: &Rating) -> Self {
        Self {
            id: rating.id,
            owner: rating.owner,
            content: rating.content_id,
            value: rating.value,
            created_at: rating.created_at,
        }
    }
}
