//! # Domain Models
//!
//! These structs represent the core entities of circleshare.
//! Identifiers are UUID v4; timestamps are UTC.
//!
//! Friendship is deliberately NOT a field on [`User`]: it is a symmetric
//! edge relation owned by the store and mutated only when a friend request
//! is accepted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account privilege level. Registration always produces `Regular`;
/// `Admin` accounts are provisioned out of band (see `cmd/seed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Regular,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Opaque credential; produced by the `CredentialHasher` port and never
    /// serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a [`FriendRequest`]. `Active` is the only state that accepts
/// a transition; `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Active,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown request status: {other}")),
        }
    }
}

/// The requestee's verdict on an active request. Keeping this separate from
/// [`RequestStatus`] makes "finalize to active" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDecision {
    Accepted,
    Rejected,
}

impl From<RequestDecision> for RequestStatus {
    fn from(decision: RequestDecision) -> Self {
        match decision {
            RequestDecision::Accepted => Self::Accepted,
            RequestDecision::Rejected => Self::Rejected,
        }
    }
}

/// A directed friend request from `requestor` to `requestee`.
///
/// At most one `Active` request may exist per ordered (requestor, requestee)
/// pair; the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub requestor: Uuid,
    pub requestee: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// A piece of media content posted by a user. The owner is fixed at creation
/// and the title is unique store-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    /// Opaque reference to the uploaded media; resolving it is a concern of
    /// an external media collaborator.
    pub media: String,
    pub created_at: DateTime<Utc>,
}

/// A comment on a piece of content. `parent_comments` threads replies under
/// earlier comments on the same content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub owner: Uuid,
    pub content_id: Uuid,
    pub text: String,
    pub parent_comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A star rating in `[1, 5]` on a piece of content. A user may rate the same
/// content more than once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub owner: Uuid,
    pub content_id: Uuid,
    pub value: i32,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Inclusive bounds for a rating value.
    pub const MIN_VALUE: i32 = 1;
    pub const MAX_VALUE: i32 = 5;
}
