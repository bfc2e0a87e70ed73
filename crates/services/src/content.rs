//! # Content, Comment and Rating Managers
//!
//! CRUD over the content aggregate, every cross-user operation gated through
//! the visibility authorizer. Ownership is always forced to the acting user;
//! a client-supplied owner is not even representable in the inputs.

use std::sync::Arc;

use chrono::Utc;
use domains::{Comment, Content, ContentRepo, DomainError, Rating, Result, User};
use uuid::Uuid;

use crate::access::AccessGate;

/// Content creation input. The owner is the acting user, period.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub title: String,
    pub description: String,
    pub media: String,
}

const MAX_TITLE_LEN: usize = 150;
const MAX_COMMENT_LEN: usize = 150;

#[derive(Clone)]
pub struct ContentService {
    contents: Arc<dyn ContentRepo>,
    access: AccessGate,
}

impl ContentService {
    pub fn new(contents: Arc<dyn ContentRepo>, access: AccessGate) -> Self {
        Self { contents, access }
    }

    /// Creates content owned by the actor. A taken title is a validation
    /// failure; titles are unique store-wide.
    #[tracing::instrument(skip(self, actor, payload), fields(owner = %actor.username, title = %payload.title))]
    pub async fn create(&self, actor: &User, payload: NewContent) -> Result<Content> {
        if payload.title.trim().is_empty() || payload.title.len() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(
                "title must be between 1 and 150 characters".to_string(),
            ));
        }
        if payload.media.trim().is_empty() {
            return Err(DomainError::Validation(
                "media reference must not be empty".to_string(),
            ));
        }

        let content = Content {
            id: Uuid::new_v4(),
            owner: actor.id,
            title: payload.title,
            description: payload.description,
            media: payload.media,
            created_at: Utc::now(),
        };
        let created = self.contents.create(content).await.map_err(|err| match err {
            DomainError::Conflict(msg) => DomainError::Validation(msg),
            other => other,
        })?;
        tracing::info!(content = %created.id, "content created");
        Ok(created)
    }

    /// The actor's own content; no gate needed.
    pub async fn list_own(&self, actor: &User) -> Result<Vec<Content>> {
        self.contents.list_by_owner(actor.id).await
    }

    /// Another user's content, visible to the owner, friends, and admins.
    pub async fn list_for(&self, actor: &User, owner_username: &str) -> Result<Vec<Content>> {
        let owner = self.access.resolve_owner(actor, owner_username).await?;
        self.contents.list_by_owner(owner.id).await
    }

    /// Comments on the named content, with an optional parent comment for
    /// threading. The parent must exist and belong to the same content.
    #[tracing::instrument(skip(self, actor, text), fields(actor = %actor.username))]
    pub async fn comment(
        &self,
        actor: &User,
        content_title: &str,
        text: &str,
        parent_comment: Option<Uuid>,
    ) -> Result<Comment> {
        let content = self.visible_content(actor, content_title).await?;

        if text.trim().is_empty() || text.len() > MAX_COMMENT_LEN {
            return Err(DomainError::Validation(
                "comment text must be between 1 and 150 characters".to_string(),
            ));
        }

        let parent_comments = match parent_comment {
            Some(parent_id) => {
                let parent = self
                    .contents
                    .find_comment(parent_id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound("comment", parent_id.to_string()))?;
                // A parent from some other content is as absent as no parent
                // at all.
                if parent.content_id != content.id {
                    return Err(DomainError::NotFound("comment", parent_id.to_string()));
                }
                vec![parent.id]
            }
            None => Vec::new(),
        };

        self.contents
            .add_comment(Comment {
                id: Uuid::new_v4(),
                owner: actor.id,
                content_id: content.id,
                text: text.to_string(),
                parent_comments,
                created_at: Utc::now(),
            })
            .await
    }

    pub async fn comments(&self, actor: &User, content_title: &str) -> Result<Vec<Comment>> {
        let content = self.visible_content(actor, content_title).await?;
        self.contents.list_comments(content.id).await
    }

    /// Rates the named content. The range check comes first: an out-of-range
    /// value fails with `Validation` regardless of who is asking about what.
    #[tracing::instrument(skip(self, actor), fields(actor = %actor.username))]
    pub async fn rate(&self, actor: &User, content_title: &str, value: i32) -> Result<Rating> {
        if !(Rating::MIN_VALUE..=Rating::MAX_VALUE).contains(&value) {
            return Err(DomainError::Validation(format!(
                "rating value must be between {} and {}",
                Rating::MIN_VALUE,
                Rating::MAX_VALUE
            )));
        }
        let content = self.visible_content(actor, content_title).await?;

        self.contents
            .add_rating(Rating {
                id: Uuid::new_v4(),
                owner: actor.id,
                content_id: content.id,
                value,
                created_at: Utc::now(),
            })
            .await
    }

    pub async fn ratings(&self, actor: &User, content_title: &str) -> Result<Vec<Rating>> {
        let content = self.visible_content(actor, content_title).await?;
        self.contents.list_ratings(content.id).await
    }

    /// Resolves content by title and checks the actor may access it.
    async fn visible_content(&self, actor: &User, title: &str) -> Result<Content> {
        let content = self
            .contents
            .find_by_title(title)
            .await?
            .ok_or_else(|| DomainError::NotFound("content", title.to_string()))?;
        self.access.check(actor, content.owner).await?;
        Ok(content)
    }
}
