//! # Postgres Store
//!
//! sqlx-backed implementation of the storage ports. Uniqueness invariants
//! (username, email, content title, one active request per ordered pair)
//! live in the schema; this module translates constraint violations into
//! domain errors and wraps the multi-row writes in transactions.

use std::str::FromStr;

use async_trait::async_trait;
use domains::{
    Comment, Content, ContentRepo, DomainError, FriendRequest, FriendRequestRepo, Rating,
    RequestDecision, RequestStatus, Result, Role, User, UserRepo,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a pool to `database_url`.
    #[tracing::instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(internal)?;
        tracing::debug!("database pool created");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(format!("migration failed: {e}")))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn internal(err: sqlx::Error) -> DomainError {
    DomainError::Internal(format!("database error: {err}"))
}

/// True when `err` is a violation of the named unique constraint/index.
fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation() && db.constraint() == Some(constraint))
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let role: String = row.try_get("role").map_err(internal)?;
    Ok(User {
        id: row.try_get("id").map_err(internal)?,
        username: row.try_get("username").map_err(internal)?,
        email: row.try_get("email").map_err(internal)?,
        password_hash: row.try_get("password_hash").map_err(internal)?,
        role: Role::from_str(&role).map_err(DomainError::Internal)?,
        first_name: row.try_get("first_name").map_err(internal)?,
        last_name: row.try_get("last_name").map_err(internal)?,
        date_of_birth: row.try_get("date_of_birth").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
    })
}

fn request_from_row(row: &PgRow) -> Result<FriendRequest> {
    let status: String = row.try_get("status").map_err(internal)?;
    Ok(FriendRequest {
        id: row.try_get("id").map_err(internal)?,
        requestor: row.try_get("requestor").map_err(internal)?,
        requestee: row.try_get("requestee").map_err(internal)?,
        status: RequestStatus::from_str(&status).map_err(DomainError::Internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
    })
}

fn content_from_row(row: &PgRow) -> Result<Content> {
    Ok(Content {
        id: row.try_get("id").map_err(internal)?,
        owner: row.try_get("owner_id").map_err(internal)?,
        title: row.try_get("title").map_err(internal)?,
        description: row.try_get("description").map_err(internal)?,
        media: row.try_get("media").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
    })
}

fn rating_from_row(row: &PgRow) -> Result<Rating> {
    Ok(Rating {
        id: row.try_get("id").map_err(internal)?,
        owner: row.try_get("owner_id").map_err(internal)?,
        content_id: row.try_get("content_id").map_err(internal)?,
        value: row.try_get("value").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
    })
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, user: User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, first_name, last_name, date_of_birth, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_of_birth)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if violates(&err, "users_username_key") {
                DomainError::Conflict("username already taken".to_string())
            } else if violates(&err, "users_email_key") {
                DomainError::Conflict("email already registered".to_string())
            } else {
                internal(err)
            }
        })?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| user_from_row(&row))
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| user_from_row(&row))
            .transpose()
    }

    async fn update(&self, user: User) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET email = $2, first_name = $3, last_name = $4, date_of_birth = $5 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.date_of_birth)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if violates(&err, "users_email_key") {
                DomainError::Conflict("email already registered".to_string())
            } else {
                internal(err)
            }
        })?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("user", user.id.to_string()));
        }
        Ok(user)
    }

    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool> {
        let row =
            sqlx::query("SELECT 1 AS present FROM friendships WHERE user_id = $1 AND friend_id = $2")
                .bind(a)
                .bind(b)
                .fetch_optional(&self.pool)
                .await
                .map_err(internal)?;
        Ok(row.is_some())
    }

    async fn friends_of(&self, id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT friend_id FROM friendships WHERE user_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter()
            .map(|row| row.try_get("friend_id").map_err(internal))
            .collect()
    }
}

#[async_trait]
impl FriendRequestRepo for PgStore {
    async fn create(&self, request: FriendRequest) -> Result<FriendRequest> {
        sqlx::query(
            "INSERT INTO friend_requests (id, requestor, requestee, status, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(request.id)
        .bind(request.requestor)
        .bind(request.requestee)
        .bind(request.status.to_string())
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if violates(&err, "friend_requests_active_pair_idx") {
                DomainError::DuplicateRequest
            } else {
                internal(err)
            }
        })?;
        Ok(request)
    }

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        sqlx::query("SELECT * FROM friend_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| request_from_row(&row))
            .transpose()
    }

    async fn list_active_for(&self, requestee: Uuid) -> Result<Vec<FriendRequest>> {
        let rows = sqlx::query(
            "SELECT * FROM friend_requests WHERE requestee = $1 AND status = 'active' \
             ORDER BY created_at",
        )
        .bind(requestee)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(request_from_row).collect()
    }

    /// Status change and (on acceptance) both edge directions commit
    /// together. The `status = 'active'` guard in the UPDATE makes finalize
    /// single-shot under concurrent responders.
    async fn finalize(&self, id: Uuid, decision: RequestDecision) -> Result<FriendRequest> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        let updated = sqlx::query(
            "UPDATE friend_requests SET status = $2 WHERE id = $1 AND status = 'active' \
             RETURNING *",
        )
        .bind(id)
        .bind(RequestStatus::from(decision).to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(internal)?;

        let request = match updated {
            Some(row) => request_from_row(&row)?,
            None => {
                // Distinguish a missing request from one already finalized.
                let exists = sqlx::query("SELECT 1 AS present FROM friend_requests WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(internal)?;
                return Err(match exists {
                    Some(_) => DomainError::Conflict("friend request is not active".to_string()),
                    None => DomainError::NotFound("friend request", id.to_string()),
                });
            }
        };

        if decision == RequestDecision::Accepted {
            sqlx::query(
                "INSERT INTO friendships (user_id, friend_id) VALUES ($1, $2), ($2, $1) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(request.requestor)
            .bind(request.requestee)
            .execute(&mut *tx)
            .await
            .map_err(internal)?;
        }

        tx.commit().await.map_err(internal)?;
        Ok(request)
    }
}

#[async_trait]
impl ContentRepo for PgStore {
    async fn create(&self, content: Content) -> Result<Content> {
        sqlx::query(
            "INSERT INTO contents (id, owner_id, title, description, media, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(content.id)
        .bind(content.owner)
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.media)
        .bind(content.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if violates(&err, "contents_title_key") {
                DomainError::Conflict("content title already taken".to_string())
            } else {
                internal(err)
            }
        })?;
        Ok(content)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Content>> {
        sqlx::query("SELECT * FROM contents WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| content_from_row(&row))
            .transpose()
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Content>> {
        let rows = sqlx::query("SELECT * FROM contents WHERE owner_id = $1 ORDER BY created_at")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(internal)?;
        rows.iter().map(content_from_row).collect()
    }

    async fn add_comment(&self, comment: Comment) -> Result<Comment> {
        let mut tx = self.pool.begin().await.map_err(internal)?;

        sqlx::query(
            "INSERT INTO comments (id, owner_id, content_id, body, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.owner)
        .bind(comment.content_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await
        .map_err(internal)?;

        for parent_id in &comment.parent_comments {
            sqlx::query("INSERT INTO comment_parents (comment_id, parent_id) VALUES ($1, $2)")
                .bind(comment.id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await
                .map_err(internal)?;
        }

        tx.commit().await.map_err(internal)?;
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT c.id, c.owner_id, c.content_id, c.body, c.created_at, \
                    array_remove(array_agg(p.parent_id), NULL) AS parents \
             FROM comments c \
             LEFT JOIN comment_parents p ON p.comment_id = c.id \
             WHERE c.id = $1 \
             GROUP BY c.id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;
        row.map(|row| comment_from_row(&row)).transpose()
    }

    async fn list_comments(&self, content_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT c.id, c.owner_id, c.content_id, c.body, c.created_at, \
                    array_remove(array_agg(p.parent_id), NULL) AS parents \
             FROM comments c \
             LEFT JOIN comment_parents p ON p.comment_id = c.id \
             WHERE c.content_id = $1 \
             GROUP BY c.id \
             ORDER BY c.created_at",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await
        .map_err(internal)?;
        rows.iter().map(comment_from_row).collect()
    }

    async fn add_rating(&self, rating: Rating) -> Result<Rating> {
        sqlx::query(
            "INSERT INTO ratings (id, owner_id, content_id, value, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(rating.id)
        .bind(rating.owner)
        .bind(rating.content_id)
        .bind(rating.value)
        .bind(rating.created_at)
        .execute(&self.pool)
        .await
        .map_err(internal)?;
        Ok(rating)
    }

    async fn list_ratings(&self, content_id: Uuid) -> Result<Vec<Rating>> {
        let rows =
            sqlx::query("SELECT * FROM ratings WHERE content_id = $1 ORDER BY created_at")
                .bind(content_id)
                .fetch_all(&self.pool)
                .await
                .map_err(internal)?;
        rows.iter().map(rating_from_row).collect()
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id").map_err(internal)?,
        owner: row.try_get("owner_id").map_err(internal)?,
        content_id: row.try_get("content_id").map_err(internal)?,
        text: row.try_get("body").map_err(internal)?,
        parent_comments: row.try_get("parents").map_err(internal)?,
        created_at: row.try_get("created_at").map_err(internal)?,
    })
}
