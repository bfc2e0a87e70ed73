//! HTTP handlers.
//!
//! Thin orchestration only: parse the payload, hand it to a service with the
//! extracted actor, shape the response. Authorization lives in the services;
//! authentication lives in the [`CurrentUser`] extractor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{DomainError, FriendRequest};
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::payloads::*;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

// ── Auth ─────────────────────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.users.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .users
        .authenticate(&payload.username, &payload.password)
        .await?;
    let pair = state.tokens.issue(user.id)?;
    Ok(Json(pair.into()))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<TokenResponse>> {
    let pair = state.tokens.refresh(&payload.refresh)?;
    Ok(Json(pair.into()))
}

// ── Users ────────────────────────────────────────────────────────────────────

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.users.profile(&actor, &username).await?;
    Ok(Json(UserResponse::from(&user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(username): Path<String>,
    Json(payload): Json<ProfileUpdatePayload>,
) -> Result<Json<UserResponse>> {
    let user = state
        .users
        .update_profile(&actor, &username, payload.into())
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

// ── Friend requests ──────────────────────────────────────────────────────────

pub async fn request_friend(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<FriendRequestPayload>,
) -> Result<(StatusCode, Json<FriendRequestResponse>)> {
    let request = state.friends.request(&actor, &payload.requestee).await?;
    let response = render_request(&state, &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_friend_requests(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<FriendRequestResponse>>> {
    let requests = state.friends.list_active(&actor).await?;
    let mut responses = Vec::with_capacity(requests.len());
    for request in &requests {
        responses.push(render_request(&state, request).await?);
    }
    Ok(Json(responses))
}

pub async fn respond_friend_request(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondPayload>,
) -> Result<Json<FriendRequestResponse>> {
    let request = state.friends.respond(&actor, id, payload.status).await?;
    let response = render_request(&state, &request).await?;
    Ok(Json(response))
}

/// Requests render with usernames, not ids; users are never deleted, so a
/// dangling reference is a store corruption, not a caller mistake.
async fn render_request(
    state: &AppState,
    request: &FriendRequest,
) -> Result<FriendRequestResponse> {
    Ok(FriendRequestResponse {
        id: request.id,
        requestor: username_of(state, request.requestor).await?,
        requestee: username_of(state, request.requestee).await?,
        status: request.status,
        created_at: request.created_at,
    })
}

async fn username_of(state: &AppState, id: Uuid) -> Result<String> {
    state
        .user_repo
        .find_by_id(id)
        .await?
        .map(|user| user.username)
        .ok_or_else(|| DomainError::Internal(format!("dangling user reference: {id}")).into())
}

// ── Content ──────────────────────────────────────────────────────────────────

pub async fn create_content(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(payload): Json<ContentPayload>,
) -> Result<(StatusCode, Json<ContentResponse>)> {
    let content = state.content.create(&actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ContentResponse::from(&content))))
}

pub async fn list_own_content(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<ContentResponse>>> {
    let contents = state.content.list_own(&actor).await?;
    Ok(Json(contents.iter().map(ContentResponse::from).collect()))
}

pub async fn list_user_content(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(owner): Path<String>,
) -> Result<Json<Vec<ContentResponse>>> {
    let contents = state.content.list_for(&actor, &owner).await?;
    Ok(Json(contents.iter().map(ContentResponse::from).collect()))
}

// ── Comments ─────────────────────────────────────────────────────────────────

pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(title): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .content
        .comment(&actor, &title, &payload.text, payload.parent_comment)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

pub async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(title): Path<String>,
) -> Result<Json<Vec<CommentResponse>>> {
    let comments = state.content.comments(&actor, &title).await?;
    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

// ── Ratings ──────────────────────────────────────────────────────────────────

pub async fn create_rating(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(title): Path<String>,
    Json(payload): Json<RatingPayload>,
) -> Result<(StatusCode, Json<RatingResponse>)> {
    let rating = state.content.rate(&actor, &title, payload.value).await?;
    Ok((StatusCode::CREATED, Json(RatingResponse::from(&rating))))
}

pub async fn list_ratings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(title): Path<String>,
) -> Result<Json<Vec<RatingResponse>>> {
    let ratings = state.content.ratings(&actor, &title).await?;
    Ok(Json(ratings.iter().map(RatingResponse::from).collect()))
}

// ── Operational ──────────────────────────────────────────────────────────────

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> Result<String> {
    state
        .metrics
        .encode()
        .map_err(|err| DomainError::Internal(format!("metrics encoding failed: {err}")).into())
}
