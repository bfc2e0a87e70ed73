//! Shared application state for the axum router.

use std::sync::Arc;

use domains::{TokenAuthority, UserRepo};
use services::{ContentService, FriendService, UserService};

use crate::metrics::Metrics;

/// State shared across all handlers. Services and ports are cheap to clone;
/// everything heavyweight sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub friends: FriendService,
    pub content: ContentService,
    pub tokens: Arc<dyn TokenAuthority>,
    /// Used by the actor extractor to load the authenticated user.
    pub user_repo: Arc<dyn UserRepo>,
    pub metrics: Arc<Metrics>,
}
