//! # In-Memory Store
//!
//! A single-process implementation of the storage ports, backing tests and
//! development runs. One `RwLock` guards the whole state so multi-map
//! operations (duplicate-request check-and-insert, accept-plus-edges) are
//! single critical sections, matching the atomicity the Postgres adapter
//! gets from transactions.
//!
//! Lookups are linear scans; the store never holds more than test- or
//! dev-sized data.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use domains::{
    Comment, Content, ContentRepo, DomainError, FriendRequest, FriendRequestRepo, Rating,
    RequestDecision, RequestStatus, Result, User, UserRepo,
};
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    /// Adjacency sets of the symmetric friendship relation. Mutated only by
    /// `add_symmetric`.
    friendships: HashMap<Uuid, HashSet<Uuid>>,
    requests: HashMap<Uuid, FriendRequest>,
    contents: HashMap<Uuid, Content>,
    comments: HashMap<Uuid, Comment>,
    ratings: HashMap<Uuid, Rating>,
}

impl State {
    fn add_symmetric(&mut self, a: Uuid, b: Uuid) {
        self.friendships.entry(a).or_default().insert(b);
        self.friendships.entry(b).or_default().insert(a);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.inner
            .read()
            .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.inner
            .write()
            .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, user: User) -> Result<User> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict("username already taken".to_string()));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(
                "email already registered".to_string(),
            ));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user.id) {
            return Err(DomainError::NotFound("user", user.id.to_string()));
        }
        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::Conflict(
                "email already registered".to_string(),
            ));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool> {
        Ok(self
            .read()?
            .friendships
            .get(&a)
            .is_some_and(|set| set.contains(&b)))
    }

    async fn friends_of(&self, id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .read()?
            .friendships
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl FriendRequestRepo for MemoryStore {
    async fn create(&self, request: FriendRequest) -> Result<FriendRequest> {
        let mut state = self.write()?;
        let duplicate = state.requests.values().any(|r| {
            r.requestor == request.requestor
                && r.requestee == request.requestee
                && r.status == RequestStatus::Active
        });
        if duplicate {
            return Err(DomainError::DuplicateRequest);
        }
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find(&self, id: Uuid) -> Result<Option<FriendRequest>> {
        Ok(self.read()?.requests.get(&id).cloned())
    }

    async fn list_active_for(&self, requestee: Uuid) -> Result<Vec<FriendRequest>> {
        let state = self.read()?;
        let mut requests: Vec<_> = state
            .requests
            .values()
            .filter(|r| r.requestee == requestee && r.status == RequestStatus::Active)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    async fn finalize(&self, id: Uuid, decision: RequestDecision) -> Result<FriendRequest> {
        let mut state = self.write()?;
        let request = state
            .requests
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound("friend request", id.to_string()))?;
        if request.status != RequestStatus::Active {
            return Err(DomainError::Conflict(
                "friend request is not active".to_string(),
            ));
        }

        let (requestor, requestee) = (request.requestor, request.requestee);
        let updated = FriendRequest {
            status: decision.into(),
            ..request
        };
        state.requests.insert(id, updated.clone());
        if decision == RequestDecision::Accepted {
            // Same write guard as the status change: no reader can observe
            // `accepted` without the edge.
            state.add_symmetric(requestor, requestee);
        }
        Ok(updated)
    }
}

#[async_trait]
impl ContentRepo for MemoryStore {
    async fn create(&self, content: Content) -> Result<Content> {
        let mut state = self.write()?;
        if state.contents.values().any(|c| c.title == content.title) {
            return Err(DomainError::Conflict(
                "content title already taken".to_string(),
            ));
        }
        state.contents.insert(content.id, content.clone());
        Ok(content)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Content>> {
        Ok(self
            .read()?
            .contents
            .values()
            .find(|c| c.title == title)
            .cloned())
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Content>> {
        let state = self.read()?;
        let mut contents: Vec<_> = state
            .contents
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect();
        contents.sort_by_key(|c| c.created_at);
        Ok(contents)
    }

    async fn add_comment(&self, comment: Comment) -> Result<Comment> {
        let mut state = self.write()?;
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.read()?.comments.get(&id).cloned())
    }

    async fn list_comments(&self, content_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.read()?;
        let mut comments: Vec<_> = state
            .comments
            .values()
            .filter(|c| c.content_id == content_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn add_rating(&self, rating: Rating) -> Result<Rating> {
        let mut state = self.write()?;
        state.ratings.insert(rating.id, rating.clone());
        Ok(rating)
    }

    async fn list_ratings(&self, content_id: Uuid) -> Result<Vec<Rating>> {
        let state = self.read()?;
        let mut ratings: Vec<_> = state
            .ratings
            .values()
            .filter(|r| r.content_id == content_id)
            .cloned()
            .collect();
        ratings.sort_by_key(|r| r.created_at);
        Ok(ratings)
    }
}
