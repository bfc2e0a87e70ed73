//! Shared helpers: an app wired to a fresh in-memory store, plus the
//! register/login/befriend plumbing most scenarios start from.

#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::{AppState, Metrics};
use auth_adapters::{Argon2Hasher, JwtAuthority};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use domains::{
    ContentRepo, CredentialHasher, FriendRequestRepo, Role, TokenAuthority, User, UserRepo,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use services::{AccessGate, ContentService, FriendService, UserService};
use storage_adapters::MemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

/// Builds `/api/content/{title}/{leaf}` with spaces percent-encoded; titles
/// like "Super Cool Title" are legal but need encoding inside a URI.
pub fn title_path(title: &str, leaf: &str) -> String {
    format!("/api/content/{}/{leaf}", title.replace(' ', "%20"))
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let user_repo: Arc<dyn UserRepo> = store.clone();
    let request_repo: Arc<dyn FriendRequestRepo> = store.clone();
    let content_repo: Arc<dyn ContentRepo> = store.clone();

    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new());
    let tokens: Arc<dyn TokenAuthority> = Arc::new(JwtAuthority::new(
        &SecretString::from("integration-test-secret"),
        900,
        86_400,
    ));

    let access = AccessGate::new(user_repo.clone());
    let state = AppState {
        users: UserService::new(user_repo.clone(), hasher),
        friends: FriendService::new(user_repo.clone(), request_repo),
        content: ContentService::new(content_repo, access),
        tokens,
        user_repo,
        metrics: Arc::new(Metrics::new()),
    };
    TestApp {
        router: api_adapters::router(state),
        store,
    }
}

impl TestApp {
    /// Sends one request and decodes the JSON body (Null when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// Registers a user with the stock test profile.
    pub async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            None,
            json!({
                "first_name": "John",
                "last_name": "Doe",
                "username": username,
                "email": email,
                "password": "secret",
                "date_of_birth": "1990-02-14",
            }),
        )
        .await
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({"username": username, "password": "secret"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access"].as_str().unwrap().to_string()
    }

    pub async fn register_and_login(&self, username: &str, email: &str) -> String {
        let (status, body) = self.register(username, email).await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        self.login(username).await
    }

    /// Full request/accept handshake; afterwards the two users are friends.
    pub async fn befriend(&self, requestor_token: &str, requestee_token: &str, requestee: &str) {
        let (status, _) = self
            .post(
                "/api/friends/request",
                Some(requestor_token),
                json!({"requestee": requestee}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, requests) = self
            .get("/api/friends/requests", Some(requestee_token))
            .await;
        assert_eq!(status, StatusCode::OK);
        let id = requests[0]["id"].as_str().unwrap().to_string();

        let (status, _) = self
            .put(
                &format!("/api/friends/requests/{id}"),
                Some(requestee_token),
                json!({"status": "accepted"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Posts content with the given title and returns the response body.
    pub async fn create_content(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/content",
                Some(token),
                json!({
                    "title": title,
                    "description": "this is the best description in the world",
                    "media": "content/2023/02/16/cool.jpg",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "content creation failed: {body}");
        body
    }

    /// Seeds an admin straight into the store; registration can't create one.
    pub async fn seed_admin(&self, username: &str) -> String {
        let hasher = Argon2Hasher::new();
        let admin = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@localhost"),
            password_hash: hasher.hash("secret").unwrap(),
            role: Role::Admin,
            first_name: "Site".to_string(),
            last_name: "Admin".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            created_at: Utc::now(),
        };
        UserRepo::create(self.store.as_ref(), admin).await.unwrap();
        self.login(username).await
    }
}
