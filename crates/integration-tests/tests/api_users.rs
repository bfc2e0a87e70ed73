//! Registration, login, token refresh and profile access.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn register_creates_a_regular_user() {
    let app = spawn_app();
    let (status, body) = app.register("jdoe", "john.doe@gmail.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "jdoe");
    assert_eq!(body["role"], "regular");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn usernames_are_unique() {
    let app = spawn_app();
    app.register("jdoe", "john.doe@gmail.com").await;
    let (status, body) = app.register("jdoe", "john_doe@gmail.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn emails_are_unique() {
    let app = spawn_app();
    app.register("jdoe", "john.doe@gmail.com").await;
    let (status, body) = app.register("johndoe", "john.doe@gmail.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn login_returns_an_access_and_refresh_pair() {
    let app = spawn_app();
    app.register("jdoe", "john.doe@gmail.com").await;
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "jdoe", "password": "secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
}

#[tokio::test]
async fn login_with_a_bad_password_is_unauthenticated() {
    let app = spawn_app();
    app.register("jdoe", "john.doe@gmail.com").await;
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "jdoe", "password": "wrong-secret"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn refresh_exchanges_the_refresh_token_for_a_new_pair() {
    let app = spawn_app();
    app.register("jdoe", "john.doe@gmail.com").await;
    let (_, login) = app
        .post(
            "/api/auth/login",
            None,
            json!({"username": "jdoe", "password": "secret"}),
        )
        .await;

    let (status, body) = app
        .post(
            "/api/auth/token-refresh",
            None,
            json!({"refresh": login["refresh"]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());
}

#[tokio::test]
async fn profile_is_returned_to_its_owner() {
    let app = spawn_app();
    let token = app.register_and_login("jdoe", "john.doe@gmail.com").await;

    let (status, body) = app.get("/api/user/jdoe", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "jdoe");
    assert_eq!(body["email"], "john.doe@gmail.com");
    assert_eq!(body["first_name"], "John");
    assert_eq!(body["last_name"], "Doe");
    assert_eq!(body["date_of_birth"], "1990-02-14");
}

#[tokio::test]
async fn profile_requires_authentication() {
    let app = spawn_app();
    app.register("jdoe2", "jane.doe@gmail.com").await;
    let (status, _) = app.get("/api/user/jdoe2", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_of_a_stranger_is_forbidden() {
    let app = spawn_app();
    let token = app.register_and_login("jdoe", "john.doe@gmail.com").await;
    app.register("jdoe2", "jane.doe@gmail.com").await;

    let (status, body) = app.get("/api/user/jdoe2", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn profile_of_a_friend_is_visible() {
    let app = spawn_app();
    let jdoe = app.register_and_login("jdoe", "john.doe@gmail.com").await;
    let bfriend = app
        .register_and_login("bfriend", "best.friend@gmail.com")
        .await;
    app.befriend(&jdoe, &bfriend, "bfriend").await;

    let (status, body) = app.get("/api/user/bfriend", Some(&jdoe)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bfriend");
}

#[tokio::test]
async fn profile_update_is_gated_like_reads() {
    let app = spawn_app();
    let jdoe = app.register_and_login("jdoe", "john.doe@gmail.com").await;
    app.register("jdoe2", "jane.doe@gmail.com").await;

    // Own profile: allowed.
    let (status, body) = app
        .put(
            "/api/user/jdoe",
            Some(&jdoe),
            json!({"first_name": "Johnny"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Johnny");

    // A stranger's profile: forbidden.
    let (status, _) = app
        .put(
            "/api/user/jdoe2",
            Some(&jdoe),
            json!({"first_name": "Hijacked"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let app = spawn_app();
    let token = app.register_and_login("jdoe", "john.doe@gmail.com").await;
    let (status, body) = app.get("/api/user/ghost", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
