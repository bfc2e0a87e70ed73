//! Cross-crate checks on the domain model serialization contracts.

use chrono::{NaiveDate, Utc};
use domains::{Rating, RequestDecision, RequestStatus, Role, User};
use uuid::Uuid;

#[test]
fn roles_and_statuses_serialize_lowercase() {
    assert_eq!(serde_json::to_value(Role::Regular).unwrap(), "regular");
    assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
    assert_eq!(
        serde_json::to_value(RequestStatus::Active).unwrap(),
        "active"
    );
    assert_eq!(
        serde_json::to_value(RequestDecision::Accepted).unwrap(),
        "accepted"
    );
}

#[test]
fn decisions_parse_from_client_payloads() {
    let decision: RequestDecision = serde_json::from_str("\"rejected\"").unwrap();
    assert_eq!(decision, RequestDecision::Rejected);
    assert!(serde_json::from_str::<RequestDecision>("\"active\"").is_err());
}

#[test]
fn rating_bounds_are_one_to_five() {
    assert_eq!(Rating::MIN_VALUE, 1);
    assert_eq!(Rating::MAX_VALUE, 5);
}

#[test]
fn user_serialization_never_includes_the_credential() {
    let user = User {
        id: Uuid::new_v4(),
        username: "jdoe".to_string(),
        email: "john.doe@gmail.com".to_string(),
        password_hash: "argon2-opaque".to_string(),
        role: Role::Regular,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 2, 14).unwrap(),
        created_at: Utc::now(),
    };
    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("argon2-opaque"));
    assert!(!json.contains("password_hash"));
}
