//! The visibility predicate, checked exhaustively, and the async gate over a
//! real store.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use domains::{
    DomainError, FriendRequest, FriendRequestRepo, RequestDecision, RequestStatus, Role, User,
    UserRepo,
};
use services::{permits, AccessGate};
use storage_adapters::MemoryStore;
use uuid::Uuid;

fn user(name: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password_hash: "opaque".to_string(),
        role,
        first_name: name.to_string(),
        last_name: "Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 2, 14).unwrap(),
        created_at: Utc::now(),
    }
}

/// Materializes a friendship edge the only way the system allows: an
/// accepted friend request.
async fn befriend(store: &MemoryStore, a: &User, b: &User) {
    let request = FriendRequestRepo::create(
        store,
        FriendRequest {
            id: Uuid::new_v4(),
            requestor: a.id,
            requestee: b.id,
            status: RequestStatus::Active,
            created_at: Utc::now(),
        },
    )
    .await
    .unwrap();
    store
        .finalize(request.id, RequestDecision::Accepted)
        .await
        .unwrap();
}

/// `permits` must equal `admin || self || friends` over every friendship
/// graph on a small user set. Four users give 6 undirected pairs, so all
/// 64 edge subsets are checked against all ordered (actor, owner) pairs.
#[tokio::test]
async fn predicate_holds_over_every_graph_on_four_users() {
    let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let pairs: Vec<(usize, usize)> = (0..4)
        .flat_map(|i| ((i + 1)..4).map(move |j| (i, j)))
        .collect();

    for mask in 0u32..(1 << pairs.len()) {
        let mut edges: HashSet<(Uuid, Uuid)> = HashSet::new();
        for (bit, &(i, j)) in pairs.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                edges.insert((ids[i], ids[j]));
                edges.insert((ids[j], ids[i]));
            }
        }

        for &actor in &ids {
            for &owner in &ids {
                let friends = edges.contains(&(actor, owner));
                for role in [Role::Regular, Role::Admin] {
                    let expected = role.is_admin() || actor == owner || friends;
                    assert_eq!(
                        permits(role, actor, owner, friends),
                        expected,
                        "mask {mask:#b}, role {role}"
                    );
                }
            }
        }
    }
}

#[tokio::test]
async fn the_gate_resolves_friendship_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    let jdoe = UserRepo::create(store.as_ref(), user("jdoe", Role::Regular))
        .await
        .unwrap();
    let bfriend = UserRepo::create(store.as_ref(), user("bfriend", Role::Regular))
        .await
        .unwrap();
    let jdoe2 = UserRepo::create(store.as_ref(), user("jdoe2", Role::Regular))
        .await
        .unwrap();
    let admin = UserRepo::create(store.as_ref(), user("siteadmin", Role::Admin))
        .await
        .unwrap();
    befriend(store.as_ref(), &jdoe, &bfriend).await;

    let gate = AccessGate::new(store.clone() as Arc<dyn UserRepo>);

    // Self, friend (both directions), admin: allowed.
    gate.check(&jdoe, jdoe.id).await.unwrap();
    gate.check(&jdoe, bfriend.id).await.unwrap();
    gate.check(&bfriend, jdoe.id).await.unwrap();
    gate.check(&admin, jdoe2.id).await.unwrap();

    // Stranger: forbidden, in both directions.
    assert!(matches!(
        gate.check(&jdoe, jdoe2.id).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        gate.check(&jdoe2, jdoe.id).await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn a_missing_owner_is_not_found_rather_than_denied() {
    let store = Arc::new(MemoryStore::new());
    let jdoe = UserRepo::create(store.as_ref(), user("jdoe", Role::Regular))
        .await
        .unwrap();
    let gate = AccessGate::new(store as Arc<dyn UserRepo>);

    assert!(matches!(
        gate.resolve_owner(&jdoe, "ghost").await,
        Err(DomainError::NotFound("user", _))
    ));
}
