//! # Visibility Authorizer
//!
//! One predicate decides, for any (actor, resource owner) pair, whether the
//! actor may see or touch the owner's resources. Every resource manager goes
//! through [`AccessGate`] instead of re-implementing the rules per handler.

use std::sync::Arc;

use domains::{DomainError, Result, Role, User, UserRepo};
use uuid::Uuid;

/// Pure visibility rule. True iff the actor is an admin, the owner, or a
/// friend of the owner. Total and side-effect free.
pub fn permits(actor_role: Role, actor_id: Uuid, owner_id: Uuid, friends: bool) -> bool {
    actor_role.is_admin() || actor_id == owner_id || friends
}

/// Async wrapper around [`permits`] that resolves friendship facts from the
/// identity store.
#[derive(Clone)]
pub struct AccessGate {
    users: Arc<dyn UserRepo>,
}

impl AccessGate {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    /// Ok when `actor` may access resources owned by `owner_id`, otherwise
    /// `Forbidden`. Store failures propagate; a denial is never silent.
    pub async fn check(&self, actor: &User, owner_id: Uuid) -> Result<()> {
        let friends = self.users.are_friends(actor.id, owner_id).await?;
        if permits(actor.role, actor.id, owner_id, friends) {
            Ok(())
        } else {
            tracing::debug!(actor = %actor.username, owner = %owner_id, "access denied");
            Err(DomainError::Forbidden(
                "not the owner, an admin, or a friend of the owner".to_string(),
            ))
        }
    }

    /// Looks up the owner by username and checks access in one step.
    /// A missing owner is `NotFound`, not a deny.
    pub async fn resolve_owner(&self, actor: &User, owner_username: &str) -> Result<User> {
        let owner = self
            .users
            .find_by_username(owner_username)
            .await?
            .ok_or_else(|| DomainError::NotFound("user", owner_username.to_string()))?;
        self.check(actor, owner.id).await?;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_always_pass() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(permits(Role::Regular, me, me, false));
        assert!(permits(Role::Admin, me, other, false));
    }

    #[test]
    fn strangers_need_a_friend_edge() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(!permits(Role::Regular, me, other, false));
        assert!(permits(Role::Regular, me, other, true));
    }

    /// Exhaustive truth table: the predicate must equal
    /// `admin || self || friends` for every input combination.
    #[test]
    fn permits_matches_its_specification() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        for role in [Role::Regular, Role::Admin] {
            for owner in [a, b] {
                for friends in [false, true] {
                    let expected = role.is_admin() || owner == a || friends;
                    assert_eq!(permits(role, a, owner, friends), expected);
                }
            }
        }
    }
}
