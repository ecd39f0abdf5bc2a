//! Authenticated session persisted across reloads.
//!
//! The token and the profile live under their own storage keys, separate
//! from the cart. Logging in as a different identity clears the persisted
//! cart so one shopper's cart never leaks into another's session; a plain
//! logout leaves the cart for the next login.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::value_objects::Role;
use crate::storage::{keys, SharedStorage};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct AuthSession {
    storage: SharedStorage,
}

impl AuthSession {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(keys::TOKEN)
    }

    /// The stored profile, if any. A corrupt profile clears the whole
    /// identity rather than resurfacing on every call.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "discarding corrupt stored profile");
                self.clear_identity();
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user().is_some_and(|u| u.role == role)
    }

    pub fn can_manage(&self) -> bool {
        self.user().is_some_and(|u| u.role.can_manage())
    }

    /// Persists a fresh login, clearing the cart when the identity changed.
    pub fn store_login(&self, token: &str, user: &User) {
        let previous = self.stored_user_id();
        if previous.is_some_and(|id| id != user.id) {
            if let Err(e) = self.storage.remove(keys::CART) {
                warn!(error = %e, "failed to clear cart on identity change");
            }
        }
        if let Err(e) = self.storage.set(keys::TOKEN, token) {
            warn!(error = %e, "failed to persist token");
        }
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(keys::USER, &raw) {
                    warn!(error = %e, "failed to persist profile");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize profile"),
        }
    }

    /// Removes token and profile. The cart stays.
    pub fn clear_identity(&self) {
        if let Err(e) = self.storage.remove(keys::TOKEN) {
            warn!(error = %e, "failed to remove token");
        }
        if let Err(e) = self.storage.remove(keys::USER) {
            warn!(error = %e, "failed to remove profile");
        }
    }

    fn stored_user_id(&self) -> Option<i64> {
        let raw = self.storage.get(keys::USER)?;
        serde_json::from_str::<User>(&raw).ok().map(|u| u.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn user(id: i64) -> User {
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@example.com"),
            role: Role::Client,
        }
    }

    #[test]
    fn test_login_roundtrip() {
        let session = AuthSession::new(MemoryStorage::shared());
        assert!(!session.is_authenticated());
        session.store_login("tok-1", &user(1));
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().id, 1);
        session.clear_identity();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_identity_change_clears_cart() {
        let storage = MemoryStorage::shared();
        storage.set(keys::CART, "[]").unwrap();
        let session = AuthSession::new(storage.clone());
        session.store_login("tok-1", &user(1));
        assert!(storage.get(keys::CART).is_some());
        // same user again keeps the cart
        session.store_login("tok-2", &user(1));
        assert!(storage.get(keys::CART).is_some());
        // a different user does not inherit it
        session.store_login("tok-3", &user(2));
        assert!(storage.get(keys::CART).is_none());
    }

    #[test]
    fn test_logout_keeps_cart() {
        let storage = MemoryStorage::shared();
        storage.set(keys::CART, "[]").unwrap();
        let session = AuthSession::new(storage.clone());
        session.store_login("tok-1", &user(1));
        session.clear_identity();
        assert!(storage.get(keys::CART).is_some());
    }

    #[test]
    fn test_corrupt_profile_clears_identity() {
        let storage = MemoryStorage::shared();
        storage.set(keys::TOKEN, "tok").unwrap();
        storage.set(keys::USER, "not json").unwrap();
        let session = AuthSession::new(storage.clone());
        assert!(session.user().is_none());
        assert!(storage.get(keys::TOKEN).is_none());
    }

    #[test]
    fn test_role_checks() {
        let session = AuthSession::new(MemoryStorage::shared());
        let mut staff = user(5);
        staff.role = Role::Seller;
        session.store_login("tok", &staff);
        assert!(session.has_role(Role::Seller));
        assert!(!session.has_role(Role::Admin));
        assert!(session.can_manage());
    }
}
