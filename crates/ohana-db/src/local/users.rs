//! # Users & Session
//!
//! Accounts live under `laundry_users`, the logged-in user under
//! `currentUser`. Passwords are stored as Argon2 PHC strings.
//!
//! ```text
//! login(username, password)
//!    │
//!    ├── find user ─────────── missing ──► InvalidCredentials
//!    ├── verify argon2 hash ── mismatch ─► InvalidCredentials
//!    └── write SessionUser to currentUser
//! ```

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use ohana_core::auth::{normalize_permissions, DEFAULT_ACCOUNTS};
use ohana_core::validation::{validate_password, validate_username};
use ohana_core::{CoreError, Permission, Role, SessionUser, User, ValidationError};
use tracing::{info, warn};
use uuid::Uuid;

use super::{keys, LocalStore};
use crate::error::{DbError, DbResult};

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored hash. A malformed hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn default_users() -> DbResult<Vec<User>> {
    DEFAULT_ACCOUNTS
        .iter()
        .enumerate()
        .map(|(i, (username, role))| {
            Ok(User {
                id: (i + 1).to_string(),
                username: username.to_string(),
                password_hash: hash_password(username)?,
                role: *role,
                permissions: role.default_permissions(),
            })
        })
        .collect()
}

impl LocalStore {
    /// Every account. The first read of an empty store seeds the defaults.
    pub fn users(&self) -> DbResult<Vec<User>> {
        if let Some(users) = self.get(keys::USERS)? {
            return Ok(users);
        }
        info!("Seeding default users");
        self.update(keys::USERS, default_users, |users: &mut Vec<User>| Ok(users.clone()))
    }

    /// Looks an account up by username (case-sensitive).
    pub fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        Ok(self.users()?.into_iter().find(|u| u.username == username))
    }

    /// Verifies credentials and opens a session.
    pub fn login(&self, username: &str, password: &str) -> DbResult<SessionUser> {
        let user = match self.find_user(username.trim())? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                warn!(username = %username, "Login rejected");
                return Err(CoreError::InvalidCredentials.into());
            }
        };

        let session = user.session();
        self.set(keys::CURRENT_USER, &session)?;
        info!(username = %session.username, "Logged in");
        Ok(session)
    }

    /// Closes the session, if any.
    pub fn logout(&self) -> DbResult<()> {
        self.remove(keys::CURRENT_USER)?;
        info!("Logged out");
        Ok(())
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> DbResult<Option<SessionUser>> {
        self.get(keys::CURRENT_USER)
    }

    /// Creates an account. `permissions` defaults to the role's list.
    pub fn add_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        permissions: Option<Vec<Permission>>,
    ) -> DbResult<User> {
        let username = username.trim();
        validate_username(username)?;
        validate_password(password)?;

        if self.find_user(username)?.is_some() {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: username.to_string(),
            }
            .into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            role,
            permissions: normalize_permissions(permissions.unwrap_or_else(|| role.default_permissions())),
        };

        let created = user.clone();
        self.update(keys::USERS, default_users, move |stored: &mut Vec<User>| {
            // Re-check under the lock
            if stored.iter().any(|u| u.username == user.username) {
                return Err(DbError::from(ValidationError::Duplicate {
                    field: "username".to_string(),
                    value: user.username.clone(),
                }));
            }
            stored.push(user);
            Ok(())
        })?;

        info!(username = %created.username, role = ?created.role, "User added");
        Ok(created)
    }

    /// Replaces a user's permission list.
    ///
    /// When the user is the one logged in, the session is refreshed too.
    pub fn update_permissions(&self, username: &str, permissions: Vec<Permission>) -> DbResult<User> {
        let permissions = normalize_permissions(permissions);
        let updated = self.update(keys::USERS, default_users, |users: &mut Vec<User>| {
            let user = users
                .iter_mut()
                .find(|u| u.username == username)
                .ok_or_else(|| DbError::from(CoreError::UserNotFound(username.to_string())))?;
            user.permissions = permissions;
            Ok(user.clone())
        })?;

        if let Some(session) = self.current_user()? {
            if session.id == updated.id {
                self.set(keys::CURRENT_USER, &updated.session())?;
            }
        }

        info!(username = %updated.username, permissions = updated.permissions.len(), "Permissions updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::tests::temp_store;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secreto1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secreto1", &hash));
        assert!(!verify_password("secreto2", &hash));
        assert!(!verify_password("secreto1", "plaintext"));
    }

    #[test]
    fn test_default_users_can_log_in() {
        let (_dir, store) = temp_store();
        let users = store.users().unwrap();
        assert_eq!(users.len(), 4);
        assert!(users.iter().all(|u| u.password_hash != u.username));

        let session = store.login("staff1", "staff1").unwrap();
        assert_eq!(session.role, Role::Staff);
        assert_eq!(store.current_user().unwrap(), Some(session));

        store.logout().unwrap();
        assert!(store.current_user().unwrap().is_none());
    }

    #[test]
    fn test_bad_credentials() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.login("admin1", "wrong"),
            Err(DbError::Core(CoreError::InvalidCredentials))
        ));
        assert!(matches!(
            store.login("ghost", "ghost"),
            Err(DbError::Core(CoreError::InvalidCredentials))
        ));
        assert!(store.current_user().unwrap().is_none());
    }

    #[test]
    fn test_add_user_rejects_duplicates() {
        let (_dir, store) = temp_store();
        let user = store.add_user("caja2", "mostrador", Role::Staff, None).unwrap();
        assert_eq!(user.permissions, vec![Permission::TicketsView, Permission::TicketsCreate]);
        assert_eq!(store.users().unwrap().len(), 5);

        let err = store.add_user("caja2", "otraclave", Role::Admin, None).unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));

        assert!(store.login("caja2", "mostrador").is_ok());
    }

    #[test]
    fn test_update_permissions_refreshes_own_session() {
        let (_dir, store) = temp_store();
        store.login("staff1", "staff1").unwrap();

        store
            .update_permissions("staff1", vec![Permission::MetricsView, Permission::TicketsView])
            .unwrap();

        let session = store.current_user().unwrap().unwrap();
        assert!(session.has_permission(Permission::MetricsView));
        assert!(!session.has_permission(Permission::TicketsCreate));

        // Someone else's change leaves the session alone
        store.update_permissions("admin2", vec![]).unwrap();
        assert_eq!(store.current_user().unwrap().unwrap().username, "staff1");

        assert!(matches!(
            store.update_permissions("ghost", vec![]),
            Err(DbError::Core(CoreError::UserNotFound(_)))
        ));
    }
}
