//! # Roles & Permissions
//!
//! Every user carries an explicit allow-list of permission strings; a check
//! is plain membership. Roles only decide the default list.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ Permission       │ Gates                                                │
//! ├──────────────────┼──────────────────────────────────────────────────────┤
//! │ tickets.view     │ list tickets, client visits, catalog                 │
//! │ tickets.create   │ issue a ticket                                       │
//! │ tickets.edit     │ reserved for ticket corrections                      │
//! │ metrics.view     │ daily/weekly/monthly metrics, dashboard, expenses    │
//! │ inventory.view   │ list stock, low-stock report                         │
//! │ inventory.edit   │ add/update/delete stock items                        │
//! │ orders.view      │ pickup search                                        │
//! │ users.manage     │ list/add users, grant permissions                    │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```
//!
//! Password hashing lives in `ohana-db`; this module only sees the hash as
//! an opaque string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Role
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Permission list a new user of this role starts with.
    pub fn default_permissions(&self) -> Vec<Permission> {
        match self {
            Role::Admin => Permission::ALL.to_vec(),
            Role::Staff => vec![Permission::TicketsView, Permission::TicketsCreate],
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "staff".to_string()],
            }),
        }
    }
}

// =============================================================================
// Permission
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Permission {
    #[serde(rename = "tickets.view")]
    TicketsView,
    #[serde(rename = "tickets.create")]
    TicketsCreate,
    #[serde(rename = "tickets.edit")]
    TicketsEdit,
    #[serde(rename = "metrics.view")]
    MetricsView,
    #[serde(rename = "inventory.view")]
    InventoryView,
    #[serde(rename = "inventory.edit")]
    InventoryEdit,
    #[serde(rename = "orders.view")]
    OrdersView,
    #[serde(rename = "users.manage")]
    UsersManage,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::TicketsView,
        Permission::TicketsCreate,
        Permission::TicketsEdit,
        Permission::MetricsView,
        Permission::InventoryView,
        Permission::InventoryEdit,
        Permission::OrdersView,
        Permission::UsersManage,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::TicketsView => "tickets.view",
            Permission::TicketsCreate => "tickets.create",
            Permission::TicketsEdit => "tickets.edit",
            Permission::MetricsView => "metrics.view",
            Permission::InventoryView => "inventory.view",
            Permission::InventoryEdit => "inventory.edit",
            Permission::OrdersView => "orders.view",
            Permission::UsersManage => "users.manage",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "permission".to_string(),
                allowed: Permission::ALL.iter().map(|p| p.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// User
// =============================================================================

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl User {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// The account as it is kept in the session slot (no hash).
    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
        }
    }
}

/// The logged-in user, as kept under the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl SessionUser {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Errors with `PermissionDenied` unless the permission is granted.
    pub fn require(&self, permission: Permission) -> CoreResult<()> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                username: self.username.clone(),
                permission,
            })
        }
    }
}

/// Checks an optional session; `None` means nobody is logged in.
pub fn authorize(session: Option<&SessionUser>, permission: Permission) -> CoreResult<&SessionUser> {
    let user = session.ok_or(CoreError::NotAuthenticated)?;
    user.require(permission)?;
    Ok(user)
}

/// Sorts and de-duplicates a permission list.
pub fn normalize_permissions(mut permissions: Vec<Permission>) -> Vec<Permission> {
    permissions.sort();
    permissions.dedup();
    permissions
}

/// Seed accounts created the first time the user list is read:
/// `(username, role)`. Each starts with its username as password.
pub const DEFAULT_ACCOUNTS: [(&str, Role); 4] = [
    ("admin1", Role::Admin),
    ("admin2", Role::Admin),
    ("admin3", Role::Admin),
    ("staff1", Role::Staff),
];

// =============================================================================
// Unit Tests
// =============================================================================
