//! # User Commands
//!
//! Output never includes password hashes: accounts are shown the way the
//! session keeps them.

use ohana_core::{Permission, Role, SessionUser};
use tracing::info;

use crate::error::CliResult;
use crate::state::AppState;

pub fn list(state: &AppState) -> CliResult<Vec<SessionUser>> {
    state.require(Permission::UsersManage)?;
    Ok(state.local().users()?.iter().map(|u| u.session()).collect())
}

/// An empty `permissions` list gives the role's defaults.
pub fn add(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
    permissions: Vec<Permission>,
) -> CliResult<SessionUser> {
    let admin = state.require(Permission::UsersManage)?;

    let permissions = (!permissions.is_empty()).then_some(permissions);
    let user = state.local().add_user(username, password, role, permissions)?;

    info!(username = %user.username, created_by = %admin.username, "Account created");
    Ok(user.session())
}

/// Replaces the account's permission list.
pub fn grant(state: &AppState, username: &str, permissions: Vec<Permission>) -> CliResult<SessionUser> {
    state.require(Permission::UsersManage)?;
    Ok(state.local().update_permissions(username, permissions)?.session())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{local_state, login};
    use crate::error::ErrorCode;

    #[test]
    fn test_admin_manages_accounts() {
        let (_dir, state) = local_state();
        login(&state, "admin1");

        assert_eq!(list(&state).unwrap().len(), 4);

        let created = add(&state, "caja2", "mostrador", Role::Staff, vec![]).unwrap();
        assert_eq!(created.permissions, Role::Staff.default_permissions());

        let custom = add(&state, "encargada", "planilla", Role::Staff, vec![Permission::MetricsView]).unwrap();
        assert_eq!(custom.permissions, vec![Permission::MetricsView]);

        let err = add(&state, "caja2", "otraclave", Role::Staff, vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let granted = grant(&state, "caja2", vec![Permission::OrdersView, Permission::TicketsView]).unwrap();
        assert_eq!(granted.permissions, vec![Permission::TicketsView, Permission::OrdersView]);

        let err = grant(&state, "ghost", vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_staff_cannot_manage_accounts() {
        let (_dir, state) = local_state();
        login(&state, "staff1");
        assert_eq!(list(&state).unwrap_err().code, ErrorCode::PermissionDenied);
        assert_eq!(
            grant(&state, "staff1", Permission::ALL.to_vec()).unwrap_err().code,
            ErrorCode::PermissionDenied
        );
    }
}
