use crate::error::AuthError;
use core_types::Role;

/// The role a session is opened with.
///
/// Without an explicit request the stored role is used. Admins may ask for
/// any role; everyone else only for their own.
pub fn resolve_login_role(registered: Role, requested: Option<Role>) -> Result<Role, AuthError> {
    match requested {
        None => Ok(registered),
        Some(role) if registered == Role::Admin || role == registered => Ok(role),
        Some(_) => Err(AuthError::RoleMismatch { registered }),
    }
}

/// Switching is an admin affordance and is judged on the stored role, so an
/// admin currently acting as a driver can still switch back.
pub fn resolve_role_switch(registered: Role, target: Role) -> Result<Role, AuthError> {
    if registered != Role::Admin {
        return Err(AuthError::NotAdmin);
    }
    Ok(target)
}

/// Landing page after sign-in.
pub fn redirect_path(role: Role) -> &'static str {
    match role {
        Role::Customer => "/dashboard",
        Role::Driver => "/driver",
        Role::Admin => "/admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_defaults_to_registered_role() {
        assert_eq!(resolve_login_role(Role::Driver, None), Ok(Role::Driver));
    }

    #[test]
    fn test_admin_may_log_in_as_anyone() {
        for role in [Role::Customer, Role::Driver, Role::Admin] {
            assert_eq!(resolve_login_role(Role::Admin, Some(role)), Ok(role));
        }
    }

    #[test]
    fn test_customer_cannot_claim_driver() {
        let err = resolve_login_role(Role::Customer, Some(Role::Driver)).unwrap_err();
        assert_eq!(err, AuthError::RoleMismatch { registered: Role::Customer });
        assert_eq!(err.to_string(), "Invalid role. You are registered as a customer");
    }

    #[test]
    fn test_driver_cannot_claim_admin() {
        assert!(resolve_login_role(Role::Driver, Some(Role::Admin)).is_err());
        assert_eq!(resolve_login_role(Role::Driver, Some(Role::Driver)), Ok(Role::Driver));
    }

    #[test]
    fn test_only_stored_admins_switch() {
        assert_eq!(resolve_role_switch(Role::Admin, Role::Driver), Ok(Role::Driver));
        assert_eq!(resolve_role_switch(Role::Driver, Role::Admin), Err(AuthError::NotAdmin));
        assert_eq!(resolve_role_switch(Role::Customer, Role::Customer), Err(AuthError::NotAdmin));
    }

    #[test]
    fn test_redirects() {
        assert_eq!(redirect_path(Role::Customer), "/dashboard");
        assert_eq!(redirect_path(Role::Driver), "/driver");
        assert_eq!(redirect_path(Role::Admin), "/admin");
    }
}
