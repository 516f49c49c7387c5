//! Caller identity, as established by an upstream authentication layer.

use common::UserId;

use crate::error::{CheckoutError, Result};

/// The role a caller acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

/// An authenticated caller.
///
/// Issued upstream; this crate only consumes it. Admin-only operations check
/// the role before touching any store.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Rejects non-admin callers.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CheckoutError::AdminRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_is_not_admin() {
        let principal = Principal::customer(UserId::new());
        assert!(!principal.is_admin());
        assert!(matches!(
            principal.require_admin(),
            Err(CheckoutError::AdminRequired)
        ));
    }

    #[test]
    fn admin_passes_check() {
        let principal = Principal::admin(UserId::new());
        assert!(principal.require_admin().is_ok());
    }
}
