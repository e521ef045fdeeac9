//! Access rules for protected operations.
//!
//! Every protected route names an [`Operation`] and asks [`authorize`]
//! whether the authenticated [`Requester`] may perform it. The rules are:
//!
//! | Operation | Allowed when |
//! |-----------|--------------|
//! | `ListUsers`, `CreateCourse`, `UpdateCourse` | requester is an admin |
//! | `ViewUser`, `UpdateUser` | requester is the target user |
//! | `SubscribeUser` | requester is the target user, or an admin |
//!
//! Admins are not exempt from the ownership rule on `ViewUser` and
//! `UpdateUser`; only subscriptions accept either.
//!
//! Authentication happens before any of this. A request that reaches the
//! policy always has a verified identity.
//!
//! # Example
//!
//! ```ignore
//! use coursehub_core::access::{Operation, Requester, authorize};
//!
//! let requester = Requester { id: caller_id, is_adm: false };
//! authorize(&requester, Operation::SubscribeUser(target_id))?;
//! ```

use axum::http::StatusCode;
use uuid::Uuid;

use crate::errors::AppError;

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub is_adm: bool,
}

/// A protected operation, carrying the target user where ownership matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListUsers,
    ViewUser(Uuid),
    UpdateUser(Uuid),
    SubscribeUser(Uuid),
    CreateCourse,
    UpdateCourse,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The operation is reserved for admins.
    AdminOnly,
    /// The operation targets a different user.
    NotOwner,
}

impl Denial {
    pub fn status(&self) -> StatusCode {
        match self {
            // The admin gate answers 401, not 403.
            Denial::AdminOnly => StatusCode::UNAUTHORIZED,
            Denial::NotOwner => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Denial::AdminOnly => "You are not allowed to access this information.",
            Denial::NotOwner => "You can't access information of another user.",
        }
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        AppError::new(denial.status(), anyhow::Error::msg(denial.message()))
    }
}

/// Evaluates the rule for `operation` without building an HTTP error.
pub fn check(requester: &Requester, operation: Operation) -> Result<(), Denial> {
    match operation {
        Operation::ListUsers | Operation::CreateCourse | Operation::UpdateCourse => {
            if requester.is_adm {
                Ok(())
            } else {
                Err(Denial::AdminOnly)
            }
        }
        Operation::ViewUser(target) | Operation::UpdateUser(target) => {
            if requester.id == target {
                Ok(())
            } else {
                Err(Denial::NotOwner)
            }
        }
        Operation::SubscribeUser(target) => {
            if requester.id == target || requester.is_adm {
                Ok(())
            } else {
                Err(Denial::NotOwner)
            }
        }
    }
}

pub fn authorize(requester: &Requester, operation: Operation) -> Result<(), AppError> {
    check(requester, operation).map_err(|denial| {
        tracing::debug!(
            requester.id = %requester.id,
            requester.is_adm = requester.is_adm,
            operation = ?operation,
            denial = ?denial,
            "Access denied"
        );
        AppError::from(denial)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Requester {
        Requester {
            id: Uuid::new_v4(),
            is_adm: false,
        }
    }

    fn admin() -> Requester {
        Requester {
            id: Uuid::new_v4(),
            is_adm: true,
        }
    }

    #[test]
    fn test_admin_only_operations() {
        for op in [
            Operation::ListUsers,
            Operation::CreateCourse,
            Operation::UpdateCourse,
        ] {
            assert_eq!(check(&admin(), op), Ok(()));
            assert_eq!(check(&user(), op), Err(Denial::AdminOnly));
        }
    }

    #[test]
    fn test_view_and_update_require_ownership() {
        let owner = user();
        assert_eq!(check(&owner, Operation::ViewUser(owner.id)), Ok(()));
        assert_eq!(check(&owner, Operation::UpdateUser(owner.id)), Ok(()));

        let other = Uuid::new_v4();
        assert_eq!(
            check(&owner, Operation::ViewUser(other)),
            Err(Denial::NotOwner)
        );
        assert_eq!(
            check(&owner, Operation::UpdateUser(other)),
            Err(Denial::NotOwner)
        );
    }

    #[test]
    fn test_admin_cannot_view_or_update_another_user() {
        let other = Uuid::new_v4();
        assert_eq!(
            check(&admin(), Operation::ViewUser(other)),
            Err(Denial::NotOwner)
        );
        assert_eq!(
            check(&admin(), Operation::UpdateUser(other)),
            Err(Denial::NotOwner)
        );
    }

    #[test]
    fn test_subscribe_owner_or_admin() {
        let owner = user();
        let target = Uuid::new_v4();

        assert_eq!(check(&owner, Operation::SubscribeUser(owner.id)), Ok(()));
        assert_eq!(check(&admin(), Operation::SubscribeUser(target)), Ok(()));
        assert_eq!(
            check(&owner, Operation::SubscribeUser(target)),
            Err(Denial::NotOwner)
        );
    }

    #[test]
    fn test_denial_statuses() {
        let err = authorize(&user(), Operation::ListUsers).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.error.to_string(),
            "You are not allowed to access this information."
        );

        let err = authorize(&user(), Operation::ViewUser(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(
            err.error.to_string(),
            "You can't access information of another user."
        );
    }
}
