//! Authorization gate: a static (operation, role) table queried once per
//! request, instead of role checks scattered across handlers.

use sweet_shop_core::Role;

use super::Identity;
use crate::error::AppError;

/// Every operation the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Search,
    Get,
    Purchase,
    Create,
    Update,
    Delete,
    Restock,
}

/// What an operation demands of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone, including anonymous callers.
    Public,
    /// Any authenticated identity, regardless of role.
    Authenticated,
    /// Admin role only.
    Admin,
}

/// The authorization table.
#[must_use]
pub const fn requirement(operation: Operation) -> Requirement {
    match operation {
        Operation::List | Operation::Search | Operation::Get => Requirement::Public,
        Operation::Purchase => Requirement::Authenticated,
        Operation::Create | Operation::Update | Operation::Delete | Operation::Restock => {
            Requirement::Admin
        }
    }
}

/// Check the caller against the table.
///
/// # Errors
///
/// `Unauthenticated` when a gated operation has no identity ("who are
/// you"), `Forbidden` when the identity's role is insufficient ("you may
/// not do this"). The two carry distinct status codes.
pub fn authorize(identity: Option<&Identity>, operation: Operation) -> Result<(), AppError> {
    match (requirement(operation), identity) {
        (Requirement::Public, _) => Ok(()),
        (_, None) => Err(AppError::Unauthenticated),
        (Requirement::Authenticated, Some(_)) => Ok(()),
        (Requirement::Admin, Some(identity)) if identity.role == Role::Admin => Ok(()),
        (Requirement::Admin, Some(_)) => Err(AppError::Forbidden),
    }
}
