//! Per-request authorization decisions.
//!
//! Identity is resolved once per request into an [`AuthUser`] (see
//! `middleware::auth`); everything here is a pure function of that context
//! plus the record's owner. Ownership is the default write boundary, the
//! admin flag gates escalation (delivery, catalog writes, cross-user
//! visibility).

use uuid::Uuid;

use crate::{error::AppError, middleware::auth::AuthUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    ListAll,
    View,
    Pay,
    Deliver,
}

/// Order-scoped policy table. Anonymous callers never reach this point,
/// the extractor already answered 401.
///
/// A non-owner viewing an existing order gets 400, not 403 or 404. The
/// storefront clients distinguish that code from a plain permission error,
/// so it must not be normalized.
pub fn authorize_order(
    action: OrderAction,
    user: &AuthUser,
    owner_id: Uuid,
) -> Result<(), AppError> {
    if user.is_admin {
        return Ok(());
    }
    let is_owner = user.user_id == owner_id;
    match action {
        OrderAction::ListAll | OrderAction::Deliver => Err(AppError::Forbidden),
        OrderAction::Pay => {
            if is_owner {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
        OrderAction::View => {
            if is_owner {
                Ok(())
            } else {
                Err(AppError::InvalidAccess(
                    "Not authorized to view this order".to_string(),
                ))
            }
        }
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
