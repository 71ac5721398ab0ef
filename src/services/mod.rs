//! Business rules for each service.
//!
//! Every operation returns `Result<_, DomainError>`; repository failures are
//! folded into the generic error by `?`.

pub mod address;
pub mod delivery;
pub mod order;

pub use address::AddressService;
pub use delivery::DeliveryService;
pub use order::OrderService;

use crate::errors::{ensure_same_requester, DomainError};
use crate::models::Requester;

/// Trimmed value of a required text field
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid_input(format!(
            "{} must not be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Owner filter for a search made by `requester`; naming another owner is refused
pub(crate) fn scope_owner(requester: Requester, owner_id: Option<i64>) -> Result<i64, DomainError> {
    if let Some(owner_id) = owner_id {
        ensure_same_requester(requester.user_id, owner_id)?;
    }
    Ok(requester.user_id)
}
