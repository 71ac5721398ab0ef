//! Business-rule violations as values.
//!
//! Services return `Result<_, DomainError>` from the point a rule is broken;
//! the response layer turns the error into an [`ApiResponse`](crate::api::ApiResponse)
//! error envelope. Callers branch on [`DomainError::code`], not on the variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;
use uuid::Uuid;

use super::codes::ErrorCode;
use super::response::ErrorDetail;

/// Identifiers that can be compared to decide whether a requester owns a resource.
///
/// Implemented for numeric user ids and UUIDs. Both sides of a comparison
/// share one type, so a numeric requester can never be checked against a
/// UUID owner.
pub trait RequesterKey: Copy + PartialEq + fmt::Display {
    fn mismatch(requester_id: Self, user_id: Self) -> RequesterMismatch;
}

impl RequesterKey for i64 {
    fn mismatch(requester_id: Self, user_id: Self) -> RequesterMismatch {
        RequesterMismatch::Numeric {
            requester_id,
            user_id,
        }
    }
}

impl RequesterKey for Uuid {
    fn mismatch(requester_id: Self, user_id: Self) -> RequesterMismatch {
        RequesterMismatch::Uuid {
            requester_id,
            user_id,
        }
    }
}

/// The two identities compared by an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequesterMismatch {
    Numeric { requester_id: i64, user_id: i64 },
    Uuid { requester_id: Uuid, user_id: Uuid },
}

impl fmt::Display for RequesterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric {
                requester_id,
                user_id,
            } => write!(
                f,
                "Requester ID ({}) does not match User ID ({})",
                requester_id, user_id
            ),
            Self::Uuid {
                requester_id,
                user_id,
            } => write!(
                f,
                "Requester UUID ({}) does not match User UUID ({})",
                requester_id, user_id
            ),
        }
    }
}

/// A registry code with its resolved message.
///
/// Only built through [`DomainError::new`] and [`DomainError::with_message`],
/// so the message is never blank.
#[derive(Debug, Clone)]
pub struct CodedError {
    code: ErrorCode,
    message: String,
}

impl CodedError {
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A failed business rule.
///
/// Equality compares the wire form (code and message), so an error decoded
/// from a remote envelope equals the error the remote side built.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
#[serde(into = "ErrorDetail", from = "ErrorDetail")]
pub enum DomainError {
    /// A registry code with its resolved message
    #[error("{0}")]
    Coded(CodedError),

    /// Requester identity differs from the resource owner
    #[error("{0}")]
    UnauthorizedRequester(RequesterMismatch),

    /// A string could not be parsed into an identifier
    #[error("Invalid ID format: {id}")]
    InvalidIdFormat { id: String },

    /// An order's products belong to a different company than the order
    #[error(
        "Order company ID ({order_company_id}) does not match Product company ID ({product_company_id})"
    )]
    ProductCompanyMismatch {
        order_company_id: Uuid,
        product_company_id: Uuid,
    },
}

impl DomainError {
    /// Error carrying the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::Coded(CodedError {
            code,
            message: code.default_message().to_string(),
        })
    }

    /// Error with a message override.
    ///
    /// A blank override falls back to the code's default so the message is
    /// never empty.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::new(code);
        }
        Self::Coded(CodedError { code, message })
    }

    /// Requester and owner identities disagree.
    ///
    /// Builds the message even when both values are equal; use
    /// [`ensure_same_requester`] to construct only on an actual mismatch.
    pub fn unauthorized_requester<K: RequesterKey>(requester_id: K, user_id: K) -> Self {
        Self::UnauthorizedRequester(K::mismatch(requester_id, user_id))
    }

    pub fn invalid_id_format(id: impl Into<String>) -> Self {
        Self::InvalidIdFormat { id: id.into() }
    }

    pub fn product_company_mismatch(order_company_id: Uuid, product_company_id: Uuid) -> Self {
        Self::ProductCompanyMismatch {
            order_company_id,
            product_company_id,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::EntityNotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidInputValue, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalServerError)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Coded(coded) => coded.code(),
            Self::UnauthorizedRequester(_) => ErrorCode::Unauthorized,
            Self::InvalidIdFormat { .. } => ErrorCode::InvalidTypeValue,
            Self::ProductCompanyMismatch { .. } => ErrorCode::CompanyMismatch,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Wire representation
    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code(),
            message: self.message(),
        }
    }
}

impl PartialEq for DomainError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code() && self.message() == other.message()
    }
}

impl Eq for DomainError {}

impl From<ErrorCode> for DomainError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl From<DomainError> for ErrorDetail {
    fn from(error: DomainError) -> Self {
        error.detail()
    }
}

impl From<ErrorDetail> for DomainError {
    fn from(detail: ErrorDetail) -> Self {
        Self::with_message(detail.code, detail.message)
    }
}

/// Unexpected failures collapse to the generic code; the chain is only logged.
impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        error!(error = %format!("{:#}", err), "Unhandled failure mapped to INTERNAL_SERVER_ERROR");
        Self::internal()
    }
}

/// Convert a requester identity string into a numeric user id
pub fn parse_user_id(raw: &str) -> Result<i64, DomainError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::invalid_id_format(raw))
}

/// `Ok(())` when the requester owns the resource
pub fn ensure_same_requester<K: RequesterKey>(requester_id: K, user_id: K) -> Result<(), DomainError> {
    if requester_id == user_id {
        Ok(())
    } else {
        Err(DomainError::unauthorized_requester(requester_id, user_id))
    }
}

/// `Ok(())` when a product belongs to the order's producing company
pub fn ensure_same_company(order_company_id: Uuid, product_company_id: Uuid) -> Result<(), DomainError> {
    if order_company_id == product_company_id {
        Ok(())
    } else {
        Err(DomainError::product_company_mismatch(
            order_company_id,
            product_company_id,
        ))
    }
}
