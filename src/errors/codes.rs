use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error codes shared by every service.
///
/// The set is closed: a new condition is added here and shipped with a
/// deploy, never registered at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body or parameters failed validation
    InvalidInputValue,

    /// A value could not be converted to the expected type
    InvalidTypeValue,

    /// Two related entities disagree on their owning company
    CompanyMismatch,

    /// Requester is not allowed to act on the resource
    Unauthorized,

    /// Authenticated but not permitted
    Forbidden,

    /// Requested entity does not exist
    EntityNotFound,

    /// HTTP method not supported by the route
    MethodNotAllowed,

    /// Unexpected failure; never carries internal details
    InternalServerError,

    /// Another service could not be reached or answered garbage
    RemoteServiceError,

    /// Another service is temporarily refusing calls
    ServiceUnavailable,
}

impl ErrorCode {
    /// Every registered code, in declaration order.
    pub const ALL: [ErrorCode; 10] = [
        Self::InvalidInputValue,
        Self::InvalidTypeValue,
        Self::CompanyMismatch,
        Self::Unauthorized,
        Self::Forbidden,
        Self::EntityNotFound,
        Self::MethodNotAllowed,
        Self::InternalServerError,
        Self::RemoteServiceError,
        Self::ServiceUnavailable,
    ];

    /// Symbolic name used on the wire
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvalidInputValue => "INVALID_INPUT_VALUE",
            Self::InvalidTypeValue => "INVALID_TYPE_VALUE",
            Self::CompanyMismatch => "COMPANY_MISMATCH",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::EntityNotFound => "ENTITY_NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::RemoteServiceError => "REMOTE_SERVICE_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Message used when an error carries no override
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidInputValue => "Invalid input value",
            Self::InvalidTypeValue => "Invalid type value",
            Self::CompanyMismatch => "Company information does not match",
            Self::Unauthorized => "Unauthorized request",
            Self::Forbidden => "Access is denied",
            Self::EntityNotFound => "Entity not found",
            Self::MethodNotAllowed => "Method not allowed",
            Self::InternalServerError => "Internal server error",
            Self::RemoteServiceError => "Remote service call failed",
            Self::ServiceUnavailable => "Service temporarily unavailable",
        }
    }

    /// Get HTTP status code for this error
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInputValue => 400,
            Self::InvalidTypeValue => 400,
            Self::CompanyMismatch => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::EntityNotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::InternalServerError => 500,
            Self::RemoteServiceError => 502,
            Self::ServiceUnavailable => 503,
        }
    }

    /// True for codes caused by the caller (4xx)
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Look up a code by its symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.name() == name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
