//! Typed error taxonomy shared by every service

pub mod codes;
pub mod domain;
pub mod response;

pub use codes::ErrorCode;
pub use domain::{
    ensure_same_company, ensure_same_requester, parse_user_id, CodedError, DomainError,
    RequesterKey, RequesterMismatch,
};
pub use response::ErrorDetail;
