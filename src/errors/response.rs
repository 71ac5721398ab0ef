use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::codes::ErrorCode;

/// Error payload nested under `error` in a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}
