//! Response types and helpers for HTTP endpoints.

use serde::Serialize;

use field_merge_core::ConflictReport;

/// Consistent API response wrapper for success responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true for success responses
    pub success: bool,
    /// Response data
    pub data: T,
}

/// Consistent API error response wrapper
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error code (HTTP status code as string)
    pub code: String,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Consistent error response wrapper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false for error responses
    pub success: bool,
    /// Error information
    pub error: ApiError,
}

/// One conflicted field as reported to clients.
#[derive(Debug, Serialize)]
pub struct ConflictEntry {
    /// Field name
    pub field: String,
    /// Value currently stored
    pub current: String,
    /// Human-readable description
    pub message: String,
}

/// Response for an edit that could not be merged.
#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    /// Always false: nothing was written
    pub success: bool,
    /// Conflicted fields
    pub conflicts: Vec<ConflictEntry>,
}

/// Helper to create success response
pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Helper to create error response
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// Helper to create conflict response
pub fn conflict_response(report: &ConflictReport) -> ConflictResponse {
    ConflictResponse {
        success: false,
        conflicts: report
            .iter()
            .map(|conflict| ConflictEntry {
                field: conflict.field.clone(),
                current: conflict.current.clone(),
                message: conflict.message(),
            })
            .collect(),
    }
}
