//! HTTP endpoint implementations for issues.

pub mod issue_handlers;
pub mod request_utils;
pub mod response;

pub use issue_handlers::{create_issue, edit_issue, list_issues, read_issue};
pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};
