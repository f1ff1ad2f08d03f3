//! Request utilities for HTTP endpoints.

use std::collections::HashMap;

use http_body_util::BodyExt;
use hyper::{body::Bytes, Request, Response};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use tokio::time;

use crate::router::RouterError;
use field_merge_core::{FieldChange, MergeError};

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Map MergeError to appropriate RouterError
pub fn map_merge_error_to_router_error(e: MergeError) -> RouterError {
    match e {
        MergeError::TableNotFound { .. } | MergeError::RecordNotFound { .. } => {
            RouterError::NotFound(e.to_string())
        }
        MergeError::ColumnNotFound { .. } => RouterError::BadRequest(e.to_string()),
        e if e.is_validation() => RouterError::BadRequest(e.to_string()),
        e if e.is_fatal() => {
            tracing::error!("Merge invariant violated: {}", e);
            RouterError::InternalError(e.to_string())
        }
        e => RouterError::InternalError(format!("Storage error: {}", e)),
    }
}

/// Parses the `{id}` route parameter.
pub fn parse_record_id(params: &MatchitParams<'_, '_>) -> Result<u64, RouterError> {
    let raw = params
        .get("id")
        .ok_or_else(|| RouterError::BadRequest("Missing issue id".to_string()))?;
    raw.parse::<u64>()
        .map_err(|_| RouterError::BadRequest(format!("Invalid issue id '{}'", raw)))
}

/// How an edit request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
}

impl BodyFormat {
    /// Picks the format from a `Content-Type` header value.
    ///
    /// Anything that is not JSON is read as a form submission.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(value)
                if value
                    .split(';')
                    .next()
                    .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
                    .unwrap_or(false) =>
            {
                BodyFormat::Json
            }
            _ => BodyFormat::Form,
        }
    }
}

/// Parses an `application/x-www-form-urlencoded` body.
///
/// `+` decodes to a space. When a key repeats, the first value wins.
pub fn parse_form_body(body: &[u8]) -> Result<HashMap<String, String>, RouterError> {
    let body = std::str::from_utf8(body)
        .map_err(|_| RouterError::BadRequest("Form body is not valid UTF-8".to_string()))?;

    let mut params = HashMap::new();
    for pair in body.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_form_component(key)?;
        let value = decode_form_component(value)?;
        params.entry(key).or_insert(value);
    }
    Ok(params)
}

fn decode_form_component(raw: &str) -> Result<String, RouterError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| RouterError::BadRequest(format!("Invalid form encoding: {}", e)))
}

/// Request to create an issue.
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    /// Issue title (required, non-empty)
    pub title: String,
    /// Issue description
    #[serde(default)]
    pub description: Option<String>,
}

/// JSON edit request.
#[derive(Debug, Deserialize)]
pub struct EditIssueRequest {
    /// Per-field baseline and desired values
    pub changes: Vec<FieldChange>,
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `value` and builds a JSON response.
pub fn json_response<T: serde::Serialize>(
    status: u16,
    value: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}
