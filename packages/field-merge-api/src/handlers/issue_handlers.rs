//! Issue endpoints: create, list, read and merge-edit.

use hyper::{body::Bytes, Request, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::router::{AppState, RouterError};
use field_merge_core::{ChangeSet, MergeOutcome};

use super::request_utils::{
    json_response, map_merge_error_to_router_error, parse_form_body, parse_record_id,
    read_request_body_with_timeout, BodyFormat, CreateIssueRequest, EditIssueRequest,
    MatchitParams,
};
use super::response::{conflict_response, success_response};

/// Lists all issues.
///
/// # Endpoint
/// `GET /issues`
///
/// # Response
/// - **200 OK**: Array of issues in id order
pub async fn list_issues(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let issues: Vec<Value> = state
        .issues
        .records()
        .iter()
        .map(|record| state.issues.to_json(record))
        .collect();
    json_response(200, &success_response(issues))
}

/// Creates an issue.
///
/// # Endpoint
/// `POST /issues`
///
/// # Request Body
/// ```json
/// {
///   "title": "Form crashes on save",
///   "description": "Steps to reproduce..."
/// }
/// ```
///
/// # Response
/// - **201 Created**: The stored issue
///
/// # Errors
/// - **400 Bad Request**: Malformed JSON or empty title
pub async fn create_issue(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    create_issue_from_body(&state, &body)
}

/// Creates an issue from an already read request body.
pub fn create_issue_from_body(state: &AppState, body: &[u8]) -> Result<Response<Bytes>, RouterError> {
    let request: CreateIssueRequest = serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))?;

    let id = state
        .issues
        .insert(&[
            ("title", Some(request.title.as_str())),
            ("description", request.description.as_deref()),
        ])
        .map_err(map_merge_error_to_router_error)?;
    let record = state
        .issues
        .get(id)
        .map_err(map_merge_error_to_router_error)?;

    info!(id, "Issue created");
    json_response(201, &success_response(state.issues.to_json(&record)))
}

/// Reads an issue.
///
/// # Endpoint
/// `GET /issues/{id}`
///
/// # Errors
/// - **400 Bad Request**: Non-numeric id
/// - **404 Not Found**: Unknown issue
pub async fn read_issue(
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_record_id(&params)?;
    read_issue_by_id(&state, id)
}

fn read_issue_by_id(state: &AppState, id: u64) -> Result<Response<Bytes>, RouterError> {
    let record = state
        .issues
        .get(id)
        .map_err(map_merge_error_to_router_error)?;
    json_response(200, &success_response(state.issues.to_json(&record)))
}

/// Merges a client's edit into an issue.
///
/// # Endpoint
/// `POST /issues/{id}/edit`
///
/// # Request Body
/// Either a form submission carrying each field with its baseline under
/// `<field>.old`:
/// ```text
/// title=Cat&title.old=Dog&description=...&description.old=...
/// ```
/// or JSON:
/// ```json
/// {
///   "changes": [{"name": "title", "baseline": "Dog", "desired": "Cat"}]
/// }
/// ```
///
/// # Response
/// - **200 OK**: Merge committed; returns the stored issue
/// - **409 Conflict**: Nothing written; returns the conflicted fields
/// ```json
/// {
///   "success": false,
///   "conflicts": [{"field": "title", "current": "Fish", "message": "..."}]
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: Malformed body, non-editable or repeated field
/// - **404 Not Found**: Unknown issue
/// - **500 Internal Server Error**: Merge invariant violated
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/issues/1/edit \
///   --data-urlencode "title=Cat" --data-urlencode "title.old=Dog"
/// ```
pub async fn edit_issue(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_record_id(&params)?;
    let format = BodyFormat::from_content_type(
        req.headers()
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
    );
    let body = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    edit_issue_from_body(&state, id, format, &body)
}

/// Merges an edit from an already read request body.
pub fn edit_issue_from_body(
    state: &AppState,
    id: u64,
    format: BodyFormat,
    body: &[u8],
) -> Result<Response<Bytes>, RouterError> {
    let changes = match format {
        BodyFormat::Form => {
            let params = parse_form_body(body)?;
            // Browsers submit textareas with CRLF line breaks
            ChangeSet::extract(&params, &state.fields, true)
        }
        BodyFormat::Json => {
            let request: EditIssueRequest = serde_json::from_slice(body)
                .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))?;
            ChangeSet::from_changes(
                request.changes,
                &state.fields,
                state.merger.config().strip_carriage_returns,
            )
            .map_err(map_merge_error_to_router_error)?
        }
    };
    debug!(id, fields = ?changes.names(), "Edit received");

    let outcome = state
        .merger
        .merge(id, &changes)
        .map_err(map_merge_error_to_router_error)?;

    match outcome {
        MergeOutcome::Committed => read_issue_by_id(state, id),
        MergeOutcome::Conflict(report) => {
            warn!(id, "Edit conflicted:\n{}", report);
            json_response(409, &conflict_response(&report))
        }
    }
}
