//! Matchit routing configuration.

use std::sync::Arc;

use anyhow::Context;
use hyper::{body::Bytes, Request, Response};
use matchit::Router as MatchitRouter;

use crate::handlers;
use field_merge_core::{Database, EditableFields, MergeConfig, Merger, Table};

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Name of the table holding issues
    pub issues_table: String,
    /// Maximum time to wait for a request body
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            issues_table: "issues".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database instance
    pub db: Arc<Database>,
    /// Issue table
    pub issues: Arc<Table>,
    /// Merger writing into the issue table
    pub merger: Arc<Merger<Arc<Table>>>,
    /// Fields clients may edit
    pub fields: Arc<EditableFields>,
    /// API configuration
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Builds the state for an existing issue table.
    ///
    /// Every column of the table is editable; the identity is not.
    pub fn new(db: Arc<Database>, merge: MergeConfig, config: ApiConfig) -> anyhow::Result<Self> {
        let issues = db
            .table(&config.issues_table)
            .with_context(|| format!("issue table '{}' is missing", config.issues_table))?;
        let fields = EditableFields::new(
            issues.identity.clone(),
            issues.columns.iter().map(|c| c.name.clone()),
        )
        .context("issue table columns are not a valid allow-list")?;
        let merger = Merger::new(Arc::clone(&issues), merge);

        Ok(Self {
            db,
            issues,
            merger: Arc::new(merger),
            fields: Arc::new(fields),
            config: Arc::new(config),
        })
    }
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router with the issue routes.
    pub fn new(state: AppState) -> Result<Self, RouterError> {
        let mut router = MatchitRouter::new();

        for (path, handler) in [
            ("/issues", RouteHandler::Issues),
            ("/issues/{id}", RouteHandler::Issue),
            ("/issues/{id}/edit", RouteHandler::Edit),
        ] {
            router.insert(path, handler).map_err(|e| {
                RouterError::InternalError(format!("Failed to insert {} route: {}", path, e))
            })?;
        }

        Ok(Self {
            inner: router,
            state,
        })
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(req, matched.params, self.state.clone())
                    .await
            }
            Err(_) => Err(RouterError::NotFound(format!(
                "No route found for {}",
                path
            ))),
        }
    }
}

/// Route handler function.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Issues,
    Issue,
    Edit,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        match self {
            RouteHandler::Issues => {
                if method == hyper::Method::GET {
                    handlers::list_issues(state).await
                } else if method == hyper::Method::POST {
                    handlers::create_issue(req, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Issue => {
                if method == hyper::Method::GET {
                    handlers::read_issue(params, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Edit => {
                if method == hyper::Method::POST {
                    handlers::edit_issue(req, params, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status for the error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => msg.clone(),
        };

        let error_response = handlers::error_response(status, message, None);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}",
                e
            )
            .into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        *response.status_mut() =
            hyper::StatusCode::from_u16(status).unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR);
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
