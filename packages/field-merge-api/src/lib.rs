//! REST API for editing issues with optimistic field-level merge.
//!
//! Provides HTTP endpoints to create, list and read issues, and an edit
//! endpoint that merges a submitted change set into the stored issue.

pub mod handlers;
pub mod router;
pub mod server;
