//! Optimistic field-level merge for concurrently edited records.
//!
//! Provides change set extraction, a fuzzy text patch engine, conditional
//! write construction, conflict classification, and an in-memory record
//! store that executes conditional writes atomically.

pub mod change_set;
pub mod config;
pub mod database;
pub mod error;
pub mod gateway;
pub mod merge;
pub mod patch;
pub mod table;
pub mod write;

pub use change_set::{ChangeSet, EditableFields, FieldChange};
pub use config::{MergeConfig, MergeStrategy, PatchConfig};
pub use database::Database;
pub use error::MergeError;
pub use gateway::{FieldValues, StorageGateway};
pub use merge::{ConflictReport, FieldConflict, MergeOutcome, Merger};
pub use patch::{Patch, PatchEngine};
pub use table::{Column, Record, Table};
pub use write::{ConditionalWrite, ConditionalWriteBuilder};
