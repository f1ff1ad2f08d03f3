//! Integration test suite.
//!
//! Organized by concern:
//! 1. Merge scenarios on both strategies
//! 2. Form parameter extraction through to storage
//! 3. Concurrent writers on one record
//! 4. SQL rendering of conditional writes

pub mod concurrency_tests;
pub mod extraction_tests;
pub mod helpers;
pub mod scenario_tests;
pub mod sql_tests;
