//! Integration test entry point
//!
//! The submodules exercise the pipeline end-to-end against wiremock servers
//! and temporary data directories.

mod download_tests;
