//! Integration tests for cinetui
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client against a mock server
//! - search_test: Search engine debounce, races and keyboard navigation
//! - detail_test: Movie and TV detail controllers
//! - embed_test: Player URLs, listener scoping and the browser launcher
//! - ui_test: Rendering and input flows on a TestBackend
//! - cli_test: Argument parsing and command handlers
//!
//! `common/` holds the in-memory catalog the state tests run against.

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
