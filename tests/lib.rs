//! Cross-crate integration tests for the employee directory.
//!
//! Each test opens its own in-memory SQLite database, applies the schema
//! migration and seeds it, so tests never share state.
