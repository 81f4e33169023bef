//! Integration test crate for the royalty workspace.
//!
//! This crate has no library code. It only contains integration tests that
//! run full distribution rounds across the Merkle, accounting and engine
//! crates on an in-memory ledger.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p royalty-integration-tests
//! ```
