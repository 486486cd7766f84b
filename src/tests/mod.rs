//! Scenario tests spanning several modules.
//!
//! Gesture property checks drive a [`crate::ViewportController`] through
//! whole interactions; session tests use an in-memory engine.

mod session_tests;
