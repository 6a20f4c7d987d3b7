//! Test utilities for the bursary services.
//!
//! Import from `dev-dependencies` only; never in production code.

pub mod auth;
