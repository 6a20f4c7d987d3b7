//! Service plumbing shared by the bursary services: tracing setup, request ids,
//! health handlers, datastore connection and per-call deadlines.

pub mod db;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
