//! Domain types shared across the bursary services.
//!
//! This crate contains only pure types and pure functions with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod access;
pub mod bursary;
pub mod pagination;
pub mod principal;
pub mod stage;
pub mod workflow;
