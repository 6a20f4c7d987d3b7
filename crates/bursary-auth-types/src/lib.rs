//! Bearer-token types shared by the bursary services.
//!
//! Provides JWT issue/validation and the `Identity` extractor.

pub mod identity;
pub mod token;
