//! Pure domain logic for the Firmdesk backend.
//!
//! This crate has no database or HTTP dependencies so the module
//! catalogue validator can be exercised by the API layer, tests, and any
//! future CLI tooling alike.

pub mod error;
pub mod modules;
pub mod roles;
pub mod types;
