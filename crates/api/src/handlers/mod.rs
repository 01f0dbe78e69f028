//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod firm;
pub mod firm_module;
pub mod module;
