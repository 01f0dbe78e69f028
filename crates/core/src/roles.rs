//! Well-known role name constants.
//!
//! These must match the seed data in `20260305000001_create_roles.sql`.
//! `admin` may do everything, `manager` may manage firms and their
//! modules, `viewer` has read-only access.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_VIEWER: &str = "viewer";
