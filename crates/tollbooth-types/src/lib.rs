//! Tollbooth Types - Shared types
//!
//! Identifier and role types used across the token authority and its
//! store backends.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::UserId;
