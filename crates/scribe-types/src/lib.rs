//! Scribe Types - Shared domain types
//!
//! This crate contains domain types used across Scribe crates:
//! - User identity, roles and the public user projection
//! - Media references returned by the upload gateway
//! - Blog posts

pub mod blog;
pub mod media;
pub mod role;
pub mod user;

pub use blog::*;
pub use media::*;
pub use role::*;
pub use user::*;
