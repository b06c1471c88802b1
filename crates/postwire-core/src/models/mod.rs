//! Data models for the fetch services.
//!
//! - `Post`: entries of the post list endpoint
//! - `Credentials`, `AuthToken`, `LoginResponse`: login exchange

pub mod auth;
pub mod post;

pub use auth::{AuthToken, Credentials, LoginResponse};
pub use post::Post;
