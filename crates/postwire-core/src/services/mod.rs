//! The observable fetch services.
//!
//! Each service owns one observable value plus a `FetchStatus`, performs
//! its network call through a `Transport`, and maps the outcome into that
//! state. Failures are logged and returned; the value is only replaced on
//! success.

pub mod auth;
pub mod posts;
mod state;

#[cfg(test)]
mod testing;

pub use auth::AuthService;
pub use posts::PostService;
