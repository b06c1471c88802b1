//! Observable fetch services.
//!
//! This crate provides two services that each own a piece of observable
//! state and keep it in sync with a backend over HTTP:
//!
//! - `PostService`: the post list from the posts endpoint
//! - `AuthService`: the session token from the login endpoint
//!
//! UI layers read state through `StateHandle`s and can subscribe to
//! changes; only the owning service writes. Services are built explicitly
//! by the application and handed to whoever needs them.

pub mod api;
pub mod config;
pub mod models;
pub mod observable;
pub mod services;
pub mod status;

pub use api::{FetchError, FetchErrorKind, ReqwestTransport, Transport};
pub use config::ServiceConfig;
pub use models::{AuthToken, Credentials, LoginResponse, Post};
pub use observable::StateHandle;
pub use services::{AuthService, PostService};
pub use status::FetchStatus;
