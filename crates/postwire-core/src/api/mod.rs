//! HTTP plumbing shared by the fetch services.
//!
//! This module provides the `Transport` seam, its reqwest implementation,
//! and the `FetchError` taxonomy every operation reports through.

pub mod error;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{FetchError, FetchErrorKind};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
