//! PostHog Integration
//!
//! Connects trends queries to the PostHog insights API.
//!
//! ## Architecture
//!
//! - **PostHogClient**: resolved credentials + event catalog, starts queries
//! - **Transport**: one authenticated GET; [`HttpTransport`] uses reqwest

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod transport;

pub use client::PostHogClient;
pub use transport::{HttpTransport, Transport, TransportResponse};
