//! Synchronous client for a DNS-hosting provider's REST API.
//!
//! # Overview
//! Lists, fetches, creates, updates and deletes domains and their DNS records
//! by translating between typed entities and the provider's JSON envelopes.
//!
//! # Design
//! - `DnsClient` is the facade: one method per provider operation, one HTTP
//!   call per method, no retries.
//! - HTTP goes through the `Transport` trait. `UreqTransport` (feature
//!   `ureq`, on by default) is the production implementation; tests pass a
//!   closure.
//! - `DomainBuilder` and `RecordBuilder` validate before anything is sent.
//! - Every fallible step returns `ApiError`.
//!
//! ```no_run
//! use dnshost_core::{DnsClient, DomainBuilder, RecordBuilder, RecordType};
//!
//! # fn main() -> dnshost_core::Result<()> {
//! let client = DnsClient::from_env()?;
//! let domain = client.create_domain(&DomainBuilder::new("example.com", "203.0.113.5")?)?;
//! if let Some(id) = domain.id() {
//!     client.create_record(id, &RecordBuilder::new(RecordType::Cname, "www", "example.com."))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use builders::{DomainBuilder, RecordBuilder};
pub use client::DnsClient;
pub use config::ClientConfig;
pub use envelope::ApiResponse;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Domain, Record, RecordType};
