//! Validated accumulators for create request bodies.
//!
//! # Design
//! Builders check their input on every mutation, so an invalid builder
//! cannot exist and `request_body()` on a `DomainBuilder` only fails if JSON
//! encoding does. `RecordBuilder` fields depend on each other (an `SRV`
//! record needs a port, an `MX` one a priority), so it validates as a whole
//! in `request_body()`. Either way the failure happens before the client
//! reaches the transport.
//!
//! Field order in the emitted JSON follows struct declaration order.

use std::net::Ipv6Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::types::RecordType;

pub const DOMAIN_FORMAT_INVALID: &str = "Domain name format is invalid";
pub const IP_FORMAT_INVALID: &str = "The IP address format is invalid";

/// IP address the provider's apex A record points at when none is given.
pub const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";

static DOMAIN_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[0-9a-z-]+\.)+[a-z]{2,7}$").expect("domain name pattern compiles")
});

/// Check that `name` is one or more dot-separated labels followed by a
/// 2-7 letter top-level label.
pub fn validate_domain_name(name: &str) -> Result<()> {
    if DOMAIN_NAME.is_match(name) {
        Ok(())
    } else {
        tracing::debug!(name, "rejected domain name");
        Err(ApiError::data_format(DOMAIN_FORMAT_INVALID))
    }
}

/// Check that `ip_address` is a dotted quad of plain decimal octets in 0..=255.
pub fn validate_ip_address(ip_address: &str) -> Result<()> {
    let octets: Vec<&str> = ip_address.split('.').collect();
    if octets.len() != 4 {
        tracing::debug!(ip_address, parts = octets.len(), "rejected IP address");
        return Err(ApiError::data_format(IP_FORMAT_INVALID));
    }
    for octet in octets {
        if !is_octet(octet) {
            tracing::debug!(ip_address, octet, "rejected IP address octet");
            return Err(ApiError::data_format(IP_FORMAT_INVALID));
        }
    }
    Ok(())
}

/// One to three ASCII digits, no leading zero unless the octet is `0`,
/// value at most 255. Same rule as `Ipv4Addr`'s parser.
fn is_octet(octet: &str) -> bool {
    let digits_only = !octet.is_empty() && octet.len() <= 3 && octet.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (octet.len() > 1 && octet.starts_with('0')) {
        return false;
    }
    octet.parse::<u8>().is_ok()
}

/// Body for creating a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainBuilder {
    name: String,
    ip_address: String,
}

impl DomainBuilder {
    pub fn new(name: impl Into<String>, ip_address: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let ip_address = ip_address.into();
        validate_domain_name(&name)?;
        validate_ip_address(&ip_address)?;
        Ok(Self { name, ip_address })
    }

    /// Builder whose apex record points at [`DEFAULT_IP_ADDRESS`].
    pub fn with_default_ip(name: impl Into<String>) -> Result<Self> {
        Self::new(name, DEFAULT_IP_ADDRESS)
    }

    /// Replace the domain name. The builder is left untouched on error.
    pub fn set_domain_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_domain_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Replace the IP address. The builder is left untouched on error.
    pub fn set_ip_address(&mut self, ip_address: impl Into<String>) -> Result<()> {
        let ip_address = ip_address.into();
        validate_ip_address(&ip_address)?;
        self.ip_address = ip_address;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn request_body(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Body for creating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordBuilder {
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

impl RecordBuilder {
    pub fn new(
        record_type: impl Into<RecordType>,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            data: data.into(),
            priority: None,
            port: None,
            weight: None,
            ttl: None,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::data_format("Record name must not be empty"));
        }
        if self.data.trim().is_empty() {
            return Err(ApiError::data_format("Record data must not be empty"));
        }

        match self.record_type {
            RecordType::A => validate_ip_address(&self.data)?,
            RecordType::Aaaa => {
                if self.data.parse::<Ipv6Addr>().is_err() {
                    return Err(ApiError::data_format(IP_FORMAT_INVALID));
                }
            }
            RecordType::Mx => self.require(self.priority.is_some(), "priority")?,
            RecordType::Srv => {
                self.require(self.priority.is_some(), "priority")?;
                self.require(self.port.is_some(), "port")?;
                self.require(self.weight.is_some(), "weight")?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn request_body(&self) -> Result<String> {
        self.validate()?;
        serde_json::to_string(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    fn require(&self, present: bool, field: &str) -> Result<()> {
        if present {
            Ok(())
        } else {
            Err(ApiError::data_format(format!(
                "{} records require a {field}",
                self.record_type
            )))
        }
    }
}
