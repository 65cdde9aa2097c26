//! Provider-side entities: domains and the DNS records inside them.
//!
//! # Design
//! Entities are only ever produced by decoding a provider response, so their
//! fields are private and exposed through accessors. Decoding is strict about
//! the fields the provider always sends and lenient about everything else:
//! unknown keys are ignored and optional attributes default to `None`.
//!
//! `Record` is the one entity with setters, because the provider's update
//! call takes the whole record back: fetch, mutate, then `update_record`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// DNS resource record type.
///
/// Types the client does not know about are kept verbatim in `Other` so they
/// survive a decode/encode round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Ns,
    Soa,
    Srv,
    Txt,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Caa => "CAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
            RecordType::Other(other) => other,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CAA" => RecordType::Caa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "SOA" => RecordType::Soa,
            "SRV" => RecordType::Srv,
            "TXT" => RecordType::Txt,
            _ => RecordType::Other(value.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS zone hosted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zone_file: Option<String>,
}

impl Domain {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn zone_file(&self) -> Option<&str> {
        self.zone_file.as_deref()
    }
}

/// A single DNS resource record belonging to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: u64,
    /// Never sent by the provider; filled in by the client from the request
    /// path.
    #[serde(default, skip_serializing)]
    domain_id: Option<u64>,
    #[serde(rename = "type")]
    record_type: RecordType,
    name: String,
    data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

impl Record {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn domain_id(&self) -> Option<u64> {
        self.domain_id
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn weight(&self) -> Option<u32> {
        self.weight
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    pub fn set_priority(&mut self, priority: Option<u32>) {
        self.priority = priority;
    }

    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub fn set_weight(&mut self, weight: Option<u32>) {
        self.weight = weight;
    }

    pub fn set_ttl(&mut self, ttl: Option<u32>) {
        self.ttl = ttl;
    }

    /// Encode the record as an update request body.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    /// Attach the owning domain unless the record already names one.
    pub(crate) fn owned_by(mut self, domain_id: u64) -> Self {
        self.domain_id.get_or_insert(domain_id);
        self
    }
}
