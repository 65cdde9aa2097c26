//! Public facade over the provider's domain and record endpoints.
//!
//! # Design
//! `DnsClient` owns only its `Transport` and carries no state between calls.
//! Every operation is one `dispatch` followed by one `ApiResponse`
//! interpretation: no retries, no pagination, no caching. Builders are
//! serialized (and therefore validated) before the transport is touched.

use crate::builders::{DomainBuilder, RecordBuilder};
use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, Transport};
use crate::types::{Domain, Record};

const DOMAIN: &str = "domain";
const DOMAINS: &str = "domains";
const RECORD: &str = "domain_record";
const RECORDS: &str = "domain_records";

/// Synchronous client for the provider's DNS API.
#[derive(Debug, Clone)]
pub struct DnsClient<T> {
    transport: T,
}

impl<T: Transport> DnsClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Send one request and wrap whatever came back.
    pub fn dispatch(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<ApiResponse> {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        tracing::debug!(%method, path, "dispatching request");

        let response = self.transport.send(HttpRequest {
            method,
            path: path.to_string(),
            headers,
            body,
        })?;

        let response = ApiResponse::new(response);
        tracing::debug!(%method, path, status = response.status(), "received response");
        Ok(response)
    }

    pub fn domains(&self) -> Result<Vec<Domain>> {
        self.dispatch(HttpMethod::Get, "domains", None)?
            .into_collection(DOMAINS)
    }

    pub fn domain(&self, domain_id: u64) -> Result<Domain> {
        self.dispatch(HttpMethod::Get, &domain_path(domain_id), None)?
            .into_entity(DOMAIN)
    }

    pub fn create_domain(&self, domain: &DomainBuilder) -> Result<Domain> {
        let body = domain.request_body()?;
        self.dispatch(HttpMethod::Post, "domains", Some(body))?
            .into_entity(DOMAIN)
    }

    /// Delete a domain and every record in it.
    pub fn delete_domain(&self, domain_id: u64) -> Result<bool> {
        self.dispatch(HttpMethod::Delete, &domain_path(domain_id), None)?
            .expect_deleted("domain")
    }

    pub fn records(&self, domain_id: u64) -> Result<Vec<Record>> {
        let records: Vec<Record> = self
            .dispatch(HttpMethod::Get, &records_path(domain_id), None)?
            .into_collection(RECORDS)?;
        Ok(records.into_iter().map(|r| r.owned_by(domain_id)).collect())
    }

    pub fn record(&self, domain_id: u64, record_id: u64) -> Result<Record> {
        let record: Record = self
            .dispatch(HttpMethod::Get, &record_path(domain_id, record_id), None)?
            .into_entity(RECORD)?;
        Ok(record.owned_by(domain_id))
    }

    pub fn create_record(&self, domain_id: u64, record: &RecordBuilder) -> Result<Record> {
        let body = record.request_body()?;
        let created: Record = self
            .dispatch(HttpMethod::Post, &records_path(domain_id), Some(body))?
            .into_entity(RECORD)?;
        Ok(created.owned_by(domain_id))
    }

    /// Send `record` back in full as the new state of that record.
    pub fn update_record(&self, domain_id: u64, record: &Record) -> Result<Record> {
        let body = record.to_json()?;
        let updated: Record = self
            .dispatch(HttpMethod::Put, &record_path(domain_id, record.id()), Some(body))?
            .into_entity(RECORD)?;
        Ok(updated.owned_by(domain_id))
    }

    pub fn delete_record(&self, domain_id: u64, record_id: u64) -> Result<bool> {
        self.dispatch(HttpMethod::Delete, &record_path(domain_id, record_id), None)?
            .expect_deleted("domain record")
    }
}

fn domain_path(domain_id: u64) -> String {
    format!("domains/{domain_id}")
}

fn records_path(domain_id: u64) -> String {
    format!("domains/{domain_id}/records")
}

fn record_path(domain_id: u64, record_id: u64) -> String {
    format!("domains/{domain_id}/records/{record_id}")
}
