use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// TTL given to every new domain and to records created without one.
pub const DEFAULT_TTL: u32 = 1800;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: u64,
    pub name: String,
    pub ttl: u32,
    pub zone_file: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub priority: Option<u32>,
    pub port: Option<u16>,
    pub weight: Option<u32>,
    pub ttl: u32,
}

#[derive(Deserialize)]
pub struct CreateDomain {
    pub name: String,
    pub ip_address: Option<String>,
}

/// Body of both record create (POST) and record update (PUT).
#[derive(Deserialize)]
pub struct RecordInput {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    pub priority: Option<u32>,
    pub port: Option<u16>,
    pub weight: Option<u32>,
    pub ttl: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainsEnvelope {
    pub domains: Vec<Domain>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DomainEnvelope {
    pub domain: Domain,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsEnvelope {
    pub domain_records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordEnvelope {
    pub domain_record: Record,
}

#[derive(Debug, Default)]
pub struct Store {
    next_domain_id: u64,
    next_record_id: u64,
    domains: BTreeMap<u64, Domain>,
    records: BTreeMap<u64, BTreeMap<u64, Record>>,
}

impl Store {
    fn insert_record(&mut self, domain_id: u64, input: RecordInput) -> Record {
        self.next_record_id += 1;
        let record = Record {
            id: self.next_record_id,
            record_type: input.record_type.to_ascii_uppercase(),
            name: input.name,
            data: input.data,
            priority: input.priority,
            port: input.port,
            weight: input.weight,
            ttl: input.ttl.unwrap_or(DEFAULT_TTL),
        };
        self.records
            .entry(domain_id)
            .or_default()
            .insert(record.id, record.clone());
        record
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Provider-style error: a status plus `{"id": ..., "message": ...}`.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    id: &'static str,
    message: String,
}

impl Failure {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            id: "not_found",
            message: "The resource you were accessing could not be found.".to_string(),
        }
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            id: "unprocessable_entity",
            message: message.into(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            id: "unauthorized",
            message: "Unable to authenticate you.".to_string(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"id": self.id, "message": self.message}))).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/domains", get(list_domains).post(create_domain))
        .route("/domains/{id}", get(get_domain).delete(delete_domain))
        .route("/domains/{id}/records", get(list_records).post(create_record))
        .route(
            "/domains/{id}/records/{record_id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Result<Response, Failure> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting request without bearer token");
        return Err(Failure::unauthorized());
    }
    Ok(next.run(request).await)
}

async fn list_domains(State(db): State<Db>) -> Json<DomainsEnvelope> {
    let store = db.read().await;
    Json(DomainsEnvelope {
        domains: store.domains.values().cloned().collect(),
    })
}

async fn create_domain(
    State(db): State<Db>,
    Json(input): Json<CreateDomain>,
) -> Result<(StatusCode, Json<DomainEnvelope>), Failure> {
    let name = input.name.trim().to_ascii_lowercase();
    if name.is_empty() {
        return Err(Failure::unprocessable("Name can't be blank"));
    }
    let ip_address = input.ip_address.unwrap_or_else(|| "127.0.0.1".to_string());

    let mut store = db.write().await;
    if store.domains.values().any(|d| d.name == name) {
        return Err(Failure::unprocessable("Name already exists"));
    }

    store.next_domain_id += 1;
    let domain = Domain {
        id: store.next_domain_id,
        zone_file: zone_file(&name, &ip_address),
        name,
        ttl: DEFAULT_TTL,
    };
    store.domains.insert(domain.id, domain.clone());
    store.insert_record(
        domain.id,
        RecordInput {
            record_type: "A".to_string(),
            name: "@".to_string(),
            data: ip_address,
            priority: None,
            port: None,
            weight: None,
            ttl: None,
        },
    );
    tracing::debug!(id = domain.id, name = %domain.name, "created domain");
    Ok((StatusCode::CREATED, Json(DomainEnvelope { domain })))
}

async fn get_domain(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<DomainEnvelope>, Failure> {
    let store = db.read().await;
    let domain = store.domains.get(&id).cloned().ok_or_else(Failure::not_found)?;
    Ok(Json(DomainEnvelope { domain }))
}

async fn delete_domain(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store.domains.remove(&id).ok_or_else(Failure::not_found)?;
    store.records.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_records(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<RecordsEnvelope>, Failure> {
    let store = db.read().await;
    if !store.domains.contains_key(&id) {
        return Err(Failure::not_found());
    }
    let domain_records = store
        .records
        .get(&id)
        .map(|records| records.values().cloned().collect())
        .unwrap_or_default();
    Ok(Json(RecordsEnvelope { domain_records }))
}

async fn create_record(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<RecordInput>,
) -> Result<(StatusCode, Json<RecordEnvelope>), Failure> {
    check_record_input(&input)?;
    let mut store = db.write().await;
    if !store.domains.contains_key(&id) {
        return Err(Failure::not_found());
    }
    let domain_record = store.insert_record(id, input);
    Ok((StatusCode::CREATED, Json(RecordEnvelope { domain_record })))
}

async fn get_record(
    State(db): State<Db>,
    Path((id, record_id)): Path<(u64, u64)>,
) -> Result<Json<RecordEnvelope>, Failure> {
    let store = db.read().await;
    let domain_record = store
        .records
        .get(&id)
        .and_then(|records| records.get(&record_id))
        .cloned()
        .ok_or_else(Failure::not_found)?;
    Ok(Json(RecordEnvelope { domain_record }))
}

async fn update_record(
    State(db): State<Db>,
    Path((id, record_id)): Path<(u64, u64)>,
    Json(input): Json<RecordInput>,
) -> Result<Json<RecordEnvelope>, Failure> {
    check_record_input(&input)?;
    let mut store = db.write().await;
    let record = store
        .records
        .get_mut(&id)
        .and_then(|records| records.get_mut(&record_id))
        .ok_or_else(Failure::not_found)?;
    record.record_type = input.record_type.to_ascii_uppercase();
    record.name = input.name;
    record.data = input.data;
    record.priority = input.priority;
    record.port = input.port;
    record.weight = input.weight;
    if let Some(ttl) = input.ttl {
        record.ttl = ttl;
    }
    Ok(Json(RecordEnvelope {
        domain_record: record.clone(),
    }))
}

async fn delete_record(
    State(db): State<Db>,
    Path((id, record_id)): Path<(u64, u64)>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .records
        .get_mut(&id)
        .and_then(|records| records.remove(&record_id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(Failure::not_found)
}

fn check_record_input(input: &RecordInput) -> Result<(), Failure> {
    if input.name.trim().is_empty() || input.data.trim().is_empty() {
        return Err(Failure::unprocessable("Name and data can't be blank"));
    }
    Ok(())
}

fn zone_file(name: &str, ip_address: &str) -> String {
    format!(
        "$ORIGIN {name}.\n$TTL {DEFAULT_TTL}\n{name}. IN SOA ns1.{name}. hostmaster.{name}. 1 10800 3600 604800 {DEFAULT_TTL}\n{name}. {DEFAULT_TTL} IN A {ip_address}\n"
    )
}
