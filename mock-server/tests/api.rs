use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, DomainEnvelope, DomainsEnvelope, RecordEnvelope, RecordsEnvelope};
use tower::ServiceExt;

const TOKEN: &str = "Bearer test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/domains").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["id"], "unauthorized");
}

// --- domains ---

#[tokio::test]
async fn list_domains_empty() {
    let resp = app().oneshot(request("GET", "/domains")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: DomainsEnvelope = body_json(resp).await;
    assert!(envelope.domains.is_empty());
}

#[tokio::test]
async fn create_domain_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/domains",
            r#"{"name":"example.com","ip_address":"203.0.113.5"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: DomainEnvelope = body_json(resp).await;
    assert_eq!(envelope.domain.name, "example.com");
    assert_eq!(envelope.domain.ttl, 1800);
    assert!(envelope.domain.zone_file.contains("203.0.113.5"));
}

#[tokio::test]
async fn create_domain_missing_name_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/domains", r#"{"ip_address":"203.0.113.5"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_domain_not_found() {
    let resp = app().oneshot(request("GET", "/domains/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["id"], "not_found");
}

#[tokio::test]
async fn get_domain_bad_id_returns_400() {
    let resp = app().oneshot(request("GET", "/domains/not-a-number")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_domain_not_found() {
    let resp = app().oneshot(request("DELETE", "/domains/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- records ---

#[tokio::test]
async fn records_of_unknown_domain_return_404() {
    let resp = app().oneshot(request("GET", "/domains/99/records")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_record_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/domains/1/records/1",
            r#"{"type":"A","name":"www","data":"203.0.113.5"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn domain_and_record_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create domain
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/domains",
            r#"{"name":"example.com","ip_address":"203.0.113.5"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let domain = body_json::<DomainEnvelope>(resp).await.domain;
    let id = domain.id;

    // duplicate name is rejected
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/domains", r#"{"name":"example.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // apex A record was created with the domain
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/domains/{id}/records")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let records = body_json::<RecordsEnvelope>(resp).await.domain_records;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, "A");
    assert_eq!(records[0].name, "@");
    assert_eq!(records[0].data, "203.0.113.5");

    // create a CNAME
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/domains/{id}/records"),
            r#"{"type":"CNAME","name":"www","data":"example.com."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json::<RecordEnvelope>(resp).await.domain_record;
    assert_eq!(created.record_type, "CNAME");
    let record_id = created.id;

    // update it with a full record body
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/domains/{id}/records/{record_id}"),
            &format!(r#"{{"id":{record_id},"type":"CNAME","name":"www","data":"other.example.com.","ttl":300}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json::<RecordEnvelope>(resp).await.domain_record;
    assert_eq!(updated.id, record_id);
    assert_eq!(updated.data, "other.example.com.");
    assert_eq!(updated.ttl, 300);

    // delete the record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/domains/{id}/records/{record_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/domains/{id}/records/{record_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete the domain, which takes its records with it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/domains/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/domains/{id}/records")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/domains"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json::<DomainsEnvelope>(resp).await.domains.is_empty());
}
