//! In-process router tests over the in-memory inventory store.
//!
//! No database is contacted: the Postgres pool is created lazily and only
//! the inventory and authentication paths are exercised.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use epi_control_server::{
    api::create_router,
    config::AppConfig,
    models::UserClaims,
    repository::{kv::MemoryStore, Repository},
    services::Services,
    AppState,
};

async fn app() -> Router {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let repository = Repository::new(pool, Arc::new(MemoryStore::new()));
    let services = Services::new(repository, &config.expiration)
        .await
        .expect("services");
    create_router(AppState::new(config, services))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_epi(app: &Router, name: &str, expiration: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/epis",
        Some(json!({
            "nome": name,
            "validade": expiration,
            "ca": "12345",
            "tipo": "Proteção auditiva",
            "uso": "Áreas com ruído acima de 85 dB",
            "fabricante": "3M",
            "entrega": "2024-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_employee(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/employees",
        Some(json!({
            "nome": name,
            "cpf": "12345678901",
            "cargo": "Soldador",
            "setor": "Manutenção"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_list_epis() {
    let app = app().await;
    let epi = create_epi(&app, "Protetor auricular", "2030-12-31").await;
    assert_eq!(epi["nome"], "Protetor auricular");
    assert!(epi["id"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/v1/epis", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_epi_with_bad_date() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/epis",
        Some(json!({
            "nome": "Capacete",
            "validade": "31/12/2030",
            "ca": "999",
            "tipo": "Proteção da cabeça",
            "uso": "Obras",
            "fabricante": "MSA",
            "entrega": "2024-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn test_missing_epi_is_not_found() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/v1/epis/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expiration_reports_with_reference_date() {
    let app = app().await;
    create_epi(&app, "Luva nitrílica", "2024-05-22").await;
    create_epi(&app, "Óculos de proteção", "2024-06-15").await;
    create_epi(&app, "Bota de segurança", "2025-01-01").await;

    let (status, expired) = send(&app, Method::GET, "/api/v1/epis/expired?date=2024-06-01", None).await;
    assert_eq!(status, StatusCode::OK);
    let expired = expired.as_array().unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["epi"]["nome"], "Luva nitrílica");
    assert_eq!(expired[0]["days_overdue"], 10);

    let (status, expiring) = send(&app, Method::GET, "/api/v1/epis/expiring?date=2024-06-01", None).await;
    assert_eq!(status, StatusCode::OK);
    let expiring = expiring.as_array().unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0]["epi"]["nome"], "Óculos de proteção");
    assert_eq!(expiring[0]["days_remaining"], 14);
}

#[tokio::test]
async fn test_report_rejects_bad_reference_date() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/v1/epis/expired?date=junho", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employee_cpf_is_formatted() {
    let app = app().await;
    let employee = create_employee(&app, "Maria Souza").await;
    assert_eq!(employee["cpf"], "123.456.789-01");
}

#[tokio::test]
async fn test_assign_and_unassign() {
    let app = app().await;
    let epi = create_epi(&app, "Máscara PFF2", "2030-01-01").await;
    let employee = create_employee(&app, "João Lima").await;
    let epi_id = epi["id"].as_str().unwrap();
    let employee_id = employee["id"].as_str().unwrap();

    let (status, link) = send(
        &app,
        Method::POST,
        "/api/v1/assignments",
        Some(json!({ "epiId": epi_id, "funcionarioId": employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["epiId"], epi_id);
    assert!(link["dataEntrega"].is_string());

    let (_, holders) = send(&app, Method::GET, &format!("/api/v1/epis/{}/holders", epi_id), None).await;
    assert_eq!(holders["holders"], json!(["João Lima"]));

    let (status, holdings) = send(
        &app,
        Method::GET,
        &format!("/api/v1/employees/{}/epis?date=2029-12-20", employee_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holdings["count"], 1);
    assert_eq!(holdings["items"][0]["status"]["status"], "expiring_soon");

    let link_id = link["id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/assignments/{}", link_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, links) = send(&app, Method::GET, "/api/v1/assignments", None).await;
    assert!(links.as_array().unwrap().is_empty());

    // Unassigning again still succeeds
    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/assignments/{}", link_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_assign_unknown_employee() {
    let app = app().await;
    let epi = create_epi(&app, "Cinto de segurança", "2030-01-01").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/assignments",
        Some(json!({ "epiId": epi["id"], "funcionarioId": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_employee_leaves_link_but_no_holder() {
    let app = app().await;
    let epi = create_epi(&app, "Avental de raspa", "2030-01-01").await;
    let employee = create_employee(&app, "Ana Costa").await;
    let epi_id = epi["id"].as_str().unwrap();

    send(
        &app,
        Method::POST,
        "/api/v1/assignments",
        Some(json!({ "epiId": epi_id, "funcionarioId": employee["id"] })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/employees/{}", employee["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, links) = send(&app, Method::GET, "/api/v1/assignments", None).await;
    assert_eq!(links.as_array().unwrap().len(), 1);

    let (_, holders) = send(&app, Method::GET, &format!("/api/v1/epis/{}/holders", epi_id), None).await;
    assert_eq!(holders["holders"], json!([]));
}

#[tokio::test]
async fn test_support_requires_token() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/support/tickets", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/support/tickets")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_support_message_rejected() {
    let app = app().await;
    let secret = AppConfig::default().auth.jwt_secret;
    let token = UserClaims::new(Uuid::new_v4(), None, 3600)
        .create_token(&secret)
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/api/v1/support/tickets/{}/messages", Uuid::new_v4()))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "message": "   " }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 5);
}
