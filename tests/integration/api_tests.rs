//! API integration tests against a running server.
//!
//! Start the server with its database, then run `cargo test -- --ignored`.
//! Tokens are signed with `JWT_SECRET` (or the default development secret).

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

use epi_control_server::models::UserClaims;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Token for a fresh user id, as the hosted auth provider would issue it
fn user_token(user_id: Uuid) -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let mut claims = UserClaims::new(user_id, Some("tester@example.com".to_string()), 3600);
    claims.aud = Some("authenticated".to_string());
    claims.create_token(&secret).expect("Failed to sign token")
}

async fn create_epi(client: &Client, name: &str, expiration: &str) -> Value {
    let response = client
        .post(format!("{}/epis", BASE_URL))
        .json(&json!({
            "nome": name,
            "validade": expiration,
            "ca": "45678",
            "tipo": "Proteção respiratória",
            "uso": "Poeiras e névoas",
            "fabricante": "Delta Plus",
            "entrega": "2024-02-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_epi_crud() {
    let client = Client::new();
    let epi = create_epi(&client, "Respirador semifacial", "2031-03-10").await;
    let id = epi["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/epis/{}/ca", BASE_URL, id))
        .json(&json!({ "ca": "45679", "validade": "2033-03-10" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let renewed: Value = response.json().await.unwrap();
    assert_eq!(renewed["ca"], "45679");
    assert_eq!(renewed["validade"], "2033-03-10");

    let response = client
        .delete(format!("{}/epis/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/epis/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_assignment_flow() {
    let client = Client::new();
    let epi = create_epi(&client, "Luva de vaqueta", "2031-01-01").await;

    let response = client
        .post(format!("{}/employees", BASE_URL))
        .json(&json!({
            "nome": "Carlos Pereira",
            "cpf": "111.222.333-44",
            "cargo": "Eletricista",
            "setor": "Manutenção"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let employee: Value = response.json().await.unwrap();

    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .json(&json!({ "epiId": epi["id"], "funcionarioId": employee["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let link: Value = response.json().await.unwrap();

    let response = client
        .get(format!("{}/employees/{}/epis", BASE_URL, employee["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    let holdings: Value = response.json().await.unwrap();
    assert_eq!(holdings["count"], 1);
    assert_eq!(holdings["items"][0]["assignment_id"], link["id"]);

    let response = client
        .delete(format!("{}/assignments/{}", BASE_URL, link["id"].as_str().unwrap()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_support_ticket_flow() {
    let client = Client::new();
    let token = user_token(Uuid::new_v4());

    let response = client
        .post(format!("{}/support/tickets", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Tester",
            "email": "tester@example.com",
            "subject": "Não consigo cadastrar um EPI"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let ticket: Value = response.json().await.unwrap();
    assert_eq!(ticket["status"], "open");
    let ticket_id = ticket["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/support/tickets/{}/messages", BASE_URL, ticket_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "message": "O botão salvar não responde" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let message: Value = response.json().await.unwrap();
    assert_eq!(message["is_admin"], false);

    let response = client
        .get(format!("{}/support/tickets/{}/messages", BASE_URL, ticket_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    let messages: Value = response.json().await.unwrap();
    assert_eq!(messages.as_array().unwrap().len(), 1);

    // Another user cannot read it
    let other = user_token(Uuid::new_v4());
    let response = client
        .get(format!("{}/support/tickets/{}", BASE_URL, ticket_id))
        .header("Authorization", format!("Bearer {}", other))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_ticket_list_requires_admin() {
    let client = Client::new();
    let token = user_token(Uuid::new_v4());

    let response = client
        .get(format!("{}/support/tickets", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_empty_message_rejected() {
    let client = Client::new();
    let token = user_token(Uuid::new_v4());

    let response = client
        .post(format!("{}/support/tickets/{}/messages", BASE_URL, Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "message": "   " }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
