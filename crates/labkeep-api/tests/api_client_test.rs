// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labkeep_api::models::{LabCreate, TaskCreate};
use labkeep_api::{ApiClient, CredentialMode, Error, Request, SessionScope};

// ── Helpers ─────────────────────────────────────────────────────────

const ACCESS_KEY: &str = "lab-access-key";

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        &server.uri(),
        &SecretString::from(ACCESS_KEY.to_owned()),
        reqwest::Client::new(),
    )
    .unwrap();
    (server, client)
}

fn token() -> SecretString {
    SecretString::from("tok-123".to_owned())
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_exchange_is_form_encoded() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=prof"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .request_token("prof", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();
    assert_eq!(resp.access_token, "tok-123");
}

#[tokio::test]
async fn test_access_key_reads_send_api_key_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lab/LAB01"))
        .and(header("api-key", ACCESS_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lab_id": "LAB01",
            "lab_name": "Informática",
            "classes": "1A,2B",
            "student_count": 30,
            "machine_count": 12,
            "user_count": 2,
            "task_count": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lab = client.get_lab("LAB01").await.unwrap();
    assert_eq!(lab.lab_name, "Informática");
    assert_eq!(lab.classes, vec!["1A", "2B"]);
    assert_eq!(lab.machine_count, 12);
}

#[tokio::test]
async fn test_writes_send_both_credentials() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/lab/new_lab"))
        .and(header("api-key", ACCESS_KEY))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({"lab_id": "LAB02", "lab_name": "Robótica", "classes": "3A"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Lab criado com sucesso"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client
        .create_lab(
            &token(),
            &LabCreate {
                lab_id: "LAB02".into(),
                lab_name: "Robótica".into(),
                classes: "3A".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(ack.message.as_deref(), Some("Lab criado com sucesso"));
}

#[tokio::test]
async fn test_missing_token_never_reaches_server() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let request = Request::get(&["users", "me", ""], CredentialMode::Token);
    let err = client
        .dispatch::<serde_json::Value>(request, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingToken));
}

#[tokio::test]
async fn test_profile_path_keeps_trailing_slash() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user_id": 7, "username": "prof", "is_active": true})),
        )
        .mount(&server)
        .await;

    let user = client.current_user(&token()).await.unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.username, "prof");
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_login_failure_uses_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let err = client
        .request_token("prof", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => {
            assert_eq!(message, "Incorrect username or password");
        }
        other => panic!("expected Authentication, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_failure_without_detail_uses_generic_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .request_token("prof", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    match err {
        Error::Authentication { message } => {
            assert_eq!(message, labkeep_api::auth::LOGIN_FAILED);
        }
        other => panic!("expected Authentication, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_task_is_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks/new"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "Tarefa criada já existe"})),
        )
        .mount(&server)
        .await;

    let err = client
        .create_task(
            &token(),
            &TaskCreate {
                lab_id: "LAB01".into(),
                task_name: "Limpar teclados".into(),
                task_description: String::new(),
                machines: vec!["KEY-1".into()],
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "Conflict: Tarefa criada já existe");
}

#[tokio::test]
async fn test_server_error_without_body_uses_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/lab/LAB01/machines"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list_lab_machines("LAB01").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "request failed with status 500 Internal Server Error");
        }
        other => panic!("expected Api, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_json_carries_body_preview() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/machine_config/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_machine("KEY-1").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_body_preview_respects_char_boundaries() {
    let (server, client) = setup().await;

    // 'ç' occupies bytes 199..201
    let body = format!("{}ção e mais texto", "a".repeat(199));
    Mock::given(method("GET"))
        .and(path("/lab/LAB01"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let err = client.get_lab("LAB01").await.unwrap_err();
    match err {
        Error::Deserialization { message, body: raw } => {
            assert_eq!(raw, body);
            assert!(message.contains("body preview"), "{message}");
        }
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

// ── Resources ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_machine_fills_in_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/machine_config/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "PC-01",
            "motherboard": "B450M",
            "memory": "16GB",
            "storage": "SSD 480GB",
            "state_cleanliness": "REGULAR",
            "last_checked": "2025-06-28",
            "lab_id": "LAB01"
        })))
        .mount(&server)
        .await;

    let machine = client.get_machine("KEY-1").await.unwrap();
    assert_eq!(machine.machine_key.as_deref(), Some("KEY-1"));
    assert_eq!(machine.machine_name, "PC-01");
    assert_eq!(machine.state_cleanliness, "REGULAR");
}

#[tokio::test]
async fn test_empty_session_history_is_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/session/student/42"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"detail": "Nenhuma sessão foi encontrada."})),
        )
        .mount(&server)
        .await;

    let sessions = client.list_sessions(SessionScope::Student(42)).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_complete_task_tolerates_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/complete/9"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ack = client.complete_task(&token(), 9).await.unwrap();
    assert!(ack.message.is_none());
}

#[tokio::test]
async fn test_cleanliness_body_shape() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/machine_config/update/KEY-1/state_cleanliness"))
        .and(body_json(json!({"state_cleanliness": "URGENTE"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_cleanliness(&token(), "KEY-1", "URGENTE")
        .await
        .unwrap();
}
