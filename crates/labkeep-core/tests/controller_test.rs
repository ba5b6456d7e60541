// Coordinator and session tests against a wiremock server.
#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use labkeep_core::{
    ClientConfig, Controller, CoreError, ErrorCategory, NewTask, NoticeLevel, Notice, TaskScope,
    User, ViewScope,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(
        url::Url::parse(&server.uri()).unwrap(),
        SecretString::from("lab-key".to_owned()),
    );
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

fn sign_in(controller: &Controller) {
    controller.session().restore(
        SecretString::from("tok-123".to_owned()),
        User {
            id: 7,
            username: "prof".into(),
            role: None,
            is_active: true,
        },
    );
}

fn lab_json(id: &str) -> serde_json::Value {
    json!({
        "lab_id": id,
        "lab_name": format!("Lab {id}"),
        "classes": "1A,2B",
        "student_count": 30,
        "machine_count": 12,
        "user_count": 2,
        "task_count": 4
    })
}

fn task_json(id: i64, name: &str, done: bool) -> serde_json::Value {
    json!({
        "task_id": id,
        "task_name": name,
        "task_description": "",
        "is_complete": done,
        "task_creation": "2025-06-28",
        "machine_keys": ["KEY-1"],
        "machine_names": ["PC-01"]
    })
}

// ── Session store ───────────────────────────────────────────────────

#[tokio::test]
async fn login_stores_token_and_profile() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-abc", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user_id": 7, "username": "prof", "is_active": true})),
        )
        .mount(&server)
        .await;

    let user = controller
        .login("prof", &SecretString::from("s3cret".to_owned()))
        .await
        .unwrap();
    assert_eq!(user.username, "prof");
    let token = controller.session().current_token().unwrap();
    assert_eq!(token.expose_secret(), "tok-abc");

    assert!(controller.logout());
    assert!(controller.session().current_token().is_none());
    assert!(controller.session().current_user().is_none());
}

#[tokio::test]
async fn bad_credentials_store_nothing() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .login("prof", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Auth);
    assert!(err.to_string().contains("Incorrect username or password"));
    assert!(controller.session().current_token().is_none());
}

#[tokio::test]
async fn failed_profile_fetch_stores_nothing() {
    let (server, controller) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(
        controller
            .login("prof", &SecretString::from("pw".to_owned()))
            .await
            .is_err()
    );
    assert!(!controller.session().is_signed_in());
}

// ── Machine coordinator ─────────────────────────────────────────────

#[tokio::test]
async fn invalid_cleanliness_is_never_sent() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .machines()
        .update_cleanliness("KEY-1", "LIMPO")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[tokio::test]
async fn invalid_date_rejected_even_when_signed_out() {
    let (server, controller) = setup().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .machines()
        .update_last_check("KEY-1", "2025-06-28")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation {
            field: "last_checked",
            ..
        }
    ));
}

#[tokio::test]
async fn accepted_date_is_echoed_into_the_view() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("GET"))
        .and(path("/machine_config/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "PC-01",
            "motherboard": "B450M",
            "memory": "16GB",
            "storage": "SSD",
            "state_cleanliness": "BOM",
            "last_checked": "2025-01-10",
            "lab_id": "LAB01"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/machine/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/machine/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "Limpar", false),
            task_json(2, "Formatar", true)
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/machine_config/update/KEY-1/last_check"))
        .and(header("api-key", "lab-key"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({"last_checked": "28/06/2025"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Data atualizada"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let scope = ViewScope::new();
    let mut view = controller.load_machine_view("KEY-1", 1, &scope).await.unwrap();
    assert_eq!(view.pending.len(), 1);
    assert_eq!(view.sessions.total_pages, 1);

    let update = controller
        .machines()
        .update_last_check("KEY-1", "28/06/2025")
        .await
        .unwrap();
    assert_eq!(update.message, "Data atualizada");

    view.patch_last_check(&update);
    assert_eq!(
        view.machine.last_checked.unwrap().to_string(),
        "28/06/2025"
    );
}

#[tokio::test]
async fn cleanliness_update_rereads_machine() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("PATCH"))
        .and(path("/machine_config/update/KEY-1/state_cleanliness"))
        .and(body_json(json!({"state_cleanliness": "URGENTE"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/machine_config/KEY-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "PC-01",
            "state_cleanliness": "URGENTE"
        })))
        .mount(&server)
        .await;

    let outcome = controller
        .machines()
        .update_cleanliness("KEY-1", "urgente")
        .await
        .unwrap();
    let machine = outcome.fresh().unwrap();
    assert_eq!(machine.machine_key, "KEY-1");
    assert_eq!(machine.state_cleanliness.to_string(), "URGENTE");
}

// ── Task coordinator ────────────────────────────────────────────────

#[tokio::test]
async fn completing_a_complete_task_is_a_conflict() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("PATCH"))
        .and(path("/tasks/complete/2"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"detail": "Task already completed"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/lab/LAB01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = controller
        .tasks()
        .complete_task(2, &TaskScope::Lab("LAB01".into()))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);
    assert_eq!(Notice::from_error(&err).level, NoticeLevel::Info);
}

#[tokio::test]
async fn create_task_refetches_and_finds_new_task() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("POST"))
        .and(path("/tasks/new"))
        .and(body_json(json!({
            "lab_id": "LAB01",
            "task_name": "Trocar teclado",
            "task_description": "Teclas soltas",
            "machines": ["KEY-1", "KEY-2"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Tarefa criada com sucesso"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/lab/LAB01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "Limpar", false),
            task_json(5, "Trocar teclado", false)
        ])))
        .mount(&server)
        .await;

    let created = controller
        .tasks()
        .create_task(NewTask {
            lab_id: "LAB01".into(),
            name: "Trocar teclado".into(),
            description: "Teclas soltas".into(),
            machine_keys: vec!["KEY-1".into(), "KEY-2".into(), "KEY-1".into()],
        })
        .await
        .unwrap();
    assert_eq!(created.outcome.message, "Tarefa criada com sucesso");
    assert_eq!(created.task.unwrap().task_id, 5);
    assert_eq!(created.outcome.fresh().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_refresh_is_downgraded_to_warning() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("PATCH"))
        .and(path("/tasks/complete/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Concluída"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/machine/KEY-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = controller
        .tasks()
        .complete_task(1, &TaskScope::Machine("KEY-1".into()))
        .await
        .unwrap();
    let levels: Vec<NoticeLevel> = outcome.notices().iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![NoticeLevel::Success, NoticeLevel::Warning]);
}

#[tokio::test]
async fn task_reads_require_sign_in() {
    let (_server, controller) = setup().await;
    let err = controller.list_lab_tasks("LAB01").await.unwrap_err();
    assert!(matches!(err, CoreError::NotSignedIn));
}

// ── Labs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn joining_twice_leaves_lab_list_unchanged() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("GET"))
        .and(path("/users/me/labs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([lab_json("LAB01"), lab_json("LAB02")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/lab/join/LAB01"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"detail": "Usuário já está no laboratório"})),
        )
        .mount(&server)
        .await;

    let before = controller.list_my_labs().await.unwrap();
    let err = controller.join_lab("LAB01").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Conflict);
    let after = controller.list_my_labs().await.unwrap();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn lab_overview_previews_pending_tasks() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("GET"))
        .and(path("/lab/LAB01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lab_json("LAB01")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/lab/LAB01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "a", false),
            task_json(2, "b", true),
            task_json(3, "c", false),
            task_json(4, "d", false),
            task_json(5, "e", false)
        ])))
        .mount(&server)
        .await;

    let overview = controller
        .load_lab_overview("LAB01", &ViewScope::new())
        .await
        .unwrap();
    let ids: Vec<i64> = overview.pending.iter().map(|t| t.task_id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert_eq!(overview.pending_total, 4);
    assert_eq!(overview.summary.machines, 12);
    assert_eq!(overview.summary.tasks, 4);
}

#[tokio::test]
async fn torn_down_view_never_delivers() {
    let (_server, controller) = setup().await;
    let scope = ViewScope::new();
    scope.teardown();

    let err = controller
        .load_lab_roster("LAB01", &scope)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Cancelled));
}

#[tokio::test]
async fn user_lookup_sends_bearer_token() {
    let (server, controller) = setup().await;
    sign_in(&controller);

    Mock::given(method("GET"))
        .and(path("/users/3"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 3, "username": "colega", "is_active": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = controller.get_user(3).await.unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.username, "colega");
    assert!(!user.is_active);
}
