use std::sync::Arc;
use std::time::Duration;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::{Json, Router, routing::get};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use bursary_api::infra::mailer::{MailerConfig, SendGridNotifier};
use bursary_api::router::build_router;
use bursary_api::state::AppState;
use bursary_auth_types::identity::Identity;
use bursary_auth_types::token::{TokenKeys, issue_token};
use bursary_domain::principal::PrincipalKind;
use bursary_domain::workflow::{ApprovalTable, StagePolicy};
use bursary_testing::auth::{MockAuth, test_token_keys};

fn test_state() -> AppState {
    AppState {
        db: DatabaseConnection::Disconnected,
        query_timeout: Duration::from_secs(1),
        token_keys: test_token_keys(),
        approval_table: Arc::new(ApprovalTable::standard()),
        stage_policy: StagePolicy::Lenient,
        invitation_ttl: chrono::Duration::days(3),
        password_cost: 4,
        notifier: SendGridNotifier::new(MailerConfig {
            api_key: "test".to_owned(),
            url: "http://127.0.0.1:9/v3/mail/send".to_owned(),
            from: "noreply@example.com".to_owned(),
            from_name: "Bursary Portal".to_owned(),
            activation_base_url: "http://localhost:5173".to_owned(),
            max_retries: 1,
        }),
    }
}

fn server() -> TestServer {
    TestServer::new(build_router(test_state())).unwrap()
}

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let response = server().get("/healthz").await;

    response.assert_status_ok();
    let request_id = response.header("x-request-id");
    let request_id = request_id.to_str().unwrap();
    assert!(
        request_id.parse::<Uuid>().is_ok(),
        "expected uuid request id, got {request_id}"
    );
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    server()
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_require_bearer_token_on_protected_routes() {
    let server = server();
    for path in ["/admins", "/roles", "/bursaries", "/applications", "/students/me/personal"] {
        server
            .get(path)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
    server
        .post("/approve")
        .json(&serde_json::json!({ "id": Uuid::now_v7() }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_token_signed_for_another_issuer() {
    let foreign = TokenKeys {
        secret: test_token_keys().secret,
        issuer: "someone-else".to_owned(),
        ttl_secs: 600,
    };
    let issued = issue_token(Uuid::now_v7(), PrincipalKind::Admin, &foreign).unwrap();

    server()
        .get("/admins")
        .authorization_bearer(issued.token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_resolve_identity_from_mock_bearer() {
    async fn whoami(identity: Identity) -> Json<(Uuid, PrincipalKind)> {
        Json((identity.principal_id, identity.kind))
    }
    let app = Router::<TokenKeys>::new()
        .route("/whoami", get(whoami))
        .with_state(test_token_keys());
    let server = TestServer::new(app).unwrap();

    let id = Uuid::now_v7();
    let auth = MockAuth::student(id);
    let response = server
        .get("/whoami")
        .add_header(AUTHORIZATION, HeaderValue::from_str(&auth.bearer()).unwrap())
        .await;

    response.assert_status_ok();
    response.assert_json(&(id, PrincipalKind::Student));
}
