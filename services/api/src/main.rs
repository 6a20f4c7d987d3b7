use std::sync::Arc;

use tracing::info;

use bursary_api::config::ApiConfig;
use bursary_api::infra::mailer::{MailerConfig, SendGridNotifier};
use bursary_api::router::build_router;
use bursary_api::state::AppState;
use bursary_auth_types::token::TokenKeys;
use bursary_core::db::{DbSettings, connect};
use bursary_domain::workflow::ApprovalTable;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    bursary_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = connect(&DbSettings {
        url: config.database_url.clone(),
        max_connections: config.db_max_connections,
        acquire_timeout: config.db_acquire_timeout,
    })
    .await
    .expect("failed to connect to database");

    let notifier = SendGridNotifier::new(MailerConfig {
        api_key: config.sendgrid_api_key,
        url: config.sendgrid_url,
        from: config.mail_from,
        from_name: config.mail_from_name,
        activation_base_url: config.activation_base_url,
        max_retries: config.mail_max_retries,
    });

    let state = AppState {
        db,
        query_timeout: config.db_query_timeout,
        token_keys: TokenKeys {
            secret: config.jwt_secret,
            issuer: config.jwt_issuer,
            ttl_secs: config.jwt_ttl_secs,
        },
        approval_table: Arc::new(ApprovalTable::standard()),
        stage_policy: config.stage_policy,
        invitation_ttl: chrono::Duration::seconds(config.invitation_ttl_secs),
        password_cost: config.password_hash_cost,
        notifier,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(stage_policy = ?config.stage_policy, "bursary api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
