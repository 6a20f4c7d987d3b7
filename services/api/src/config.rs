use std::time::Duration;

use bursary_domain::workflow::StagePolicy;

use crate::domain::types::DEFAULT_INVITATION_TTL_SECS;

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Pool size (default 30). Env var: `DB_MAX_CONNECTIONS`.
    pub db_max_connections: u32,
    /// Wait for a pooled connection (default 3s). Env var: `DB_ACQUIRE_TIMEOUT_SECS`.
    pub db_acquire_timeout: Duration,
    /// Deadline for a single store call (default 5s). Env var: `DB_QUERY_TIMEOUT_SECS`.
    pub db_query_timeout: Duration,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// `iss` claim of issued tokens (default "bursary").
    pub jwt_issuer: String,
    /// Bearer token lifetime in seconds (default 3600).
    pub jwt_ttl_secs: u64,
    /// Activation link lifetime in seconds (default 3 days).
    pub invitation_ttl_secs: i64,
    /// Front-end origin that activation links point at (e.g. "https://portal.example.com").
    pub activation_base_url: String,
    pub sendgrid_api_key: String,
    /// Default "https://api.sendgrid.com/v3/mail/send".
    pub sendgrid_url: String,
    pub mail_from: String,
    pub mail_from_name: String,
    /// Delivery attempts before giving up (default 3).
    pub mail_max_retries: u32,
    /// `lenient` (default) or `sequential`. Env var: `STAGE_POLICY`.
    pub stage_policy: StagePolicy,
    /// bcrypt cost (default `bcrypt::DEFAULT_COST`).
    pub password_hash_cost: u32,
    /// TCP port to listen on (default 3000). Env var: `API_PORT`.
    pub api_port: u16,
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 30),
            db_acquire_timeout: Duration::from_secs(parsed("DB_ACQUIRE_TIMEOUT_SECS", 3)),
            db_query_timeout: Duration::from_secs(parsed("DB_QUERY_TIMEOUT_SECS", 5)),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            jwt_issuer: or_default("JWT_ISSUER", "bursary"),
            jwt_ttl_secs: parsed("JWT_TTL_SECS", 3600),
            invitation_ttl_secs: parsed("INVITATION_TTL_SECS", DEFAULT_INVITATION_TTL_SECS),
            activation_base_url: std::env::var("ACTIVATION_BASE_URL").expect("ACTIVATION_BASE_URL"),
            sendgrid_api_key: std::env::var("SENDGRID_API_KEY").expect("SENDGRID_API_KEY"),
            sendgrid_url: or_default("SENDGRID_URL", "https://api.sendgrid.com/v3/mail/send"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            mail_from_name: or_default("MAIL_FROM_NAME", "Bursary Portal"),
            mail_max_retries: parsed("MAIL_MAX_RETRIES", 3),
            stage_policy: std::env::var("STAGE_POLICY")
                .map(|v| {
                    v.parse::<StagePolicy>()
                        .expect("STAGE_POLICY must be lenient or sequential")
                })
                .unwrap_or_default(),
            password_hash_cost: parsed("PASSWORD_HASH_COST", bcrypt::DEFAULT_COST),
            api_port: parsed("API_PORT", 3000),
        }
    }
}
