use std::time::Duration;

use anyhow::{Context as _, anyhow};
use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::domain::repository::Notifier;
use crate::domain::types::InvitationMail;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_key: String,
    pub url: String,
    pub from: String,
    pub from_name: String,
    /// Front-end origin that activation links point at.
    pub activation_base_url: String,
    pub max_retries: u32,
}

/// Sends activation links through the SendGrid v3 mail API.
#[derive(Debug, Clone)]
pub struct SendGridNotifier {
    config: MailerConfig,
    http: Client,
}

impl SendGridNotifier {
    pub fn new(config: MailerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn activation_link(&self, mail: &InvitationMail) -> String {
        format!(
            "{}/{}s/activate/{}",
            self.config.activation_base_url.trim_end_matches('/'),
            mail.kind,
            mail.token
        )
    }

    async fn send_once(&self, body: &serde_json::Value) -> anyhow::Result<()> {
        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .context("send mail request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("mail provider responded {status}: {text}"));
        }
        Ok(())
    }

    /// SendGrid request body. The plain-text part comes first, as the API requires.
    fn invitation_body(&self, mail: &InvitationMail) -> serde_json::Value {
        let link = self.activation_link(mail);
        let html = format!(
            "<p>Hello {},</p><p>Activate your account here: <a href=\"{href}\">{href}</a></p>",
            escape_html(&mail.recipient_name),
            href = escape_html(&link),
        );
        let text = format!(
            "Hello {},\n\nActivate your account here: {link}\n",
            mail.recipient_name
        );
        json!({
            "personalizations": [{
                "to": [{ "email": mail.email, "name": mail.recipient_name }],
            }],
            "from": { "email": self.config.from, "name": self.config.from_name },
            "subject": "Activate your bursary portal account",
            "content": [
                { "type": "text/plain", "value": text },
                { "type": "text/html", "value": html },
            ],
        })
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Notifier for SendGridNotifier {
    async fn send_invitation(&self, mail: &InvitationMail) -> Result<(), ApiError> {
        let body = self.invitation_body(mail);

        let attempts = self.config.max_retries.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.send_once(&body).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "invitation mail delivery failed");
                    last_error = Some(e);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(Duration::from_secs(u64::from(attempt))).await;
            }
        }
        let err = last_error.unwrap_or_else(|| anyhow!("no delivery attempt made"));
        Err(ApiError::NotificationFailed(err))
    }
}
