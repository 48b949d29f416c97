use async_trait::async_trait;

use crate::application::ports::mail_gateway::{MailGateway, OutboundEmail};

/// Sends through a transactional-mail HTTP API.
pub struct HttpMailGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailGateway {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl MailGateway for HttpMailGateway {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "text": email.body,
        });
        let resp = self
            .client
            .post(format!("{}/messages", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("mail send failed: {status}");
        }
        Ok(())
    }
}

/// Logs instead of sending; used when no mail credentials are configured.
pub struct LogMailGateway;

#[async_trait]
impl MailGateway for LogMailGateway {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, "mail_not_configured_logging_only");
        Ok(())
    }
}
