use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailGateway: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> anyhow::Result<()>;
}
