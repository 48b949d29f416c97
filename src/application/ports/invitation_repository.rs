use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InvitationRow {
    pub id: Uuid,
    pub church_id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub accepted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create_invitation(
        &self,
        church_id: Uuid,
        email: &str,
        role: &str,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<InvitationRow>;
    async fn list_pending(&self, church_id: Uuid) -> anyhow::Result<Vec<InvitationRow>>;
    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<InvitationRow>>;
    /// Conditional update; returns false when the invitation was already
    /// accepted by a concurrent request.
    async fn mark_accepted(&self, id: Uuid) -> anyhow::Result<bool>;
}
