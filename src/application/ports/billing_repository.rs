use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::billing::Subscription;

#[async_trait]
pub trait BillingRepository: Send + Sync {
    async fn get_subscription(&self, church_id: Uuid) -> anyhow::Result<Option<Subscription>>;
    async fn upsert_subscription(
        &self,
        church_id: Uuid,
        plan: &str,
        status: &str,
        processor_subscription_id: Option<&str>,
        current_period_end: Option<chrono::DateTime<chrono::Utc>>,
    ) -> anyhow::Result<Subscription>;
    /// Whether a processor event id has been recorded (replayed webhook).
    async fn has_event(&self, event_id: &str) -> anyhow::Result<bool>;
    /// Records a processor event id once the event has been applied. Returns
    /// false when the id was already recorded.
    async fn record_event(&self, event_id: &str) -> anyhow::Result<bool>;
}
