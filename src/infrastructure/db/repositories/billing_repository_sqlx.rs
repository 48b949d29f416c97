use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::billing_repository::BillingRepository;
use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::tenancy::PlanTier;
use crate::infrastructure::db::PgPool;

pub struct SqlxBillingRepository {
    pub pool: PgPool,
}

impl SqlxBillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_subscription(row: &sqlx::postgres::PgRow) -> Subscription {
    let plan: String = row.get("plan");
    let status: String = row.get("status");
    Subscription {
        id: row.get("id"),
        church_id: row.get("church_id"),
        plan: PlanTier::parse(&plan).unwrap_or(PlanTier::Starter),
        status: SubscriptionStatus::parse(&status).unwrap_or(SubscriptionStatus::Active),
        processor_subscription_id: row.try_get("processor_subscription_id").ok(),
        current_period_end: row.try_get("current_period_end").ok(),
        updated_at: row.get("updated_at"),
    }
}

const SUBSCRIPTION_COLS: &str =
    "id, church_id, plan, status, processor_subscription_id, current_period_end, updated_at";

#[async_trait]
impl BillingRepository for SqlxBillingRepository {
    async fn get_subscription(&self, church_id: Uuid) -> anyhow::Result<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {SUBSCRIPTION_COLS} FROM subscriptions WHERE church_id = $1"
        ))
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_subscription))
    }

    async fn upsert_subscription(
        &self,
        church_id: Uuid,
        plan: &str,
        status: &str,
        processor_subscription_id: Option<&str>,
        current_period_end: Option<chrono::DateTime<chrono::Utc>>,
    ) -> anyhow::Result<Subscription> {
        let row = sqlx::query(&format!(
            "INSERT INTO subscriptions (church_id, plan, status, processor_subscription_id,
                                        current_period_end)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (church_id) DO UPDATE SET
                 plan = EXCLUDED.plan,
                 status = EXCLUDED.status,
                 processor_subscription_id =
                     COALESCE(EXCLUDED.processor_subscription_id,
                              subscriptions.processor_subscription_id),
                 current_period_end = EXCLUDED.current_period_end,
                 updated_at = now()
             RETURNING {SUBSCRIPTION_COLS}"
        ))
        .bind(church_id)
        .bind(plan)
        .bind(status)
        .bind(processor_subscription_id)
        .bind(current_period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_subscription(&row))
    }

    async fn has_event(&self, event_id: &str) -> anyhow::Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM webhook_events WHERE id = $1) AS seen")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("seen"))
    }

    async fn record_event(&self, event_id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("INSERT INTO webhook_events (id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
