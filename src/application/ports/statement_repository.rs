use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::giving::GivingStatement;

#[async_trait]
pub trait StatementRepository: Send + Sync {
    async fn upsert_statement(
        &self,
        church_id: Uuid,
        household_id: Uuid,
        year: i32,
        total_amount: Decimal,
    ) -> anyhow::Result<GivingStatement>;
    async fn list_statements(
        &self,
        church_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<GivingStatement>>;
}
