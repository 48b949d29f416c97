use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::giving::GivingMethod;
use crate::domain::members::ParticipationStatus;

/// A validated member row ready for transactional insert. Household names are
/// resolved (created on demand) inside the same transaction as the inserts.
#[derive(Debug, Clone)]
pub struct MemberInsert {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub participation_status: ParticipationStatus,
    pub household_name: Option<String>,
}

/// A validated contribution row with the member already resolved. Fund names
/// are resolved (created on demand) inside the same transaction as the
/// inserts, so a failed batch leaves no orphan funds behind.
#[derive(Debug, Clone)]
pub struct ContributionInsert {
    pub member_id: Uuid,
    pub fund_name: String,
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    pub note: Option<String>,
}

/// Bulk inserts, each batch committed in a single transaction: either every
/// row in the batch lands or none does.
#[async_trait]
pub trait ImportRepository: Send + Sync {
    async fn insert_members(&self, church_id: Uuid, rows: &[MemberInsert])
    -> anyhow::Result<u64>;
    async fn insert_contributions(
        &self,
        church_id: Uuid,
        rows: &[ContributionInsert],
    ) -> anyhow::Result<u64>;
}
