use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::giving::{Contribution, Fund, GivingMethod};

#[derive(Debug, Clone)]
pub struct NewContribution {
    pub member_id: Uuid,
    pub fund_id: Uuid,
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GivingFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub fund_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

/// One statement line: a dated gift to a fund by a household member.
#[derive(Debug, Clone)]
pub struct StatementLineRow {
    pub received_on: NaiveDate,
    pub fund_name: String,
    pub member_name: String,
    pub amount: Decimal,
}

#[async_trait]
pub trait GivingRepository: Send + Sync {
    async fn create_fund(
        &self,
        church_id: Uuid,
        name: &str,
        tax_deductible: bool,
    ) -> anyhow::Result<Fund>;
    async fn list_funds(&self, church_id: Uuid) -> anyhow::Result<Vec<Fund>>;
    async fn find_fund(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Fund>>;
    async fn get_or_create_fund(&self, church_id: Uuid, name: &str) -> anyhow::Result<Fund>;
    async fn create_contribution(
        &self,
        church_id: Uuid,
        new: &NewContribution,
    ) -> anyhow::Result<Contribution>;
    async fn list_contributions(
        &self,
        church_id: Uuid,
        filter: &GivingFilter,
    ) -> anyhow::Result<Vec<Contribution>>;
    async fn sum_contributions(
        &self,
        church_id: Uuid,
        filter: &GivingFilter,
    ) -> anyhow::Result<Decimal>;
    /// Tax-deductible totals per household for a calendar year. Households
    /// with no deductible giving do not appear.
    async fn deductible_totals_by_household(
        &self,
        church_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<(Uuid, Decimal)>>;
    /// Deductible line items for one household and year, ordered by date.
    async fn statement_lines(
        &self,
        church_id: Uuid,
        household_id: Uuid,
        year: i32,
    ) -> anyhow::Result<Vec<StatementLineRow>>;
}
