use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::ports::giving_repository::{GivingFilter, GivingRepository};
use crate::application::services::reports;
use crate::application::use_cases::reports::REPORT_ROW_LIMIT;

pub struct GivingReport<'a, R: GivingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GivingRepository + ?Sized> GivingReport<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        fund_id: Option<Uuid>,
    ) -> anyhow::Result<Vec<u8>> {
        let filter = GivingFilter {
            from,
            to,
            fund_id,
            limit: REPORT_ROW_LIMIT,
            ..Default::default()
        };
        let rows = self.repo.list_contributions(church_id, &filter).await?;
        let total = self.repo.sum_contributions(church_id, &filter).await?;
        reports::giving_csv(&rows, total)
    }
}
