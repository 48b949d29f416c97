use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::giving_repository::{GivingFilter, GivingRepository};
use crate::domain::giving::Contribution;

pub struct ListContributions<'a, R: GivingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GivingRepository + ?Sized> ListContributions<'a, R> {
    /// Returns the filtered page plus the sum over the whole filtered range
    /// (not just the page).
    pub async fn execute(
        &self,
        church_id: Uuid,
        filter: &GivingFilter,
    ) -> anyhow::Result<(Vec<Contribution>, Decimal)> {
        let rows = self.repo.list_contributions(church_id, filter).await?;
        let total = self.repo.sum_contributions(church_id, filter).await?;
        Ok((rows, total))
    }
}
