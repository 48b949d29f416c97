use uuid::Uuid;

use crate::application::ports::giving_repository::GivingRepository;
use crate::domain::giving::Fund;

pub struct CreateFund<'a, R: GivingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GivingRepository + ?Sized> CreateFund<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        name: &str,
        tax_deductible: bool,
    ) -> anyhow::Result<Fund> {
        self.repo
            .create_fund(church_id, name.trim(), tax_deductible)
            .await
    }
}
