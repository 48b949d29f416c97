use uuid::Uuid;

use crate::application::ports::giving_repository::GivingRepository;
use crate::domain::giving::Fund;

pub struct ListFunds<'a, R: GivingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: GivingRepository + ?Sized> ListFunds<'a, R> {
    pub async fn execute(&self, church_id: Uuid) -> anyhow::Result<Vec<Fund>> {
        self.repo.list_funds(church_id).await
    }
}
