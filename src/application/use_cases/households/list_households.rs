use uuid::Uuid;

use crate::application::ports::household_repository::{HouseholdRepository, HouseholdWithCount};

pub struct ListHouseholds<'a, R: HouseholdRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: HouseholdRepository + ?Sized> ListHouseholds<'a, R> {
    pub async fn execute(&self, church_id: Uuid) -> anyhow::Result<Vec<HouseholdWithCount>> {
        self.repo.list_households(church_id).await
    }
}
