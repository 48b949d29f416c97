use uuid::Uuid;

use crate::application::ports::household_repository::HouseholdRepository;

pub struct DeleteHousehold<'a, R: HouseholdRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: HouseholdRepository + ?Sized> DeleteHousehold<'a, R> {
    pub async fn execute(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete_household(church_id, id).await
    }
}
