use uuid::Uuid;

use crate::application::ports::household_repository::{HouseholdRepository, NewHousehold};
use crate::domain::households::Household;

pub struct CreateHousehold<'a, R: HouseholdRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: HouseholdRepository + ?Sized> CreateHousehold<'a, R> {
    pub async fn execute(&self, church_id: Uuid, new: &NewHousehold) -> anyhow::Result<Household> {
        self.repo.create_household(church_id, new).await
    }
}
