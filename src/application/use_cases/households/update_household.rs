use uuid::Uuid;

use crate::application::ports::household_repository::{HouseholdRepository, NewHousehold};
use crate::domain::households::Household;

pub struct UpdateHousehold<'a, R: HouseholdRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: HouseholdRepository + ?Sized> UpdateHousehold<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewHousehold,
    ) -> anyhow::Result<Option<Household>> {
        self.repo.update_household(church_id, id, new).await
    }
}
