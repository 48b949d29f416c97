use uuid::Uuid;

use crate::application::ports::household_repository::HouseholdRepository;
use crate::domain::households::Household;
use crate::domain::members::Member;

pub struct GetHousehold<'a, R: HouseholdRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: HouseholdRepository + ?Sized> GetHousehold<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<(Household, Vec<Member>)>> {
        let household = match self.repo.get_household(church_id, id).await? {
            Some(h) => h,
            None => return Ok(None),
        };
        let members = self.repo.members_of(church_id, id).await?;
        Ok(Some((household, members)))
    }
}
