use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::households::Household;
use crate::domain::members::Member;

#[derive(Debug, Clone, Default)]
pub struct NewHousehold {
    pub name: String,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HouseholdWithCount {
    pub household: Household,
    pub member_count: i64,
}

#[async_trait]
pub trait HouseholdRepository: Send + Sync {
    async fn create_household(
        &self,
        church_id: Uuid,
        new: &NewHousehold,
    ) -> anyhow::Result<Household>;
    async fn update_household(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewHousehold,
    ) -> anyhow::Result<Option<Household>>;
    async fn get_household(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Household>>;
    async fn list_households(&self, church_id: Uuid) -> anyhow::Result<Vec<HouseholdWithCount>>;
    async fn members_of(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Vec<Member>>;
    /// Members are detached (household_id set NULL by the schema), not deleted.
    async fn delete_household(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
