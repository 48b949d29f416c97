use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::members::{Member, ParticipationStatus};

#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub household_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub participation_status: Option<ParticipationStatus>,
    pub joined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub status: Option<ParticipationStatus>,
    pub q: Option<String>,
    pub household_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create_member(&self, church_id: Uuid, new: &NewMember) -> anyhow::Result<Member>;
    async fn update_member(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewMember,
    ) -> anyhow::Result<Option<Member>>;
    async fn get_member(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Member>>;
    async fn list_members(
        &self,
        church_id: Uuid,
        filter: &MemberFilter,
    ) -> anyhow::Result<Vec<Member>>;
    async fn count_members(&self, church_id: Uuid) -> anyhow::Result<i64>;
    /// Whether the member has contributions or attendance history.
    async fn has_history(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
    async fn delete_member(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
    /// email (lowercased) -> member id, for contribution import matching.
    async fn email_index(&self, church_id: Uuid) -> anyhow::Result<HashMap<String, Uuid>>;
}
