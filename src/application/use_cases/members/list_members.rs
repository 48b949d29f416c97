use uuid::Uuid;

use crate::application::ports::member_repository::{MemberFilter, MemberRepository};
use crate::domain::members::Member;

pub struct ListMembers<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: MemberRepository + ?Sized> ListMembers<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        filter: &MemberFilter,
    ) -> anyhow::Result<Vec<Member>> {
        self.repo.list_members(church_id, filter).await
    }
}
