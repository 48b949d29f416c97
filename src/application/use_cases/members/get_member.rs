use uuid::Uuid;

use crate::application::ports::member_repository::MemberRepository;
use crate::domain::members::Member;

pub struct GetMember<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: MemberRepository + ?Sized> GetMember<'a, R> {
    pub async fn execute(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<Option<Member>> {
        self.repo.get_member(church_id, id).await
    }
}
