use uuid::Uuid;

use crate::application::ports::member_repository::{MemberRepository, NewMember};
use crate::domain::members::Member;

pub struct UpdateMember<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: MemberRepository + ?Sized> UpdateMember<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        id: Uuid,
        new: &NewMember,
    ) -> anyhow::Result<Option<Member>> {
        self.repo.update_member(church_id, id, new).await
    }
}
