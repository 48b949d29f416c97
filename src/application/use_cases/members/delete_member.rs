use uuid::Uuid;

use crate::application::ports::member_repository::MemberRepository;

pub struct DeleteMember<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

pub enum DeleteMemberOutcome {
    Deleted,
    NotFound,
    /// Giving or attendance history exists; archive via participation status
    /// instead.
    HasHistory,
}

impl<'a, R: MemberRepository + ?Sized> DeleteMember<'a, R> {
    pub async fn execute(&self, church_id: Uuid, id: Uuid) -> anyhow::Result<DeleteMemberOutcome> {
        if self.repo.get_member(church_id, id).await?.is_none() {
            return Ok(DeleteMemberOutcome::NotFound);
        }
        if self.repo.has_history(church_id, id).await? {
            return Ok(DeleteMemberOutcome::HasHistory);
        }
        if self.repo.delete_member(church_id, id).await? {
            Ok(DeleteMemberOutcome::Deleted)
        } else {
            Ok(DeleteMemberOutcome::NotFound)
        }
    }
}
