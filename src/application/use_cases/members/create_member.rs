use uuid::Uuid;

use crate::application::access;
use crate::application::ports::member_repository::{MemberRepository, NewMember};
use crate::domain::members::Member;
use crate::domain::tenancy::PlanTier;

pub struct CreateMember<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

pub enum CreateMemberOutcome {
    Created(Member),
    /// The plan's member cap would be exceeded.
    CapExceeded { cap: i64 },
}

impl<'a, R: MemberRepository + ?Sized> CreateMember<'a, R> {
    pub async fn execute(
        &self,
        church_id: Uuid,
        plan: PlanTier,
        new: &NewMember,
    ) -> anyhow::Result<CreateMemberOutcome> {
        if let Some(cap) = access::member_cap(plan) {
            let count = self.repo.count_members(church_id).await?;
            if count >= cap {
                return Ok(CreateMemberOutcome::CapExceeded { cap });
            }
        }
        let member = self.repo.create_member(church_id, new).await?;
        Ok(CreateMemberOutcome::Created(member))
    }
}
