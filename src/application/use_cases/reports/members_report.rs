use uuid::Uuid;

use crate::application::ports::member_repository::{MemberFilter, MemberRepository};
use crate::application::services::reports;
use crate::application::use_cases::reports::REPORT_ROW_LIMIT;
use crate::domain::members::ParticipationStatus;

pub struct MembersReport<'a, R: MemberRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: MemberRepository + ?Sized> MembersReport<'a, R> {
    /// Without an explicit status filter, deceased and moved members are
    /// excluded.
    pub async fn execute(
        &self,
        church_id: Uuid,
        status: Option<ParticipationStatus>,
    ) -> anyhow::Result<Vec<u8>> {
        let filter = MemberFilter {
            status,
            limit: REPORT_ROW_LIMIT,
            ..Default::default()
        };
        let mut members = self.repo.list_members(church_id, &filter).await?;
        if status.is_none() {
            members.retain(|m| m.participation_status.in_default_reports());
        }
        reports::members_csv(&members)
    }
}
