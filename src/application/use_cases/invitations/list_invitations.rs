use uuid::Uuid;

use crate::application::ports::invitation_repository::{InvitationRepository, InvitationRow};

pub struct ListInvitations<'a, R: InvitationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: InvitationRepository + ?Sized> ListInvitations<'a, R> {
    pub async fn execute(&self, church_id: Uuid) -> anyhow::Result<Vec<InvitationRow>> {
        self.repo.list_pending(church_id).await
    }
}
